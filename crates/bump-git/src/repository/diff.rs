use std::path::{Path, PathBuf};

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Paths that differ between `refspec` and the working tree (index included),
    /// limited to `scope`. Returned paths are relative to the repository root.
    ///
    /// Renames show up as both the old and the new path.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if `refspec` cannot be resolved to a tree.
    pub fn changed_paths_since(&self, refspec: &str, scope: &Path) -> Result<Vec<PathBuf>> {
        let base_tree = self.resolve_tree(refspec)?;

        let mut opts = git2::DiffOptions::new();
        let scope = self.to_relative_path(scope);
        if !scope.as_os_str().is_empty() {
            opts.pathspec(scope.to_string_lossy().replace('\\', "/"));
        }

        let diff = self
            .inner
            .diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut opts))?;

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .ok_or(GitError::MissingDeltaPath)?;
            paths.push(path.to_path_buf());

            if let Some(old) = delta.old_file().path() {
                if old != path {
                    paths.push(old.to_path_buf());
                }
            }
        }

        Ok(paths)
    }

    fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_tree().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }
}
