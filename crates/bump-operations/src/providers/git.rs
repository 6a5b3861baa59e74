use std::path::{Path, PathBuf};

use bump_git::{Repository, TagInfo};

use crate::Result;
use crate::traits::GitProvider;

/// Opens the repository containing the workspace root on every call.
pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn list_tags(&self, root: &Path) -> Result<Vec<TagInfo>> {
        let repo = Repository::open(root)?;
        Ok(repo.tags_by_creation()?)
    }

    fn is_shallow(&self, root: &Path) -> Result<bool> {
        let repo = Repository::open(root)?;
        Ok(repo.is_shallow())
    }

    fn changed_paths(&self, root: &Path, tag: &str, scope: &Path) -> Result<Vec<PathBuf>> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let repo = Repository::open(&root)?;

        // Repository paths are relative to the repository root, which may sit
        // above the workspace root.
        let workspace_prefix = repo.to_relative_path(&root);
        let changed = repo.changed_paths_since(tag, &root.join(scope))?;

        Ok(changed
            .into_iter()
            .filter_map(|path| {
                path.strip_prefix(&workspace_prefix)
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn commit_all(repo: &git2::Repository, message: &str) -> anyhow::Result<git2::Oid> {
        let mut index = repo.index()?;
        index.add_all(["*"], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let sig = git2::Signature::now("Test", "test@example.com")?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit()?],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<_> = parents.iter().collect();
        Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)?)
    }

    fn write(root: &Path, relative: &str, content: &str) -> anyhow::Result<()> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    #[test]
    fn paths_are_relative_to_nested_workspace_root() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let repo = git2::Repository::init(dir.path())?;
        write(dir.path(), "js/packages/a/index.js", "1")?;
        write(dir.path(), "js/packages/b/index.js", "1")?;
        let first = commit_all(&repo, "initial")?;
        repo.tag_lightweight("v1.0.0", &repo.find_object(first, None)?, false)?;

        write(dir.path(), "js/packages/b/index.js", "2")?;
        write(dir.path(), "docs/readme.md", "outside")?;
        commit_all(&repo, "change b")?;

        let provider = Git2Provider::new();
        let workspace = dir.path().join("js");
        let changed = provider.changed_paths(&workspace, "v1.0.0", Path::new("packages"))?;

        assert_eq!(changed, vec![PathBuf::from("packages/b/index.js")]);
        Ok(())
    }

    #[test]
    fn lists_tags_and_shallow_state() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let repo = git2::Repository::init(dir.path())?;
        write(dir.path(), "package.json", "{}")?;
        let head = commit_all(&repo, "initial")?;
        repo.tag_lightweight("v0.1.0", &repo.find_object(head, None)?, false)?;

        let provider = Git2Provider::new();
        let tags = provider.list_tags(dir.path())?;

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v0.1.0");
        assert!(!provider.is_shallow(dir.path())?);
        Ok(())
    }

    #[test]
    fn outside_repository_fails() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let provider = Git2Provider::new();
        assert!(provider.list_tags(dir.path()).is_err());
        Ok(())
    }
}
