use std::path::{Path, PathBuf};

use bump_git::TagInfo;

use crate::Result;

/// Read-only version-control queries a run needs.
///
/// Calls block; async callers run them on the blocking pool.
pub trait GitProvider: Send + Sync {
    /// All tags, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or tags cannot be read.
    fn list_tags(&self, root: &Path) -> Result<Vec<TagInfo>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn is_shallow(&self, root: &Path) -> Result<bool>;

    /// Paths changed between `tag` and the working tree, restricted to `scope`
    /// and relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or `tag` does not resolve.
    fn changed_paths(&self, root: &Path, tag: &str, scope: &Path) -> Result<Vec<PathBuf>>;
}
