mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::Repository;
pub use types::TagInfo;

use std::path::Path;

pub type Result<T> = std::result::Result<T, GitError>;

/// # Errors
///
/// Returns an error if the path is not a git repository or tags cannot be read.
pub fn list_tags(path: &Path) -> Result<Vec<TagInfo>> {
    Repository::open(path)?.tags_by_creation()
}

/// # Errors
///
/// Returns an error if the path is not a git repository.
pub fn is_shallow(path: &Path) -> Result<bool> {
    Ok(Repository::open(path)?.is_shallow())
}
