use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] bump_core::CoreError),

    #[error(transparent)]
    Version(#[from] bump_version::VersionError),

    #[error(transparent)]
    Git(#[from] bump_git::GitError),

    #[error(transparent)]
    Manifest(#[from] bump_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] bump_changelog::ChangelogError),

    #[error("no release tags found in '{root}'")]
    NoTagsFound { root: PathBuf },

    #[error("repository at '{root}' has shallow history and no tags; fetch full history to detect changes")]
    ShallowHistory { root: PathBuf },

    #[error("latest tag '{tag}' is not a semantic version")]
    InvalidTag {
        tag: String,
        #[source]
        source: bump_version::VersionError,
    },

    #[error("package '{package}' is at version {version} but tag '{tag}' does not exist")]
    NoCorrespondingTag {
        package: String,
        version: String,
        tag: String,
    },

    #[error("no packages changed since their last release")]
    NoPackagesToUpdate,

    #[error("failed to read changelog at '{path}'")]
    ChangelogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write changelog at '{path}'")]
    ChangelogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("background task failed")]
    TaskFailed(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, OperationError>;
