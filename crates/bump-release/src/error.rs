use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to get current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("invalid release request")]
    Version(#[from] bump_version::VersionError),

    #[error("release bump failed")]
    Operation(#[from] bump_operations::OperationError),

    #[error("failed to start async runtime")]
    Runtime(#[source] std::io::Error),

    #[error("failed to serialize run output")]
    Json(#[from] serde_json::Error),

    #[error("failed to append run output to '{path}'")]
    RunOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
