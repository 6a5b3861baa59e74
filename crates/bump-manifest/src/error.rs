use std::path::PathBuf;

use bump_core::ManifestField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no manifest found at '{path}'")]
    Missing { path: PathBuf },

    #[error("failed to read manifest at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest at '{path}' is not a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("failed to serialize manifest")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid '{field}' in '{path}': {reason}")]
    Validation {
        path: PathBuf,
        field: ManifestField,
        reason: String,
    },

    #[error("duplicate package name '{name}' declared in '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to list packages in '{path}'")]
    ListPackages {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid release configuration in '{path}'")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest task failed")]
    TaskFailed(#[from] tokio::task::JoinError),
}
