use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("ambiguous bump: {reason}")]
    AmbiguousBump { reason: String },

    #[error("invalid pre-release identifier '{identifier}'")]
    InvalidPrereleaseIdentifier {
        identifier: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, VersionError>;
