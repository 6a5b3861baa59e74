use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown release type '{token}' (expected one of: {expected})")]
    UnknownReleaseType { token: String, expected: String },

    #[error("unknown dependency field '{field}'")]
    UnknownDependencyGroup { field: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
