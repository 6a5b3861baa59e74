mod changelog;
mod error;
mod forge;
mod format;

pub use changelog::Changelog;
pub use error::ChangelogError;
pub use forge::{Forge, RepositoryInfo};
pub use format::{
    UNRELEASED, format_link, format_version_header, new_changelog, release_changelog,
};

pub type Result<T> = std::result::Result<T, ChangelogError>;
