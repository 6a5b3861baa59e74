mod config;
mod error;
mod manifest;
mod reader;
mod workspace;
mod writer;

pub use config::{BumpConfig, CONFIG_KEY, DEFAULT_CHANGELOG_FILE, DEFAULT_PACKAGES_DIR};
pub use error::ManifestError;
pub use manifest::{MANIFEST_FILE, PackageManifest};
pub use reader::{
    DEFAULT_REQUIRED_FIELDS, parse_manifest, read_manifest, read_monorepo_root_manifest,
    validate_manifest, validate_root_manifest,
};
pub use workspace::{PackageMetadata, WorkspaceSnapshot, discover_packages};
pub use writer::{serialize_manifest, write_manifest, write_rendered};

pub type Result<T> = std::result::Result<T, ManifestError>;
