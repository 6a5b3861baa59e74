use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ManifestError;
use crate::manifest::{MANIFEST_FILE, PackageManifest};

/// Key of the release configuration object inside the root manifest.
pub const CONFIG_KEY: &str = "releaseBump";
pub const DEFAULT_PACKAGES_DIR: &str = "packages";
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BumpConfig {
    pub packages_directory: PathBuf,
    pub changelog_file: String,
    pub allow_untagged: bool,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            packages_directory: PathBuf::from(DEFAULT_PACKAGES_DIR),
            changelog_file: DEFAULT_CHANGELOG_FILE.to_string(),
            allow_untagged: true,
        }
    }
}

impl BumpConfig {
    /// Reads the `releaseBump` object of a root manifest located in `root`.
    /// A manifest without the object yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidConfig` if the object has unknown keys or
    /// values of the wrong type.
    pub fn from_manifest(root: &Path, manifest: &PackageManifest) -> Result<Self, ManifestError> {
        let Some(section) = manifest.fields().get(CONFIG_KEY) else {
            return Ok(Self::default());
        };

        Self::deserialize(section).map_err(|source| ManifestError::InvalidConfig {
            path: root.join(MANIFEST_FILE),
            source,
        })
    }
}
