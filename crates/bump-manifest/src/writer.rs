use std::path::Path;

use crate::error::ManifestError;
use crate::manifest::{MANIFEST_FILE, PackageManifest};

/// Renders a manifest with 2-space indentation and a trailing newline.
///
/// Keys keep the order of the snapshot, so equal snapshots render to equal bytes.
///
/// # Errors
///
/// Returns `ManifestError::Serialize` if the manifest cannot be rendered.
pub fn serialize_manifest(manifest: &PackageManifest) -> Result<String, ManifestError> {
    let mut rendered =
        serde_json::to_string_pretty(manifest.fields()).map_err(ManifestError::Serialize)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Overwrites `<dir>/package.json` with the rendered manifest.
///
/// # Errors
///
/// Returns `ManifestError::Serialize` or `ManifestError::Write`.
pub async fn write_manifest(dir: &Path, manifest: &PackageManifest) -> Result<(), ManifestError> {
    let rendered = serialize_manifest(manifest)?;
    write_rendered(dir, rendered).await
}

/// Writes already-rendered manifest text to `<dir>/package.json`.
///
/// # Errors
///
/// Returns `ManifestError::Write` if the file cannot be written.
pub async fn write_rendered(dir: &Path, rendered: String) -> Result<(), ManifestError> {
    let path = dir.join(MANIFEST_FILE);
    tokio::fs::write(&path, rendered)
        .await
        .map_err(|source| ManifestError::Write { path, source })
}
