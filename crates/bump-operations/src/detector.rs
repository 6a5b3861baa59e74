use std::path::PathBuf;
use std::sync::Arc;

use bump_manifest::PackageMetadata;
use bump_version::{parse_version, tag_for_version};

use crate::error::{OperationError, Result};
use crate::gateway::HistoryGateway;
use crate::traits::{ChangeDetector, GitProvider};

/// Detects changes by diffing the packages directory against each package's
/// release tag.
pub struct GitChangeDetector<G> {
    gateway: Arc<HistoryGateway<G>>,
    packages_dir: PathBuf,
}

impl<G> GitChangeDetector<G>
where
    G: GitProvider + 'static,
{
    /// `packages_dir` is relative to the workspace root.
    pub fn new(gateway: Arc<HistoryGateway<G>>, packages_dir: PathBuf) -> Self {
        Self {
            gateway,
            packages_dir,
        }
    }
}

impl<G> ChangeDetector for GitChangeDetector<G>
where
    G: GitProvider + 'static,
{
    async fn did_package_change(&self, package: &PackageMetadata) -> Result<bool> {
        let tags = self.gateway.tag_set().await?;
        if tags.is_empty() {
            return Ok(true);
        }

        let version = parse_version(package.manifest.version_str().unwrap_or_default())?;
        let tag = tag_for_version(&version);
        if !tags.contains(&tag) {
            return Err(OperationError::NoCorrespondingTag {
                package: package.name.clone(),
                version: version.to_string(),
                tag,
            });
        }

        let changed = self.gateway.diff_since(&tag, &self.packages_dir).await?;
        let package_dir = self.packages_dir.join(&package.dir_name);
        let did_change = changed.iter().any(|path| path.starts_with(&package_dir));

        tracing::debug!(package = %package.name, %tag, did_change, "checked package history");
        Ok(did_change)
    }
}
