use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bump_core::ReleaseType;
use bump_manifest::{
    BumpConfig, WorkspaceSnapshot, discover_packages, read_monorepo_root_manifest,
};
use bump_version::{BumpSpec, classify_transition, compute_new_version, is_synchronizing_transition};
use indexmap::IndexSet;
use serde::Serialize;

use crate::Result;
use crate::applier::{ChangelogSettings, StagedWrite, UpdateApplier, write_staged};
use crate::detector::GitChangeDetector;
use crate::gateway::HistoryGateway;
use crate::planner::get_packages_to_update;
use crate::traits::{ChangelogFormatter, GitProvider};
use crate::types::{UpdateSpecification, WorkspaceMode};

#[derive(Debug, Clone)]
pub struct BumpInput {
    pub root: PathBuf,
    pub bump: BumpSpec,
    pub prerelease_id: Option<String>,
    /// Overrides `packagesDirectory` from the root manifest.
    pub packages_dir: Option<PathBuf>,
    pub update_changelog: bool,
    pub release_candidate: bool,
    pub repository_url: Option<String>,
    /// Fail instead of treating an untagged repository as fully changed.
    pub require_tags: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BumpOutput {
    pub previous_version: String,
    pub new_version: String,
    pub release_type: Option<ReleaseType>,
    /// Most recent release tag, when change detection consulted history.
    pub latest_tag: Option<String>,
    pub mode: WorkspaceMode,
    pub synchronized: bool,
    pub updated_packages: Vec<String>,
    pub writes: Vec<StagedWrite>,
    pub dry_run: bool,
}

pub struct BumpOperation<G, F> {
    git_provider: Arc<G>,
    changelog_formatter: F,
}

impl<G, F> BumpOperation<G, F>
where
    G: GitProvider + 'static,
    F: ChangelogFormatter,
{
    pub fn new(git_provider: G, changelog_formatter: F) -> Self {
        Self {
            git_provider: Arc::new(git_provider),
            changelog_formatter,
        }
    }

    /// Runs one release bump end to end.
    ///
    /// Nothing is written until every manifest and changelog has been computed.
    ///
    /// # Errors
    ///
    /// Returns the first error of any phase; see [`crate::OperationError`].
    pub async fn execute(&self, input: BumpInput) -> Result<BumpOutput> {
        let root_manifest = read_monorepo_root_manifest(&input.root).await?;
        let config = BumpConfig::from_manifest(&input.root, &root_manifest)?;

        let current = root_manifest.version_str().unwrap_or_default();
        let new_version =
            compute_new_version(current, &input.bump, input.prerelease_id.as_deref())?;
        let previous_version = bump_version::parse_version(current)?;

        let release_type = classify_transition(&previous_version, &new_version);
        let synchronize_versions = is_synchronizing_transition(release_type);

        let mode = if root_manifest.is_monorepo_root() {
            WorkspaceMode::Monorepo
        } else {
            WorkspaceMode::Polyrepo
        };

        tracing::info!(
            %previous_version,
            %new_version,
            %mode,
            synchronize_versions,
            "resolved release"
        );

        let (snapshot, packages_to_update, latest_tag) = match mode {
            WorkspaceMode::Monorepo => {
                let packages_dir = workspace_relative(
                    &input.root,
                    input
                        .packages_dir
                        .as_deref()
                        .unwrap_or(config.packages_directory.as_path()),
                );
                let snapshot = discover_packages(&input.root, &packages_dir).await?;

                let gateway = Arc::new(HistoryGateway::new(
                    Arc::clone(&self.git_provider),
                    input.root.clone(),
                    config.allow_untagged && !input.require_tags,
                ));
                let detector =
                    Arc::new(GitChangeDetector::new(Arc::clone(&gateway), packages_dir));
                let selected =
                    get_packages_to_update(&snapshot, synchronize_versions, detector).await?;

                let latest_tag = if synchronize_versions {
                    None
                } else {
                    gateway.tag_set().await?.latest_tag().map(str::to_string)
                };

                (snapshot, selected, latest_tag)
            }
            WorkspaceMode::Polyrepo => {
                let name = root_manifest.name().unwrap_or(".").to_string();
                (WorkspaceSnapshot::default(), IndexSet::from([name]), None)
            }
        };

        let spec = UpdateSpecification {
            new_version,
            packages_to_update,
            synchronize_versions,
            mode,
            root_manifest,
        };

        let changelog = input.update_changelog.then(|| ChangelogSettings {
            file_name: config.changelog_file.clone(),
            release_candidate: input.release_candidate,
            repository_url: input.repository_url.clone(),
        });
        let applier = UpdateApplier::new(&input.root, &self.changelog_formatter, changelog);
        let writes = applier.stage(&spec, &snapshot).await?;

        if input.dry_run {
            tracing::info!(count = writes.len(), "dry run; nothing written");
        } else {
            write_staged(&writes).await?;
            tracing::info!(count = writes.len(), "files written");
        }

        Ok(BumpOutput {
            previous_version: previous_version.to_string(),
            new_version: spec.new_version.to_string(),
            release_type,
            latest_tag,
            mode,
            synchronized: synchronize_versions,
            updated_packages: spec.packages_to_update.into_iter().collect(),
            writes,
            dry_run: input.dry_run,
        })
    }
}

/// `dir` as a plain path below `root`, the form history queries report.
///
/// `.` segments are dropped and an absolute `dir` under `root` loses that prefix.
fn workspace_relative(root: &Path, dir: &Path) -> PathBuf {
    let dir = if dir.is_absolute() {
        dir.strip_prefix(root)
            .map(Path::to_path_buf)
            .or_else(|_| {
                let root = root.canonicalize()?;
                let dir = dir.canonicalize()?;
                dir.strip_prefix(&root)
                    .map(Path::to_path_buf)
                    .map_err(|_| std::io::Error::from(std::io::ErrorKind::NotFound))
            })
            .unwrap_or_else(|_| dir.to_path_buf())
    } else {
        dir.to_path_buf()
    };

    dir.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
