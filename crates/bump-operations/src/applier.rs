use std::path::{Path, PathBuf};

use bump_manifest::{MANIFEST_FILE, WorkspaceSnapshot, serialize_manifest, write_rendered};
use serde::Serialize;
use tokio::task::JoinSet;

use crate::error::{OperationError, Result};
use crate::planner::plan_manifest_update;
use crate::traits::{ChangelogFormatter, ChangelogRequest};
use crate::types::{UpdateSpecification, WorkspaceMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSettings {
    pub file_name: String,
    pub release_candidate: bool,
    pub repository_url: Option<String>,
}

/// A file write computed in memory, not yet performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StagedWrite {
    Manifest {
        package: String,
        dir: PathBuf,
        #[serde(skip)]
        rendered: String,
    },
    Changelog {
        package: String,
        path: PathBuf,
        #[serde(skip)]
        text: String,
    },
}

impl StagedWrite {
    #[must_use]
    pub fn path(&self) -> PathBuf {
        match self {
            Self::Manifest { dir, .. } => dir.join(MANIFEST_FILE),
            Self::Changelog { path, .. } => path.clone(),
        }
    }

    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::Manifest { package, .. } | Self::Changelog { package, .. } => package,
        }
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        match self {
            Self::Manifest { rendered, .. } => rendered,
            Self::Changelog { text, .. } => text,
        }
    }
}

struct Target<'a> {
    name: &'a str,
    dir: &'a Path,
}

/// Stages manifest and changelog contents for an [`UpdateSpecification`].
pub struct UpdateApplier<'a, F> {
    root: &'a Path,
    formatter: &'a F,
    changelog: Option<ChangelogSettings>,
}

impl<'a, F> UpdateApplier<'a, F>
where
    F: ChangelogFormatter,
{
    /// Changelogs are only touched when `changelog` is set.
    pub fn new(root: &'a Path, formatter: &'a F, changelog: Option<ChangelogSettings>) -> Self {
        Self {
            root,
            formatter,
            changelog,
        }
    }

    /// Computes every write of the run without touching the workspace.
    ///
    /// The root manifest is staged in both modes. Monorepo runs stage each
    /// updated member and its changelog; polyrepo runs stage the root changelog.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest cannot be serialized, or
    /// `OperationError::ChangelogRead` if an existing changelog cannot be read.
    pub async fn stage(
        &self,
        spec: &UpdateSpecification,
        snapshot: &WorkspaceSnapshot,
    ) -> Result<Vec<StagedWrite>> {
        let root_name = spec
            .root_manifest
            .name()
            .unwrap_or_else(|| match spec.mode {
                WorkspaceMode::Monorepo => "<root>",
                WorkspaceMode::Polyrepo => ".",
            });

        let mut staged = vec![StagedWrite::Manifest {
            package: root_name.to_string(),
            dir: self.root.to_path_buf(),
            rendered: serialize_manifest(&plan_manifest_update(&spec.root_manifest, spec))?,
        }];

        let mut changelog_targets = Vec::new();
        match spec.mode {
            WorkspaceMode::Polyrepo => changelog_targets.push(Target {
                name: root_name,
                dir: self.root,
            }),
            WorkspaceMode::Monorepo => {
                for name in &spec.packages_to_update {
                    let Some(package) = snapshot.get(name) else {
                        continue;
                    };

                    let planned = plan_manifest_update(&package.manifest, spec);
                    staged.push(StagedWrite::Manifest {
                        package: package.name.clone(),
                        dir: package.path.clone(),
                        rendered: serialize_manifest(&planned)?,
                    });
                    changelog_targets.push(Target {
                        name: &package.name,
                        dir: &package.path,
                    });
                }
            }
        }

        if let Some(settings) = &self.changelog {
            staged.extend(self.stage_changelogs(spec, settings, &changelog_targets).await?);
        }

        for write in &staged {
            tracing::debug!(package = write.package(), path = %write.path().display(), "staged write");
        }
        Ok(staged)
    }

    async fn stage_changelogs(
        &self,
        spec: &UpdateSpecification,
        settings: &ChangelogSettings,
        targets: &[Target<'_>],
    ) -> Result<Vec<StagedWrite>> {
        let mut reads = JoinSet::new();
        for (index, target) in targets.iter().enumerate() {
            let path = target.dir.join(&settings.file_name);
            reads.spawn(async move {
                let existing = read_changelog(&path).await;
                (index, existing)
            });
        }

        let mut contents: Vec<Option<Result<String>>> =
            std::iter::repeat_with(|| None).take(targets.len()).collect();
        while let Some(joined) = reads.join_next().await {
            let (index, existing) = joined?;
            contents[index] = Some(existing);
        }

        let mut staged = Vec::with_capacity(targets.len());
        for (target, existing) in targets.iter().zip(contents) {
            let Some(existing) = existing else {
                continue;
            };
            let existing = existing?;

            let text = self.formatter.format(&ChangelogRequest {
                existing: &existing,
                version: &spec.new_version,
                release_candidate: settings.release_candidate,
                package_dir: target.dir,
                repository_url: settings.repository_url.as_deref(),
            })?;

            staged.push(StagedWrite::Changelog {
                package: target.name.to_string(),
                path: target.dir.join(&settings.file_name),
                text,
            });
        }

        Ok(staged)
    }
}

/// A missing changelog reads as empty; any other failure is logged and returned.
async fn read_changelog(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => {
            tracing::error!(path = %path.display(), error = %source, "failed to read changelog");
            Err(OperationError::ChangelogRead {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Performs staged writes concurrently.
///
/// # Errors
///
/// Returns the first failed write in staging order. Other writes may already
/// have landed.
pub async fn write_staged(staged: &[StagedWrite]) -> Result<()> {
    let mut tasks = JoinSet::new();
    for (index, write) in staged.iter().cloned().enumerate() {
        tasks.spawn(async move { (index, perform(write).await) });
    }

    let mut failures = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        if let Err(err) = result {
            failures.push((index, err));
        }
    }

    failures.sort_by_key(|(index, _)| *index);
    match failures.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

async fn perform(write: StagedWrite) -> Result<()> {
    match write {
        StagedWrite::Manifest { dir, rendered, .. } => {
            write_rendered(&dir, rendered).await?;
        }
        StagedWrite::Changelog { path, text, .. } => {
            tokio::fs::write(&path, text)
                .await
                .map_err(|source| OperationError::ChangelogWrite { path, source })?;
        }
    }
    Ok(())
}
