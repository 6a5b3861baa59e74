use std::fmt;

use bump_manifest::PackageManifest;
use indexmap::IndexSet;
use semver::Version;
use serde::Serialize;

/// Release tags known at the start of a run, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: IndexSet<String>,
    latest: Option<Version>,
}

impl TagSet {
    /// `names` must be ordered oldest first; `latest` is the version of the last one.
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>, latest: Option<Version>) -> Self {
        Self {
            names: names.into_iter().collect(),
            latest,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.names.contains(tag)
    }

    #[must_use]
    pub fn latest_tag(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    #[must_use]
    pub fn latest_version(&self) -> Option<&Version> {
        self.latest.as_ref()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceMode {
    /// Root manifest declares `workspaces`; members live under the packages directory.
    Monorepo,
    /// The root manifest is the only package.
    Polyrepo,
}

impl fmt::Display for WorkspaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monorepo => f.write_str("monorepo"),
            Self::Polyrepo => f.write_str("polyrepo"),
        }
    }
}

/// Everything the write phase needs to know, decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSpecification {
    pub new_version: Version,
    pub packages_to_update: IndexSet<String>,
    pub synchronize_versions: bool,
    pub mode: WorkspaceMode,
    /// Always rewritten; in polyrepo mode it is the single package.
    pub root_manifest: PackageManifest,
}

impl UpdateSpecification {
    /// Dependency range written for updated siblings when synchronizing.
    #[must_use]
    pub fn synchronized_range(&self) -> String {
        format!("^{}", self.new_version)
    }
}
