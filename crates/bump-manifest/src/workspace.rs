use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tokio::task::JoinSet;

use crate::error::ManifestError;
use crate::manifest::PackageManifest;
use crate::reader::{DEFAULT_REQUIRED_FIELDS, read_manifest};

/// One workspace member as discovered at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Leaf directory name, e.g. `a` for `packages/a`.
    pub dir_name: String,
    pub path: PathBuf,
    pub manifest: PackageManifest,
    pub name: String,
}

impl PackageMetadata {
    /// Builds metadata for a manifest already validated to carry a `name`.
    #[must_use]
    pub fn new(path: PathBuf, manifest: PackageManifest) -> Self {
        let dir_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = manifest.name().unwrap_or_default().to_string();

        Self {
            dir_name,
            path,
            manifest,
            name,
        }
    }
}

/// Packages of a workspace keyed by name, in directory order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    packages: IndexMap<String, PackageMetadata>,
}

impl WorkspaceSnapshot {
    /// # Errors
    ///
    /// Returns `ManifestError::DuplicateName` if two packages share a name.
    pub fn from_packages(
        packages: impl IntoIterator<Item = PackageMetadata>,
    ) -> Result<Self, ManifestError> {
        let mut map: IndexMap<String, PackageMetadata> = IndexMap::new();

        for package in packages {
            if let Some(existing) = map.get(&package.name) {
                return Err(ManifestError::DuplicateName {
                    name: package.name,
                    first: existing.path.clone(),
                    second: package.path,
                });
            }
            map.insert(package.name.clone(), package);
        }

        Ok(Self { packages: map })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PackageMetadata> {
        self.packages.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageMetadata> {
        self.packages.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Reads every immediate subdirectory of `root/subdir` as a package.
///
/// Manifests are read concurrently; the snapshot keeps sorted directory order
/// and the first failure in that order is returned. Plain files are skipped.
///
/// # Errors
///
/// Returns `ManifestError::ListPackages` if the directory cannot be listed,
/// any error of [`read_manifest`] for a member, or
/// `ManifestError::DuplicateName`.
pub async fn discover_packages(
    root: &Path,
    subdir: &Path,
) -> Result<WorkspaceSnapshot, ManifestError> {
    let packages_dir = root.join(subdir);
    let dirs = list_package_dirs(&packages_dir).await?;

    tracing::debug!(
        packages_dir = %packages_dir.display(),
        count = dirs.len(),
        "reading package manifests"
    );

    let mut tasks = JoinSet::new();
    for (index, dir) in dirs.iter().cloned().enumerate() {
        tasks.spawn(async move {
            let result = read_manifest(&dir, DEFAULT_REQUIRED_FIELDS).await;
            (index, result)
        });
    }

    let mut manifests: Vec<Option<Result<PackageManifest, ManifestError>>> =
        std::iter::repeat_with(|| None).take(dirs.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        manifests[index] = Some(result);
    }

    let mut packages = Vec::with_capacity(dirs.len());
    for (dir, manifest) in dirs.into_iter().zip(manifests) {
        if let Some(manifest) = manifest {
            let package = PackageMetadata::new(dir, manifest?);
            tracing::debug!(name = %package.name, dir = %package.dir_name, "discovered package");
            packages.push(package);
        }
    }

    WorkspaceSnapshot::from_packages(packages)
}

async fn list_package_dirs(packages_dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let list_error = |source| ManifestError::ListPackages {
        path: packages_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(packages_dir).await.map_err(list_error)?;
    let mut dirs = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
        let file_type = entry.file_type().await.map_err(list_error)?;
        if file_type.is_dir() {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}
