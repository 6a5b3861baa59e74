use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bump_git::{GitError, TagInfo};
use bump_manifest::PackageMetadata;

use crate::error::{OperationError, Result};
use crate::traits::{ChangeDetector, GitProvider};

pub struct MockGitProvider {
    tags: Vec<TagInfo>,
    shallow: bool,
    changes: HashMap<String, Vec<PathBuf>>,
    list_tags_calls: AtomicUsize,
    diff_calls: Mutex<Vec<String>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            shallow: false,
            changes: HashMap::new(),
            list_tags_calls: AtomicUsize::new(0),
            diff_calls: Mutex::new(Vec::new()),
        }
    }

    /// Tags in creation order; every listed tag diffs as unchanged unless
    /// [`Self::with_changes`] says otherwise.
    #[must_use]
    pub fn with_tags(mut self, names: &[&str]) -> Self {
        for (created_at, name) in (0_i64..).zip(names) {
            self.tags.push(TagInfo {
                name: (*name).to_string(),
                target_sha: format!("{created_at:040}"),
                created_at,
            });
            self.changes.entry((*name).to_string()).or_default();
        }
        self
    }

    #[must_use]
    pub fn with_changes(mut self, tag: &str, paths: &[&str]) -> Self {
        self.changes
            .insert(tag.to_string(), paths.iter().map(PathBuf::from).collect());
        self
    }

    #[must_use]
    pub fn shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    #[must_use]
    pub fn list_tags_calls(&self) -> usize {
        self.list_tags_calls.load(Ordering::SeqCst)
    }

    /// Tags passed to `changed_paths`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn diff_calls(&self) -> Vec<String> {
        self.diff_calls.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn list_tags(&self, _root: &Path) -> Result<Vec<TagInfo>> {
        self.list_tags_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tags.clone())
    }

    fn is_shallow(&self, _root: &Path) -> Result<bool> {
        Ok(self.shallow)
    }

    fn changed_paths(&self, _root: &Path, tag: &str, scope: &Path) -> Result<Vec<PathBuf>> {
        self.diff_calls
            .lock()
            .expect("lock poisoned")
            .push(tag.to_string());

        let paths = self.changes.get(tag).ok_or_else(|| {
            OperationError::Git(GitError::RefNotFound {
                refspec: tag.to_string(),
            })
        })?;

        Ok(paths
            .iter()
            .filter(|path| path.starts_with(scope))
            .cloned()
            .collect())
    }
}

pub struct MockChangeDetector {
    changed: HashSet<String>,
    missing_tag: HashSet<String>,
    calls: AtomicUsize,
}

impl MockChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            changed: HashSet::new(),
            missing_tag: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_changed(mut self, names: &[&str]) -> Self {
        self.changed.extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    /// Packages whose detection fails with `NoCorrespondingTag`.
    #[must_use]
    pub fn with_missing_tag(mut self, names: &[&str]) -> Self {
        self.missing_tag
            .extend(names.iter().map(|name| (*name).to_string()));
        self
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeDetector for MockChangeDetector {
    async fn did_package_change(&self, package: &PackageMetadata) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.missing_tag.contains(&package.name) {
            let version = package.manifest.version_str().unwrap_or_default().to_string();
            return Err(OperationError::NoCorrespondingTag {
                package: package.name.clone(),
                tag: format!("v{version}"),
                version,
            });
        }

        Ok(self.changed.contains(&package.name))
    }
}
