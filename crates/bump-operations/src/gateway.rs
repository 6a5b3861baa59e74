use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bump_version::parse_tag;
use tokio::sync::OnceCell;

use crate::error::{OperationError, Result};
use crate::traits::GitProvider;
use crate::types::TagSet;

type DiffKey = (String, PathBuf);
type DiffCell = Arc<OnceCell<Arc<[PathBuf]>>>;

/// Release history of one workspace for the duration of one run.
///
/// The tag list is fetched on first use and diffs are computed at most once
/// per `(tag, scope)`, even when requested concurrently.
pub struct HistoryGateway<G> {
    provider: Arc<G>,
    root: PathBuf,
    allow_untagged: bool,
    tags: OnceCell<TagSet>,
    diffs: Mutex<HashMap<DiffKey, DiffCell>>,
}

impl<G> HistoryGateway<G>
where
    G: GitProvider + 'static,
{
    pub fn new(provider: Arc<G>, root: PathBuf, allow_untagged: bool) -> Self {
        Self {
            provider,
            root,
            allow_untagged,
            tags: OnceCell::new(),
            diffs: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists release tags once per run.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::ShallowHistory` if there are no tags and the
    /// history is shallow, `OperationError::NoTagsFound` if there are no tags
    /// and untagged repositories are not allowed, and
    /// `OperationError::InvalidTag` if the latest tag is not a version.
    pub async fn tag_set(&self) -> Result<&TagSet> {
        self.tags.get_or_try_init(|| self.load_tags()).await
    }

    async fn load_tags(&self) -> Result<TagSet> {
        let provider = Arc::clone(&self.provider);
        let root = self.root.clone();
        let tags = tokio::task::spawn_blocking(move || provider.list_tags(&root)).await??;

        let Some(latest) = tags.last() else {
            let provider = Arc::clone(&self.provider);
            let root = self.root.clone();
            let shallow = tokio::task::spawn_blocking(move || provider.is_shallow(&root)).await??;

            if shallow {
                return Err(OperationError::ShallowHistory {
                    root: self.root.clone(),
                });
            }
            if !self.allow_untagged {
                return Err(OperationError::NoTagsFound {
                    root: self.root.clone(),
                });
            }

            tracing::info!("repository has no tags; every package counts as changed");
            return Ok(TagSet::empty());
        };

        let latest_version = parse_tag(&latest.name).map_err(|source| OperationError::InvalidTag {
            tag: latest.name.clone(),
            source,
        })?;

        tracing::debug!(count = tags.len(), latest = %latest.name, "loaded release tags");
        Ok(TagSet::new(
            tags.into_iter().map(|tag| tag.name),
            Some(latest_version),
        ))
    }

    /// Paths changed since `tag` under `scope`, relative to the workspace root.
    ///
    /// # Errors
    ///
    /// Returns an error if the history query fails. Failures are not cached.
    pub async fn diff_since(&self, tag: &str, scope: &Path) -> Result<Arc<[PathBuf]>> {
        let cell = {
            let mut diffs = self.diffs.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                diffs
                    .entry((tag.to_string(), scope.to_path_buf()))
                    .or_default(),
            )
        };

        if let Some(paths) = cell.get() {
            tracing::debug!(tag, scope = %scope.display(), "diff cache hit");
            return Ok(Arc::clone(paths));
        }

        let paths = cell
            .get_or_try_init(|| async {
                let provider = Arc::clone(&self.provider);
                let root = self.root.clone();
                let tag = tag.to_string();
                let scope = scope.to_path_buf();

                tracing::debug!(tag = %tag, scope = %scope.display(), "computing diff");
                let changed = tokio::task::spawn_blocking(move || {
                    provider.changed_paths(&root, &tag, &scope)
                })
                .await??;

                Ok::<_, OperationError>(Arc::from(changed))
            })
            .await?;

        Ok(Arc::clone(paths))
    }
}
