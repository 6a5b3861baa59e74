use std::sync::Arc;

use bump_manifest::{PackageManifest, WorkspaceSnapshot};
use indexmap::IndexSet;
use tokio::task::JoinSet;

use crate::error::{OperationError, Result};
use crate::traits::ChangeDetector;
use crate::types::UpdateSpecification;

/// Names of the packages a run updates, in snapshot order.
///
/// Synchronizing runs take every package without consulting `detector`.
/// Otherwise packages are checked concurrently and the first failure in
/// snapshot order is returned.
///
/// # Errors
///
/// Returns `OperationError::NoPackagesToUpdate` if nothing qualifies, or the
/// first error reported by `detector`.
pub async fn get_packages_to_update<D>(
    snapshot: &WorkspaceSnapshot,
    synchronize_versions: bool,
    detector: Arc<D>,
) -> Result<IndexSet<String>>
where
    D: ChangeDetector + 'static,
{
    if synchronize_versions {
        tracing::debug!(count = snapshot.len(), "synchronizing every package");
        return non_empty(snapshot.names().map(str::to_string).collect());
    }

    let mut tasks = JoinSet::new();
    for (index, package) in snapshot.packages().cloned().enumerate() {
        let detector = Arc::clone(&detector);
        tasks.spawn(async move {
            let changed = detector.did_package_change(&package).await;
            (index, changed)
        });
    }

    let mut results: Vec<Option<Result<bool>>> =
        std::iter::repeat_with(|| None).take(snapshot.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, changed) = joined?;
        results[index] = Some(changed);
    }

    let mut selected = IndexSet::new();
    for (name, changed) in snapshot.names().zip(results) {
        if changed.transpose()?.unwrap_or(false) {
            selected.insert(name.to_string());
        }
    }

    non_empty(selected)
}

fn non_empty(selected: IndexSet<String>) -> Result<IndexSet<String>> {
    if selected.is_empty() {
        return Err(OperationError::NoPackagesToUpdate);
    }
    Ok(selected)
}

/// New content for one manifest. Pure; applying it twice gives the same result.
///
/// The version is always replaced. When synchronizing, dependency entries that
/// name an updated package get `^<new version>`; nothing else changes.
#[must_use]
pub fn plan_manifest_update(manifest: &PackageManifest, spec: &UpdateSpecification) -> PackageManifest {
    let updated = manifest.with_version(&spec.new_version);
    if !spec.synchronize_versions {
        return updated;
    }

    let range = spec.synchronized_range();
    updated.map_dependency_ranges(|_, dependency, _| {
        spec.packages_to_update
            .contains(dependency)
            .then(|| range.clone())
    })
}
