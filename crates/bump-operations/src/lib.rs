mod applier;
mod detector;
mod error;
mod gateway;
pub mod operations;
mod planner;
pub mod providers;
pub mod traits;
mod types;

#[cfg(test)]
pub mod mocks;

pub use applier::{ChangelogSettings, StagedWrite, UpdateApplier, write_staged};
pub use detector::GitChangeDetector;
pub use error::{OperationError, Result};
pub use gateway::HistoryGateway;
pub use planner::{get_packages_to_update, plan_manifest_update};
pub use types::{TagSet, UpdateSpecification, WorkspaceMode};
