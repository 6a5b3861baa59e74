use std::path::Path;

use semver::Version;

use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct ChangelogRequest<'a> {
    /// Current file contents; empty when the file does not exist yet.
    pub existing: &'a str,
    pub version: &'a Version,
    pub release_candidate: bool,
    pub package_dir: &'a Path,
    pub repository_url: Option<&'a str>,
}

/// Produces replacement changelog text. Reading and writing the file is the caller's job.
pub trait ChangelogFormatter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the request cannot be rendered, e.g. an unusable repository URL.
    fn format(&self, request: &ChangelogRequest<'_>) -> Result<String>;
}
