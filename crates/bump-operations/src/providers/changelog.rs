use bump_changelog::{RepositoryInfo, release_changelog};
use chrono::{Local, NaiveDate};

use crate::Result;
use crate::traits::{ChangelogFormatter, ChangelogRequest};

/// Default formatter: Keep a Changelog sections with forge comparison links.
pub struct KeepAChangelogFormatter {
    date: NaiveDate,
}

impl KeepAChangelogFormatter {
    /// Dates new sections with today's local date.
    #[must_use]
    pub fn new() -> Self {
        Self::with_date(Local::now().date_naive())
    }

    #[must_use]
    pub fn with_date(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Default for KeepAChangelogFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangelogFormatter for KeepAChangelogFormatter {
    fn format(&self, request: &ChangelogRequest<'_>) -> Result<String> {
        let repository = request
            .repository_url
            .map(RepositoryInfo::from_url)
            .transpose()?;

        tracing::debug!(
            package_dir = %request.package_dir.display(),
            version = %request.version,
            release_candidate = request.release_candidate,
            "formatting changelog"
        );

        Ok(release_changelog(
            request.existing,
            request.version,
            self.date,
            request.release_candidate,
            repository.as_ref(),
        ))
    }
}
