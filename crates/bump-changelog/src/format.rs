use chrono::NaiveDate;
use semver::Version;

use crate::changelog::Changelog;
use crate::forge::RepositoryInfo;

/// Label of the section collecting changes not yet released.
pub const UNRELEASED: &str = "Unreleased";

const CHANGELOG_HEADER: &str = r"# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

## [Unreleased]
";

#[must_use]
pub fn new_changelog() -> String {
    CHANGELOG_HEADER.to_string()
}

#[must_use]
pub fn format_version_header(version: &Version, date: NaiveDate) -> String {
    format!("## [{version}] - {date}")
}

#[must_use]
pub fn format_link(label: &str, url: &str) -> String {
    format!("[{label}]: {url}")
}

/// Produces the changelog text for a new version.
///
/// With `promote` set, the Unreleased section becomes the `version` section and
/// links are refreshed when `repository` is known. Without it, the text only
/// gains an Unreleased section if it lacked one. Running it again on its own
/// output changes nothing.
#[must_use]
pub fn release_changelog(
    existing: &str,
    version: &Version,
    date: NaiveDate,
    promote: bool,
    repository: Option<&RepositoryInfo>,
) -> String {
    let mut changelog = Changelog::parse(existing);

    if promote {
        changelog.promote_unreleased(version, date);
        if let Some(repository) = repository {
            changelog.update_links(repository, version);
        }
    } else {
        changelog.ensure_unreleased();
    }

    changelog.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[test]
    fn new_changelog_starts_with_unreleased() {
        let text = new_changelog();
        assert!(text.starts_with("# Changelog\n"));
        assert!(text.ends_with("## [Unreleased]\n"));
    }

    #[test]
    fn version_header_includes_iso_date() {
        assert_eq!(
            format_version_header(&Version::new(2, 0, 0), date()),
            "## [2.0.0] - 2025-03-14"
        );
    }

    #[test]
    fn empty_input_is_promoted_into_fresh_changelog() {
        let text = release_changelog("", &Version::new(1, 0, 0), date(), true, None);

        assert!(text.starts_with("# Changelog\n"));
        assert!(text.contains("## [Unreleased]\n\n## [1.0.0] - 2025-03-14\n"));
    }

    #[test]
    fn without_promotion_only_unreleased_is_guaranteed() {
        let existing = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\n- first\n";

        let text = release_changelog(existing, &Version::new(2, 0, 0), date(), false, None);

        assert_eq!(
            text,
            "# Changelog\n\n## [Unreleased]\n\n## [1.0.0] - 2024-01-01\n\n- first\n"
        );
    }

    #[test]
    fn promotion_is_idempotent() {
        let repository = RepositoryInfo::from_url("https://github.com/acme/widgets")
            .expect("valid url");
        let existing = "# Changelog\n\n## [Unreleased]\n\n- change\n";

        let once = release_changelog(existing, &Version::new(1, 1, 0), date(), true, Some(&repository));
        let twice = release_changelog(&once, &Version::new(1, 1, 0), date(), true, Some(&repository));

        assert_eq!(once, twice);
    }
}
