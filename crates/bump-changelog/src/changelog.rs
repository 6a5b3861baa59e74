use bump_version::tag_for_version;
use chrono::NaiveDate;
use semver::Version;

use crate::forge::RepositoryInfo;
use crate::format::{UNRELEASED, format_link, format_version_header, new_changelog};

const SECTION_PREFIX: &str = "## [";

/// Line-oriented view of a Keep a Changelog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    lines: Vec<String>,
}

impl Default for Changelog {
    fn default() -> Self {
        Self::parse(&new_changelog())
    }
}

impl Changelog {
    /// Blank input yields a fresh changelog.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }

        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Released versions in document order, newest first in a well-kept file.
    #[must_use]
    pub fn versions(&self) -> Vec<Version> {
        self.lines
            .iter()
            .filter_map(|line| section_label(line))
            .filter_map(|label| Version::parse(label).ok())
            .collect()
    }

    #[must_use]
    pub fn has_version(&self, version: &Version) -> bool {
        self.versions().contains(version)
    }

    /// Adds an empty Unreleased section above the first section if none exists.
    pub fn ensure_unreleased(&mut self) {
        if self.unreleased_index().is_some() {
            return;
        }

        let at = self
            .lines
            .iter()
            .position(|line| section_label(line).is_some())
            .or_else(|| self.lines.iter().position(|line| is_link_definition(line)))
            .unwrap_or(self.lines.len());

        let mut block = Vec::with_capacity(3);
        if at > 0 && !self.lines[at - 1].trim().is_empty() {
            block.push(String::new());
        }
        block.push(format!("{SECTION_PREFIX}{UNRELEASED}]"));
        if at < self.lines.len() {
            block.push(String::new());
        }

        self.lines.splice(at..at, block);
    }

    /// Turns the Unreleased entries into the `version` section and leaves an
    /// empty Unreleased section above it. Returns `false` if `version` is
    /// already present.
    pub fn promote_unreleased(&mut self, version: &Version, date: NaiveDate) -> bool {
        if self.has_version(version) {
            return false;
        }

        self.ensure_unreleased();
        let Some(unreleased) = self.unreleased_index() else {
            return false;
        };

        self.lines.splice(
            unreleased + 1..unreleased + 1,
            [String::new(), format_version_header(version, date)],
        );
        true
    }

    /// Points the Unreleased link at `version...HEAD` and sets the link of
    /// `version` to a comparison with the release below it, or to the tag
    /// itself for a first release.
    pub fn update_links(&mut self, repository: &RepositoryInfo, version: &Version) {
        let tag = tag_for_version(version);

        let versions = self.versions();
        let previous = versions
            .iter()
            .skip_while(|v| *v != version)
            .nth(1);

        let unreleased_link = format_link(UNRELEASED, &repository.comparison_url(&tag, "HEAD"));
        let version_url = previous.map_or_else(
            || repository.tag_url(&tag),
            |previous| repository.comparison_url(&tag_for_version(previous), &tag),
        );
        let version_link = format_link(&version.to_string(), &version_url);

        let unreleased_at = if let Some(at) = self.link_index(UNRELEASED) {
            self.lines[at] = unreleased_link;
            at
        } else {
            if self
                .lines
                .last()
                .is_some_and(|line| !line.trim().is_empty() && !is_link_definition(line))
            {
                self.lines.push(String::new());
            }
            self.lines.push(unreleased_link);
            self.lines.len() - 1
        };

        if let Some(at) = self.link_index(&version.to_string()) {
            self.lines[at] = version_link;
        } else {
            self.lines.insert(unreleased_at + 1, version_link);
        }
    }

    fn unreleased_index(&self) -> Option<usize> {
        self.lines.iter().position(|line| {
            section_label(line).is_some_and(|label| label.eq_ignore_ascii_case(UNRELEASED))
        })
    }

    fn link_index(&self, label: &str) -> Option<usize> {
        self.lines.iter().position(|line| {
            line.strip_prefix('[')
                .and_then(|rest| rest.split_once("]:"))
                .is_some_and(|(found, _)| found.eq_ignore_ascii_case(label))
        })
    }
}

fn section_label(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(SECTION_PREFIX)?;
    rest.split_once(']').map(|(label, _)| label.trim())
}

fn is_link_definition(line: &str) -> bool {
    line.starts_with('[') && line.contains("]: ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn github() -> RepositoryInfo {
        RepositoryInfo::from_url("https://github.com/acme/widgets").expect("valid url")
    }

    const EXISTING: &str = "\
# Changelog

## [Unreleased]

### Fixed

- Crash on empty input

## [1.1.0] - 2025-01-10

### Added

- Widgets

## [1.0.0] - 2024-12-01

[Unreleased]: https://github.com/acme/widgets/compare/v1.1.0...HEAD
[1.1.0]: https://github.com/acme/widgets/compare/v1.0.0...v1.1.0
[1.0.0]: https://github.com/acme/widgets/releases/tag/v1.0.0
";

    #[test]
    fn versions_are_listed_in_document_order() {
        let changelog = Changelog::parse(EXISTING);
        assert_eq!(
            changelog.versions(),
            vec![Version::new(1, 1, 0), Version::new(1, 0, 0)]
        );
    }

    #[test]
    fn promotion_moves_unreleased_entries_under_new_version() {
        let mut changelog = Changelog::parse(EXISTING);

        assert!(changelog.promote_unreleased(&Version::new(2, 0, 0), date()));

        let text = changelog.render();
        assert!(text.contains(
            "## [Unreleased]\n\n## [2.0.0] - 2025-06-01\n\n### Fixed\n\n- Crash on empty input\n\n## [1.1.0]"
        ));
    }

    #[test]
    fn promotion_skips_existing_version() {
        let mut changelog = Changelog::parse(EXISTING);

        assert!(!changelog.promote_unreleased(&Version::new(1, 1, 0), date()));
        assert_eq!(changelog.render(), EXISTING);
    }

    #[test]
    fn links_are_rewritten_and_added() {
        let mut changelog = Changelog::parse(EXISTING);
        let version = Version::new(2, 0, 0);
        changelog.promote_unreleased(&version, date());

        changelog.update_links(&github(), &version);

        let text = changelog.render();
        assert!(text.ends_with(
            "[Unreleased]: https://github.com/acme/widgets/compare/v2.0.0...HEAD\n\
             [2.0.0]: https://github.com/acme/widgets/compare/v1.1.0...v2.0.0\n\
             [1.1.0]: https://github.com/acme/widgets/compare/v1.0.0...v1.1.0\n\
             [1.0.0]: https://github.com/acme/widgets/releases/tag/v1.0.0\n"
        ));
    }

    #[test]
    fn first_release_links_to_tag() {
        let mut changelog = Changelog::parse("# Changelog\n\n## [Unreleased]\n\n- Initial\n");
        let version = Version::new(1, 0, 0);
        changelog.promote_unreleased(&version, date());

        changelog.update_links(&github(), &version);

        assert_eq!(
            changelog.render(),
            "# Changelog\n\n## [Unreleased]\n\n## [1.0.0] - 2025-06-01\n\n- Initial\n\n\
             [Unreleased]: https://github.com/acme/widgets/compare/v1.0.0...HEAD\n\
             [1.0.0]: https://github.com/acme/widgets/releases/tag/v1.0.0\n"
        );
    }

    #[test]
    fn unreleased_is_inserted_before_link_block_when_no_sections() {
        let mut changelog =
            Changelog::parse("# Changelog\n[1.0.0]: https://example.com/acme/widgets\n");

        changelog.ensure_unreleased();

        assert_eq!(
            changelog.render(),
            "# Changelog\n\n## [Unreleased]\n\n[1.0.0]: https://example.com/acme/widgets\n"
        );
    }

    #[test]
    fn lowercase_unreleased_heading_is_recognised() {
        let mut changelog = Changelog::parse("# Changelog\n\n## [unreleased]\n");
        changelog.ensure_unreleased();
        assert_eq!(changelog.render(), "# Changelog\n\n## [unreleased]\n");
    }
}
