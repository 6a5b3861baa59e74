use semver::Version;

use crate::error::Result;
use crate::parse_version;

/// Marker prepended to a version to form its release tag.
pub const TAG_PREFIX: &str = "v";

#[must_use]
pub fn tag_for_version(version: &Version) -> String {
    format!("{TAG_PREFIX}{version}")
}

/// Parses a release tag, tolerating a missing prefix.
///
/// # Errors
///
/// Returns [`crate::VersionError::InvalidVersion`] if the remainder is not a
/// semantic version.
pub fn parse_tag(tag: &str) -> Result<Version> {
    parse_version(tag.strip_prefix(TAG_PREFIX).unwrap_or(tag))
}
