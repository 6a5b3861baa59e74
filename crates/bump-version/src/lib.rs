mod bump_spec;
mod error;
mod tag;

pub use bump_spec::BumpSpec;
pub use error::{Result, VersionError};
pub use tag::{TAG_PREFIX, parse_tag, tag_for_version};

use bump_core::ReleaseType;
use semver::{Prerelease, Version};

/// # Errors
///
/// Returns [`VersionError::InvalidVersion`] if `version` is not an unprefixed semantic version.
pub fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|source| VersionError::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

/// Resolves the version a run releases.
///
/// Explicit targets are returned verbatim; they are not required to be
/// greater than `current_version`.
///
/// # Errors
///
/// Returns [`VersionError::InvalidVersion`] if `current_version` does not parse,
/// or [`VersionError::InvalidPrereleaseIdentifier`] if `prerelease_id` is not a
/// valid pre-release identifier.
pub fn compute_new_version(
    current_version: &str,
    spec: &BumpSpec,
    prerelease_id: Option<&str>,
) -> Result<Version> {
    let current = parse_version(current_version)?;

    match spec {
        BumpSpec::Release(release_type) => bump_version(&current, *release_type, prerelease_id),
        BumpSpec::Explicit(version) => Ok(version.clone()),
    }
}

/// Increments `version` the way npm-style semver tooling does.
///
/// A pre-release of the target version graduates instead of incrementing
/// (`2.0.0-rc.1` + major is `2.0.0`).
///
/// # Errors
///
/// Returns [`VersionError::InvalidPrereleaseIdentifier`] if the resulting
/// pre-release segment is not valid.
pub fn bump_version(
    version: &Version,
    release_type: ReleaseType,
    prerelease_id: Option<&str>,
) -> Result<Version> {
    let mut new_version = Version::new(version.major, version.minor, version.patch);
    let is_prerelease = !version.pre.is_empty();

    match release_type {
        ReleaseType::Major => {
            if version.minor != 0 || version.patch != 0 || !is_prerelease {
                new_version.major += 1;
            }
            new_version.minor = 0;
            new_version.patch = 0;
        }
        ReleaseType::Minor => {
            if version.patch != 0 || !is_prerelease {
                new_version.minor += 1;
            }
            new_version.patch = 0;
        }
        ReleaseType::Patch => {
            if !is_prerelease {
                new_version.patch += 1;
            }
        }
        ReleaseType::Premajor => {
            new_version.major += 1;
            new_version.minor = 0;
            new_version.patch = 0;
            new_version.pre = increment_prerelease(&Prerelease::EMPTY, prerelease_id)?;
        }
        ReleaseType::Preminor => {
            new_version.minor += 1;
            new_version.patch = 0;
            new_version.pre = increment_prerelease(&Prerelease::EMPTY, prerelease_id)?;
        }
        ReleaseType::Prepatch => {
            new_version.patch += 1;
            new_version.pre = increment_prerelease(&Prerelease::EMPTY, prerelease_id)?;
        }
        ReleaseType::Prerelease => {
            if !is_prerelease {
                new_version.patch += 1;
            }
            new_version.pre = increment_prerelease(&version.pre, prerelease_id)?;
        }
    }

    Ok(new_version)
}

fn increment_prerelease(pre: &Prerelease, identifier: Option<&str>) -> Result<Prerelease> {
    let mut parts: Vec<String> = if pre.is_empty() {
        Vec::new()
    } else {
        pre.as_str().split('.').map(String::from).collect()
    };

    if parts.is_empty() {
        parts = match identifier {
            Some(id) => vec![id.to_string(), "0".to_string()],
            None => vec!["0".to_string()],
        };
    } else {
        let last_numeric = parts.iter_mut().rev().find_map(|part| {
            let n = part.parse::<u64>().ok()?;
            Some((part, n))
        });
        match last_numeric {
            Some((part, n)) => *part = (n + 1).to_string(),
            None => parts.push("0".to_string()),
        }

        if let Some(id) = identifier {
            let same_identifier = parts.first().is_some_and(|first| first == id)
                && parts.get(1).is_some_and(|second| second.parse::<u64>().is_ok());
            if !same_identifier {
                parts = vec![id.to_string(), "0".to_string()];
            }
        }
    }

    let joined = parts.join(".");
    Prerelease::new(&joined).map_err(|source| VersionError::InvalidPrereleaseIdentifier {
        identifier: identifier.unwrap_or(&joined).to_string(),
        source,
    })
}

/// Structural category of the move from `current` to `new`.
///
/// Returns `None` when the versions are equal (build metadata ignored).
#[must_use]
pub fn classify_transition(current: &Version, new: &Version) -> Option<ReleaseType> {
    let lands_on_prerelease = !new.pre.is_empty();

    if current.major != new.major {
        Some(if lands_on_prerelease {
            ReleaseType::Premajor
        } else {
            ReleaseType::Major
        })
    } else if current.minor != new.minor {
        Some(if lands_on_prerelease {
            ReleaseType::Preminor
        } else {
            ReleaseType::Minor
        })
    } else if current.patch != new.patch {
        Some(if lands_on_prerelease {
            ReleaseType::Prepatch
        } else {
            ReleaseType::Patch
        })
    } else if current.pre != new.pre {
        Some(ReleaseType::Prerelease)
    } else {
        None
    }
}

/// Whether a transition forces every package into lockstep.
#[must_use]
pub fn is_synchronizing_transition(category: Option<ReleaseType>) -> bool {
    category == Some(ReleaseType::Major)
}
