use std::fmt;
use std::str::FromStr;

use bump_core::ReleaseType;
use semver::Version;

use crate::error::{Result, VersionError};
use crate::parse_version;

/// What the caller asked for: an increment class or a verbatim target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpSpec {
    Release(ReleaseType),
    Explicit(Version),
}

impl BumpSpec {
    /// Builds a spec from the two mutually exclusive run inputs.
    ///
    /// Blank strings count as absent, which is how CI systems pass unset inputs.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::AmbiguousBump`] if both or neither input is
    /// supplied or the release type is not a known token, and
    /// [`VersionError::InvalidVersion`] if the release version does not parse.
    pub fn from_inputs(release_type: Option<&str>, release_version: Option<&str>) -> Result<Self> {
        let release_type = release_type.map(str::trim).filter(|s| !s.is_empty());
        let release_version = release_version.map(str::trim).filter(|s| !s.is_empty());

        match (release_type, release_version) {
            (Some(_), Some(_)) => Err(VersionError::AmbiguousBump {
                reason: "both a release type and a release version were supplied".to_string(),
            }),
            (None, None) => Err(VersionError::AmbiguousBump {
                reason: "neither a release type nor a release version was supplied".to_string(),
            }),
            (Some(token), None) => token
                .parse::<ReleaseType>()
                .map(Self::Release)
                .map_err(|e| VersionError::AmbiguousBump {
                    reason: e.to_string(),
                }),
            (None, Some(version)) => parse_version(version).map(Self::Explicit),
        }
    }

    #[must_use]
    pub fn release_type(&self) -> Option<ReleaseType> {
        match self {
            Self::Release(release_type) => Some(*release_type),
            Self::Explicit(_) => None,
        }
    }
}

impl FromStr for BumpSpec {
    type Err = VersionError;

    /// Accepts either a release-type token or an explicit version.
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(release_type) = s.parse::<ReleaseType>() {
            return Ok(Self::Release(release_type));
        }

        Version::parse(s)
            .map(Self::Explicit)
            .map_err(|_| VersionError::AmbiguousBump {
                reason: format!("'{s}' is neither a release type nor a valid version"),
            })
    }
}

impl fmt::Display for BumpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release(release_type) => write!(f, "{release_type}"),
            Self::Explicit(version) => write!(f, "{version}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_inputs_accepts_release_type() {
        let spec = BumpSpec::from_inputs(Some("minor"), None).expect("valid");
        assert_eq!(spec, BumpSpec::Release(ReleaseType::Minor));
    }

    #[test]
    fn from_inputs_accepts_explicit_version() {
        let spec = BumpSpec::from_inputs(None, Some("2.0.0")).expect("valid");
        assert_eq!(spec, BumpSpec::Explicit(Version::new(2, 0, 0)));
    }

    #[test]
    fn from_inputs_treats_blank_as_absent() {
        let spec = BumpSpec::from_inputs(Some("  "), Some("1.4.0")).expect("valid");
        assert_eq!(spec, BumpSpec::Explicit(Version::new(1, 4, 0)));
    }

    #[test]
    fn from_inputs_rejects_both() {
        let result = BumpSpec::from_inputs(Some("major"), Some("2.0.0"));
        assert!(matches!(result, Err(VersionError::AmbiguousBump { .. })));
    }

    #[test]
    fn from_inputs_rejects_neither() {
        let result = BumpSpec::from_inputs(None, Some(""));
        assert!(matches!(result, Err(VersionError::AmbiguousBump { .. })));
    }

    #[test]
    fn from_inputs_rejects_unknown_release_type() {
        let result = BumpSpec::from_inputs(Some("mega"), None);
        assert!(matches!(result, Err(VersionError::AmbiguousBump { .. })));
    }

    #[test]
    fn from_inputs_rejects_malformed_version() {
        let result = BumpSpec::from_inputs(None, Some("2.0"));
        assert!(matches!(result, Err(VersionError::InvalidVersion { .. })));
    }

    #[test]
    fn from_str_prefers_release_type() {
        assert_eq!(
            "patch".parse::<BumpSpec>().expect("valid"),
            BumpSpec::Release(ReleaseType::Patch)
        );
        assert_eq!(
            "3.1.4".parse::<BumpSpec>().expect("valid"),
            BumpSpec::Explicit(Version::new(3, 1, 4))
        );
    }

    #[test]
    fn from_str_rejects_prefixed_version() {
        let result = "v3.1.4".parse::<BumpSpec>();
        assert!(matches!(result, Err(VersionError::AmbiguousBump { .. })));
    }
}
