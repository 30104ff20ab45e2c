//! DDMS versions
//!
//! Every structural and vocabulary rule in this crate is a pure function of a
//! [`DdmsVersion`] and a field identifier. The process-wide "current" version kept
//! here is only a default for [`crate::config::Context::current`]; validation
//! itself always receives its version explicitly.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

/// A supported revision of the DDMS standard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DdmsVersion {
    /// DDMS 2.0
    #[serde(rename = "2.0")]
    V2_0,
    /// DDMS 3.0
    #[serde(rename = "3.0")]
    V3_0,
    /// DDMS 3.1
    #[serde(rename = "3.1")]
    V3_1,
    /// DDMS 4.0.1
    #[serde(rename = "4.0.1")]
    V4_0_1,
    /// DDMS 4.1
    #[serde(rename = "4.1")]
    V4_1,
    /// DDMS 5.0
    #[default]
    #[serde(rename = "5.0")]
    V5_0,
}

static CURRENT: Lazy<RwLock<DdmsVersion>> = Lazy::new(|| RwLock::new(DdmsVersion::default()));

impl DdmsVersion {
    /// All supported versions, oldest first
    pub const ALL: [DdmsVersion; 6] = [
        DdmsVersion::V2_0,
        DdmsVersion::V3_0,
        DdmsVersion::V3_1,
        DdmsVersion::V4_0_1,
        DdmsVersion::V4_1,
        DdmsVersion::V5_0,
    ];

    /// Parse a version string such as `"4.0.1"`
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "2.0" => Ok(DdmsVersion::V2_0),
            "3.0" => Ok(DdmsVersion::V3_0),
            "3.1" => Ok(DdmsVersion::V3_1),
            "4.0.1" => Ok(DdmsVersion::V4_0_1),
            "4.1" => Ok(DdmsVersion::V4_1),
            "5.0" => Ok(DdmsVersion::V5_0),
            other => Err(Error::Configuration(format!(
                "Unsupported DDMS version: {}",
                other
            ))),
        }
    }

    /// Get the version as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DdmsVersion::V2_0 => "2.0",
            DdmsVersion::V3_0 => "3.0",
            DdmsVersion::V3_1 => "3.1",
            DdmsVersion::V4_0_1 => "4.0.1",
            DdmsVersion::V4_1 => "4.1",
            DdmsVersion::V5_0 => "5.0",
        }
    }

    /// True if this version is `threshold` or newer
    pub fn is_at_least(&self, threshold: DdmsVersion) -> bool {
        *self >= threshold
    }

    /// The version immediately before this one, if any
    pub fn previous(&self) -> Option<DdmsVersion> {
        let idx = Self::ALL.iter().position(|v| v == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Resolve a DDMS namespace URI to a version.
    ///
    /// 4.0.1 and 4.1 share a namespace; the newer version is returned.
    pub fn for_namespace(uri: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .rev()
            .find(|v| v.namespaces().ddms == uri)
            .copied()
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "Unsupported DDMS namespace: {}",
                    uri
                ))
            })
    }

    /// The process-wide default version
    pub fn current() -> DdmsVersion {
        match CURRENT.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Switch the process-wide default version, returning the previous one
    pub fn set_current(version: DdmsVersion) -> DdmsVersion {
        let mut guard = match CURRENT.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = *guard;
        *guard = version;
        log::debug!("Default DDMS version switched from {} to {}", previous, version);
        previous
    }
}

impl fmt::Display for DdmsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DdmsVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DdmsVersion::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(DdmsVersion::V2_0 < DdmsVersion::V3_0);
        assert!(DdmsVersion::V4_0_1 < DdmsVersion::V4_1);
        assert!(DdmsVersion::V4_1.is_at_least(DdmsVersion::V4_0_1));
        assert!(!DdmsVersion::V3_0.is_at_least(DdmsVersion::V3_1));
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!(DdmsVersion::from_str("4.0.1").unwrap(), DdmsVersion::V4_0_1);
        assert_eq!("3.1".parse::<DdmsVersion>().unwrap(), DdmsVersion::V3_1);
        assert!(matches!(
            DdmsVersion::from_str("1.4"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_previous() {
        assert_eq!(DdmsVersion::V2_0.previous(), None);
        assert_eq!(DdmsVersion::V4_1.previous(), Some(DdmsVersion::V4_0_1));
    }

    #[test]
    fn test_for_namespace_prefers_newest() {
        assert_eq!(
            DdmsVersion::for_namespace("urn:us:mil:ces:metadata:ddms:4").unwrap(),
            DdmsVersion::V4_1
        );
        assert_eq!(
            DdmsVersion::for_namespace("http://metadata.dod.mil/mdr/ns/DDMS/2.0/").unwrap(),
            DdmsVersion::V2_0
        );
        assert!(DdmsVersion::for_namespace("http://example.com").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for version in DdmsVersion::ALL {
            assert_eq!(DdmsVersion::from_str(&version.to_string()).unwrap(), version);
        }
    }
}
