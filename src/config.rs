//! Validation context and configuration
//!
//! A [`Context`] is the immutable bundle every constructor, `validate`, `commit`
//! and render call receives: the target DDMS version, the controlled-vocabulary
//! policy, the namespace prefixes used when building elements, and output
//! settings. Contexts are cheap to clone and safe to share across threads, so
//! two versions can be validated concurrently.

use crate::error::{Error, Result};
use crate::names;
use crate::namespaces::Vocab;
use crate::versions::DdmsVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How controlled-vocabulary mismatches are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvePolicy {
    /// A value outside its vocabulary is a hard validation failure
    #[default]
    Error,
    /// A value outside its vocabulary produces a warning
    Warning,
}

impl CvePolicy {
    /// Parse policy from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "error" => Ok(CvePolicy::Error),
            "warning" => Ok(CvePolicy::Warning),
            _ => Err(Error::Configuration(format!(
                "Invalid CVE policy: '{}'. Must be 'error' or 'warning'",
                s
            ))),
        }
    }

    /// Get the policy as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CvePolicy::Error => "error",
            CvePolicy::Warning => "warning",
        }
    }
}

impl fmt::Display for CvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Namespace prefixes used when building elements from raw values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefixes {
    /// DDMS prefix
    pub ddms: String,
    /// ISM prefix
    pub ism: String,
    /// NTK prefix
    pub ntk: String,
    /// GML prefix
    pub gml: String,
    /// XLink prefix
    pub xlink: String,
    /// VIRT prefix
    pub virt: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            ddms: "ddms".to_string(),
            ism: "ISM".to_string(),
            ntk: "ntk".to_string(),
            gml: "gml".to_string(),
            xlink: "xlink".to_string(),
            virt: "virt".to_string(),
        }
    }
}

impl Prefixes {
    /// The prefix configured for a vocabulary
    pub fn get(&self, vocab: Vocab) -> &str {
        match vocab {
            Vocab::Ddms => &self.ddms,
            Vocab::Ism => &self.ism,
            Vocab::Ntk => &self.ntk,
            Vocab::Gml => &self.gml,
            Vocab::Xlink => &self.xlink,
            Vocab::Virt => &self.virt,
        }
    }

    fn slot(&mut self, vocab: Vocab) -> &mut String {
        match vocab {
            Vocab::Ddms => &mut self.ddms,
            Vocab::Ism => &mut self.ism,
            Vocab::Ntk => &mut self.ntk,
            Vocab::Gml => &mut self.gml,
            Vocab::Xlink => &mut self.xlink,
            Vocab::Virt => &mut self.virt,
        }
    }
}

/// When nested output names carry an index suffix such as `[1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexLevel {
    /// Never index
    #[default]
    Never,
    /// Index only when a parent holds more than one child of the same kind
    WhenMultiple,
    /// Always index
    Always,
}

impl IndexLevel {
    /// Parse the numeric property form (`0`, `1`, `2`)
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(IndexLevel::Never),
            "1" => Ok(IndexLevel::WhenMultiple),
            "2" => Ok(IndexLevel::Always),
            _ => Err(Error::Configuration(format!(
                "Invalid output.indexLevel: '{}'. Must be 0, 1, or 2",
                s
            ))),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Index suffix policy for nested HTML/Text names
    pub index_level: IndexLevel,
    /// Pretty-print JSON output
    pub json_pretty_print: bool,
}

/// Immutable validation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Target DDMS version
    pub version: DdmsVersion,
    /// Controlled vocabulary policy
    pub cve_policy: CvePolicy,
    /// Prefixes for built elements
    pub prefixes: Prefixes,
    /// Output settings
    pub output: OutputConfig,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DdmsVersion::default())
    }
}

impl Context {
    /// Create a context for a version with default settings
    pub fn new(version: DdmsVersion) -> Self {
        Self {
            version,
            cve_policy: CvePolicy::Error,
            prefixes: Prefixes::default(),
            output: OutputConfig::default(),
        }
    }

    /// Create a context for the process-wide default version
    pub fn current() -> Self {
        Self::new(DdmsVersion::current())
    }

    /// Create a context that reports vocabulary mismatches as warnings
    pub fn lenient(version: DdmsVersion) -> Self {
        Self::new(version).with_cve_policy(CvePolicy::Warning)
    }

    /// Set the target version
    pub fn with_version(mut self, version: DdmsVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the controlled vocabulary policy
    pub fn with_cve_policy(mut self, policy: CvePolicy) -> Self {
        self.cve_policy = policy;
        self
    }

    /// Set the prefix for a vocabulary
    pub fn with_prefix(mut self, vocab: Vocab, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if !names::is_valid_ncname(&prefix) {
            return Err(Error::Configuration(format!(
                "The {} prefix \"{}\" is not a valid NCName",
                vocab.as_str(),
                prefix
            )));
        }
        *self.prefixes.slot(vocab) = prefix;
        Ok(self)
    }

    /// Set the output settings
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Resolve one vocabulary's namespace for the target version
    pub fn namespace(&self, vocab: Vocab) -> Result<&'static str> {
        self.version.namespace(vocab)
    }

    /// The configured prefix for a vocabulary
    pub fn prefix(&self, vocab: Vocab) -> &str {
        self.prefixes.get(vocab)
    }

    /// True if vocabulary mismatches are hard failures
    pub fn cve_as_errors(&self) -> bool {
        self.cve_policy == CvePolicy::Error
    }

    /// Apply a named property
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<()> {
        let vocab = match name {
            "ddms.prefix" => Some(Vocab::Ddms),
            "ism.prefix" => Some(Vocab::Ism),
            "ntk.prefix" => Some(Vocab::Ntk),
            "gml.prefix" => Some(Vocab::Gml),
            "xlink.prefix" => Some(Vocab::Xlink),
            "virt.prefix" => Some(Vocab::Virt),
            _ => None,
        };
        if let Some(vocab) = vocab {
            *self = self.clone().with_prefix(vocab, value)?;
            return Ok(());
        }

        match name {
            "icism.cve.validationAsErrors" => {
                self.cve_policy = if parse_bool(name, value)? {
                    CvePolicy::Error
                } else {
                    CvePolicy::Warning
                };
            }
            "output.indexLevel" => self.output.index_level = IndexLevel::from_str(value)?,
            "output.json.prettyPrint" => self.output.json_pretty_print = parse_bool(name, value)?,
            _ => {
                return Err(Error::Configuration(format!(
                    "{} is not a configurable property.",
                    name
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "The {} property must be true or false, not '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = Context::new(DdmsVersion::V4_1);
        assert_eq!(ctx.version, DdmsVersion::V4_1);
        assert!(ctx.cve_as_errors());
        assert_eq!(ctx.prefix(Vocab::Ism), "ISM");
        assert_eq!(ctx.output.index_level, IndexLevel::Never);
    }

    #[test]
    fn test_lenient_context() {
        let ctx = Context::lenient(DdmsVersion::V3_0);
        assert!(!ctx.cve_as_errors());
    }

    #[test]
    fn test_cve_policy_from_str() {
        assert_eq!(CvePolicy::from_str("error").unwrap(), CvePolicy::Error);
        assert_eq!(CvePolicy::from_str("warning").unwrap(), CvePolicy::Warning);
        assert!(CvePolicy::from_str("lax").is_err());
        assert_eq!(CvePolicy::Warning.to_string(), "warning");
    }

    #[test]
    fn test_set_property() {
        let mut ctx = Context::new(DdmsVersion::V5_0);
        ctx.set_property("ddms.prefix", "d").unwrap();
        ctx.set_property("icism.cve.validationAsErrors", "false").unwrap();
        ctx.set_property("output.indexLevel", "2").unwrap();
        ctx.set_property("output.json.prettyPrint", "true").unwrap();

        assert_eq!(ctx.prefix(Vocab::Ddms), "d");
        assert_eq!(ctx.cve_policy, CvePolicy::Warning);
        assert_eq!(ctx.output.index_level, IndexLevel::Always);
        assert!(ctx.output.json_pretty_print);
    }

    #[test]
    fn test_set_property_errors() {
        let mut ctx = Context::new(DdmsVersion::V5_0);
        assert!(matches!(
            ctx.set_property("unknown.property", "x"),
            Err(Error::Configuration(_))
        ));
        assert!(ctx.set_property("ism.prefix", "1bad").is_err());
        assert!(ctx.set_property("output.indexLevel", "3").is_err());
        assert!(ctx.set_property("icism.cve.validationAsErrors", "yes").is_err());
        assert_eq!(ctx.prefix(Vocab::Ism), "ISM");
    }
}
