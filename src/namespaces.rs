//! XML namespace handling
//!
//! This module provides qualified names (QNames), prefix mappings, and the
//! per-version namespace table for DDMS and its auxiliary vocabularies.

use crate::error::{Error, Result};
use crate::versions::DdmsVersion;
use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// XLink namespace, identical in every version
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// True if this name has the given namespace and local name
    pub fn matches(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }
}

/// Stack of in-scope namespace declarations, innermost last
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    frames: Vec<NamespaceContext>,
}

impl NamespaceScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element carrying the given declarations
    pub fn push(&mut self, frame: NamespaceContext) {
        self.frames.push(frame);
    }

    /// Leave the innermost element
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve a prefix (or the default namespace when `prefix` is `None`)
    pub fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match prefix {
            Some(p) => frame.get_namespace(p),
            None => frame.get_default_namespace(),
        })
    }
}

/// The vocabularies a DDMS document draws its names from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocab {
    /// The DDMS namespace itself
    Ddms,
    /// Intelligence Community security markings
    Ism,
    /// Need-To-Know access controls
    Ntk,
    /// Geography Markup Language
    Gml,
    /// XLink
    Xlink,
    /// Virtual Coverage
    Virt,
}

impl Vocab {
    /// Name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Vocab::Ddms => "DDMS",
            Vocab::Ism => "ISM",
            Vocab::Ntk => "NTK",
            Vocab::Gml => "GML",
            Vocab::Xlink => "XLink",
            Vocab::Virt => "VIRT",
        }
    }
}

/// The namespace URIs in force for one DDMS version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    /// DDMS namespace
    pub ddms: &'static str,
    /// ISM namespace
    pub ism: &'static str,
    /// NTK namespace, absent before 4.1
    pub ntk: Option<&'static str>,
    /// GML namespace
    pub gml: &'static str,
    /// VIRT namespace, absent in 2.0
    pub virt: Option<&'static str>,
}

impl Namespaces {
    /// Look up a vocabulary's namespace, failing if this version lacks it
    pub fn get(&self, vocab: Vocab) -> Result<&'static str> {
        let uri = match vocab {
            Vocab::Ddms => Some(self.ddms),
            Vocab::Ism => Some(self.ism),
            Vocab::Ntk => self.ntk,
            Vocab::Gml => Some(self.gml),
            Vocab::Xlink => Some(XLINK_NAMESPACE),
            Vocab::Virt => self.virt,
        };
        uri.ok_or_else(|| {
            Error::Configuration(format!(
                "The {} namespace is not defined for this DDMS version",
                vocab.as_str()
            ))
        })
    }

    /// Identify which vocabulary a namespace URI belongs to
    pub fn vocab_of(&self, uri: &str) -> Option<Vocab> {
        [
            Vocab::Ddms,
            Vocab::Ism,
            Vocab::Ntk,
            Vocab::Gml,
            Vocab::Xlink,
            Vocab::Virt,
        ]
        .into_iter()
        .find(|v| self.get(*v).map(|ns| ns == uri).unwrap_or(false))
    }
}

const GML_2: &str = "http://www.opengis.net/gml";
const GML_32: &str = "http://www.opengis.net/gml/3.2";
const ISM: &str = "urn:us:gov:ic:ism";
const NTK: &str = "urn:us:gov:ic:ntk";
const VIRT: &str = "urn:us:gov:ic:virt";

impl DdmsVersion {
    /// The namespace table for this version
    pub fn namespaces(&self) -> Namespaces {
        match self {
            DdmsVersion::V2_0 => Namespaces {
                ddms: "http://metadata.dod.mil/mdr/ns/DDMS/2.0/",
                ism: "urn:us:gov:ic:ism:v2",
                ntk: None,
                gml: GML_2,
                virt: None,
            },
            DdmsVersion::V3_0 => Namespaces {
                ddms: "http://metadata.dod.mil/mdr/ns/DDMS/3.0/",
                ism: ISM,
                ntk: None,
                gml: GML_32,
                virt: Some(VIRT),
            },
            DdmsVersion::V3_1 => Namespaces {
                ddms: "http://metadata.dod.mil/mdr/ns/DDMS/3.1/",
                ism: ISM,
                ntk: None,
                gml: GML_32,
                virt: Some(VIRT),
            },
            DdmsVersion::V4_0_1 => Namespaces {
                ddms: "urn:us:mil:ces:metadata:ddms:4",
                ism: ISM,
                ntk: None,
                gml: GML_32,
                virt: Some(VIRT),
            },
            DdmsVersion::V4_1 => Namespaces {
                ddms: "urn:us:mil:ces:metadata:ddms:4",
                ism: ISM,
                ntk: Some(NTK),
                gml: GML_32,
                virt: Some(VIRT),
            },
            DdmsVersion::V5_0 => Namespaces {
                ddms: "urn:us:mil:ces:metadata:ddms:5",
                ism: ISM,
                ntk: Some(NTK),
                gml: GML_32,
                virt: Some(VIRT),
            },
        }
    }

    /// Resolve one vocabulary's namespace for this version
    pub fn namespace(&self, vocab: Vocab) -> Result<&'static str> {
        self.namespaces().get(vocab)
    }
}
