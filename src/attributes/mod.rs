//! Attribute groups
//!
//! An attribute group is a bundle of attributes in one vocabulary that can be
//! attached to many unrelated components. Groups are plain values: an owning
//! component always has one, and absence is the empty group.
//!
//! - [`SecurityAttributes`]: ISM classification and dissemination markings
//! - [`NoticeAttributes`]: ISM notice markings (DDMS 4.0.1 and later)
//! - [`SrsAttributes`]: GML spatial reference system attributes
//! - [`ExtensibleAttributes`]: foreign-namespace attributes passed through as-is

mod extensible;
mod notice;
mod security;
mod srs;

pub use extensible::{ExtensibleAttribute, ExtensibleAttributes, ExtensibleAttributesBuilder};
pub use notice::{NoticeAttributes, NoticeAttributesBuilder};
pub use security::{SecurityAttributes, SecurityAttributesBuilder};
pub use srs::{SrsAttributes, SrsAttributesBuilder};

use crate::config::Context;
use crate::converters::OutputFormat;
use crate::documents::Element;
use crate::error::Result;
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// Behavior common to all attribute groups
pub trait AttributeGroup {
    /// True when no attribute is set
    fn is_empty(&self) -> bool;

    /// Check lexical forms, version windows and vocabularies.
    ///
    /// Returns the vocabulary warnings produced under the warning policy.
    fn validate(&self, ctx: &Context) -> Result<Vec<ValidationMessage>>;

    /// Write the group's attributes onto `element`
    fn add_to(&self, element: &mut Element, ctx: &Context) -> Result<()>;

    /// Flat HTML/Text rendering; names are `prefix` + attribute name
    fn output(&self, format: OutputFormat, prefix: &str) -> String;

    /// JSON rendering
    fn to_json_map(&self) -> Map<String, JsonValue>;

    /// Warnings from a group already known to be valid
    fn warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        self.validate(ctx).unwrap_or_default()
    }
}
