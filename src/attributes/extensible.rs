//! Extensible attributes
//!
//! Some components accept arbitrary attributes from foreign namespaces. These
//! are passed through without validation beyond their names: a foreign
//! attribute must have a namespace, a valid prefix, and must not reuse one of
//! the DDMS vocabularies.

use super::AttributeGroup;
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::{Element, XML_NAMESPACE};
use crate::error::{Error, Result};
use crate::names;
use crate::namespaces::XMLNS_NAMESPACE;
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// One foreign attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExtensibleAttribute {
    /// Namespace URI
    pub namespace: String,
    /// Prefix to write it with
    pub prefix: String,
    /// Local name
    pub name: String,
    /// Value
    pub value: String,
}

impl ExtensibleAttribute {
    /// Create an attribute
    pub fn new(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// `prefix:name`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.prefix, self.name)
    }
}

impl Blank for ExtensibleAttribute {
    fn is_blank(&self) -> bool {
        self.name.is_blank() && self.value.is_blank()
    }
}

/// Foreign-namespace attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExtensibleAttributes {
    attributes: Vec<ExtensibleAttribute>,
}

fn is_reserved(ctx: &Context, namespace: &str) -> bool {
    namespace == XML_NAMESPACE
        || namespace == XMLNS_NAMESPACE
        || ctx.version.namespaces().vocab_of(namespace).is_some()
}

impl ExtensibleAttributes {
    /// The empty group
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a validated group
    pub fn new(ctx: &Context, attributes: Vec<ExtensibleAttribute>) -> Result<Self> {
        let group = Self { attributes };
        group.validate(ctx)?;
        Ok(group)
    }

    /// Collect the foreign attributes of `element`.
    ///
    /// Unqualified attributes and attributes in any DDMS vocabulary belong to
    /// the element itself and are skipped.
    pub fn from_element(ctx: &Context, element: &Element) -> Result<Self> {
        let attributes = element
            .attributes
            .iter()
            .filter_map(|(name, attr)| {
                let namespace = name.namespace.as_deref()?;
                if is_reserved(ctx, namespace) {
                    return None;
                }
                Some(ExtensibleAttribute::new(
                    namespace,
                    attr.prefix.clone().unwrap_or_default(),
                    name.local_name.clone(),
                    attr.value.clone(),
                ))
            })
            .collect();
        Self::new(ctx, attributes)
    }

    /// The attributes, in order
    pub fn attributes(&self) -> &[ExtensibleAttribute] {
        &self.attributes
    }

    /// Look up a value by namespace and local name
    pub fn get(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace == namespace && a.name == name)
            .map(|a| a.value.as_str())
    }
}

impl AttributeGroup for ExtensibleAttributes {
    fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn validate(&self, ctx: &Context) -> Result<Vec<ValidationMessage>> {
        for attribute in &self.attributes {
            if attribute.namespace.is_empty() {
                return Err(Error::invalid(format!(
                    "The extensible attribute {} must be in a namespace.",
                    attribute.name
                )));
            }
            if is_reserved(ctx, &attribute.namespace) {
                return Err(Error::invalid(format!(
                    "The extensible attribute {} cannot be in a reserved namespace: {}",
                    attribute.qualified_name(),
                    attribute.namespace
                )));
            }
            names::validate_ncname(&attribute.prefix, "extensible attribute prefix")?;
            names::validate_ncname(&attribute.name, "extensible attribute name")?;
        }
        Ok(Vec::new())
    }

    fn add_to(&self, element: &mut Element, _ctx: &Context) -> Result<()> {
        for attribute in &self.attributes {
            element.set_attribute(
                Some(&attribute.prefix),
                Some(&attribute.namespace),
                &attribute.name,
                attribute.value.clone(),
            );
        }
        Ok(())
    }

    fn output(&self, format: OutputFormat, prefix: &str) -> String {
        self.attributes
            .iter()
            .map(|a| converters::render(format, &format!("{}{}", prefix, a.qualified_name()), &a.value))
            .collect()
    }

    fn to_json_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        for attribute in &self.attributes {
            converters::json_put(&mut map, &attribute.qualified_name(), &attribute.value);
        }
        map
    }
}

/// Draft of [`ExtensibleAttributes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensibleAttributesBuilder {
    /// Attribute drafts
    pub attributes: DraftList<ExtensibleAttribute>,
}

impl ExtensibleAttributesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit, treating an empty builder as the empty group
    pub fn commit_or_empty(&self, ctx: &Context) -> Result<ExtensibleAttributes> {
        Ok(self.commit(ctx)?.unwrap_or_default())
    }
}

impl Builder for ExtensibleAttributesBuilder {
    type Target = ExtensibleAttributes;

    fn is_empty(&self) -> bool {
        self.attributes.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<ExtensibleAttributes> {
        ExtensibleAttributes::new(ctx, self.attributes.filled().cloned().collect())
    }
}

blank_builder!(ExtensibleAttributesBuilder);

impl From<&ExtensibleAttributes> for ExtensibleAttributesBuilder {
    fn from(group: &ExtensibleAttributes) -> Self {
        Self {
            attributes: group.attributes.clone().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::DdmsVersion;

    const OPENSEARCH: &str = "http://a9.com/-/spec/opensearch/1.1/";

    #[test]
    fn test_foreign_attributes_pass_through() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let group = ExtensibleAttributes::new(
            &ctx,
            vec![ExtensibleAttribute::new(OPENSEARCH, "opensearch", "relevance", "95")],
        )
        .unwrap();
        assert_eq!(group.get(OPENSEARCH, "relevance"), Some("95"));
        assert_eq!(
            group.output(OutputFormat::Text, "keyword."),
            "keyword.opensearch:relevance: 95\n"
        );
    }

    #[test]
    fn test_reserved_namespaces_rejected() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let ism = ExtensibleAttribute::new("urn:us:gov:ic:ism", "ISM", "classification", "U");
        assert!(ExtensibleAttributes::new(&ctx, vec![ism]).is_err());
        let bare = ExtensibleAttribute::new("", "x", "relevance", "95");
        assert!(ExtensibleAttributes::new(&ctx, vec![bare]).is_err());
    }

    #[test]
    fn test_from_element_skips_own_attributes() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let ddms = "urn:us:mil:ces:metadata:ddms:5";
        let element = Element::build("ddms", ddms, "keyword")
            .with_attribute(Some("ddms"), Some(ddms), "value", "xml")
            .with_attribute(Some("ISM"), Some("urn:us:gov:ic:ism"), "classification", "U")
            .with_attribute(Some("opensearch"), Some(OPENSEARCH), "relevance", "95");
        let group = ExtensibleAttributes::from_element(&ctx, &element).unwrap();
        assert_eq!(group.attributes().len(), 1);
        assert_eq!(group.attributes()[0].qualified_name(), "opensearch:relevance");
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let mut builder = ExtensibleAttributesBuilder::new();
        builder.attributes.ensure_len(2);
        assert!(builder.is_empty());
        *builder.attributes.slot(1) =
            ExtensibleAttribute::new(OPENSEARCH, "opensearch", "relevance", "95");
        let group = builder.commit(&ctx).unwrap().unwrap();
        assert_eq!(group.attributes().len(), 1);
    }
}
