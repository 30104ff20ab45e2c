//! ddms:keyword

use crate::attributes::{
    AttributeGroup, ExtensibleAttributes, ExtensibleAttributesBuilder, SecurityAttributes,
    SecurityAttributesBuilder,
};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// A keyword describing a resource
///
/// Security attributes are accepted from DDMS 4.0.1, foreign attributes from 3.0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    core: ComponentCore,
    value: String,
    security: SecurityAttributes,
    extensible: ExtensibleAttributes,
}

impl Keyword {
    /// Element local name
    pub const NAME: &'static str = "keyword";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let value = element.attribute(ddms, "value").unwrap_or("").to_string();
            let security = SecurityAttributes::from_element(ctx, &element)?;
            let extensible = ExtensibleAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    value,
                    security,
                    extensible,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        value: &str,
        security: SecurityAttributes,
        extensible: ExtensibleAttributes,
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ddms, Self::NAME)?;
        base::set_vocab_attribute(&mut element, ctx, Vocab::Ddms, "value", value)?;
        security.add_to(&mut element, ctx)?;
        extensible.add_to(&mut element, ctx)?;
        Self::from_element(ctx, element)
    }

    /// The keyword
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }

    /// Foreign attributes
    pub fn extensible_attributes(&self) -> &ExtensibleAttributes {
        &self.extensible
    }
}

impl Component for Keyword {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        rules::check_present(ids::KEYWORD, "value", !self.value.is_empty(), ctx.version)?;
        rules::check_present(ids::KEYWORD, "ISM", !self.security.is_empty(), ctx.version)?;
        rules::check_present(
            ids::KEYWORD,
            "extensible",
            !self.extensible.is_empty(),
            ctx.version,
        )?;
        self.security.validate(ctx)?;
        self.extensible.validate(ctx)?;
        Ok(())
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        self.security.warnings(ctx)
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        let mut out = converters::render(format, &name, &self.value);
        out.push_str(&self.extensible.output(format, &format!("{}.", name)));
        out.push_str(&self.security.output(format, &format!("{}.", name)));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put(&mut map, "value", &self.value);
        converters::json_put_object(&mut map, "extensibleAttributes", self.extensible.to_json_map());
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`Keyword`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordBuilder {
    /// Keyword
    pub value: String,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
    /// Foreign attributes
    pub extensible: ExtensibleAttributesBuilder,
}

impl Builder for KeywordBuilder {
    type Target = Keyword;

    fn is_empty(&self) -> bool {
        self.value.is_blank() && self.security.is_empty() && self.extensible.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<Keyword> {
        Keyword::new(
            ctx,
            self.value.trim(),
            self.security.commit_or_empty(ctx)?,
            self.extensible.commit_or_empty(ctx)?,
        )
    }
}

blank_builder!(KeywordBuilder);

impl From<&Keyword> for KeywordBuilder {
    fn from(keyword: &Keyword) -> Self {
        Self {
            value: keyword.value.clone(),
            security: (&keyword.security).into(),
            extensible: (&keyword.extensible).into(),
        }
    }
}
