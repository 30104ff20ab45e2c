//! ddms:title

use crate::attributes::{AttributeGroup, SecurityAttributes, SecurityAttributesBuilder};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::helpers;
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// The title of a resource, with a mandatory classification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title {
    core: ComponentCore,
    value: String,
    security: SecurityAttributes,
}

impl Title {
    /// Element local name
    pub const NAME: &'static str = "title";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let security = SecurityAttributes::from_element(ctx, &element)?;
            let value = element.text().to_string();
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    value,
                    security,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, value: &str, security: SecurityAttributes) -> Result<Self> {
        let mut element = base::text_element(ctx, Vocab::Ddms, Self::NAME, value)?;
        security.add_to(&mut element, ctx)?;
        Self::from_element(ctx, element)
    }

    /// The title text
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }
}

impl Component for Title {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        helpers::require_element(&self.value, Self::NAME)?;
        self.security.validate(ctx)?;
        self.security.require_classification()
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        self.security.warnings(ctx)
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        let mut out = converters::render(format, &name, &self.value);
        out.push_str(&self.security.output(format, &format!("{}.", name)));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put(&mut map, "value", &self.value);
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`Title`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleBuilder {
    /// Title text
    pub value: String,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
}

impl Builder for TitleBuilder {
    type Target = Title;

    fn is_empty(&self) -> bool {
        self.value.is_blank() && self.security.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<Title> {
        Title::new(ctx, self.value.trim(), self.security.commit_or_empty(ctx)?)
    }
}

blank_builder!(TitleBuilder);

impl From<&Title> for TitleBuilder {
    fn from(title: &Title) -> Self {
        Self {
            value: title.value.clone(),
            security: (&title.security).into(),
        }
    }
}
