//! ddms:organization (ddms:Organization before DDMS 4.0.1) and ddms:subOrganization

use crate::attributes::{AttributeGroup, SecurityAttributes, SecurityAttributesBuilder};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{self, blank_builder, Blank, Builder, DraftList};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use crate::versions::DdmsVersion;
use serde_json::{Map, Value as JsonValue};

/// A named unit within an organization, available from DDMS 4.0.1
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubOrganization {
    core: ComponentCore,
    value: String,
    security: SecurityAttributes,
}

impl SubOrganization {
    /// Element local name
    pub const NAME: &'static str = "subOrganization";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            rules::check_component(ids::SUB_ORGANIZATION, ctx.version)?;
            let security = SecurityAttributes::from_element(ctx, &element)?;
            let value = element.text().trim().to_string();
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
        let mut element = base::text_element(ctx, Vocab::Ddms, Self::NAME, value.trim())?;
        security.add_to(&mut element, ctx)?;
        Self::from_element(ctx, element)
    }

    /// The name of the unit
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }
}

impl Component for SubOrganization {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        rules::check_component(ids::SUB_ORGANIZATION, ctx.version)?;
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

/// Draft of [`SubOrganization`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubOrganizationBuilder {
    /// Name of the unit
    pub value: String,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
}

impl Builder for SubOrganizationBuilder {
    type Target = SubOrganization;

    fn is_empty(&self) -> bool {
        self.value.is_blank() && self.security.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<SubOrganization> {
        SubOrganization::new(ctx, &self.value, self.security.commit_or_empty(ctx)?)
    }
}

blank_builder!(SubOrganizationBuilder);

impl From<&SubOrganization> for SubOrganizationBuilder {
    fn from(sub: &SubOrganization) -> Self {
        Self {
            value: sub.value.clone(),
            security: (&sub.security).into(),
        }
    }
}

/// Child elements, in schema order
const CHILDREN: [&str; 4] = ["name", "phone", "email", "subOrganization"];

/// An organization acting in a producer role
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Organization {
    core: ComponentCore,
    names: Vec<String>,
    phones: Vec<String>,
    emails: Vec<String>,
    sub_organizations: Vec<SubOrganization>,
    acronym: String,
}

impl Organization {
    /// Entity type used in output names
    pub const ENTITY_TYPE: &'static str = "organization";

    /// Element local name for a version
    pub fn element_name(version: DdmsVersion) -> &'static str {
        if version.is_at_least(DdmsVersion::V4_0_1) {
            "organization"
        } else {
            "Organization"
        }
    }

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let texts = |name: &str| helpers::non_empty(&element.child_texts(ddms, name));
            let names = texts("name");
            let phones = texts("phone");
            let emails = texts("email");
            let sub_organizations = element
                .children_named(ddms, SubOrganization::NAME)
                .map(|child| SubOrganization::from_element(ctx, child.clone()))
                .collect::<Result<Vec<_>>>()?;
            let acronym = element.attribute(ddms, "acronym").unwrap_or("").to_string();
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    names,
                    phones,
                    emails,
                    sub_organizations,
                    acronym,
                },
                ctx,
            )
        })
    }

    /// Build from raw values; blank values produce no element
    pub fn new(
        ctx: &Context,
        names: &[String],
        phones: &[String],
        emails: &[String],
        sub_organizations: Vec<SubOrganization>,
        acronym: &str,
    ) -> Result<Self> {
        let mut element =
            base::build_element(ctx, Vocab::Ddms, Self::element_name(ctx.version))?;
        base::set_vocab_attribute(&mut element, ctx, Vocab::Ddms, "acronym", acronym.trim())?;
        for (name, values) in CHILDREN.iter().zip([names, phones, emails]) {
            for value in helpers::non_empty(values) {
                element.add_child(base::text_element(ctx, Vocab::Ddms, name, &value)?);
            }
        }
        for sub in &sub_organizations {
            element.add_child(sub.element().clone());
        }
        Self::from_element(ctx, element)
    }

    /// Names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Phone numbers
    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Email addresses
    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    /// Sub-organizations
    pub fn sub_organizations(&self) -> &[SubOrganization] {
        &self.sub_organizations
    }

    /// ddms:acronym
    pub fn acronym(&self) -> &str {
        &self.acronym
    }
}

impl Component for Organization {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        let ddms = ctx.namespace(Vocab::Ddms)?;
        base::require_qualified_name(self.element(), ddms, Self::element_name(ctx.version))?;
        for field in CHILDREN {
            rules::check_children(ids::ORGANIZATION, field, self.element(), ddms, ctx.version)?;
        }
        rules::check_child_order(self.element(), ddms, &CHILDREN)?;
        rules::check(ids::ORGANIZATION, "name", self.names.len(), ctx.version)?;
        rules::check_present(ids::ORGANIZATION, "acronym", !self.acronym.is_empty(), ctx.version)
    }

    fn validate_warnings(&self, _ctx: &Context) -> Vec<ValidationMessage> {
        self.sub_organizations
            .iter()
            .flat_map(|sub| sub.validation_warnings().iter().cloned())
            .collect()
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, Self::ENTITY_TYPE, suffix);
        let level = ctx.output.index_level;
        let mut out = String::new();
        for (field, values) in [("name", &self.names), ("phone", &self.phones), ("email", &self.emails)] {
            out.push_str(&converters::render_values(
                format,
                &format!("{}{}", name, field),
                values,
                level,
            ));
        }
        let total = self.sub_organizations.len();
        for (i, sub) in self.sub_organizations.iter().enumerate() {
            out.push_str(&sub.output(ctx, format, &name, &converters::index_suffix(level, i, total)));
        }
        out.push_str(&converters::render(format, &format!("{}acronym", name), &self.acronym));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put_list(&mut map, "name", &self.names);
        converters::json_put_list(&mut map, "phone", &self.phones);
        converters::json_put_list(&mut map, "email", &self.emails);
        if !self.sub_organizations.is_empty() {
            map.insert(
                "subOrganization".to_string(),
                JsonValue::Array(self.sub_organizations.iter().map(|s| s.to_json()).collect()),
            );
        }
        converters::json_put(&mut map, "acronym", &self.acronym);
        JsonValue::Object(map)
    }
}

/// Draft of [`Organization`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationBuilder {
    /// Names
    pub names: DraftList<String>,
    /// Phone numbers
    pub phones: DraftList<String>,
    /// Email addresses
    pub emails: DraftList<String>,
    /// Sub-organizations
    pub sub_organizations: DraftList<SubOrganizationBuilder>,
    /// ddms:acronym
    pub acronym: String,
}

impl Builder for OrganizationBuilder {
    type Target = Organization;

    fn is_empty(&self) -> bool {
        self.names.is_blank()
            && self.phones.is_blank()
            && self.emails.is_blank()
            && self.sub_organizations.is_blank()
            && self.acronym.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<Organization> {
        Organization::new(
            ctx,
            &self.names.values(),
            &self.phones.values(),
            &self.emails.values(),
            builders::commit_all(&self.sub_organizations, ctx)?,
            &self.acronym,
        )
    }
}

blank_builder!(OrganizationBuilder);

impl From<&Organization> for OrganizationBuilder {
    fn from(organization: &Organization) -> Self {
        Self {
            names: organization.names.as_slice().into(),
            phones: organization.phones.as_slice().into(),
            emails: organization.emails.as_slice().into(),
            sub_organizations: organization
                .sub_organizations
                .iter()
                .map(SubOrganizationBuilder::from)
                .collect(),
            acronym: organization.acronym.clone(),
        }
    }
}
