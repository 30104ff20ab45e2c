//! Producer roles: ddms:creator, ddms:publisher, ddms:contributor and ddms:pointOfContact
//!
//! A role wraps exactly one entity, either a person or an organization. The
//! entity's output names are nested under the role, as in
//! `creator.organization.name`.

use super::organization::{Organization, OrganizationBuilder};
use super::person::{Person, PersonBuilder};
use crate::attributes::{AttributeGroup, SecurityAttributes, SecurityAttributesBuilder};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use crate::versions::DdmsVersion;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

const ENTITY_FIELD: &str = "person or organization";

/// The four producer roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProducerRoleType {
    /// ddms:creator
    #[default]
    Creator,
    /// ddms:publisher
    Publisher,
    /// ddms:contributor
    Contributor,
    /// ddms:pointOfContact
    PointOfContact,
}

impl ProducerRoleType {
    /// Every role
    pub const ALL: [ProducerRoleType; 4] = [
        ProducerRoleType::Creator,
        ProducerRoleType::Publisher,
        ProducerRoleType::Contributor,
        ProducerRoleType::PointOfContact,
    ];

    /// Parse a role from its element local name
    pub fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::invalid(format!("{} is not a valid producer role.", s)))
    }

    /// Element local name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerRoleType::Creator => "creator",
            ProducerRoleType::Publisher => "publisher",
            ProducerRoleType::Contributor => "contributor",
            ProducerRoleType::PointOfContact => "pointOfContact",
        }
    }
}

impl fmt::Display for ProducerRoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The entity filling a producer role
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A person
    Person(Person),
    /// An organization
    Organization(Organization),
}

impl Entity {
    /// True if `element` names an entity in `version`
    pub fn is_entity(element: &Element, namespace: &str, version: DdmsVersion) -> bool {
        element.name.matches(namespace, Person::element_name(version))
            || element.name.matches(namespace, Organization::element_name(version))
    }

    /// Dispatch on the element name
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        let ddms = ctx.namespace(Vocab::Ddms)?;
        if element.name.matches(ddms, Person::element_name(ctx.version)) {
            Ok(Entity::Person(Person::from_element(ctx, element)?))
        } else if element.name.matches(ddms, Organization::element_name(ctx.version)) {
            Ok(Entity::Organization(Organization::from_element(ctx, element)?))
        } else {
            Err(Error::invalid(format!(
                "Unexpected namespace URI and local name encountered: {}",
                element.name
            )))
        }
    }

    /// `person` or `organization`
    pub fn entity_type(&self) -> &'static str {
        match self {
            Entity::Person(_) => Person::ENTITY_TYPE,
            Entity::Organization(_) => Organization::ENTITY_TYPE,
        }
    }

    /// The wrapped component
    pub fn as_component(&self) -> &dyn Component {
        match self {
            Entity::Person(person) => person,
            Entity::Organization(organization) => organization,
        }
    }
}

impl From<Person> for Entity {
    fn from(person: Person) -> Self {
        Entity::Person(person)
    }
}

impl From<Organization> for Entity {
    fn from(organization: Organization) -> Self {
        Entity::Organization(organization)
    }
}

/// A person or organization acting as creator, publisher, contributor or point of contact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProducerRole {
    core: ComponentCore,
    role: ProducerRoleType,
    entity: Entity,
    security: SecurityAttributes,
}

impl ProducerRole {
    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let role = ProducerRoleType::from_str(element.local_name())?;
            let entities: Vec<&Element> = element
                .children
                .iter()
                .filter(|child| Entity::is_entity(child, ddms, ctx.version))
                .collect();
            let child = rules::single(ids::PRODUCER, ENTITY_FIELD, entities, ctx.version)?.clone();
            let entity = Entity::from_element(ctx, child)?;
            let security = SecurityAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    role,
                    entity,
                    security,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        role: ProducerRoleType,
        entity: Entity,
        security: SecurityAttributes,
    ) -> Result<Self> {
        Self::assemble(ctx, role, Some(&entity), security)
    }

    fn assemble(
        ctx: &Context,
        role: ProducerRoleType,
        entity: Option<&Entity>,
        security: SecurityAttributes,
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ddms, role.as_str())?;
        security.add_to(&mut element, ctx)?;
        if let Some(entity) = entity {
            element.add_child(entity.as_component().element().clone());
        }
        Self::from_element(ctx, element)
    }

    /// Which role this is
    pub fn role(&self) -> ProducerRoleType {
        self.role
    }

    /// The entity filling the role
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }
}

impl Component for ProducerRole {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, self.role.as_str())?;
        self.security.validate(ctx)?;
        self.security.require_classification()
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let mut warnings = self.entity.as_component().validation_warnings().to_vec();
        warnings.extend(self.security.warnings(ctx));
        warnings
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, self.role.as_str(), suffix);
        let mut out = self.entity.as_component().output(ctx, format, &name, "");
        out.push_str(&self.security.output(format, &name));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        map.insert(
            self.entity.entity_type().to_string(),
            self.entity.as_component().to_json(),
        );
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`ProducerRole`]
///
/// Holds drafts for both entity kinds; `entity_type` selects the one committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducerRoleBuilder {
    /// Which role to build
    pub role: ProducerRoleType,
    /// `person` or `organization`
    pub entity_type: String,
    /// Person draft
    pub person: PersonBuilder,
    /// Organization draft
    pub organization: OrganizationBuilder,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
}

impl ProducerRoleBuilder {
    fn commit_entity(&self, ctx: &Context) -> Result<Option<Entity>> {
        match self.entity_type.as_str() {
            Organization::ENTITY_TYPE => Ok(self.organization.commit(ctx)?.map(Entity::from)),
            Person::ENTITY_TYPE | "" => Ok(self.person.commit(ctx)?.map(Entity::from)),
            other => Err(Error::invalid(format!("{} is not a valid entity type.", other))),
        }
    }

    fn entity_is_empty(&self) -> bool {
        match self.entity_type.as_str() {
            Organization::ENTITY_TYPE => self.organization.is_empty(),
            _ => self.person.is_empty(),
        }
    }
}

impl Builder for ProducerRoleBuilder {
    type Target = ProducerRole;

    fn is_empty(&self) -> bool {
        self.entity_is_empty() && self.security.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<ProducerRole> {
        let role_name = format!("{}:{}", ctx.prefix(Vocab::Ddms), self.role.as_str());
        let entity = located(&role_name, || self.commit_entity(ctx))?;
        ProducerRole::assemble(ctx, self.role, entity.as_ref(), self.security.commit_or_empty(ctx)?)
    }
}

blank_builder!(ProducerRoleBuilder);

impl From<&ProducerRole> for ProducerRoleBuilder {
    fn from(producer: &ProducerRole) -> Self {
        let mut builder = Self {
            role: producer.role,
            entity_type: producer.entity.entity_type().to_string(),
            security: (&producer.security).into(),
            ..Self::default()
        };
        match &producer.entity {
            Entity::Person(person) => builder.person = person.into(),
            Entity::Organization(organization) => builder.organization = organization.into(),
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn security(ctx: &Context) -> SecurityAttributes {
        SecurityAttributes::new(ctx, "U", &strings(&["USA"])).unwrap()
    }

    fn person(ctx: &Context) -> Entity {
        Person::new(ctx, &strings(&["Brian"]), "Uri", "", &[], &[], &[])
            .unwrap()
            .into()
    }

    #[test]
    fn test_role_names() {
        for role in ProducerRoleType::ALL {
            assert_eq!(ProducerRoleType::from_str(role.as_str()).unwrap(), role);
        }
        assert!(ProducerRoleType::from_str("author").is_err());
    }

    #[test]
    fn test_every_role_every_version() {
        for version in DdmsVersion::ALL {
            let ctx = Context::new(version);
            for role in ProducerRoleType::ALL {
                let producer = ProducerRole::new(&ctx, role, person(&ctx), security(&ctx)).unwrap();
                assert_eq!(producer.name(), role.as_str());
                assert_eq!(producer.entity().entity_type(), "person");
            }
        }
    }

    #[test]
    fn test_classification_required() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let err = ProducerRole::new(&ctx, ProducerRoleType::Creator, person(&ctx), SecurityAttributes::empty())
            .unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.message, "The classification attribute is required.");
        assert_eq!(err.path(), "/ddms:creator");
    }

    #[test]
    fn test_entity_required() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let xml = r#"<ddms:creator xmlns:ddms="urn:us:mil:ces:metadata:ddms:5" xmlns:ISM="urn:us:gov:ic:ism" ISM:classification="U" ISM:ownerProducer="USA"/>"#;
        let element = Document::from_string(xml).unwrap().into_root().unwrap();
        let err = ProducerRole::from_element(&ctx, element).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The person or organization element is required."
        );
    }

    #[test]
    fn test_nested_failure_is_located() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let xml = r#"<ddms:creator xmlns:ddms="urn:us:mil:ces:metadata:ddms:5" xmlns:ISM="urn:us:gov:ic:ism" ISM:classification="U" ISM:ownerProducer="USA"><ddms:person><ddms:name>Brian</ddms:name></ddms:person></ddms:creator>"#;
        let element = Document::from_string(xml).unwrap().into_root().unwrap();
        let err = ProducerRole::from_element(&ctx, element).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.message, "The surname element is required.");
        assert_eq!(err.path(), "/ddms:creator/ddms:person");
    }

    #[test]
    fn test_nested_output() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let organization = Organization::new(&ctx, &strings(&["DISA"]), &[], &[], Vec::new(), "")
            .unwrap();
        let producer = ProducerRole::new(
            &ctx,
            ProducerRoleType::Publisher,
            organization.into(),
            security(&ctx),
        )
        .unwrap();
        assert_eq!(
            producer.to_text(&ctx),
            "publisher.organization.name: DISA\n\
             publisher.classification: U\n\
             publisher.ownerProducer: USA\n"
        );
        assert_eq!(
            producer.to_json(),
            serde_json::json!({
                "organization": { "name": ["DISA"] },
                "securityAttributes": { "classification": "U", "ownerProducer": ["USA"] }
            })
        );
    }

    #[test]
    fn test_builder_locates_entity_failure() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let mut builder = ProducerRoleBuilder::default();
        assert!(builder.commit(&ctx).unwrap().is_none());

        *builder.person.names.slot(0) = "Brian".to_string();
        builder.security.classification = "U".to_string();
        *builder.security.owner_producers.slot(0) = "USA".to_string();
        let err = builder.commit(&ctx).unwrap_err();
        assert_eq!(err.as_validation().unwrap().path(), "/ddms:creator/ddms:person");

        builder.person.surname = "Uri".to_string();
        let producer = builder.commit(&ctx).unwrap().unwrap();
        assert_eq!(ProducerRoleBuilder::from(&producer), ProducerRoleBuilder {
            entity_type: "person".to_string(),
            ..builder
        });
    }
}
