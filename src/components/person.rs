//! ddms:person (ddms:Person before DDMS 4.0.1)

use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use crate::versions::DdmsVersion;
use serde_json::{Map, Value as JsonValue};

/// Child elements in schema order; contact details moved ahead of userID in 4.0.1
fn child_order(version: DdmsVersion) -> [&'static str; 6] {
    if version.is_at_least(DdmsVersion::V4_0_1) {
        ["name", "surname", "phone", "email", "userID", "affiliation"]
    } else {
        ["name", "surname", "userID", "affiliation", "phone", "email"]
    }
}

/// A person acting in a producer role
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    core: ComponentCore,
    names: Vec<String>,
    surname: String,
    user_id: String,
    affiliations: Vec<String>,
    phones: Vec<String>,
    emails: Vec<String>,
}

impl Person {
    /// Entity type used in output names
    pub const ENTITY_TYPE: &'static str = "person";

    /// Element local name for a version
    pub fn element_name(version: DdmsVersion) -> &'static str {
        if version.is_at_least(DdmsVersion::V4_0_1) {
            "person"
        } else {
            "Person"
        }
    }

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let texts = |name: &str| helpers::non_empty(&element.child_texts(ddms, name));
            let names = texts("name");
            let surname = element.child_text(ddms, "surname").unwrap_or_default();
            let user_id = element.child_text(ddms, "userID").unwrap_or_default();
            let affiliations = texts("affiliation");
            let phones = texts("phone");
            let emails = texts("email");
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    names,
                    surname: surname.trim().to_string(),
                    user_id: user_id.trim().to_string(),
                    affiliations,
                    phones,
                    emails,
                },
                ctx,
            )
        })
    }

    /// Build from raw values; blank values produce no element
    pub fn new(
        ctx: &Context,
        names: &[String],
        surname: &str,
        user_id: &str,
        affiliations: &[String],
        phones: &[String],
        emails: &[String],
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ddms, Self::element_name(ctx.version))?;
        let single = |value: &str| helpers::non_empty(&[value.to_string()]);
        let fields = [
            ("name", helpers::non_empty(names)),
            ("surname", single(surname)),
            ("userID", single(user_id)),
            ("affiliation", helpers::non_empty(affiliations)),
            ("phone", helpers::non_empty(phones)),
            ("email", helpers::non_empty(emails)),
        ];
        for name in child_order(ctx.version) {
            for (_, values) in fields.iter().filter(|(field, _)| *field == name) {
                for value in values {
                    element.add_child(base::text_element(ctx, Vocab::Ddms, name, value)?);
                }
            }
        }
        Self::from_element(ctx, element)
    }

    /// Given names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Surname
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// User ID
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Affiliations
    pub fn affiliations(&self) -> &[String] {
        &self.affiliations
    }

    /// Phone numbers
    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Email addresses
    pub fn emails(&self) -> &[String] {
        &self.emails
    }
}

impl Component for Person {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        let ddms = ctx.namespace(Vocab::Ddms)?;
        base::require_qualified_name(self.element(), ddms, Self::element_name(ctx.version))?;
        let order = child_order(ctx.version);
        for field in order {
            rules::check_children(ids::PERSON, field, self.element(), ddms, ctx.version)?;
        }
        rules::check_child_order(self.element(), ddms, &order)?;
        rules::check(ids::PERSON, "name", self.names.len(), ctx.version)?;
        helpers::require_element(&self.surname, "surname")
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let Ok(ddms) = ctx.namespace(Vocab::Ddms) else {
            return Vec::new();
        };
        self.element()
            .children
            .iter()
            .filter(|child| {
                child.name.matches(ddms, "userID") || child.name.matches(ddms, "affiliation")
            })
            .filter(|child| child.text().trim().is_empty())
            .map(|child| helpers::empty_element_warning(&child.qualified_name()))
            .collect()
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, Self::ENTITY_TYPE, suffix);
        let level = ctx.output.index_level;
        let mut out = converters::render_values(format, &format!("{}name", name), &self.names, level);
        out.push_str(&converters::render(format, &format!("{}surname", name), &self.surname));
        out.push_str(&converters::render(format, &format!("{}userID", name), &self.user_id));
        for (field, values) in [
            ("affiliation", &self.affiliations),
            ("phone", &self.phones),
            ("email", &self.emails),
        ] {
            out.push_str(&converters::render_values(
                format,
                &format!("{}{}", name, field),
                values,
                level,
            ));
        }
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put_list(&mut map, "name", &self.names);
        converters::json_put(&mut map, "surname", &self.surname);
        converters::json_put(&mut map, "userID", &self.user_id);
        converters::json_put_list(&mut map, "affiliation", &self.affiliations);
        converters::json_put_list(&mut map, "phone", &self.phones);
        converters::json_put_list(&mut map, "email", &self.emails);
        JsonValue::Object(map)
    }
}

/// Draft of [`Person`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonBuilder {
    /// Given names
    pub names: DraftList<String>,
    /// Surname
    pub surname: String,
    /// User ID
    pub user_id: String,
    /// Affiliations
    pub affiliations: DraftList<String>,
    /// Phone numbers
    pub phones: DraftList<String>,
    /// Email addresses
    pub emails: DraftList<String>,
}

impl Builder for PersonBuilder {
    type Target = Person;

    fn is_empty(&self) -> bool {
        self.names.is_blank()
            && self.surname.is_blank()
            && self.user_id.is_blank()
            && self.affiliations.is_blank()
            && self.phones.is_blank()
            && self.emails.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<Person> {
        Person::new(
            ctx,
            &self.names.values(),
            &self.surname,
            &self.user_id,
            &self.affiliations.values(),
            &self.phones.values(),
            &self.emails.values(),
        )
    }
}

blank_builder!(PersonBuilder);

impl From<&Person> for PersonBuilder {
    fn from(person: &Person) -> Self {
        Self {
            names: person.names.as_slice().into(),
            surname: person.surname.clone(),
            user_id: person.user_id.clone(),
            affiliations: person.affiliations.as_slice().into(),
            phones: person.phones.as_slice().into(),
            emails: person.emails.as_slice().into(),
        }
    }
}
