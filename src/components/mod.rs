//! Concrete DDMS components
//!
//! Each component is a struct wrapping a [`ComponentCore`](crate::validators::ComponentCore)
//! plus its typed fields, and implements [`Component`]. Every component has two
//! constructors:
//!
//! - `from_element(ctx, element)` reads a parsed element
//! - `new(ctx, ...)` assembles the element from raw values, then reads it back
//!
//! so both paths share the same validation. Each also has a builder, a mutable
//! draft that commits to the component or to nothing when left blank.
//!
//! [`DdmsComponent`] closes the set for callers that dispatch on element names.

mod dates;
mod geographic;
mod gml;
mod keyword;
mod notice;
mod organization;
mod person;
mod producer;
mod temporal;
mod title;

pub use dates::{Dates, DatesBuilder};
pub use geographic::{
    CountryCode, CountryCodeBuilder, FacilityIdentifier, FacilityIdentifierBuilder,
    GeographicIdentifier, GeographicIdentifierBuilder, SubDivisionCode, SubDivisionCodeBuilder,
};
pub use gml::{Point, PointBuilder, Position, PositionBuilder};
pub use keyword::{Keyword, KeywordBuilder};
pub use notice::{Notice, NoticeBuilder, NoticeText, NoticeTextBuilder};
pub use organization::{Organization, OrganizationBuilder, SubOrganization, SubOrganizationBuilder};
pub use person::{Person, PersonBuilder};
pub use producer::{Entity, ProducerRole, ProducerRoleBuilder, ProducerRoleType};
pub use temporal::{TemporalCoverage, TemporalCoverageBuilder, TimeValue};
pub use title::{Title, TitleBuilder};

use crate::config::Context;
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::validators::Component;

/// Any concrete component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DdmsComponent {
    /// ddms:title
    Title(Title),
    /// ddms:keyword
    Keyword(Keyword),
    /// ddms:dates
    Dates(Dates),
    /// ddms:temporalCoverage
    TemporalCoverage(TemporalCoverage),
    /// ddms:person
    Person(Person),
    /// ddms:organization
    Organization(Organization),
    /// ddms:subOrganization
    SubOrganization(SubOrganization),
    /// ddms:creator, publisher, contributor or pointOfContact
    ProducerRole(ProducerRole),
    /// ddms:geographicIdentifier
    GeographicIdentifier(GeographicIdentifier),
    /// ddms:countryCode
    CountryCode(CountryCode),
    /// ddms:subDivisionCode
    SubDivisionCode(SubDivisionCode),
    /// ddms:facilityIdentifier
    FacilityIdentifier(FacilityIdentifier),
    /// ISM:Notice
    Notice(Notice),
    /// ISM:NoticeText
    NoticeText(NoticeText),
    /// gml:Point
    Point(Point),
    /// gml:pos
    Position(Position),
}

impl DdmsComponent {
    /// Read any supported element, dispatching on its namespace and local name
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        let namespace = element.namespace().unwrap_or("").to_string();
        let vocab = ctx.version.namespaces().vocab_of(&namespace);
        let local_name = element.local_name().to_string();
        log::trace!("Dispatching {{{}}}{} for DDMS {}", namespace, local_name, ctx.version);

        let component = match (vocab, local_name.as_str()) {
            (Some(Vocab::Ddms), Title::NAME) => Title::from_element(ctx, element)?.into(),
            (Some(Vocab::Ddms), Keyword::NAME) => Keyword::from_element(ctx, element)?.into(),
            (Some(Vocab::Ddms), Dates::NAME) => Dates::from_element(ctx, element)?.into(),
            (Some(Vocab::Ddms), TemporalCoverage::NAME) => {
                TemporalCoverage::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), name) if name == Person::element_name(ctx.version) => {
                Person::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), name) if name == Organization::element_name(ctx.version) => {
                Organization::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), SubOrganization::NAME) => {
                SubOrganization::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), name) if ProducerRoleType::from_str(name).is_ok() => {
                ProducerRole::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), GeographicIdentifier::NAME) => {
                GeographicIdentifier::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), CountryCode::NAME) => CountryCode::from_element(ctx, element)?.into(),
            (Some(Vocab::Ddms), SubDivisionCode::NAME) => {
                SubDivisionCode::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ddms), FacilityIdentifier::NAME) => {
                FacilityIdentifier::from_element(ctx, element)?.into()
            }
            (Some(Vocab::Ism), Notice::NAME) => Notice::from_element(ctx, element)?.into(),
            (Some(Vocab::Ism), NoticeText::NAME) => NoticeText::from_element(ctx, element)?.into(),
            (Some(Vocab::Gml), Point::NAME) => Point::from_element(ctx, element)?.into(),
            (Some(Vocab::Gml), Position::NAME) => Position::from_element(ctx, element)?.into(),
            _ => {
                return Err(Error::invalid(format!(
                    "Unexpected namespace URI and local name encountered: {}",
                    element.name
                )))
            }
        };
        Ok(component)
    }

    /// The wrapped component
    pub fn as_component(&self) -> &dyn Component {
        match self {
            DdmsComponent::Title(c) => c,
            DdmsComponent::Keyword(c) => c,
            DdmsComponent::Dates(c) => c,
            DdmsComponent::TemporalCoverage(c) => c,
            DdmsComponent::Person(c) => c,
            DdmsComponent::Organization(c) => c,
            DdmsComponent::SubOrganization(c) => c,
            DdmsComponent::ProducerRole(c) => c,
            DdmsComponent::GeographicIdentifier(c) => c,
            DdmsComponent::CountryCode(c) => c,
            DdmsComponent::SubDivisionCode(c) => c,
            DdmsComponent::FacilityIdentifier(c) => c,
            DdmsComponent::Notice(c) => c,
            DdmsComponent::NoticeText(c) => c,
            DdmsComponent::Point(c) => c,
            DdmsComponent::Position(c) => c,
        }
    }
}

macro_rules! impl_from_component {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for DdmsComponent {
                fn from(component: $variant) -> Self {
                    DdmsComponent::$variant(component)
                }
            }
        )*
    };
}

impl_from_component!(
    Title,
    Keyword,
    Dates,
    TemporalCoverage,
    Person,
    Organization,
    SubOrganization,
    ProducerRole,
    GeographicIdentifier,
    CountryCode,
    SubDivisionCode,
    FacilityIdentifier,
    Notice,
    NoticeText,
    Point,
    Position,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::versions::DdmsVersion;

    fn parse(xml: &str) -> Element {
        Document::from_string(xml).unwrap().into_root().unwrap()
    }

    #[test]
    fn test_dispatch_by_name() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let component = DdmsComponent::from_element(
            &ctx,
            parse(r#"<ddms:keyword xmlns:ddms="urn:us:mil:ces:metadata:ddms:5" ddms:value="XML"/>"#),
        )
        .unwrap();
        assert!(matches!(component, DdmsComponent::Keyword(_)));
        assert_eq!(component.as_component().qualified_name(), "ddms:keyword");
    }

    #[test]
    fn test_dispatch_follows_version_naming() {
        let ctx = Context::new(DdmsVersion::V3_1);
        let component = DdmsComponent::from_element(
            &ctx,
            parse(r#"<ddms:Person xmlns:ddms="http://metadata.dod.mil/mdr/ns/DDMS/3.1/"><ddms:name>Brian</ddms:name><ddms:surname>Uri</ddms:surname></ddms:Person>"#),
        )
        .unwrap();
        assert!(matches!(component, DdmsComponent::Person(_)));
    }

    #[test]
    fn test_unknown_element() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let err = DdmsComponent::from_element(
            &ctx,
            parse(r#"<ddms:resource xmlns:ddms="urn:us:mil:ces:metadata:ddms:5"/>"#),
        )
        .unwrap_err();
        assert!(err
            .as_validation()
            .unwrap()
            .message
            .starts_with("Unexpected namespace URI and local name encountered"));
    }
}
