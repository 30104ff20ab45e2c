//! Integration tests for builders: emptiness, commit and editing round trips

use ddms::attributes::{SecurityAttributes, SecurityAttributesBuilder, SrsAttributes};
use ddms::components::{
    CountryCodeBuilder, DatesBuilder, Entity, FacilityIdentifierBuilder, GeographicIdentifier,
    GeographicIdentifierBuilder, KeywordBuilder, NoticeBuilder, NoticeTextBuilder,
    OrganizationBuilder, Person, PersonBuilder, Point, PointBuilder, Position, PositionBuilder,
    ProducerRole, ProducerRoleBuilder, ProducerRoleType, SubDivisionCodeBuilder,
    SubOrganizationBuilder, TemporalCoverage, TemporalCoverageBuilder, Title, TitleBuilder,
};
use ddms::{Builder, Component, Context, DdmsVersion};
use pretty_assertions::assert_eq;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn security_draft() -> SecurityAttributesBuilder {
    SecurityAttributesBuilder {
        classification: "U".to_string(),
        owner_producers: strings(&["USA"]).into(),
        ..Default::default()
    }
}

macro_rules! assert_fresh_builders_are_empty {
    ($ctx:expr, $($builder:ty),+ $(,)?) => {
        $(
            let builder = <$builder>::default();
            assert!(builder.is_empty(), "{} should start empty", stringify!($builder));
            assert!(
                builder.commit($ctx).unwrap().is_none(),
                "{} should commit to nothing",
                stringify!($builder)
            );
        )+
    };
}

#[test]
fn test_fresh_builders_commit_to_nothing() {
    for version in DdmsVersion::ALL {
        let ctx = Context::new(version);
        assert_fresh_builders_are_empty!(
            &ctx,
            TitleBuilder,
            KeywordBuilder,
            DatesBuilder,
            TemporalCoverageBuilder,
            PersonBuilder,
            OrganizationBuilder,
            SubOrganizationBuilder,
            ProducerRoleBuilder,
            GeographicIdentifierBuilder,
            CountryCodeBuilder,
            SubDivisionCodeBuilder,
            FacilityIdentifierBuilder,
            NoticeBuilder,
            NoticeTextBuilder,
            PointBuilder,
            PositionBuilder,
            SecurityAttributesBuilder,
        );
    }
}

#[test]
fn test_padded_slots_stay_empty() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let mut person = PersonBuilder::default();
    person.names.ensure_len(3);
    person.affiliations.slot(4);
    assert_eq!(person.names.len(), 3);
    assert!(person.is_empty());
    assert!(person.commit(&ctx).unwrap().is_none());

    let mut notice = NoticeBuilder::default();
    notice.notice_texts.slot(2).poc_types.ensure_len(2);
    assert!(notice.is_empty());
    assert!(notice.commit(&ctx).unwrap().is_none());
}

#[test]
fn test_one_field_makes_a_builder_non_empty() {
    let ctx = Context::new(DdmsVersion::V5_0);

    let mut title = TitleBuilder::default();
    title.value = "DDMSence".to_string();
    assert!(!title.is_empty());
    let err = title.commit(&ctx).unwrap_err();
    assert_eq!(
        err.as_validation().unwrap().message,
        "The classification attribute is required."
    );

    let mut dates = DatesBuilder::default();
    dates.created = "2003".to_string();
    let committed = dates.commit(&ctx).unwrap().unwrap();
    assert_eq!(committed.created(), "2003");

    let mut person = PersonBuilder::default();
    person.names.slot(1).push_str("Brian");
    assert!(!person.is_empty());
    let err = person.commit(&ctx).unwrap_err();
    assert_eq!(err.as_validation().unwrap().message, "The surname element is required.");
}

#[test]
fn test_blank_slots_are_skipped_on_commit() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let mut person = PersonBuilder::default();
    person.names.slot(2).push_str("Brian");
    person.surname = "Uri".to_string();
    person.phones.ensure_len(2);
    let committed = person.commit(&ctx).unwrap().unwrap();
    assert_eq!(committed.names(), &strings(&["Brian"])[..]);
    assert!(committed.phones().is_empty());
}

#[test]
fn test_builders_reproduce_their_source() {
    for version in DdmsVersion::ALL {
        let ctx = Context::new(version);
        let security = SecurityAttributes::new(&ctx, "U", &strings(&["USA"])).unwrap();

        let title = Title::new(&ctx, "DDMSence", security.clone()).unwrap();
        assert_eq!(TitleBuilder::from(&title).commit(&ctx).unwrap(), Some(title));

        let coverage_security = if version.is_at_least(DdmsVersion::V3_0) {
            security.clone()
        } else {
            SecurityAttributes::empty()
        };
        let coverage =
            TemporalCoverage::new(&ctx, "Cold War", "1945", "1991", coverage_security).unwrap();
        assert_eq!(
            TemporalCoverageBuilder::from(&coverage).commit(&ctx).unwrap(),
            Some(coverage)
        );

        let person =
            Person::new(&ctx, &strings(&["Brian", "BU"]), "Uri", "123", &[], &[], &[]).unwrap();
        let producer =
            ProducerRole::new(&ctx, ProducerRoleType::Contributor, Entity::Person(person), security)
                .unwrap();
        assert_eq!(
            ProducerRoleBuilder::from(&producer).commit(&ctx).unwrap(),
            Some(producer)
        );

        let geographic = GeographicIdentifier::new(
            &ctx,
            &strings(&["Mount Vernon"]),
            &[],
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            GeographicIdentifierBuilder::from(&geographic).commit(&ctx).unwrap(),
            Some(geographic)
        );

        let srs = SrsAttributes::new(&ctx, "http://example.org/srs", Some(2), &[], &[]).unwrap();
        let position = Position::new(&ctx, &[32.1, 40.1, 100.5], srs.clone()).unwrap();
        let point = Point::new(&ctx, position, srs, "IDValue").unwrap();
        assert_eq!(PointBuilder::from(&point).commit(&ctx).unwrap(), Some(point));
    }
}

#[test]
fn test_edit_an_existing_component() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let security = SecurityAttributes::new(&ctx, "U", &strings(&["USA"])).unwrap();
    let title = Title::new(&ctx, "Draft", security).unwrap();

    let mut builder = TitleBuilder::from(&title);
    builder.value = "Final".to_string();
    builder.security.owner_producers.slot(1).push_str("AUS");
    let edited = builder.commit(&ctx).unwrap().unwrap();

    assert_eq!(edited.value(), "Final");
    assert_eq!(
        edited.security_attributes().owner_producers(),
        &strings(&["USA", "AUS"])[..]
    );
    assert_eq!(title.value(), "Draft");
}

#[test]
fn test_organization_builder_commits_sub_organizations() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let mut builder = OrganizationBuilder::default();
    builder.names.slot(0).push_str("DISA");
    builder.sub_organizations.ensure_len(3);
    *builder.sub_organizations.slot(1) = SubOrganizationBuilder {
        value: "sub1".to_string(),
        security: security_draft(),
    };
    let organization = builder.commit(&ctx).unwrap().unwrap();
    assert_eq!(organization.sub_organizations().len(), 1);
    assert_eq!(organization.sub_organizations()[0].value(), "sub1");
}

#[test]
fn test_producer_builder_locates_nested_failures() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let mut builder = ProducerRoleBuilder {
        role: ProducerRoleType::Publisher,
        entity_type: "organization".to_string(),
        security: security_draft(),
        ..Default::default()
    };
    builder.organization.phones.slot(0).push_str("703-882-1000");

    let err = builder.commit(&ctx).unwrap_err();
    let err = err.as_validation().unwrap();
    assert_eq!(err.message, "At least 1 name element must exist.");
    assert_eq!(err.path(), "/ddms:publisher/ddms:organization");
}

#[test]
fn test_point_builder_pads_coordinates() {
    let ctx = Context::new(DdmsVersion::V5_0);
    let srs = ddms::attributes::SrsAttributesBuilder {
        srs_name: "http://example.org/srs".to_string(),
        ..Default::default()
    };
    let mut builder = PointBuilder {
        id: "IDValue".to_string(),
        srs: srs.clone(),
        ..Default::default()
    };
    builder.position.srs = srs;
    builder.position.coordinates.slot(0).push_str("32.1");
    builder.position.coordinates.slot(1).push_str("40.1");
    builder.position.coordinates.ensure_len(4);

    let point = builder.commit(&ctx).unwrap().unwrap();
    assert_eq!(point.position().coordinates(), &[32.1, 40.1][..]);
    assert!(point.validation_warnings().is_empty());
}
