//! Integration tests for the validation context: versions, namespaces,
//! prefixes, properties and the controlled vocabulary policy

use ddms::attributes::{SecurityAttributes, SecurityAttributesBuilder};
use ddms::components::{NoticeText, Title};
use ddms::validators::cve::{self, Vocabulary};
use ddms::{Builder, Component, Context, CvePolicy, DdmsVersion, Error, IndexLevel, Vocab};
use pretty_assertions::assert_eq;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_version_names_and_order() {
    let names: Vec<&str> = DdmsVersion::ALL.iter().map(|v| v.as_str()).collect();
    assert_eq!(names, vec!["2.0", "3.0", "3.1", "4.0.1", "4.1", "5.0"]);
    assert!(DdmsVersion::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(DdmsVersion::from_str("4.0.1").unwrap(), DdmsVersion::V4_0_1);
    assert!(matches!(DdmsVersion::from_str("1.0"), Err(Error::Configuration(_))));
}

#[test]
fn test_namespaces_per_version() {
    let ism_v2 = DdmsVersion::V2_0.namespace(Vocab::Ism).unwrap();
    assert_eq!(ism_v2, "urn:us:gov:ic:ism:v2");
    assert_eq!(DdmsVersion::V3_0.namespace(Vocab::Ism).unwrap(), "urn:us:gov:ic:ism");
    assert_eq!(DdmsVersion::V2_0.namespace(Vocab::Gml).unwrap(), "http://www.opengis.net/gml");
    assert_eq!(
        DdmsVersion::V5_0.namespace(Vocab::Gml).unwrap(),
        "http://www.opengis.net/gml/3.2"
    );
    assert_eq!(
        DdmsVersion::V4_0_1.namespace(Vocab::Ddms).unwrap(),
        DdmsVersion::V4_1.namespace(Vocab::Ddms).unwrap()
    );
    assert!(DdmsVersion::V3_1.namespace(Vocab::Ntk).is_err());
}

#[test]
fn test_version_for_namespace() {
    assert_eq!(
        DdmsVersion::for_namespace("http://metadata.dod.mil/mdr/ns/DDMS/3.1/").unwrap(),
        DdmsVersion::V3_1
    );
    assert_eq!(
        DdmsVersion::for_namespace("urn:us:mil:ces:metadata:ddms:4").unwrap(),
        DdmsVersion::V4_1
    );
    assert_eq!(
        DdmsVersion::for_namespace("urn:us:mil:ces:metadata:ddms:5").unwrap(),
        DdmsVersion::V5_0
    );
    assert!(DdmsVersion::for_namespace("urn:example").is_err());
}

#[test]
fn test_current_version_switch() {
    let previous = DdmsVersion::set_current(DdmsVersion::V3_0);
    assert_eq!(DdmsVersion::current(), DdmsVersion::V3_0);
    assert_eq!(Context::current().version, DdmsVersion::V3_0);

    let ctx = Context::current();
    let title = Title::new(
        &ctx,
        "DDMSence",
        SecurityAttributes::new(&ctx, "U", &strings(&["USA"])).unwrap(),
    )
    .unwrap();
    assert_eq!(title.namespace(), "http://metadata.dod.mil/mdr/ns/DDMS/3.0/");

    assert_eq!(DdmsVersion::set_current(previous), DdmsVersion::V3_0);
    assert_eq!(DdmsVersion::current(), previous);
}

#[test]
fn test_properties() {
    let mut ctx = Context::new(DdmsVersion::V5_0);

    ctx.set_property("icism.cve.validationAsErrors", "false").unwrap();
    assert_eq!(ctx.cve_policy, CvePolicy::Warning);
    ctx.set_property("output.indexLevel", "1").unwrap();
    assert_eq!(ctx.output.index_level, IndexLevel::WhenMultiple);
    ctx.set_property("output.json.prettyPrint", "true").unwrap();
    assert!(ctx.output.json_pretty_print);
    ctx.set_property("gml.prefix", "opengis").unwrap();
    assert_eq!(ctx.prefix(Vocab::Gml), "opengis");

    let err = ctx.set_property("unknown.property", "true").unwrap_err();
    assert_eq!(
        err,
        Error::Configuration("unknown.property is not a configurable property.".to_string())
    );
    assert!(matches!(
        ctx.set_property("output.indexLevel", "3"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        ctx.set_property("output.json.prettyPrint", "yes"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        ctx.set_property("ddms.prefix", "1bad"),
        Err(Error::Configuration(_))
    ));
    assert_eq!(ctx.prefix(Vocab::Ddms), "ddms");
}

#[test]
fn test_custom_prefix_is_used_for_built_elements() {
    let mut ctx = Context::new(DdmsVersion::V5_0);
    ctx.set_property("ddms.prefix", "d").unwrap();
    let title = Title::new(
        &ctx,
        "DDMSence",
        SecurityAttributes::new(&ctx, "U", &strings(&["USA"])).unwrap(),
    )
    .unwrap();
    assert_eq!(title.qualified_name(), "d:title");
    let xml = title.to_xml().unwrap();
    assert!(xml.starts_with("<d:title xmlns:d=\"urn:us:mil:ces:metadata:ddms:5\""));
}

#[test]
fn test_cve_policy_switch() {
    let strict = Context::new(DdmsVersion::V5_0);
    let err = SecurityAttributes::new(&strict, "Dance", &strings(&["USA"])).unwrap_err();
    assert_eq!(
        err.as_validation().unwrap().message,
        "Dance is not a valid enumeration token for this attribute, as specified in CVEnumISMClassificationAll.xml."
    );

    let mut lenient = Context::new(DdmsVersion::V5_0);
    lenient.set_property("icism.cve.validationAsErrors", "false").unwrap();
    let security = SecurityAttributes::new(&lenient, "Dance", &strings(&["USA"])).unwrap();
    let title = Title::new(&lenient, "DDMSence", security).unwrap();
    let warnings = title.validation_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].text.ends_with("CVEnumISMClassificationAll.xml."));
    assert_eq!(warnings[0].locator, "/ddms:title");
}

#[test]
fn test_cve_policy_applies_to_builders() {
    let draft = SecurityAttributesBuilder {
        classification: "U".to_string(),
        owner_producers: strings(&["USA"]).into(),
        releasable_to: strings(&["Atlantis"]).into(),
        ..Default::default()
    };
    assert!(draft.commit(&Context::new(DdmsVersion::V4_1)).is_err());
    assert!(draft
        .commit(&Context::lenient(DdmsVersion::V4_1))
        .unwrap()
        .is_some());
}

#[test]
fn test_poc_type_warning_under_lenient_policy() {
    let ctx = Context::lenient(DdmsVersion::V4_1);
    let security = SecurityAttributes::new(&ctx, "U", &strings(&["USA"])).unwrap();
    let text = NoticeText::new(&ctx, "noticeText", &strings(&["Unknown"]), security).unwrap();
    let warnings = text.validation_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].text.contains("CVEnumISMPocType.xml"));
}

#[test]
fn test_vocabulary_tokens_follow_versions() {
    assert!(!cve::is_member(Vocabulary::AtomicEnergyMarkings, "RD", DdmsVersion::V3_0));
    assert!(cve::is_member(Vocabulary::AtomicEnergyMarkings, "RD", DdmsVersion::V3_1));
    assert!(!cve::is_member(Vocabulary::PocType, "ICD-710", DdmsVersion::V4_0_1));
    assert!(cve::is_member(Vocabulary::PocType, "ICD-710", DdmsVersion::V5_0));
    assert!(cve::tokens(Vocabulary::TypeOfExemptedSource, DdmsVersion::V2_0).contains(&"OADR"));
    assert!(cve::validate(Vocabulary::OwnerProducer, "USA", &Context::new(DdmsVersion::V2_0))
        .unwrap()
        .is_none());
}
