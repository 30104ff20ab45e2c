//! Version-gating and cardinality table
//!
//! Every gated or counted field of every component and attribute group is a row
//! in [`FIELD_RULES`]: the window of versions it exists in, and its cardinality,
//! which may itself change from one version to the next. Components never encode
//! these facts in their own conditionals; they call [`check`] (or one of its
//! wrappers) and the table decides.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::versions::DdmsVersion;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use DdmsVersion::{V2_0, V3_0, V3_1, V4_0_1, V4_1};

/// What kind of thing a rule governs, for message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A child element
    Element,
    /// A single attribute
    Attribute,
    /// A whole attribute group
    AttributeGroup,
    /// The component type itself
    Component,
}

/// Allowed occurrence count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Minimum occurrences
    pub min: usize,
    /// Maximum occurrences (None for unbounded)
    pub max: Option<usize>,
}

impl Cardinality {
    /// 0..1
    pub const OPTIONAL: Cardinality = Cardinality { min: 0, max: Some(1) };
    /// 1..1
    pub const REQUIRED: Cardinality = Cardinality { min: 1, max: Some(1) };
    /// 0..*
    pub const ANY: Cardinality = Cardinality { min: 0, max: None };
    /// 1..*
    pub const ONE_OR_MORE: Cardinality = Cardinality { min: 1, max: None };

    /// True if `count` fits
    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// Whether a field can appear in a given version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Must not appear
    Absent,
    /// May appear
    Optional,
    /// Must appear
    Required,
}

/// One row of the gating table
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Owning component or attribute group
    pub component: &'static str,
    /// Field name, as it appears in XML
    pub field: &'static str,
    /// Message wording
    pub kind: FieldKind,
    /// First version the field exists in
    pub introduced: DdmsVersion,
    /// First version the field no longer exists in
    pub retired: Option<DdmsVersion>,
    /// Stepwise cardinality: each entry applies from its version onward
    pub cardinality: &'static [(DdmsVersion, Cardinality)],
}

impl FieldRule {
    /// True if the field exists in `version`
    pub fn exists_in(&self, version: DdmsVersion) -> bool {
        version >= self.introduced && self.retired.map_or(true, |r| version < r)
    }

    /// Cardinality in `version`, or None where the field does not exist
    pub fn cardinality_in(&self, version: DdmsVersion) -> Option<Cardinality> {
        if !self.exists_in(version) {
            return None;
        }
        self.cardinality
            .iter()
            .rev()
            .find(|(since, _)| *since <= version)
            .map(|(_, c)| *c)
    }

    /// Availability in `version`
    pub fn availability(&self, version: DdmsVersion) -> Availability {
        match self.cardinality_in(version) {
            None => Availability::Absent,
            Some(c) if c.min > 0 => Availability::Required,
            Some(_) => Availability::Optional,
        }
    }

    fn noun(&self) -> String {
        match self.kind {
            FieldKind::Element | FieldKind::Component => format!("The {} element", self.field),
            FieldKind::Attribute => format!("The {} attribute", self.field),
            FieldKind::AttributeGroup => format!("The {} attributes", self.field),
        }
    }

    fn plural(&self) -> &'static str {
        match self.kind {
            FieldKind::Attribute => "attributes",
            _ => "elements",
        }
    }

    /// Check an occurrence count against this rule
    pub fn check(&self, count: usize, version: DdmsVersion) -> Result<()> {
        let Some(cardinality) = self.cardinality_in(version) else {
            if count == 0 {
                return Ok(());
            }
            let message = if version < self.introduced {
                format!(
                    "{} cannot be used until DDMS {} or later.",
                    self.noun(),
                    self.introduced
                )
            } else {
                let last = self
                    .retired
                    .and_then(|r| r.previous())
                    .unwrap_or(self.introduced);
                format!("{} cannot be used after DDMS {}.", self.noun(), last)
            };
            return Err(Error::invalid(message));
        };

        if count < cardinality.min {
            let message = match (cardinality.min, cardinality.max) {
                (1, Some(1)) => format!("{} is required.", self.noun()),
                (1, _) => format!("At least 1 {} element must exist.", self.field),
                (min, _) => format!(
                    "At least {} {} {} must exist.",
                    min,
                    self.field,
                    self.plural()
                ),
            };
            return Err(Error::invalid(message));
        }

        if let Some(max) = cardinality.max {
            if count > max {
                let message = if max == 1 {
                    format!("Only 1 {} {} can be used.", self.field, singular(self.kind))
                } else {
                    format!(
                        "No more than {} {} {} can be used.",
                        max,
                        self.field,
                        self.plural()
                    )
                };
                return Err(Error::invalid(message));
            }
        }

        Ok(())
    }
}

fn singular(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Attribute => "attribute",
        _ => "element",
    }
}

const fn row(
    component: &'static str,
    field: &'static str,
    kind: FieldKind,
    cardinality: &'static [(DdmsVersion, Cardinality)],
) -> FieldRule {
    FieldRule {
        component,
        field,
        kind,
        introduced: V2_0,
        retired: None,
        cardinality,
    }
}

const fn since(
    component: &'static str,
    field: &'static str,
    kind: FieldKind,
    introduced: DdmsVersion,
    cardinality: &'static [(DdmsVersion, Cardinality)],
) -> FieldRule {
    FieldRule {
        component,
        field,
        kind,
        introduced,
        retired: None,
        cardinality,
    }
}

const fn until(
    component: &'static str,
    field: &'static str,
    kind: FieldKind,
    retired: DdmsVersion,
    cardinality: &'static [(DdmsVersion, Cardinality)],
) -> FieldRule {
    FieldRule {
        component,
        field,
        kind,
        introduced: V2_0,
        retired: Some(retired),
        cardinality,
    }
}

const OPT: &[(DdmsVersion, Cardinality)] = &[(V2_0, Cardinality::OPTIONAL)];
const REQ: &[(DdmsVersion, Cardinality)] = &[(V2_0, Cardinality::REQUIRED)];
const ANY: &[(DdmsVersion, Cardinality)] = &[(V2_0, Cardinality::ANY)];
const MANY: &[(DdmsVersion, Cardinality)] = &[(V2_0, Cardinality::ONE_OR_MORE)];

use FieldKind::{Attribute, AttributeGroup, Component, Element as Child};

/// Component ids used as the first key of the table
pub mod ids {
    /// ddms:title
    pub const TITLE: &str = "title";
    /// ddms:keyword
    pub const KEYWORD: &str = "keyword";
    /// ddms:dates
    pub const DATES: &str = "dates";
    /// ddms:temporalCoverage
    pub const TEMPORAL_COVERAGE: &str = "temporalCoverage";
    /// ddms:person / ddms:Person
    pub const PERSON: &str = "person";
    /// ddms:organization / ddms:Organization
    pub const ORGANIZATION: &str = "organization";
    /// ddms:subOrganization
    pub const SUB_ORGANIZATION: &str = "subOrganization";
    /// ddms:creator and the other producer roles
    pub const PRODUCER: &str = "producer";
    /// ddms:geographicIdentifier
    pub const GEOGRAPHIC_IDENTIFIER: &str = "geographicIdentifier";
    /// ddms:countryCode
    pub const COUNTRY_CODE: &str = "countryCode";
    /// ddms:subDivisionCode
    pub const SUB_DIVISION_CODE: &str = "subDivisionCode";
    /// ddms:facilityIdentifier
    pub const FACILITY_IDENTIFIER: &str = "facilityIdentifier";
    /// ISM:Notice
    pub const NOTICE: &str = "Notice";
    /// ISM:NoticeText
    pub const NOTICE_TEXT: &str = "NoticeText";
    /// gml:Point
    pub const POINT: &str = "Point";
    /// ISM security attribute group
    pub const SECURITY_ATTRIBUTES: &str = "ISM";
    /// ISM notice attribute group
    pub const NOTICE_ATTRIBUTES: &str = "ISM notice";
}

use ids::*;

/// The gating table
pub static FIELD_RULES: &[FieldRule] = &[
    // ddms:keyword
    row(KEYWORD, "value", Attribute, REQ),
    since(KEYWORD, "ISM", AttributeGroup, V4_0_1, OPT),
    since(KEYWORD, "extensible", AttributeGroup, V3_0, OPT),
    // ddms:dates
    row(DATES, "created", Attribute, OPT),
    row(DATES, "posted", Attribute, OPT),
    row(DATES, "validTil", Attribute, OPT),
    row(DATES, "infoCutOff", Attribute, OPT),
    since(DATES, "approvedOn", Attribute, V3_1, OPT),
    since(DATES, "receivedOn", Attribute, V4_0_1, OPT),
    // ddms:temporalCoverage
    row(TEMPORAL_COVERAGE, "TimePeriod", Child, REQ),
    row(TEMPORAL_COVERAGE, "name", Child, OPT),
    row(TEMPORAL_COVERAGE, "start", Child, REQ),
    row(TEMPORAL_COVERAGE, "end", Child, REQ),
    since(TEMPORAL_COVERAGE, "ISM", AttributeGroup, V3_0, OPT),
    // ddms:person
    row(PERSON, "name", Child, MANY),
    row(PERSON, "surname", Child, REQ),
    row(PERSON, "userID", Child, OPT),
    row(
        PERSON,
        "affiliation",
        Child,
        &[(V2_0, Cardinality::OPTIONAL), (V4_0_1, Cardinality::ANY)],
    ),
    row(PERSON, "phone", Child, ANY),
    row(PERSON, "email", Child, ANY),
    // ddms:organization
    row(ORGANIZATION, "name", Child, MANY),
    row(ORGANIZATION, "phone", Child, ANY),
    row(ORGANIZATION, "email", Child, ANY),
    since(ORGANIZATION, "subOrganization", Child, V4_0_1, ANY),
    since(ORGANIZATION, "acronym", Attribute, V4_1, OPT),
    // ddms:subOrganization
    since(SUB_ORGANIZATION, SUB_ORGANIZATION, Component, V4_0_1, OPT),
    // producer roles
    row(PRODUCER, "person or organization", Child, REQ),
    // ddms:geographicIdentifier
    row(GEOGRAPHIC_IDENTIFIER, "name", Child, ANY),
    row(GEOGRAPHIC_IDENTIFIER, "region", Child, ANY),
    row(GEOGRAPHIC_IDENTIFIER, "countryCode", Child, OPT),
    since(GEOGRAPHIC_IDENTIFIER, "subDivisionCode", Child, V4_0_1, OPT),
    row(GEOGRAPHIC_IDENTIFIER, "facilityIdentifier", Child, OPT),
    // code components
    row(COUNTRY_CODE, "qualifier", Attribute, REQ),
    row(COUNTRY_CODE, "value", Attribute, REQ),
    since(SUB_DIVISION_CODE, SUB_DIVISION_CODE, Component, V4_0_1, OPT),
    row(SUB_DIVISION_CODE, "qualifier", Attribute, REQ),
    row(SUB_DIVISION_CODE, "value", Attribute, REQ),
    row(FACILITY_IDENTIFIER, "beNumber", Attribute, REQ),
    row(FACILITY_IDENTIFIER, "osuffix", Attribute, REQ),
    // ISM:Notice
    since(NOTICE, NOTICE, Component, V4_0_1, OPT),
    since(NOTICE, "NoticeText", Child, V4_0_1, MANY),
    since(NOTICE_TEXT, NOTICE_TEXT, Component, V4_0_1, OPT),
    since(NOTICE_TEXT, "pocType", Attribute, V4_1, OPT),
    // gml:Point
    row(POINT, "pos", Child, REQ),
    // ISM security attributes
    since(SECURITY_ATTRIBUTES, "compilationReason", Attribute, V3_0, OPT),
    until(SECURITY_ATTRIBUTES, "typeOfExemptedSource", Attribute, V3_1, OPT),
    until(SECURITY_ATTRIBUTES, "dateOfExemptedSource", Attribute, V3_1, OPT),
    until(SECURITY_ATTRIBUTES, "declassManualReview", Attribute, V3_0, OPT),
    since(SECURITY_ATTRIBUTES, "atomicEnergyMarkings", Attribute, V3_1, OPT),
    since(SECURITY_ATTRIBUTES, "displayOnlyTo", Attribute, V3_1, OPT),
    // ISM notice attributes
    since(NOTICE_ATTRIBUTES, "noticeType", Attribute, V4_0_1, OPT),
    since(NOTICE_ATTRIBUTES, "noticeReason", Attribute, V4_0_1, OPT),
    since(NOTICE_ATTRIBUTES, "noticeDate", Attribute, V4_0_1, OPT),
    since(NOTICE_ATTRIBUTES, "unregisteredNoticeType", Attribute, V4_0_1, OPT),
    since(NOTICE_ATTRIBUTES, "externalNotice", Attribute, V4_1, OPT),
];

static INDEX: Lazy<HashMap<(&'static str, &'static str), &'static FieldRule>> = Lazy::new(|| {
    FIELD_RULES
        .iter()
        .map(|rule| ((rule.component, rule.field), rule))
        .collect()
});

/// Look up a rule
pub fn rule(component: &str, field: &str) -> Result<&'static FieldRule> {
    INDEX.get(&(component, field)).copied().ok_or_else(|| {
        Error::Configuration(format!(
            "No version rule is registered for {}.{}",
            component, field
        ))
    })
}

/// Availability of a field in `version`
pub fn availability(component: &str, field: &str, version: DdmsVersion) -> Result<Availability> {
    Ok(rule(component, field)?.availability(version))
}

/// Check an occurrence count
pub fn check(component: &str, field: &str, count: usize, version: DdmsVersion) -> Result<()> {
    rule(component, field)?.check(count, version)
}

/// Check an optional attribute or group: present counts as one occurrence
pub fn check_present(
    component: &str,
    field: &str,
    present: bool,
    version: DdmsVersion,
) -> Result<()> {
    check(component, field, usize::from(present), version)
}

/// Count an element's children named `field` in `namespace` and check the count
pub fn check_children(
    component: &str,
    field: &str,
    element: &Element,
    namespace: &str,
    version: DdmsVersion,
) -> Result<()> {
    let count = element.children_named(namespace, field).count();
    check(component, field, count, version)
}

/// Check that the children listed in `order` appear in that relative order
pub fn check_child_order(element: &Element, namespace: &str, order: &[&str]) -> Result<()> {
    let mut latest: Option<usize> = None;
    for child in &element.children {
        if child.namespace() != Some(namespace) {
            continue;
        }
        let Some(position) = order.iter().position(|name| *name == child.local_name()) else {
            continue;
        };
        if let Some(previous) = latest.filter(|previous| position < *previous) {
            return Err(Error::invalid(format!(
                "The {} element must come before the {} element.",
                order[position], order[previous]
            )));
        }
        latest = Some(position);
    }
    Ok(())
}

/// Check a field that occurs exactly once and hand back its element
pub fn single<'a>(
    component: &str,
    field: &str,
    candidates: Vec<&'a Element>,
    version: DdmsVersion,
) -> Result<&'a Element> {
    check(component, field, candidates.len(), version)?;
    match candidates.as_slice() {
        [only] => Ok(*only),
        _ => Err(Error::Configuration(format!(
            "{}.{} is not registered as exactly one",
            component, field
        ))),
    }
}

/// Check that a component type exists in `version`
pub fn check_component(component: &str, version: DdmsVersion) -> Result<()> {
    check(component, component, 1, version)
}
