//! ISM security attributes
//!
//! Classification and control markings attached to most DDMS components. Most
//! attributes exist in every DDMS version; the exceptions are gated through
//! the rules table (for example `atomicEnergyMarkings` from 3.1, and
//! `declassManualReview` in 2.0 only).

use super::AttributeGroup;
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::cve::{self, Vocabulary};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// One attribute value, borrowed for rendering
pub(crate) enum AttrValue<'a> {
    Text(&'a str),
    Tokens(&'a [String]),
    Flag(Option<bool>),
}

impl AttrValue<'_> {
    pub(crate) fn is_set(&self) -> bool {
        match self {
            AttrValue::Text(s) => !s.is_empty(),
            AttrValue::Tokens(t) => !t.is_empty(),
            AttrValue::Flag(f) => f.is_some(),
        }
    }

    pub(crate) fn lexical(&self) -> String {
        match self {
            AttrValue::Text(s) => s.to_string(),
            AttrValue::Tokens(t) => helpers::join_tokens(t),
            AttrValue::Flag(f) => f.map(|b| b.to_string()).unwrap_or_default(),
        }
    }

    pub(crate) fn put_json(&self, map: &mut Map<String, JsonValue>, name: &str) {
        match self {
            AttrValue::Text(s) => converters::json_put(map, name, s),
            AttrValue::Tokens(t) => converters::json_put_list(map, name, t),
            AttrValue::Flag(f) => converters::json_put_bool(map, name, *f),
        }
    }

    pub(crate) fn render(&self, format: OutputFormat, name: &str) -> String {
        match self {
            AttrValue::Tokens(t) => converters::render_tokens(format, name, t),
            _ => converters::render(format, name, &self.lexical()),
        }
    }
}

/// ISM security attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SecurityAttributes {
    pub(crate) classification: String,
    pub(crate) owner_producers: Vec<String>,
    pub(crate) sci_controls: Vec<String>,
    pub(crate) sar_identifier: Vec<String>,
    pub(crate) atomic_energy_markings: Vec<String>,
    pub(crate) dissemination_controls: Vec<String>,
    pub(crate) display_only_to: Vec<String>,
    pub(crate) fgi_source_open: Vec<String>,
    pub(crate) fgi_source_protected: Vec<String>,
    pub(crate) releasable_to: Vec<String>,
    pub(crate) non_ic_markings: Vec<String>,
    pub(crate) classified_by: String,
    pub(crate) compilation_reason: String,
    pub(crate) derivatively_classified_by: String,
    pub(crate) classification_reason: String,
    pub(crate) derived_from: String,
    pub(crate) declass_date: String,
    pub(crate) declass_event: String,
    pub(crate) declass_exception: String,
    pub(crate) type_of_exempted_source: String,
    pub(crate) date_of_exempted_source: String,
    pub(crate) declass_manual_review: Option<bool>,
}

impl SecurityAttributes {
    /// The empty group
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a validated group with a classification and owners
    pub fn new(ctx: &Context, classification: &str, owner_producers: &[String]) -> Result<Self> {
        let attributes = Self {
            classification: classification.trim().to_string(),
            owner_producers: helpers::non_empty(owner_producers),
            ..Self::default()
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    /// Read the ISM attributes of `element` and validate them
    pub fn from_element(ctx: &Context, element: &Element) -> Result<Self> {
        let ns = ctx.namespace(Vocab::Ism)?;
        let text = |name: &str| element.attribute(ns, name).unwrap_or("").to_string();
        let tokens = |name: &str| helpers::split_tokens(element.attribute(ns, name).unwrap_or(""));

        let declass_manual_review = element
            .attribute(ns, "declassManualReview")
            .map(|v| helpers::parse_boolean(v, "declassManualReview"))
            .transpose()?;

        let attributes = Self {
            classification: text("classification"),
            owner_producers: tokens("ownerProducer"),
            sci_controls: tokens("SCIcontrols"),
            sar_identifier: tokens("SARIdentifier"),
            atomic_energy_markings: tokens("atomicEnergyMarkings"),
            dissemination_controls: tokens("disseminationControls"),
            display_only_to: tokens("displayOnlyTo"),
            fgi_source_open: tokens("FGIsourceOpen"),
            fgi_source_protected: tokens("FGIsourceProtected"),
            releasable_to: tokens("releasableTo"),
            non_ic_markings: tokens("nonICmarkings"),
            classified_by: text("classifiedBy"),
            compilation_reason: text("compilationReason"),
            derivatively_classified_by: text("derivativelyClassifiedBy"),
            classification_reason: text("classificationReason"),
            derived_from: text("derivedFrom"),
            declass_date: text("declassDate"),
            declass_event: text("declassEvent"),
            declass_exception: text("declassException"),
            type_of_exempted_source: text("typeOfExemptedSource"),
            date_of_exempted_source: text("dateOfExemptedSource"),
            declass_manual_review,
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    /// Every attribute in output order
    pub(crate) fn entries(&self) -> Vec<(&'static str, AttrValue<'_>)> {
        use AttrValue::{Flag, Text, Tokens};
        vec![
            ("classification", Text(&self.classification)),
            ("ownerProducer", Tokens(&self.owner_producers)),
            ("SCIcontrols", Tokens(&self.sci_controls)),
            ("SARIdentifier", Tokens(&self.sar_identifier)),
            ("atomicEnergyMarkings", Tokens(&self.atomic_energy_markings)),
            ("disseminationControls", Tokens(&self.dissemination_controls)),
            ("displayOnlyTo", Tokens(&self.display_only_to)),
            ("FGIsourceOpen", Tokens(&self.fgi_source_open)),
            ("FGIsourceProtected", Tokens(&self.fgi_source_protected)),
            ("releasableTo", Tokens(&self.releasable_to)),
            ("nonICmarkings", Tokens(&self.non_ic_markings)),
            ("classifiedBy", Text(&self.classified_by)),
            ("compilationReason", Text(&self.compilation_reason)),
            ("derivativelyClassifiedBy", Text(&self.derivatively_classified_by)),
            ("classificationReason", Text(&self.classification_reason)),
            ("derivedFrom", Text(&self.derived_from)),
            ("declassDate", Text(&self.declass_date)),
            ("declassEvent", Text(&self.declass_event)),
            ("declassException", Text(&self.declass_exception)),
            ("typeOfExemptedSource", Text(&self.type_of_exempted_source)),
            ("dateOfExemptedSource", Text(&self.date_of_exempted_source)),
            ("declassManualReview", Flag(self.declass_manual_review)),
        ]
    }

    /// Require a classification and at least one owner/producer
    pub fn require_classification(&self) -> Result<()> {
        if self.classification.is_empty() {
            return Err(Error::invalid("The classification attribute is required."));
        }
        if self.owner_producers.is_empty() {
            return Err(Error::invalid(
                "At least 1 ownerProducer attribute must exist.",
            ));
        }
        Ok(())
    }

    /// ISM:classification
    pub fn classification(&self) -> &str {
        &self.classification
    }

    /// ISM:ownerProducer
    pub fn owner_producers(&self) -> &[String] {
        &self.owner_producers
    }

    /// ISM:SCIcontrols
    pub fn sci_controls(&self) -> &[String] {
        &self.sci_controls
    }

    /// ISM:SARIdentifier
    pub fn sar_identifier(&self) -> &[String] {
        &self.sar_identifier
    }

    /// ISM:atomicEnergyMarkings
    pub fn atomic_energy_markings(&self) -> &[String] {
        &self.atomic_energy_markings
    }

    /// ISM:disseminationControls
    pub fn dissemination_controls(&self) -> &[String] {
        &self.dissemination_controls
    }

    /// ISM:displayOnlyTo
    pub fn display_only_to(&self) -> &[String] {
        &self.display_only_to
    }

    /// ISM:FGIsourceOpen
    pub fn fgi_source_open(&self) -> &[String] {
        &self.fgi_source_open
    }

    /// ISM:FGIsourceProtected
    pub fn fgi_source_protected(&self) -> &[String] {
        &self.fgi_source_protected
    }

    /// ISM:releasableTo
    pub fn releasable_to(&self) -> &[String] {
        &self.releasable_to
    }

    /// ISM:nonICmarkings
    pub fn non_ic_markings(&self) -> &[String] {
        &self.non_ic_markings
    }

    /// ISM:classifiedBy
    pub fn classified_by(&self) -> &str {
        &self.classified_by
    }

    /// ISM:compilationReason
    pub fn compilation_reason(&self) -> &str {
        &self.compilation_reason
    }

    /// ISM:derivativelyClassifiedBy
    pub fn derivatively_classified_by(&self) -> &str {
        &self.derivatively_classified_by
    }

    /// ISM:classificationReason
    pub fn classification_reason(&self) -> &str {
        &self.classification_reason
    }

    /// ISM:derivedFrom
    pub fn derived_from(&self) -> &str {
        &self.derived_from
    }

    /// ISM:declassDate
    pub fn declass_date(&self) -> &str {
        &self.declass_date
    }

    /// ISM:declassEvent
    pub fn declass_event(&self) -> &str {
        &self.declass_event
    }

    /// ISM:declassException
    pub fn declass_exception(&self) -> &str {
        &self.declass_exception
    }

    /// ISM:typeOfExemptedSource
    pub fn type_of_exempted_source(&self) -> &str {
        &self.type_of_exempted_source
    }

    /// ISM:dateOfExemptedSource
    pub fn date_of_exempted_source(&self) -> &str {
        &self.date_of_exempted_source
    }

    /// ISM:declassManualReview
    pub fn declass_manual_review(&self) -> Option<bool> {
        self.declass_manual_review
    }
}

const GATED: &[&str] = &[
    "compilationReason",
    "typeOfExemptedSource",
    "dateOfExemptedSource",
    "declassManualReview",
    "atomicEnergyMarkings",
    "displayOnlyTo",
];

impl AttributeGroup for SecurityAttributes {
    fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, value)| !value.is_set())
    }

    fn validate(&self, ctx: &Context) -> Result<Vec<ValidationMessage>> {
        for (name, value) in self.entries() {
            if GATED.contains(&name) {
                rules::check_present(ids::SECURITY_ATTRIBUTES, name, value.is_set(), ctx.version)?;
            }
        }

        if !self.declass_date.is_empty() {
            helpers::validate_xs_date(&self.declass_date, "declassDate")?;
        }
        if !self.date_of_exempted_source.is_empty() {
            helpers::validate_xs_date(&self.date_of_exempted_source, "dateOfExemptedSource")?;
        }

        let mut warnings = Vec::new();
        if !self.classification.is_empty() {
            warnings.extend(cve::validate(Vocabulary::Classification, &self.classification, ctx)?);
        }
        warnings.extend(cve::validate_all(Vocabulary::OwnerProducer, &self.owner_producers, ctx)?);
        warnings.extend(cve::validate_all(Vocabulary::SciControls, &self.sci_controls, ctx)?);
        warnings.extend(cve::validate_all(
            Vocabulary::AtomicEnergyMarkings,
            &self.atomic_energy_markings,
            ctx,
        )?);
        warnings.extend(cve::validate_all(
            Vocabulary::DisseminationControls,
            &self.dissemination_controls,
            ctx,
        )?);
        warnings.extend(cve::validate_all(Vocabulary::ReleasableTo, &self.display_only_to, ctx)?);
        warnings.extend(cve::validate_all(Vocabulary::OwnerProducer, &self.fgi_source_open, ctx)?);
        warnings.extend(cve::validate_all(
            Vocabulary::OwnerProducer,
            &self.fgi_source_protected,
            ctx,
        )?);
        warnings.extend(cve::validate_all(Vocabulary::ReleasableTo, &self.releasable_to, ctx)?);
        warnings.extend(cve::validate_all(Vocabulary::NonIcMarkings, &self.non_ic_markings, ctx)?);
        if !self.declass_exception.is_empty() {
            warnings.extend(cve::validate(
                Vocabulary::DeclassException,
                &self.declass_exception,
                ctx,
            )?);
        }
        if !self.type_of_exempted_source.is_empty() {
            warnings.extend(cve::validate(
                Vocabulary::TypeOfExemptedSource,
                &self.type_of_exempted_source,
                ctx,
            )?);
        }
        Ok(warnings)
    }

    fn add_to(&self, element: &mut Element, ctx: &Context) -> Result<()> {
        let ns = ctx.namespace(Vocab::Ism)?;
        let prefix = ctx.prefix(Vocab::Ism);
        for (name, value) in self.entries() {
            if value.is_set() {
                element.set_attribute(Some(prefix), Some(ns), name, value.lexical());
            }
        }
        Ok(())
    }

    fn output(&self, format: OutputFormat, prefix: &str) -> String {
        self.entries()
            .iter()
            .map(|(name, value)| value.render(format, &format!("{}{}", prefix, name)))
            .collect()
    }

    fn to_json_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        for (name, value) in self.entries() {
            value.put_json(&mut map, name);
        }
        map
    }
}

/// Draft of [`SecurityAttributes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityAttributesBuilder {
    /// ISM:classification
    pub classification: String,
    /// ISM:ownerProducer
    pub owner_producers: DraftList<String>,
    /// ISM:SCIcontrols
    pub sci_controls: DraftList<String>,
    /// ISM:SARIdentifier
    pub sar_identifier: DraftList<String>,
    /// ISM:atomicEnergyMarkings
    pub atomic_energy_markings: DraftList<String>,
    /// ISM:disseminationControls
    pub dissemination_controls: DraftList<String>,
    /// ISM:displayOnlyTo
    pub display_only_to: DraftList<String>,
    /// ISM:FGIsourceOpen
    pub fgi_source_open: DraftList<String>,
    /// ISM:FGIsourceProtected
    pub fgi_source_protected: DraftList<String>,
    /// ISM:releasableTo
    pub releasable_to: DraftList<String>,
    /// ISM:nonICmarkings
    pub non_ic_markings: DraftList<String>,
    /// ISM:classifiedBy
    pub classified_by: String,
    /// ISM:compilationReason
    pub compilation_reason: String,
    /// ISM:derivativelyClassifiedBy
    pub derivatively_classified_by: String,
    /// ISM:classificationReason
    pub classification_reason: String,
    /// ISM:derivedFrom
    pub derived_from: String,
    /// ISM:declassDate
    pub declass_date: String,
    /// ISM:declassEvent
    pub declass_event: String,
    /// ISM:declassException
    pub declass_exception: String,
    /// ISM:typeOfExemptedSource
    pub type_of_exempted_source: String,
    /// ISM:dateOfExemptedSource
    pub date_of_exempted_source: String,
    /// ISM:declassManualReview
    pub declass_manual_review: Option<bool>,
}

impl SecurityAttributesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit, treating an empty builder as the empty group
    pub fn commit_or_empty(&self, ctx: &Context) -> Result<SecurityAttributes> {
        Ok(self.commit(ctx)?.unwrap_or_default())
    }
}

impl Builder for SecurityAttributesBuilder {
    type Target = SecurityAttributes;

    fn is_empty(&self) -> bool {
        let scalars = [
            &self.classification,
            &self.classified_by,
            &self.compilation_reason,
            &self.derivatively_classified_by,
            &self.classification_reason,
            &self.derived_from,
            &self.declass_date,
            &self.declass_event,
            &self.declass_exception,
            &self.type_of_exempted_source,
            &self.date_of_exempted_source,
        ];
        let lists = [
            &self.owner_producers,
            &self.sci_controls,
            &self.sar_identifier,
            &self.atomic_energy_markings,
            &self.dissemination_controls,
            &self.display_only_to,
            &self.fgi_source_open,
            &self.fgi_source_protected,
            &self.releasable_to,
            &self.non_ic_markings,
        ];
        scalars.iter().all(|s| s.is_blank())
            && lists.iter().all(|l| l.is_blank())
            && self.declass_manual_review.is_none()
    }

    fn build(&self, ctx: &Context) -> Result<SecurityAttributes> {
        let attributes = SecurityAttributes {
            classification: self.classification.trim().to_string(),
            owner_producers: self.owner_producers.values(),
            sci_controls: self.sci_controls.values(),
            sar_identifier: self.sar_identifier.values(),
            atomic_energy_markings: self.atomic_energy_markings.values(),
            dissemination_controls: self.dissemination_controls.values(),
            display_only_to: self.display_only_to.values(),
            fgi_source_open: self.fgi_source_open.values(),
            fgi_source_protected: self.fgi_source_protected.values(),
            releasable_to: self.releasable_to.values(),
            non_ic_markings: self.non_ic_markings.values(),
            classified_by: self.classified_by.trim().to_string(),
            compilation_reason: self.compilation_reason.trim().to_string(),
            derivatively_classified_by: self.derivatively_classified_by.trim().to_string(),
            classification_reason: self.classification_reason.trim().to_string(),
            derived_from: self.derived_from.trim().to_string(),
            declass_date: self.declass_date.trim().to_string(),
            declass_event: self.declass_event.trim().to_string(),
            declass_exception: self.declass_exception.trim().to_string(),
            type_of_exempted_source: self.type_of_exempted_source.trim().to_string(),
            date_of_exempted_source: self.date_of_exempted_source.trim().to_string(),
            declass_manual_review: self.declass_manual_review,
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }
}

blank_builder!(SecurityAttributesBuilder);

impl From<&SecurityAttributes> for SecurityAttributesBuilder {
    fn from(attributes: &SecurityAttributes) -> Self {
        Self {
            classification: attributes.classification.clone(),
            owner_producers: attributes.owner_producers.as_slice().into(),
            sci_controls: attributes.sci_controls.as_slice().into(),
            sar_identifier: attributes.sar_identifier.as_slice().into(),
            atomic_energy_markings: attributes.atomic_energy_markings.as_slice().into(),
            dissemination_controls: attributes.dissemination_controls.as_slice().into(),
            display_only_to: attributes.display_only_to.as_slice().into(),
            fgi_source_open: attributes.fgi_source_open.as_slice().into(),
            fgi_source_protected: attributes.fgi_source_protected.as_slice().into(),
            releasable_to: attributes.releasable_to.as_slice().into(),
            non_ic_markings: attributes.non_ic_markings.as_slice().into(),
            classified_by: attributes.classified_by.clone(),
            compilation_reason: attributes.compilation_reason.clone(),
            derivatively_classified_by: attributes.derivatively_classified_by.clone(),
            classification_reason: attributes.classification_reason.clone(),
            derived_from: attributes.derived_from.clone(),
            declass_date: attributes.declass_date.clone(),
            declass_event: attributes.declass_event.clone(),
            declass_exception: attributes.declass_exception.clone(),
            type_of_exempted_source: attributes.type_of_exempted_source.clone(),
            date_of_exempted_source: attributes.date_of_exempted_source.clone(),
            declass_manual_review: attributes.declass_manual_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::DdmsVersion;
    use pretty_assertions::assert_eq;

    fn usa() -> Vec<String> {
        vec!["USA".to_string()]
    }

    #[test]
    fn test_minimal_group_in_every_version() {
        for version in DdmsVersion::ALL {
            let ctx = Context::new(version);
            let attributes = SecurityAttributes::new(&ctx, "U", &usa()).unwrap();
            assert!(attributes.require_classification().is_ok());
            assert!(!attributes.is_empty());
        }
    }

    #[test]
    fn test_require_classification() {
        let ctx = Context::new(DdmsVersion::V5_0);
        assert!(SecurityAttributes::empty().require_classification().is_err());
        let no_owner = SecurityAttributes::new(&ctx, "U", &[]).unwrap();
        let err = no_owner.require_classification().unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "At least 1 ownerProducer attribute must exist."
        );
    }

    #[test]
    fn test_atomic_energy_markings_gated() {
        let mut builder = SecurityAttributesBuilder::new();
        builder.classification = "U".to_string();
        *builder.owner_producers.slot(0) = "USA".to_string();
        *builder.atomic_energy_markings.slot(0) = "RD".to_string();

        let err = builder.commit(&Context::new(DdmsVersion::V3_0)).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The atomicEnergyMarkings attribute cannot be used until DDMS 3.1 or later."
        );
        assert!(builder.commit(&Context::new(DdmsVersion::V3_1)).unwrap().is_some());
    }

    #[test]
    fn test_declass_manual_review_retired() {
        let mut builder = SecurityAttributesBuilder::new();
        builder.declass_manual_review = Some(true);
        assert!(builder.commit(&Context::new(DdmsVersion::V2_0)).is_ok());
        let err = builder.commit(&Context::new(DdmsVersion::V3_0)).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The declassManualReview attribute cannot be used after DDMS 2.0."
        );
    }

    #[test]
    fn test_cve_policy() {
        let strict = Context::new(DdmsVersion::V5_0);
        assert!(SecurityAttributes::new(&strict, "Dance", &usa()).is_err());

        let lenient = Context::lenient(DdmsVersion::V5_0);
        let attributes = SecurityAttributes::new(&lenient, "Dance", &usa()).unwrap();
        let warnings = attributes.warnings(&lenient);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].text.contains("CVEnumISMClassificationAll.xml"));
    }

    #[test]
    fn test_declass_date_format() {
        let mut builder = SecurityAttributesBuilder::new();
        builder.declass_date = "2005".to_string();
        assert!(builder.commit(&Context::new(DdmsVersion::V5_0)).is_err());
        builder.declass_date = "2005-10-10".to_string();
        assert!(builder.commit(&Context::new(DdmsVersion::V5_0)).is_ok());
    }

    #[test]
    fn test_add_to_and_read_back() {
        let ctx = Context::new(DdmsVersion::V3_1);
        let mut builder = SecurityAttributesBuilder::new();
        builder.classification = "C".to_string();
        *builder.owner_producers.slot(1) = "GBR".to_string();
        *builder.owner_producers.slot(0) = "USA".to_string();
        builder.declass_date = "2005-10-10".to_string();
        let attributes = builder.commit_or_empty(&ctx).unwrap();

        let mut element = Element::build("ddms", "http://metadata.dod.mil/mdr/ns/DDMS/3.1/", "title");
        attributes.add_to(&mut element, &ctx).unwrap();
        assert_eq!(element.attribute("urn:us:gov:ic:ism", "ownerProducer"), Some("USA GBR"));

        let read = SecurityAttributes::from_element(&ctx, &element).unwrap();
        assert_eq!(read, attributes);
        assert_eq!(SecurityAttributesBuilder::from(&read), {
            let mut expected = builder.clone();
            expected.owner_producers = vec!["USA".to_string(), "GBR".to_string()].into();
            expected
        });
    }

    #[test]
    fn test_output() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let attributes = SecurityAttributes::new(
            &ctx,
            "U",
            &["USA".to_string(), "AUS".to_string()],
        )
        .unwrap();
        assert_eq!(
            attributes.output(OutputFormat::Text, "title."),
            "title.classification: U\ntitle.ownerProducer: USA AUS\n"
        );
        assert_eq!(
            JsonValue::Object(attributes.to_json_map()).to_string(),
            r#"{"classification":"U","ownerProducer":["USA","AUS"]}"#
        );
    }

    #[test]
    fn test_builder_emptiness() {
        let mut builder = SecurityAttributesBuilder::new();
        assert!(builder.is_empty());
        builder.releasable_to.ensure_len(3);
        assert!(builder.is_empty());
        builder.derived_from = "source".to_string();
        assert!(!builder.is_empty());
    }
}
