//! ddms:geographicIdentifier and the code components it holds

use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

fn code_attributes(ctx: &Context, element: &Element, first: &str, second: &str) -> Result<(String, String)> {
    let ddms = ctx.namespace(Vocab::Ddms)?;
    let read = |name: &str| element.attribute(ddms, name).unwrap_or("").trim().to_string();
    Ok((read(first), read(second)))
}

fn code_element(ctx: &Context, local_name: &str, pairs: [(&str, &str); 2]) -> Result<Element> {
    let mut element = base::build_element(ctx, Vocab::Ddms, local_name)?;
    for (name, value) in pairs {
        base::set_vocab_attribute(&mut element, ctx, Vocab::Ddms, name, value.trim())?;
    }
    Ok(element)
}

fn code_output(format: OutputFormat, name: &str, pairs: [(&str, &str); 2]) -> String {
    pairs
        .iter()
        .map(|(field, value)| converters::render(format, &format!("{}.{}", name, field), value))
        .collect()
}

fn code_json(pairs: [(&str, &str); 2]) -> JsonValue {
    let mut map = Map::new();
    for (field, value) in pairs {
        converters::json_put(&mut map, field, value);
    }
    JsonValue::Object(map)
}

/// A country code, qualified by the code list it comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode {
    core: ComponentCore,
    qualifier: String,
    value: String,
}

impl CountryCode {
    /// Element local name
    pub const NAME: &'static str = "countryCode";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let (qualifier, value) = code_attributes(ctx, &element, "qualifier", "value")?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    qualifier,
                    value,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, qualifier: &str, value: &str) -> Result<Self> {
        let element = code_element(ctx, Self::NAME, [("qualifier", qualifier), ("value", value)])?;
        Self::from_element(ctx, element)
    }

    /// ddms:qualifier
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// ddms:value
    pub fn value(&self) -> &str {
        &self.value
    }

    fn pairs(&self) -> [(&str, &str); 2] {
        [("qualifier", self.qualifier.as_str()), ("value", self.value.as_str())]
    }
}

impl Component for CountryCode {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        for (field, value) in self.pairs() {
            rules::check_present(ids::COUNTRY_CODE, field, !value.is_empty(), ctx.version)?;
        }
        Ok(())
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        code_output(format, &format!("{}{}{}", prefix, self.name(), suffix), self.pairs())
    }

    fn to_json(&self) -> JsonValue {
        code_json(self.pairs())
    }
}

/// A country subdivision code, available from DDMS 4.0.1
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubDivisionCode {
    core: ComponentCore,
    qualifier: String,
    value: String,
}

impl SubDivisionCode {
    /// Element local name
    pub const NAME: &'static str = "subDivisionCode";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            rules::check_component(ids::SUB_DIVISION_CODE, ctx.version)?;
            let (qualifier, value) = code_attributes(ctx, &element, "qualifier", "value")?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    qualifier,
                    value,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, qualifier: &str, value: &str) -> Result<Self> {
        let element = code_element(ctx, Self::NAME, [("qualifier", qualifier), ("value", value)])?;
        Self::from_element(ctx, element)
    }

    /// ddms:qualifier
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// ddms:value
    pub fn value(&self) -> &str {
        &self.value
    }

    fn pairs(&self) -> [(&str, &str); 2] {
        [("qualifier", self.qualifier.as_str()), ("value", self.value.as_str())]
    }
}

impl Component for SubDivisionCode {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        rules::check_component(ids::SUB_DIVISION_CODE, ctx.version)?;
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        for (field, value) in self.pairs() {
            rules::check_present(ids::SUB_DIVISION_CODE, field, !value.is_empty(), ctx.version)?;
        }
        Ok(())
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        code_output(format, &format!("{}{}{}", prefix, self.name(), suffix), self.pairs())
    }

    fn to_json(&self) -> JsonValue {
        code_json(self.pairs())
    }
}

/// A facility, identified by basic encyclopedia number and suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacilityIdentifier {
    core: ComponentCore,
    be_number: String,
    osuffix: String,
}

impl FacilityIdentifier {
    /// Element local name
    pub const NAME: &'static str = "facilityIdentifier";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let (be_number, osuffix) = code_attributes(ctx, &element, "beNumber", "osuffix")?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    be_number,
                    osuffix,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, be_number: &str, osuffix: &str) -> Result<Self> {
        let element = code_element(ctx, Self::NAME, [("beNumber", be_number), ("osuffix", osuffix)])?;
        Self::from_element(ctx, element)
    }

    /// ddms:beNumber
    pub fn be_number(&self) -> &str {
        &self.be_number
    }

    /// ddms:osuffix
    pub fn osuffix(&self) -> &str {
        &self.osuffix
    }

    fn pairs(&self) -> [(&str, &str); 2] {
        [("beNumber", self.be_number.as_str()), ("osuffix", self.osuffix.as_str())]
    }
}

impl Component for FacilityIdentifier {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        for (field, value) in self.pairs() {
            rules::check_present(ids::FACILITY_IDENTIFIER, field, !value.is_empty(), ctx.version)?;
        }
        Ok(())
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        code_output(format, &format!("{}{}{}", prefix, self.name(), suffix), self.pairs())
    }

    fn to_json(&self) -> JsonValue {
        code_json(self.pairs())
    }
}

/// Child elements, in schema order
const CHILDREN: [&str; 5] = ["name", "region", "countryCode", "subDivisionCode", "facilityIdentifier"];

/// A named place, region, coded country or subdivision, or a single facility
///
/// A facility identifier must be the only child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeographicIdentifier {
    core: ComponentCore,
    names: Vec<String>,
    regions: Vec<String>,
    country_code: Option<CountryCode>,
    sub_division_code: Option<SubDivisionCode>,
    facility_identifier: Option<FacilityIdentifier>,
}

impl GeographicIdentifier {
    /// Element local name
    pub const NAME: &'static str = "geographicIdentifier";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let names = helpers::non_empty(&element.child_texts(ddms, "name"));
            let regions = helpers::non_empty(&element.child_texts(ddms, "region"));
            let child = |name: &str| element.first_child(ddms, name).cloned();
            let country_code = child(CountryCode::NAME)
                .map(|e| CountryCode::from_element(ctx, e))
                .transpose()?;
            let sub_division_code = child(SubDivisionCode::NAME)
                .map(|e| SubDivisionCode::from_element(ctx, e))
                .transpose()?;
            let facility_identifier = child(FacilityIdentifier::NAME)
                .map(|e| FacilityIdentifier::from_element(ctx, e))
                .transpose()?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    names,
                    regions,
                    country_code,
                    sub_division_code,
                    facility_identifier,
                },
                ctx,
            )
        })
    }

    /// Build from raw values; blank names and regions produce no element
    pub fn new(
        ctx: &Context,
        names: &[String],
        regions: &[String],
        country_code: Option<CountryCode>,
        sub_division_code: Option<SubDivisionCode>,
        facility_identifier: Option<FacilityIdentifier>,
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ddms, Self::NAME)?;
        for (name, values) in [("name", names), ("region", regions)] {
            for value in helpers::non_empty(values) {
                element.add_child(base::text_element(ctx, Vocab::Ddms, name, &value)?);
            }
        }
        let codes = [
            country_code.as_ref().map(|c| c.element()),
            sub_division_code.as_ref().map(|c| c.element()),
            facility_identifier.as_ref().map(|c| c.element()),
        ];
        for code in codes.into_iter().flatten() {
            element.add_child(code.clone());
        }
        Self::from_element(ctx, element)
    }

    /// Build an identifier holding only a facility
    pub fn for_facility(ctx: &Context, facility_identifier: FacilityIdentifier) -> Result<Self> {
        Self::new(ctx, &[], &[], None, None, Some(facility_identifier))
    }

    /// Place names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Regions
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Country code
    pub fn country_code(&self) -> Option<&CountryCode> {
        self.country_code.as_ref()
    }

    /// Subdivision code
    pub fn sub_division_code(&self) -> Option<&SubDivisionCode> {
        self.sub_division_code.as_ref()
    }

    /// Facility identifier
    pub fn facility_identifier(&self) -> Option<&FacilityIdentifier> {
        self.facility_identifier.as_ref()
    }

    /// True if the identifier is a lone facility
    pub fn has_facility_identifier_only(&self) -> bool {
        self.facility_identifier.is_some()
            && self.names.is_empty()
            && self.regions.is_empty()
            && self.country_code.is_none()
            && self.sub_division_code.is_none()
    }

    fn codes(&self) -> Vec<&dyn Component> {
        let mut codes: Vec<&dyn Component> = Vec::new();
        if let Some(code) = &self.country_code {
            codes.push(code);
        }
        if let Some(code) = &self.sub_division_code {
            codes.push(code);
        }
        if let Some(code) = &self.facility_identifier {
            codes.push(code);
        }
        codes
    }
}

impl Component for GeographicIdentifier {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        let ddms = ctx.namespace(Vocab::Ddms)?;
        base::require_qualified_name(self.element(), ddms, Self::NAME)?;
        for field in CHILDREN {
            rules::check_children(ids::GEOGRAPHIC_IDENTIFIER, field, self.element(), ddms, ctx.version)?;
        }
        if self.names.is_empty()
            && self.regions.is_empty()
            && self.country_code.is_none()
            && self.sub_division_code.is_none()
            && self.facility_identifier.is_none()
        {
            return Err(Error::invalid(
                "At least 1 of name, region, countryCode, subDivisionCode, or facilityIdentifier must exist.",
            ));
        }
        if self.facility_identifier.is_some() && !self.has_facility_identifier_only() {
            return Err(Error::invalid(
                "facilityIdentifier must not be used in tandem with other components.",
            ));
        }
        Ok(())
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let mut warnings: Vec<ValidationMessage> = match ctx.namespace(Vocab::Ddms) {
            Ok(ddms) => self
                .element()
                .children
                .iter()
                .filter(|child| child.name.matches(ddms, "name") || child.name.matches(ddms, "region"))
                .filter(|child| child.text().trim().is_empty())
                .map(|child| helpers::empty_element_warning(&child.qualified_name()))
                .collect(),
            Err(_) => Vec::new(),
        };
        for code in self.codes() {
            warnings.extend(code.validation_warnings().iter().cloned());
        }
        warnings
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, self.name(), suffix);
        let level = ctx.output.index_level;
        let mut out = converters::render_values(format, &format!("{}name", name), &self.names, level);
        out.push_str(&converters::render_values(format, &format!("{}region", name), &self.regions, level));
        for code in self.codes() {
            out.push_str(&code.output(ctx, format, &name, ""));
        }
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put_list(&mut map, "name", &self.names);
        converters::json_put_list(&mut map, "region", &self.regions);
        for code in self.codes() {
            map.insert(code.name().to_string(), code.to_json());
        }
        JsonValue::Object(map)
    }
}

/// Draft of [`CountryCode`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryCodeBuilder {
    /// ddms:qualifier
    pub qualifier: String,
    /// ddms:value
    pub value: String,
}

impl Builder for CountryCodeBuilder {
    type Target = CountryCode;

    fn is_empty(&self) -> bool {
        self.qualifier.is_blank() && self.value.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<CountryCode> {
        CountryCode::new(ctx, &self.qualifier, &self.value)
    }
}

blank_builder!(CountryCodeBuilder);

impl From<&CountryCode> for CountryCodeBuilder {
    fn from(code: &CountryCode) -> Self {
        Self {
            qualifier: code.qualifier.clone(),
            value: code.value.clone(),
        }
    }
}

/// Draft of [`SubDivisionCode`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubDivisionCodeBuilder {
    /// ddms:qualifier
    pub qualifier: String,
    /// ddms:value
    pub value: String,
}

impl Builder for SubDivisionCodeBuilder {
    type Target = SubDivisionCode;

    fn is_empty(&self) -> bool {
        self.qualifier.is_blank() && self.value.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<SubDivisionCode> {
        SubDivisionCode::new(ctx, &self.qualifier, &self.value)
    }
}

blank_builder!(SubDivisionCodeBuilder);

impl From<&SubDivisionCode> for SubDivisionCodeBuilder {
    fn from(code: &SubDivisionCode) -> Self {
        Self {
            qualifier: code.qualifier.clone(),
            value: code.value.clone(),
        }
    }
}

/// Draft of [`FacilityIdentifier`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityIdentifierBuilder {
    /// ddms:beNumber
    pub be_number: String,
    /// ddms:osuffix
    pub osuffix: String,
}

impl Builder for FacilityIdentifierBuilder {
    type Target = FacilityIdentifier;

    fn is_empty(&self) -> bool {
        self.be_number.is_blank() && self.osuffix.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<FacilityIdentifier> {
        FacilityIdentifier::new(ctx, &self.be_number, &self.osuffix)
    }
}

blank_builder!(FacilityIdentifierBuilder);

impl From<&FacilityIdentifier> for FacilityIdentifierBuilder {
    fn from(facility: &FacilityIdentifier) -> Self {
        Self {
            be_number: facility.be_number.clone(),
            osuffix: facility.osuffix.clone(),
        }
    }
}

/// Draft of [`GeographicIdentifier`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeographicIdentifierBuilder {
    /// Place names
    pub names: DraftList<String>,
    /// Regions
    pub regions: DraftList<String>,
    /// Country code
    pub country_code: CountryCodeBuilder,
    /// Subdivision code
    pub sub_division_code: SubDivisionCodeBuilder,
    /// Facility identifier
    pub facility_identifier: FacilityIdentifierBuilder,
}

impl Builder for GeographicIdentifierBuilder {
    type Target = GeographicIdentifier;

    fn is_empty(&self) -> bool {
        self.names.is_blank()
            && self.regions.is_blank()
            && self.country_code.is_empty()
            && self.sub_division_code.is_empty()
            && self.facility_identifier.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<GeographicIdentifier> {
        let name = format!("{}:{}", ctx.prefix(Vocab::Ddms), GeographicIdentifier::NAME);
        let (country_code, sub_division_code, facility_identifier) = located(&name, || {
            Ok((
                self.country_code.commit(ctx)?,
                self.sub_division_code.commit(ctx)?,
                self.facility_identifier.commit(ctx)?,
            ))
        })?;
        GeographicIdentifier::new(
            ctx,
            &self.names.values(),
            &self.regions.values(),
            country_code,
            sub_division_code,
            facility_identifier,
        )
    }
}

blank_builder!(GeographicIdentifierBuilder);

impl From<&GeographicIdentifier> for GeographicIdentifierBuilder {
    fn from(identifier: &GeographicIdentifier) -> Self {
        Self {
            names: identifier.names.as_slice().into(),
            regions: identifier.regions.as_slice().into(),
            country_code: identifier.country_code.as_ref().map(Into::into).unwrap_or_default(),
            sub_division_code: identifier
                .sub_division_code
                .as_ref()
                .map(Into::into)
                .unwrap_or_default(),
            facility_identifier: identifier
                .facility_identifier
                .as_ref()
                .map(Into::into)
                .unwrap_or_default(),
        }
    }
}
