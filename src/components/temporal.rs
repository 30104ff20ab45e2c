//! ddms:temporalCoverage
//!
//! The start and end of a time period are kept as raw text. A blank value
//! falls back to `Unknown`: built components write it into the element, parsed
//! ones keep their empty element and carry a warning. Anything else is checked
//! only in `validate`, so an unusable date surfaces as an ordinary validation
//! failure.

use crate::attributes::{AttributeGroup, SecurityAttributes, SecurityAttributesBuilder};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::helpers::{self, DateKind};
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// Placeholder for a missing start or end
pub const DEFAULT_VALUE: &str = "Unknown";

/// Non-date values accepted for start and end
pub const EXTENDED_VALUES: [&str; 2] = ["Not Applicable", "Unknown"];

const TIME_PERIOD: &str = "TimePeriod";

/// Interpretation of a start or end value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeValue {
    /// One of the XML Schema date forms
    Date(DateKind),
    /// `Not Applicable`
    NotApplicable,
    /// `Unknown`
    Unknown,
}

impl TimeValue {
    /// Classify a value, or None if it is neither a date nor an extended value
    pub fn classify(value: &str) -> Option<TimeValue> {
        match value {
            "Not Applicable" => Some(TimeValue::NotApplicable),
            "Unknown" => Some(TimeValue::Unknown),
            _ => helpers::date_kind(value).map(TimeValue::Date),
        }
    }
}

/// A period of time covered by a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemporalCoverage {
    core: ComponentCore,
    time_period_name: String,
    start: String,
    end: String,
    security: SecurityAttributes,
}

fn value_or_default(text: Option<String>) -> String {
    match text {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_VALUE.to_string(),
    }
}

impl TemporalCoverage {
    /// Element local name
    pub const NAME: &'static str = "temporalCoverage";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let period = element.first_child(ddms, TIME_PERIOD);
            let field = |name: &str| period.and_then(|p| p.child_text(ddms, name));
            let time_period_name = field("name").unwrap_or_default();
            let start = value_or_default(field("start"));
            let end = value_or_default(field("end"));
            let security = SecurityAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    time_period_name,
                    start,
                    end,
                    security,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        time_period_name: &str,
        start: &str,
        end: &str,
        security: SecurityAttributes,
    ) -> Result<Self> {
        let mut period = base::build_element(ctx, Vocab::Ddms, TIME_PERIOD)?;
        if !time_period_name.trim().is_empty() {
            period.add_child(base::text_element(ctx, Vocab::Ddms, "name", time_period_name.trim())?);
        }
        let start = value_or_default(Some(start.to_string()));
        let end = value_or_default(Some(end.to_string()));
        period.add_child(base::text_element(ctx, Vocab::Ddms, "start", &start)?);
        period.add_child(base::text_element(ctx, Vocab::Ddms, "end", &end)?);

        let mut element = base::build_element(ctx, Vocab::Ddms, Self::NAME)?;
        security.add_to(&mut element, ctx)?;
        element.add_child(period);
        Self::from_element(ctx, element)
    }

    /// ddms:name of the time period
    pub fn time_period_name(&self) -> &str {
        &self.time_period_name
    }

    /// Start of the period
    pub fn start(&self) -> &str {
        &self.start
    }

    /// End of the period
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Start, interpreted
    pub fn start_value(&self) -> Option<TimeValue> {
        TimeValue::classify(&self.start)
    }

    /// End, interpreted
    pub fn end_value(&self) -> Option<TimeValue> {
        TimeValue::classify(&self.end)
    }

    /// Security attributes
    pub fn security_attributes(&self) -> &SecurityAttributes {
        &self.security
    }

    fn time_period(&self, ddms: &str) -> Option<&Element> {
        self.element().first_child(ddms, TIME_PERIOD)
    }
}

fn check_time_value(value: &str, name: &str) -> Result<()> {
    if TimeValue::classify(value).is_some() {
        return Ok(());
    }
    Err(Error::invalid(format!(
        "The {} element must be a date or one of: {}.",
        name,
        EXTENDED_VALUES.join(", ")
    )))
}

impl Component for TemporalCoverage {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        let ddms = ctx.namespace(Vocab::Ddms)?;
        base::require_qualified_name(self.element(), ddms, Self::NAME)?;
        rules::check_children(ids::TEMPORAL_COVERAGE, TIME_PERIOD, self.element(), ddms, ctx.version)?;
        if let Some(period) = self.time_period(ddms) {
            for field in ["name", "start", "end"] {
                rules::check_children(ids::TEMPORAL_COVERAGE, field, period, ddms, ctx.version)?;
            }
        }
        check_time_value(&self.start, "start")?;
        check_time_value(&self.end, "end")?;
        rules::check_present(
            ids::TEMPORAL_COVERAGE,
            "ISM",
            !self.security.is_empty(),
            ctx.version,
        )?;
        self.security.validate(ctx)?;
        Ok(())
    }

    fn validate_warnings(&self, ctx: &Context) -> Vec<ValidationMessage> {
        let mut warnings = Vec::new();
        if let Some(period) = ctx.namespace(Vocab::Ddms).ok().and_then(|ns| self.time_period(ns)) {
            for child in &period.children {
                if !child.text().trim().is_empty() {
                    continue;
                }
                match child.local_name() {
                    "start" | "end" => warnings.push(ValidationMessage::warning(format!(
                        "A {} element was found with no value. Defaulting to \"{}\".",
                        child.qualified_name(),
                        DEFAULT_VALUE
                    ))),
                    _ => warnings.push(helpers::empty_element_warning(&child.qualified_name())),
                }
            }
        }
        warnings.extend(self.security.warnings(ctx));
        warnings
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        let mut out = converters::render(format, &format!("{}.name", name), &self.time_period_name);
        out.push_str(&converters::render(format, &format!("{}.start", name), &self.start));
        out.push_str(&converters::render(format, &format!("{}.end", name), &self.end));
        out.push_str(&self.security.output(format, &format!("{}.", name)));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put(&mut map, "name", &self.time_period_name);
        converters::json_put(&mut map, "start", &self.start);
        converters::json_put(&mut map, "end", &self.end);
        converters::json_put_object(&mut map, "securityAttributes", self.security.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`TemporalCoverage`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalCoverageBuilder {
    /// Time period name
    pub time_period_name: String,
    /// Start
    pub start: String,
    /// End
    pub end: String,
    /// Security attributes
    pub security: SecurityAttributesBuilder,
}

impl Builder for TemporalCoverageBuilder {
    type Target = TemporalCoverage;

    fn is_empty(&self) -> bool {
        self.time_period_name.is_blank()
            && self.start.is_blank()
            && self.end.is_blank()
            && self.security.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<TemporalCoverage> {
        TemporalCoverage::new(
            ctx,
            &self.time_period_name,
            &self.start,
            &self.end,
            self.security.commit_or_empty(ctx)?,
        )
    }
}

blank_builder!(TemporalCoverageBuilder);

impl From<&TemporalCoverage> for TemporalCoverageBuilder {
    fn from(coverage: &TemporalCoverage) -> Self {
        Self {
            time_period_name: coverage.time_period_name.clone(),
            start: coverage.start.clone(),
            end: coverage.end.clone(),
            security: (&coverage.security).into(),
        }
    }
}
