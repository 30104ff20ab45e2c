//! ddms:dates

use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::Result;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// Attribute names, in output order
pub const FIELDS: [&str; 6] = [
    "created",
    "posted",
    "validTil",
    "infoCutOff",
    "approvedOn",
    "receivedOn",
];

/// Dates in the lifecycle of a resource
///
/// Every date is optional and may be an xs:date, xs:dateTime, xs:gYearMonth or
/// xs:gYear. `approvedOn` exists from DDMS 3.1 and `receivedOn` from 4.0.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dates {
    core: ComponentCore,
    values: [String; 6],
}

impl Dates {
    /// Element local name
    pub const NAME: &'static str = "dates";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let ddms = ctx.namespace(Vocab::Ddms)?;
            let values = FIELDS.map(|name| element.attribute(ddms, name).unwrap_or("").to_string());
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    values,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(
        ctx: &Context,
        created: &str,
        posted: &str,
        valid_til: &str,
        info_cut_off: &str,
        approved_on: &str,
        received_on: &str,
    ) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Ddms, Self::NAME)?;
        let values = [created, posted, valid_til, info_cut_off, approved_on, received_on];
        for (name, value) in FIELDS.iter().zip(values) {
            base::set_vocab_attribute(&mut element, ctx, Vocab::Ddms, name, value.trim())?;
        }
        Self::from_element(ctx, element)
    }

    fn get(&self, name: &str) -> &str {
        FIELDS
            .iter()
            .position(|f| *f == name)
            .map(|i| self.values[i].as_str())
            .unwrap_or("")
    }

    /// ddms:created
    pub fn created(&self) -> &str {
        self.get("created")
    }

    /// ddms:posted
    pub fn posted(&self) -> &str {
        self.get("posted")
    }

    /// ddms:validTil
    pub fn valid_til(&self) -> &str {
        self.get("validTil")
    }

    /// ddms:infoCutOff
    pub fn info_cut_off(&self) -> &str {
        self.get("infoCutOff")
    }

    /// ddms:approvedOn
    pub fn approved_on(&self) -> &str {
        self.get("approvedOn")
    }

    /// ddms:receivedOn
    pub fn received_on(&self) -> &str {
        self.get("receivedOn")
    }

    fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}

impl Component for Dates {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Ddms)?, Self::NAME)?;
        for (name, value) in FIELDS.iter().zip(&self.values) {
            rules::check_present(ids::DATES, name, !value.is_empty(), ctx.version)?;
            if !value.is_empty() {
                helpers::validate_date(value, &format!("{} date", name))?;
            }
        }
        Ok(())
    }

    fn validate_warnings(&self, _ctx: &Context) -> Vec<ValidationMessage> {
        if self.is_empty() {
            vec![ValidationMessage::warning(format!(
                "A completely empty {} element was found.",
                self.qualified_name()
            ))]
        } else {
            Vec::new()
        }
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        FIELDS
            .iter()
            .zip(&self.values)
            .map(|(field, value)| converters::render(format, &format!("{}.{}", name, field), value))
            .collect()
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (field, value) in FIELDS.iter().zip(&self.values) {
            converters::json_put(&mut map, field, value);
        }
        JsonValue::Object(map)
    }
}

/// Draft of [`Dates`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatesBuilder {
    /// ddms:created
    pub created: String,
    /// ddms:posted
    pub posted: String,
    /// ddms:validTil
    pub valid_til: String,
    /// ddms:infoCutOff
    pub info_cut_off: String,
    /// ddms:approvedOn
    pub approved_on: String,
    /// ddms:receivedOn
    pub received_on: String,
}

impl Builder for DatesBuilder {
    type Target = Dates;

    fn is_empty(&self) -> bool {
        [
            &self.created,
            &self.posted,
            &self.valid_til,
            &self.info_cut_off,
            &self.approved_on,
            &self.received_on,
        ]
        .iter()
        .all(|s| s.is_blank())
    }

    fn build(&self, ctx: &Context) -> Result<Dates> {
        Dates::new(
            ctx,
            &self.created,
            &self.posted,
            &self.valid_til,
            &self.info_cut_off,
            &self.approved_on,
            &self.received_on,
        )
    }
}

blank_builder!(DatesBuilder);

impl From<&Dates> for DatesBuilder {
    fn from(dates: &Dates) -> Self {
        Self {
            created: dates.created().to_string(),
            posted: dates.posted().to_string(),
            valid_til: dates.valid_til().to_string(),
            info_cut_off: dates.info_cut_off().to_string(),
            approved_on: dates.approved_on().to_string(),
            received_on: dates.received_on().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::DdmsVersion;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_dates_warns_once() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let dates = Dates::new(&ctx, "", "", "", "", "", "").unwrap();
        let warnings = dates.validation_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].text, "A completely empty ddms:dates element was found.");
        assert_eq!(warnings[0].locator, "/ddms:dates");
    }

    #[test]
    fn test_date_forms() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let dates = Dates::new(&ctx, "2003", "2003-02", "2003-02-15", "2003-02-15T10:00:00Z", "", "")
            .unwrap();
        assert_eq!(dates.valid_til(), "2003-02-15");
        assert!(dates.validation_warnings().is_empty());
        assert!(Dates::new(&ctx, "2003-02-31", "", "", "", "", "").is_err());
        assert!(Dates::new(&ctx, "yesterday", "", "", "", "", "").is_err());
    }

    #[test]
    fn test_version_gates() {
        let err = Dates::new(&Context::new(DdmsVersion::V3_0), "", "", "", "", "2003", "")
            .unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The approvedOn attribute cannot be used until DDMS 3.1 or later."
        );
        assert!(Dates::new(&Context::new(DdmsVersion::V3_1), "", "", "", "", "2003", "").is_ok());
        assert!(Dates::new(&Context::new(DdmsVersion::V3_1), "", "", "", "", "", "2003").is_err());
        assert!(Dates::new(&Context::new(DdmsVersion::V4_0_1), "", "", "", "", "", "2003").is_ok());
    }

    #[test]
    fn test_output() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let dates = Dates::new(&ctx, "2003", "", "", "", "", "2011-08").unwrap();
        assert_eq!(
            dates.to_text(&ctx),
            "dates.created: 2003\ndates.receivedOn: 2011-08\n"
        );
        assert_eq!(
            dates.to_json(),
            serde_json::json!({ "created": "2003", "receivedOn": "2011-08" })
        );
    }

    #[test]
    fn test_builder_round_trip() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let mut builder = DatesBuilder::default();
        assert!(builder.commit(&ctx).unwrap().is_none());
        builder.posted = "2012".to_string();
        let dates = builder.commit(&ctx).unwrap().unwrap();
        assert_eq!(DatesBuilder::from(&dates), builder);
    }
}
