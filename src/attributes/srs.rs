//! GML spatial reference system attributes
//!
//! `srsName`, `srsDimension`, `axisLabels` and `uomLabels` are unqualified
//! attributes on GML geometry elements.

use super::security::AttrValue;
use super::AttributeGroup;
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::names;
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::helpers;
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};

/// GML SRS attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SrsAttributes {
    pub(crate) srs_name: String,
    pub(crate) srs_dimension: Option<u32>,
    pub(crate) axis_labels: Vec<String>,
    pub(crate) uom_labels: Vec<String>,
}

impl SrsAttributes {
    /// The empty group
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a validated group
    pub fn new(
        ctx: &Context,
        srs_name: &str,
        srs_dimension: Option<u32>,
        axis_labels: &[String],
        uom_labels: &[String],
    ) -> Result<Self> {
        let attributes = Self {
            srs_name: srs_name.trim().to_string(),
            srs_dimension,
            axis_labels: helpers::non_empty(axis_labels),
            uom_labels: helpers::non_empty(uom_labels),
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    /// Read the SRS attributes of `element` and validate them
    pub fn from_element(ctx: &Context, element: &Element) -> Result<Self> {
        let srs_dimension = element
            .get_attribute("srsDimension")
            .map(|v| helpers::parse_positive_integer(v, "srsDimension"))
            .transpose()?;
        let attributes = Self {
            srs_name: element.get_attribute("srsName").unwrap_or("").to_string(),
            srs_dimension,
            axis_labels: helpers::split_tokens(element.get_attribute("axisLabels").unwrap_or("")),
            uom_labels: helpers::split_tokens(element.get_attribute("uomLabels").unwrap_or("")),
        };
        attributes.validate(ctx)?;
        Ok(attributes)
    }

    fn dimension(&self) -> String {
        self.srs_dimension.map(|d| d.to_string()).unwrap_or_default()
    }

    /// srsName
    pub fn srs_name(&self) -> &str {
        &self.srs_name
    }

    /// srsDimension
    pub fn srs_dimension(&self) -> Option<u32> {
        self.srs_dimension
    }

    /// axisLabels
    pub fn axis_labels(&self) -> &[String] {
        &self.axis_labels
    }

    /// uomLabels
    pub fn uom_labels(&self) -> &[String] {
        &self.uom_labels
    }
}

impl AttributeGroup for SrsAttributes {
    fn is_empty(&self) -> bool {
        self.srs_name.is_empty()
            && self.srs_dimension.is_none()
            && self.axis_labels.is_empty()
            && self.uom_labels.is_empty()
    }

    fn validate(&self, _ctx: &Context) -> Result<Vec<ValidationMessage>> {
        if self.srs_dimension == Some(0) {
            return Err(Error::invalid(
                "The srsDimension attribute must be a positive integer.",
            ));
        }
        names::validate_ncname_list(&self.axis_labels, "axisLabels")?;
        names::validate_ncname_list(&self.uom_labels, "uomLabels")?;
        if !self.axis_labels.is_empty() && self.srs_name.is_empty() {
            return Err(Error::invalid(
                "The srsName must exist when the axisLabels attribute exists.",
            ));
        }
        if !self.uom_labels.is_empty() && self.axis_labels.is_empty() {
            return Err(Error::invalid(
                "The axisLabels must exist when the uomLabels attribute exists.",
            ));
        }
        Ok(Vec::new())
    }

    fn add_to(&self, element: &mut Element, _ctx: &Context) -> Result<()> {
        let entries = [
            ("srsName", self.srs_name.clone()),
            ("srsDimension", self.dimension()),
            ("axisLabels", helpers::join_tokens(&self.axis_labels)),
            ("uomLabels", helpers::join_tokens(&self.uom_labels)),
        ];
        for (name, value) in entries {
            if !value.is_empty() {
                element.set_attribute(None, None, name, value);
            }
        }
        Ok(())
    }

    fn output(&self, format: OutputFormat, prefix: &str) -> String {
        let dimension = self.dimension();
        let entries = [
            ("srsName", AttrValue::Text(&self.srs_name)),
            ("srsDimension", AttrValue::Text(&dimension)),
            ("axisLabels", AttrValue::Tokens(&self.axis_labels)),
            ("uomLabels", AttrValue::Tokens(&self.uom_labels)),
        ];
        entries
            .iter()
            .map(|(name, value)| value.render(format, &format!("{}{}", prefix, name)))
            .collect()
    }

    fn to_json_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        converters::json_put(&mut map, "srsName", &self.srs_name);
        if let Some(dimension) = self.srs_dimension {
            map.insert("srsDimension".to_string(), JsonValue::from(dimension));
        }
        converters::json_put_list(&mut map, "axisLabels", &self.axis_labels);
        converters::json_put_list(&mut map, "uomLabels", &self.uom_labels);
        map
    }
}

/// Draft of [`SrsAttributes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrsAttributesBuilder {
    /// srsName
    pub srs_name: String,
    /// srsDimension
    pub srs_dimension: Option<u32>,
    /// axisLabels
    pub axis_labels: DraftList<String>,
    /// uomLabels
    pub uom_labels: DraftList<String>,
}

impl SrsAttributesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit, treating an empty builder as the empty group
    pub fn commit_or_empty(&self, ctx: &Context) -> Result<SrsAttributes> {
        Ok(self.commit(ctx)?.unwrap_or_default())
    }
}

impl Builder for SrsAttributesBuilder {
    type Target = SrsAttributes;

    fn is_empty(&self) -> bool {
        self.srs_name.is_blank()
            && self.srs_dimension.is_none()
            && self.axis_labels.is_blank()
            && self.uom_labels.is_blank()
    }

    fn build(&self, ctx: &Context) -> Result<SrsAttributes> {
        SrsAttributes::new(
            ctx,
            &self.srs_name,
            self.srs_dimension,
            &self.axis_labels.values(),
            &self.uom_labels.values(),
        )
    }
}

blank_builder!(SrsAttributesBuilder);

impl From<&SrsAttributes> for SrsAttributesBuilder {
    fn from(attributes: &SrsAttributes) -> Self {
        Self {
            srs_name: attributes.srs_name.clone(),
            srs_dimension: attributes.srs_dimension,
            axis_labels: attributes.axis_labels.as_slice().into(),
            uom_labels: attributes.uom_labels.as_slice().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::DdmsVersion;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_srs() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let srs = SrsAttributes::new(
            &ctx,
            "http://metadata.dod.mil/mdr/ns/GSIP/crs/WGS84E_2D",
            Some(10),
            &labels(&["A", "B"]),
            &labels(&["Meter", "Meter"]),
        )
        .unwrap();
        assert_eq!(srs.srs_dimension(), Some(10));
        assert_eq!(
            srs.output(OutputFormat::Text, "pos."),
            "pos.srsName: http://metadata.dod.mil/mdr/ns/GSIP/crs/WGS84E_2D\npos.srsDimension: 10\npos.axisLabels: A B\npos.uomLabels: Meter Meter\n"
        );
    }

    #[test]
    fn test_label_dependencies() {
        let ctx = Context::new(DdmsVersion::V5_0);
        assert!(SrsAttributes::new(&ctx, "", None, &labels(&["A"]), &[]).is_err());
        assert!(SrsAttributes::new(&ctx, "srs", None, &[], &labels(&["Meter"])).is_err());
        assert!(SrsAttributes::new(&ctx, "srs", None, &labels(&["1A"]), &[]).is_err());
        assert!(SrsAttributes::new(&ctx, "srs", Some(0), &[], &[]).is_err());
    }

    #[test]
    fn test_from_element() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let element = Element::build("gml", "http://www.opengis.net/gml/3.2", "pos")
            .with_attribute(None, None, "srsName", "srs")
            .with_attribute(None, None, "srsDimension", "2");
        let srs = SrsAttributes::from_element(&ctx, &element).unwrap();
        assert_eq!(srs.srs_name(), "srs");

        let bad = element.with_attribute(None, None, "srsDimension", "-1");
        assert!(SrsAttributes::from_element(&ctx, &bad).is_err());
    }
}
