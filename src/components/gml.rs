//! gml:Point and gml:pos

use crate::attributes::{AttributeGroup, SrsAttributes, SrsAttributesBuilder};
use crate::config::Context;
use crate::converters::{self, OutputFormat};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::names;
use crate::namespaces::Vocab;
use crate::validators::base::{self, finish, located, Component, ComponentCore};
use crate::validators::builders::{blank_builder, Blank, Builder, DraftList};
use crate::validators::helpers;
use crate::validators::rules::{self, ids};
use crate::validators::ValidationMessage;
use serde_json::{Map, Value as JsonValue};
use std::hash::{Hash, Hasher};

fn join_coordinates(coordinates: &[f64]) -> String {
    coordinates
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A coordinate tuple of 2 or 3 doubles
#[derive(Debug, Clone)]
pub struct Position {
    core: ComponentCore,
    coordinates: Vec<f64>,
    srs: SrsAttributes,
}

impl Position {
    /// Element local name
    pub const NAME: &'static str = "pos";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let coordinates = helpers::split_tokens(element.text())
                .iter()
                .map(|token| helpers::parse_double(token, "coordinate"))
                .collect::<Result<Vec<_>>>()?;
            let srs = SrsAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    coordinates,
                    srs,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, coordinates: &[f64], srs: SrsAttributes) -> Result<Self> {
        let mut element = base::text_element(ctx, Vocab::Gml, Self::NAME, &join_coordinates(coordinates))?;
        srs.add_to(&mut element, ctx)?;
        Self::from_element(ctx, element)
    }

    /// Coordinates
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// SRS attributes
    pub fn srs_attributes(&self) -> &SrsAttributes {
        &self.srs
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
            && self.srs == other.srs
            && self.coordinates.len() == other.coordinates.len()
            && self
                .coordinates
                .iter()
                .zip(&other.coordinates)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
        for coordinate in &self.coordinates {
            coordinate.to_bits().hash(state);
        }
        self.srs.hash(state);
    }
}

impl Component for Position {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        base::require_qualified_name(self.element(), ctx.namespace(Vocab::Gml)?, Self::NAME)?;
        if !(2..=3).contains(&self.coordinates.len()) {
            return Err(Error::invalid(
                "A position must be represented by either 2 or 3 coordinates.",
            ));
        }
        self.srs.validate(ctx)?;
        Ok(())
    }

    fn output(&self, _ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}", prefix, self.name(), suffix);
        let mut out = converters::render(format, &name, &join_coordinates(&self.coordinates));
        out.push_str(&self.srs.output(format, &format!("{}.", name)));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        map.insert(
            "coordinates".to_string(),
            JsonValue::Array(self.coordinates.iter().map(|c| JsonValue::from(*c)).collect()),
        );
        converters::json_put_object(&mut map, "srsAttributes", self.srs.to_json_map());
        JsonValue::Object(map)
    }
}

/// A point geometry with an identifier and exactly one position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    core: ComponentCore,
    id: String,
    position: Position,
    srs: SrsAttributes,
}

impl Point {
    /// Element local name
    pub const NAME: &'static str = "Point";

    /// Wrap a parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Self> {
        located(&element.qualified_name(), || {
            let gml = ctx.namespace(Vocab::Gml)?;
            let id = element.attribute(gml, "id").unwrap_or("").to_string();
            let candidates = element.children_named(gml, Position::NAME).collect();
            let pos = rules::single(ids::POINT, Position::NAME, candidates, ctx.version)?.clone();
            let position = Position::from_element(ctx, pos)?;
            let srs = SrsAttributes::from_element(ctx, &element)?;
            finish(
                Self {
                    core: ComponentCore::new(element, ctx.version),
                    id,
                    position,
                    srs,
                },
                ctx,
            )
        })
    }

    /// Build from raw values
    pub fn new(ctx: &Context, position: Position, srs: SrsAttributes, id: &str) -> Result<Self> {
        let mut element = base::build_element(ctx, Vocab::Gml, Self::NAME)?;
        srs.add_to(&mut element, ctx)?;
        base::set_vocab_attribute(&mut element, ctx, Vocab::Gml, "id", id.trim())?;
        element.add_child(position.element().clone());
        Self::from_element(ctx, element)
    }

    /// gml:id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The single position
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// SRS attributes
    pub fn srs_attributes(&self) -> &SrsAttributes {
        &self.srs
    }
}

impl Component for Point {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn validate(&self, ctx: &Context) -> Result<()> {
        let gml = ctx.namespace(Vocab::Gml)?;
        base::require_qualified_name(self.element(), gml, Self::NAME)?;
        rules::check_children(ids::POINT, Position::NAME, self.element(), gml, ctx.version)?;
        helpers::require_attribute(self.srs.srs_name(), "srsName")?;
        self.srs.validate(ctx)?;
        helpers::require_attribute(&self.id, "gml:id")?;
        names::validate_ncname(&self.id, "gml:id")?;
        let pos_srs = self.position.srs_attributes().srs_name();
        if !pos_srs.is_empty() && pos_srs != self.srs.srs_name() {
            return Err(Error::invalid(
                "The srsName of the position must match the srsName of the Point.",
            ));
        }
        Ok(())
    }

    fn validate_warnings(&self, _ctx: &Context) -> Vec<ValidationMessage> {
        self.position.validation_warnings().to_vec()
    }

    fn output(&self, ctx: &Context, format: OutputFormat, prefix: &str, suffix: &str) -> String {
        let name = format!("{}{}{}.", prefix, self.name(), suffix);
        let mut out = self.srs.output(format, &name);
        out.push_str(&converters::render(format, &format!("{}id", name), &self.id));
        out.push_str(&self.position.output(ctx, format, &name, ""));
        out
    }

    fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        converters::json_put(&mut map, "id", &self.id);
        map.insert(Position::NAME.to_string(), self.position.to_json());
        converters::json_put_object(&mut map, "srsAttributes", self.srs.to_json_map());
        JsonValue::Object(map)
    }
}

/// Draft of [`Position`]; coordinates are kept as text until committed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBuilder {
    /// Coordinates
    pub coordinates: DraftList<String>,
    /// SRS attributes
    pub srs: SrsAttributesBuilder,
}

impl Builder for PositionBuilder {
    type Target = Position;

    fn is_empty(&self) -> bool {
        self.coordinates.is_blank() && self.srs.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<Position> {
        let name = format!("{}:{}", ctx.prefix(Vocab::Gml), Position::NAME);
        let coordinates = located(&name, || {
            self.coordinates
                .values()
                .iter()
                .map(|value| helpers::parse_double(value, "coordinate"))
                .collect::<Result<Vec<_>>>()
        })?;
        Position::new(ctx, &coordinates, self.srs.commit_or_empty(ctx)?)
    }
}

blank_builder!(PositionBuilder);

impl From<&Position> for PositionBuilder {
    fn from(position: &Position) -> Self {
        Self {
            coordinates: position.coordinates.iter().map(f64::to_string).collect(),
            srs: (&position.srs).into(),
        }
    }
}

/// Draft of [`Point`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuilder {
    /// gml:id
    pub id: String,
    /// SRS attributes
    pub srs: SrsAttributesBuilder,
    /// Position
    pub position: PositionBuilder,
}

impl Builder for PointBuilder {
    type Target = Point;

    fn is_empty(&self) -> bool {
        self.id.is_blank() && self.srs.is_empty() && self.position.is_empty()
    }

    fn build(&self, ctx: &Context) -> Result<Point> {
        let name = format!("{}:{}", ctx.prefix(Vocab::Gml), Point::NAME);
        let position = located(&name, || self.position.build(ctx))?;
        Point::new(ctx, position, self.srs.commit_or_empty(ctx)?, &self.id)
    }
}

blank_builder!(PointBuilder);

impl From<&Point> for PointBuilder {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id.clone(),
            srs: (&point.srs).into(),
            position: (&point.position).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::versions::DdmsVersion;
    use pretty_assertions::assert_eq;

    const SRS_NAME: &str = "http://metadata.dod.mil/mdr/ns/GSIP/crs/WGS84E_2D";

    fn srs(ctx: &Context) -> SrsAttributes {
        SrsAttributes::new(ctx, SRS_NAME, Some(10), &[], &[]).unwrap()
    }

    fn position(ctx: &Context) -> Position {
        Position::new(ctx, &[32.1, 40.1], srs(ctx)).unwrap()
    }

    #[test]
    fn test_position_coordinate_count() {
        let ctx = Context::new(DdmsVersion::V5_0);
        assert_eq!(position(&ctx).coordinates(), &[32.1, 40.1]);
        assert!(Position::new(&ctx, &[32.1, 40.1, 40.0], SrsAttributes::empty()).is_ok());
        let err = Position::new(&ctx, &[32.1], SrsAttributes::empty()).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "A position must be represented by either 2 or 3 coordinates."
        );
    }

    #[test]
    fn test_position_bad_coordinate() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let xml = r#"<gml:pos xmlns:gml="http://www.opengis.net/gml/3.2">32.1 north</gml:pos>"#;
        let element = Document::from_string(xml).unwrap().into_root().unwrap();
        let err = Position::from_element(&ctx, element).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.message, "The coordinate must be a valid double.");
        assert_eq!(err.path(), "/gml:pos");
    }

    #[test]
    fn test_position_namespace_by_version() {
        let ctx = Context::new(DdmsVersion::V2_0);
        assert_eq!(position(&ctx).namespace(), "http://www.opengis.net/gml");
        let ctx = Context::new(DdmsVersion::V3_0);
        assert_eq!(position(&ctx).namespace(), "http://www.opengis.net/gml/3.2");
    }

    #[test]
    fn test_valid_point() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let point = Point::new(&ctx, position(&ctx), srs(&ctx), "IDValue").unwrap();
        assert_eq!(point.id(), "IDValue");
        assert_eq!(point.qualified_name(), "gml:Point");

        let element = Document::from_string(&point.to_xml().unwrap())
            .unwrap()
            .into_root()
            .unwrap();
        assert_eq!(Point::from_element(&ctx, element).unwrap(), point);
    }

    #[test]
    fn test_point_requirements() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let err = Point::new(&ctx, position(&ctx), SrsAttributes::empty(), "IDValue").unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "The srsName attribute is required.");

        let err = Point::new(&ctx, position(&ctx), srs(&ctx), "1Value").unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The gml:id \"1Value\" must be a valid NCName."
        );

        let other = SrsAttributes::new(&ctx, "http://example.org/crs", None, &[], &[]).unwrap();
        let err = Point::new(&ctx, position(&ctx), other, "IDValue").unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().message,
            "The srsName of the position must match the srsName of the Point."
        );
    }

    #[test]
    fn test_point_needs_one_pos() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let xml = format!(
            r#"<gml:Point xmlns:gml="http://www.opengis.net/gml/3.2" srsName="{}" gml:id="IDValue"/>"#,
            SRS_NAME
        );
        let element = Document::from_string(&xml).unwrap().into_root().unwrap();
        let err = Point::from_element(&ctx, element).unwrap_err();
        assert_eq!(err.as_validation().unwrap().message, "The pos element is required.");
    }

    #[test]
    fn test_output() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let position = Position::new(&ctx, &[32.1, 40.1], SrsAttributes::empty()).unwrap();
        let srs = SrsAttributes::new(&ctx, SRS_NAME, None, &[], &[]).unwrap();
        let point = Point::new(&ctx, position, srs, "IDValue").unwrap();
        assert_eq!(
            point.to_text(&ctx),
            format!("Point.srsName: {}\nPoint.id: IDValue\nPoint.pos: 32.1 40.1\n", SRS_NAME)
        );
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new(DdmsVersion::V5_0);
        let mut builder = PointBuilder::default();
        assert!(builder.commit(&ctx).unwrap().is_none());

        builder.id = "IDValue".to_string();
        builder.srs.srs_name = SRS_NAME.to_string();
        *builder.position.coordinates.slot(1) = "40.1".to_string();
        *builder.position.coordinates.slot(0) = "north".to_string();
        let err = builder.commit(&ctx).unwrap_err();
        assert_eq!(err.as_validation().unwrap().path(), "/gml:Point/gml:pos");

        *builder.position.coordinates.slot(0) = "32.1".to_string();
        let point = builder.commit(&ctx).unwrap().unwrap();
        assert_eq!(point.position().coordinates(), &[32.1, 40.1]);
        assert_eq!(PointBuilder::from(&point), builder);
    }
}
