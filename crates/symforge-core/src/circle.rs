//! Circles drawn inside a symbol.

use symforge_sexpr::{FromSexpr, List, ParseError, ToSexpr};
use uuid::Uuid;

use crate::codec;
use crate::collection::{CollectionItem, ObjectCollection};
use crate::geometry::{Length, Position};
use crate::layer::SchematicLayer;

pub type CircleList = ObjectCollection<Circle>;

/// A circle on one symbol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circle {
    uuid: Uuid,
    layer: SchematicLayer,
    line_width: Length,
    fill: bool,
    grab_area: bool,
    center: Position,
    diameter: Length,
}

impl Circle {
    pub fn new(
        uuid: Uuid,
        layer: SchematicLayer,
        line_width: Length,
        fill: bool,
        grab_area: bool,
        center: Position,
        diameter: Length,
    ) -> Self {
        Circle {
            uuid,
            layer,
            line_width,
            fill,
            grab_area,
            center,
            diameter,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn layer(&self) -> SchematicLayer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: SchematicLayer) {
        self.layer = layer;
    }

    pub fn line_width(&self) -> Length {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: Length) {
        self.line_width = line_width;
    }

    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    pub fn grab_area(&self) -> bool {
        self.grab_area
    }

    pub fn set_grab_area(&mut self, grab_area: bool) {
        self.grab_area = grab_area;
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn set_center(&mut self, center: Position) {
        self.center = center;
    }

    pub fn diameter(&self) -> Length {
        self.diameter
    }

    pub fn set_diameter(&mut self, diameter: Length) {
        self.diameter = diameter;
    }
}

impl CollectionItem for Circle {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl ToSexpr for Circle {
    fn to_sexpr(&self) -> List {
        let mut list = List::new("circle");
        list.push_token(self.uuid.to_string());
        list.push_list(codec::token_list("layer", self.layer.token()));
        list.push_list(self.line_width.to_sexpr("width"));
        list.push_list(codec::bool_list("fill", self.fill));
        list.push_list(codec::bool_list("grab_area", self.grab_area));
        list.push_list(self.center.to_sexpr("position"));
        list.push_list(self.diameter.to_sexpr("diameter"));
        list
    }
}

impl FromSexpr for Circle {
    fn from_sexpr(list: &List) -> Result<Self, ParseError> {
        let uuid = codec::parse_uuid(list.token_at(0)?)?;
        let layer_token = list.child_token("layer")?;
        let layer = SchematicLayer::from_token(layer_token)
            .ok_or_else(|| ParseError::invalid_value("layer", layer_token))?;
        Ok(Circle {
            uuid,
            layer,
            line_width: Length::from_sexpr(list.required("width")?)?,
            fill: codec::parse_bool(list.required("fill")?)?,
            grab_area: codec::parse_bool(list.required("grab_area")?)?,
            center: Position::from_sexpr(list.required("position")?)?,
            diameter: Length::from_sexpr(list.required("diameter")?)?,
        })
    }
}
