//! Polygon outlines drawn inside a symbol.

use symforge_sexpr::{FromSexpr, List, ParseError, ToSexpr};
use uuid::Uuid;

use crate::codec;
use crate::collection::{CollectionItem, ObjectCollection};
use crate::geometry::{Angle, Length, Position};
use crate::layer::SchematicLayer;

pub type PolygonList = ObjectCollection<Polygon>;

/// One path point. A non-zero angle bends the segment leading to the next
/// vertex into an arc of that central angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub position: Position,
    pub angle: Angle,
}

impl Vertex {
    pub fn new(position: Position, angle: Angle) -> Self {
        Vertex { position, angle }
    }

    pub fn line_to(position: Position) -> Self {
        Vertex {
            position,
            angle: Angle::ZERO,
        }
    }
}

impl ToSexpr for Vertex {
    fn to_sexpr(&self) -> List {
        let mut list = List::new("vertex");
        list.push_list(self.position.to_sexpr("position"));
        list.push_list(self.angle.to_sexpr("angle"));
        list
    }
}

impl FromSexpr for Vertex {
    fn from_sexpr(list: &List) -> Result<Self, ParseError> {
        Ok(Vertex {
            position: Position::from_sexpr(list.required("position")?)?,
            angle: Angle::from_sexpr(list.required("angle")?)?,
        })
    }
}

/// A polygon outline on one symbol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    uuid: Uuid,
    layer: SchematicLayer,
    line_width: Length,
    fill: bool,
    grab_area: bool,
    path: Vec<Vertex>,
}

impl Polygon {
    pub fn new(
        uuid: Uuid,
        layer: SchematicLayer,
        line_width: Length,
        fill: bool,
        grab_area: bool,
        path: Vec<Vertex>,
    ) -> Self {
        Polygon {
            uuid,
            layer,
            line_width,
            fill,
            grab_area,
            path,
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

    pub fn path(&self) -> &[Vertex] {
        &self.path
    }

    pub fn set_path(&mut self, path: Vec<Vertex>) {
        self.path = path;
    }

    /// Whether first and last vertex coincide.
    pub fn is_closed(&self) -> bool {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => first.position == last.position,
            _ => false,
        }
    }
}

impl CollectionItem for Polygon {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl ToSexpr for Polygon {
    fn to_sexpr(&self) -> List {
        let mut list = List::new("polygon");
        list.push_token(self.uuid.to_string());
        list.push_list(codec::token_list("layer", self.layer.token()));
        list.push_list(self.line_width.to_sexpr("width"));
        list.push_list(codec::bool_list("fill", self.fill));
        list.push_list(codec::bool_list("grab_area", self.grab_area));
        for vertex in &self.path {
            list.push_list(vertex.to_sexpr());
        }
        list
    }
}

impl FromSexpr for Polygon {
    fn from_sexpr(list: &List) -> Result<Self, ParseError> {
        let uuid = codec::parse_uuid(list.token_at(0)?)?;
        let layer_token = list.child_token("layer")?;
        let layer = SchematicLayer::from_token(layer_token)
            .ok_or_else(|| ParseError::invalid_value("layer", layer_token))?;
        let path = list
            .find_all("vertex")
            .map(Vertex::from_sexpr)
            .collect::<Result<Vec<Vertex>, ParseError>>()?;
        Ok(Polygon {
            uuid,
            layer,
            line_width: Length::from_sexpr(list.required("width")?)?,
            fill: codec::parse_bool(list.required("fill")?)?,
            grab_area: codec::parse_bool(list.required("grab_area")?)?,
            path,
        })
    }
}
