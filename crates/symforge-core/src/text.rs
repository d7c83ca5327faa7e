//! Text labels drawn inside a symbol.

use std::fmt;

use symforge_sexpr::{FromSexpr, List, ParseError, ToSexpr};
use uuid::Uuid;

use crate::codec;
use crate::collection::{CollectionItem, ObjectCollection};
use crate::geometry::{Angle, Length, Position};
use crate::layer::SchematicLayer;

pub type TextList = ObjectCollection<Text>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl HAlign {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        [Self::Left, Self::Center, Self::Right]
            .into_iter()
            .find(|align| align.token() == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        [Self::Top, Self::Center, Self::Bottom]
            .into_iter()
            .find(|align| align.token() == token)
    }
}

/// Combined horizontal/vertical anchor of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub h: HAlign,
    pub v: VAlign,
}

impl Alignment {
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Alignment { h, v }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::new(HAlign::Center, VAlign::Center)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.h.token(), self.v.token())
    }
}

/// A text label on one symbol layer.
///
/// The value may contain editor-substituted placeholders such as
/// `{{NAME}}`; the core stores it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    uuid: Uuid,
    layer: SchematicLayer,
    value: String,
    align: Alignment,
    height: Length,
    position: Position,
    rotation: Angle,
}

impl Text {
    pub fn new(
        uuid: Uuid,
        layer: SchematicLayer,
        value: impl Into<String>,
        align: Alignment,
        height: Length,
        position: Position,
        rotation: Angle,
    ) -> Self {
        Text {
            uuid,
            layer,
            value: value.into(),
            align,
            height,
            position,
            rotation,
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

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn align(&self) -> Alignment {
        self.align
    }

    pub fn set_align(&mut self, align: Alignment) {
        self.align = align;
    }

    pub fn height(&self) -> Length {
        self.height
    }

    pub fn set_height(&mut self, height: Length) {
        self.height = height;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Angle) {
        self.rotation = rotation;
    }
}

impl CollectionItem for Text {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl ToSexpr for Text {
    fn to_sexpr(&self) -> List {
        let mut list = List::new("text");
        list.push_token(self.uuid.to_string());
        list.push_list(codec::token_list("layer", self.layer.token()));
        list.push_list(codec::string_list("value", &self.value));
        let mut align = List::new("align");
        align.push_token(self.align.h.token());
        align.push_token(self.align.v.token());
        list.push_list(align);
        list.push_list(self.height.to_sexpr("height"));
        list.push_list(self.position.to_sexpr("position"));
        list.push_list(self.rotation.to_sexpr("rotation"));
        list
    }
}

impl FromSexpr for Text {
    fn from_sexpr(list: &List) -> Result<Self, ParseError> {
        let uuid = codec::parse_uuid(list.token_at(0)?)?;
        let layer_token = list.child_token("layer")?;
        let layer = SchematicLayer::from_token(layer_token)
            .ok_or_else(|| ParseError::invalid_value("layer", layer_token))?;
        let align_node = list.required("align")?;
        let h_token = align_node.token_at(0)?;
        let v_token = align_node.token_at(1)?;
        let align = Alignment::new(
            HAlign::from_token(h_token)
                .ok_or_else(|| ParseError::invalid_value("align", h_token))?,
            VAlign::from_token(v_token)
                .ok_or_else(|| ParseError::invalid_value("align", v_token))?,
        );
        Ok(Text {
            uuid,
            layer,
            value: list.child_string("value")?.to_string(),
            align,
            height: Length::from_sexpr(list.required("height")?)?,
            position: Position::from_sexpr(list.required("position")?)?,
            rotation: Angle::from_sexpr(list.required("rotation")?)?,
        })
    }
}
