//! Symbol pins, the electrical connection points of a symbol.

use std::fmt;

use symforge_sexpr::{FromSexpr, List, ParseError, ToSexpr};
use uuid::Uuid;

use crate::codec;
use crate::collection::{CollectionItem, ObjectCollection};
use crate::geometry::{Angle, Length, Position};

pub type SymbolPinList = ObjectCollection<SymbolPin>;

/// Electrical role a pin plays when wired into a circuit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ElectricalRole {
    #[default]
    Passive,
    Input,
    Output,
    InOut,
    Power,
    OpenDrain,
}

impl ElectricalRole {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Passive,
            Self::Input,
            Self::Output,
            Self::InOut,
            Self::Power,
            Self::OpenDrain,
        ]
    }

    /// Stable token used in element files.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::Input => "input",
            Self::Output => "output",
            Self::InOut => "inout",
            Self::Power => "power",
            Self::OpenDrain => "opendrain",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().into_iter().find(|role| role.token() == token)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Passive => "Passive",
            Self::Input => "Input",
            Self::Output => "Output",
            Self::InOut => "Bidirectional",
            Self::Power => "Power",
            Self::OpenDrain => "Open Drain",
        }
    }
}

impl fmt::Display for ElectricalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One pin of a symbol.
///
/// The UUID is the pin's published identity: component-to-symbol mappings in
/// other library elements reference it, which is why pin membership of a
/// published symbol must never change (see the symbol's interface-stability
/// check). All other attributes are freely editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPin {
    uuid: Uuid,
    name: String,
    role: ElectricalRole,
    position: Position,
    rotation: Angle,
    length: Length,
}

impl SymbolPin {
    pub fn new(
        uuid: Uuid,
        name: impl Into<String>,
        role: ElectricalRole,
        position: Position,
        rotation: Angle,
        length: Length,
    ) -> Self {
        SymbolPin {
            uuid,
            name: name.into(),
            role,
            position,
            rotation,
            length,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn role(&self) -> ElectricalRole {
        self.role
    }

    pub fn set_role(&mut self, role: ElectricalRole) {
        self.role = role;
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

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn set_length(&mut self, length: Length) {
        self.length = length;
    }
}

impl CollectionItem for SymbolPin {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl ToSexpr for SymbolPin {
    fn to_sexpr(&self) -> List {
        let mut list = List::new("pin");
        list.push_token(self.uuid.to_string());
        list.push_list(codec::string_list("name", &self.name));
        list.push_list(codec::token_list("role", self.role.token()));
        list.push_list(self.position.to_sexpr("position"));
        list.push_list(self.rotation.to_sexpr("rotation"));
        list.push_list(self.length.to_sexpr("length"));
        list
    }
}

impl FromSexpr for SymbolPin {
    fn from_sexpr(list: &List) -> Result<Self, ParseError> {
        let uuid = codec::parse_uuid(list.token_at(0)?)?;
        let name = list.child_string("name")?.to_string();
        let role_token = list.child_token("role")?;
        let role = ElectricalRole::from_token(role_token)
            .ok_or_else(|| ParseError::invalid_value("role", role_token))?;
        Ok(SymbolPin {
            uuid,
            name,
            role,
            position: Position::from_sexpr(list.required("position")?)?,
            rotation: Angle::from_sexpr(list.required("rotation")?)?,
            length: Length::from_sexpr(list.required("length")?)?,
        })
    }
}
