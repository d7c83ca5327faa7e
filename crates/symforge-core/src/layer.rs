//! Drawing layers available inside a symbol.

use std::fmt;

/// The layers symbol geometry can be placed on.
///
/// The file token of each layer is part of the storage format and must stay
/// stable; the display name is free to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchematicLayer {
    /// Symbol body outlines and decoration.
    Outlines,
    /// Invisible areas that accept mouse grabs in the editor.
    HiddenGrabAreas,
    /// Anchor layer for name labels.
    Names,
    /// Anchor layer for value labels.
    Values,
}

impl SchematicLayer {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Outlines,
            Self::HiddenGrabAreas,
            Self::Names,
            Self::Values,
        ]
    }

    /// Stable token used in element files.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Outlines => "outlines",
            Self::HiddenGrabAreas => "hidden_grab_areas",
            Self::Names => "names",
            Self::Values => "values",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().into_iter().find(|layer| layer.token() == token)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Outlines => "Outlines",
            Self::HiddenGrabAreas => "Hidden Grab Areas",
            Self::Names => "Names",
            Self::Values => "Values",
        }
    }

    /// Whether text labels anchored to this layer get substituted content
    /// (name/value placeholders) in the editor.
    pub fn is_text_anchor(&self) -> bool {
        matches!(self, Self::Names | Self::Values)
    }
}

impl fmt::Display for SchematicLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
