//! # symforge-core
//!
//! Observable library-element data model for SymForge symbol editing.
//!
//! The model is built from three layers:
//!
//! - [`ObjectCollection`]: a generic, UUID-keyed, order-preserving
//!   container that notifies registered observers of every structural
//!   change before the mutating call returns.
//! - Sub-object value types ([`SymbolPin`], [`Polygon`], [`Circle`],
//!   [`Text`]) with their fixed-point geometry ([`Length`], [`Position`],
//!   [`Angle`]).
//! - The [`Symbol`] aggregate: element metadata plus one collection per
//!   sub-object type, a single presentation-adapter slot, the
//!   interface-stability rules around publication, and atomic load/save of
//!   the S-expression document format.
//!
//! Everything is single-threaded by design: notifications run synchronously
//! on the mutating call's stack, and observer handles are `Rc`-based.
//!
//! UUIDs are assumed to be globally unique across the whole library system
//! (cross-file references rely on it); the core only enforces uniqueness
//! within each collection.

pub mod circle;
mod codec;
pub mod collection;
pub mod element;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod pin;
pub mod polygon;
pub mod symbol;
pub mod text;

// Re-exports for easy access
pub use circle::{Circle, CircleList};
pub use collection::{CollectionError, CollectionItem, CollectionObserver, ObjectCollection};
pub use element::{ElementName, LocalizedNames, LocalizedText, Version, DEFAULT_LOCALE};
pub use error::ElementError;
pub use geometry::{Angle, Length, Position};
pub use layer::SchematicLayer;
pub use pin::{ElectricalRole, SymbolPin, SymbolPinList};
pub use polygon::{Polygon, PolygonList, Vertex};
pub use symbol::{
    Symbol, SymbolPresentation, FILE_FORMAT_VERSION, LONG_ELEMENT_NAME, SHORT_ELEMENT_NAME,
    SYMBOL_FILE_NAME,
};
pub use text::{Alignment, HAlign, Text, TextList, VAlign};

pub use symforge_sexpr::{FromSexpr, ParseError, ToSexpr};
pub use uuid::Uuid;
