//! # symforge-sexpr
//!
//! Ordered S-expression document trees for SymForge library elements.
//!
//! Every persisted element is one tree of [`List`] nodes whose children are
//! either nested lists, bare tokens, or quoted strings. Child order is part
//! of the file-format compatibility contract: writing the same tree twice
//! produces byte-identical output, so serialized elements diff cleanly under
//! version control.
//!
//! The tree is also the in-memory exchange shape between the data model and
//! the storage layer: model types implement [`ToSexpr`] and [`FromSexpr`]
//! rather than touching files directly.

pub mod error;
mod parser;
mod writer;

pub use error::ParseError;
pub use parser::parse;

/// One node of a structured document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexpr {
    /// Nested list node, e.g. `(position 2.54 0.0)`.
    List(List),
    /// Bare value token, e.g. `2.54`, `true`, a UUID.
    Token(String),
    /// Quoted string with escape handling, e.g. `"Op-Amp"`.
    Str(String),
}

impl Sexpr {
    pub fn token(value: impl Into<String>) -> Self {
        Sexpr::Token(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Sexpr::Str(value.into())
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Sexpr::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Sexpr::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Sexpr::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Sexpr::List(_))
    }
}

/// A named list node with ordered children.
///
/// Children keep exactly the order they were pushed in; accessors never
/// reorder. Lookups by name return the first match, so repeated children
/// (e.g. one `name` node per locale) are enumerated with [`List::find_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    name: String,
    children: Vec<Sexpr>,
}

impl List {
    pub fn new(name: impl Into<String>) -> Self {
        List {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Sexpr] {
        &self.children
    }

    pub fn push(&mut self, child: Sexpr) {
        self.children.push(child);
    }

    pub fn push_token(&mut self, token: impl Into<String>) {
        self.children.push(Sexpr::Token(token.into()));
    }

    pub fn push_string(&mut self, value: impl Into<String>) {
        self.children.push(Sexpr::Str(value.into()));
    }

    pub fn push_list(&mut self, list: List) {
        self.children.push(Sexpr::List(list));
    }

    /// First child list with the given name.
    pub fn find(&self, name: &str) -> Option<&List> {
        self.children
            .iter()
            .filter_map(Sexpr::as_list)
            .find(|list| list.name == name)
    }

    /// All child lists with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a List> + 'a {
        self.children
            .iter()
            .filter_map(Sexpr::as_list)
            .filter(move |list| list.name == name)
    }

    /// Like [`List::find`], but absence is a parse error.
    pub fn required(&self, name: &str) -> Result<&List, ParseError> {
        self.find(name).ok_or_else(|| ParseError::MissingChild {
            parent: self.name.clone(),
            child: name.to_string(),
        })
    }

    /// Bare token at the given child position.
    pub fn token_at(&self, index: usize) -> Result<&str, ParseError> {
        match self.children.get(index) {
            Some(Sexpr::Token(token)) => Ok(token),
            Some(_) => Err(ParseError::ExpectedToken {
                parent: self.name.clone(),
                index,
            }),
            None => Err(ParseError::MissingValue {
                parent: self.name.clone(),
                index,
            }),
        }
    }

    /// Quoted string at the given child position.
    pub fn string_at(&self, index: usize) -> Result<&str, ParseError> {
        match self.children.get(index) {
            Some(Sexpr::Str(value)) => Ok(value),
            Some(_) => Err(ParseError::ExpectedString {
                parent: self.name.clone(),
                index,
            }),
            None => Err(ParseError::MissingValue {
                parent: self.name.clone(),
                index,
            }),
        }
    }

    /// First token of the named child, the common `(key value)` shape.
    pub fn child_token(&self, name: &str) -> Result<&str, ParseError> {
        self.required(name)?.token_at(0)
    }

    /// First string of the named child, the common `(key "value")` shape.
    pub fn child_string(&self, name: &str) -> Result<&str, ParseError> {
        self.required(name)?.string_at(0)
    }
}

/// Conversion of a model type into its document-tree form.
///
/// Model nodes are always lists; bare tokens and strings only occur inside
/// them, so the trait works in terms of [`List`].
pub trait ToSexpr {
    fn to_sexpr(&self) -> List;
}

/// Reconstruction of a model type from its document-tree form.
pub trait FromSexpr: Sized {
    fn from_sexpr(list: &List) -> Result<Self, ParseError>;
}
