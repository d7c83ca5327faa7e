use thiserror::Error;

/// Errors raised while parsing document text or decoding a tree into model
/// types.
///
/// Scanner-level variants carry 1-based line/column positions. Decode-level
/// variants name the offending node so callers can report which part of an
/// element file is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character `{found}` at {line}:{col}")]
    UnexpectedChar { found: char, line: usize, col: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unterminated string starting at {line}:{col}")]
    UnterminatedString { line: usize, col: usize },

    #[error("invalid escape sequence `\\{found}` at {line}:{col}")]
    InvalidEscape { found: char, line: usize, col: usize },

    #[error("trailing data after document root at {line}:{col}")]
    TrailingData { line: usize, col: usize },

    #[error("unexpected root node `{found}`, expected `{expected}`")]
    UnexpectedRoot { found: String, expected: String },

    #[error("node `{parent}` has no child `{child}`")]
    MissingChild { parent: String, child: String },

    #[error("node `{parent}` has no value at position {index}")]
    MissingValue { parent: String, index: usize },

    #[error("node `{parent}` value at position {index} is not a token")]
    ExpectedToken { parent: String, index: usize },

    #[error("node `{parent}` value at position {index} is not a string")]
    ExpectedString { parent: String, index: usize },

    #[error("invalid {field} value `{value}`")]
    InvalidValue { field: String, value: String },

    #[error("duplicate {kind} UUID {id}")]
    DuplicateIdentifier { kind: String, id: String },

    #[error("unsupported file format version `{found}`")]
    UnsupportedFormatVersion { found: String },
}

impl ParseError {
    /// Shorthand for the ubiquitous "this token does not decode" case.
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
