//! Small encode/decode helpers shared by the model types.

use symforge_sexpr::{List, ParseError};
use uuid::Uuid;

pub(crate) fn token_list(name: &str, token: impl Into<String>) -> List {
    let mut list = List::new(name);
    list.push_token(token);
    list
}

pub(crate) fn string_list(name: &str, value: impl Into<String>) -> List {
    let mut list = List::new(name);
    list.push_string(value);
    list
}

pub(crate) fn bool_list(name: &str, value: bool) -> List {
    token_list(name, if value { "true" } else { "false" })
}

pub(crate) fn parse_bool(list: &List) -> Result<bool, ParseError> {
    match list.token_at(0)? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::invalid_value(list.name(), other)),
    }
}

pub(crate) fn parse_uuid(token: &str) -> Result<Uuid, ParseError> {
    Uuid::parse_str(token).map_err(|_| ParseError::invalid_value("uuid", token))
}
