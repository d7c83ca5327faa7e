//! Canonical text emission.
//!
//! The writer is the deterministic half of the round-trip contract: the same
//! tree always produces byte-identical text. Leaf-only lists print on one
//! line; once a list child appears, every following child gets its own
//! indented line and the closing paren drops to its own line. Indentation is
//! one space per nesting level.

use std::fmt::{self, Write as _};

use crate::{List, Sexpr};

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexpr::List(list) => fmt::Display::fmt(list, f),
            Sexpr::Token(token) => f.write_str(token),
            Sexpr::Str(value) => write_escaped(f, value),
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl List {
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "({}", self.name())?;
        let mut broken = false;
        for child in self.children() {
            match child {
                Sexpr::List(list) => {
                    broken = true;
                    writeln!(f)?;
                    write_indent(f, indent + 1)?;
                    list.write_indented(f, indent + 1)?;
                }
                leaf => {
                    if broken {
                        writeln!(f)?;
                        write_indent(f, indent + 1)?;
                    } else {
                        f.write_char(' ')?;
                    }
                    fmt::Display::fmt(leaf, f)?;
                }
            }
        }
        if broken {
            writeln!(f)?;
            write_indent(f, indent)?;
        }
        f.write_char(')')
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        f.write_char(' ')?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            _ => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}
