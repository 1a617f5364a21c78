//! The parsed value space of the definition language.
//!
//! A term tree is acyclic and exclusively owned: arrays own their elements,
//! structs own their definitions, and a [`Def`] owns its value.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Number(f64),
    /// Quoted string or bare identifier
    Text(String),
    Bool(bool),
    Array(Vec<Term>),
    /// Ordered definitions; duplicate names are kept in source order
    Struct(Vec<Def>),
    /// `name = value` at top level or inside an array
    Def(Box<Def>),
}

/// A named binding: `name = value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Def {
    pub name: String,
    pub value: Term,
}

impl Def {
    pub fn new(name: impl Into<String>, value: Term) -> Self {
        Def {
            name: name.into(),
            value,
        }
    }

    /// First definition named `name` in this def's struct value, if any.
    pub fn find(&self, name: &str) -> Option<&Def> {
        self.value.field(name)
    }
}

impl Term {
    /// Lower-case tag name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Number(_) => "number",
            Term::Text(_) => "text",
            Term::Bool(_) => "bool",
            Term::Array(_) => "array",
            Term::Struct(_) => "struct",
            Term::Def(_) => "def",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Term::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Term]> {
        match self {
            Term::Array(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[Def]> {
        match self {
            Term::Struct(defs) => Some(defs),
            _ => None,
        }
    }

    pub fn as_def(&self) -> Option<&Def> {
        match self {
            Term::Def(def) => Some(def),
            _ => None,
        }
    }

    /// Linear lookup of the first definition named `name` in a struct.
    pub fn field(&self, name: &str) -> Option<&Def> {
        self.as_struct()?.iter().find(|d| d.name == name)
    }
}

// ── Rendering back to definition-language text ──────────────────────

fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s != "true" && s != "false" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Strings have no escapes, so text holding both quote characters has no
/// exact rendering: its double quotes are written as single quotes.
fn write_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match (s.contains('"'), s.contains('\'')) {
        (false, _) => write!(f, "\"{}\"", s),
        (true, false) => write!(f, "'{}'", s),
        (true, true) => write!(f, "\"{}\"", s.replace('"', "'")),
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Term::Text(s) => write_text(f, s),
            Term::Bool(b) => write!(f, "{}", b),
            Term::Array(elems) => {
                write!(f, "[")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, "]")
            }
            Term::Struct(defs) => {
                if defs.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, d) in defs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", d)?;
                }
                write!(f, " }}")
            }
            Term::Def(def) => write!(f, "{}", def),
        }
    }
}

impl fmt::Display for Def {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_bare_word(&self.name) {
            write!(f, "{}", self.name)?;
        } else {
            write_text(f, &self.name)?;
        }
        write!(f, " = {}", self.value)
    }
}
