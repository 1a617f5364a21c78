//! Name-keyed field dispatch for record parsers.
//!
//! A [`FieldTable`] is built once per record type and maps each field
//! name to a handler. Exact names are checked first, then the ordered
//! substring/prefix rules. Unknown names are ignored.

use std::collections::HashMap;

use shatter_core::extract::{def_time, def_value, get_def, FromDef, ONE_DAY};
use shatter_core::{Def, Term};

use crate::names::NameTable;

/// Writes one field of `R` from a definition. The `&str` is the source
/// file name for diagnostics.
pub type Handler<R> = fn(&mut R, &Def, &str);

#[derive(Debug, Clone, Copy)]
enum Rule {
    Contains(&'static str),
    Prefix(&'static str),
}

impl Rule {
    fn matches(self, name: &str) -> bool {
        match self {
            Rule::Contains(needle) => name.contains(needle),
            Rule::Prefix(prefix) => name.starts_with(prefix),
        }
    }
}

pub struct FieldTable<R> {
    record: &'static str,
    exact: HashMap<&'static str, Handler<R>>,
    rules: Vec<(Rule, Handler<R>)>,
}

impl<R> FieldTable<R> {
    pub fn new(record: &'static str) -> Self {
        FieldTable {
            record,
            exact: HashMap::new(),
            rules: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, handler: Handler<R>) -> Self {
        self.exact.insert(name, handler);
        self
    }

    /// Register one handler under several spellings.
    pub fn fields(mut self, names: &[&'static str], handler: Handler<R>) -> Self {
        for &name in names {
            self.exact.insert(name, handler);
        }
        self
    }

    pub fn containing(mut self, needle: &'static str, handler: Handler<R>) -> Self {
        self.rules.push((Rule::Contains(needle), handler));
        self
    }

    pub fn prefixed(mut self, prefix: &'static str, handler: Handler<R>) -> Self {
        self.rules.push((Rule::Prefix(prefix), handler));
        self
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn handler(&self, name: &str) -> Option<Handler<R>> {
        if let Some(h) = self.exact.get(name) {
            return Some(*h);
        }
        self.rules
            .iter()
            .find(|(rule, _)| rule.matches(name))
            .map(|(_, h)| *h)
    }

    /// Dispatch one definition. Returns `false` if no handler claimed it.
    pub fn apply(&self, rec: &mut R, def: &Def, file: &str) -> bool {
        match self.handler(&def.name) {
            Some(h) => {
                h(rec, def, file);
                true
            }
            None => {
                tracing::debug!("ignoring {} field '{}' in '{}'", self.record, def.name, file);
                false
            }
        }
    }

    /// Dispatch every definition of a struct body in order.
    pub fn apply_all(&self, rec: &mut R, body: &[Def], file: &str) {
        for def in body {
            self.apply(rec, def, file);
        }
    }
}

impl<R: Default> FieldTable<R> {
    /// A fresh defaulted record filled from `body`.
    pub fn build(&self, body: &[Def], file: &str) -> R {
        let mut rec = R::default();
        self.apply_all(&mut rec, body, file);
        rec
    }
}

// ── Shared handler helpers ───────────────────────────────────────────

/// The struct body of `def`, or `None` with a warning.
pub fn struct_body<'a>(def: &'a Def, file: &str) -> Option<&'a [Def]> {
    let body = def.value.as_struct();
    if body.is_none() {
        tracing::warn!("{} struct missing in '{}'", def.name, file);
    }
    body
}

/// Append a value extracted from `def` to `list`.
pub fn push_def<T: FromDef>(list: &mut Vec<T>, def: &Def, file: &str) {
    match def_value(Some(def), file) {
        Ok(v) => list.push(v),
        Err(e) => tracing::warn!("{}", e),
    }
}

/// A number of seconds, or a duration text shifted back by one day.
///
/// Campaign times are written as day numbers starting at day 1, so
/// `"1/00:00:00"` is time zero.
pub fn number_or_time(dst: &mut i32, def: &Def, file: &str) {
    match &def.value {
        Term::Text(_) => match def_time(Some(def), file) {
            Ok(t) => *dst = t.saturating_sub(ONE_DAY as i32),
            Err(e) => tracing::warn!("{}", e),
        },
        _ => {
            get_def(dst, Some(def), file);
        }
    }
}

/// A number, or a name resolved through `table`.
pub fn number_or_name(dst: &mut i32, def: &Def, file: &str, table: &NameTable) {
    match &def.value {
        Term::Text(name) => *dst = table.code(name, file),
        _ => {
            get_def(dst, Some(def), file);
        }
    }
}

/// A name resolved through `table`.
pub fn name_code(dst: &mut i32, def: &Def, file: &str, table: &NameTable) {
    let mut name = String::new();
    if get_def(&mut name, Some(def), file) {
        *dst = table.code(&name, file);
    }
}
