//! shatter-core: definition-file language for Starshatter campaign data.
//!
//! Text flows through four stages:
//!
//! - [`source`] -- where characters come from (console, file, memory block)
//! - [`lexer`] -- incremental tokenizer over a source
//! - [`parser`] -- one [`Term`] per call, errors reported and not fatal
//! - [`extract`] -- typed values out of [`Def`] nodes via [`FromDef`]

pub mod error;
pub mod extract;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod term;

// ── Convenience re-exports: key types ────────────────────────────────

pub use error::{FieldError, ParseError};
pub use extract::{Color, ColorValue, FromDef, Insets, Numeric, Rect, Vec3};
pub use parser::Parser;
pub use source::{BlockSource, ConsoleSource, FileSource, ParseSource};
pub use term::{Def, Term};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use extract::{
    def_array, def_time, def_value, get_def, get_def_array, get_def_time, parse_duration,
};
pub use parser::parse_str;
