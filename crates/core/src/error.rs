//! Error types for parsing and typed extraction.
//!
//! Neither kind of error is fatal: a [`ParseError`] ends the parse loop for
//! one file, a [`FieldError`] leaves one destination field untouched.

/// A structural error in definition-file text.
///
/// Every variant carries the source name and the 1-based line at which the
/// problem was detected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{file}:{line}: unterminated string literal")]
    UnterminatedString { file: String, line: u32 },

    #[error("{file}:{line}: unterminated block comment")]
    UnterminatedComment { file: String, line: u32 },

    /// End of input reached while a bracket was still open.
    #[error("{file}:{line}: unterminated '{open}'")]
    UnterminatedBracket { file: String, open: char, line: u32 },

    #[error("{file}:{line}: '{found}' does not close '{open}'")]
    MismatchedBracket {
        file: String,
        open: char,
        found: String,
        line: u32,
    },

    #[error("{file}:{line}: expected {expected}, found {found}")]
    UnexpectedToken {
        file: String,
        expected: &'static str,
        found: String,
        line: u32,
    },

    #[error("{file}:{line}: expected {expected}, found end of input")]
    UnexpectedEnd {
        file: String,
        expected: &'static str,
        line: u32,
    },

    #[error("{file}:{line}: invalid number '{text}'")]
    InvalidNumber { file: String, text: String, line: u32 },

    #[error("{file}:{line}: unexpected character '{ch}'")]
    UnexpectedCharacter { file: String, ch: char, line: u32 },

    /// Brackets nested past the parser's depth limit.
    #[error("{file}:{line}: brackets nested too deeply")]
    TooDeep { file: String, line: u32 },
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnterminatedString { line, .. }
            | ParseError::UnterminatedComment { line, .. }
            | ParseError::UnterminatedBracket { line, .. }
            | ParseError::MismatchedBracket { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnexpectedEnd { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::UnexpectedCharacter { line, .. }
            | ParseError::TooDeep { line, .. } => *line,
        }
    }

    pub fn file(&self) -> &str {
        match self {
            ParseError::UnterminatedString { file, .. }
            | ParseError::UnterminatedComment { file, .. }
            | ParseError::UnterminatedBracket { file, .. }
            | ParseError::MismatchedBracket { file, .. }
            | ParseError::UnexpectedToken { file, .. }
            | ParseError::UnexpectedEnd { file, .. }
            | ParseError::InvalidNumber { file, .. }
            | ParseError::UnexpectedCharacter { file, .. }
            | ParseError::TooDeep { file, .. } => file,
        }
    }
}

/// Failure to extract a typed value from a definition.
///
/// `kind` is the upper-case shape name used in diagnostics
/// (`VEC3`, `COLOR`, `NUMBER`, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// No definition was supplied for the field.
    #[error("missing {kind} definition in '{file}'")]
    Missing { kind: &'static str, file: String },

    /// The definition's value has the wrong tag.
    #[error("invalid {kind} '{name}' in '{file}'")]
    Invalid {
        kind: &'static str,
        name: String,
        file: String,
    },

    /// Right tag, wrong shape (arity, element types).
    #[error("malformed {kind} '{name}' in '{file}': {detail}")]
    Malformed {
        kind: &'static str,
        name: String,
        file: String,
        detail: String,
    },
}
