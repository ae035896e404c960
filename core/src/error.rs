//! Parse errors shared by the HTML and CSS parsers.
//!
//! Every error is fatal: the parser stops at the first problem and no partial
//! document or stylesheet is returned.

use std::fmt;

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Position in the source text, counted in characters (not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Zero-based character offset.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The grammar does not allow this character here.
    #[error("unexpected character {found:?}, expected {expected}")]
    UnexpectedCharacter { found: char, expected: String },

    /// Input ran out while a token was still required.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    /// A closing tag does not close the element that is currently open.
    #[error("closing tag </{found}> does not match opening tag <{expected}>")]
    MismatchedClosingTag { expected: String, found: String },

    /// Only `px` lengths are understood.
    #[error("unrecognized unit {unit:?}")]
    InvalidUnit { unit: String },

    /// A `#rrggbb` color contains something other than a hex digit.
    #[error("invalid hex digit {found:?} in color")]
    InvalidHexDigit { found: char },

    /// A declaration is missing its `:` or `;`.
    #[error("malformed declaration, expected {expected:?} but found {found:?}")]
    MalformedDeclaration { expected: char, found: char },

    /// A run of digits and dots that is not a number, e.g. `1.2.3`.
    #[error("invalid number {text:?}")]
    InvalidNumber { text: String },
}

/// A fatal parse error with the location it was detected at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at {location}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        Self { kind, location }
    }
}
