//! Top-level error type for the incremental JSON parser.

use super::categories::*;
use thiserror::Error;

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Top-level error type for this crate.
///
/// Each variant wraps a category-specific detail enum, mirroring how a
/// layered error taxonomy splits "what kind of thing went wrong" from "what
/// exactly happened."
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("unexpected end of input: {0}")]
    UnexpectedEof(#[from] UnexpectedEofError),
}

impl ParseError {
    /// Returns the byte offset at which this error was detected, when the
    /// underlying category tracks one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Lexical(e) => match e {
                LexicalError::UnexpectedCharacter { offset, .. }
                | LexicalError::InvalidEscape { offset, .. }
                | LexicalError::InvalidUnicodeEscape { offset }
                | LexicalError::UnpairedSurrogate { offset }
                | LexicalError::UnescapedControlCharacter { offset, .. }
                | LexicalError::MalformedNumber { offset, .. }
                | LexicalError::UnknownLiteral { offset } => Some(*offset),
            },
            ParseError::Structural(e) => match e {
                StructuralError::ExpectedValue { offset, .. }
                | StructuralError::ExpectedCommaOrClose { offset, .. }
                | StructuralError::ExpectedColon { offset, .. }
                | StructuralError::ExpectedKey { offset, .. }
                | StructuralError::UnmatchedClose { offset }
                | StructuralError::TrailingComma { offset }
                | StructuralError::TrailingContent { offset } => Some(*offset),
                StructuralError::DepthExceeded { .. } => None,
            },
            ParseError::Encoding(e) => match e {
                EncodingError::InvalidUtf8 { offset } => Some(*offset),
                EncodingError::IncompleteSequenceAtEof { .. } => None,
            },
            ParseError::UnexpectedEof(_) => None,
        }
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        ParseError::Encoding(EncodingError::InvalidUtf8 {
            offset: err.valid_up_to(),
        })
    }
}
