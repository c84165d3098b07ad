//! Error category types for granular error handling.

use thiserror::Error;

/// Errors raised by the tokenizer while scanning characters into tokens.
#[derive(Error, Debug, Clone)]
pub enum LexicalError {
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    #[error("invalid escape sequence '\\{found}' at byte {offset}")]
    InvalidEscape { found: char, offset: usize },

    #[error("invalid unicode escape at byte {offset}")]
    InvalidUnicodeEscape { offset: usize },

    #[error("unpaired UTF-16 surrogate at byte {offset}")]
    UnpairedSurrogate { offset: usize },

    #[error("control character {found:?} not allowed in string literal at byte {offset}")]
    UnescapedControlCharacter { found: char, offset: usize },

    #[error("malformed number literal at byte {offset}: {message}")]
    MalformedNumber { offset: usize, message: String },

    #[error("unrecognized literal at byte {offset}")]
    UnknownLiteral { offset: usize },
}

/// Errors raised by the tokenizer or value builder when tokens arrive out of
/// the grammar's expected order.
#[derive(Error, Debug, Clone)]
pub enum StructuralError {
    #[error("expected a value at byte {offset}, found {found:?}")]
    ExpectedValue { found: String, offset: usize },

    #[error("expected ',' or closing bracket at byte {offset}, found {found:?}")]
    ExpectedCommaOrClose { found: String, offset: usize },

    #[error("expected ':' after object key at byte {offset}, found {found:?}")]
    ExpectedColon { found: String, offset: usize },

    #[error("expected a string as object key at byte {offset}, found {found:?}")]
    ExpectedKey { found: String, offset: usize },

    #[error("unmatched closing bracket at byte {offset}")]
    UnmatchedClose { offset: usize },

    #[error("trailing comma before closing bracket at byte {offset}")]
    TrailingComma { offset: usize },

    #[error("unexpected trailing content after the top-level value at byte {offset}")]
    TrailingContent { offset: usize },

    #[error("nesting depth exceeded the configured maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// Errors raised while normalizing raw byte chunks into valid UTF-8 text.
#[derive(Error, Debug, Clone)]
pub enum EncodingError {
    #[error("invalid UTF-8 byte sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("input ended with {pending} incomplete UTF-8 byte(s) pending")]
    IncompleteSequenceAtEof { pending: usize },
}

/// The input stream ended while a value, string, number, or container was
/// still open.
#[derive(Error, Debug, Clone)]
pub enum UnexpectedEofError {
    #[error("input ended before any value was started")]
    NoValueStarted,

    #[error("input ended inside a string literal")]
    InsideString,

    #[error("input ended inside a number literal")]
    InsideNumber,

    #[error("input ended with {open_containers} container(s) still open")]
    UnclosedContainer { open_containers: usize },

    #[error("input ended inside a literal keyword")]
    InsideLiteral,
}
