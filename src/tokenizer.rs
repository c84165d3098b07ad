//! Character-driven tokenizer: the first stage of the streaming pipeline.
//!
//! A flat finite-state machine with no lookahead beyond the current
//! character. Every state is safe to suspend in after any number of
//! characters from the current chunk; resuming simply continues from the
//! stored `Mode`. Numbers and strings are emitted as multiple small events
//! so no entire token is ever buffered here — accumulation is the value
//! builder's job.

use crate::config::ParserConfig;
use crate::error::{LexicalError, ParseError, StructuralError, UnexpectedEofError};

/// A discrete lexical signal emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenEvent {
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// `{`
    StartObject,
    /// `}`
    EndObject,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `null`
    LiteralNull,
    /// `true`
    LiteralTrue,
    /// `false`
    LiteralFalse,
    /// The opening `"` of a string.
    StringStart,
    /// A fragment of decoded string text; may be as short as one character.
    StringChunk(String),
    /// The closing `"` of a string.
    StringEnd,
    /// A fragment of a number literal's text, one lexical unit at a time.
    NumberChunk(String),
    /// The terminator of a number literal (a non-number character or EOF).
    NumberEnd,
    /// End of input.
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayCtx {
    ExpectValueOrClose,
    ExpectValue,
    ExpectCommaOrClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectCtx {
    ExpectKeyOrClose,
    ExpectKey,
    ExpectColon,
    ExpectValue,
    ExpectCommaOrClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Array(ArrayCtx),
    Object(ObjectCtx),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringSub {
    Normal,
    Escape,
    Unicode(u8, u32),
    AwaitLowBackslash,
    AwaitLowU,
    AwaitLowHex(u8, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberSub {
    NegSign,
    IntZero,
    IntDigits,
    FracRequireDigit,
    FracDigits,
    ExpSign,
    ExpRequireDigit,
    ExpDigits,
}

impl NumberSub {
    fn is_complete(self) -> bool {
        matches!(
            self,
            NumberSub::IntZero | NumberSub::IntDigits | NumberSub::FracDigits | NumberSub::ExpDigits
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    fn text(self) -> &'static str {
        match self {
            Literal::True => "true",
            Literal::False => "false",
            Literal::Null => "null",
        }
    }

    fn event(self) -> TokenEvent {
        match self {
            Literal::True => TokenEvent::LiteralTrue,
            Literal::False => TokenEvent::LiteralFalse,
            Literal::Null => TokenEvent::LiteralNull,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ExpectValue,
    ExpectKey,
    ExpectColon,
    AfterValue,
    InString(StringSub),
    InNumber(NumberSub),
    InLiteral(Literal, usize),
}

/// A flat, explicit-state character tokenizer.
///
/// Nesting is tracked in `context`, an explicit heap-allocated stack rather
/// than host call-stack recursion, so depth is bounded only by
/// [`ParserConfig::max_depth`] and available memory.
pub struct Tokenizer {
    mode: Mode,
    context: Vec<Context>,
    pending_surrogate: Option<u16>,
    offset: usize,
    max_depth: usize,
}

impl Tokenizer {
    /// Creates a new tokenizer using the given configuration.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            mode: Mode::ExpectValue,
            context: Vec::new(),
            pending_surrogate: None,
            offset: 0,
            max_depth: config.max_depth(),
        }
    }

    /// Current byte offset, used to annotate errors.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Feeds a chunk of decoded text, returning the token events it produces.
    pub fn feed(&mut self, text: &str) -> Result<Vec<TokenEvent>, ParseError> {
        let mut events = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let consumed = self.step(c, &mut events)?;
            if consumed {
                self.offset += c.len_utf8();
                i += 1;
            }
        }
        Ok(events)
    }

    /// Signals end-of-input, returning the closing token events (which may
    /// include a final `NumberEnd` before `Eof`) or an error describing what
    /// was left unfinished.
    pub fn finish(&mut self) -> Result<Vec<TokenEvent>, ParseError> {
        let mut events = Vec::new();

        if let Mode::InNumber(sub) = self.mode {
            if !sub.is_complete() {
                return Err(UnexpectedEofError::InsideNumber.into());
            }
            // A number can legally end at EOF, the same as at any other
            // terminator character.
            events.push(TokenEvent::NumberEnd);
            self.mode = Mode::AfterValue;
        }

        match self.mode {
            Mode::AfterValue if self.context.is_empty() => {
                events.push(TokenEvent::Eof);
                Ok(events)
            }
            _ if !self.context.is_empty() => Err(UnexpectedEofError::UnclosedContainer {
                open_containers: self.context.len(),
            }
            .into()),
            Mode::ExpectValue | Mode::ExpectKey | Mode::ExpectColon => {
                Err(UnexpectedEofError::NoValueStarted.into())
            }
            Mode::InString(_) => Err(UnexpectedEofError::InsideString.into()),
            Mode::InLiteral(_, _) => Err(UnexpectedEofError::InsideLiteral.into()),
            Mode::AfterValue | Mode::InNumber(_) => unreachable!("handled above"),
        }
    }

    fn mark_value_started(&mut self) {
        match self.context.last_mut() {
            Some(Context::Array(ctx)) => *ctx = ArrayCtx::ExpectCommaOrClose,
            Some(Context::Object(ctx)) => *ctx = ObjectCtx::ExpectCommaOrClose,
            None => {}
        }
    }

    fn push_context(&mut self, ctx: Context) -> Result<(), ParseError> {
        if self.context.len() >= self.max_depth {
            tracing::warn!(max_depth = self.max_depth, offset = self.offset, "max nesting depth exceeded");
            return Err(StructuralError::DepthExceeded {
                max_depth: self.max_depth,
            }
            .into());
        }
        self.context.push(ctx);
        tracing::trace!(depth = self.context.len(), offset = self.offset, "entered container");
        Ok(())
    }

    fn pop_context(&mut self) {
        self.context.pop();
        tracing::trace!(depth = self.context.len(), offset = self.offset, "exited container");
    }

    fn step(&mut self, c: char, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        match self.mode {
            Mode::ExpectValue => self.step_expect_value(c, events),
            Mode::ExpectKey => self.step_expect_key(c, events),
            Mode::ExpectColon => self.step_expect_colon(c, events),
            Mode::AfterValue => self.step_after_value(c, events),
            Mode::InString(sub) => self.step_in_string(sub, c, events),
            Mode::InNumber(sub) => self.step_in_number(sub, c, events),
            Mode::InLiteral(lit, pos) => self.step_in_literal(lit, pos, c, events),
        }
    }

    fn step_expect_value(&mut self, c: char, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        if is_json_whitespace(c) {
            return Ok(true);
        }
        match c {
            ']' if matches!(self.context.last(), Some(Context::Array(ArrayCtx::ExpectValueOrClose))) => {
                self.pop_context();
                events.push(TokenEvent::EndArray);
                self.mode = Mode::AfterValue;
                Ok(true)
            }
            ']' if matches!(self.context.last(), Some(Context::Array(ArrayCtx::ExpectValue))) => {
                Err(StructuralError::TrailingComma { offset: self.offset }.into())
            }
            '{' => {
                self.mark_value_started();
                self.push_context(Context::Object(ObjectCtx::ExpectKeyOrClose))?;
                events.push(TokenEvent::StartObject);
                self.mode = Mode::ExpectKey;
                Ok(true)
            }
            '[' => {
                self.mark_value_started();
                self.push_context(Context::Array(ArrayCtx::ExpectValueOrClose))?;
                events.push(TokenEvent::StartArray);
                self.mode = Mode::ExpectValue;
                Ok(true)
            }
            '"' => {
                self.mark_value_started();
                events.push(TokenEvent::StringStart);
                self.mode = Mode::InString(StringSub::Normal);
                Ok(true)
            }
            't' | 'f' | 'n' => {
                self.mark_value_started();
                let lit = match c {
                    't' => Literal::True,
                    'f' => Literal::False,
                    _ => Literal::Null,
                };
                self.mode = Mode::InLiteral(lit, 1);
                Ok(true)
            }
            '-' | '0'..='9' => {
                self.mark_value_started();
                let sub = match c {
                    '-' => NumberSub::NegSign,
                    '0' => NumberSub::IntZero,
                    _ => NumberSub::IntDigits,
                };
                events.push(TokenEvent::NumberChunk(c.to_string()));
                self.mode = Mode::InNumber(sub);
                Ok(true)
            }
            ']' | '}' => Err(StructuralError::UnmatchedClose { offset: self.offset }.into()),
            _ => Err(LexicalError::UnexpectedCharacter {
                found: c,
                offset: self.offset,
            }
            .into()),
        }
    }

    fn step_expect_key(&mut self, c: char, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        if is_json_whitespace(c) {
            return Ok(true);
        }
        match c {
            '"' => {
                events.push(TokenEvent::StringStart);
                self.mode = Mode::InString(StringSub::Normal);
                Ok(true)
            }
            '}' if matches!(self.context.last(), Some(Context::Object(ObjectCtx::ExpectKeyOrClose))) => {
                self.pop_context();
                events.push(TokenEvent::EndObject);
                self.mode = Mode::AfterValue;
                Ok(true)
            }
            '}' if matches!(self.context.last(), Some(Context::Object(ObjectCtx::ExpectKey))) => {
                Err(StructuralError::TrailingComma { offset: self.offset }.into())
            }
            ']' | '}' => Err(StructuralError::UnmatchedClose { offset: self.offset }.into()),
            _ => Err(StructuralError::ExpectedKey {
                found: c.to_string(),
                offset: self.offset,
            }
            .into()),
        }
    }

    fn step_expect_colon(&mut self, c: char, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        if is_json_whitespace(c) {
            return Ok(true);
        }
        if c == ':' {
            if let Some(Context::Object(ctx)) = self.context.last_mut() {
                *ctx = ObjectCtx::ExpectValue;
            }
            events.push(TokenEvent::Colon);
            self.mode = Mode::ExpectValue;
            Ok(true)
        } else {
            Err(StructuralError::ExpectedColon {
                found: c.to_string(),
                offset: self.offset,
            }
            .into())
        }
    }

    fn step_after_value(&mut self, c: char, events: &mut Vec<TokenEvent>) -> Result<bool, ParseError> {
        if is_json_whitespace(c) {
            return Ok(true);
        }
        match self.context.last() {
            None => Err(StructuralError::TrailingContent { offset: self.offset }.into()),
            Some(Context::Array(ArrayCtx::ExpectCommaOrClose)) => match c {
                ',' => {
                    if let Some(Context::Array(ctx)) = self.context.last_mut() {
                        *ctx = ArrayCtx::ExpectValue;
                    }
                    events.push(TokenEvent::Comma);
                    self.mode = Mode::ExpectValue;
                    Ok(true)
                }
                ']' => {
                    self.pop_context();
                    events.push(TokenEvent::EndArray);
                    self.mode = Mode::AfterValue;
                    Ok(true)
                }
                '}' => Err(StructuralError::UnmatchedClose { offset: self.offset }.into()),
                _ => Err(StructuralError::ExpectedCommaOrClose {
                    found: c.to_string(),
                    offset: self.offset,
                }
                .into()),
            },
            Some(Context::Object(ObjectCtx::ExpectCommaOrClose)) => match c {
                ',' => {
                    if let Some(Context::Object(ctx)) = self.context.last_mut() {
                        *ctx = ObjectCtx::ExpectKey;
                    }
                    events.push(TokenEvent::Comma);
                    self.mode = Mode::ExpectKey;
                    Ok(true)
                }
                '}' => {
                    self.pop_context();
                    events.push(TokenEvent::EndObject);
                    self.mode = Mode::AfterValue;
                    Ok(true)
                }
                ']' => Err(StructuralError::UnmatchedClose { offset: self.offset }.into()),
                _ => Err(StructuralError::ExpectedCommaOrClose {
                    found: c.to_string(),
                    offset: self.offset,
                }
                .into()),
            },
            _ => Err(StructuralError::ExpectedCommaOrClose {
                found: c.to_string(),
                offset: self.offset,
            }
            .into()),
        }
    }

    fn step_in_string(
        &mut self,
        sub: StringSub,
        c: char,
        events: &mut Vec<TokenEvent>,
    ) -> Result<bool, ParseError> {
        match sub {
            StringSub::Normal => match c {
                '"' => {
                    events.push(TokenEvent::StringEnd);
                    self.mode = self.after_string_end();
                    Ok(true)
                }
                '\\' => {
                    self.mode = Mode::InString(StringSub::Escape);
                    Ok(true)
                }
                c if (c as u32) < 0x20 => Err(LexicalError::UnescapedControlCharacter {
                    found: c,
                    offset: self.offset,
                }
                .into()),
                c => {
                    events.push(TokenEvent::StringChunk(c.to_string()));
                    Ok(true)
                }
            },
            StringSub::Escape => {
                let decoded = match c {
                    '"' => Some('"'),
                    '\\' => Some('\\'),
                    '/' => Some('/'),
                    'b' => Some('\u{8}'),
                    'f' => Some('\u{c}'),
                    'n' => Some('\n'),
                    'r' => Some('\r'),
                    't' => Some('\t'),
                    _ => None,
                };
                if let Some(decoded) = decoded {
                    events.push(TokenEvent::StringChunk(decoded.to_string()));
                    self.mode = Mode::InString(StringSub::Normal);
                    Ok(true)
                } else if c == 'u' {
                    self.mode = Mode::InString(StringSub::Unicode(0, 0));
                    Ok(true)
                } else {
                    Err(LexicalError::InvalidEscape {
                        found: c,
                        offset: self.offset,
                    }
                    .into())
                }
            }
            StringSub::Unicode(count, acc) => {
                let digit = c.to_digit(16).ok_or(LexicalError::InvalidUnicodeEscape {
                    offset: self.offset,
                })?;
                let acc = acc * 16 + digit;
                let count = count + 1;
                if count < 4 {
                    self.mode = Mode::InString(StringSub::Unicode(count, acc));
                    return Ok(true);
                }
                let code = acc;
                if (0xD800..=0xDBFF).contains(&code) {
                    self.pending_surrogate = Some(code as u16);
                    self.mode = Mode::InString(StringSub::AwaitLowBackslash);
                } else if (0xDC00..=0xDFFF).contains(&code) {
                    return Err(LexicalError::UnpairedSurrogate { offset: self.offset }.into());
                } else {
                    let decoded = char::from_u32(code).ok_or(LexicalError::InvalidUnicodeEscape {
                        offset: self.offset,
                    })?;
                    events.push(TokenEvent::StringChunk(decoded.to_string()));
                    self.mode = Mode::InString(StringSub::Normal);
                }
                Ok(true)
            }
            StringSub::AwaitLowBackslash => {
                if c == '\\' {
                    self.mode = Mode::InString(StringSub::AwaitLowU);
                    Ok(true)
                } else {
                    Err(LexicalError::UnpairedSurrogate { offset: self.offset }.into())
                }
            }
            StringSub::AwaitLowU => {
                if c == 'u' {
                    self.mode = Mode::InString(StringSub::AwaitLowHex(0, 0));
                    Ok(true)
                } else {
                    Err(LexicalError::UnpairedSurrogate { offset: self.offset }.into())
                }
            }
            StringSub::AwaitLowHex(count, acc) => {
                let digit = c.to_digit(16).ok_or(LexicalError::InvalidUnicodeEscape {
                    offset: self.offset,
                })?;
                let acc = acc * 16 + digit;
                let count = count + 1;
                if count < 4 {
                    self.mode = Mode::InString(StringSub::AwaitLowHex(count, acc));
                    return Ok(true);
                }
                let low = acc;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(LexicalError::UnpairedSurrogate { offset: self.offset }.into());
                }
                let high = self
                    .pending_surrogate
                    .take()
                    .expect("AwaitLowHex is only reached after a high surrogate was recorded");
                let scalar = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (low - 0xDC00);
                let decoded = char::from_u32(scalar).ok_or(LexicalError::InvalidUnicodeEscape {
                    offset: self.offset,
                })?;
                events.push(TokenEvent::StringChunk(decoded.to_string()));
                self.mode = Mode::InString(StringSub::Normal);
                Ok(true)
            }
        }
    }

    fn after_string_end(&mut self) -> Mode {
        match self.context.last_mut() {
            Some(Context::Object(ctx @ ObjectCtx::ExpectKeyOrClose))
            | Some(Context::Object(ctx @ ObjectCtx::ExpectKey)) => {
                *ctx = ObjectCtx::ExpectColon;
                Mode::ExpectColon
            }
            _ => Mode::AfterValue,
        }
    }

    fn step_in_number(
        &mut self,
        sub: NumberSub,
        c: char,
        events: &mut Vec<TokenEvent>,
    ) -> Result<bool, ParseError> {
        use NumberSub::*;
        let digit = c.is_ascii_digit();
        let transition = match sub {
            NegSign if c == '0' => Some(IntZero),
            NegSign if digit => Some(IntDigits),
            IntZero if c == '.' => Some(FracRequireDigit),
            IntZero if c == 'e' || c == 'E' => Some(ExpSign),
            IntDigits if digit => Some(IntDigits),
            IntDigits if c == '.' => Some(FracRequireDigit),
            IntDigits if c == 'e' || c == 'E' => Some(ExpSign),
            FracRequireDigit if digit => Some(FracDigits),
            FracDigits if digit => Some(FracDigits),
            FracDigits if c == 'e' || c == 'E' => Some(ExpSign),
            ExpSign if c == '+' || c == '-' => Some(ExpRequireDigit),
            ExpSign if digit => Some(ExpDigits),
            ExpRequireDigit if digit => Some(ExpDigits),
            ExpDigits if digit => Some(ExpDigits),
            _ => None,
        };

        if let Some(next) = transition {
            events.push(TokenEvent::NumberChunk(c.to_string()));
            self.mode = Mode::InNumber(next);
            return Ok(true);
        }

        if sub.is_complete() {
            events.push(TokenEvent::NumberEnd);
            self.mode = Mode::AfterValue;
            // The terminator character was not part of the number; leave it
            // unconsumed so `AfterValue` (or a sibling value start) handles it.
            Ok(false)
        } else {
            Err(LexicalError::MalformedNumber {
                offset: self.offset,
                message: format!("unexpected character {c:?} while parsing a number"),
            }
            .into())
        }
    }

    fn step_in_literal(
        &mut self,
        lit: Literal,
        pos: usize,
        c: char,
        events: &mut Vec<TokenEvent>,
    ) -> Result<bool, ParseError> {
        let text = lit.text();
        let expected = text[pos..]
            .chars()
            .next()
            .expect("pos is always within the literal's text while InLiteral is active");
        if c != expected {
            return Err(LexicalError::UnknownLiteral { offset: self.offset }.into());
        }
        let pos = pos + 1;
        if pos == text.len() {
            events.push(lit.event());
            self.mode = Mode::AfterValue;
        } else {
            self.mode = Mode::InLiteral(lit, pos);
        }
        Ok(true)
    }
}

fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}
