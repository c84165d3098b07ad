//! Stack-based value construction: the second stage of the streaming
//! pipeline.
//!
//! The builder never holds a raw pointer into its own tree. Each open
//! container frame instead records the *slot* — an array index or object
//! entry index — that locates its own container inside its parent, and
//! mutation walks that chain from the root on every event. This mirrors how
//! a response-accumulator navigates into a nested tree by index rather than
//! by held references.

use crate::tokenizer::TokenEvent;
use crate::value::Value;

#[derive(Debug, Clone, Copy)]
enum Seg {
    Root,
    ArrayIndex(usize),
    ObjectEntry(usize),
}

#[derive(Debug)]
enum ObjectState {
    AwaitingKey,
    ReadingKey(String),
    AwaitingColon(String),
    AwaitingValue(String),
    HoldingValue(usize),
}

#[derive(Debug)]
enum FrameMeta {
    Array,
    Object(ObjectState),
}

#[derive(Debug)]
struct Frame {
    seg: Seg,
    meta: FrameMeta,
}

#[derive(Debug)]
struct NumberAccumulator {
    text: String,
    last_committed: f64,
}

impl NumberAccumulator {
    fn new(initial_capacity: usize) -> Self {
        Self {
            text: String::with_capacity(initial_capacity),
            last_committed: 0.0,
        }
    }

    /// Appends `chunk` to the accumulated text, returning the new value if
    /// the text now parses as a complete number whose value differs from
    /// the last one committed. Incomplete prefixes (`-`, `1e`) never
    /// regress the committed value.
    fn push(&mut self, chunk: &str) -> Option<f64> {
        self.text.push_str(chunk);
        match self.text.parse::<f64>() {
            Ok(value) if value != self.last_committed => {
                self.last_committed = value;
                Some(value)
            }
            _ => None,
        }
    }
}

fn navigate_mut<'a>(root: &'a mut Value, stack: &[Frame]) -> &'a mut Value {
    let mut current = root;
    for frame in stack.iter().skip(1) {
        current = match (current, frame.seg) {
            (Value::Array(items), Seg::ArrayIndex(i)) => &mut items[i],
            (Value::Object(entries), Seg::ObjectEntry(i)) => &mut entries[i].1,
            _ => unreachable!("frame seg does not match its container's shape"),
        };
    }
    current
}

fn upsert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) -> usize {
    if let Some(idx) = entries.iter().position(|(k, _)| *k == key) {
        entries[idx].1 = value;
        idx
    } else {
        entries.push((key, value));
        entries.len() - 1
    }
}

/// Stack-based constructor that turns a [`TokenEvent`] stream into in-place
/// mutations of a single root [`Value`].
#[derive(Debug)]
pub struct ValueBuilder {
    root: Option<Value>,
    stack: Vec<Frame>,
    number: Option<NumberAccumulator>,
    initial_string_capacity: usize,
}

impl Default for ValueBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INITIAL_STRING_CAPACITY)
    }
}

impl ValueBuilder {
    /// Creates an empty builder; no value has started yet. `initial_string_capacity`
    /// seeds the allocation for every string/key/number text buffer the builder
    /// creates, per [`crate::config::ParserConfig::initial_string_capacity`].
    pub fn new(initial_string_capacity: usize) -> Self {
        Self {
            root: None,
            stack: Vec::new(),
            number: None,
            initial_string_capacity,
        }
    }

    /// Returns a clone of the current root value, if any value has started.
    pub fn current(&self) -> Option<Value> {
        self.root.clone()
    }

    /// Applies one token event, returning `Some(value)` if handling it made
    /// progress that should be yielded to the consumer.
    pub fn apply(&mut self, event: TokenEvent) -> Option<Value> {
        let yielded = match event {
            TokenEvent::StartArray => {
                self.start_container(Value::Array(Vec::new()), FrameMeta::Array);
                true
            }
            TokenEvent::StartObject => {
                self.start_container(
                    Value::Object(Vec::new()),
                    FrameMeta::Object(ObjectState::AwaitingKey),
                );
                true
            }
            TokenEvent::EndArray | TokenEvent::EndObject => {
                self.stack.pop();
                true
            }
            TokenEvent::Colon => {
                self.handle_colon();
                false
            }
            TokenEvent::Comma => {
                self.handle_comma();
                false
            }
            TokenEvent::LiteralNull => {
                self.place_leaf(Value::Null);
                true
            }
            TokenEvent::LiteralTrue => {
                self.place_leaf(Value::Bool(true));
                true
            }
            TokenEvent::LiteralFalse => {
                self.place_leaf(Value::Bool(false));
                true
            }
            TokenEvent::StringStart => {
                self.handle_string_start();
                false
            }
            TokenEvent::StringChunk(text) => self.handle_string_chunk(&text),
            TokenEvent::StringEnd => self.handle_string_end(),
            TokenEvent::NumberChunk(text) => self.handle_number_chunk(&text),
            TokenEvent::NumberEnd => {
                self.number = None;
                false
            }
            TokenEvent::Eof => false,
        };

        if yielded {
            tracing::trace!(depth = self.stack.len(), "value builder progressed");
            self.root.clone()
        } else {
            None
        }
    }

    fn reading_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                meta: FrameMeta::Object(ObjectState::AwaitingKey),
                ..
            })
        )
    }

    fn start_container(&mut self, value: Value, meta: FrameMeta) {
        let seg = self.place_and_locate(value);
        self.stack.push(Frame { seg, meta });
    }

    fn place_leaf(&mut self, value: Value) {
        self.place_and_locate(value);
    }

    /// Places `value` at the slot the active frame (or the root, if no
    /// frame is open) is currently responsible for, returning the `Seg`
    /// that locates it within its parent. If the active frame is an
    /// object, its state is advanced to `HoldingValue`.
    fn place_and_locate(&mut self, value: Value) -> Seg {
        let seg = match self.stack.last() {
            None => {
                self.root = Some(value);
                Seg::Root
            }
            Some(Frame {
                meta: FrameMeta::Array, ..
            }) => {
                let root = self.root.as_mut().expect("array frame implies root exists");
                let items = match navigate_mut(root, &self.stack) {
                    Value::Array(items) => items,
                    _ => unreachable!("array frame's container is not an array"),
                };
                items.push(value);
                Seg::ArrayIndex(items.len() - 1)
            }
            Some(Frame {
                meta: FrameMeta::Object(ObjectState::AwaitingValue(key)),
                ..
            }) => {
                let key = key.clone();
                let root = self.root.as_mut().expect("object frame implies root exists");
                let entries = match navigate_mut(root, &self.stack) {
                    Value::Object(entries) => entries,
                    _ => unreachable!("object frame's container is not an object"),
                };
                Seg::ObjectEntry(upsert_entry(entries, key, value))
            }
            Some(_) => unreachable!("place_and_locate called outside a value-expecting position"),
        };

        if let Seg::ObjectEntry(idx) = seg {
            if let Some(Frame {
                meta: FrameMeta::Object(state),
                ..
            }) = self.stack.last_mut()
            {
                *state = ObjectState::HoldingValue(idx);
            }
        }

        seg
    }

    /// Returns the slot currently being mutated in place: the last element
    /// of an active array, the held value of an active object, or the root
    /// itself.
    fn active_leaf_mut(&mut self) -> &mut Value {
        match self.stack.last() {
            None => self.root.as_mut().expect("a leaf implies root exists"),
            Some(Frame {
                meta: FrameMeta::Array, ..
            }) => {
                let root = self.root.as_mut().expect("array frame implies root exists");
                match navigate_mut(root, &self.stack) {
                    Value::Array(items) => items
                        .last_mut()
                        .expect("array frame always has at least the active leaf"),
                    _ => unreachable!("array frame's container is not an array"),
                }
            }
            Some(Frame {
                meta: FrameMeta::Object(ObjectState::HoldingValue(idx)),
                ..
            }) => {
                let idx = *idx;
                let root = self.root.as_mut().expect("object frame implies root exists");
                match navigate_mut(root, &self.stack) {
                    Value::Object(entries) => &mut entries[idx].1,
                    _ => unreachable!("object frame's container is not an object"),
                }
            }
            Some(_) => unreachable!("active_leaf_mut called outside a holding-value position"),
        }
    }

    fn update_active_number(&mut self, value: f64) {
        if let Value::Number(n) = self.active_leaf_mut() {
            *n = value;
        }
    }

    fn append_active_string(&mut self, text: &str) {
        if let Value::String(s) = self.active_leaf_mut() {
            s.push_str(text);
        }
    }

    fn handle_colon(&mut self) {
        if let Some(Frame {
            meta: FrameMeta::Object(state),
            ..
        }) = self.stack.last_mut()
        {
            if let ObjectState::AwaitingColon(key) = state {
                let key = std::mem::take(key);
                *state = ObjectState::AwaitingValue(key);
            }
        }
    }

    fn handle_comma(&mut self) {
        if let Some(Frame {
            meta: FrameMeta::Object(state),
            ..
        }) = self.stack.last_mut()
        {
            if matches!(state, ObjectState::HoldingValue(_)) {
                *state = ObjectState::AwaitingKey;
            }
        }
    }

    fn handle_string_start(&mut self) {
        if self.reading_key() {
            if let Some(Frame {
                meta: FrameMeta::Object(state),
                ..
            }) = self.stack.last_mut()
            {
                *state = ObjectState::ReadingKey(String::with_capacity(self.initial_string_capacity));
            }
        } else {
            self.place_leaf(Value::String(String::with_capacity(self.initial_string_capacity)));
        }
    }

    fn handle_string_chunk(&mut self, text: &str) -> bool {
        if let Some(Frame {
            meta: FrameMeta::Object(ObjectState::ReadingKey(buf)),
            ..
        }) = self.stack.last_mut()
        {
            buf.push_str(text);
            return false;
        }
        self.append_active_string(text);
        !text.is_empty()
    }

    fn handle_string_end(&mut self) -> bool {
        let finished_key = match self.stack.last_mut() {
            Some(Frame {
                meta: FrameMeta::Object(state @ ObjectState::ReadingKey(_)),
                ..
            }) => match std::mem::replace(state, ObjectState::AwaitingKey) {
                ObjectState::ReadingKey(buf) => Some(buf),
                _ => None,
            },
            _ => None,
        };

        match finished_key {
            Some(key) => {
                if let Some(Frame {
                    meta: FrameMeta::Object(state),
                    ..
                }) = self.stack.last_mut()
                {
                    *state = ObjectState::AwaitingColon(key);
                }
                false
            }
            None => true,
        }
    }

    fn handle_number_chunk(&mut self, text: &str) -> bool {
        if self.number.is_none() {
            self.place_leaf(Value::Number(0.0));
            self.number = Some(NumberAccumulator::new(self.initial_string_capacity));
        }
        let changed = self
            .number
            .as_mut()
            .expect("just initialized above")
            .push(text);
        match changed {
            Some(value) => {
                self.update_active_number(value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(builder: &mut ValueBuilder, events: Vec<TokenEvent>) -> Vec<Value> {
        events.into_iter().filter_map(|e| builder.apply(e)).collect()
    }

    #[test]
    fn test_array_of_numbers_yields_progressively() {
        let mut builder = ValueBuilder::new(32);
        let yields = apply_all(
            &mut builder,
            vec![
                TokenEvent::StartArray,
                TokenEvent::NumberChunk("1".into()),
                TokenEvent::NumberEnd,
                TokenEvent::Comma,
                TokenEvent::NumberChunk("2".into()),
                TokenEvent::NumberEnd,
                TokenEvent::EndArray,
            ],
        );
        assert_eq!(
            yields,
            vec![
                Value::Array(vec![]),
                Value::Array(vec![Value::Number(1.0)]),
                Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
                Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
            ]
        );
    }

    #[test]
    fn test_partial_number_does_not_regress() {
        let mut builder = ValueBuilder::new(32);
        // "-" alone must not commit a value; only once "12" is seen does it yield.
        let yields = apply_all(
            &mut builder,
            vec![
                TokenEvent::NumberChunk("-".into()),
                TokenEvent::NumberChunk("1".into()),
                TokenEvent::NumberChunk("2".into()),
                TokenEvent::NumberEnd,
            ],
        );
        assert_eq!(yields, vec![Value::Number(-1.0), Value::Number(-12.0)]);
    }

    #[test]
    fn test_object_with_string_value() {
        let mut builder = ValueBuilder::new(32);
        let yields = apply_all(
            &mut builder,
            vec![
                TokenEvent::StartObject,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("a".into()),
                TokenEvent::StringEnd,
                TokenEvent::Colon,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("he".into()),
                TokenEvent::StringChunk("llo".into()),
                TokenEvent::StringEnd,
                TokenEvent::EndObject,
            ],
        );
        let expected_partial = Value::Object(vec![("a".to_string(), Value::String("he".to_string()))]);
        let expected_final = Value::Object(vec![("a".to_string(), Value::String("hello".to_string()))]);
        assert!(yields.contains(&expected_partial));
        assert_eq!(yields.last(), Some(&expected_final));
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let mut builder = ValueBuilder::new(32);
        apply_all(
            &mut builder,
            vec![
                TokenEvent::StartObject,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("a".into()),
                TokenEvent::StringEnd,
                TokenEvent::Colon,
                TokenEvent::LiteralTrue,
                TokenEvent::Comma,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("b".into()),
                TokenEvent::StringEnd,
                TokenEvent::Colon,
                TokenEvent::LiteralFalse,
                TokenEvent::Comma,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("a".into()),
                TokenEvent::StringEnd,
                TokenEvent::Colon,
                TokenEvent::LiteralNull,
                TokenEvent::EndObject,
            ],
        );
        assert_eq!(
            builder.current(),
            Some(Value::Object(vec![
                ("a".to_string(), Value::Null),
                ("b".to_string(), Value::Bool(false)),
            ]))
        );
    }

    #[test]
    fn test_nested_array_in_object() {
        let mut builder = ValueBuilder::new(32);
        apply_all(
            &mut builder,
            vec![
                TokenEvent::StartObject,
                TokenEvent::StringStart,
                TokenEvent::StringChunk("items".into()),
                TokenEvent::StringEnd,
                TokenEvent::Colon,
                TokenEvent::StartArray,
                TokenEvent::NumberChunk("1".into()),
                TokenEvent::NumberEnd,
                TokenEvent::EndArray,
                TokenEvent::EndObject,
            ],
        );
        assert_eq!(
            builder.current(),
            Some(Value::Object(vec![(
                "items".to_string(),
                Value::Array(vec![Value::Number(1.0)])
            )]))
        );
    }
}
