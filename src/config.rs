//! Configuration knobs for the parser engine.
//!
//! Unlike a network client's configuration, there is no authentication,
//! retry, or endpoint surface here — only the handful of parameters that
//! genuinely affect how the tokenizer and value builder behave.

/// Configuration for a [`crate::ParserCore`] or [`crate::JsonStream`].
#[derive(Debug, Clone)]
pub struct ParserConfig {
    max_depth: usize,
    initial_string_capacity: usize,
}

/// Default maximum nesting depth (arrays and objects combined).
pub const DEFAULT_MAX_DEPTH: usize = 5000;

/// Default initial capacity hint for string/number accumulation buffers.
pub const DEFAULT_INITIAL_STRING_CAPACITY: usize = 32;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_string_capacity: DEFAULT_INITIAL_STRING_CAPACITY,
        }
    }
}

impl ParserConfig {
    /// Starts building a [`ParserConfig`] from defaults.
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }

    /// Maximum combined array/object nesting depth before a
    /// [`crate::error::StructuralError::DepthExceeded`] is raised.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Initial capacity hint used when allocating string/number accumulation
    /// buffers.
    pub fn initial_string_capacity(&self) -> usize {
        self.initial_string_capacity
    }
}

/// Builder for [`ParserConfig`].
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    max_depth: Option<usize>,
    initial_string_capacity: Option<usize>,
}

impl ParserConfigBuilder {
    /// Sets the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the initial capacity hint for accumulation buffers.
    pub fn initial_string_capacity(mut self, capacity: usize) -> Self {
        self.initial_string_capacity = Some(capacity);
        self
    }

    /// Builds the final [`ParserConfig`], falling back to defaults for any
    /// unset field.
    pub fn build(self) -> ParserConfig {
        ParserConfig {
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            initial_string_capacity: self
                .initial_string_capacity
                .unwrap_or(DEFAULT_INITIAL_STRING_CAPACITY),
        }
    }
}
