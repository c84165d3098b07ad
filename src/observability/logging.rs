//! Structured logging for the parser engine.
//!
//! The crate never initializes a subscriber itself — that is an application
//! concern — but it emits structured events through this trait so a host
//! application can wire it into `tracing` (the default) or its own logging
//! stack.

use serde_json::Value as JsonValue;

/// Minimum severity a [`StructuredLogger`] will emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and above.
    Warn,
    /// Informational events and above.
    Info,
    /// Debug-level detail and above.
    Debug,
    /// Every event, including per-token tracing.
    Trace,
}

/// Logger trait for structured logging.
///
/// Implementations can integrate with various logging backends (e.g.,
/// `tracing`, `log`, a custom sink).
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: JsonValue);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: JsonValue);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: JsonValue);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: JsonValue);
}

/// Structured logger implementation backed by the `tracing` crate.
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the minimum log level for this logger.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: JsonValue) {
        if !self.should_log(LogLevel::Debug) {
            return;
        }
        tracing::debug!(target: &self.name, message = message, fields = %fields);
    }

    fn info(&self, message: &str, fields: JsonValue) {
        if !self.should_log(LogLevel::Info) {
            return;
        }
        tracing::info!(target: &self.name, message = message, fields = %fields);
    }

    fn warn(&self, message: &str, fields: JsonValue) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }
        tracing::warn!(target: &self.name, message = message, fields = %fields);
    }

    fn error(&self, message: &str, fields: JsonValue) {
        if !self.should_log(LogLevel::Error) {
            return;
        }
        tracing::error!(target: &self.name, message = message, fields = %fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test");
        assert_eq!(logger.name, "test");
    }

    #[test]
    fn test_should_log() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Info);
        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warn));
        assert!(logger.should_log(LogLevel::Info));
        assert!(!logger.should_log(LogLevel::Debug));
        assert!(!logger.should_log(LogLevel::Trace));
    }

    #[test]
    fn test_logger_does_not_panic() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Debug);
        logger.debug("parsing chunk", json!({ "bytes": 12 }));
        logger.info("value yielded", json!({ "kind": "object" }));
    }
}
