//! Observability hooks for the parser engine.
//!
//! The crate exposes a trait-based structured logger so a host application
//! can observe tokenizer/builder state transitions. It never installs a
//! `tracing` subscriber itself.

pub mod logging;

pub use logging::{LogLevel, Logger, StructuredLogger};

/// Create a default logger, backed by `tracing`, for the given component
/// name.
pub fn create_default_logger(component_name: &str) -> Box<dyn Logger> {
    Box::new(StructuredLogger::new(component_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_default_logger() {
        let logger = create_default_logger("jsonriver");
        logger.info("started", json!({}));
    }
}
