//! Error types for the incremental JSON parser.

mod categories;
mod types;

pub use categories::*;
pub use types::*;
