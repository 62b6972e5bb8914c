//! Unified error types for tabstate.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
