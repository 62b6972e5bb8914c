//! Common types and utilities shared by the scanner, the output writer and
//! the batch driver.

// Submodule declarations
pub mod encoding;
pub mod error;

// Re-exports for convenience
pub use encoding::{code_units, is_printable_char, is_printable_unit, printable_ratio};
pub use error::{Error, Result};
