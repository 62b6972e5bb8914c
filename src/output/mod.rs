//! Presenting and persisting recovered notes.
//!
//! - [`naming`]: filesystem-safe stems from a note's first line
//! - [`writer`]: collision-free writes into an output directory
//! - [`front_matter`]: optional YAML provenance block
//! - [`preview`]: short terminal excerpts

pub mod front_matter;
pub mod naming;
pub mod preview;
pub mod writer;

pub use front_matter::FrontMatter;
pub use naming::make_stem;
pub use preview::Preview;
pub use writer::{DEFAULT_OUTPUT_DIR, OutputWriter};
