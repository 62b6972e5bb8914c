//! Windows Notepad TabState decoding.
//!
//! Notepad (Windows 11) persists every open tab, saved or not, to a binary
//! file under `LocalState\TabState`. The layout is undocumented, but note
//! text is stored as UTF-16LE, so it can be recovered without understanding
//! the surrounding fields.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tabstate::notepad::{DecodeOptions, decode_file};
//!
//! # fn main() -> Result<(), tabstate::Error> {
//! let doc = decode_file("3f2a9c1e.bin", &DecodeOptions::default())?;
//! if doc.is_empty() {
//!     println!("No readable content found.");
//! } else {
//!     println!("{}", doc.text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`extractor`]: the windowed scan producing [`TextRun`]s
//! - [`fallback`]: whole-buffer decodes at fixed offsets, ASCII strings
//! - [`decoder`]: the strategy cascade and [`DecodedDocument`]
//! - [`config`]: [`DecodeOptions`]
//! - [`detection`]: finding session files on disk

pub mod config;
pub mod decoder;
pub mod detection;
pub mod extractor;
pub mod fallback;

pub use config::DecodeOptions;
pub use decoder::{DecodedDocument, Strategy, decode_bytes, decode_file};
pub use detection::{TabStateListing, default_tabstate_dir, list_tabstate_files};
pub use extractor::{TextRun, TextRuns, extract_runs, join_runs};
pub use fallback::OffsetCandidate;
