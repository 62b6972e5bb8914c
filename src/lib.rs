//! tabstate - recover unsaved text from Windows Notepad TabState files
//!
//! Windows 11 Notepad keeps every open tab, including ones that were never
//! saved, in binary session files under
//! `%LOCALAPPDATA%\Packages\Microsoft.WindowsNotepad_8wekyb3d8bbwe\LocalState\TabState`.
//! The format is undocumented, but note text is stored as UTF-16LE and can be
//! located by scanning for printable code units.
//!
//! # Features
//!
//! - **Pure extraction**: [`notepad::extract_runs`] maps bytes to text runs with no I/O
//! - **Fallbacks**: whole-buffer decodes at shifted offsets and ASCII strings
//! - **Tunable heuristics**: thresholds live in [`notepad::DecodeOptions`], loadable from YAML
//! - **Batch recovery**: decode a whole TabState directory in parallel
//!
//! # Example - Decoding a buffer
//!
//! ```
//! use tabstate::notepad::{DecodeOptions, decode_bytes};
//!
//! let mut data = vec![0u8; 4];
//! data.extend("hello world".encode_utf16().flat_map(u16::to_le_bytes));
//! data.extend([0u8; 4]);
//!
//! let doc = decode_bytes(&data, &DecodeOptions::default());
//! assert_eq!(doc.text(), "hello world");
//! ```
//!
//! # Example - Recovering a directory
//!
//! ```no_run
//! use tabstate::batch::process_directory;
//! use tabstate::notepad::DecodeOptions;
//! use tabstate::output::OutputWriter;
//!
//! # fn main() -> Result<(), tabstate::Error> {
//! let writer = OutputWriter::new("decoded_notepad_output");
//! let report = process_directory("TabState", &DecodeOptions::default(), &writer)?;
//! println!("{} saved, {} empty, {} failed", report.saved(), report.no_text(), report.failed());
//! # Ok(())
//! # }
//! ```

/// Shared error type and UTF-16LE helpers
pub mod common;

/// TabState scanning and decoding
///
/// This module holds the text-run extractor, its fallbacks, the decode
/// options and session file discovery.
pub mod notepad;

/// Output file naming, writing and previews
pub mod output;

/// Directory-level recovery
pub mod batch;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use notepad::{DecodeOptions, DecodedDocument, Strategy, TextRun, decode_bytes, decode_file, extract_runs};
