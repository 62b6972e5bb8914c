//! Strategy cascade that turns a session buffer into a document.
//!
//! The windowed scan runs first. If it finds nothing (or exhaustive mode is
//! on) the buffer is re-decoded from the configured fallback offsets, and as
//! a last resort single-byte ASCII strings are collected.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::common::{Error, Result};

use super::config::DecodeOptions;
use super::extractor::{TextRun, extract_runs, join_runs};
use super::fallback::{OffsetCandidate, decode_at_offsets, extract_ascii_strings};

/// Which strategy produced a [`DecodedDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// UTF-16LE runs found by the windowed scan
    Runs,
    /// Whole-buffer decode starting at `offset`
    Offset { offset: usize },
    /// Single-byte ASCII strings
    AsciiStrings,
    /// Nothing readable was found
    Empty,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Runs => write!(f, "utf16le runs"),
            Strategy::Offset { offset } => write!(f, "utf16le decode at offset {}", offset),
            Strategy::AsciiStrings => write!(f, "ascii strings"),
            Strategy::Empty => write!(f, "empty"),
        }
    }
}

/// Text recovered from one session buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDocument {
    strategy: Strategy,
    runs: Vec<TextRun>,
    whole_buffer: Option<OffsetCandidate>,
    text: String,
}

impl DecodedDocument {
    fn new(
        strategy: Strategy,
        runs: Vec<TextRun>,
        whole_buffer: Option<OffsetCandidate>,
        separator: &str,
    ) -> Self {
        let mut text = join_runs(&runs, separator);
        if let Some(extra) = &whole_buffer {
            if !text.is_empty() {
                text.push_str(separator);
            }
            text.push_str(&extra.text);
        }
        Self {
            strategy,
            runs,
            whole_buffer,
            text,
        }
    }

    fn empty() -> Self {
        Self {
            strategy: Strategy::Empty,
            runs: Vec::new(),
            whole_buffer: None,
            text: String::new(),
        }
    }

    /// Strategy that produced this document.
    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Runs in ascending offset order.
    #[inline]
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Whole-buffer decode from a fallback offset.
    ///
    /// This is the entire text for [`Strategy::Offset`]. With runs, it is only
    /// present in exhaustive mode when it differs from their joined text. It
    /// is kept apart from [`runs`](Self::runs) because the decode is cleaned
    /// of control codes and may hold non-ASCII characters.
    #[inline]
    pub fn whole_buffer(&self) -> Option<&OffsetCandidate> {
        self.whole_buffer.as_ref()
    }

    /// All recovered text joined with the configured separator.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the document and return its text.
    #[inline]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether no text was recovered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// First non-empty line of the text, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.text.lines().map(str::trim).find(|line| !line.is_empty())
    }
}

/// Recover text from a session buffer.
///
/// Never fails: a buffer with nothing readable produces an empty document
/// with [`Strategy::Empty`].
///
/// # Examples
///
/// ```
/// use tabstate::notepad::{DecodeOptions, Strategy, decode_bytes};
///
/// let mut data = vec![0u8; 4];
/// data.extend("hello world".encode_utf16().flat_map(u16::to_le_bytes));
/// data.extend([0u8; 4]);
///
/// let doc = decode_bytes(&data, &DecodeOptions::default());
/// assert_eq!(doc.strategy(), Strategy::Runs);
/// assert_eq!(doc.text(), "hello world");
/// ```
pub fn decode_bytes(data: &[u8], options: &DecodeOptions) -> DecodedDocument {
    let runs = extract_runs(data, options.min_run_chars);

    let doc = if !runs.is_empty() {
        let whole_buffer = if options.exhaustive {
            let joined = join_runs(&runs, &options.separator);
            decode_at_offsets(data, options).filter(|candidate| candidate.text != joined)
        } else {
            None
        };
        DecodedDocument::new(Strategy::Runs, runs, whole_buffer, &options.separator)
    } else if let Some(candidate) = decode_at_offsets(data, options) {
        let strategy = Strategy::Offset {
            offset: candidate.offset,
        };
        DecodedDocument::new(strategy, Vec::new(), Some(candidate), &options.separator)
    } else if options.ascii_fallback {
        let strings = extract_ascii_strings(data, options.min_run_chars);
        if strings.is_empty() {
            DecodedDocument::empty()
        } else {
            DecodedDocument::new(Strategy::AsciiStrings, strings, None, &options.separator)
        }
    } else {
        DecodedDocument::empty()
    };

    debug!(
        bytes = data.len(),
        strategy = %doc.strategy,
        runs = doc.runs.len(),
        chars = doc.text.len(),
        "decoded buffer"
    );
    doc
}

/// Read a session file and recover its text.
///
/// A missing file is reported as [`Error::NotFound`]; other read failures as
/// [`Error::Io`].
pub fn decode_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<DecodedDocument> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::from_io(e, path))?;
    debug!(path = %path.display(), bytes = data.len(), "read session file");
    Ok(decode_bytes(&data, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::is_printable_char;
    use std::io::Write;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_runs_joined_with_separator() {
        let mut data = vec![0x01, 0x00];
        data.extend(utf16le("Shopping list"));
        data.extend([0u8; 6]);
        data.extend(utf16le("milk, eggs"));

        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert_eq!(doc.strategy(), Strategy::Runs);
        assert_eq!(doc.runs().len(), 2);
        assert_eq!(doc.text(), "Shopping list\n\nmilk, eggs");
        assert_eq!(doc.first_line(), Some("Shopping list"));

        let doc = decode_bytes(&data, &DecodeOptions::new().with_separator("\n"));
        assert_eq!(doc.text(), "Shopping list\nmilk, eggs");
    }

    #[test]
    fn test_offset_fallback_when_runs_too_short() {
        // Words shorter than the run threshold, split by control codes
        let data = utf16le("abc\u{1}def\u{1}ghi\u{1}jk");
        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert_eq!(doc.strategy(), Strategy::Offset { offset: 0 });
        assert_eq!(doc.text(), "abcdefghijk");
        assert!(doc.runs().is_empty());
        assert_eq!(doc.whole_buffer().map(|c| c.offset), Some(0));
    }

    #[test]
    fn test_runs_only_hold_printable_text() {
        let cases = [
            utf16le("abc\u{1}def\u{1}ghi\u{1}\u{4e2d}"),
            utf16le("Shopping list\u{1}\u{2}milk"),
            [vec![0xFFu8; 8], b"legacy ascii".to_vec()].concat(),
        ];
        for data in &cases {
            let doc = decode_bytes(data, &DecodeOptions::default());
            assert!(!doc.is_empty());
            for run in doc.runs() {
                assert!(run.text.chars().all(is_printable_char), "{run:?}");
            }
        }

        let doc = decode_bytes(&cases[0], &DecodeOptions::default());
        assert_eq!(doc.strategy(), Strategy::Offset { offset: 0 });
        assert_eq!(doc.text(), "abcdefghi\u{4e2d}");
    }

    #[test]
    fn test_ascii_fallback() {
        let mut data = vec![0xFFu8; 8];
        data.extend(b"legacy ascii text");
        data.extend([0xFEu8; 8]);

        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert_eq!(doc.strategy(), Strategy::AsciiStrings);
        assert_eq!(doc.text(), "legacy ascii text");

        let strict = DecodeOptions::new().with_ascii_fallback(false);
        let doc = decode_bytes(&data, &strict);
        assert_eq!(doc.strategy(), Strategy::Empty);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_all_nul_is_empty() {
        let doc = decode_bytes(&[0u8; 128], &DecodeOptions::default());
        assert_eq!(doc.strategy(), Strategy::Empty);
        assert!(doc.is_empty());
        assert_eq!(doc.first_line(), None);
    }

    #[test]
    fn test_non_printable_kilobyte_is_empty() {
        let data: Vec<u8> = (0..1024u32).map(|i| 0x80 | (i.wrapping_mul(40_503) >> 3) as u8).collect();
        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert!(doc.is_empty());
        assert!(doc.runs().is_empty());
    }

    #[test]
    fn test_leading_padding_byte_recovered() {
        let mut data = vec![0xABu8];
        data.extend(utf16le("note after one byte"));
        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert_eq!(doc.text(), "note after one byte");
    }

    #[test]
    fn test_exhaustive_appends_distinct_decode() {
        let mut data = utf16le("header");
        data.extend(utf16le("\u{1}"));
        data.extend(utf16le("ab"));

        let doc = decode_bytes(&data, &DecodeOptions::default());
        assert_eq!(doc.text(), "header");
        assert!(doc.whole_buffer().is_none());

        let doc = decode_bytes(&data, &DecodeOptions::new().with_exhaustive(true));
        assert_eq!(doc.strategy(), Strategy::Runs);
        assert_eq!(doc.whole_buffer().map(|c| c.offset), Some(0));
        assert_eq!(doc.text(), "header\n\nheaderab");
    }

    #[test]
    fn test_exhaustive_skips_identical_decode() {
        let mut data = vec![0u8; 4];
        data.extend(utf16le("hello world"));
        data.extend([0u8; 4]);

        let doc = decode_bytes(&data, &DecodeOptions::new().with_exhaustive(true));
        assert!(doc.whole_buffer().is_none());
        assert_eq!(doc.text(), "hello world");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let mut data = vec![3u8, 1, 0, 0];
        data.extend(utf16le("same every time"));
        let options = DecodeOptions::default();
        assert_eq!(decode_bytes(&data, &options), decode_bytes(&data, &options));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Runs.to_string(), "utf16le runs");
        assert_eq!(Strategy::Offset { offset: 1 }.to_string(), "utf16le decode at offset 1");
    }

    #[test]
    fn test_decode_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&utf16le("from disk")).unwrap();
        let doc = decode_file(file.path(), &DecodeOptions::default()).unwrap();
        assert_eq!(doc.into_text(), "from disk");
    }

    #[test]
    fn test_decode_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        let err = decode_file(&missing, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(path) if path == missing));
    }
}
