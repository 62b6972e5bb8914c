//! Fallback strategies for buffers the windowed scan cannot read.
//!
//! When no text run is found the whole buffer is decoded as UTF-16LE from a
//! handful of starting offsets, which recovers text whose code units are
//! misaligned or broken up by stray control codes. Failing that, plain
//! single-byte ASCII strings are pulled out, `strings(1)` style.

use tracing::debug;

use crate::common::encoding::{decode_utf16le_lossy, printable_ratio};

use super::config::DecodeOptions;
use super::extractor::TextRun;

/// Text recovered by decoding the buffer from a fixed byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetCandidate {
    /// Byte offset the decode started at
    pub offset: usize,
    /// Cleaned, trimmed text
    pub text: String,
    /// Proportion of printable characters in `text`
    pub printable_ratio: f64,
}

/// Decode `data[offset..]` as UTF-16LE and clean the result.
///
/// NUL, replacement characters and control codes other than tab, line feed
/// and carriage return are dropped; surrounding whitespace is trimmed.
/// Returns `None` when `offset` is past the end of the buffer.
///
/// # Examples
///
/// ```
/// use tabstate::notepad::fallback::decode_at_offset;
///
/// let data = b"\x01h\x00i\x00\x00\x00";
/// assert_eq!(decode_at_offset(data, 1).as_deref(), Some("hi"));
/// assert_eq!(decode_at_offset(data, 99), None);
/// ```
pub fn decode_at_offset(data: &[u8], offset: usize) -> Option<String> {
    let bytes = data.get(offset..).filter(|bytes| !bytes.is_empty())?;
    let cleaned: String = decode_utf16le_lossy(bytes)
        .chars()
        .filter(|&c| c != '\u{FFFD}' && (!c.is_control() || matches!(c, '\t' | '\n' | '\r')))
        .collect();
    Some(cleaned.trim().to_string())
}

/// Try each configured fallback offset in turn and return the first decode
/// that looks like text.
///
/// A candidate is accepted when it has at least `min_run_chars` characters,
/// contains an alphanumeric character, and its printable ratio exceeds
/// `min_printable_ratio`.
pub fn decode_at_offsets(data: &[u8], options: &DecodeOptions) -> Option<OffsetCandidate> {
    for &offset in &options.fallback_offsets {
        let Some(text) = decode_at_offset(data, offset) else {
            continue;
        };

        let ratio = printable_ratio(&text);
        let long_enough = text.chars().count() >= options.min_run_chars;
        let has_alnum = text.chars().any(char::is_alphanumeric);

        if long_enough && has_alnum && ratio > options.min_printable_ratio {
            debug!(offset, ratio, "fallback decode accepted");
            return Some(OffsetCandidate {
                offset,
                text,
                printable_ratio: ratio,
            });
        }
        debug!(offset, ratio, long_enough, has_alnum, "fallback decode rejected");
    }
    None
}

/// Extract runs of single-byte printable ASCII of at least `min_len` bytes.
///
/// # Examples
///
/// ```
/// use tabstate::notepad::fallback::extract_ascii_strings;
///
/// let runs = extract_ascii_strings(b"\x00\x01plain\xFFab\x00", 4);
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].text, "plain");
/// assert_eq!(runs[0].offset, 2);
/// ```
pub fn extract_ascii_strings(data: &[u8], min_len: usize) -> Vec<TextRun> {
    let min_len = min_len.max(1);
    let mut runs = Vec::new();
    let mut start = None;

    // Iterate one past the end so a trailing string is closed too
    for (i, byte) in data.iter().copied().map(Some).chain(std::iter::once(None)).enumerate() {
        let printable = matches!(byte, Some(0x20..=0x7E));
        match (printable, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    // Printable ASCII is valid UTF-8
                    let text = String::from_utf8_lossy(&data[s..i]).into_owned();
                    runs.push(TextRun {
                        offset: s,
                        byte_len: i - s,
                        text,
                    });
                }
                start = None;
            },
            _ => {},
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_offset_one_recovers_shifted_text() {
        let mut data = vec![0x07u8];
        data.extend(utf16le("shifted note"));

        let candidate = decode_at_offsets(&data, &DecodeOptions::default()).unwrap();
        assert_eq!(candidate.offset, 1);
        assert_eq!(candidate.text, "shifted note");
        assert_eq!(candidate.printable_ratio, 1.0);
    }

    #[test]
    fn test_offset_zero_strips_nul_padding() {
        let mut data = vec![0u8; 6];
        data.extend(utf16le("padded"));
        data.extend([0u8; 6]);

        let candidate = decode_at_offsets(&data, &DecodeOptions::default()).unwrap();
        assert_eq!(candidate.offset, 0);
        assert_eq!(candidate.text, "padded");
    }

    #[test]
    fn test_control_codes_removed() {
        let data = utf16le("ab\u{1}cd\u{2}ef");
        assert_eq!(decode_at_offset(&data, 0).as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_rejects_low_printable_ratio() {
        let data: Vec<u8> = (0..256u32).map(|i| 0x80 | (i * 37 % 128) as u8).collect();
        assert!(decode_at_offsets(&data, &DecodeOptions::default()).is_none());
    }

    #[test]
    fn test_rejects_short_or_symbol_only() {
        let options = DecodeOptions::default();
        assert!(decode_at_offsets(&utf16le("ab"), &options).is_none());
        assert!(decode_at_offsets(&utf16le("!!!!??"), &options).is_none());
    }

    #[test]
    fn test_offset_past_end_skipped() {
        let options = DecodeOptions::new().with_fallback_offsets(vec![100, 0]);
        let candidate = decode_at_offsets(&utf16le("still found"), &options).unwrap();
        assert_eq!(candidate.offset, 0);
    }

    #[test]
    fn test_ascii_strings() {
        let runs = extract_ascii_strings(b"abc\x00defg\x00hijkl", 4);
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["defg", "hijkl"]);
        assert_eq!(runs[1].offset, 9);
        assert_eq!(runs[1].byte_len, 5);
    }

    #[test]
    fn test_ascii_strings_none() {
        assert!(extract_ascii_strings(&[0u8; 32], 4).is_empty());
        assert!(extract_ascii_strings(b"", 4).is_empty());
    }
}
