//! Windowed scan for UTF-16LE text runs.
//!
//! A TabState file interleaves note text with length prefixes, flags,
//! cursor positions and checksums. Text is stored as UTF-16LE, so ASCII note
//! content shows up as printable bytes each followed by a zero byte. The
//! scanner walks the buffer looking for maximal stretches of such code units
//! and reports every stretch that is long enough to be more than padding noise.

use tracing::trace;

use crate::common::encoding::{code_units, decode_utf16le_lossy, is_printable_unit};

/// A stretch of printable UTF-16LE text found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Byte offset of the first code unit of `text`
    pub offset: usize,
    /// Length of `text` in the source buffer, in bytes
    pub byte_len: usize,
    /// Decoded text, trimmed of surrounding whitespace
    ///
    /// The minimum run length is checked before trimming, so a run padded
    /// with spaces can be shorter than the `min_chars` it was scanned with.
    pub text: String,
}

impl TextRun {
    /// Byte offset one past the last code unit of the run.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.byte_len
    }

    /// Number of characters in the run.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Iterator over the text runs of a buffer, in ascending offset order.
///
/// Runs may begin at odd offsets. Whenever no long-enough run starts at the
/// current position the scanner moves forward; after a run it resumes at the
/// run's end, so runs never overlap.
///
/// # Examples
///
/// ```
/// use tabstate::notepad::TextRuns;
///
/// let data = b"\x00\x00n\x00o\x00t\x00e\x00\x00\x00";
/// let runs: Vec<_> = TextRuns::new(data, 4).collect();
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].text, "note");
/// assert_eq!(runs[0].offset, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TextRuns<'a> {
    data: &'a [u8],
    pos: usize,
    min_chars: usize,
}

impl<'a> TextRuns<'a> {
    /// Scan `data` for runs of at least `min_chars` printable code units.
    ///
    /// A `min_chars` of zero is treated as one.
    pub fn new(data: &'a [u8], min_chars: usize) -> Self {
        Self {
            data,
            pos: 0,
            min_chars: min_chars.max(1),
        }
    }

    /// Count printable code units starting at byte `pos`.
    #[inline]
    fn printable_units_at(&self, pos: usize) -> usize {
        code_units(&self.data[pos..])
            .iter()
            .take_while(|unit| is_printable_unit(unit.get()))
            .count()
    }
}

impl Iterator for TextRuns<'_> {
    type Item = TextRun;

    fn next(&mut self) -> Option<TextRun> {
        while self.pos + 1 < self.data.len() {
            let start = self.pos;
            let units = self.printable_units_at(start);

            // Every printable unit has a non-zero low byte and a zero high
            // byte, so no run can start inside this stretch at an odd offset,
            // and the even offsets inside it only hold shorter suffixes.
            self.pos = start + (units * 2).max(1);

            if units < self.min_chars {
                continue;
            }

            let raw = decode_utf16le_lossy(&self.data[start..self.pos]);
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            let leading = raw.len() - raw.trim_start().len();
            let run = TextRun {
                offset: start + leading * 2,
                byte_len: text.len() * 2,
                text: text.to_string(),
            };
            trace!(offset = run.offset, chars = run.char_len(), "text run");
            return Some(run);
        }
        None
    }
}

/// Extract all text runs of at least `min_chars` characters from `data`.
///
/// This is a pure function of its input: the same buffer always yields the
/// same runs. Buffers with no text, including empty and odd-length ones,
/// simply produce an empty vector.
///
/// # Examples
///
/// ```
/// use tabstate::notepad::extract_runs;
///
/// let mut data = vec![0u8; 4];
/// data.extend("hello world".encode_utf16().flat_map(u16::to_le_bytes));
/// data.extend([0u8; 4]);
///
/// let runs = extract_runs(&data, 4);
/// assert_eq!(runs.len(), 1);
/// assert_eq!(runs[0].text, "hello world");
/// ```
pub fn extract_runs(data: &[u8], min_chars: usize) -> Vec<TextRun> {
    TextRuns::new(data, min_chars).collect()
}

/// Join the text of `runs` with `separator`.
pub fn join_runs(runs: &[TextRun], separator: &str) -> String {
    let mut out = String::with_capacity(runs.iter().map(|r| r.text.len() + separator.len()).sum());
    for (i, run) in runs.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&run.text);
    }
    out
}
