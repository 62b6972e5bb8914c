//! UTF-16LE helpers for scanning Notepad session buffers.
//!
//! Notepad stores note content as UTF-16 little-endian code units embedded
//! between binary fields. These helpers expose a byte buffer as a slice of
//! code units without copying, classify code units as printable text, and
//! decode byte ranges into Rust strings.

use std::borrow::Cow;

use encoding_rs::UTF_16LE;
use zerocopy::{FromBytes, LE, U16};

/// View a byte slice as little-endian UTF-16 code units.
///
/// A dangling trailing byte (odd-length input) is ignored. `U16<LE>` has an
/// alignment of one, so the view can start at any byte offset.
///
/// # Examples
///
/// ```
/// use tabstate::common::encoding::code_units;
///
/// let units = code_units(b"H\x00i\x00!");
/// assert_eq!(units.len(), 2);
/// assert_eq!(units[0].get(), u16::from(b'H'));
/// ```
#[inline]
pub fn code_units(bytes: &[u8]) -> &[U16<LE>] {
    let even = &bytes[..bytes.len() & !1]; // Round down to even number
    <[U16<LE>]>::ref_from_bytes(even).unwrap_or(&[])
}

/// Whether a UTF-16 code unit counts as note text.
///
/// Printable ASCII (0x20..=0x7E) plus tab, line feed and carriage return.
/// NUL and every other control code are rejected, as is anything outside
/// the ASCII range.
#[inline]
pub const fn is_printable_unit(unit: u16) -> bool {
    matches!(unit, 0x20..=0x7E | 0x09 | 0x0A | 0x0D)
}

/// Character form of [`is_printable_unit`].
#[inline]
pub const fn is_printable_char(c: char) -> bool {
    matches!(c, ' '..='~' | '\t' | '\n' | '\r')
}

/// Proportion of printable characters in `text`, in `0.0..=1.0`.
///
/// Returns `0.0` for empty input so that an empty candidate never passes a
/// ratio threshold.
///
/// # Examples
///
/// ```
/// use tabstate::common::encoding::printable_ratio;
///
/// assert_eq!(printable_ratio("abcd"), 1.0);
/// assert_eq!(printable_ratio("ab\u{4e2d}\u{6587}"), 0.5);
/// assert_eq!(printable_ratio(""), 0.0);
/// ```
pub fn printable_ratio(text: &str) -> f64 {
    let (total, printable) = text.chars().fold((0usize, 0usize), |(total, printable), c| {
        (total + 1, printable + usize::from(is_printable_char(c)))
    });

    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}

/// Decode UTF-16LE bytes to a string, replacing malformed sequences with
/// U+FFFD.
///
/// Unlike a NUL-terminated read this keeps going past NUL code units; the
/// caller decides what to strip. A dangling trailing byte is ignored rather
/// than turned into a replacement character.
///
/// # Examples
///
/// ```
/// use tabstate::common::encoding::decode_utf16le_lossy;
///
/// let text = decode_utf16le_lossy(b"o\x00k\x00\x00");
/// assert_eq!(text, "ok");
/// ```
#[inline]
pub fn decode_utf16le_lossy(bytes: &[u8]) -> Cow<'_, str> {
    let even = &bytes[..bytes.len() & !1];
    let (text, _had_errors) = UTF_16LE.decode_without_bom_handling(even);
    text
}
