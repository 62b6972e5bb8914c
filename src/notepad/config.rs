//! Configuration for TabState decoding.
//!
//! The scanner's thresholds were tuned by hand against real session files
//! rather than derived from a documented format, so they are exposed here as
//! options instead of constants.
//!
//! # Examples
//!
//! ```rust
//! use tabstate::notepad::DecodeOptions;
//!
//! // Create with defaults
//! let options = DecodeOptions::default();
//! assert_eq!(options.min_run_chars, 4);
//!
//! // Or customize
//! let options = DecodeOptions::new()
//!     .with_min_run_chars(8)
//!     .with_exhaustive(true)
//!     .with_ascii_fallback(false);
//! ```
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Default minimum number of characters in an accepted text run.
pub const DEFAULT_MIN_RUN_CHARS: usize = 4;

/// Default printable-character ratio a whole-buffer decode must exceed.
pub const DEFAULT_MIN_PRINTABLE_RATIO: f64 = 0.8;

/// Default byte offsets tried by the whole-buffer fallback.
pub const DEFAULT_FALLBACK_OFFSETS: [usize; 2] = [0, 1];

/// Default separator placed between runs when joining them.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Options controlling how text is recovered from a session buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Runs shorter than this many characters are treated as noise
    pub min_run_chars: usize,
    /// Ratio of printable characters a fallback decode must exceed
    pub min_printable_ratio: f64,
    /// Byte offsets at which the whole buffer is re-decoded when scanning fails
    pub fallback_offsets: Vec<usize>,
    /// Always run the whole-buffer fallback, even when runs were found
    pub exhaustive: bool,
    /// Extract single-byte ASCII strings when nothing else matched
    pub ascii_fallback: bool,
    /// Separator between runs in the joined document
    pub separator: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            min_run_chars: DEFAULT_MIN_RUN_CHARS,
            min_printable_ratio: DEFAULT_MIN_PRINTABLE_RATIO,
            fallback_offsets: DEFAULT_FALLBACK_OFFSETS.to_vec(),
            exhaustive: false,
            ascii_fallback: true,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl DecodeOptions {
    /// Create a new `DecodeOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum run length in characters.
    ///
    /// Values below one are raised to one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tabstate::notepad::DecodeOptions;
    ///
    /// let options = DecodeOptions::new().with_min_run_chars(0);
    /// assert_eq!(options.min_run_chars, 1);
    /// ```
    #[inline]
    pub fn with_min_run_chars(mut self, chars: usize) -> Self {
        self.min_run_chars = chars.max(1);
        self
    }

    /// Set the printable ratio threshold for the whole-buffer fallback.
    ///
    /// The value is clamped to `0.0..=1.0`; NaN resets it to the default.
    #[inline]
    pub fn with_min_printable_ratio(mut self, ratio: f64) -> Self {
        self.min_printable_ratio = clamp_ratio(ratio);
        self
    }

    /// Set the byte offsets tried by the whole-buffer fallback, in order.
    #[inline]
    pub fn with_fallback_offsets(mut self, offsets: impl Into<Vec<usize>>) -> Self {
        self.fallback_offsets = offsets.into();
        self
    }

    /// Set whether the whole-buffer fallback always runs.
    #[inline]
    pub fn with_exhaustive(mut self, exhaustive: bool) -> Self {
        self.exhaustive = exhaustive;
        self
    }

    /// Set whether single-byte ASCII strings are extracted as a last resort.
    #[inline]
    pub fn with_ascii_fallback(mut self, enabled: bool) -> Self {
        self.ascii_fallback = enabled;
        self
    }

    /// Set the separator used when joining runs.
    #[inline]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Parse options from a YAML document.
    ///
    /// Missing keys keep their default values; out-of-range values are
    /// normalized the same way the builder methods normalize them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tabstate::notepad::DecodeOptions;
    ///
    /// let options = DecodeOptions::from_yaml_str("min_run_chars: 6\nexhaustive: true\n").unwrap();
    /// assert_eq!(options.min_run_chars, 6);
    /// assert!(options.exhaustive);
    /// assert!(options.ascii_fallback);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse decode options: {}", e)))?;
        Ok(options.normalized())
    }

    /// Serialize the options as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize decode options: {}", e)))
    }

    fn normalized(self) -> Self {
        let (chars, ratio) = (self.min_run_chars, self.min_printable_ratio);
        self.with_min_run_chars(chars).with_min_printable_ratio(ratio)
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        DEFAULT_MIN_PRINTABLE_RATIO
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.min_run_chars, 4);
        assert_eq!(options.min_printable_ratio, 0.8);
        assert_eq!(options.fallback_offsets, vec![0, 1]);
        assert!(!options.exhaustive);
        assert!(options.ascii_fallback);
        assert_eq!(options.separator, "\n\n");
    }

    #[test]
    fn test_builder_clamps() {
        let options = DecodeOptions::new()
            .with_min_run_chars(0)
            .with_min_printable_ratio(1.5);
        assert_eq!(options.min_run_chars, 1);
        assert_eq!(options.min_printable_ratio, 1.0);

        let options = DecodeOptions::new().with_min_printable_ratio(f64::NAN);
        assert_eq!(options.min_printable_ratio, DEFAULT_MIN_PRINTABLE_RATIO);
    }

    #[test]
    fn test_yaml_partial_override() {
        let options = DecodeOptions::from_yaml_str("fallback_offsets: [0, 2, 4]\nseparator: \"\\n\"\n")
            .unwrap();
        assert_eq!(options.fallback_offsets, vec![0, 2, 4]);
        assert_eq!(options.separator, "\n");
        assert_eq!(options.min_run_chars, DEFAULT_MIN_RUN_CHARS);
    }

    #[test]
    fn test_yaml_normalizes() {
        let options = DecodeOptions::from_yaml_str("min_run_chars: 0\nmin_printable_ratio: -2.0\n").unwrap();
        assert_eq!(options.min_run_chars, 1);
        assert_eq!(options.min_printable_ratio, 0.0);
    }

    #[test]
    fn test_yaml_rejects_bad_types() {
        let err = DecodeOptions::from_yaml_str("min_run_chars: lots\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_to_yaml_string() {
        let options = DecodeOptions::new().with_min_run_chars(7).with_exhaustive(true);
        let yaml = options.to_yaml_string().unwrap();
        assert!(yaml.contains("min_run_chars: 7"));
        assert!(yaml.contains("exhaustive: true"));
    }
}
