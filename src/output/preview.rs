//! Terminal previews of recovered notes.
//!
//! Recovered text can contain stray symbols from neighbouring binary fields.
//! A preview keeps only lines that contain some Latin text and masks
//! anything a terminal might mangle.

/// Short excerpt of a note for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    /// Cleaned lines to display
    pub lines: Vec<String>,
    /// Characters of the note beyond the preview budget
    pub omitted_chars: usize,
}

impl Preview {
    /// Build a preview of `content`.
    ///
    /// The first `scan_lines` lines are inspected; of those containing an
    /// ASCII letter, up to `max_lines` are kept after masking. Characters
    /// past `char_budget` are reported in `omitted_chars`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabstate::output::Preview;
    ///
    /// let preview = Preview::build("Title\n\n1234\nna\u{ef}ve line", 10, 5, 1000);
    /// assert_eq!(preview.lines, vec!["Title", "na?ve line"]);
    /// assert_eq!(preview.omitted_chars, 0);
    /// ```
    pub fn build(content: &str, scan_lines: usize, max_lines: usize, char_budget: usize) -> Self {
        let lines = content
            .split('\n')
            .take(scan_lines)
            .filter(|line| line.chars().any(|c| c.is_ascii_alphabetic()))
            .map(mask_line)
            .filter(|line| !line.is_empty())
            .take(max_lines)
            .collect();

        Self {
            lines,
            omitted_chars: content.chars().count().saturating_sub(char_budget),
        }
    }

    /// Whether no displayable line was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Replace characters outside printable ASCII with `?` and trim.
fn mask_line(line: &str) -> String {
    line.chars()
        .map(|c| {
            if c.is_ascii_graphic() || c.is_ascii_whitespace() {
                c
            } else {
                '?'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
///
/// # Examples
///
/// ```
/// use tabstate::output::preview::truncate_chars;
///
/// assert_eq!(truncate_chars("short", 10), "short");
/// assert_eq!(truncate_chars("a longer line", 8), "a lon...");
/// ```
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
