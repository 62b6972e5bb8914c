//! Output filenames derived from recovered text.
//!
//! Session files are named by GUID, which says nothing about their content.
//! Decoded notes are instead named after their first line, reduced to a
//! filesystem-safe stem.

/// Default maximum length of a derived stem, in characters.
pub const DEFAULT_STEM_MAX_LEN: usize = 30;

/// Build a filesystem-safe stem from the first non-empty line of `content`.
///
/// The line is trimmed and cut to `max_len` characters. Characters other
/// than ASCII letters, digits, space, `_` and `-` are dropped, spaces become
/// underscores, repeated underscores collapse, and leading or trailing
/// underscores are removed. When nothing survives, `default_stem` is
/// returned.
///
/// # Examples
///
/// ```
/// use tabstate::output::make_stem;
///
/// assert_eq!(make_stem("\n  Meeting notes: Q3 plan!\nbody", "fallback", 30), "Meeting_notes_Q3_plan");
/// assert_eq!(make_stem("???", "3f2a9c1e", 30), "3f2a9c1e");
/// ```
pub fn make_stem(content: &str, default_stem: &str, max_len: usize) -> String {
    let Some(line) = content.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return default_stem.to_string();
    };

    let mut stem = String::with_capacity(max_len.min(line.len()));
    for c in line.chars().take(max_len) {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' => stem.push(c),
            ' ' | '_' => {
                // Collapse whitespace and underscores into a single separator
                if !stem.is_empty() && !stem.ends_with('_') {
                    stem.push('_');
                }
            },
            _ => {},
        }
    }

    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        default_stem.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_empty_line() {
        assert_eq!(make_stem("\n\n   \nHello World\nsecond", "d", 30), "Hello_World");
    }

    #[test]
    fn test_truncates_before_cleaning() {
        let line = "abcdefghij abcdefghij abcdefghij abcdefghij";
        assert_eq!(make_stem(line, "d", 30), "abcdefghij_abcdefghij_abcdefgh");
        assert_eq!(make_stem(line, "d", 5), "abcde");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(make_stem("a  -  b", "d", 30), "a_-_b");
        assert_eq!(make_stem("__a___b__", "d", 30), "a_b");
        assert_eq!(make_stem("a ! ! b", "d", 30), "a_b");
    }

    #[test]
    fn test_drops_unsafe_characters() {
        assert_eq!(make_stem("../../etc/passwd", "d", 30), "etcpasswd");
        assert_eq!(make_stem("caf\u{e9} \u{4e2d}\u{6587} notes", "d", 30), "caf_notes");
        assert_eq!(make_stem("tab\tseparated", "d", 30), "tabseparated");
    }

    #[test]
    fn test_falls_back_to_default() {
        assert_eq!(make_stem("", "guid", 30), "guid");
        assert_eq!(make_stem("  \n \n", "guid", 30), "guid");
        assert_eq!(make_stem("!!! ___ ???", "guid", 30), "guid");
    }
}
