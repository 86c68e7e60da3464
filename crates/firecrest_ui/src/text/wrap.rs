//! Greedy line breaking by measured width.

use serde::{Deserialize, Serialize};

/// How text longer than its box is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// One line; overflow is clipped.
    NoWrap,
    /// Break at newlines and wherever the next character would overflow.
    #[default]
    Wrap,
}

/// One produced line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    /// The line's characters.
    pub text: String,
    /// Char index in the source text where the line starts.
    pub start: usize,
}

/// Result of [`wrap_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrapped {
    /// Lines, top first.
    pub lines: Vec<WrappedLine>,
    /// Whether any line had to be cut for width.
    pub broke: bool,
}

/// Splits `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break, and empty segments still produce a
/// (blank) line. Within a segment, characters are added one at a time until
/// the measured width exceeds `max_width`; the line then ends before the
/// overflowing character, or after it if it is the first one on the line.
/// One space directly after such a cut is consumed.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    mode: WrapMode,
    measure: impl Fn(&str) -> f32,
) -> Wrapped {
    if mode == WrapMode::NoWrap {
        return Wrapped {
            lines: vec![WrappedLine { text: text.to_owned(), start: 0 }],
            broke: false,
        };
    }

    let mut wrapped = Wrapped::default();
    let mut base = 0;

    for segment in text.split('\n') {
        let chars: Vec<char> = segment.chars().collect();
        if chars.is_empty() {
            wrapped.lines.push(WrappedLine { text: String::new(), start: base });
        }

        let mut begin = 0;
        while begin < chars.len() {
            let mut line = String::new();
            let mut end = begin;
            let mut forced = false;

            while end < chars.len() {
                line.push(chars[end]);
                if measure(&line) > max_width {
                    line.pop();
                    forced = true;
                    break;
                }
                end += 1;
            }
            if end == begin {
                // Even one character overflows; take it anyway.
                line.push(chars[begin]);
                end = begin + 1;
            }

            wrapped.lines.push(WrappedLine { text: line, start: base + begin });
            begin = end;
            if forced {
                wrapped.broke = true;
                if chars.get(begin) == Some(&' ') {
                    begin += 1;
                }
            }
        }

        base += chars.len() + 1;
    }

    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    fn texts(wrapped: &Wrapped) -> Vec<&str> {
        wrapped.lines.iter().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn test_breaks_at_measured_width() {
        let max = mono("AAAA");
        let wrapped = wrap_text("AAAA AAAA", max, WrapMode::Wrap, mono);

        assert_eq!(texts(&wrapped), vec!["AAAA", "AAAA"]);
        assert!(wrapped.broke);
        assert!(wrapped.lines.iter().all(|line| mono(&line.text) <= max));
        // Everything but the consumed space survives.
        let joined: String = wrapped.lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(joined, "AAAAAAAA");
        assert_eq!(wrapped.lines[1].start, 5);
    }

    #[test]
    fn test_fitting_text_does_not_break() {
        let wrapped = wrap_text("short", 100.0, WrapMode::Wrap, mono);
        assert_eq!(texts(&wrapped), vec!["short"]);
        assert!(!wrapped.broke);
    }

    #[test]
    fn test_overflowing_first_character_still_advances() {
        let wrapped = wrap_text("abc", 5.0, WrapMode::Wrap, mono);
        assert_eq!(texts(&wrapped), vec!["a", "b", "c"]);
        assert!(wrapped.broke);
    }

    #[test]
    fn test_newlines_and_blank_lines() {
        let wrapped = wrap_text("ab\n\ncd\n", 100.0, WrapMode::Wrap, mono);
        assert_eq!(texts(&wrapped), vec!["ab", "", "cd", ""]);
        assert_eq!(
            wrapped.lines.iter().map(|line| line.start).collect::<Vec<_>>(),
            vec![0, 3, 4, 7]
        );
        assert!(!wrapped.broke);
    }

    #[test]
    fn test_no_wrap_keeps_one_line() {
        let wrapped = wrap_text("far too long for the box", 10.0, WrapMode::NoWrap, mono);
        assert_eq!(wrapped.lines.len(), 1);
        assert!(!wrapped.broke);
    }

    #[test]
    fn test_empty_text() {
        let wrapped = wrap_text("", 10.0, WrapMode::Wrap, mono);
        assert_eq!(texts(&wrapped), vec![""]);
    }
}
