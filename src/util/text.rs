use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Article titles and category names from the backend are frequently CJK,
/// where every character occupies two columns; byte or char counts would
/// misalign every list row.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate `s` to at most `max_width` terminal columns, appending "..."
/// when anything was cut.
///
/// Returns `Cow::Borrowed` when the string already fits (the common case on
/// wide terminals). For widths of 3 columns or less there is no room for a
/// character plus the ellipsis, so the result is simply as many characters
/// as fit, without the marker.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    // Truncation needed from here on.
    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut out = String::new();
    let mut used = 0usize;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }

    if max_width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Everything rendered into the terminal ultimately comes from the backend;
/// a compromised or misbehaving backend must not be able to move the cursor
/// or restyle the screen through a category name. Removes:
///
/// - ASCII control characters other than tab, newline, carriage return
/// - CSI sequences (`ESC [` ... final byte in `0x40..=0x7e`)
/// - OSC sequences (`ESC ]` ... `BEL` or `ESC \`)
/// - any other bare ESC
///
/// Returns `Cow::Borrowed` when nothing needs stripping, which is nearly
/// always, so repeated calls on clean text cost one byte scan.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let clean = !s.bytes().any(|b| {
        b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
    });
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    // CSI: consume through the final byte
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    // OSC: consume through BEL or ESC \
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\u{07}' {
                            break;
                        }
                        if c == '\u{1b}' {
                            if chars.peek() == Some(&'\\') {
                                chars.next();
                            }
                            break;
                        }
                    }
                }
                _ => {} // bare ESC: drop it
            }
            continue;
        }

        let keep = c == '\t' || c == '\n' || c == '\r' || (c >= '\u{20}' && c != '\u{7f}');
        if keep {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ascii_and_cjk() {
        assert_eq!(display_width("Hello"), 5);
        assert_eq!(display_width("分类导航"), 8);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_noop_when_it_fits() {
        let s = "Short title";
        assert!(matches!(truncate_to_width(s, 20), Cow::Borrowed(_)));
        assert_eq!(truncate_to_width(s, 20), s);
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn truncate_cjk_never_splits_a_wide_char() {
        // 7 columns: two 2-column chars (4) + "..." (3)
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        // 6 columns: budget 3 fits only one 2-column char
        assert_eq!(truncate_to_width("你好世界", 6), "你...");
    }

    #[test]
    fn truncate_narrow_widths_drop_the_ellipsis() {
        assert_eq!(truncate_to_width("Test!", 0), "");
        assert_eq!(truncate_to_width("Test!", 1), "T");
        assert_eq!(truncate_to_width("Test!", 3), "Tes");
    }

    #[test]
    fn strip_passes_clean_text_through_borrowed() {
        let s = "Rust 学习笔记 #42\twith tab";
        assert!(matches!(strip_control_chars(s), Cow::Borrowed(_)));
    }

    #[test]
    fn strip_removes_csi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mEvil\x1b[0m"), "Evil");
    }

    #[test]
    fn strip_removes_osc_sequences() {
        assert_eq!(strip_control_chars("\x1b]0;title\x07name"), "name");
        assert_eq!(strip_control_chars("\x1b]8;;x\x1b\\link"), "link");
    }

    #[test]
    fn strip_removes_bare_controls_keeps_whitespace() {
        assert_eq!(strip_control_chars("a\x00b\x7fc\nd"), "abc\nd");
    }

    #[test]
    fn strip_handles_trailing_escape() {
        assert_eq!(strip_control_chars("name\x1b"), "name");
        assert_eq!(strip_control_chars("name\x1b["), "name");
    }
}
