//! Terminal column width helpers.

use unicode_width::UnicodeWidthChar;

const ELLIPSIS: char = '…';

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Column width of `input`, ignoring CSI escape sequences.
pub fn visible_width(input: &str) -> usize {
    let mut width = 0;
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for final_byte in chars.by_ref() {
                if ('@'..='~').contains(&final_byte) {
                    break;
                }
            }
            continue;
        }
        width += char_width(ch);
    }
    width
}

/// Truncates plain text to at most `max_width` columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if visible_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - char_width(ELLIPSIS);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}
