//! Key parsing for legacy (xterm-style) terminal input.

const CODEPOINT_ESCAPE: char = '\x1b';
const CODEPOINT_BACKSPACE: char = '\x7f';

fn legacy_sequence_key_id(data: &str) -> Option<&'static str> {
    match data {
        "\x1b[A" | "\x1bOA" => Some("up"),
        "\x1b[B" | "\x1bOB" => Some("down"),
        "\x1b[C" | "\x1bOC" => Some("right"),
        "\x1b[D" | "\x1bOD" => Some("left"),
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => Some("home"),
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => Some("end"),
        _ => None,
    }
}

/// Normalizes a raw input chunk into a key id such as `left`, `ctrl+a` or `alt+x`.
///
/// Returns `None` for printable text and unknown sequences.
pub fn parse_key(data: &str) -> Option<String> {
    if let Some(key_id) = legacy_sequence_key_id(data) {
        return Some(key_id.to_string());
    }

    let mut chars = data.chars();
    let first = chars.next()?;
    let second = chars.next();

    match (first, second) {
        ('\r', None) | ('\n', None) => Some("enter".to_string()),
        ('\t', None) => Some("tab".to_string()),
        (CODEPOINT_ESCAPE, None) => Some("escape".to_string()),
        (CODEPOINT_BACKSPACE, None) | ('\x08', None) => Some("backspace".to_string()),
        ('\0', None) => Some("ctrl+space".to_string()),
        (ch, None) if ('\x01'..='\x1a').contains(&ch) => {
            let letter = (b'a' + (ch as u8 - 1)) as char;
            Some(format!("ctrl+{letter}"))
        }
        (CODEPOINT_ESCAPE, Some(CODEPOINT_BACKSPACE)) if chars.next().is_none() => {
            Some("alt+backspace".to_string())
        }
        (CODEPOINT_ESCAPE, Some(ch)) if chars.next().is_none() && !ch.is_control() => {
            Some(format!("alt+{}", ch.to_ascii_lowercase()))
        }
        _ => None,
    }
}

/// Returns decoded text when the chunk is printable input rather than a key.
pub fn parse_text(data: &str) -> Option<String> {
    if data.is_empty() || data.chars().any(char::is_control) {
        return None;
    }
    Some(data.to_string())
}

/// Whether `data` is the key identified by `key_id`.
pub fn matches_key(data: &str, key_id: &str) -> bool {
    if data == key_id {
        return true;
    }
    if data == " " {
        return key_id == "space";
    }
    parse_key(data).is_some_and(|parsed| parsed == key_id)
}
