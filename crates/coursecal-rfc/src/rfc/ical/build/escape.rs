//! TEXT and parameter value escaping (RFC 5545 §3.3.11, RFC 6868).

const fn text_escape(ch: char) -> Option<&'static str> {
    match ch {
        '\\' => Some("\\\\"),
        ',' => Some("\\,"),
        ';' => Some("\\;"),
        '\n' => Some("\\n"),
        '\r' => Some(""),
        _ => None,
    }
}

/// Escapes a TEXT value. `\r\n` and `\n` both become the `\n` escape; a lone `\r` is
/// dropped.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(replacement) = text_escape(ch) {
            escaped.push_str(replacement);
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

/// Writes a parameter value, double-quoted when it holds a delimiter.
///
/// Inside quotes `^`, newline and `"` are caret-encoded.
#[must_use]
pub fn escape_param_value(value: &str) -> String {
    if !value.contains([':', ';', ',', '"', '\n']) {
        return value.to_string();
    }
    let encoded = value
        .replace('^', "^^")
        .replace('\n', "^n")
        .replace('"', "^'");
    format!("\"{encoded}\"")
}
