//! Content line folding (RFC 5545 §3.1).

/// Octets allowed on one physical line, excluding CRLF.
const LINE_LIMIT: usize = 75;

/// Terminates `line` with CRLF, folding it so no physical line exceeds 75
/// octets.
///
/// A fold is CRLF followed by one space, which counts toward the next line's
/// limit. Folds fall between characters, never inside a UTF-8 sequence.
#[must_use]
pub fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / LINE_LIMIT * 3 + 2);
    let mut budget = LINE_LIMIT;

    for ch in line.chars() {
        let width = ch.len_utf8();
        if width > budget {
            folded.push_str("\r\n ");
            budget = LINE_LIMIT - 1;
        }
        folded.push(ch);
        budget -= width;
    }

    folded.push_str("\r\n");
    folded
}
