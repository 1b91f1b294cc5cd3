//! `srcset` candidate splitting.

use std::ops::Range;

/// Splits a `srcset` value into candidate URL spans (relative to `value`).
///
/// Follows the HTML candidate grammar closely enough for real pages: a URL is
/// a run of non-whitespace, trailing commas belong to the separator, and the
/// descriptor runs to the next comma outside parentheses.
pub fn candidate_urls(value: &str) -> Vec<Range<usize>> {
    let bytes = value.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b',') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut end = i;
        let had_trailing_comma = end > start && bytes[end - 1] == b',';
        while end > start && bytes[end - 1] == b',' {
            end -= 1;
        }
        if end > start {
            out.push(start..end);
        }
        if had_trailing_comma {
            continue;
        }

        let mut depth = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => break,
                _ => {}
            }
            i += 1;
        }
    }
    out
}
