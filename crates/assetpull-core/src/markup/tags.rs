//! Forgiving start-tag tokenizer for HTML-like markup (HTML, JSX-flavoured
//! component templates, raw HTML inside Markdown).
//!
//! Only start tags and their attributes are reported. Comments and the
//! contents of `<script>`/`<style>` are skipped. All delimiters are ASCII,
//! so every offset produced lands on a char boundary.

use std::ops::Range;

/// One attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Whole attribute, from name through closing quote/brace.
    pub span: Range<usize>,
    /// Raw value (inside quotes or braces), if the attribute has one.
    pub value: Option<Range<usize>>,
    /// Value is a `{...}` expression rather than a string.
    pub expression: bool,
}

/// One start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
    pub attributes: Vec<Attribute<'a>>,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'.' | b'_')
}

/// Skips a balanced `{...}` starting at `open` (which must be `{`). String
/// literals inside are honoured. Returns the offset just past the closing
/// brace, or the end of input.
pub(crate) fn skip_braces(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            q @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn find_from(text: &str, from: usize, needle: &str) -> Option<usize> {
    text.get(from..)?.find(needle).map(|rel| from + rel)
}

/// Parses attributes starting at `i` until the end of the start tag.
/// Returns the attributes and the offset just past `>` (or end of input).
fn parse_attributes(text: &str, mut i: usize) -> (Vec<Attribute<'_>>, usize) {
    let bytes = text.as_bytes();
    let mut attrs = Vec::new();
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'>' {
            return (attrs, i + 1);
        }
        if b == b'/' && bytes.get(i + 1) == Some(&b'>') {
            return (attrs, i + 2);
        }
        if b == b'{' {
            i = skip_braces(bytes, i);
            continue;
        }
        if matches!(b, b'/' | b'=' | b'"' | b'\'' | b'<') {
            if b == b'<' {
                // Unclosed tag; let the caller resume at this `<`.
                return (attrs, i);
            }
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/' | b'<' | b'"' | b'\'')
        {
            i += 1;
        }
        let name = &text[name_start..i];

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) != Some(&b'=') {
            attrs.push(Attribute {
                name,
                span: name_start..i,
                value: None,
                expression: false,
            });
            continue;
        }
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }

        let (value, expression, end) = match bytes.get(j) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let close = text[j + 1..]
                    .find(q as char)
                    .map(|rel| j + 1 + rel)
                    .unwrap_or(bytes.len());
                (j + 1..close, false, (close + 1).min(bytes.len()))
            }
            Some(&b'{') => {
                let end = skip_braces(bytes, j);
                let inner_end = if end > j + 1 && bytes[end - 1] == b'}' { end - 1 } else { end };
                (j + 1..inner_end, true, end)
            }
            Some(_) => {
                let mut k = j;
                while k < bytes.len() && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    k += 1;
                }
                (j..k, false, k)
            }
            None => (j..j, false, j),
        };
        attrs.push(Attribute {
            name,
            span: name_start..end,
            value: Some(value),
            expression,
        });
        i = end;
    }
    (attrs, bytes.len())
}

/// Tokenizes start tags in `text[from..]`, in document order.
pub fn elements(text: &str, from: usize) -> Vec<Element<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = from;

    while let Some(lt) = find_from(text, i, "<") {
        if text[lt..].starts_with("<!--") {
            i = find_from(text, lt + 4, "-->").map(|e| e + 3).unwrap_or(text.len());
            continue;
        }
        let name_start = lt + 1;
        if !bytes.get(name_start).map(u8::is_ascii_alphabetic).unwrap_or(false) {
            i = lt + 1;
            continue;
        }
        let mut name_end = name_start;
        while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        let name = &text[name_start..name_end];
        let (attributes, end) = parse_attributes(text, name_end);
        out.push(Element {
            name,
            span: lt..end,
            attributes,
        });
        i = end.max(lt + 1);

        if name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style") {
            let closing = format!("</{}", name.to_ascii_lowercase());
            let lower_rest = text[i..].to_ascii_lowercase();
            i = lower_rest.find(&closing).map(|rel| i + rel).unwrap_or(text.len());
        }
    }
    out
}
