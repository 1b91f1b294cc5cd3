//! Leading `---` fence detection (frontmatter / component script block).

use std::ops::Range;

/// Location of a leading fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    /// Text between the opening and closing fence lines (starts right after
    /// the opening line's newline, ends right before the closing `---`).
    pub content: Range<usize>,
    /// Offset just past the closing fence line (including its newline, if any).
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceScan {
    /// Document does not start with a fence line.
    Absent,
    /// Opening fence without a closing one.
    Unterminated,
    Found,
}

fn line_end(text: &str, from: usize) -> (usize, usize) {
    match text[from..].find('\n') {
        Some(rel) => (from + rel, from + rel + 1),
        None => (text.len(), text.len()),
    }
}

fn is_fence_line(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Finds a `---` fenced block at the very start of `text` (an optional UTF-8
/// BOM is allowed before it).
pub fn leading_fence(text: &str) -> (FenceScan, Option<Fence>) {
    let start = if text.starts_with('\u{feff}') { 3 } else { 0 };
    let (open_end, content_start) = line_end(text, start);
    if !is_fence_line(&text[start..open_end]) {
        return (FenceScan::Absent, None);
    }

    let mut pos = content_start;
    while pos < text.len() {
        let (eol, next) = line_end(text, pos);
        if is_fence_line(&text[pos..eol]) {
            let fence = Fence {
                content: content_start..pos,
                end: next,
            };
            return (FenceScan::Found, Some(fence));
        }
        pos = next;
    }
    (FenceScan::Unterminated, None)
}

/// Offset where body markup begins: after a leading fence, or 0.
pub fn body_start(text: &str) -> usize {
    match leading_fence(text) {
        (FenceScan::Found, Some(f)) => f.end,
        _ => 0,
    }
}
