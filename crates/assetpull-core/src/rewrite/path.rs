//! Literal URL occurrence matching and the path strategy.

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;

use super::RewriteError;
use crate::document::Document;
use crate::paths::LocalBinding;

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ')' | '>' | '<' | ']' | '`' | ',' | '}')
}

/// Sentence punctuation and emphasis markers that may trail a URL in prose.
fn is_trailing_punct(c: char) -> bool {
    matches!(c, '.' | ';' | ':' | '!' | '?' | '*' | '|')
}

/// True if the URL ending at `end` is not continued by more URL text. A run
/// of trailing punctuation counts as outside the URL only when a delimiter
/// or the end of input follows it (`a.png.` yes, `a.png?size=large` no).
fn ends_cleanly(text: &str, end: usize) -> bool {
    let rest = text[end..].trim_start_matches(is_trailing_punct);
    match rest.chars().next() {
        None => true,
        Some(c) => is_delimiter(c),
    }
}

/// A URL glued to a preceding path or word character is part of something else.
fn starts_cleanly(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | '~' | '%' | '+' | ':')),
    }
}

/// First binding per URL spelling.
pub(crate) fn index_bindings(bindings: &[LocalBinding]) -> HashMap<&str, &LocalBinding> {
    let mut by_url = HashMap::new();
    for binding in bindings.iter().filter(|b| !b.url.is_empty()) {
        by_url.entry(binding.url.as_str()).or_insert(binding);
    }
    by_url
}

/// Every occurrence of a bound URL in `text`, in document order.
///
/// URLs are matched as escaped literals, longest first, so one URL that is a
/// prefix of another never claims the longer one's text.
pub(crate) fn find_occurrences<'b>(
    text: &str,
    bindings: &'b [LocalBinding],
) -> Result<Vec<(Range<usize>, &'b LocalBinding)>, regex::Error> {
    let by_url = index_bindings(bindings);
    if by_url.is_empty() {
        return Ok(Vec::new());
    }
    let mut urls: Vec<&str> = by_url.keys().copied().collect();
    urls.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let pattern = urls
        .iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&pattern)?;

    let mut out = Vec::new();
    for m in re.find_iter(text) {
        if !starts_cleanly(text, m.start()) || !ends_cleanly(text, m.end()) {
            continue;
        }
        if let Some(binding) = by_url.get(m.as_str()) {
            out.push((m.range(), *binding));
        }
    }
    Ok(out)
}

/// Queues a relative-path replacement for every occurrence of a bound URL.
/// Returns the number of occurrences replaced.
pub fn rewrite_paths(document: &mut Document, bindings: &[LocalBinding]) -> Result<usize, RewriteError> {
    let occurrences = find_occurrences(document.original(), bindings)?;
    let count = occurrences.len();
    for (span, binding) in occurrences {
        document.replace(span, binding.document_relative_path.clone())?;
    }
    Ok(count)
}
