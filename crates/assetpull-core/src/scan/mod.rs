//! Reference scanner: finds remote asset URLs in one document's text.
//!
//! Scans start tags (via the classifier) and Markdown inline images in the
//! document body. Every candidate is validated as an absolute `http`/`https`
//! URL; anything else (relative paths, `data:` URIs, malformed values) is
//! dropped without error. Results are in document order and deterministic.

mod classify;
mod markdown;
mod srcset;

pub use classify::{AttrShape, DefaultClassifier, TagClassifier, TagKind};
pub(crate) use classify::kind_by_name;
pub use markdown::image_destinations;
pub use srcset::candidate_urls;

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::markup;
use crate::url_model::{normalize_url, remote_url};

/// Identifies a document. Documents live on a filesystem because references
/// to saved assets are computed relative to the document's directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory containing the document (empty path for bare file names).
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One occurrence of a remote URL in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReference {
    /// URL exactly as written in the document.
    pub url: String,
    /// Dedup key: normalized URL without fragment. Also the URL that is fetched.
    pub key: String,
    /// Byte span of `url` in the document text.
    pub span: Range<usize>,
    pub tag_kind: TagKind,
    pub document_id: DocumentId,
}

/// Decodes the handful of character references that legitimately appear in
/// URL attributes (`&amp;` in query strings above all).
fn decode_attr_entities(raw: &str) -> std::borrow::Cow<'_, str> {
    if !raw.contains('&') {
        return std::borrow::Cow::Borrowed(raw);
    }
    std::borrow::Cow::Owned(
        raw.replace("&amp;", "&")
            .replace("&#38;", "&")
            .replace("&quot;", "\"")
            .replace("&#39;", "'"),
    )
}

fn push_candidate(
    out: &mut Vec<RemoteReference>,
    text: &str,
    span: Range<usize>,
    kind: TagKind,
    document_id: &DocumentId,
) {
    let raw = &text[span.clone()];
    let trimmed_start = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let span = span.start + trimmed_start..span.start + trimmed_start + trimmed.len();
    let parsed = match remote_url(&decode_attr_entities(trimmed)) {
        Some(u) => u,
        None => return,
    };
    out.push(RemoteReference {
        url: trimmed.to_string(),
        key: normalize_url(&parsed),
        span,
        tag_kind: classify::refine_kind(kind, &parsed),
        document_id: document_id.clone(),
    });
}

/// Scans `text` with a custom classifier.
pub fn scan_with(
    document_id: &DocumentId,
    text: &str,
    classifier: &dyn TagClassifier,
) -> Vec<RemoteReference> {
    let start = markup::body_start(text);
    let mut out = Vec::new();

    for element in markup::elements(text, start) {
        let kind = match classifier.element_kind(&element) {
            Some(k) => k,
            None => continue,
        };
        for attr in &element.attributes {
            if attr.expression {
                continue;
            }
            let (shape, value) = match (classifier.url_attribute(element.name, attr.name), &attr.value) {
                (Some(shape), Some(value)) => (shape, value.clone()),
                _ => continue,
            };
            match shape {
                AttrShape::Single => push_candidate(&mut out, text, value, kind, document_id),
                AttrShape::SrcSet => {
                    for candidate in candidate_urls(&text[value.clone()]) {
                        let span = value.start + candidate.start..value.start + candidate.end;
                        push_candidate(&mut out, text, span, kind, document_id);
                    }
                }
            }
        }
    }

    for dest in image_destinations(text, start) {
        push_candidate(&mut out, text, dest, TagKind::PlainImage, document_id);
    }

    out.sort_by_key(|r| r.span.start);
    out.dedup_by(|a, b| a.span == b.span);
    tracing::debug!(document = %document_id, found = out.len(), "scanned document");
    out
}

/// Scans `text` with the default classifier.
pub fn scan_document(document_id: &DocumentId, text: &str) -> Vec<RemoteReference> {
    scan_with(document_id, text, &DefaultClassifier)
}
