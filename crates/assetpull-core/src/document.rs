//! Immutable document text plus the splices to apply to it in one pass.

use std::ops::Range;

use thiserror::Error;

use crate::scan::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("replacement {new:?} overlaps {existing:?}")]
    Overlap {
        existing: Range<usize>,
        new: Range<usize>,
    },
    #[error("replacement {span:?} is outside the document (len {len}) or splits a character")]
    OutOfBounds { span: Range<usize>, len: usize },
}

/// Ordered set of non-overlapping replacements against one source text.
#[derive(Debug, Clone, Default)]
pub struct Splices {
    entries: Vec<(Range<usize>, String)>,
}

impl Splices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `text` to replace `span` of `source`.
    pub fn replace(
        &mut self,
        source: &str,
        span: Range<usize>,
        text: impl Into<String>,
    ) -> Result<(), SpliceError> {
        if span.start > span.end
            || span.end > source.len()
            || !source.is_char_boundary(span.start)
            || !source.is_char_boundary(span.end)
        {
            return Err(SpliceError::OutOfBounds {
                span,
                len: source.len(),
            });
        }
        if let Some((existing, _)) = self
            .entries
            .iter()
            .find(|(existing, _)| spans_overlap(existing, &span))
        {
            return Err(SpliceError::Overlap {
                existing: existing.clone(),
                new: span,
            });
        }
        // Insertions sort before a replacement starting at the same offset.
        let key = (span.start, !span.is_empty());
        let at = self
            .entries
            .partition_point(|(existing, _)| (existing.start, !existing.is_empty()) <= key);
        self.entries.insert(at, (span, text.into()));
        Ok(())
    }

    /// Materializes `source` with every replacement applied.
    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for (span, text) in &self.entries {
            out.push_str(&source[cursor..span.start]);
            out.push_str(text);
            cursor = span.end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

/// A document's original text and the replacements to apply to it. Spans
/// always refer to the original text; the rewritten text is only
/// materialized by `apply`.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    original: String,
    splices: Splices,
}

impl Document {
    pub fn new(id: DocumentId, original: impl Into<String>) -> Self {
        Self {
            id,
            original: original.into(),
            splices: Splices::new(),
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn replace(&mut self, span: Range<usize>, text: impl Into<String>) -> Result<(), SpliceError> {
        self.splices.replace(&self.original, span, text)
    }

    pub fn apply(&self) -> String {
        self.splices.apply(&self.original)
    }
}

fn spans_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    if a.is_empty() && b.is_empty() {
        return a.start == b.start;
    }
    if a.is_empty() {
        return b.start < a.start && a.start < b.end;
    }
    if b.is_empty() {
        return a.start < b.start && b.start < a.end;
    }
    a.start < b.end && b.start < a.end
}
