//! Collaborators a run is driven through: document storage, user prompts
//! and dialect selection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::index::ScanEntry;
use crate::rewrite::RewriteStrategy;
use crate::scan::DocumentId;

/// Whole-document read/replace. The core never splices a live buffer; it
/// computes one final string per document and replaces the whole content.
pub trait Workspace: Send + Sync {
    fn read_document_text(&self, document: &DocumentId) -> Result<String>;
    fn apply_edit(&self, document: &DocumentId, text: &str) -> Result<()>;
}

/// User interaction. `None` means the user cancelled.
pub trait Picker: Send + Sync {
    /// Indices into `items` to act on.
    fn multi_select(&self, items: &[ScanEntry]) -> Option<Vec<usize>>;
    fn select_directory(&self, default: &Path) -> Option<PathBuf>;
}

/// Picks the rewrite strategy for each document.
pub trait DialectSelector: Send + Sync {
    fn strategy_for(&self, document: &DocumentId) -> RewriteStrategy;
}

/// A fixed strategy applies to every document.
impl DialectSelector for RewriteStrategy {
    fn strategy_for(&self, _document: &DocumentId) -> RewriteStrategy {
        self.clone()
    }
}

/// Selects everything and accepts the default directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Picker for AcceptAll {
    fn multi_select(&self, items: &[ScanEntry]) -> Option<Vec<usize>> {
        Some((0..items.len()).collect())
    }

    fn select_directory(&self, default: &Path) -> Option<PathBuf> {
        Some(default.to_path_buf())
    }
}

/// In-memory documents, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    documents: Mutex<BTreeMap<DocumentId, String>>,
    writes: Mutex<usize>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, document: DocumentId, text: impl Into<String>) {
        if let Ok(mut docs) = self.documents.lock() {
            docs.insert(document, text.into());
        }
    }

    pub fn text(&self, document: &DocumentId) -> Option<String> {
        self.documents.lock().ok()?.get(document).cloned()
    }

    /// Number of `apply_edit` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

impl Workspace for MemoryWorkspace {
    fn read_document_text(&self, document: &DocumentId) -> Result<String> {
        self.documents
            .lock()
            .map_err(|_| anyhow!("workspace lock poisoned"))?
            .get(document)
            .cloned()
            .ok_or_else(|| anyhow!("no such document: {}", document))
    }

    fn apply_edit(&self, document: &DocumentId, text: &str) -> Result<()> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|_| anyhow!("workspace lock poisoned"))?;
        let slot = docs
            .get_mut(document)
            .ok_or_else(|| anyhow!("no such document: {}", document))?;
        *slot = text.to_string();
        if let Ok(mut w) = self.writes.lock() {
            *w += 1;
        }
        Ok(())
    }
}
