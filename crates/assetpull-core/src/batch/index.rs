//! Cross-document merge of scanned references, keyed by normalized URL.

use std::collections::HashMap;

use crate::scan::{DocumentId, RemoteReference, TagKind};

/// One unique remote URL and everything that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Normalized URL: dedup key and the URL that is fetched.
    pub key: String,
    /// Kind of the first element it was found in.
    pub tag_kind: TagKind,
    /// Referencing documents, in scan order, each once.
    pub documents: Vec<DocumentId>,
    pub occurrences: usize,
}

/// All references found in a run, merged by key in order of first discovery.
#[derive(Debug, Clone, Default)]
pub struct ScanIndex {
    entries: Vec<ScanEntry>,
    by_key: HashMap<String, usize>,
    per_document: Vec<(DocumentId, Vec<RemoteReference>)>,
}

impl ScanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one document's references. Documents should be added once each.
    pub fn add_document(&mut self, document: &DocumentId, references: Vec<RemoteReference>) {
        for r in &references {
            let idx = match self.by_key.get(&r.key) {
                Some(&idx) => idx,
                None => {
                    self.entries.push(ScanEntry {
                        key: r.key.clone(),
                        tag_kind: r.tag_kind,
                        documents: Vec::new(),
                        occurrences: 0,
                    });
                    self.by_key.insert(r.key.clone(), self.entries.len() - 1);
                    self.entries.len() - 1
                }
            };
            let entry = &mut self.entries[idx];
            entry.occurrences += 1;
            if !entry.documents.contains(document) {
                entry.documents.push(document.clone());
            }
        }
        self.per_document.push((document.clone(), references));
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ScanEntry> {
        self.by_key.get(key).map(|&i| &self.entries[i])
    }

    /// Documents in scan order with their references.
    pub fn documents(&self) -> impl Iterator<Item = (&DocumentId, &[RemoteReference])> {
        self.per_document.iter().map(|(d, r)| (d, r.as_slice()))
    }
}
