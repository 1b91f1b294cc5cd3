//! Prologue import inserter.
//!
//! Works on the text of a document's leading module block only. Import
//! statements are found with a small tokenizer (module specifier plus brace
//! span), so a URL, string or comment that merely contains a module path can
//! never be mistaken for an import.

mod insert;
mod lexer;
mod statements;

pub use insert::{insert_default_import, merge_named_import, InsertOutcome};
pub use statements::{find_imports, ImportStatement, NamedClause};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// `binding` is already bound to `existing`; binding it to `requested`
    /// would shadow it. Recoverable: the caller keeps the old binding.
    #[error("binding `{binding}` already imported from {existing:?}, not rebinding to {requested:?}")]
    BindingCollision {
        binding: String,
        existing: String,
        requested: String,
    },
}

/// One import a document needs declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportRequest {
    /// `import binding from "module"`.
    Default { binding: String, module: String },
    /// `binding` merged into `import { ... } from "module"`.
    Named { binding: String, module: String },
}

impl ImportRequest {
    pub fn binding(&self) -> &str {
        match self {
            ImportRequest::Default { binding, .. } | ImportRequest::Named { binding, .. } => binding,
        }
    }

    pub fn module(&self) -> &str {
        match self {
            ImportRequest::Default { module, .. } | ImportRequest::Named { module, .. } => module,
        }
    }
}

/// How a queued request ended up after flushing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Binding is declared under this name (possibly a pre-existing alias).
    Declared(String),
    /// Not declared; the name is taken by another module.
    Collision(ImportError),
}

/// Ordered, append-only queue of imports for one document's prologue.
/// Requests are deduplicated on binding + module.
#[derive(Debug, Clone, Default)]
pub struct PrologueEdit {
    requests: Vec<ImportRequest>,
}

/// Outcome of applying a `PrologueEdit` to prologue text.
#[derive(Debug, Clone)]
pub struct PrologueFlush {
    pub text: String,
    pub changed: bool,
    /// One entry per queued request, in queue order.
    pub resolutions: Vec<(ImportRequest, Resolution)>,
}

impl PrologueEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request. Returns false if an identical one is already queued.
    pub fn push(&mut self, request: ImportRequest) -> bool {
        if self.requests.contains(&request) {
            return false;
        }
        self.requests.push(request);
        true
    }

    pub fn requests(&self) -> &[ImportRequest] {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Applies every queued request to `prologue`, in order. Collisions are
    /// recorded, never fatal; the text is left as it was for that request.
    pub fn apply(&self, prologue: &str) -> PrologueFlush {
        let mut text = prologue.to_string();
        let mut changed = false;
        let mut resolutions = Vec::with_capacity(self.requests.len());

        for request in &self.requests {
            let result = match request {
                ImportRequest::Default { binding, module } => {
                    insert_default_import(&text, binding, module)
                }
                ImportRequest::Named { binding, module } => {
                    merge_named_import(&text, module, binding)
                }
            };
            let resolution = match result {
                Ok(InsertOutcome::Inserted(next)) => {
                    text = next;
                    changed = true;
                    Resolution::Declared(request.binding().to_string())
                }
                Ok(InsertOutcome::Unchanged) => Resolution::Declared(request.binding().to_string()),
                Ok(InsertOutcome::AlreadyImported { binding }) => Resolution::Declared(binding),
                Err(e) => {
                    tracing::warn!("{}", e);
                    Resolution::Collision(e)
                }
            };
            resolutions.push((request.clone(), resolution));
        }

        PrologueFlush {
            text,
            changed,
            resolutions,
        }
    }
}
