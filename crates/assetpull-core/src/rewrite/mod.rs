//! Reference rewriter.
//!
//! Given a document and the bindings resolved for it, produces the document's
//! final text with one of two strategies. All replacements are derived from
//! the original text and materialized once, so sibling occurrences (several
//! URLs in one element, or one URL many times) never shift each other.

mod import;
mod path;

pub use path::rewrite_paths;

use thiserror::Error;

use crate::document::{Document, SpliceError};
use crate::paths::LocalBinding;
use crate::prologue::ImportError;
use crate::tree::{MarkupSyntax, TreeError};

/// Image component that plain `<img>` elements are upgraded to, imported by
/// name from an existing assets module (e.g. `Image` from `astro:assets`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentImport {
    pub name: String,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteStrategy {
    /// Replace each URL with the asset's document-relative path.
    Path,
    /// Replace attribute values with `{binding.src}` expressions and import
    /// each asset in the prologue.
    Import { component: Option<ComponentImport> },
}

impl RewriteStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            RewriteStrategy::Path => "path",
            RewriteStrategy::Import { .. } => "import",
        }
    }
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("build URL pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Splice(#[from] SpliceError),
}

/// Result of rewriting one document.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub text: String,
    /// URL occurrences replaced.
    pub replaced: usize,
    pub prologue_changed: bool,
    /// Recoverable: the colliding URL was rewritten to its relative path.
    pub warnings: Vec<ImportError>,
}

/// Rewrites `document` with `bindings` (one per URL spelling found in it).
pub fn rewrite_document(
    mut document: Document,
    bindings: &[LocalBinding],
    strategy: &RewriteStrategy,
    syntax: &dyn MarkupSyntax,
) -> Result<Rewrite, RewriteError> {
    let rewrite = match strategy {
        RewriteStrategy::Path => {
            let replaced = rewrite_paths(&mut document, bindings)?;
            Rewrite {
                text: document.apply(),
                replaced,
                prologue_changed: false,
                warnings: Vec::new(),
            }
        }
        RewriteStrategy::Import { component } => {
            import::rewrite_imports(document.original(), bindings, component.as_ref(), syntax)?
        }
    };
    tracing::debug!(
        document = %document.id(),
        strategy = strategy.name(),
        replaced = rewrite.replaced,
        warnings = rewrite.warnings.len(),
        "rewrote document"
    );
    Ok(rewrite)
}
