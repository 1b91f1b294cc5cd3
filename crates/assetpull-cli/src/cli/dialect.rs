//! Strategy choice per document file type.

use assetpull_core::batch::DialectSelector;
use assetpull_core::rewrite::RewriteStrategy;
use assetpull_core::scan::DocumentId;

/// Extensions of component files that carry an import prologue.
const COMPONENT_EXTENSIONS: &[&str] = &["astro"];

/// Uses `import` for component files and the path strategy elsewhere.
#[derive(Debug, Clone)]
pub struct ByExtension {
    import: RewriteStrategy,
}

impl ByExtension {
    pub fn new(import: RewriteStrategy) -> Self {
        Self { import }
    }
}

impl DialectSelector for ByExtension {
    fn strategy_for(&self, document: &DocumentId) -> RewriteStrategy {
        let is_component = document
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| COMPONENT_EXTENSIONS.iter().any(|c| c.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        if is_component {
            self.import.clone()
        } else {
            RewriteStrategy::Path
        }
    }
}
