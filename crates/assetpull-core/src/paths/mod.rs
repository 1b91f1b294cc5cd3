//! Filename/path resolver: from a saved asset to what a document needs to
//! reference it (relative path and import binding).

mod binding;
mod relative;

pub use binding::{binding_name, is_valid_binding, FALLBACK_BINDING};
pub use relative::local_relative_path;

use std::path::Path;

/// How one document refers to one downloaded asset. One per (URL, document)
/// pair: the download is shared, the relative path is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBinding {
    pub url: String,
    pub binding_name: String,
    pub document_relative_path: String,
}

impl LocalBinding {
    /// Derives the binding for `url`, saved at `asset_path`, as seen from a
    /// document living in `document_dir`.
    pub fn resolve(url: &str, asset_path: &Path, document_dir: &Path) -> Self {
        Self {
            url: url.to_string(),
            binding_name: binding_name(asset_path),
            document_relative_path: local_relative_path(asset_path, document_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_per_document() {
        let asset = Path::new("/p/src/assets/remote/Hero-Image.jpg");
        let a = LocalBinding::resolve("https://x.test/Hero-Image.jpg", asset, Path::new("/p/src/pages"));
        let b = LocalBinding::resolve("https://x.test/Hero-Image.jpg", asset, Path::new("/p/src/pages/blog"));
        assert_eq!(a.binding_name, "heroImage");
        assert_eq!(a.binding_name, b.binding_name);
        assert_eq!(a.document_relative_path, "../assets/remote/Hero-Image.jpg");
        assert_eq!(b.document_relative_path, "../../assets/remote/Hero-Image.jpg");
    }
}
