//! URL modeling and filename derivation.
//!
//! Validates remote references, computes dedup keys, and derives safe local
//! filenames from URL paths.

mod path;
mod remote;
mod sanitize;

pub use path::{filename_from_url_path, has_extension};
pub use remote::{normalize_url, remote_url};
pub use sanitize::sanitize_filename;

/// Stem used when the URL path yields nothing usable.
const DEFAULT_STEM: &str = "image";

/// Derives a safe filename for saving a remote asset.
///
/// Uses the last path segment of `url`, sanitized. When the segment has no
/// extension, `default_extension` is appended. Query and fragment never
/// contribute to the name.
///
/// # Examples
///
/// - `derive_filename("https://example.com/hero.jpg", "png")` → `"hero.jpg"`
/// - `derive_filename("https://example.com/avatar", "png")` → `"avatar.png"`
pub fn derive_filename(url: &str, default_extension: &str) -> String {
    let ext = default_extension.trim_start_matches('.');
    let sanitized = filename_from_url_path(url)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| !s.is_empty() && s != "." && s != "..");

    let name = match sanitized {
        Some(name) => name,
        None => return format!("{}.{}", DEFAULT_STEM, ext),
    };

    if has_extension(&name) || ext.is_empty() {
        name
    } else {
        format!("{}.{}", name, ext)
    }
}
