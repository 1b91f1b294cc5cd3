//! Filename extraction from URL path.

use percent_encoding::percent_decode_str;

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// The segment is percent-decoded (lossy for invalid UTF-8). Returns `None`
/// if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}

/// True if `name` carries an extension (a dot that is neither first nor last).
pub fn has_extension(name: &str) -> bool {
    match name.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < name.len(),
        None => false,
    }
}
