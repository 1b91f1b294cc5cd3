//! Remote reference validation and dedup keys.

use url::Url;

/// Parses `raw` as an absolute `http`/`https` URL with a host.
///
/// Relative paths, `data:` URIs, protocol-relative references and anything
/// malformed yield `None`; callers skip those silently.
pub fn remote_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).ok()?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    if parsed.host_str().map(str::is_empty).unwrap_or(true) {
        return None;
    }
    Some(parsed)
}

/// Dedup key for a remote URL: scheme, host, port, path and query, no fragment.
///
/// The `url` crate already lowercases scheme and host and drops default ports.
pub fn normalize_url(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.to_string()
}
