//! Download failure type and its classification.

use thiserror::Error;

/// Why a single fetch failed. Never escapes the engine: it is folded into a
/// failed `DownloadOutcome`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or resolved (including bad `Location` values).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Curl reported a transport error (timeout, DNS, connection reset...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Terminal response had a non-2xx status.
    #[error("HTTP {code}")]
    Http { code: u32 },
    /// Redirect response without a `Location` header.
    #[error("HTTP {code} redirect without Location header")]
    MissingLocation { code: u32 },
    /// Redirect chain longer than the configured limit.
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },
    /// Directory creation, temp file write or final rename failed.
    #[error("storage: {0}")]
    Storage(String),
}

/// Failure classes surfaced to the caller: network-side or local filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Filesystem,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Storage(_) => FailureKind::Filesystem,
            _ => FailureKind::Network,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Filesystem => write!(f, "filesystem"),
        }
    }
}
