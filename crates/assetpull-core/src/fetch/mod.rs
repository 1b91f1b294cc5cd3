//! Download engine: fetches one remote URL into one local file.
//!
//! Uses the curl crate (libcurl) for a plain GET per hop. Redirects are
//! followed by re-issuing the request against `Location`, so the body of an
//! intermediate hop never touches disk. Bytes stream into a `.part` file
//! that is renamed into place only when the final response is 2xx.
//!
//! The engine knows nothing about documents. All failures are folded into a
//! `DownloadOutcome`; nothing is returned as `Err` past `fetch`.

mod error;
mod progress;
mod response;
mod transfer;

pub use error::{FailureKind, FetchError};
pub use progress::FetchProgress;
pub use response::{is_redirect_status, parse_headers, ResponseHead};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::AssetpullConfig;
use crate::storage;
use crate::url_model;

use self::transfer::Hop;

/// Per-request settings for the engine.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirects: u32,
    /// Extension (without dot) used when the URL path has none.
    pub default_extension: String,
    /// Replace an existing file with the same nominal name instead of skipping.
    pub overwrite: bool,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&AssetpullConfig::default())
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &AssetpullConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_redirects: cfg.max_redirects,
            default_extension: cfg.default_extension.clone(),
            overwrite: cfg.overwrite,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Terminal state of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    SkippedExisting,
    Failed(FailureKind),
}

/// Result of fetching one unique URL. Read-only once produced.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub url: String,
    pub status: DownloadStatus,
    /// Absolute or dest-dir-relative path of the local file (set unless failed).
    pub local_path: Option<PathBuf>,
    /// Human-readable failure reason (set only when failed).
    pub error: Option<String>,
}

impl DownloadOutcome {
    fn downloaded(url: &str, path: PathBuf) -> Self {
        Self {
            url: url.to_string(),
            status: DownloadStatus::Downloaded,
            local_path: Some(path),
            error: None,
        }
    }

    fn skipped(url: &str, path: PathBuf) -> Self {
        Self {
            url: url.to_string(),
            status: DownloadStatus::SkippedExisting,
            local_path: Some(path),
            error: None,
        }
    }

    pub fn failed(url: &str, err: &FetchError) -> Self {
        Self {
            url: url.to_string(),
            status: DownloadStatus::Failed(err.kind()),
            local_path: None,
            error: Some(err.to_string()),
        }
    }

    /// True for downloaded and skipped-existing outcomes: a local file is usable.
    pub fn is_usable(&self) -> bool {
        !matches!(self.status, DownloadStatus::Failed(_))
    }
}

/// Seam between the orchestrator and the network. `CurlFetcher` is the real
/// implementation; tests substitute counting fakes.
pub trait AssetFetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: Option<&dyn Fn(FetchProgress)>,
    ) -> DownloadOutcome;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    options: FetchOptions,
}

impl CurlFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }
}

impl AssetFetcher for CurlFetcher {
    fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: Option<&dyn Fn(FetchProgress)>,
    ) -> DownloadOutcome {
        fetch(url, dest_dir, &self.options, progress)
    }
}

/// Local path the engine will use for `url` inside `dest_dir`.
pub fn destination_for(url: &str, dest_dir: &Path, opts: &FetchOptions) -> PathBuf {
    dest_dir.join(url_model::derive_filename(url, &opts.default_extension))
}

/// Fetches `url` into `dest_dir`.
///
/// Skips (without any network traffic) when a file with the derived name
/// already exists, unless `opts.overwrite` is set. Never appends numeric
/// suffixes. Progress, when supplied, receives cumulative bytes after every
/// chunk of the final response.
pub fn fetch(
    url: &str,
    dest_dir: &Path,
    opts: &FetchOptions,
    progress: Option<&dyn Fn(FetchProgress)>,
) -> DownloadOutcome {
    let final_path = destination_for(url, dest_dir, opts);
    if final_path.exists() && !opts.overwrite {
        tracing::debug!(url, path = %final_path.display(), "asset already present, skipping");
        return DownloadOutcome::skipped(url, final_path);
    }

    match fetch_to(url, &final_path, opts, progress) {
        Ok(bytes) => {
            tracing::info!(url, path = %final_path.display(), bytes, "asset downloaded");
            DownloadOutcome::downloaded(url, final_path)
        }
        Err(e) => {
            storage::remove_if_exists(&storage::temp_path(&final_path));
            tracing::warn!(url, "asset download failed: {}", e);
            DownloadOutcome::failed(url, &e)
        }
    }
}

fn fetch_to(
    url: &str,
    final_path: &Path,
    opts: &FetchOptions,
    progress: Option<&dyn Fn(FetchProgress)>,
) -> Result<u64, FetchError> {
    let temp_path = storage::temp_path(final_path);
    let mut current =
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
    let mut hops = 0u32;

    loop {
        match transfer::get_once(current.as_str(), &temp_path, opts, progress)? {
            Hop::Redirect { code, location } => {
                hops += 1;
                if hops > opts.max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        limit: opts.max_redirects,
                    });
                }
                let next = current.join(&location).map_err(|e| {
                    FetchError::InvalidUrl(format!("Location {:?}: {}", location, e))
                })?;
                tracing::debug!(from = %current, to = %next, code, "following redirect");
                current = next;
            }
            Hop::Complete(writer) => {
                let bytes = writer.written();
                writer
                    .finalize(final_path)
                    .map_err(|e| FetchError::Storage(format!("{:#}", e)))?;
                return Ok(bytes);
            }
        }
    }
}
