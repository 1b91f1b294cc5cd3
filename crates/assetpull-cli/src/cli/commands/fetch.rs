//! `assetpull fetch` – download one URL with the same engine a run uses.

use anyhow::{anyhow, bail, Result};
use assetpull_core::config::AssetpullConfig;
use assetpull_core::fetch::{AssetFetcher, CurlFetcher, DownloadStatus, FetchOptions};
use assetpull_core::url_model::remote_url;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::output;
use crate::cli::workspace::absolutize;

pub async fn run_fetch(
    cfg: &AssetpullConfig,
    url: &str,
    dir: Option<&Path>,
    overwrite: bool,
) -> Result<()> {
    if remote_url(url).is_none() {
        bail!("not a remote http(s) URL: {}", url);
    }
    let dest_dir = match dir {
        Some(d) => absolutize(d)?,
        None => std::env::current_dir()?,
    };
    let mut options = FetchOptions::from_config(cfg);
    options.overwrite |= overwrite;
    let fetcher = CurlFetcher::new(options);

    let url_owned = url.to_string();
    let outcome = tokio::task::spawn_blocking(move || {
        let show = |p: assetpull_core::fetch::FetchProgress| {
            print!("\r{} ... {:.1} KiB", url_owned, p.bytes_read as f64 / 1024.0);
            let _ = io::stdout().flush();
        };
        fetcher.fetch(&url_owned, &dest_dir, Some(&show))
    })
    .await
    .map_err(|e| anyhow!("fetch task: {}", e))?;

    println!("\r{} ... {}", outcome.url, output::describe(&outcome));
    if let DownloadStatus::Failed(kind) = outcome.status {
        bail!(
            "{} failure: {}",
            kind,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
