//! Terminal presentation of run events and results.

use assetpull_core::batch::{RunEvent, RunReport};
use assetpull_core::fetch::{DownloadOutcome, DownloadStatus};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// One-word-ish status for a finished fetch.
pub fn describe(outcome: &DownloadOutcome) -> String {
    let path = outcome
        .local_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    match outcome.status {
        DownloadStatus::Downloaded => format!("saved {}", path),
        DownloadStatus::SkippedExisting => format!("exists {}", path),
        DownloadStatus::Failed(_) => format!(
            "failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Prints events until the sender side closes.
pub async fn print_events(mut rx: mpsc::Receiver<RunEvent>) {
    let mut current: Option<(usize, usize, String)> = None;
    let mut last_print = Instant::now();
    let mut stdout = io::stdout();
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::Phase(phase) => tracing::debug!(%phase, "phase"),
            RunEvent::FetchStarted { index, total, url } => {
                print!("[{}/{}] {} ...", index, total, url);
                let _ = stdout.flush();
                current = Some((index, total, url));
                last_print = Instant::now();
            }
            RunEvent::FetchProgress { index, progress } => {
                let Some((i, total, url)) = current.as_ref() else {
                    continue;
                };
                if *i != index || last_print.elapsed() < PROGRESS_INTERVAL {
                    continue;
                }
                let amount = match progress.fraction() {
                    Some(f) => format!("{:.0}%", f * 100.0),
                    None => format!("{:.1} KiB", progress.bytes_read as f64 / 1024.0),
                };
                print!("\r[{}/{}] {} ... {}", i, total, url, amount);
                let _ = stdout.flush();
                last_print = Instant::now();
            }
            RunEvent::FetchFinished {
                index,
                total,
                outcome,
            } => {
                println!("\r[{}/{}] {} ... {}", index, total, outcome.url, describe(&outcome));
                current = None;
            }
            RunEvent::DocumentUpdated { document, replaced } => {
                println!("updated {} ({} reference(s))", document, replaced);
            }
        }
    }
}

/// Summary, then one line per failure, then warnings.
pub fn print_report(report: &RunReport) {
    println!("{}", report.summary);
    for f in &report.failures {
        println!("  failed: {} ({})", f.url, f.reason);
    }
    for w in &report.warnings {
        println!("  warning: {}", w);
    }
}
