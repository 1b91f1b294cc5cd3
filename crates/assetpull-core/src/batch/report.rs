//! What a run reports: phases, progress events, summary counts, failures
//! and warnings.

use std::fmt;

use crate::fetch::{DownloadOutcome, DownloadStatus, FailureKind, FetchProgress};
use crate::scan::DocumentId;

/// Phase of one orchestrator run. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    Scanning,
    AwaitingSelection,
    Downloading,
    Rewriting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Scanning => "scanning",
            RunPhase::AwaitingSelection => "awaiting selection",
            RunPhase::Downloading => "downloading",
            RunPhase::Rewriting => "rewriting",
            RunPhase::Done => "done",
        };
        f.write_str(s)
    }
}

/// Events streamed to the presentation layer while a run executes.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Phase(RunPhase),
    /// Fetch of item `index` (1-based) of `total` started.
    FetchStarted { index: usize, total: usize, url: String },
    /// Cumulative bytes for the current fetch. May be dropped under load.
    FetchProgress { index: usize, progress: FetchProgress },
    FetchFinished {
        index: usize,
        total: usize,
        outcome: DownloadOutcome,
    },
    DocumentUpdated { document: DocumentId, replaced: usize },
}

/// Aggregate counts for presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub documents_updated: usize,
}

impl RunSummary {
    pub(crate) fn record(&mut self, status: DownloadStatus) {
        match status {
            DownloadStatus::Downloaded => self.succeeded += 1,
            DownloadStatus::SkippedExisting => self.skipped_existing += 1,
            DownloadStatus::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded: {}, skipped existing: {}, failed: {}, documents updated: {}",
            self.succeeded, self.skipped_existing, self.failed, self.documents_updated
        )
    }
}

/// One failed URL, for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Recoverable conditions surfaced to the user. None of them stops a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// The derived binding name was already imported from another module;
    /// the URL was rewritten to its relative path instead.
    BindingCollision {
        document: DocumentId,
        binding: String,
        existing: String,
        requested: String,
    },
    UnreadableDocument { document: DocumentId, reason: String },
    /// The document was left untouched.
    RewriteFailed { document: DocumentId, reason: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::BindingCollision {
                document,
                binding,
                existing,
                requested,
            } => write!(
                f,
                "{}: `{}` is already imported from {:?}; {:?} was referenced by path instead",
                document, binding, existing, requested
            ),
            RunWarning::UnreadableDocument { document, reason } => {
                write!(f, "{}: could not read document: {}", document, reason)
            }
            RunWarning::RewriteFailed { document, reason } => {
                write!(f, "{}: not rewritten: {}", document, reason)
            }
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    pub failures: Vec<FailureRecord>,
    pub warnings: Vec<RunWarning>,
    /// One per fetched URL, in fetch order.
    pub outcomes: Vec<DownloadOutcome>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunReport),
    /// The user cancelled at a prompt. Nothing was downloaded or rewritten.
    Cancelled { phase: RunPhase },
}

impl RunOutcome {
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Completed(r) => Some(r),
            RunOutcome::Cancelled { .. } => None,
        }
    }
}
