//! Batch orchestrator: scan every document, let the user choose, download
//! each chosen URL once, then rewrite the documents that reference it.
//!
//! A run is strictly sequential. Downloads happen one at a time in
//! `spawn_blocking` (libcurl is blocking) and each outcome is fanned out
//! read-only to the documents that need it. Per-URL failures are recorded and
//! the run carries on; only a cancelled prompt ends a run early.

mod collab;
mod index;
mod report;

pub use collab::{AcceptAll, DialectSelector, MemoryWorkspace, Picker, Workspace};
pub use index::{ScanEntry, ScanIndex};
pub use report::{
    FailureRecord, RunEvent, RunOutcome, RunPhase, RunReport, RunSummary, RunWarning,
};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::document::Document;
use crate::fetch::{AssetFetcher, DownloadOutcome, DownloadStatus, FetchError, FetchProgress};
use crate::paths::LocalBinding;
use crate::prologue::ImportError;
use crate::rewrite::rewrite_document;
use crate::scan::{scan_document, DocumentId};
use crate::tree::MarkupSyntax;

/// Drives one localization run over a set of documents.
pub struct Orchestrator<'a> {
    workspace: &'a dyn Workspace,
    picker: &'a dyn Picker,
    dialect: &'a dyn DialectSelector,
    syntax: &'a dyn MarkupSyntax,
    fetcher: Arc<dyn AssetFetcher>,
    events: Option<mpsc::Sender<RunEvent>>,
    phase: RunPhase,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        workspace: &'a dyn Workspace,
        picker: &'a dyn Picker,
        dialect: &'a dyn DialectSelector,
        syntax: &'a dyn MarkupSyntax,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            workspace,
            picker,
            dialect,
            syntax,
            fetcher,
            events: None,
            phase: RunPhase::Scanning,
        }
    }

    /// Streams run events to `tx`. Progress events use `try_send` and are
    /// dropped if the receiver lags.
    pub fn with_events(mut self, tx: mpsc::Sender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }

    async fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "run phase");
        self.phase = phase;
        self.emit(RunEvent::Phase(phase)).await;
    }

    /// Scans `documents` into an index. Unreadable documents become warnings.
    pub fn scan(&self, documents: &[DocumentId]) -> (ScanIndex, HashMap<DocumentId, String>, Vec<RunWarning>) {
        let mut index = ScanIndex::new();
        let mut texts = HashMap::new();
        let mut warnings = Vec::new();
        for document in documents {
            if texts.contains_key(document) {
                continue;
            }
            match self.workspace.read_document_text(document) {
                Ok(text) => {
                    index.add_document(document, scan_document(document, &text));
                    texts.insert(document.clone(), text);
                }
                Err(e) => {
                    tracing::warn!(document = %document, "read failed: {:#}", e);
                    warnings.push(RunWarning::UnreadableDocument {
                        document: document.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }
        (index, texts, warnings)
    }

    /// Runs all phases. `default_dir` is offered as the save directory.
    pub async fn run(&mut self, documents: &[DocumentId], default_dir: &Path) -> RunOutcome {
        self.enter(RunPhase::Scanning).await;
        let (index, texts, warnings) = self.scan(documents);
        let mut report = RunReport {
            warnings,
            ..RunReport::default()
        };
        tracing::info!(
            documents = texts.len(),
            unique_urls = index.entries().len(),
            "scan complete"
        );
        if index.is_empty() {
            self.enter(RunPhase::Done).await;
            return RunOutcome::Completed(report);
        }

        self.enter(RunPhase::AwaitingSelection).await;
        let chosen = match self.picker.multi_select(index.entries()) {
            Some(c) => c,
            None => return self.cancelled(),
        };
        let dest_dir = match self.picker.select_directory(default_dir) {
            Some(d) => d,
            None => return self.cancelled(),
        };

        self.enter(RunPhase::Downloading).await;
        let mut chosen: Vec<usize> = chosen.into_iter().filter(|&i| i < index.entries().len()).collect();
        chosen.sort_unstable();
        chosen.dedup();
        let total = chosen.len();
        let mut resolved: HashMap<&str, PathBuf> = HashMap::new();

        for (n, &i) in chosen.iter().enumerate() {
            let entry = &index.entries()[i];
            let outcome = self.download(n + 1, total, &entry.key, &dest_dir).await;
            report.summary.record(outcome.status);
            match (&outcome.status, &outcome.local_path) {
                (DownloadStatus::Failed(kind), _) => report.failures.push(FailureRecord {
                    url: entry.key.clone(),
                    kind: *kind,
                    reason: outcome.error.clone().unwrap_or_default(),
                }),
                (_, Some(path)) => {
                    resolved.insert(entry.key.as_str(), path.clone());
                }
                (_, None) => {}
            }
            report.outcomes.push(outcome);
        }

        self.enter(RunPhase::Rewriting).await;
        for (document, references) in index.documents() {
            let mut bindings: Vec<LocalBinding> = Vec::new();
            for r in references {
                let path = match resolved.get(r.key.as_str()) {
                    Some(p) => p,
                    None => continue,
                };
                if bindings.iter().any(|b| b.url == r.url) {
                    continue;
                }
                bindings.push(LocalBinding::resolve(&r.url, path, document.dir()));
            }
            if bindings.is_empty() {
                continue;
            }
            let text = match texts.get(document) {
                Some(t) => t,
                None => continue,
            };
            self.rewrite(document, text, &bindings, &mut report).await;
        }

        self.enter(RunPhase::Done).await;
        tracing::info!(summary = %report.summary, "run complete");
        RunOutcome::Completed(report)
    }

    fn cancelled(&self) -> RunOutcome {
        tracing::info!(phase = %self.phase, "run cancelled");
        RunOutcome::Cancelled { phase: self.phase }
    }

    async fn download(&self, index: usize, total: usize, url: &str, dest_dir: &Path) -> DownloadOutcome {
        self.emit(RunEvent::FetchStarted {
            index,
            total,
            url: url.to_string(),
        })
        .await;

        let fetcher = Arc::clone(&self.fetcher);
        let progress_tx = self.events.clone();
        let task_url = url.to_string();
        let dir = dest_dir.to_path_buf();
        let joined = tokio::task::spawn_blocking(move || {
            let report = |progress: FetchProgress| {
                if let Some(tx) = &progress_tx {
                    let _ = tx.try_send(RunEvent::FetchProgress { index, progress });
                }
            };
            fetcher.fetch(&task_url, &dir, Some(&report))
        })
        .await;

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(url, "download task join: {}", e);
                DownloadOutcome::failed(url, &FetchError::Storage(format!("download task join: {}", e)))
            }
        };
        match &outcome.status {
            DownloadStatus::Failed(kind) => tracing::warn!(
                url,
                kind = %kind,
                reason = outcome.error.as_deref().unwrap_or(""),
                "fetch failed"
            ),
            status => tracing::info!(url, status = ?status, "fetch finished"),
        }
        self.emit(RunEvent::FetchFinished {
            index,
            total,
            outcome: outcome.clone(),
        })
        .await;
        outcome
    }

    async fn rewrite(&self, document: &DocumentId, text: &str, bindings: &[LocalBinding], report: &mut RunReport) {
        let strategy = self.dialect.strategy_for(document);
        let doc = Document::new(document.clone(), text);
        let rewrite = match rewrite_document(doc, bindings, &strategy, self.syntax) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(document = %document, "rewrite failed: {}", e);
                report.warnings.push(RunWarning::RewriteFailed {
                    document: document.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };
        for warning in &rewrite.warnings {
            let ImportError::BindingCollision {
                binding,
                existing,
                requested,
            } = warning;
            report.warnings.push(RunWarning::BindingCollision {
                document: document.clone(),
                binding: binding.clone(),
                existing: existing.clone(),
                requested: requested.clone(),
            });
        }
        if rewrite.text == text {
            return;
        }
        match self.workspace.apply_edit(document, &rewrite.text) {
            Ok(()) => {
                report.summary.documents_updated += 1;
                self.emit(RunEvent::DocumentUpdated {
                    document: document.clone(),
                    replaced: rewrite.replaced,
                })
                .await;
            }
            Err(e) => {
                tracing::warn!(document = %document, "apply edit failed: {:#}", e);
                report.warnings.push(RunWarning::RewriteFailed {
                    document: document.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FailureKind;
    use crate::rewrite::RewriteStrategy;
    use crate::tree::ComponentSyntax;
    use crate::url_model::derive_filename;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingFetcher {
        calls: Mutex<Vec<String>>,
        failing: Vec<String>,
    }

    impl CountingFetcher {
        fn failing(urls: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: urls.iter().map(|u| u.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(
            &self,
            url: &str,
            dest_dir: &Path,
            progress: Option<&dyn Fn(FetchProgress)>,
        ) -> DownloadOutcome {
            self.calls.lock().unwrap().push(url.to_string());
            if let Some(report) = progress {
                report(FetchProgress {
                    bytes_read: 4,
                    total_bytes: 4,
                });
            }
            if self.failing.iter().any(|f| f == url) {
                return DownloadOutcome::failed(url, &FetchError::Http { code: 404 });
            }
            DownloadOutcome {
                url: url.to_string(),
                status: DownloadStatus::Downloaded,
                local_path: Some(dest_dir.join(derive_filename(url, "png"))),
                error: None,
            }
        }
    }

    struct Cancel;

    impl Picker for Cancel {
        fn multi_select(&self, _items: &[ScanEntry]) -> Option<Vec<usize>> {
            None
        }

        fn select_directory(&self, _default: &Path) -> Option<PathBuf> {
            None
        }
    }

    /// Picks only the entries whose key contains `needle`.
    struct PickMatching(&'static str);

    impl Picker for PickMatching {
        fn multi_select(&self, items: &[ScanEntry]) -> Option<Vec<usize>> {
            Some(
                items
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.key.contains(self.0))
                    .map(|(i, _)| i)
                    .collect(),
            )
        }

        fn select_directory(&self, default: &Path) -> Option<PathBuf> {
            Some(default.to_path_buf())
        }
    }

    fn assets() -> PathBuf {
        PathBuf::from("/site/src/assets/remote")
    }

    async fn run_with(
        workspace: &MemoryWorkspace,
        picker: &dyn Picker,
        fetcher: Arc<CountingFetcher>,
        strategy: RewriteStrategy,
        documents: &[DocumentId],
    ) -> RunOutcome {
        let mut orchestrator = Orchestrator::new(workspace, picker, &strategy, &ComponentSyntax, fetcher);
        orchestrator.run(documents, &assets()).await
    }

    #[tokio::test]
    async fn shared_url_is_fetched_once_with_per_document_paths() {
        let ws = MemoryWorkspace::new();
        let index = DocumentId::new("/site/src/pages/index.md");
        let post = DocumentId::new("/site/src/pages/blog/post.md");
        ws.insert(index.clone(), "![hero](https://cdn.test/hero.jpg)\n");
        ws.insert(post.clone(), "![hero](https://cdn.test/hero.jpg) ![again](https://cdn.test/hero.jpg)\n");
        let fetcher = Arc::new(CountingFetcher::default());

        let outcome = run_with(&ws, &AcceptAll, fetcher.clone(), RewriteStrategy::Path, &[index.clone(), post.clone()]).await;
        let report = outcome.report().unwrap();

        assert_eq!(fetcher.calls(), vec!["https://cdn.test/hero.jpg"]);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.summary.documents_updated, 2);
        assert_eq!(ws.text(&index).unwrap(), "![hero](../assets/remote/hero.jpg)\n");
        assert_eq!(
            ws.text(&post).unwrap(),
            "![hero](../../assets/remote/hero.jpg) ![again](../../assets/remote/hero.jpg)\n"
        );
    }

    #[tokio::test]
    async fn failed_url_leaves_its_document_untouched() {
        let ws = MemoryWorkspace::new();
        let only_missing = DocumentId::new("/site/src/pages/a.md");
        let mixed = DocumentId::new("/site/src/pages/b.md");
        let original = "![gone](https://cdn.test/gone.png)\n";
        ws.insert(only_missing.clone(), original);
        ws.insert(mixed.clone(), "![gone](https://cdn.test/gone.png) ![ok](https://cdn.test/ok.png)\n");
        let fetcher = Arc::new(CountingFetcher::failing(&["https://cdn.test/gone.png"]));

        let outcome = run_with(&ws, &AcceptAll, fetcher, RewriteStrategy::Path, &[only_missing.clone(), mixed.clone()]).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(report.summary.documents_updated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://cdn.test/gone.png");
        assert_eq!(report.failures[0].kind, FailureKind::Network);
        assert_eq!(report.failures[0].reason, "HTTP 404");
        assert_eq!(ws.text(&only_missing).unwrap(), original);
        assert_eq!(
            ws.text(&mixed).unwrap(),
            "![gone](https://cdn.test/gone.png) ![ok](../assets/remote/ok.png)\n"
        );
    }

    #[tokio::test]
    async fn cancelled_selection_does_nothing() {
        let ws = MemoryWorkspace::new();
        let doc = DocumentId::new("/site/src/pages/a.md");
        ws.insert(doc.clone(), "![x](https://cdn.test/x.png)");
        let fetcher = Arc::new(CountingFetcher::default());

        let outcome = run_with(&ws, &Cancel, fetcher.clone(), RewriteStrategy::Path, &[doc.clone()]).await;

        assert!(matches!(outcome, RunOutcome::Cancelled { phase: RunPhase::AwaitingSelection }));
        assert!(fetcher.calls().is_empty());
        assert_eq!(ws.write_count(), 0);
    }

    #[tokio::test]
    async fn unselected_urls_are_not_fetched_or_rewritten() {
        let ws = MemoryWorkspace::new();
        let doc = DocumentId::new("/site/src/pages/a.md");
        ws.insert(doc.clone(), "![a](https://cdn.test/keep.png) ![b](https://cdn.test/take.png)");
        let fetcher = Arc::new(CountingFetcher::default());

        let outcome = run_with(&ws, &PickMatching("take"), fetcher.clone(), RewriteStrategy::Path, &[doc.clone()]).await;

        assert_eq!(outcome.report().unwrap().summary.succeeded, 1);
        assert_eq!(fetcher.calls(), vec!["https://cdn.test/take.png"]);
        assert_eq!(
            ws.text(&doc).unwrap(),
            "![a](https://cdn.test/keep.png) ![b](../assets/remote/take.png)"
        );
    }

    #[tokio::test]
    async fn import_strategy_warns_on_binding_collision() {
        let ws = MemoryWorkspace::new();
        let doc = DocumentId::new("/site/src/pages/index.astro");
        ws.insert(
            doc.clone(),
            "---\nimport hero from \"../components/Hero.astro\";\n---\n<img src=\"https://cdn.test/hero.png\">",
        );
        let fetcher = Arc::new(CountingFetcher::default());
        let strategy = RewriteStrategy::Import { component: None };

        let outcome = run_with(&ws, &AcceptAll, fetcher, strategy, &[doc.clone()]).await;
        let report = outcome.report().unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            RunWarning::BindingCollision { binding, .. } if binding == "hero"
        ));
        assert!(ws
            .text(&doc)
            .unwrap()
            .ends_with("<img src=\"../assets/remote/hero.png\">"));
    }

    #[tokio::test]
    async fn events_follow_the_phases() {
        let ws = MemoryWorkspace::new();
        let doc = DocumentId::new("/site/src/pages/a.md");
        ws.insert(doc.clone(), "![x](https://cdn.test/x.png)");
        let fetcher: Arc<dyn AssetFetcher> = Arc::new(CountingFetcher::default());
        let strategy = RewriteStrategy::Path;
        let (tx, mut rx) = mpsc::channel(64);

        let mut orchestrator = Orchestrator::new(&ws, &AcceptAll, &strategy, &ComponentSyntax, fetcher).with_events(tx);
        let outcome = orchestrator.run(&[doc.clone()], &assets()).await;
        assert_eq!(orchestrator.phase(), RunPhase::Done);
        assert!(outcome.report().is_some());
        drop(orchestrator);

        let mut phases = Vec::new();
        let mut finished = 0;
        let mut progress = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                RunEvent::Phase(p) => phases.push(p),
                RunEvent::FetchProgress { .. } => progress += 1,
                RunEvent::FetchFinished { index, total, .. } => {
                    assert_eq!((index, total), (1, 1));
                    finished += 1;
                }
                _ => {}
            }
        }
        assert_eq!(
            phases,
            vec![
                RunPhase::Scanning,
                RunPhase::AwaitingSelection,
                RunPhase::Downloading,
                RunPhase::Rewriting,
                RunPhase::Done
            ]
        );
        assert_eq!(finished, 1);
        assert_eq!(progress, 1);
    }

    #[tokio::test]
    async fn nothing_remote_means_no_prompts() {
        let ws = MemoryWorkspace::new();
        let doc = DocumentId::new("/site/src/pages/a.md");
        ws.insert(doc.clone(), "![x](./local.png)");
        let fetcher = Arc::new(CountingFetcher::default());

        let outcome = run_with(&ws, &Cancel, fetcher, RewriteStrategy::Path, &[doc, DocumentId::new("/missing.md")]).await;
        let report = outcome.report().unwrap();
        assert_eq!(report.summary, RunSummary::default());
        assert!(matches!(report.warnings[0], RunWarning::UnreadableDocument { .. }));
    }
}
