//! Integration test: full localization runs (scan, select, download, rewrite)
//! against a local HTTP server and an in-memory workspace.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use assetpull_core::batch::{AcceptAll, MemoryWorkspace, Orchestrator, RunOutcome, RunReport};
use assetpull_core::fetch::{AssetFetcher, CurlFetcher, DownloadStatus, FetchOptions};
use assetpull_core::prologue::find_imports;
use assetpull_core::rewrite::RewriteStrategy;
use assetpull_core::scan::DocumentId;
use assetpull_core::tree::ComponentSyntax;
use common::asset_server::{self, Route};
use tempfile::tempdir;

struct Site {
    _root: tempfile::TempDir,
    pages: PathBuf,
    assets: PathBuf,
}

fn site() -> Site {
    let root = tempdir().unwrap();
    let pages = root.path().join("src/pages");
    let assets = root.path().join("src/assets/remote");
    Site {
        _root: root,
        pages,
        assets,
    }
}

async fn localize(
    ws: &MemoryWorkspace,
    strategy: RewriteStrategy,
    documents: &[DocumentId],
    assets: &Path,
) -> RunReport {
    let fetcher: Arc<dyn AssetFetcher> = Arc::new(CurlFetcher::new(FetchOptions::default()));
    let mut orchestrator = Orchestrator::new(ws, &AcceptAll, &strategy, &ComponentSyntax, fetcher);
    match orchestrator.run(documents, assets).await {
        RunOutcome::Completed(report) => report,
        RunOutcome::Cancelled { phase } => panic!("unexpected cancel in {}", phase),
    }
}

#[tokio::test]
async fn redirected_asset_is_saved_once_and_document_rewritten() {
    let server = asset_server::start(vec![
        ("img/hero.jpg", Route::Redirect(302, "/cdn/hero.jpg".into())),
        ("cdn/hero.jpg", Route::Redirect(307, "/store/hero.jpg".into())),
        ("store/hero.jpg", Route::Body(b"jpeg bytes".to_vec())),
    ]);
    let site = site();
    let doc = DocumentId::new(site.pages.join("index.md"));
    let url = server.url("img/hero.jpg");
    let ws = MemoryWorkspace::new();
    ws.insert(doc.clone(), format!("# Hi\n\n![hero]({})\n\n<img src=\"{}\" alt=\"\">\n", url, url));

    let report = localize(&ws, RewriteStrategy::Path, &[doc.clone()], &site.assets).await;

    assert_eq!(report.summary.succeeded, 1);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].status, DownloadStatus::Downloaded);
    assert_eq!(std::fs::read(site.assets.join("hero.jpg")).unwrap(), b"jpeg bytes");
    assert_eq!(std::fs::read_dir(&site.assets).unwrap().count(), 1);
    assert_eq!(
        ws.text(&doc).unwrap(),
        "# Hi\n\n![hero](../assets/remote/hero.jpg)\n\n<img src=\"../assets/remote/hero.jpg\" alt=\"\">\n"
    );
}

#[tokio::test]
async fn not_found_leaves_document_byte_identical() {
    let server = asset_server::start(vec![]);
    let site = site();
    let doc = DocumentId::new(site.pages.join("missing.md"));
    let original = format!("Look: ![x]({})\n", server.url("nope.png"));
    let ws = MemoryWorkspace::new();
    ws.insert(doc.clone(), original.clone());

    let report = localize(&ws, RewriteStrategy::Path, &[doc.clone()], &site.assets).await;

    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.documents_updated, 0);
    assert_eq!(report.failures[0].url, server.url("nope.png"));
    assert_eq!(report.failures[0].reason, "HTTP 404");
    assert_eq!(ws.text(&doc).unwrap(), original);
    assert_eq!(ws.write_count(), 0);
}

#[tokio::test]
async fn shared_url_downloads_once_and_second_run_skips() {
    let server = asset_server::start(vec![("shared.png", Route::Body(vec![1, 2, 3]))]);
    let site = site();
    let home = DocumentId::new(site.pages.join("index.md"));
    let post = DocumentId::new(site.pages.join("blog/first.md"));
    let url = server.url("shared.png");
    let ws = MemoryWorkspace::new();
    ws.insert(home.clone(), format!("![a]({})", url));
    ws.insert(post.clone(), format!("![b]({})", url));

    let first = localize(&ws, RewriteStrategy::Path, &[home.clone(), post.clone()], &site.assets).await;
    assert_eq!(first.summary.succeeded, 1);
    assert_eq!(first.summary.documents_updated, 2);
    assert_eq!(server.hits("shared.png"), 1);
    assert_eq!(ws.text(&home).unwrap(), "![a](../assets/remote/shared.png)");
    assert_eq!(ws.text(&post).unwrap(), "![b](../../assets/remote/shared.png)");

    // Already-localized documents: nothing left to do.
    let again = localize(&ws, RewriteStrategy::Path, &[home.clone(), post.clone()], &site.assets).await;
    assert_eq!(again.summary.documents_updated, 0);
    assert!(again.outcomes.is_empty());

    // A new reference to the same nominal file is satisfied from disk.
    let third = DocumentId::new(site.pages.join("about.md"));
    ws.insert(third.clone(), format!("![c]({})", url));
    let rerun = localize(&ws, RewriteStrategy::Path, &[third.clone()], &site.assets).await;
    assert_eq!(rerun.summary.skipped_existing, 1);
    assert_eq!(rerun.summary.succeeded, 0);
    assert_eq!(server.hits("shared.png"), 1);
    assert_eq!(ws.text(&third).unwrap(), "![c](../assets/remote/shared.png)");
}

#[tokio::test]
async fn composite_element_gains_two_imports() {
    let server = asset_server::start(vec![
        ("small.webp", Route::Body(b"s".to_vec())),
        ("large.webp", Route::Body(b"l".to_vec())),
    ]);
    let site = site();
    let doc = DocumentId::new(site.pages.join("gallery.astro"));
    let ws = MemoryWorkspace::new();
    ws.insert(
        doc.clone(),
        format!(
            "---\nconst title = \"Gallery\";\n---\n<img srcset=\"{} 480w, {} 1080w\" alt={{title}}>\n",
            server.url("small.webp"),
            server.url("large.webp")
        ),
    );

    let report = localize(
        &ws,
        RewriteStrategy::Import { component: None },
        &[doc.clone()],
        &site.assets,
    )
    .await;

    assert_eq!(report.summary.succeeded, 2);
    let text = ws.text(&doc).unwrap();
    assert_eq!(
        text,
        "---\nimport small from \"../assets/remote/small.webp\";\nimport large from \"../assets/remote/large.webp\";\n\nconst title = \"Gallery\";\n---\n<img srcset={`${small.src} 480w, ${large.src} 1080w`} alt={title}>\n"
    );
    let prologue = text.split("---\n").nth(1).unwrap();
    assert_eq!(find_imports(prologue).len(), 2);

    // Idempotent: a second run finds nothing remote and changes nothing.
    let again = localize(
        &ws,
        RewriteStrategy::Import { component: None },
        &[doc.clone()],
        &site.assets,
    )
    .await;
    assert_eq!(again.summary.documents_updated, 0);
    assert_eq!(ws.text(&doc).unwrap(), text);
}
