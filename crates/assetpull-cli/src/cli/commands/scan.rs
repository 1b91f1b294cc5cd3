//! `assetpull scan` – list remote image URLs without downloading anything.

use anyhow::Result;
use assetpull_core::batch::{ScanIndex, Workspace};
use assetpull_core::config::AssetpullConfig;
use assetpull_core::scan::scan_document;
use std::path::PathBuf;

use crate::cli::workspace::{collect_documents, FsWorkspace};

pub fn run_scan(cfg: &AssetpullConfig, paths: &[PathBuf]) -> Result<()> {
    let documents = collect_documents(paths, cfg)?;
    let workspace = FsWorkspace;
    let mut index = ScanIndex::new();
    for document in &documents {
        match workspace.read_document_text(document) {
            Ok(text) => index.add_document(document, scan_document(document, &text)),
            Err(e) => eprintln!("skipping {}: {:#}", document, e),
        }
    }

    if index.is_empty() {
        println!("No remote images in {} document(s).", documents.len());
        return Ok(());
    }
    for entry in index.entries() {
        println!("{}  [{:?}, {} reference(s)]", entry.key, entry.tag_kind, entry.occurrences);
        for document in &entry.documents {
            println!("    {}", document);
        }
    }
    println!(
        "{} unique URL(s) in {} document(s).",
        index.entries().len(),
        documents.len()
    );
    Ok(())
}
