//! File-backed documents: collection from CLI arguments and whole-file
//! replacement.

use anyhow::{Context, Result};
use assetpull_core::batch::Workspace;
use assetpull_core::config::AssetpullConfig;
use assetpull_core::scan::DocumentId;
use assetpull_core::storage;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist"];

/// Makes `path` absolute against the current directory without touching
/// the filesystem, so relative asset paths can be computed lexically.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("current directory")?;
    Ok(cwd.join(path))
}

/// Expands CLI arguments into documents. A file is taken as is; a directory
/// is walked recursively and filtered by the configured extensions. Hidden
/// entries are skipped. Order is stable and duplicates are dropped.
pub fn collect_documents(paths: &[PathBuf], cfg: &AssetpullConfig) -> Result<Vec<DocumentId>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for p in paths {
        let abs = absolutize(p)?;
        let meta = fs::metadata(&abs).with_context(|| format!("stat {}", abs.display()))?;
        if meta.is_dir() {
            walk(&abs, cfg, &mut found)?;
        } else {
            found.push(abs);
        }
    }
    let mut docs: Vec<DocumentId> = Vec::with_capacity(found.len());
    for path in found {
        let id = DocumentId::new(path);
        if !docs.contains(&id) {
            docs.push(id);
        }
    }
    Ok(docs)
}

fn walk(dir: &Path, cfg: &AssetpullConfig, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read directory {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    for path in entries {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if SKIPPED_DIRS.contains(&name) {
                continue;
            }
            walk(&path, cfg, out)?;
        } else if cfg.is_document(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Documents on disk. Edits are written to a `.part` sibling and renamed
/// over the original.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWorkspace;

impl Workspace for FsWorkspace {
    fn read_document_text(&self, document: &DocumentId) -> Result<String> {
        fs::read_to_string(document.path())
            .with_context(|| format!("read {}", document.path().display()))
    }

    fn apply_edit(&self, document: &DocumentId, text: &str) -> Result<()> {
        let path = document.path();
        let temp = storage::temp_path(path);
        fs::write(&temp, text).with_context(|| format!("write {}", temp.display()))?;
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(e).with_context(|| format!("replace {}", path.display()));
        }
        tracing::debug!(document = %document, bytes = text.len(), "document written");
        Ok(())
    }
}
