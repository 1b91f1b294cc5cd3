//! Per-run project capabilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// What the project around the documents supports. Computed once per run
/// and passed to whoever needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The package providing the image component module is installed.
    pub assets_package: bool,
}

impl Capabilities {
    /// Reads `package.json` under `project_root`. A missing manifest means no
    /// optional capability; an unreadable or malformed one is an error.
    pub fn detect(project_root: &Path, assets_package: &str) -> Result<Self> {
        let manifest_path = project_root.join("package.json");
        if !manifest_path.exists() {
            tracing::debug!(path = %manifest_path.display(), "no package manifest");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&manifest_path)
            .with_context(|| format!("read {}", manifest_path.display()))?;
        let manifest: PackageManifest = serde_json::from_str(&data)
            .with_context(|| format!("parse {}", manifest_path.display()))?;

        let found = manifest.dependencies.contains_key(assets_package)
            || manifest.dev_dependencies.contains_key(assets_package);
        tracing::debug!(package = assets_package, found, "detected capabilities");
        Ok(Self {
            assets_package: found,
        })
    }
}
