use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/assetpull/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetpullConfig {
    /// Directory (relative to the project root) that receives downloaded assets.
    pub asset_dir: PathBuf,
    /// Extension appended when a URL path segment has none (without the dot).
    pub default_extension: String,
    /// Overwrite files that already exist under the nominal name instead of skipping.
    #[serde(default)]
    pub overwrite: bool,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout per request, in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirect hops followed before giving up.
    pub max_redirects: u32,
    /// Optional User-Agent sent with every request (None = libcurl default).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Document extensions scanned when a directory is given.
    #[serde(default = "default_document_extensions")]
    pub extensions: Vec<String>,
}

fn default_document_extensions() -> Vec<String> {
    ["md", "mdx", "astro", "html", "htm"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AssetpullConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("src/assets/remote"),
            default_extension: "png".to_string(),
            overwrite: false,
            connect_timeout_secs: 15,
            timeout_secs: 120,
            max_redirects: 10,
            user_agent: None,
            extensions: default_document_extensions(),
        }
    }
}

impl AssetpullConfig {
    /// True if `path` has one of the configured document extensions (case-insensitive).
    pub fn is_document(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("assetpull")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AssetpullConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AssetpullConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AssetpullConfig = toml::from_str(&data)?;
    Ok(cfg)
}
