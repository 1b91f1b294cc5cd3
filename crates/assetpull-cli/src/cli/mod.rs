//! CLI for assetpull.

mod commands;
mod dialect;
mod output;
mod picker;
mod workspace;

use anyhow::Result;
use assetpull_core::config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use commands::{run_fetch, run_localize, run_scan, LocalizeOptions};

/// Top-level CLI for assetpull.
#[derive(Debug, Parser)]
#[command(name = "assetpull")]
#[command(about = "Download remote images referenced by documents and point the documents at local copies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// How references are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Import strategy for component files (`.astro`), path strategy for the rest.
    Auto,
    /// Replace URLs with document-relative paths.
    Path,
    /// Import each asset in the prologue and reference the binding.
    Import,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every remote image referenced by the given documents and
    /// rewrite the references to local copies.
    Localize {
        /// Documents or directories (directories are scanned recursively).
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(long, value_enum, default_value = "auto")]
        strategy: StrategyArg,

        /// Module that provides the image component (e.g. `astro:assets`).
        /// Plain `<img>` elements are upgraded to the component when set and
        /// the package is installed.
        #[arg(long, value_name = "SPEC")]
        assets_module: Option<String>,

        /// Name of the image component exported by the assets module.
        #[arg(long, default_value = "Image", value_name = "NAME")]
        assets_component: String,

        /// Package whose presence in package.json enables the component upgrade.
        #[arg(long, default_value = "astro", value_name = "PKG")]
        assets_package: String,

        /// Directory for downloaded assets (default: asset_dir from config,
        /// relative to the project root).
        #[arg(long, value_name = "DIR")]
        asset_dir: Option<PathBuf>,

        /// Project root (default: current directory).
        #[arg(long, value_name = "DIR")]
        project_root: Option<PathBuf>,

        /// Replace assets that already exist instead of skipping them.
        #[arg(long)]
        overwrite: bool,

        /// Select every URL and accept the default directory without prompting.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List unique remote image URLs and the documents that reference them.
    Scan {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Download a single URL.
    Fetch {
        url: String,

        /// Destination directory (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        #[arg(long)]
        overwrite: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Localize {
                paths,
                strategy,
                assets_module,
                assets_component,
                assets_package,
                asset_dir,
                project_root,
                overwrite,
                yes,
            } => {
                let options = LocalizeOptions {
                    paths,
                    strategy,
                    assets_module,
                    assets_component,
                    assets_package,
                    asset_dir,
                    project_root,
                    overwrite,
                    yes,
                };
                run_localize(&cfg, options).await?;
            }
            CliCommand::Scan { paths } => run_scan(&cfg, &paths)?,
            CliCommand::Fetch {
                url,
                dir,
                overwrite,
            } => run_fetch(&cfg, &url, dir.as_deref(), overwrite).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
