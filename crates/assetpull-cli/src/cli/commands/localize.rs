//! `assetpull localize` – download remote images and rewrite the documents.

use anyhow::Result;
use assetpull_core::batch::{AcceptAll, DialectSelector, Orchestrator, Picker, RunOutcome};
use assetpull_core::capabilities::Capabilities;
use assetpull_core::config::AssetpullConfig;
use assetpull_core::fetch::{CurlFetcher, FetchOptions};
use assetpull_core::rewrite::{ComponentImport, RewriteStrategy};
use assetpull_core::tree::ComponentSyntax;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cli::dialect::ByExtension;
use crate::cli::output;
use crate::cli::picker::TerminalPicker;
use crate::cli::workspace::{absolutize, collect_documents, FsWorkspace};
use crate::cli::StrategyArg;

#[derive(Debug)]
pub struct LocalizeOptions {
    pub paths: Vec<PathBuf>,
    pub strategy: StrategyArg,
    pub assets_module: Option<String>,
    pub assets_component: String,
    pub assets_package: String,
    pub asset_dir: Option<PathBuf>,
    pub project_root: Option<PathBuf>,
    pub overwrite: bool,
    pub yes: bool,
}

/// Import strategy for this project: the component upgrade is only enabled
/// when an assets module was named and its package is installed.
fn import_strategy(opts: &LocalizeOptions, caps: Capabilities) -> RewriteStrategy {
    let component = match &opts.assets_module {
        Some(module) if caps.assets_package => Some(ComponentImport {
            name: opts.assets_component.clone(),
            module: module.clone(),
        }),
        Some(module) => {
            tracing::info!(
                module = %module,
                package = %opts.assets_package,
                "assets package not installed, using plain imports"
            );
            None
        }
        None => None,
    };
    RewriteStrategy::Import { component }
}

fn dialect_for(opts: &LocalizeOptions, caps: Capabilities) -> Box<dyn DialectSelector> {
    match opts.strategy {
        StrategyArg::Path => Box::new(RewriteStrategy::Path),
        StrategyArg::Import => Box::new(import_strategy(opts, caps)),
        StrategyArg::Auto => Box::new(ByExtension::new(import_strategy(opts, caps))),
    }
}

pub async fn run_localize(cfg: &AssetpullConfig, opts: LocalizeOptions) -> Result<()> {
    let project_root = match &opts.project_root {
        Some(p) => absolutize(p)?,
        None => std::env::current_dir()?,
    };
    let documents = collect_documents(&opts.paths, cfg)?;
    if documents.is_empty() {
        println!("No documents found.");
        return Ok(());
    }
    let default_dir = project_root.join(opts.asset_dir.as_ref().unwrap_or(&cfg.asset_dir));

    let caps = if opts.assets_module.is_some() && opts.strategy != StrategyArg::Path {
        Capabilities::detect(&project_root, &opts.assets_package)?
    } else {
        Capabilities::default()
    };
    let dialect = dialect_for(&opts, caps);

    let mut fetch_options = FetchOptions::from_config(cfg);
    fetch_options.overwrite |= opts.overwrite;
    let fetcher = Arc::new(CurlFetcher::new(fetch_options));

    let picker: Box<dyn Picker> = if opts.yes {
        Box::new(AcceptAll)
    } else {
        Box::new(TerminalPicker::stdin(project_root.clone()))
    };
    let workspace = FsWorkspace;
    let syntax = ComponentSyntax;

    tracing::info!(
        documents = documents.len(),
        strategy = ?opts.strategy,
        dir = %default_dir.display(),
        "localize"
    );

    let (tx, rx) = mpsc::channel(64);
    let printer = tokio::spawn(output::print_events(rx));
    let outcome = {
        let mut orchestrator = Orchestrator::new(
            &workspace,
            picker.as_ref(),
            dialect.as_ref(),
            &syntax,
            fetcher,
        )
        .with_events(tx);
        orchestrator.run(&documents, &default_dir).await
    };
    let _ = printer.await;

    match outcome {
        RunOutcome::Completed(report) => output::print_report(&report),
        RunOutcome::Cancelled { phase } => {
            tracing::info!(%phase, "run cancelled");
            println!("Cancelled; nothing was downloaded or changed.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetpull_core::scan::DocumentId;

    fn options(strategy: StrategyArg, module: Option<&str>) -> LocalizeOptions {
        LocalizeOptions {
            paths: vec![PathBuf::from("src")],
            strategy,
            assets_module: module.map(str::to_string),
            assets_component: "Image".to_string(),
            assets_package: "astro".to_string(),
            asset_dir: None,
            project_root: None,
            overwrite: false,
            yes: true,
        }
    }

    #[test]
    fn component_upgrade_needs_module_and_package() {
        let installed = Capabilities { assets_package: true };
        let missing = Capabilities::default();

        let with = import_strategy(&options(StrategyArg::Import, Some("astro:assets")), installed);
        assert_eq!(
            with,
            RewriteStrategy::Import {
                component: Some(ComponentImport {
                    name: "Image".into(),
                    module: "astro:assets".into()
                })
            }
        );
        assert_eq!(
            import_strategy(&options(StrategyArg::Import, Some("astro:assets")), missing),
            RewriteStrategy::Import { component: None }
        );
        assert_eq!(
            import_strategy(&options(StrategyArg::Import, None), installed),
            RewriteStrategy::Import { component: None }
        );
    }

    #[test]
    fn dialect_follows_strategy_flag() {
        let caps = Capabilities::default();
        let astro = DocumentId::new("/p/index.astro");
        let md = DocumentId::new("/p/index.md");

        let path = dialect_for(&options(StrategyArg::Path, None), caps);
        assert_eq!(path.strategy_for(&astro), RewriteStrategy::Path);

        let import = dialect_for(&options(StrategyArg::Import, None), caps);
        assert_eq!(import.strategy_for(&md).name(), "import");

        let auto = dialect_for(&options(StrategyArg::Auto, None), caps);
        assert_eq!(auto.strategy_for(&astro).name(), "import");
        assert_eq!(auto.strategy_for(&md), RewriteStrategy::Path);
    }
}
