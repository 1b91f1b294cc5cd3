//! Tests for the localize subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand, StrategyArg};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_localize_defaults() {
    match parse(&["assetpull", "localize", "src/pages"]) {
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
            assert_eq!(paths, vec![PathBuf::from("src/pages")]);
            assert_eq!(strategy, StrategyArg::Auto);
            assert!(assets_module.is_none());
            assert_eq!(assets_component, "Image");
            assert_eq!(assets_package, "astro");
            assert!(asset_dir.is_none());
            assert!(project_root.is_none());
            assert!(!overwrite);
            assert!(!yes);
        }
        _ => panic!("expected Localize"),
    }
}

#[test]
fn cli_parse_localize_all_flags() {
    match parse(&[
        "assetpull",
        "localize",
        "a.md",
        "b.astro",
        "--strategy",
        "import",
        "--assets-module",
        "astro:assets",
        "--assets-component",
        "Picture",
        "--assets-package",
        "@astrojs/image",
        "--asset-dir",
        "public/img",
        "--project-root",
        "/site",
        "--overwrite",
        "-y",
    ]) {
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
            assert_eq!(paths.len(), 2);
            assert_eq!(strategy, StrategyArg::Import);
            assert_eq!(assets_module.as_deref(), Some("astro:assets"));
            assert_eq!(assets_component, "Picture");
            assert_eq!(assets_package, "@astrojs/image");
            assert_eq!(asset_dir, Some(PathBuf::from("public/img")));
            assert_eq!(project_root, Some(PathBuf::from("/site")));
            assert!(overwrite);
            assert!(yes);
        }
        _ => panic!("expected Localize with flags"),
    }
}

#[test]
fn cli_parse_localize_path_strategy() {
    match parse(&["assetpull", "localize", ".", "--strategy", "path"]) {
        CliCommand::Localize { strategy, .. } => assert_eq!(strategy, StrategyArg::Path),
        _ => panic!("expected Localize"),
    }
}

#[test]
fn cli_parse_localize_rejects_unknown_strategy() {
    assert!(Cli::try_parse_from(["assetpull", "localize", ".", "--strategy", "inline"]).is_err());
}

#[test]
fn cli_parse_localize_requires_a_path() {
    assert!(Cli::try_parse_from(["assetpull", "localize"]).is_err());
}
