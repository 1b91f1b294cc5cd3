//! Document-relative references to saved assets.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path: drops `.`, resolves `..` against preceding
/// normal components. Does not touch the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Shortest relative path from `document_dir` to `asset_path`, with `/`
/// separators, always starting with `./` or `../`.
///
/// Both inputs should be absolute (or both relative to the same base).
/// When they share no common root (e.g. different drive prefixes) the
/// asset path is returned with normalized separators.
pub fn local_relative_path(asset_path: &Path, document_dir: &Path) -> String {
    let asset = normalize(asset_path);
    let base = normalize(document_dir);

    let asset_parts: Vec<Component<'_>> = asset.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = asset_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 && (is_rooted(&asset_parts) || is_rooted(&base_parts)) {
        return to_slashes(&asset);
    }

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        segments.push("..".to_string());
    }
    for comp in &asset_parts[common..] {
        segments.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    let joined = segments.join("/");
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{}", joined)
    }
}

fn is_rooted(parts: &[Component<'_>]) -> bool {
    matches!(
        parts.first(),
        Some(Component::RootDir) | Some(Component::Prefix(_))
    )
}

fn to_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
