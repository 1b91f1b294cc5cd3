//! Identifier derivation for import bindings.

use std::path::Path;

/// Identifier used when the filename yields nothing usable.
pub const FALLBACK_BINDING: &str = "image";

/// Letters prepended when the derived identifier would start with a digit.
const DIGIT_PREFIX: &str = "img";

/// Suffix appended when the derived identifier is a reserved word.
const RESERVED_SUFFIX: &str = "Image";

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Derives an import binding name from an asset path.
///
/// Takes the file name without its extension, drops characters outside
/// `[A-Za-z0-9_-]`, camel-cases on `-`/`_`, prefixes `img` when the result
/// starts with a digit, and falls back to `image` when nothing is left.
/// Pure function of the path: every caller derives the same name.
///
/// `Hero-Image.JPG` and `hero_image.jpg` both become `heroImage`.
pub fn binding_name(asset_path: &Path) -> String {
    let stem = asset_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let kept: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let mut ident = String::with_capacity(kept.len());
    for word in kept.split(|c| c == '-' || c == '_').filter(|w| !w.is_empty()) {
        let first_word = ident.is_empty();
        let word = if word.chars().all(|c| !c.is_ascii_lowercase()) {
            word.to_ascii_lowercase()
        } else {
            word.to_string()
        };
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            if first_word {
                ident.push(head.to_ascii_lowercase());
            } else {
                ident.push(head.to_ascii_uppercase());
            }
            ident.extend(chars);
        }
    }

    if ident.is_empty() {
        return FALLBACK_BINDING.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, DIGIT_PREFIX);
    }
    if RESERVED_WORDS.contains(&ident.as_str()) {
        ident.push_str(RESERVED_SUFFIX);
    }
    ident
}

/// True if `name` is a plain ASCII identifier usable as an import binding.
pub fn is_valid_binding(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}
