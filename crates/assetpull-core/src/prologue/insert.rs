//! Token-aware, idempotent insertion of import bindings into prologue text.

use super::statements::{find_imports, ImportStatement};
use super::ImportError;

/// Result of one insertion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Text changed; the new prologue text.
    Inserted(String),
    /// Binding was already declared exactly as requested; text unchanged.
    Unchanged,
    /// The module is already default-imported under another name; text
    /// unchanged, callers should reference `binding` instead.
    AlreadyImported { binding: String },
}

/// Rendering conventions picked up from existing imports.
struct Style {
    quote: char,
    semicolon: bool,
}

fn style_of(imports: &[ImportStatement]) -> Style {
    match imports.last() {
        Some(last) => Style {
            quote: last.quote,
            semicolon: last.has_semicolon,
        },
        None => Style {
            quote: '"',
            semicolon: true,
        },
    }
}

fn quoted(spec: &str, quote: char) -> String {
    let escaped = spec.replace('\\', "\\\\").replace(quote, &format!("\\{}", quote));
    format!("{q}{s}{q}", q = quote, s = escaped)
}

/// Fails when `binding` is already bound by an import of a different module.
fn check_collision(
    imports: &[ImportStatement],
    binding: &str,
    module: &str,
) -> Result<(), ImportError> {
    match imports
        .iter()
        .find(|s| s.specifier != module && s.binds(binding))
    {
        Some(existing) => Err(ImportError::BindingCollision {
            binding: binding.to_string(),
            existing: existing.specifier.clone(),
            requested: module.to_string(),
        }),
        None => Ok(()),
    }
}

/// Places a complete import line in `prologue`.
///
/// With no existing imports the line goes at the very top, separated from any
/// following content by a blank line. Otherwise it goes on the line after
/// the last import: after the first newline following that statement's end,
/// so trailing same-line content (comments, stray semicolons) stays attached
/// to the statement it belongs to.
fn place_statement(prologue: &str, imports: &[ImportStatement], line: &str) -> String {
    match imports.last() {
        None => {
            let rest = prologue.trim_start_matches(['\n', '\r']);
            if rest.trim().is_empty() {
                format!("{}\n{}", line, rest)
            } else {
                format!("{}\n\n{}", line, rest)
            }
        }
        Some(last) => match prologue[last.span.end..].find('\n') {
            Some(rel) => {
                let at = last.span.end + rel + 1;
                format!("{}{}\n{}", &prologue[..at], line, &prologue[at..])
            }
            None => format!("{}\n{}\n", prologue, line),
        },
    }
}

/// Adds a default import `import <binding> from "<module_path>"`.
///
/// No-op when the module is already default-imported (reported as
/// `Unchanged` or `AlreadyImported`). Fails with `BindingCollision` when the
/// name is taken by an import of another module.
pub fn insert_default_import(
    prologue: &str,
    binding: &str,
    module_path: &str,
) -> Result<InsertOutcome, ImportError> {
    let imports = find_imports(prologue);

    if let Some(existing) = imports
        .iter()
        .find(|s| s.specifier == module_path && s.default_binding.is_some())
    {
        return Ok(match existing.default_binding.as_deref() {
            Some(name) if name == binding => InsertOutcome::Unchanged,
            Some(name) => InsertOutcome::AlreadyImported {
                binding: name.to_string(),
            },
            None => InsertOutcome::Unchanged,
        });
    }
    check_collision(&imports, binding, module_path)?;
    if imports.iter().any(|s| s.specifier == module_path && s.binds(binding)) {
        return Ok(InsertOutcome::Unchanged);
    }

    let style = style_of(&imports);
    let line = format!(
        "import {} from {}{}",
        binding,
        quoted(module_path, style.quote),
        if style.semicolon { ";" } else { "" }
    );
    Ok(InsertOutcome::Inserted(place_statement(prologue, &imports, &line)))
}

/// Inserts `binding` into the `{ ... }` clause of the existing import of
/// `specifier`, creating `import { binding } from "specifier"` when there is
/// none. No-op when the binding is already present.
pub fn merge_named_import(
    prologue: &str,
    specifier: &str,
    binding: &str,
) -> Result<InsertOutcome, ImportError> {
    let imports = find_imports(prologue);

    if imports
        .iter()
        .any(|s| s.specifier == specifier && s.named.as_ref().map(|n| n.locals.iter().any(|l| l == binding)).unwrap_or(false))
    {
        return Ok(InsertOutcome::Unchanged);
    }
    check_collision(&imports, binding, specifier)?;
    if imports.iter().any(|s| s.specifier == specifier && s.binds(binding)) {
        // Bound as default or namespace of the same module: a different value.
        return Err(ImportError::BindingCollision {
            binding: binding.to_string(),
            existing: specifier.to_string(),
            requested: specifier.to_string(),
        });
    }

    let target = imports
        .iter()
        .filter(|s| s.specifier == specifier && !s.type_only)
        .find(|s| s.named.is_some())
        .or_else(|| {
            imports.iter().find(|s| {
                s.specifier == specifier
                    && !s.type_only
                    && s.namespace.is_none()
                    && s.default_binding.is_some()
            })
        });

    if let Some(stmt) = target {
        if let Some(named) = &stmt.named {
            let inner = &prologue[named.open + 1..named.close];
            let out = if inner.trim().is_empty() {
                format!(
                    "{} {} {}",
                    &prologue[..named.open + 1],
                    binding,
                    &prologue[named.close..]
                )
            } else {
                let last_content = named.open + 1 + inner.trim_end().len();
                let sep = if prologue[..last_content].ends_with(',') { " " } else { ", " };
                format!(
                    "{}{}{}{}",
                    &prologue[..last_content],
                    sep,
                    binding,
                    &prologue[last_content..]
                )
            };
            return Ok(InsertOutcome::Inserted(out));
        }
        if let Some(end) = stmt.default_end {
            let out = format!(
                "{}, {{ {} }}{}",
                &prologue[..end],
                binding,
                &prologue[end..]
            );
            return Ok(InsertOutcome::Inserted(out));
        }
    }

    let style = style_of(&imports);
    let line = format!(
        "import {{ {} }} from {}{}",
        binding,
        quoted(specifier, style.quote),
        if style.semicolon { ";" } else { "" }
    );
    Ok(InsertOutcome::Inserted(place_statement(prologue, &imports, &line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inserted(o: Result<InsertOutcome, ImportError>) -> String {
        match o {
            Ok(InsertOutcome::Inserted(s)) => s,
            other => panic!("expected insertion, got {:?}", other),
        }
    }

    #[test]
    fn default_into_empty_prologue() {
        assert_eq!(
            inserted(insert_default_import("", "hero", "../assets/hero.jpg")),
            "import hero from \"../assets/hero.jpg\";\n"
        );
    }

    #[test]
    fn default_before_code_without_imports() {
        assert_eq!(
            inserted(insert_default_import("const a = 1;\n", "hero", "./hero.jpg")),
            "import hero from \"./hero.jpg\";\n\nconst a = 1;\n"
        );
    }

    #[test]
    fn default_after_last_import_keeps_trailing_comment() {
        let src = "import a from './a.png'; // keep me\nconst x = 1;\n";
        assert_eq!(
            inserted(insert_default_import(src, "b", "./b.png")),
            "import a from './a.png'; // keep me\nimport b from './b.png';\nconst x = 1;\n"
        );
    }

    #[test]
    fn default_after_last_import_without_newline() {
        assert_eq!(
            inserted(insert_default_import("import a from \"./a.png\"", "b", "./b.png")),
            "import a from \"./a.png\"\nimport b from \"./b.png\"\n"
        );
    }

    #[test]
    fn default_is_idempotent() {
        let once = inserted(insert_default_import("", "hero", "./hero.jpg"));
        assert_eq!(
            insert_default_import(&once, "hero", "./hero.jpg").unwrap(),
            InsertOutcome::Unchanged
        );
    }

    #[test]
    fn same_path_under_other_name_is_reused() {
        let src = "import banner from './hero.jpg';\n";
        assert_eq!(
            insert_default_import(src, "hero", "./hero.jpg").unwrap(),
            InsertOutcome::AlreadyImported {
                binding: "banner".into()
            }
        );
    }

    #[test]
    fn collision_with_other_module_is_reported() {
        let src = "import hero from './old/hero.png';\n";
        match insert_default_import(src, "hero", "./new/hero.jpg") {
            Err(ImportError::BindingCollision {
                binding,
                existing,
                requested,
            }) => {
                assert_eq!(binding, "hero");
                assert_eq!(existing, "./old/hero.png");
                assert_eq!(requested, "./new/hero.jpg");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn merge_into_existing_clause() {
        let src = "import { Image } from \"astro:assets\";\n";
        assert_eq!(
            inserted(merge_named_import(src, "astro:assets", "hero")),
            "import { Image, hero } from \"astro:assets\";\n"
        );
    }

    #[test]
    fn merge_into_empty_and_tight_braces() {
        assert_eq!(
            inserted(merge_named_import("import {} from 'm';", "m", "a")),
            "import { a } from 'm';"
        );
        assert_eq!(
            inserted(merge_named_import("import {b} from 'm';", "m", "a")),
            "import {b, a} from 'm';"
        );
    }

    #[test]
    fn merge_with_trailing_comma_multiline() {
        let src = "import {\n  a,\n} from 'm';\n";
        assert_eq!(
            inserted(merge_named_import(src, "m", "b")),
            "import {\n  a, b\n} from 'm';\n"
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let src = "import { Image, hero } from \"astro:assets\";\n";
        assert_eq!(
            merge_named_import(src, "astro:assets", "hero").unwrap(),
            InsertOutcome::Unchanged
        );
    }

    #[test]
    fn merge_not_fooled_by_strings_or_comments() {
        let src = "// import { x } from 'astro:assets'\nconst s = \"import { y } from 'astro:assets'\";\n";
        assert_eq!(
            inserted(merge_named_import(src, "astro:assets", "hero")),
            "import { hero } from \"astro:assets\";\n\n// import { x } from 'astro:assets'\nconst s = \"import { y } from 'astro:assets'\";\n"
        );
    }

    #[test]
    fn merge_next_to_default_binding() {
        assert_eq!(
            inserted(merge_named_import("import lib from 'm';\n", "m", "a")),
            "import lib, { a } from 'm';\n"
        );
    }

    #[test]
    fn merge_creates_statement_after_other_imports() {
        let src = "import a from './a.png';\n\nconst x = 1;\n";
        assert_eq!(
            inserted(merge_named_import(src, "astro:assets", "Image")),
            "import a from './a.png';\nimport { Image } from 'astro:assets';\n\nconst x = 1;\n"
        );
    }
}
