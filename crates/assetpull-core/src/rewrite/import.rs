//! Import strategy: attribute values become expressions over imported
//! bindings, and the bindings are declared in the prologue.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::path::{find_occurrences, index_bindings};
use super::{ComponentImport, Rewrite, RewriteError};
use crate::paths::LocalBinding;
use crate::prologue::{ImportError, ImportRequest, PrologueEdit, Resolution};
use crate::scan::{candidate_urls, kind_by_name, AttrShape, DefaultClassifier, TagClassifier, TagKind};
use crate::tree::{MarkupSyntax, SyntaxTree, TreeEdit, TreeMutation};

enum Part<'b> {
    Literal(Range<usize>),
    Asset(&'b LocalBinding),
}

enum Planned<'b> {
    /// Attribute value is exactly one bound URL.
    Whole {
        attribute: usize,
        value: Range<usize>,
        binding: &'b LocalBinding,
        upgrade: Option<usize>,
    },
    /// `srcset` with at least one bound candidate.
    SrcSet { attribute: usize, parts: Vec<Part<'b>> },
}

fn has_attribute(tree: &SyntaxTree, element: usize, names: &[&str]) -> bool {
    tree.elements()
        .get(element)
        .map(|el| {
            tree.attributes()[el.attributes.clone()]
                .iter()
                .any(|a| names.iter().any(|n| a.name.eq_ignore_ascii_case(n)))
        })
        .unwrap_or(false)
}

fn plan<'b>(
    tree: &SyntaxTree,
    by_url: &HashMap<&str, &'b LocalBinding>,
    component: Option<&ComponentImport>,
) -> Vec<Planned<'b>> {
    let source = tree.source();
    let mut out = Vec::new();

    for (index, attr) in tree.attributes().iter().enumerate() {
        let value = match (&attr.value, attr.expression) {
            (Some(v), false) => v.clone(),
            _ => continue,
        };
        let element = match tree.element_of(attr) {
            Some(el) => el,
            None => continue,
        };
        let composite = has_attribute(tree, attr.element, &["srcset", "data-srcset"]);
        let kind = match kind_by_name(&element.name, composite) {
            Some(k) => k,
            None => continue,
        };

        match DefaultClassifier.url_attribute(&element.name, &attr.name) {
            Some(AttrShape::Single) => {
                let raw = &source[value.clone()];
                let lead = raw.len() - raw.trim_start().len();
                let trimmed = raw.trim();
                let binding = match by_url.get(trimmed) {
                    Some(b) => *b,
                    None => continue,
                };
                let upgrade = component
                    .filter(|_| {
                        kind == TagKind::PlainImage
                            && element.name.eq_ignore_ascii_case("img")
                            && attr.name.eq_ignore_ascii_case("src")
                    })
                    .map(|_| attr.element);
                out.push(Planned::Whole {
                    attribute: index,
                    value: value.start + lead..value.start + lead + trimmed.len(),
                    binding,
                    upgrade,
                });
            }
            Some(AttrShape::SrcSet) => {
                let text = &source[value.clone()];
                let mut parts = Vec::new();
                let mut cursor = 0;
                let mut any = false;
                for candidate in candidate_urls(text) {
                    if candidate.start > cursor {
                        parts.push(Part::Literal(value.start + cursor..value.start + candidate.start));
                    }
                    match by_url.get(&text[candidate.clone()]) {
                        Some(b) => {
                            any = true;
                            parts.push(Part::Asset(*b));
                        }
                        None => parts.push(Part::Literal(
                            value.start + candidate.start..value.start + candidate.end,
                        )),
                    }
                    cursor = candidate.end;
                }
                if cursor < text.len() {
                    parts.push(Part::Literal(value.start + cursor..value.end));
                }
                if any {
                    out.push(Planned::SrcSet {
                        attribute: index,
                        parts,
                    });
                }
            }
            None => {}
        }
    }
    out
}

/// Escapes text for a JS template literal.
fn template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

pub(crate) fn rewrite_imports(
    source: &str,
    bindings: &[LocalBinding],
    component: Option<&ComponentImport>,
    syntax: &dyn MarkupSyntax,
) -> Result<Rewrite, RewriteError> {
    let tree = syntax.parse(source)?;
    let by_url = index_bindings(bindings);
    let planned = plan(&tree, &by_url, component);

    // Queue every declaration first; expressions are generated from the
    // names the prologue actually ends up with.
    let mut edit = PrologueEdit::new();
    let mut upgrades_wanted = false;
    for item in &planned {
        match item {
            Planned::Whole { binding, upgrade, .. } => {
                edit.push(default_request(binding));
                upgrades_wanted |= upgrade.is_some();
            }
            Planned::SrcSet { parts, .. } => {
                for part in parts {
                    if let Part::Asset(binding) = part {
                        edit.push(default_request(binding));
                    }
                }
            }
        }
    }
    if let (true, Some(c)) = (upgrades_wanted, component) {
        edit.push(ImportRequest::Named {
            binding: c.name.clone(),
            module: c.module.clone(),
        });
    }

    let flush = edit.apply(tree.prologue_text());
    let mut declared: HashMap<(String, String), String> = HashMap::new();
    let mut warnings: Vec<ImportError> = Vec::new();
    for (request, resolution) in &flush.resolutions {
        match resolution {
            Resolution::Declared(name) => {
                declared.insert(
                    (request.binding().to_string(), request.module().to_string()),
                    name.clone(),
                );
            }
            Resolution::Collision(err) => warnings.push(err.clone()),
        }
    }
    let name_of = |b: &LocalBinding| {
        declared
            .get(&(b.binding_name.clone(), b.document_relative_path.clone()))
            .cloned()
    };
    let component_name = component.and_then(|c| declared.get(&(c.name.clone(), c.module.clone())).cloned());

    let mut mutation = TreeMutation::new();
    let mut covered: Vec<Range<usize>> = Vec::new();
    let mut upgraded: HashSet<usize> = HashSet::new();
    let mut replaced = 0usize;

    for item in &planned {
        match item {
            Planned::Whole {
                attribute,
                value,
                binding,
                upgrade,
            } => {
                let attr = &tree.attributes()[*attribute];
                covered.push(attr.span.clone());
                replaced += 1;
                let name = match name_of(binding) {
                    Some(n) => n,
                    None => {
                        mutation.push(TreeEdit::ReplaceText {
                            span: value.clone(),
                            replacement: binding.document_relative_path.clone(),
                        });
                        continue;
                    }
                };
                match (upgrade, &component_name) {
                    (Some(element), Some(tag)) => {
                        mutation.push(TreeEdit::SetAttribute {
                            index: *attribute,
                            replacement: format!("{}={{{}}}", attr.name, name),
                        });
                        if upgraded.insert(*element) {
                            mutation.push(TreeEdit::RenameElement {
                                index: *element,
                                name: tag.clone(),
                                self_close: true,
                            });
                            if !has_attribute(&tree, *element, &["alt"]) {
                                mutation.push(TreeEdit::InsertAttribute {
                                    element: *element,
                                    text: "alt=\"\"".to_string(),
                                });
                            }
                        }
                    }
                    _ => mutation.push(TreeEdit::SetAttribute {
                        index: *attribute,
                        replacement: format!("{}={{{}.src}}", attr.name, name),
                    }),
                }
            }
            Planned::SrcSet { attribute, parts } => {
                let attr = &tree.attributes()[*attribute];
                covered.push(attr.span.clone());
                let mut template = String::new();
                for part in parts {
                    match part {
                        Part::Literal(span) => template.push_str(&template_literal(&source[span.clone()])),
                        Part::Asset(binding) => {
                            replaced += 1;
                            match name_of(binding) {
                                Some(name) => template.push_str(&format!("${{{}.src}}", name)),
                                None => template.push_str(&template_literal(&binding.document_relative_path)),
                            }
                        }
                    }
                }
                mutation.push(TreeEdit::SetAttribute {
                    index: *attribute,
                    replacement: format!("{}={{`{}`}}", attr.name, template),
                });
            }
        }
    }

    // Anything else (Markdown images, text, expression strings) gets the
    // relative path. The prologue is code and is left alone.
    let prologue_span = tree.prologue().map(|p| p.span.clone());
    for (span, binding) in find_occurrences(source, bindings)? {
        let in_prologue = prologue_span
            .as_ref()
            .map(|p| span.start >= p.start && span.end <= p.end)
            .unwrap_or(false);
        let in_attribute = covered
            .iter()
            .any(|c| span.start >= c.start && span.end <= c.end);
        if in_prologue || in_attribute {
            continue;
        }
        replaced += 1;
        mutation.push(TreeEdit::ReplaceText {
            span,
            replacement: binding.document_relative_path.clone(),
        });
    }

    if flush.changed {
        mutation.set_prologue(flush.text);
    }
    let text = syntax.serialize(&tree, &mutation)?;
    Ok(Rewrite {
        text,
        replaced,
        prologue_changed: flush.changed,
        warnings,
    })
}

fn default_request(binding: &LocalBinding) -> ImportRequest {
    ImportRequest::Default {
        binding: binding.binding_name.clone(),
        module: binding.document_relative_path.clone(),
    }
}
