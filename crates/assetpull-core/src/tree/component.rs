use super::{
    AttributeNode, ElementNode, MarkupSyntax, PrologueNode, SyntaxTree, TreeEdit, TreeError,
    TreeMutation,
};
use crate::document::Splices;
use crate::markup::{self, FenceScan};

/// Component files with a `---` fenced script block at the top (the block
/// holds the module imports) followed by HTML-like template markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentSyntax;

fn bom_len(text: &str) -> usize {
    if text.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    }
}

fn with_trailing_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

impl MarkupSyntax for ComponentSyntax {
    fn parse(&self, text: &str) -> Result<SyntaxTree, TreeError> {
        let (scan, fence) = markup::leading_fence(text);
        let prologue = match (scan, fence) {
            (FenceScan::Unterminated, _) => return Err(TreeError::UnterminatedFence),
            (FenceScan::Found, Some(f)) => Some(PrologueNode {
                content: f.content,
                span: bom_len(text)..f.end,
            }),
            _ => None,
        };
        let body = prologue.as_ref().map(|p| p.span.end).unwrap_or(0);

        let mut elements = Vec::new();
        let mut attributes = Vec::new();
        for (index, el) in markup::elements(text, body).into_iter().enumerate() {
            let first = attributes.len();
            for attr in &el.attributes {
                attributes.push(AttributeNode {
                    element: index,
                    name: attr.name.to_string(),
                    span: attr.span.clone(),
                    value: attr.value.clone(),
                    expression: attr.expression,
                });
            }
            elements.push(ElementNode {
                name: el.name.to_string(),
                self_closing: text[el.span.clone()].ends_with("/>"),
                span: el.span,
                attributes: first..attributes.len(),
            });
        }

        Ok(SyntaxTree::new(text, prologue, elements, attributes))
    }

    fn serialize(&self, tree: &SyntaxTree, mutation: &TreeMutation) -> Result<String, TreeError> {
        let source = tree.source();
        let mut splices = Splices::new();

        for edit in mutation.edits() {
            match edit {
                TreeEdit::SetAttribute { index, replacement } => {
                    let attr = tree.attributes().get(*index).ok_or(TreeError::UnknownNode {
                        kind: "attribute",
                        index: *index,
                    })?;
                    splices.replace(source, attr.span.clone(), replacement.clone())?;
                }
                TreeEdit::RenameElement {
                    index,
                    name,
                    self_close,
                } => {
                    let el = tree.elements().get(*index).ok_or(TreeError::UnknownNode {
                        kind: "element",
                        index: *index,
                    })?;
                    splices.replace(source, el.name_span(), name.clone())?;
                    if *self_close && !el.self_closing && source[el.span.clone()].ends_with('>') {
                        splices.replace(source, el.span.end - 1..el.span.end, " />")?;
                    }
                }
                TreeEdit::InsertAttribute { element, text } => {
                    let el = tree.elements().get(*element).ok_or(TreeError::UnknownNode {
                        kind: "element",
                        index: *element,
                    })?;
                    let at = el.name_span().end;
                    splices.replace(source, at..at, format!(" {}", text))?;
                }
                TreeEdit::ReplaceText { span, replacement } => {
                    splices.replace(source, span.clone(), replacement.clone())?;
                }
            }
        }

        if let Some(text) = mutation.prologue() {
            match tree.prologue() {
                Some(node) => splices.replace(source, node.content.clone(), text)?,
                None => {
                    let at = bom_len(source);
                    let block = format!("---\n{}---\n\n", with_trailing_newline(text));
                    splices.replace(source, at..at, block)?;
                }
            }
        }

        Ok(splices.apply(source))
    }
}
