//! Markup syntax tree used by the import rewrite strategy.
//!
//! A `SyntaxTree` is an immutable value: it is produced by a `MarkupSyntax`
//! parser, read by the rewriter, and handed back to the same syntax together
//! with a `TreeMutation` describing the splices to make. Serialization applies
//! every splice against the original source once, then the tree is dropped.

mod component;

pub use component::ComponentSyntax;

use std::ops::Range;

use thiserror::Error;

use crate::document::SpliceError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("prologue fence opened at the top of the document is never closed")]
    UnterminatedFence,
    #[error("no {kind} node with index {index}")]
    UnknownNode { kind: &'static str, index: usize },
    #[error("conflicting edits: {0}")]
    Splice(#[from] SpliceError),
}

/// Leading module block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrologueNode {
    /// Contents between the fences (fences excluded).
    pub content: Range<usize>,
    /// Whole block, fences included.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub name: String,
    /// Whole start tag, `<` through `>`.
    pub span: Range<usize>,
    pub self_closing: bool,
    /// Indices into `SyntaxTree::attributes`.
    pub attributes: Range<usize>,
}

impl ElementNode {
    /// Span of the tag name right after `<`.
    pub fn name_span(&self) -> Range<usize> {
        self.span.start + 1..self.span.start + 1 + self.name.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    /// Index into `SyntaxTree::elements`.
    pub element: usize,
    pub name: String,
    pub span: Range<usize>,
    pub value: Option<Range<usize>>,
    pub expression: bool,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    prologue: Option<PrologueNode>,
    elements: Vec<ElementNode>,
    attributes: Vec<AttributeNode>,
}

impl SyntaxTree {
    pub fn new(
        source: impl Into<String>,
        prologue: Option<PrologueNode>,
        elements: Vec<ElementNode>,
        attributes: Vec<AttributeNode>,
    ) -> Self {
        Self {
            source: source.into(),
            prologue,
            elements,
            attributes,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The prologue node, if the document has one.
    pub fn prologue(&self) -> Option<&PrologueNode> {
        self.prologue.as_ref()
    }

    /// Prologue contents, or the empty string when there is none.
    pub fn prologue_text(&self) -> &str {
        self.prologue
            .as_ref()
            .map(|p| &self.source[p.content.clone()])
            .unwrap_or("")
    }

    pub fn elements(&self) -> &[ElementNode] {
        &self.elements
    }

    pub fn attributes(&self) -> &[AttributeNode] {
        &self.attributes
    }

    pub fn element_of(&self, attribute: &AttributeNode) -> Option<&ElementNode> {
        self.elements.get(attribute.element)
    }

    /// Raw value text of an attribute.
    pub fn value_text(&self, attribute: &AttributeNode) -> Option<&str> {
        attribute.value.as_ref().map(|v| &self.source[v.clone()])
    }
}

/// One described change to a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    /// Replace a whole attribute (name through closing delimiter).
    SetAttribute { index: usize, replacement: String },
    /// Rename an element's tag and optionally make it self-closing.
    RenameElement {
        index: usize,
        name: String,
        self_close: bool,
    },
    /// Add an attribute right after an element's tag name.
    InsertAttribute { element: usize, text: String },
    /// Replace a span of body text.
    ReplaceText { span: Range<usize>, replacement: String },
}

#[derive(Debug, Clone, Default)]
pub struct TreeMutation {
    edits: Vec<TreeEdit>,
    prologue: Option<String>,
}

impl TreeMutation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: TreeEdit) {
        self.edits.push(edit);
    }

    /// Replaces the prologue contents (creating the prologue if needed).
    pub fn set_prologue(&mut self, text: impl Into<String>) {
        self.prologue = Some(text.into());
    }

    pub fn edits(&self) -> &[TreeEdit] {
        &self.edits
    }

    pub fn prologue(&self) -> Option<&str> {
        self.prologue.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.prologue.is_none()
    }
}

/// Parser/serializer pair for one markup dialect.
pub trait MarkupSyntax: Send + Sync {
    fn parse(&self, text: &str) -> Result<SyntaxTree, TreeError>;

    /// Applies `mutation` to `tree` and returns the full document text.
    fn serialize(&self, tree: &SyntaxTree, mutation: &TreeMutation) -> Result<String, TreeError>;
}
