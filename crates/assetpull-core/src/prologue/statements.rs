//! Import statement recognition on top of the token stream.

use std::ops::Range;

use super::lexer::{tokenize, Token, TokenKind};

/// `{ ... }` clause of an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedClause {
    /// Offset of `{`.
    pub open: usize,
    /// Offset of `}`.
    pub close: usize,
    /// Local names bound by the clause (`a`, or `b` for `a as b`).
    pub locals: Vec<String>,
}

/// One `import ... from "specifier"` (or `import "specifier"`) statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// From `import` through the specifier string, plus a trailing `;` if present.
    pub span: Range<usize>,
    pub specifier: String,
    pub quote: char,
    pub default_binding: Option<String>,
    /// End offset of the default binding identifier.
    pub default_end: Option<usize>,
    pub namespace: Option<String>,
    pub named: Option<NamedClause>,
    pub type_only: bool,
    pub has_semicolon: bool,
}

impl ImportStatement {
    /// Every local name this statement binds.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.default_binding
            .iter()
            .map(String::as_str)
            .chain(self.namespace.iter().map(String::as_str))
            .chain(
                self.named
                    .iter()
                    .flat_map(|n| n.locals.iter().map(String::as_str)),
            )
    }

    pub fn binds(&self, name: &str) -> bool {
        self.locals().any(|l| l == name)
    }
}

struct Cursor<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek().map(|t| t.is_punct(c)).unwrap_or(false) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if self.peek().map(|t| t.is_ident(self.src, word)).unwrap_or(false) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => {
                self.pos += 1;
                Some(t.text(self.src))
            }
            _ => None,
        }
    }
}

/// Parses the `{ a, b as c, type d }` clause; cursor sits on `{`.
fn parse_named(cur: &mut Cursor<'_>) -> Option<NamedClause> {
    let open = cur.peek()?.span.start;
    cur.bump();
    let mut locals = Vec::new();
    loop {
        let t = cur.peek()?;
        if t.is_punct('}') {
            cur.bump();
            return Some(NamedClause {
                open,
                close: t.span.start,
                locals,
            });
        }
        if cur.eat_punct(',') {
            continue;
        }
        let mut name = match t.kind {
            TokenKind::Ident => t.text(cur.src).to_string(),
            // `"string name" as local`
            TokenKind::Str { .. } => t.string_value(cur.src).unwrap_or_default().to_string(),
            _ => return None,
        };
        cur.bump();
        if name == "type" {
            if let Some(next) = cur.peek() {
                if next.kind == TokenKind::Ident && !next.is_ident(cur.src, "as") {
                    name = next.text(cur.src).to_string();
                    cur.bump();
                }
            }
        }
        if cur.eat_ident("as") {
            name = cur.ident()?.to_string();
        }
        locals.push(name);
    }
}

/// Parses one statement; cursor sits just after `import`.
fn parse_import(cur: &mut Cursor<'_>, start: usize) -> Option<ImportStatement> {
    let mut stmt = ImportStatement {
        span: start..start,
        specifier: String::new(),
        quote: '"',
        default_binding: None,
        default_end: None,
        namespace: None,
        named: None,
        type_only: false,
        has_semicolon: false,
    };

    let first = cur.peek()?;
    if !matches!(first.kind, TokenKind::Str { .. }) {
        if cur.peek()?.is_ident(cur.src, "type") {
            let after = cur.tokens.get(cur.pos + 1)?;
            if !after.is_ident(cur.src, "from") && !after.is_punct(',') {
                cur.bump();
                stmt.type_only = true;
            }
        }
        loop {
            let t = cur.peek()?;
            if t.is_punct('{') {
                stmt.named = Some(parse_named(cur)?);
            } else if t.is_punct('*') {
                cur.bump();
                if !cur.eat_ident("as") {
                    return None;
                }
                stmt.namespace = Some(cur.ident()?.to_string());
            } else if t.kind == TokenKind::Ident && !t.is_ident(cur.src, "from") {
                cur.bump();
                stmt.default_binding = Some(t.text(cur.src).to_string());
                stmt.default_end = Some(t.span.end);
            } else {
                return None;
            }
            if !cur.eat_punct(',') {
                break;
            }
        }
        if !cur.eat_ident("from") {
            return None;
        }
    }

    let spec = cur.bump()?;
    let quote = match spec.kind {
        TokenKind::Str { quote } => quote,
        _ => return None,
    };
    stmt.quote = quote;
    stmt.specifier = spec.string_value(cur.src)?.to_string();
    stmt.span.end = spec.span.end;

    // Import attributes: `with { type: "json" }` / `assert { ... }`.
    if let Some(t) = cur.peek() {
        if !t.newline_before && (t.is_ident(cur.src, "with") || t.is_ident(cur.src, "assert")) {
            cur.bump();
            if cur.peek().map(|t| t.is_punct('{')).unwrap_or(false) {
                while let Some(t) = cur.bump() {
                    if t.is_punct('}') {
                        stmt.span.end = t.span.end;
                        break;
                    }
                }
            }
        }
    }

    if let Some(t) = cur.peek() {
        if t.is_punct(';') {
            cur.bump();
            stmt.span.end = t.span.end;
            stmt.has_semicolon = true;
        }
    }
    Some(stmt)
}

/// Finds every static import statement in `src`, in order.
///
/// `import(...)` and `import.meta` are not statements and are ignored, as is
/// anything inside strings, template literals and comments.
pub fn find_imports(src: &str) -> Vec<ImportStatement> {
    let tokens = tokenize(src);
    let mut cur = Cursor {
        src,
        tokens: &tokens,
        pos: 0,
    };
    let mut out = Vec::new();
    let mut prev: Option<&Token> = None;

    while let Some(t) = cur.bump() {
        let at_statement_start = match prev {
            None => true,
            Some(p) => t.newline_before || p.is_punct(';') || p.is_punct('}'),
        };
        let is_import = at_statement_start
            && t.is_ident(src, "import")
            && !cur
                .peek()
                .map(|n| n.is_punct('(') || n.is_punct('.'))
                .unwrap_or(true);
        if is_import {
            let checkpoint = cur.pos;
            match parse_import(&mut cur, t.span.start) {
                Some(stmt) => {
                    prev = cur.tokens.get(cur.pos.saturating_sub(1));
                    out.push(stmt);
                    continue;
                }
                None => cur.pos = checkpoint,
            }
        }
        prev = Some(t);
    }
    out
}
