//! Minimal JavaScript/TypeScript tokenizer for module prologues.
//!
//! Just enough to find import statements reliably: identifiers, string
//! literals and single-character punctuation, with comments and template
//! literals skipped so their contents can never look like code.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// String literal; `quote` is `'` or `"`.
    Str { quote: char },
    /// Template literal (opaque).
    Template,
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
    /// A line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.clone()]
    }

    /// Contents of a string literal without its quotes.
    pub fn string_value<'a>(&self, src: &'a str) -> Option<&'a str> {
        match self.kind {
            TokenKind::Str { .. } if self.span.len() >= 2 => {
                Some(&src[self.span.start + 1..self.span.end - 1])
            }
            _ => None,
        }
    }

    pub fn is_ident(&self, src: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == word
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenizes `src`. Never fails: unterminated strings end at the line end,
/// unterminated comments and templates at the end of input.
pub fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    let mut newline_before = false;

    while let Some((start, c)) = chars.next() {
        if c == '\n' {
            newline_before = true;
            continue;
        }
        if c.is_whitespace() {
            continue;
        }

        if c == '/' {
            match chars.peek().map(|&(_, n)| n) {
                Some('/') => {
                    while let Some(&(_, n)) = chars.peek() {
                        if n == '\n' {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for (_, n) in chars.by_ref() {
                        if n == '\n' {
                            newline_before = true;
                        }
                        if prev == '*' && n == '/' {
                            break;
                        }
                        prev = n;
                    }
                    continue;
                }
                _ => {}
            }
        }

        let kind;
        let mut end = start + c.len_utf8();
        if c == '"' || c == '\'' {
            kind = TokenKind::Str { quote: c };
            let mut escaped = false;
            while let Some(&(i, n)) = chars.peek() {
                if n == '\n' {
                    break;
                }
                chars.next();
                end = i + n.len_utf8();
                if escaped {
                    escaped = false;
                } else if n == '\\' {
                    escaped = true;
                } else if n == c {
                    break;
                }
            }
        } else if c == '`' {
            kind = TokenKind::Template;
            let mut escaped = false;
            for (i, n) in chars.by_ref() {
                end = i + n.len_utf8();
                if escaped {
                    escaped = false;
                } else if n == '\\' {
                    escaped = true;
                } else if n == '`' {
                    break;
                }
            }
        } else if is_ident_start(c) {
            kind = TokenKind::Ident;
            while let Some(&(i, n)) = chars.peek() {
                if !is_ident_continue(n) {
                    break;
                }
                chars.next();
                end = i + n.len_utf8();
            }
        } else if c.is_ascii_digit() {
            // Numbers only matter as "not an import"; fold into an identifier-like token.
            kind = TokenKind::Ident;
            while let Some(&(i, n)) = chars.peek() {
                if !(n.is_ascii_alphanumeric() || n == '.' || n == '_') {
                    break;
                }
                chars.next();
                end = i + n.len_utf8();
            }
        } else {
            kind = TokenKind::Punct(c);
        }

        tokens.push(Token {
            kind,
            span: start..end,
            newline_before,
        });
        newline_before = false;
    }
    tokens
}
