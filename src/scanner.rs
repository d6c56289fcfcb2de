//! Hand-written scanner for field-fmt shell output.
//!
//! The scanner never fails: characters outside the token alphabet come out as
//! [`TokenKind::Illegal`] and it is up to the parser to reject them.

#[cfg(test)]
#[path = "./scanner_tests.rs"]
mod tests;

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// The reserved top-level keyword `ltm`.
    Ltm,
    /// A run of letters, digits and the punctuation set `. , _ - : ; / ' ( ) @ " *`.
    Ident,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `\n`
    Newline,
    /// A run of spaces and tabs.
    Whitespace,
    /// End of input.
    Eof,
    /// Any other character.
    Illegal,
}

impl TokenKind {
    /// Describes the token kind for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ltm => "the `ltm` keyword",
            TokenKind::Ident => "an identifier",
            TokenKind::LBrace => "a left brace",
            TokenKind::RBrace => "a right brace",
            TokenKind::Newline => "a newline",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Eof => "eof",
            TokenKind::Illegal => "an illegal character",
        }
    }

    /// Tokens that can stand in a key or value position.
    #[inline]
    pub fn is_word(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::Ltm)
    }
}

/// A token with its literal text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

/// Splits field-fmt text into [`Token`]s.
#[derive(Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    /// Current byte position in `source`.
    pos: usize,
    line: usize,
}

#[inline]
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            '.' | ',' | '_' | '-' | ':' | ';' | '/' | '\'' | '(' | ')' | '@' | '"' | '*'
        )
}

#[inline]
fn is_ident_char(c: char) -> bool {
    is_letter(c) || c.is_ascii_digit()
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 0,
        }
    }

    /// Number of newlines scanned so far, i.e. the zero-based line of the
    /// cursor.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current byte position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn eat_while(&mut self, pred: fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start..self.pos],
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    /// Scans the next token. Once the input is exhausted every call returns
    /// [`TokenKind::Eof`].
    pub fn scan(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        if is_whitespace(c) {
            self.eat_while(is_whitespace);
            return self.token(TokenKind::Whitespace, start);
        }

        if is_ident_char(c) {
            self.eat_while(is_ident_char);
            let token = self.token(TokenKind::Ident, start);
            if token.text == "ltm" {
                return Token {
                    kind: TokenKind::Ltm,
                    ..token
                };
            }
            return token;
        }

        self.pos += c.len_utf8();
        let kind = match c {
            '\n' => {
                self.line += 1;
                TokenKind::Newline
            }
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => TokenKind::Illegal,
        };
        self.token(kind, start)
    }

    /// Consumes the scanner, yielding every token up to, but not including,
    /// [`TokenKind::Eof`].
    pub fn tokens(mut self) -> impl Iterator<Item = Token<'src>> {
        std::iter::from_fn(move || {
            let token = self.scan();
            (token.kind != TokenKind::Eof).then_some(token)
        })
    }
}
