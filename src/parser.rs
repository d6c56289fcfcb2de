// Recursive descent over the scanner's token stream. Whitespace tokens are
// skipped on peek; newlines are kept because they end entries.

use crate::{
    Span,
    error::{Error, ErrorKind, line_col},
    node::{Block, Entity, Entry, Scalar, Value},
    scanner::{Scanner, Token, TokenKind},
    tracing_macros::debug,
};
use std::borrow::Cow;

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized, no drop glue.
// When a method returns Err(ParseError), the full error details have already
// been written into Parser::error_kind / Parser::error_span.
// ---------------------------------------------------------------------------

#[derive(Copy, Clone)]
struct ParseError;

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    source: &'a str,
    scanner: Scanner<'a>,
    peeked: Option<Token<'a>>,
    depth: u16,

    // Error context -- populated just before returning ParseError
    error_span: Span,
    error_kind: Option<ErrorKind>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            source,
            scanner: Scanner::new(source),
            peeked: None,
            depth: 0,
            error_span: Span::new(0, 0),
            error_kind: None,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    fn set_error(&mut self, span: Span, kind: ErrorKind) -> ParseError {
        self.error_span = span;
        self.error_kind = Some(kind);
        ParseError
    }

    #[cold]
    fn unexpected(&mut self, token: Token<'a>, expected: &'static str) -> ParseError {
        let kind = match token.kind {
            TokenKind::Eof => ErrorKind::UnexpectedEof,
            TokenKind::Illegal => match token.text.chars().next() {
                Some(c) => ErrorKind::Illegal(c),
                None => ErrorKind::UnexpectedEof,
            },
            other => ErrorKind::Wanted {
                expected,
                found: other.describe(),
            },
        };
        self.set_error(token.span, kind)
    }

    fn take_error(&mut self) -> Error {
        let kind = self.error_kind.take().unwrap_or(ErrorKind::UnexpectedEof);
        let span = self.error_span;
        Error {
            kind,
            span,
            line_info: Some(line_col(self.source, span.start as usize)),
        }
    }

    // -- token operations ---------------------------------------------------

    fn peek(&mut self) -> Token<'a> {
        if let Some(token) = self.peeked {
            return token;
        }
        let token = loop {
            let token = self.scanner.scan();
            if token.kind != TokenKind::Whitespace {
                break token;
            }
        };
        self.peeked = Some(token);
        token
    }

    fn next(&mut self) -> Token<'a> {
        let token = self.peek();
        self.peeked = None;
        token
    }

    fn eat_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.next();
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.next();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    /// After a closing brace only a newline, another closing brace or the
    /// end of input may follow on the same line.
    fn expect_line_end(&mut self) -> Result<(), ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected(token, "a newline")),
        }
    }

    // -- grammar ------------------------------------------------------------

    fn entity(&mut self) -> Result<Entity<'a>, ParseError> {
        let ltm = match self.expect(TokenKind::Ltm, "the `ltm` keyword") {
            Ok(token) => token,
            Err(e) => return Err(e),
        };

        let mut words: Vec<&'a str> = Vec::new();
        let open = loop {
            let token = self.next();
            match token.kind {
                TokenKind::Ident | TokenKind::Ltm => words.push(token.text),
                TokenKind::LBrace if !words.is_empty() => break token,
                _ => return Err(self.unexpected(token, "an entity name")),
            }
        };

        let body = match self.block(open.span) {
            Ok(block) => block,
            Err(e) => return Err(e),
        };

        let Some((name, path)) = words.split_last() else {
            return Err(self.unexpected(open, "an entity name"));
        };
        let component = match path {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(*single),
            _ => Cow::Owned(path.join("-")),
        };
        debug!("parsed entity {:?} with component {:?}", name, component);

        Ok(Entity {
            component,
            name: *name,
            span: ltm.span.join(body.span),
            body,
        })
    }

    /// Parses entries up to and including the closing brace. `open` is the
    /// span of the already consumed opening brace.
    fn block(&mut self, open: Span) -> Result<Block<'a>, ParseError> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(self.set_error(open, ErrorKind::OutOfRange("Max recursion depth exceeded")));
        }
        self.depth += 1;
        let block = self.block_entries(open);
        self.depth -= 1;
        block
    }

    fn block_entries(&mut self, open: Span) -> Result<Block<'a>, ParseError> {
        let mut entries = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Newline => {}
                TokenKind::RBrace => {
                    return Ok(Block {
                        entries,
                        span: open.join(token.span),
                    });
                }
                TokenKind::Ident | TokenKind::Ltm => match self.entry(token) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => return Err(e),
                },
                _ => return Err(self.unexpected(token, "a key or a right brace")),
            }
        }
    }

    fn entry(&mut self, key: Token<'a>) -> Result<Entry<'a>, ParseError> {
        let token = self.peek();
        let value = match token.kind {
            // Bare key: the value is absent rather than empty.
            TokenKind::Newline => {
                self.next();
                None
            }
            TokenKind::RBrace | TokenKind::Eof => None,
            TokenKind::LBrace => {
                self.next();
                let block = match self.block(token.span) {
                    Ok(block) => block,
                    Err(e) => return Err(e),
                };
                if let Err(e) = self.expect_line_end() {
                    return Err(e);
                }
                Some(Value::Block(block))
            }
            TokenKind::Ident | TokenKind::Ltm => match self.scalar(token) {
                Ok(scalar) => Some(Value::Scalar(scalar)),
                Err(e) => return Err(e),
            },
            _ => return Err(self.unexpected(token, "a value or a newline")),
        };

        Ok(Entry {
            key: key.text,
            key_span: key.span,
            value,
        })
    }

    /// Reads the words of a scalar value up to the end of the line. The text
    /// between the first and last word, whitespace included, is the value.
    fn scalar(&mut self, first: Token<'a>) -> Result<Scalar<'a>, ParseError> {
        self.next();
        let mut last = first;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Ident | TokenKind::Ltm => {
                    self.next();
                    last = token;
                }
                TokenKind::Newline => {
                    self.next();
                    break;
                }
                TokenKind::RBrace | TokenKind::Eof => break,
                _ => return Err(self.unexpected(token, "a newline")),
            }
        }

        let source = self.source;
        let span = first.span.join(last.span);
        Ok(Scalar {
            text: &source[span.start as usize..span.end as usize],
            span,
        })
    }

    /// Skips blank lines and reports whether another document follows.
    fn at_document_start(&mut self) -> bool {
        self.eat_newlines();
        self.peek().kind != TokenKind::Eof
    }

    fn document(&mut self) -> Result<Entity<'a>, ParseError> {
        self.eat_newlines();
        let entity = match self.entity() {
            Ok(entity) => entity,
            Err(e) => return Err(e),
        };
        self.eat_newlines();
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            return Err(self.set_error(token.span, ErrorKind::TrailingContent));
        }
        Ok(entity)
    }

    fn documents(&mut self) -> Result<Vec<Entity<'a>>, ParseError> {
        let mut entities = Vec::new();
        while self.at_document_start() {
            match self.entity() {
                Ok(entity) => entities.push(entity),
                Err(e) => return Err(e),
            }
            let token = self.peek();
            if !matches!(token.kind, TokenKind::Newline | TokenKind::Eof) {
                return Err(self.set_error(token.span, ErrorKind::TrailingContent));
            }
        }
        Ok(entities)
    }
}

// ---------------------------------------------------------------------------
// Top-level parse entry points
// ---------------------------------------------------------------------------

const MAX_SIZE: usize = u32::MAX as usize;

/// Maximum number of nested blocks, the entity body included.
const MAX_RECURSION_DEPTH: u16 = 256;

fn check_size(s: &str) -> Result<(), Error> {
    if s.len() > MAX_SIZE {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::new(0, 0),
            line_info: None,
        });
    }
    Ok(())
}

/// Parses a single `ltm ... { ... }` document into its syntax tree.
///
/// Blank lines before and after the document are ignored; anything else
/// after the closing brace is an error.
pub fn parse(s: &str) -> Result<Entity<'_>, Error> {
    check_size(s)?;
    let mut parser = Parser::new(s);
    match parser.document() {
        Ok(entity) => Ok(entity),
        Err(_) => Err(parser.take_error()),
    }
}

/// Parses any number of back-to-back documents, as printed by the shell when
/// a command lists several objects.
pub fn parse_all(s: &str) -> Result<Vec<Entity<'_>>, Error> {
    check_size(s)?;
    let mut parser = Parser::new(s);
    match parser.documents() {
        Ok(entities) => Ok(entities),
        Err(_) => Err(parser.take_error()),
    }
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
