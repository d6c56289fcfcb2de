#![allow(clippy::question_mark)]

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

use crate::Span;
use std::fmt::{self, Debug, Display};

/// Error that can occur when parsing or decoding field-fmt output.
#[derive(Debug, Clone)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The span where the error occurs.
    pub span: Span,
    /// Zero-based line and column, available when the source text was at hand
    /// while the error was produced.
    pub line_info: Option<(usize, usize)>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span,
            line_info: None,
        }
    }
}

impl Error {
    /// Fills in [`Error::line_info`] from the document the span points into.
    pub fn with_source(mut self, source: &str) -> Self {
        if self.line_info.is_none() {
            self.line_info = Some(line_col(source, self.span.start as usize));
        }
        self
    }
}

/// Errors that can occur while turning shell output into a typed record.
#[derive(Clone)]
pub enum ErrorKind {
    /// EOF was reached while a block was still open.
    UnexpectedEof,

    /// The input is larger than the maximum supported size of 4GiB.
    FileTooLarge,

    /// A character outside the identifier alphabet was found.
    Illegal(char),

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A limit was exceeded, e.g. the block nesting depth.
    OutOfRange(&'static str),

    /// Something other than blank lines followed the closing brace of the
    /// document.
    TrailingContent,

    /// A scalar could not be converted to the destination type. Only reported
    /// by a strict [`Decoder`](crate::Decoder).
    InvalidScalar(&'static str),

    /// A custom error raised by a caller's [`Decode`](crate::Decode)
    /// implementation.
    Custom(std::borrow::Cow<'static, str>),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnexpectedEof => "unexpected-eof",
            Self::FileTooLarge => "file-too-large",
            Self::Illegal(..) => "illegal-character",
            Self::Wanted { .. } => "wanted",
            Self::OutOfRange(..) => "out-of-range",
            Self::TrailingContent => "trailing-content",
            Self::InvalidScalar(..) => "invalid-scalar",
            Self::Custom(..) => "custom",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedEof => f.write_str("unexpected eof encountered"),
            ErrorKind::FileTooLarge => f.write_str("input is too large (maximum 4GiB)"),
            ErrorKind::Illegal(c) => write!(f, "illegal character found: `{}`", Escape(*c)),
            ErrorKind::Wanted { expected, found } => write!(f, "expected {expected}, found {found}"),
            ErrorKind::OutOfRange(what) => write!(f, "out of range: {what}"),
            ErrorKind::TrailingContent => {
                f.write_str("unexpected content after the closing brace of the document")
            }
            ErrorKind::InvalidScalar(ty) => write!(f, "value is not a valid '{ty}'"),
            ErrorKind::Custom(message) => f.write_str(message),
        }
    }
}

/// Converts a byte offset into a zero-based `(line, column)` pair.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line_start = 0;
    let mut line_num = 0;
    for (i, b) in source.bytes().enumerate() {
        if i >= offset {
            return (line_num, offset - line_start);
        }
        if b == b'\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }
    (line_num, offset.saturating_sub(line_start))
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`]
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error().with_code(self.kind.to_string());

        match &self.kind {
            ErrorKind::Illegal(c) => diag.with_message(self.to_string()).with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("'{}' is not part of any token", Escape(*c))),
            ]),
            ErrorKind::Wanted { expected, .. } => {
                diag.with_message(self.to_string()).with_labels(vec![
                    Label::primary(fid, self.span).with_message(format!("expected {expected}")),
                ])
            }
            ErrorKind::UnexpectedEof => diag
                .with_message("unexpected end of input")
                .with_labels(vec![
                    Label::primary(fid, self.span).with_message("block is never closed"),
                ]),
            ErrorKind::OutOfRange(what) => diag
                .with_message(self.to_string())
                .with_labels(vec![Label::primary(fid, self.span).with_message(*what)]),
            ErrorKind::TrailingContent => diag.with_message(self.to_string()).with_labels(vec![
                Label::primary(fid, self.span).with_message("expected end of input"),
            ]),
            ErrorKind::InvalidScalar(ty) => diag
                .with_message(self.to_string())
                .with_labels(vec![
                    Label::primary(fid, self.span).with_message(format!("expected a {ty}")),
                ]),
            ErrorKind::FileTooLarge | ErrorKind::Custom(_) => diag
                .with_message(self.to_string())
                .with_labels(vec![Label::primary(fid, self.span)]),
        }
    }
}
