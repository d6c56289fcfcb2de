//! The syntax tree produced by the parser.
//!
//! The tree is schema-agnostic: a [`Block`] is just an ordered list of
//! [`Entry`]s whether the destination later treats it as a record, a list of
//! named sub-blocks or a map keyed by sub-block name. All text is borrowed
//! from the parsed input.

#[cfg(test)]
#[path = "./node_tests.rs"]
mod tests;

use crate::Span;
use std::borrow::Cow;

/// Root of the tree: one `ltm <component...> <name> { ... }` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<'de> {
    /// Words between `ltm` and the name, joined with `-`.
    ///
    /// `ltm profile client-ssl foo {` gives `profile-client-ssl`.
    pub component: Cow<'de, str>,
    /// The last identifier before the opening brace.
    pub name: &'de str,
    /// The brace-delimited body.
    pub body: Block<'de>,
    /// From the `ltm` keyword to the closing brace.
    pub span: Span,
}

/// A brace-delimited, ordered sequence of entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block<'de> {
    pub entries: Vec<Entry<'de>>,
    /// From the opening to the closing brace, inclusive.
    pub span: Span,
}

/// One `key [value]` line inside a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'de> {
    /// Raw key text. Dots are part of the key, `serverside.bits-in` is not a
    /// path.
    pub key: &'de str,
    pub key_span: Span,
    /// `None` for a bare key such as `status.status-reason` with nothing
    /// after it.
    pub value: Option<Value<'de>>,
}

/// The value of an [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'de> {
    Scalar(Scalar<'de>),
    Block(Block<'de>),
}

/// A leaf value: the raw text from the first to the last word of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar<'de> {
    pub text: &'de str,
    pub span: Span,
}

impl<'de> Block<'de> {
    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the block has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in source order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<'de>> {
        self.entries.iter()
    }

    /// Returns the first entry whose key is exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Entry<'de>> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Returns the scalar text of the first entry named `key`, if it has one.
    pub fn get_str(&self, key: &str) -> Option<&'de str> {
        self.get(key).and_then(Entry::as_str)
    }
}

impl<'a, 'de> IntoIterator for &'a Block<'de> {
    type Item = &'a Entry<'de>;
    type IntoIter = std::slice::Iter<'a, Entry<'de>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'de> Entry<'de> {
    /// Returns `true` when nothing follows the key on its line.
    #[inline]
    pub fn is_bare(&self) -> bool {
        self.value.is_none()
    }

    /// The scalar text, if the value is a scalar.
    pub fn as_str(&self) -> Option<&'de str> {
        match &self.value {
            Some(Value::Scalar(scalar)) => Some(scalar.text),
            _ => None,
        }
    }

    /// The nested block, if the value is a block.
    pub fn as_block(&self) -> Option<&Block<'de>> {
        match &self.value {
            Some(Value::Block(block)) => Some(block),
            _ => None,
        }
    }

    /// Span of the whole entry, key included.
    pub fn span(&self) -> Span {
        match &self.value {
            Some(value) => self.key_span.join(value.span()),
            None => self.key_span,
        }
    }
}

impl<'de> Value<'de> {
    pub fn span(&self) -> Span {
        match self {
            Value::Scalar(scalar) => scalar.span,
            Value::Block(block) => block.span,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar<'de>> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            Value::Block(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&'de str> {
        self.as_scalar().map(|scalar| scalar.text)
    }

    pub fn as_block(&self) -> Option<&Block<'de>> {
        match self {
            Value::Block(block) => Some(block),
            Value::Scalar(_) => None,
        }
    }

    /// Describes the value kind for diagnostics.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "a scalar",
            Value::Block(_) => "a block",
        }
    }
}
