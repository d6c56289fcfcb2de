#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] for the syntax tree, [`Span`] and
//! [`Spanned`], so a parsed document can be dumped as JSON or YAML for
//! inspection.
//!
//! Blocks serialize as maps in source order with bare keys as `null`.

use crate::{Block, Entity, Entry, Scalar, Span, Spanned, Value};
use serde::ser::{SerializeMap, SerializeStruct};

impl serde::Serialize for Span {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Span", 2)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end)?;
        state.end()
    }
}

impl<T> serde::Serialize for Spanned<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl serde::Serialize for Entity<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Entity", 3)?;
        state.serialize_field("component", &*self.component)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("body", &self.body)?;
        state.end()
    }
}

impl serde::Serialize for Block<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for entry in self {
            map.serialize_entry(entry.key, &entry.value)?;
        }
        map.end()
    }
}

impl serde::Serialize for Entry<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Entry", 2)?;
        state.serialize_field("key", self.key)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl serde::Serialize for Value<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Block(block) => block.serialize(serializer),
        }
    }
}

impl serde::Serialize for Scalar<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.text)
    }
}
