#[cfg(test)]
#[path = "./de_tests.rs"]
mod tests;

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::{
    Error, ErrorKind, Span,
    node::{Block, Entity, Scalar, Value},
    parser,
    record::{self, Record},
    tracing_macros::trace,
};

/// State shared by every [`Decode`] call of a single decode.
///
/// Decoding is lenient: shape mismatches, unknown keys and unparseable
/// scalars are absorbed and the destination keeps (or resets to) its default.
/// A strict context additionally records unparseable scalars as errors.
#[derive(Debug, Default)]
pub struct Context {
    strict: bool,
    errors: Vec<Error>,
    // Value of the most recent shape mismatch.
    last_mismatch: Option<Span>,
}

impl Context {
    /// A lenient context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that records unparseable scalars as errors.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Errors recorded so far. Always empty for a lenient context unless a
    /// [`Decode`] implementation pushed one itself.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    #[cold]
    pub fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Reports a scalar that could not be converted to `ty`.
    #[cold]
    pub fn invalid_scalar(&mut self, scalar: &Scalar<'_>, ty: &'static str) {
        trace!("cannot read {:?} as {}, using the default", scalar.text, ty);
        if self.strict {
            self.errors.push(Error::from((ErrorKind::InvalidScalar(ty), scalar.span)));
        }
    }

    /// Reports a value whose shape does not fit the destination. Never an
    /// error, even in strict mode.
    ///
    /// Custom [`Decode`] implementations should call this when they reject a
    /// value so that an enclosing `Option` stays `None`.
    #[cold]
    pub fn shape_mismatch(&mut self, expected: &'static str, found: &Value<'_>) {
        self.last_mismatch = Some(found.span());
        trace!(
            "expected {} but found {} at {:?}, leaving the destination untouched",
            expected,
            found.type_str(),
            found.span()
        );
    }

    pub(crate) fn unknown_key(&mut self, key: &str, span: Span) {
        trace!("ignoring unknown key {:?} at {:?}", key, span);
    }

    fn finish(mut self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors.swap_remove(0))
        }
    }
}

/// A destination that a [`Value`] can be decoded into.
///
/// Decoding writes into an existing value instead of constructing a new one,
/// so a bare key or a mismatched value leaves the destination as it was.
/// The trait is object safe: [`Record::field`] hands out `&mut dyn Decode`.
pub trait Decode {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>);
}

impl Decode for String {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        match value {
            Value::Scalar(scalar) => {
                self.clear();
                self.push_str(scalar.text);
            }
            Value::Block(_) => ctx.shape_mismatch("a string", value),
        }
    }
}

impl Decode for Box<str> {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        match value {
            Value::Scalar(scalar) => *self = scalar.text.into(),
            Value::Block(_) => ctx.shape_mismatch("a string", value),
        }
    }
}

impl Decode for bool {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        let Some(scalar) = value.as_scalar() else {
            return ctx.shape_mismatch("a bool", value);
        };
        *self = match scalar.text {
            "true" => true,
            "false" => false,
            _ => {
                ctx.invalid_scalar(scalar, "bool");
                false
            }
        };
    }
}

// Integers parse base 10; anything else, magnitude suffixes like `36.2K`
// included, resets the destination to zero.
macro_rules! number {
    ($($num:ty),+) => {$(
        impl Decode for $num {
            fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
                let Some(scalar) = value.as_scalar() else {
                    return ctx.shape_mismatch(concat!("a ", stringify!($num)), value);
                };
                *self = match scalar.text.parse::<$num>() {
                    Ok(n) => n,
                    Err(_) => {
                        ctx.invalid_scalar(scalar, stringify!($num));
                        <$num>::default()
                    }
                };
            }
        }
    )+};
}

number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// `None` stays `None` for a bare or absent key, or a value of the wrong
/// shape, which tells "missing" apart from "present but default".
impl<T: Decode + Default> Decode for Option<T> {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        if let Some(inner) = self {
            return inner.decode(ctx, value);
        }
        let mut inner = T::default();
        ctx.last_mismatch = None;
        inner.decode(ctx, value);
        if ctx.last_mismatch != Some(value.span()) {
            *self = Some(inner);
        }
    }
}

/// A block decodes into a list of its entries' values in source order. The
/// entry keys (e.g. the `api01.example.com:8080` member header) are dropped.
impl<T: Decode + Default> Decode for Vec<T> {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        let Some(block) = value.as_block() else {
            return ctx.shape_mismatch("a block of list items", value);
        };
        self.clear();
        self.reserve(block.len());
        for entry in block {
            let mut item = T::default();
            if let Some(value) = &entry.value {
                item.decode(ctx, value);
            }
            self.push(item);
        }
    }
}

fn decode_map_entries<T: Decode + Default>(
    ctx: &mut Context,
    block: &Block<'_>,
    mut insert: impl FnMut(String, T),
) {
    for entry in block {
        let mut item = T::default();
        if let Some(value) = &entry.value {
            item.decode(ctx, value);
        }
        insert(entry.key.to_owned(), item);
    }
}

/// A block decodes into a map keyed by each entry's key text, verbatim.
impl<T: Decode + Default, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        let Some(block) = value.as_block() else {
            return ctx.shape_mismatch("a block of named entries", value);
        };
        self.clear();
        self.reserve(block.len());
        decode_map_entries(ctx, block, |key, item| {
            self.insert(key, item);
        });
    }
}

impl<T: Decode + Default> Decode for BTreeMap<String, T> {
    fn decode(&mut self, ctx: &mut Context, value: &Value<'_>) {
        let Some(block) = value.as_block() else {
            return ctx.shape_mismatch("a block of named entries", value);
        };
        self.clear();
        decode_map_entries(ctx, block, |key, item| {
            self.insert(key, item);
        });
    }
}

/// Parses and decodes field-fmt text with a chosen strictness.
///
/// The free functions ([`from_str`](crate::from_str),
/// [`decode_into`](crate::decode_into), ...) use the default, lenient
/// decoder.
///
/// ```
/// use field_fmt::{Decoder, ErrorKind};
///
/// #[derive(Debug, Default)]
/// struct Member {
///     port: u16,
/// }
///
/// field_fmt::impl_record!(Member { "port" => port });
///
/// let text = "ltm pool-member m {\n    port http\n}";
///
/// let lenient: Member = Decoder::new().from_str(text)?;
/// assert_eq!(lenient.port, 0);
///
/// let err = Decoder::new().strict(true).from_str::<Member>(text).unwrap_err();
/// assert!(matches!(err.kind, ErrorKind::InvalidScalar("u16")));
/// # Ok::<(), field_fmt::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    strict: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns unparseable scalars into [`ErrorKind::InvalidScalar`] errors
    /// instead of silently using the default value.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn context(&self) -> Context {
        if self.strict {
            Context::strict()
        } else {
            Context::new()
        }
    }

    /// Decodes an already parsed entity into `out`.
    pub fn decode_entity<R: Record + ?Sized>(
        &self,
        entity: &Entity<'_>,
        out: &mut R,
    ) -> Result<(), Error> {
        let mut ctx = self.context();
        record::decode_entity(out, &mut ctx, entity);
        ctx.finish()
    }

    /// Parses `text` and decodes it on top of the current contents of `out`.
    pub fn decode_into<R: Record + ?Sized>(&self, text: &str, out: &mut R) -> Result<(), Error> {
        let entity = parser::parse(text)?;
        match self.decode_entity(&entity, out) {
            Ok(()) => Ok(()),
            Err(e) => Err(e.with_source(text)),
        }
    }

    /// Parses `text` and decodes it into a fresh `R`.
    pub fn from_str<R: Record + Default>(&self, text: &str) -> Result<R, Error> {
        let mut out = R::default();
        self.decode_into(text, &mut out)?;
        Ok(out)
    }

    /// Parses several back-to-back documents, decoding each into a fresh `R`.
    pub fn from_str_all<R: Record + Default>(&self, text: &str) -> Result<Vec<R>, Error> {
        let entities = parser::parse_all(text)?;
        let mut out = Vec::with_capacity(entities.len());
        for entity in &entities {
            let mut record = R::default();
            if let Err(e) = self.decode_entity(entity, &mut record) {
                return Err(e.with_source(text));
            }
            out.push(record);
        }
        Ok(out)
    }
}
