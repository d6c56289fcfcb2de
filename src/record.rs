//! Records: destinations whose fields are matched against entry keys by an
//! annotation string.

#[cfg(test)]
#[path = "./record_tests.rs"]
mod tests;

use crate::{
    de::{Context, Decode},
    node::{Block, Entity, Value},
    tracing_macros::trace,
};

/// The annotation table of a record type.
///
/// [`field`](Record::field) maps an annotation (the exact key text as printed
/// by the shell, e.g. `status.availability-state`) to the field it fills.
/// Keys without a matching field are ignored; fields without a matching key
/// are left alone.
///
/// Most implementations are generated with [`impl_record!`](crate::impl_record).
pub trait Record {
    /// Returns the destination for the field annotated `key`. Matching is
    /// exact and case-sensitive.
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode>;

    /// Calls `visit` for every record composed into this one. Composed records
    /// receive the same entity body before the outer record does, so a base
    /// schema can be extended without repeating its annotations.
    fn embedded(&mut self, visit: &mut dyn FnMut(&mut dyn Record)) {
        let _ = visit;
    }

    /// The field that falls back to the entity name when the body carries no
    /// `name`-annotated key.
    fn name_slot(&mut self) -> Option<&mut String> {
        None
    }

    /// The field that falls back to the entity's component path, e.g.
    /// `profile-client-ssl`.
    fn component_slot(&mut self) -> Option<&mut String> {
        None
    }
}

/// Decodes a block value into `record`, entry by entry.
///
/// This is what a record's [`Decode`] implementation delegates to; scalar
/// values are absorbed as a shape mismatch.
pub fn decode_record<R: Record + ?Sized>(record: &mut R, ctx: &mut Context, value: &Value<'_>) {
    match value {
        Value::Block(block) => decode_block(record, ctx, block),
        Value::Scalar(_) => ctx.shape_mismatch("a block", value),
    }
}

/// Fields accumulate: a later key never clears what an earlier one set.
pub(crate) fn decode_block<R: Record + ?Sized>(record: &mut R, ctx: &mut Context, block: &Block<'_>) {
    for entry in block {
        match record.field(entry.key) {
            Some(field) => match &entry.value {
                Some(value) => field.decode(ctx, value),
                None => trace!("bare key {:?} leaves its field untouched", entry.key),
            },
            None => ctx.unknown_key(entry.key, entry.key_span),
        }
    }
}

/// Decodes a whole entity: composed records first, then the record's own
/// fields, then the name and component fallbacks.
pub(crate) fn decode_entity<R: Record + ?Sized>(record: &mut R, ctx: &mut Context, entity: &Entity<'_>) {
    record.embedded(&mut |inner| decode_block(inner, ctx, &entity.body));
    decode_block(record, ctx, &entity.body);

    if let Some(name) = record.name_slot()
        && name.is_empty()
    {
        name.push_str(entity.name);
    }
    if let Some(component) = record.component_slot()
        && component.is_empty()
    {
        component.push_str(&entity.component);
    }
}

/// Implements [`Record`] and [`Decode`] for a struct from a list of
/// `"annotation" => field` pairs.
///
/// Optional trailing clauses, in this order:
/// - `name => field;` the entity-name fallback slot
/// - `component => field;` the component fallback slot
/// - `embed => [field, ...];` composed records sharing the same body
///
/// ```
/// use field_fmt::impl_record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Node {
///     name: String,
///     addr: String,
///     monitor_status: String,
/// }
///
/// impl_record! {
///     Node {
///         "name" => name,
///         "addr" => addr,
///         "monitor-status" => monitor_status,
///     }
///     name => name;
/// }
///
/// #[derive(Debug, Default, PartialEq)]
/// struct NodeExt {
///     node: Node,
///     tot_requests: u64,
/// }
///
/// impl_record! {
///     NodeExt {
///         "tot-requests" => tot_requests,
///     }
///     embed => [node];
/// }
///
/// let text = "ltm node web01 {
///     addr 192.0.2.1
///     monitor-status unchecked
///     tot-requests 12
/// }";
/// let ext: NodeExt = field_fmt::from_str(text)?;
/// assert_eq!(ext.node.addr, "192.0.2.1");
/// assert_eq!(ext.tot_requests, 12);
/// # Ok::<(), field_fmt::Error>(())
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $ty:ty {
            $($key:literal => $field:ident),* $(,)?
        }
        $(name => $name:ident;)?
        $(component => $component:ident;)?
        $(embed => [$($embed:ident),* $(,)?];)?
    ) => {
        impl $crate::Record for $ty {
            fn field(&mut self, key: &str) -> ::core::option::Option<&mut dyn $crate::Decode> {
                match key {
                    $($key => ::core::option::Option::Some(&mut self.$field as &mut dyn $crate::Decode),)*
                    _ => ::core::option::Option::None,
                }
            }

            $(
                fn name_slot(&mut self) -> ::core::option::Option<&mut ::std::string::String> {
                    ::core::option::Option::Some(&mut self.$name)
                }
            )?

            $(
                fn component_slot(&mut self) -> ::core::option::Option<&mut ::std::string::String> {
                    ::core::option::Option::Some(&mut self.$component)
                }
            )?

            $(
                fn embedded(&mut self, visit: &mut dyn FnMut(&mut dyn $crate::Record)) {
                    $(visit(&mut self.$embed);)*
                }
            )?
        }

        impl $crate::Decode for $ty {
            fn decode(&mut self, ctx: &mut $crate::Context, value: &$crate::Value<'_>) {
                $crate::decode_record(self, ctx, value)
            }
        }
    };
}
