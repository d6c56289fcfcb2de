//! Scanner, parser and typed decoder for the `field-fmt` output of the tmsh
//! load-balancer shell.
//!
//! Output such as `show ltm pool web_pool members field-fmt` is scanned into
//! tokens, parsed into a schema-agnostic syntax tree ([`Entity`] / [`Block`] /
//! [`Entry`] / [`Scalar`]) and then decoded into caller-defined records. A
//! record describes itself with a table of annotations, usually generated by
//! [`impl_record!`]; the same block decodes as a record, a [`Vec`] of named
//! sub-blocks or a map keyed by sub-block name depending on the destination.
//!
//! Decoding is lenient: unknown keys are ignored, bare keys leave their field
//! untouched and unparseable numbers such as `36.2K` become zero. The only
//! error surfaced by default is a structural parse error. See [`Decoder`] for
//! a strict mode.
//!
//! # Examples
//!
//! ```
//! use field_fmt::impl_record;
//!
//! #[derive(Debug, Default)]
//! struct PoolMember {
//!     node_name: String,
//!     port: u16,
//!     monitor_rule: String,
//! }
//!
//! impl_record! {
//!     PoolMember {
//!         "node-name" => node_name,
//!         "port" => port,
//!         "monitor-rule" => monitor_rule,
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Pool {
//!     name: String,
//!     active_member_cnt: u32,
//!     members: Vec<PoolMember>,
//! }
//!
//! impl_record! {
//!     Pool {
//!         "name" => name,
//!         "active-member-cnt" => active_member_cnt,
//!         "members" => members,
//!     }
//!     name => name;
//! }
//!
//! let text = "ltm pool api.example.com_8080 {
//!     active-member-cnt 1
//!     members {
//!         api01.example.com:8080 {
//!             monitor-rule /Common/tcp (pool monitor)
//!             node-name api01.example.com
//!             port 8080
//!             serverside.bits-in 36.2K
//!         }
//!     }
//! }";
//!
//! let pool: Pool = field_fmt::from_str(text)?;
//! assert_eq!(pool.name, "api.example.com_8080");
//! assert_eq!(pool.active_member_cnt, 1);
//! assert_eq!(pool.members[0].node_name, "api01.example.com");
//! assert_eq!(pool.members[0].monitor_rule, "/Common/tcp (pool monitor)");
//! # Ok::<(), field_fmt::Error>(())
//! ```

mod de;
mod error;
mod node;
mod parser;
mod record;
mod scanner;
mod span;
mod tracing_macros;

pub use de::{Context, Decode, Decoder};
pub use error::{Error, ErrorKind};
pub use node::{Block, Entity, Entry, Scalar, Value};
pub use parser::{parse, parse_all};
pub use record::{Record, decode_record};
pub use scanner::{Scanner, Token, TokenKind};
pub use span::{Span, Spanned};

#[cfg(feature = "serde")]
pub mod impl_serde;

/// A name-keyed map destination hashed with `foldhash`.
pub type Map<V> = foldhash::HashMap<String, V>;

/// Parses `text` and decodes it into a fresh `R` with the lenient decoder.
pub fn from_str<R: Record + Default>(text: &str) -> Result<R, Error> {
    Decoder::new().from_str(text)
}

/// Parses several back-to-back documents, one fresh `R` per document.
pub fn from_str_all<R: Record + Default>(text: &str) -> Result<Vec<R>, Error> {
    Decoder::new().from_str_all(text)
}

/// Parses `text` and decodes it on top of the current contents of `out`.
///
/// Fields with no matching key keep whatever value they had. On a parse
/// error `out` is left untouched.
pub fn decode_into<R: Record + ?Sized>(text: &str, out: &mut R) -> Result<(), Error> {
    Decoder::new().decode_into(text, out)
}

#[cfg(test)]
#[path = "./lib_tests.rs"]
mod tests;
