//! Declarative serialization for orma.
//!
//! A [`SchemaType`] is an ordered plan of [`SchemaField`]s built with the same
//! plan builder entity types use, so subtypes inherit and redeclare fields the
//! same way. A [`Schema`] applies a type to one [`Source`] or to a sequence of
//! them and produces `serde_json` output whose keys follow plan order.

mod field;
mod schema;
mod source;

pub use field::{Accessor, Converter, FieldKind, SchemaField};
pub use schema::{Schema, SchemaRegistry, SchemaType, SchemaTypeBuilder};
pub use source::{Attribute, Source};
