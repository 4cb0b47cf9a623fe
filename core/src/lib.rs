//! Core types for orma: values, the type-mapping table, field descriptors, the
//! plan builder, entities and the type registry.
//!
//! Both the relational mapper (`orma-postgres`) and the serialization engine
//! (`orma-schema`) build their per-type field plans with [`PlanBuilder`].

pub mod entity;
pub mod error;
pub mod field;
pub mod plan;
pub mod registry;
pub mod row;
pub mod trace;
pub mod types;
pub mod values;

pub use entity::{Entity, EntityType, EntityTypeBuilder, ID_COLUMN, TypeRegistry};
pub use error::{OrmaError, Result};
pub use field::FieldDescriptor;
pub use plan::{Plan, PlanBuilder};
pub use registry::{Registered, Registry};
pub use row::Row;
pub use types::{ColumnType, SemanticType, TypeMap};
pub use values::Value;

/// Builds `(name, Value)` pairs for instantiating entities and for equality
/// predicates.
///
/// # Examples
///
/// ```
/// use orma_core::{Value, fields};
///
/// let pairs = fields! { campaign_id => 1578451881i64, status => "ENABLED" };
/// assert_eq!(pairs[0], ("campaign_id", Value::Integer(1578451881)));
/// assert_eq!(pairs[1].1, Value::from("ENABLED"));
/// ```
#[macro_export]
macro_rules! fields {
    {} => {
        ::std::vec::Vec::<(&'static str, $crate::Value)>::new()
    };
    {$($key:ident => $value:expr),+ $(,)?} => {
        [
            $(
                (stringify!($key), $crate::Value::from($value))
            ),+
        ]
    };
}
