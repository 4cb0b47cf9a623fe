//! SQL text generation for entity types.
//!
//! Everything here is pure: builders take an [`EntityType`] and values and
//! return a [`Statement`]. Identifiers come from developer-declared types;
//! values are always bound as `$n` parameters.
//!
//! [`EntityType`]: orma_core::EntityType

pub mod ddl;
pub mod insert;
pub mod select;

pub use ddl::{StorageColumnSpec, column_specs, create_table, drop_table, table_exists};
pub use insert::insert;
pub use select::{select, select_by};

use orma_core::Value;

/// A single SQL statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// `$start, $start+1, ...` placeholders for `count` parameters.
///
/// ```
/// use orma_postgres::builder::placeholders;
///
/// assert_eq!(placeholders(1, 3), "$1, $2, $3");
/// assert_eq!(placeholders(4, 1), "$4");
/// assert_eq!(placeholders(1, 0), "");
/// ```
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}
