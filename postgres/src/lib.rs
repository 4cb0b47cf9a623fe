//! PostgreSQL relational mapper for orma
//!
//! This crate turns [`EntityType`](orma_core::EntityType) plans into DDL and
//! CRUD statements and runs them through an [`Executor`]. The default
//! executor, [`Database`], uses the synchronous [`postgres`] driver.

pub mod builder;
pub mod config;
#[cfg(feature = "postgres-sync")]
pub mod database;
pub mod executor;
pub mod manager;

pub use builder::Statement;
pub use config::DatabaseConfig;
#[cfg(feature = "postgres-sync")]
pub use database::Database;
pub use executor::{Cursor, Executor};
pub use manager::{Manager, create_table, drop_table, table_exists};

/// Creates an array of positional SQL parameters for `$n` placeholders.
///
/// # Examples
///
/// ```
/// use orma_core::Value;
/// use orma_postgres::params;
///
/// let params = params![1578451881i64, "ENABLED"];
/// assert_eq!(params[1], Value::from("ENABLED"));
/// ```
#[macro_export]
macro_rules! params {
    [] => {
        [$crate::__private::Value::Null; 0]
    };
    [$($param:expr),+ $(,)?] => {
        [
            $(
                $crate::__private::Value::from($param)
            ),+
        ]
    };
}

#[doc(hidden)]
pub mod __private {
    pub use orma_core::Value;
}
