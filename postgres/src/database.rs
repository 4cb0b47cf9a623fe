//! Synchronous PostgreSQL executor using [`postgres`].
//!
//! # Example
//!
//! ```no_run
//! use orma_postgres::{Database, DatabaseConfig};
//!
//! # fn main() -> orma_core::Result<()> {
//! let db = Database::new(DatabaseConfig::from_env()?.to_pg_config()?);
//! assert!(!db.table_exists("campaign")?);
//! # Ok(())
//! # }
//! ```

use orma_core::{Result, Row, Value};
use postgres::types::ToSql;
use postgres::{Client, NoTls};

use crate::builder::Statement;
use crate::executor::{Cursor, Executor};
use crate::manager;

/// Opens a fresh connection for every scope. Pooling, if wanted, belongs
/// outside this type.
#[derive(Debug, Clone)]
pub struct Database {
    config: postgres::Config,
}

impl Database {
    pub fn new(config: postgres::Config) -> Self {
        Self { config }
    }

    /// Parses a libpq-style or URL connection string.
    pub fn connect_str(params: &str) -> Result<Self> {
        Ok(Self::new(params.parse()?))
    }

    pub fn config(&self) -> &postgres::Config {
        &self.config
    }

    /// Executes one statement in its own scope.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.transact(|cursor| cursor.execute_statement(&Statement::with_params(sql, params.to_vec())))
    }

    /// Executes one statement once per parameter set, all in one scope.
    pub fn execute_many<I>(&self, sql: &str, param_sets: I) -> Result<u64>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        self.transact(|cursor| {
            let mut affected = 0;
            for params in param_sets {
                affected += cursor.execute_statement(&Statement::with_params(sql, params))?;
            }
            Ok(affected)
        })
    }

    /// Catalog probe for `table` in the current schema.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        manager::table_exists(self, table)
    }
}

struct PostgresCursor<'c, 't> {
    tx: &'c mut postgres::Transaction<'t>,
}

fn param_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

impl Cursor for PostgresCursor<'_, '_> {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        Ok(self.tx.execute(sql, &param_refs(params))?)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.tx
            .query(sql, &param_refs(params))?
            .iter()
            .map(Row::try_from)
            .collect()
    }
}

impl Executor for Database {
    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Cursor) -> Result<T>,
    {
        let mut client: Client = self.config.connect(NoTls)?;
        let mut tx = client.transaction()?;
        orma_core::orma_trace_tx!("begin", "postgres.sync");

        // Dropping an uncommitted transaction rolls it back; dropping the
        // client closes the connection.
        let out = f(&mut PostgresCursor { tx: &mut tx })?;

        tx.commit()?;
        orma_core::orma_trace_tx!("commit", "postgres.sync");
        Ok(out)
    }
}
