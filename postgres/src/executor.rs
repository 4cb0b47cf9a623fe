//! The seam between the mapper and a backend.
//!
//! Each [`Executor::transact`] call is one auto-committing scope: acquire a
//! connection, run the statements issued through the [`Cursor`], commit, and
//! release the connection on every exit path. An `Err` from the closure means
//! nothing is committed.

use orma_core::{Result, Row, Value};

use crate::builder::Statement;

/// Statement execution within one open scope.
pub trait Cursor {
    /// Executes a statement, returning the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Executes a statement and returns every result row.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;
}

impl dyn Cursor + '_ {
    pub fn execute_statement(&mut self, stmt: &Statement) -> Result<u64> {
        orma_core::orma_trace_query!(&stmt.sql, stmt.params.len());
        self.execute(&stmt.sql, &stmt.params)
    }

    pub fn query_statement(&mut self, stmt: &Statement) -> Result<Vec<Row>> {
        orma_core::orma_trace_query!(&stmt.sql, stmt.params.len());
        self.query(&stmt.sql, &stmt.params)
    }
}

/// A source of connection scopes.
pub trait Executor {
    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Cursor) -> Result<T>;
}

impl<E: Executor> Executor for &E {
    fn transact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Cursor) -> Result<T>,
    {
        (**self).transact(f)
    }
}
