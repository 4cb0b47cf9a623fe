//! CREATE / DROP TABLE and the catalog existence probe.

use orma_core::{ColumnType, EntityType, Result, Value};

use super::Statement;

/// Identity column definition shared by every entity table.
pub const ID_COLUMN_SQL: &str = "id serial PRIMARY KEY";

/// Storage definition of one column, derived at DDL-generation time.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageColumnSpec {
    pub column: String,
    pub sql_type: String,
    pub sql_type_args: Vec<String>,
    /// `NOT NULL` or `DEFAULT <literal>`
    pub null_or_default_clause: String,
}

impl StorageColumnSpec {
    fn new(column: &str, column_type: ColumnType, default: Option<&Value>) -> Self {
        let null_or_default_clause = match default {
            None => "NOT NULL".to_string(),
            Some(value) => format!("DEFAULT {}", value.sql_literal()),
        };
        Self {
            column: column.to_string(),
            sql_type: column_type.sql_type,
            sql_type_args: column_type.args,
            null_or_default_clause,
        }
    }

    pub fn to_column_sql(&self) -> String {
        let mut sql = format!("{} {}", self.column, self.sql_type);
        if !self.sql_type_args.is_empty() {
            sql.push('(');
            sql.push_str(&self.sql_type_args.join(", "));
            sql.push(')');
        }
        sql.push(' ');
        sql.push_str(&self.null_or_default_clause);
        sql
    }
}

/// Column specs in plan order. Fails on a field that claims the identity
/// column, or on the first field whose type does not resolve.
pub fn column_specs(entity_type: &EntityType) -> Result<Vec<StorageColumnSpec>> {
    entity_type.validate()?;
    entity_type
        .plan()
        .iter()
        .map(|(attribute, descriptor)| {
            let column_type = entity_type.resolve_column_type(attribute)?;
            Ok(StorageColumnSpec::new(
                entity_type.column_name(attribute),
                column_type,
                descriptor.default.as_ref(),
            ))
        })
        .collect()
}

/// `CREATE TABLE IF NOT EXISTS <table> (id serial PRIMARY KEY, ...)`
pub fn create_table(entity_type: &EntityType) -> Result<Statement> {
    let mut columns = vec![ID_COLUMN_SQL.to_string()];
    for spec in column_specs(entity_type)? {
        columns.push(spec.to_column_sql());
    }

    Ok(Statement::new(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        entity_type.table_name(),
        columns.join(", ")
    )))
}

pub fn drop_table(table: &str) -> Statement {
    Statement::new(format!("DROP TABLE IF EXISTS {}", table))
}

/// Probes the catalog for `table` in the current schema. Yields one row with a
/// boolean `exists` column.
pub fn table_exists(table: &str) -> Statement {
    Statement::with_params(
        "SELECT EXISTS (SELECT 1 FROM pg_catalog.pg_tables \
         WHERE schemaname = current_schema() AND tablename = $1::text) AS exists",
        vec![Value::from(table)],
    )
}
