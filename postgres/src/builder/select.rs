use orma_core::{EntityType, OrmaError, Result, Value};

use super::Statement;

/// `SELECT * FROM <table>`
pub fn select(entity_type: &EntityType) -> Statement {
    Statement::new(format!("SELECT * FROM {}", entity_type.table_name()))
}

/// `SELECT * FROM <table> [WHERE k1 = $1 AND k2 = $2 ...] [LIMIT n]`
///
/// Predicate keys must name `id` or a column of the type. Only conjunctive
/// equality is expressed; use a raw query for anything else.
pub fn select_by<K, V, I>(entity_type: &EntityType, predicate: I, limit: Option<u64>) -> Result<Statement>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let mut stmt = select(entity_type);
    let mut conditions = Vec::new();

    for (column, value) in predicate {
        let column = column.as_ref();
        if !entity_type.has_column(column) {
            return Err(OrmaError::UnknownField {
                entity: entity_type.name().to_string(),
                field: column.to_string(),
            });
        }
        stmt.params.push(value.into());
        conditions.push(format!("{} = ${}", column, stmt.params.len()));
    }

    if !conditions.is_empty() {
        stmt.sql.push_str(" WHERE ");
        stmt.sql.push_str(&conditions.join(" AND "));
    }
    if let Some(limit) = limit {
        stmt.sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(stmt)
}
