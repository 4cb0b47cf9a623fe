use orma_core::{Entity, ID_COLUMN};

use super::{Statement, placeholders};

/// `INSERT INTO <table> (<columns in plan order>) VALUES ($1, ...) RETURNING id`
///
/// Does not check persistence; the manager rejects persisted entities first.
pub fn insert(entity: &Entity) -> Statement {
    let entity_type = entity.entity_type();
    let columns: Vec<&str> = entity_type.columns().map(|(column, _)| column).collect();
    let params = entity.values_slice().to_vec();

    let sql = if columns.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            entity_type.table_name(),
            ID_COLUMN
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            entity_type.table_name(),
            columns.join(", "),
            placeholders(1, columns.len()),
            ID_COLUMN
        )
    };

    Statement::with_params(sql, params)
}
