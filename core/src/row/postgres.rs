//! Conversion from `postgres::Row` into [`Row`].
//!
//! Every column is decoded through `Value`'s `FromSql` impl, so any column the
//! value type understands can come back from an arbitrary query.

use super::Row;
use crate::error::OrmaError;
use crate::values::Value;

impl TryFrom<&postgres::Row> for Row {
    type Error = OrmaError;

    fn try_from(row: &postgres::Row) -> Result<Self, Self::Error> {
        let mut out = Row::with_capacity(row.len());
        for (i, column) in row.columns().iter().enumerate() {
            let value: Value = row.try_get(i)?;
            out.push(column.name(), value);
        }
        Ok(out)
    }
}
