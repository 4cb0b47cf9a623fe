//! Dynamic values carried by entities, predicates, rows and serialization sources

mod conversions;
mod drivers;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

//------------------------------------------------------------------------------
// Value Definition
//------------------------------------------------------------------------------

/// A single field value.
///
/// `Null` doubles as the "missing" marker during serialization.
///
/// # Examples
///
/// ```
/// use orma_core::Value;
///
/// let int_val: Value = 42i32.into();
/// assert!(matches!(int_val, Value::Integer(42)));
///
/// let str_val: Value = "hello".into();
/// assert!(matches!(str_val, Value::Text(_)));
///
/// let none: Value = Option::<i64>::None.into();
/// assert!(none.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// BOOLEAN values
    Boolean(bool),
    /// SMALLINT, INTEGER and BIGINT values
    Integer(i64),
    /// REAL and DOUBLE PRECISION values
    Float(f64),
    /// NUMERIC values
    Decimal(Decimal),
    /// TEXT, VARCHAR, CHAR values
    Text(String),
    /// DATE values
    Date(NaiveDate),
    /// TIMESTAMP values (without timezone)
    DateTime(NaiveDateTime),
    /// JSON and JSONB values
    Json(serde_json::Value),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in conversion error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Json(_) => "json",
        }
    }

    /// Raw JSON rendering, without any field-level conversion.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Integer(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Decimal(d) => Json::String(d.to_string()),
            Value::Text(s) => Json::String(s.clone()),
            Value::Date(d) => Json::String(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(ts) => Json::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Value::Json(json) => json.clone(),
        }
    }

    /// Maps JSON scalars onto their natural variant. Arrays and objects stay `Json`.
    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            Json::String(s) => Value::Text(s.clone()),
            other => Value::Json(other.clone()),
        }
    }

    /// Escaped SQL literal, as used in `DEFAULT <literal>` clauses.
    ///
    /// ```
    /// use orma_core::Value;
    ///
    /// assert_eq!(Value::from("it's").sql_literal(), "'it''s'");
    /// assert_eq!(Value::from(true).sql_literal(), "TRUE");
    /// assert_eq!(Value::Null.sql_literal(), "NULL");
    /// ```
    pub fn sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(true) => "TRUE".to_string(),
            Value::Boolean(false) => "FALSE".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) if f.is_finite() => f.to_string(),
            Value::Float(f) => quote(&f.to_string()),
            Value::Decimal(d) => d.to_string(),
            Value::Text(s) => quote(s),
            Value::Date(_) | Value::DateTime(_) => quote(&self.to_string()),
            Value::Json(json) => quote(&json.to_string()),
        }
    }
}

fn quote(raw: &str) -> String {
    let escaped = raw.replace('\'', "''");
    // Backslashes are literal only under standard_conforming_strings; E'' is unambiguous.
    if escaped.contains('\\') {
        format!("E'{}'", escaped.replace('\\', "\\\\"))
    } else {
        format!("'{}'", escaped)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Json(json) => write!(f, "{}", json),
        }
    }
}
