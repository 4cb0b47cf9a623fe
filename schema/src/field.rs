//! Serialization fields and their converters.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use orma_core::{FieldDescriptor, Result, SemanticType, Value};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value as Json;

use crate::schema::SchemaType;
use crate::source::Source;

/// Turns a present, non-null value into its output form. The error string
/// becomes the message of a `TypeConversion` error.
pub type Converter = Arc<dyn Fn(&Value) -> std::result::Result<Json, String> + Send + Sync>;

/// Computes a field's value from the whole source object.
pub type Accessor = Arc<dyn Fn(&dyn Source) -> Result<Value> + Send + Sync>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// How a field's value is converted, or which schema it nests.
#[derive(Clone)]
pub enum FieldKind {
    /// The value's own JSON form
    Raw,
    Integer,
    Float,
    /// Rendered as a string to keep precision
    Decimal,
    String,
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    /// ISO 8601 without offset
    DateTime,
    Nested(Arc<SchemaType>),
    Custom(Converter),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Raw => f.write_str("Raw"),
            FieldKind::Integer => f.write_str("Integer"),
            FieldKind::Float => f.write_str("Float"),
            FieldKind::Decimal => f.write_str("Decimal"),
            FieldKind::String => f.write_str("String"),
            FieldKind::Boolean => f.write_str("Boolean"),
            FieldKind::Date => f.write_str("Date"),
            FieldKind::DateTime => f.write_str("DateTime"),
            FieldKind::Nested(ty) => write!(f, "Nested({})", ty.name()),
            FieldKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FieldKind {
    /// Applies the kind's converter. Not defined for `Nested`, which the
    /// schema serializes itself.
    pub fn convert(&self, value: &Value) -> std::result::Result<Json, String> {
        match self {
            FieldKind::Raw => Ok(value.to_json()),
            FieldKind::Integer => to_integer(value).map(Json::from),
            FieldKind::Float => to_float(value).and_then(|f| {
                serde_json::Number::from_f64(f)
                    .map(Json::Number)
                    .ok_or_else(|| format!("{} is not a finite number", f))
            }),
            FieldKind::Decimal => to_decimal(value).map(|d| Json::String(d.to_string())),
            FieldKind::String => Ok(Json::String(match value {
                Value::Json(Json::String(s)) => s.clone(),
                other => other.to_string(),
            })),
            FieldKind::Boolean => to_boolean(value).map(Json::Bool),
            FieldKind::Date => {
                to_date(value).map(|d| Json::String(d.format(DATE_FORMAT).to_string()))
            }
            FieldKind::DateTime => {
                to_datetime(value).map(|ts| Json::String(ts.format(DATETIME_FORMAT).to_string()))
            }
            FieldKind::Nested(ty) => Err(format!("`{}` is a nested schema", ty.name())),
            FieldKind::Custom(convert) => convert(value),
        }
    }
}

fn unexpected(expected: &str, value: &Value) -> String {
    format!("expected {}, found {} `{}`", expected, value.kind(), value)
}

fn to_integer(value: &Value) -> std::result::Result<i64, String> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
        Value::Decimal(d) if d.fract().is_zero() => {
            d.to_i64().ok_or_else(|| unexpected("an integer", value))
        }
        Value::Text(s) => s.trim().parse().map_err(|_| unexpected("an integer", value)),
        _ => Err(unexpected("an integer", value)),
    }
}

fn to_float(value: &Value) -> std::result::Result<f64, String> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        Value::Decimal(d) => d.to_f64().ok_or_else(|| unexpected("a float", value)),
        Value::Text(s) => s.trim().parse().map_err(|_| unexpected("a float", value)),
        _ => Err(unexpected("a float", value)),
    }
}

fn to_decimal(value: &Value) -> std::result::Result<Decimal, String> {
    match value {
        Value::Decimal(d) => Ok(*d),
        Value::Integer(i) => Ok(Decimal::from(*i)),
        Value::Float(f) => Decimal::try_from(*f).map_err(|e| e.to_string()),
        Value::Text(s) => Decimal::from_str(s.trim()).map_err(|_| unexpected("a decimal", value)),
        _ => Err(unexpected("a decimal", value)),
    }
}

fn to_boolean(value: &Value) -> std::result::Result<bool, String> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(0) => Ok(false),
        Value::Integer(1) => Ok(true),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(unexpected("a boolean", value)),
        },
        _ => Err(unexpected("a boolean", value)),
    }
}

fn to_date(value: &Value) -> std::result::Result<NaiveDate, String> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::DateTime(ts) => Ok(ts.date()),
        Value::Text(s) => {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| unexpected("a date", value))
        }
        _ => Err(unexpected("a date", value)),
    }
}

fn to_datetime(value: &Value) -> std::result::Result<NaiveDateTime, String> {
    match value {
        Value::DateTime(ts) => Ok(*ts),
        Value::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| unexpected("a datetime", value)),
        Value::Text(s) => {
            let s = s.trim();
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .map_err(|_| unexpected("a datetime", value))
        }
        _ => Err(unexpected("a datetime", value)),
    }
}

/// One declared serialization field.
///
/// `name` overrides the source attribute read; `label` overrides the output
/// key. Both default to the declared field name.
#[derive(Clone)]
pub struct SchemaField {
    pub kind: FieldKind,
    pub name: Option<String>,
    pub label: Option<String>,
    pub required: bool,
    pub accessor: Option<Accessor>,
}

impl fmt::Debug for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaField")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("computed", &self.accessor.is_some())
            .finish()
    }
}

impl SchemaField {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            name: None,
            label: None,
            required: true,
            accessor: None,
        }
    }

    pub fn raw() -> Self {
        Self::new(FieldKind::Raw)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn decimal() -> Self {
        Self::new(FieldKind::Decimal)
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    /// Serializes the attribute with another schema and nests the result.
    pub fn nested(schema: &Arc<SchemaType>) -> Self {
        Self::new(FieldKind::Nested(Arc::clone(schema)))
    }

    pub fn custom<F>(convert: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Json, String> + Send + Sync + 'static,
    {
        Self::new(FieldKind::Custom(Arc::new(convert)))
    }

    /// A raw field whose value is computed from the whole source object.
    ///
    /// ```
    /// use orma_core::Value;
    /// use orma_schema::{Attribute, FieldKind, SchemaField, SchemaType, Source};
    ///
    /// let roas = SchemaField::computed(|src: &dyn Source| {
    ///     let number = |name| match src.attribute(name) {
    ///         Some(Attribute::Value(v)) => v.as_i64().unwrap_or(0),
    ///         _ => 0,
    ///     };
    ///     Ok(Value::from(number("value") as f64 / number("cost") as f64))
    /// });
    /// let ty = SchemaType::builder("Roas")
    ///     .field("roas", roas.kind(FieldKind::Float))
    ///     .build();
    /// # let _ = ty;
    /// ```
    pub fn computed<F>(accessor: F) -> Self
    where
        F: Fn(&dyn Source) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            accessor: Some(Arc::new(accessor)),
            ..Self::raw()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Replaces the kind, keeping the rest of the declaration.
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Source attribute read for a field declared as `declared`.
    pub fn source_name<'a>(&'a self, declared: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(declared)
    }

    /// Output key for a field declared as `declared`.
    pub fn output_key<'a>(&'a self, declared: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(declared)
    }
}

/// Mirrors a storage field: converter from the semantic type, plus its label
/// and required flag. The attribute read is the declared name.
impl From<&FieldDescriptor> for SchemaField {
    fn from(descriptor: &FieldDescriptor) -> Self {
        let kind = match descriptor.semantic_type {
            SemanticType::Integer | SemanticType::SmallInteger => FieldKind::Integer,
            SemanticType::Float => FieldKind::Float,
            SemanticType::Decimal => FieldKind::Decimal,
            SemanticType::Text => FieldKind::String,
            SemanticType::Boolean => FieldKind::Boolean,
            SemanticType::Date => FieldKind::Date,
            SemanticType::DateTime => FieldKind::DateTime,
            SemanticType::Json | SemanticType::Custom(_) => FieldKind::Raw,
        };
        Self {
            label: descriptor.label.clone(),
            ..Self::new(kind).required(descriptor.required)
        }
    }
}
