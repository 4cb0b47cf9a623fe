use crate::types::{ColumnType, SemanticType};
use crate::values::Value;

/// Declarative description of a single storage field.
///
/// A descriptor is immutable once it is declared on a type; the builder methods
/// consume and return it.
///
/// ```
/// use orma_core::{FieldDescriptor, SemanticType, Value};
///
/// let status = FieldDescriptor::text().default("ENABLED").name("status_code");
/// assert_eq!(status.semantic_type, SemanticType::Text);
/// assert_eq!(status.default, Some(Value::from("ENABLED")));
/// assert!(status.required);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub semantic_type: SemanticType,
    /// Replaces the type-mapping lookup for this field only
    pub column_type: Option<ColumnType>,
    /// `None` means no default; `Some(Value::Null)` is an explicit `DEFAULT NULL`
    pub default: Option<Value>,
    /// Serialization only: a derived schema field fails on a missing value.
    /// Storage nullability follows `default`.
    pub required: bool,
    /// Storage column name, when it differs from the attribute name
    pub name: Option<String>,
    /// Output key of the derived schema field
    pub label: Option<String>,
}

impl FieldDescriptor {
    pub fn new(semantic_type: SemanticType) -> Self {
        Self {
            semantic_type,
            column_type: None,
            default: None,
            required: true,
            name: None,
            label: None,
        }
    }

    pub fn integer() -> Self {
        Self::new(SemanticType::Integer)
    }

    pub fn small_integer() -> Self {
        Self::new(SemanticType::SmallInteger)
    }

    pub fn float() -> Self {
        Self::new(SemanticType::Float)
    }

    pub fn decimal() -> Self {
        Self::new(SemanticType::Decimal)
    }

    pub fn text() -> Self {
        Self::new(SemanticType::Text)
    }

    pub fn boolean() -> Self {
        Self::new(SemanticType::Boolean)
    }

    pub fn date() -> Self {
        Self::new(SemanticType::Date)
    }

    pub fn datetime() -> Self {
        Self::new(SemanticType::DateTime)
    }

    pub fn json() -> Self {
        Self::new(SemanticType::Json)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(SemanticType::custom(name))
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
