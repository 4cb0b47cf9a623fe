//! Semantic field types and their mapping onto storage column types.
//!
//! Resolution for a field happens at DDL-generation time, in this order:
//!
//! ```text
//! 1. entity override keyed by SemanticType
//! 2. built-in table            (TypeMap::builtin)
//! 3. entity override keyed by the type's name
//! ```
//!
//! `SemanticType::Custom` never resolves in the built-in table, so a custom
//! type without an override is a mapping error.

use hashbrown::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Exhaustive enumeration of supported semantic field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// 64-bit integer
    Integer,
    /// 32-bit integer
    SmallInteger,
    /// Double precision float
    Float,
    /// Arbitrary precision decimal
    Decimal,
    /// Short text
    Text,
    Boolean,
    Date,
    DateTime,
    Json,
    /// Application-defined type, resolved only through entity overrides
    Custom(String),
}

impl SemanticType {
    pub fn name(&self) -> &str {
        match self {
            SemanticType::Integer => "int",
            SemanticType::SmallInteger => "smallint",
            SemanticType::Float => "float",
            SemanticType::Decimal => "decimal",
            SemanticType::Text => "str",
            SemanticType::Boolean => "bool",
            SemanticType::Date => "date",
            SemanticType::DateTime => "datetime",
            SemanticType::Json => "json",
            SemanticType::Custom(name) => name,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        SemanticType::Custom(name.into())
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A storage column type with optional arguments, e.g. `varchar(255)`.
///
/// ```
/// use orma_core::ColumnType;
///
/// assert_eq!(ColumnType::new("varchar").arg(255).to_string(), "varchar(255)");
/// assert_eq!(ColumnType::new("numeric").arg(12).arg(2).to_string(), "numeric(12, 2)");
/// assert_eq!(ColumnType::new("date").to_string(), "date");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub sql_type: String,
    pub args: Vec<String>,
}

impl ColumnType {
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// A type-mapping table: semantic type → column type, plus name-keyed entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMap {
    by_type: HashMap<SemanticType, ColumnType>,
    by_name: HashMap<String, ColumnType>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed built-in table.
    pub fn builtin() -> Self {
        let mut map = Self::new();
        map.insert(SemanticType::Integer, ColumnType::new("bigint"));
        map.insert(SemanticType::SmallInteger, ColumnType::new("integer"));
        map.insert(SemanticType::Float, ColumnType::new("double precision"));
        map.insert(SemanticType::Decimal, ColumnType::new("numeric"));
        map.insert(SemanticType::Text, ColumnType::new("varchar").arg(255));
        map.insert(SemanticType::Boolean, ColumnType::new("boolean"));
        map.insert(SemanticType::Date, ColumnType::new("date"));
        map.insert(SemanticType::DateTime, ColumnType::new("timestamp"));
        map.insert(SemanticType::Json, ColumnType::new("jsonb"));
        map
    }

    pub fn insert(&mut self, semantic_type: SemanticType, column: ColumnType) {
        self.by_type.insert(semantic_type, column);
    }

    pub fn insert_named(&mut self, name: impl Into<String>, column: ColumnType) {
        self.by_name.insert(name.into(), column);
    }

    pub fn get(&self, semantic_type: &SemanticType) -> Option<&ColumnType> {
        self.by_type.get(semantic_type)
    }

    pub fn get_named(&self, name: &str) -> Option<&ColumnType> {
        self.by_name.get(name)
    }

    /// Overlays `other` onto `self`; entries in `other` win.
    pub fn merge(&mut self, other: &TypeMap) {
        for (k, v) in &other.by_type {
            self.by_type.insert(k.clone(), v.clone());
        }
        for (k, v) in &other.by_name {
            self.by_name.insert(k.clone(), v.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_name.is_empty()
    }

    /// Resolves a semantic type with `self` as the per-entity override table.
    pub fn resolve(&self, semantic_type: &SemanticType) -> Option<ColumnType> {
        self.get(semantic_type)
            .cloned()
            .or_else(|| BUILTIN.get(semantic_type).cloned())
            .or_else(|| self.get_named(semantic_type.name()).cloned())
    }
}

static BUILTIN: LazyLock<TypeMap> = LazyLock::new(TypeMap::builtin);
