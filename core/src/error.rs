use thiserror::Error;

use crate::types::SemanticType;

#[derive(Debug, Error)]
pub enum OrmaError {
    /// A field's semantic type resolves to nothing in the merged type-mapping table
    #[error("Schema mapping error: field `{field}` of `{entity}` has unmapped type `{semantic_type}`")]
    SchemaMapping {
        entity: String,
        field: String,
        semantic_type: SemanticType,
    },

    /// Insert attempted on an instance that already carries an identity
    #[error("`{entity}` instance is already persisted with id {id}")]
    AlreadyPersisted { entity: String, id: i64 },

    /// A required field serialized to the missing marker
    #[error("Missing required field `{field}`")]
    MissingRequiredField { field: String },

    /// A converter rejected a value
    #[error("Type conversion error on `{field}`: {message}")]
    TypeConversion { field: String, message: String },

    /// Name is not part of the type's field plan
    #[error("Unknown field `{field}` on `{entity}`")]
    UnknownField { entity: String, field: String },

    /// Entity handed to a manager bound to a different type
    #[error("Expected a `{expected}` entity, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// Source object has no such attribute
    #[error("Unknown attribute `{attribute}`")]
    UnknownAttribute { attribute: String },

    /// A field claims the column reserved for the identity
    #[error("Field `{field}` of `{entity}` uses the reserved `id` column")]
    ReservedColumn { entity: String, field: String },

    /// A type with this name is already registered
    #[error("Type `{0}` is already registered")]
    DuplicateType(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error executing a statement
    #[error("Execution error: {0}")]
    Execution(String),

    /// PostgreSQL driver errors
    #[cfg(feature = "postgres-sync")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] postgres::Error),
}

/// Result type for mapper and serializer operations
pub type Result<T> = std::result::Result<T, OrmaError>;
