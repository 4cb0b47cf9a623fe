//! # orma
//!
//! A declarative relational mapper and serializer for PostgreSQL.
//!
//! Entity types and schema types are declared once, at start-up, with a
//! builder. Each builder walks the declared ancestors root to leaf and merges
//! their fields into an immutable ordered plan; the mapper and the serializer
//! read that plan on every call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orma::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> orma::Result<()> {
//! let mut types = TypeRegistry::new();
//! let campaign = EntityType::builder("Campaign")
//!     .field("campaign_id", FieldDescriptor::integer())
//!     .field("structure_value", FieldDescriptor::text())
//!     .field("status", FieldDescriptor::text())
//!     .register(&mut types)?;
//!
//! let db = Database::new(DatabaseConfig::from_env()?.to_pg_config()?);
//! let campaigns = Manager::new(&db, &campaign);
//! campaigns.create_table()?;
//!
//! let mut row = campaign.instantiate(fields! {
//!     campaign_id => 1578451881i64,
//!     structure_value => "venum",
//!     status => "ENABLED",
//! })?;
//! campaigns.insert(&mut row)?;
//!
//! let summary = Arc::new(
//!     SchemaType::builder("CampaignSummary")
//!         .field("campaign_id", SchemaField::integer().label("campaign"))
//!         .field("status", SchemaField::string())
//!         .build(),
//! );
//! let found = campaigns.find(fields! { campaign_id => 1578451881i64 })?;
//! let json = Schema::many(&summary, &found).serialize()?.clone();
//! # let _ = json;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate           | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | `orma-core`     | values, type mapping, field descriptors, plans, entities   |
//! | `orma-postgres` | DDL and CRUD SQL, the executor seam, the `postgres` driver |
//! | `orma-schema`   | the serialization engine                                   |

/// Result type for orma operations
pub use orma_core::error::Result;

/// Error types
pub mod error {
    pub use orma_core::error::OrmaError;
}

pub use orma_core::fields;
pub use orma_postgres::params;

/// Core types shared by the mapper and the serializer.
pub mod core {
    pub use orma_core::{
        ColumnType, Entity, EntityType, EntityTypeBuilder, FieldDescriptor, ID_COLUMN, Plan,
        PlanBuilder, Registered, Registry, Row, SemanticType, TypeMap, TypeRegistry, Value,
    };
}

/// The relational mapper.
pub mod postgres {
    pub use orma_postgres::builder;
    pub use orma_postgres::{
        Cursor, DatabaseConfig, Executor, Manager, Statement, create_table, drop_table,
        table_exists,
    };

    #[cfg(feature = "postgres-sync")]
    pub use orma_postgres::Database;
}

/// The serialization engine.
pub mod schema {
    pub use orma_schema::{
        Accessor, Attribute, Converter, FieldKind, Schema, SchemaField, SchemaRegistry,
        SchemaType, SchemaTypeBuilder, Source,
    };
}

pub mod prelude {
    pub use crate::core::*;
    pub use crate::error::OrmaError;
    pub use crate::postgres::{Cursor, DatabaseConfig, Executor, Manager, Statement};
    pub use crate::schema::*;
    pub use crate::{Result, fields, params};

    #[cfg(feature = "postgres-sync")]
    pub use crate::postgres::Database;
}
