//! Entity types and instances.
//!
//! An [`EntityType`] is declared once through [`EntityTypeBuilder`], which
//! runs the plan builder over the declared ancestors and the type's own
//! fields. The result is immutable and usually registered in a
//! [`TypeRegistry`].
//!
//! ```
//! use orma_core::{EntityType, FieldDescriptor, TypeRegistry, fields};
//!
//! let mut registry = TypeRegistry::new();
//! let person = EntityType::builder("Person")
//!     .field("name", FieldDescriptor::text())
//!     .field("age", FieldDescriptor::integer())
//!     .register(&mut registry)?;
//! let author = EntityType::builder("Author")
//!     .extends(&person)
//!     .field("height", FieldDescriptor::integer())
//!     .register(&mut registry)?;
//!
//! let entity = author.instantiate(fields! { name => "Per Son", age => 30, height => 130 })?;
//! assert_eq!(entity.get("age").and_then(|v| v.as_i64()), Some(30));
//! assert_eq!(author.table_name(), "author");
//! assert!(!entity.is_persisted());
//! # Ok::<(), orma_core::OrmaError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{OrmaError, Result};
use crate::field::FieldDescriptor;
use crate::plan::{Plan, PlanBuilder};
use crate::registry::{Registered, Registry};
use crate::row::Row;
use crate::types::{ColumnType, SemanticType, TypeMap};
use crate::values::Value;

/// Name of the identity column every entity table carries.
pub const ID_COLUMN: &str = "id";

pub type TypeRegistry = Registry<EntityType>;

/// A declared record type: a name, an optional table override, a storage
/// field plan and the per-type type-mapping overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    name: String,
    table: Option<String>,
    plan: Plan<FieldDescriptor>,
    type_overrides: TypeMap,
}

impl EntityType {
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit table override, else the lower-cased type name.
    pub fn table_name(&self) -> String {
        match &self.table {
            Some(table) => table.clone(),
            None => self.name.to_lowercase(),
        }
    }

    pub fn plan(&self) -> &Plan<FieldDescriptor> {
        &self.plan
    }

    pub fn type_overrides(&self) -> &TypeMap {
        &self.type_overrides
    }

    /// Storage column name of an attribute.
    pub fn column_name<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.plan
            .get(attribute)
            .and_then(|d| d.name.as_deref())
            .unwrap_or(attribute)
    }

    /// `(column, descriptor)` pairs in plan order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.plan
            .iter()
            .map(|(attr, d)| (d.name.as_deref().unwrap_or(attr), d))
    }

    pub fn has_column(&self, column: &str) -> bool {
        column == ID_COLUMN || self.columns().any(|(c, _)| c == column)
    }

    /// Fails when a field's column collides with the identity column.
    pub fn validate(&self) -> Result<()> {
        match self.plan.iter().find(|(_, d)| d.name.as_deref() == Some(ID_COLUMN)) {
            Some((attr, _)) => Err(OrmaError::ReservedColumn {
                entity: self.name.clone(),
                field: attr.to_string(),
            }),
            None if self.plan.get(ID_COLUMN).is_some_and(|d| d.name.is_none()) => {
                Err(OrmaError::ReservedColumn {
                    entity: self.name.clone(),
                    field: ID_COLUMN.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Resolves a field's storage column type: field override, then the merged
    /// type-mapping table.
    pub fn resolve_column_type(&self, attribute: &str) -> Result<ColumnType> {
        let descriptor = self.plan.get(attribute).ok_or_else(|| OrmaError::UnknownField {
            entity: self.name.clone(),
            field: attribute.to_string(),
        })?;

        if let Some(column_type) = &descriptor.column_type {
            return Ok(column_type.clone());
        }

        self.type_overrides
            .resolve(&descriptor.semantic_type)
            .ok_or_else(|| OrmaError::SchemaMapping {
                entity: self.name.clone(),
                field: attribute.to_string(),
                semantic_type: descriptor.semantic_type.clone(),
            })
    }

    /// Builds an unpersisted instance. Unset fields take their declared
    /// default, else `Null`.
    pub fn instantiate<K, V, I>(self: &Arc<Self>, fields: I) -> Result<Entity>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut entity = Entity::empty(self);
        for (name, value) in fields {
            entity.set(name.as_ref(), value)?;
        }
        Ok(entity)
    }

    fn unknown_field(&self, field: &str) -> OrmaError {
        OrmaError::UnknownField {
            entity: self.name.clone(),
            field: field.to_string(),
        }
    }
}

impl Registered for EntityType {
    fn type_name(&self) -> &str {
        &self.name
    }
}

/// Declares an [`EntityType`].
#[derive(Debug)]
pub struct EntityTypeBuilder {
    name: String,
    table: Option<String>,
    ancestors: Vec<Arc<EntityType>>,
    fields: Vec<(String, FieldDescriptor)>,
    type_overrides: TypeMap,
}

impl EntityTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            ancestors: Vec::new(),
            fields: Vec::new(),
            type_overrides: TypeMap::new(),
        }
    }

    /// Adds an ancestor. Call in root-to-leaf order.
    pub fn extends(mut self, ancestor: &Arc<EntityType>) -> Self {
        self.ancestors.push(Arc::clone(ancestor));
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.push((name.into(), descriptor));
        self
    }

    pub fn override_type(mut self, semantic_type: SemanticType, column: ColumnType) -> Self {
        self.type_overrides.insert(semantic_type, column);
        self
    }

    pub fn override_type_named(mut self, name: impl Into<String>, column: ColumnType) -> Self {
        self.type_overrides.insert_named(name, column);
        self
    }

    pub fn build(self) -> EntityType {
        let mut plan = PlanBuilder::new();
        let mut type_overrides = TypeMap::new();

        for ancestor in &self.ancestors {
            plan = plan.inherit(&ancestor.plan);
            type_overrides.merge(&ancestor.type_overrides);
        }
        for (name, descriptor) in self.fields {
            plan.merge(name, descriptor);
        }
        type_overrides.merge(&self.type_overrides);

        let plan = plan.build();
        crate::orma_trace_plan!("entity", self.name, plan.len());

        EntityType {
            name: self.name,
            table: self.table,
            plan,
            type_overrides,
        }
    }

    pub fn register(self, registry: &mut TypeRegistry) -> Result<Arc<EntityType>> {
        let entity_type = self.build();
        entity_type.validate()?;
        registry.register(entity_type)
    }
}

/// A record instance: one value per plan field plus an optional identity.
#[derive(Clone)]
pub struct Entity {
    entity_type: Arc<EntityType>,
    values: Vec<Value>,
    id: Option<i64>,
}

impl Entity {
    fn empty(entity_type: &Arc<EntityType>) -> Self {
        let values = entity_type
            .plan
            .iter()
            .map(|(_, d)| d.default.clone().unwrap_or_default())
            .collect();
        Self {
            entity_type: Arc::clone(entity_type),
            values,
            id: None,
        }
    }

    /// Rebuilds an entity from a stored row: `id` becomes the identity, plan
    /// fields are read by column name, and other columns are ignored.
    pub fn from_row(entity_type: &Arc<EntityType>, row: &Row) -> Result<Self> {
        let id = match row.get(ID_COLUMN) {
            Some(Value::Integer(id)) => Some(*id),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(OrmaError::TypeConversion {
                    field: ID_COLUMN.to_string(),
                    message: format!("expected integer identity, found {}", other.kind()),
                });
            }
        };

        let values = entity_type
            .columns()
            .map(|(column, _)| row.get(column).cloned().unwrap_or_default())
            .collect();

        Ok(Self {
            entity_type: Arc::clone(entity_type),
            values,
            id,
        })
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Sets the identity. Fails if one is already assigned.
    pub fn assign_id(&mut self, id: i64) -> Result<()> {
        if let Some(existing) = self.id {
            return Err(OrmaError::AlreadyPersisted {
                entity: self.entity_type.name.clone(),
                id: existing,
            });
        }
        self.id = Some(id);
        Ok(())
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.entity_type
            .plan
            .position(attribute)
            .map(|i| &self.values[i])
    }

    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) -> Result<()> {
        let i = self
            .entity_type
            .plan
            .position(attribute)
            .ok_or_else(|| self.entity_type.unknown_field(attribute))?;
        self.values[i] = value.into();
        Ok(())
    }

    /// `(attribute, value)` pairs in plan order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entity_type.plan.names().zip(self.values.iter())
    }

    /// Values in plan order, as bound by an insert.
    pub fn values_slice(&self) -> &[Value] {
        &self.values
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type.name == other.entity_type.name
            && self.id == other.id
            && self.values == other.values
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.entity_type.name);
        s.field(ID_COLUMN, &self.id);
        for (name, value) in self.values() {
            s.field(name, value);
        }
        s.finish()
    }
}
