//! The relational mapper.
//!
//! A [`Manager`] binds one [`EntityType`] to an [`Executor`]. Every operation
//! builds its SQL from the type's plan, runs inside a single
//! [`Executor::transact`] scope and converts rows back into entities.
//!
//! ```no_run
//! use orma_core::{EntityType, FieldDescriptor, fields};
//! use orma_postgres::{Database, Manager};
//! use std::sync::Arc;
//!
//! # fn main() -> orma_core::Result<()> {
//! let campaign = Arc::new(
//!     EntityType::builder("Campaign")
//!         .field("campaign_id", FieldDescriptor::integer())
//!         .field("status", FieldDescriptor::text())
//!         .build(),
//! );
//! let db = Database::connect_str("host=localhost user=postgres dbname=ads")?;
//! let campaigns = Manager::new(&db, &campaign);
//! campaigns.create_table()?;
//!
//! let mut row = campaign.instantiate(fields! { campaign_id => 1, status => "ENABLED" })?;
//! campaigns.insert(&mut row)?;
//! let enabled = campaigns.find(fields! { status => "ENABLED" })?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use orma_core::{Entity, EntityType, ID_COLUMN, OrmaError, Result, Row, Value};

use crate::builder::{self, Statement};
use crate::executor::Executor;

/// Creates the table for `entity_type` if it does not exist.
pub fn create_table<E: Executor>(executor: &E, entity_type: &EntityType) -> Result<()> {
    // Mapping errors surface before any connection is opened.
    let stmt = builder::create_table(entity_type)?;
    executor.transact(|cursor| cursor.execute_statement(&stmt))?;
    Ok(())
}

pub fn table_exists<E: Executor>(executor: &E, table: &str) -> Result<bool> {
    let stmt = builder::table_exists(table);
    let rows = executor.transact(|cursor| cursor.query_statement(&stmt))?;
    Ok(matches!(
        rows.first().and_then(|row| row.get("exists")),
        Some(Value::Boolean(true))
    ))
}

pub fn drop_table<E: Executor>(executor: &E, table: &str) -> Result<()> {
    let stmt = builder::drop_table(table);
    executor.transact(|cursor| cursor.execute_statement(&stmt))?;
    Ok(())
}

/// Mapper for one entity type.
#[derive(Debug, Clone)]
pub struct Manager<E> {
    executor: E,
    entity_type: Arc<EntityType>,
}

impl<E: Executor> Manager<E> {
    pub fn new(executor: E, entity_type: &Arc<EntityType>) -> Self {
        Self {
            executor,
            entity_type: Arc::clone(entity_type),
        }
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn table_name(&self) -> String {
        self.entity_type.table_name()
    }

    pub fn create_table(&self) -> Result<()> {
        create_table(&self.executor, &self.entity_type)
    }

    pub fn table_exists(&self) -> Result<bool> {
        table_exists(&self.executor, &self.table_name())
    }

    pub fn drop_table(&self) -> Result<()> {
        drop_table(&self.executor, &self.table_name())
    }

    /// Inserts an unpersisted entity and assigns the identity the database
    /// returns.
    pub fn insert<'e>(&self, entity: &'e mut Entity) -> Result<&'e mut Entity> {
        self.check_insertable(entity)?;
        let stmt = builder::insert(entity);

        let id = self.executor.transact(|cursor| {
            let rows = cursor.query_statement(&stmt)?;
            returned_id(&rows)
        })?;

        entity.assign_id(id)?;
        Ok(entity)
    }

    /// Inserts every entity in one scope. Either all rows are committed and
    /// every entity gets its identity, or nothing is committed and no entity
    /// changes.
    pub fn insert_many(&self, entities: &mut [Entity]) -> Result<()> {
        for entity in entities.iter() {
            self.check_insertable(entity)?;
        }
        let stmts: Vec<Statement> = entities.iter().map(builder::insert).collect();

        let ids = self.executor.transact(|cursor| {
            stmts
                .iter()
                .map(|stmt| returned_id(&cursor.query_statement(stmt)?))
                .collect::<Result<Vec<i64>>>()
        })?;

        for (entity, id) in entities.iter_mut().zip(ids) {
            entity.assign_id(id)?;
        }
        Ok(())
    }

    /// Every entity whose columns equal the predicate values. An empty
    /// predicate matches all rows.
    pub fn find<K, V, I>(&self, predicate: I) -> Result<Vec<Entity>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let stmt = builder::select_by(&self.entity_type, predicate, None)?;
        self.fetch(&stmt)
    }

    /// The first entity matching the predicate, if any. Only one row is
    /// fetched.
    pub fn get<K, V, I>(&self, predicate: I) -> Result<Option<Entity>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let stmt = builder::select_by(&self.entity_type, predicate, Some(1))?;
        Ok(self.fetch(&stmt)?.into_iter().next())
    }

    /// Runs arbitrary parametrized SQL and converts every row to an entity.
    pub fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Entity>> {
        self.fetch(&Statement::with_params(sql, args.to_vec()))
    }

    /// Runs arbitrary parametrized SQL and returns the raw rows, for results
    /// with computed columns.
    pub fn query_rows(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        let stmt = Statement::with_params(sql, args.to_vec());
        self.executor.transact(|cursor| cursor.query_statement(&stmt))
    }

    fn fetch(&self, stmt: &Statement) -> Result<Vec<Entity>> {
        let rows = self.executor.transact(|cursor| cursor.query_statement(stmt))?;
        rows.iter()
            .map(|row| Entity::from_row(&self.entity_type, row))
            .collect()
    }

    fn check_insertable(&self, entity: &Entity) -> Result<()> {
        let found = entity.entity_type().name();
        if found != self.entity_type.name() {
            return Err(OrmaError::TypeMismatch {
                expected: self.entity_type.name().to_string(),
                found: found.to_string(),
            });
        }
        if let Some(id) = entity.id() {
            return Err(OrmaError::AlreadyPersisted {
                entity: found.to_string(),
                id,
            });
        }
        Ok(())
    }
}

fn returned_id(rows: &[Row]) -> Result<i64> {
    match rows.first().and_then(|row| row.get(ID_COLUMN)) {
        Some(Value::Integer(id)) => Ok(*id),
        _ => Err(OrmaError::Execution(
            "insert did not return an identity".to_string(),
        )),
    }
}
