// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Engine façade.
//!
//! [`Engine`] owns the dialect registry and both caches and assembles the
//! translation pipeline for every operation kind:
//!
//! ```text
//! entity type ──► MetadataCache ──► EntityShape
//! predicate   ──► parser        ──► ConditionNode
//! (shape, dialect, condition shape, options) ──► StatementCache ──► GeneratedStatement
//! statement + condition values + entities    ──► Command
//! ```
//!
//! Every method is synchronous. The engine is cheap to clone; clones share
//! the caches.
//!
//! # Example
//!
//! ```rust
//! use sqlshape_core::{Engine, Entity, EntityShape, FieldDescriptor, QueryOptions, Value, Expr};
//!
//! struct Person {
//!     id:   i64,
//!     name: String
//! }
//!
//! impl Entity for Person {
//!     fn describe() -> EntityShape {
//!         EntityShape::new::<Self>("Person")
//!             .field(FieldDescriptor::new("id", "i64").column("Id").primary().identity())
//!             .field(FieldDescriptor::new("name", "String").column("Name"))
//!     }
//!
//!     fn property(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "id" => Some(self.id.into()),
//!             "name" => Some(self.name.clone().into()),
//!             _ => None
//!         }
//!     }
//! }
//!
//! let engine = Engine::new();
//! let command = engine
//!     .query::<Person>("sqlserver", Expr::member("name").eq("Bob"), &QueryOptions::new())
//!     .unwrap();
//! assert_eq!(command.text, "SELECT [Id], [Name] FROM [dbo].[Person] WHERE ([Name] = @Name);");
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::{
    cache::StatementCache,
    command::Command,
    condition::{Comparison, ConditionNode, Operator},
    dialect::{DialectRegistry, DialectSettings},
    entity::{Entity, EntityShape},
    error::{Error, Result},
    expression::Expr,
    metadata::MetadataCache,
    parser,
    statement::{
        Aggregate, DEFAULT_MAX_BATCH_SIZE, OperationKind, QueryOptions, StatementBuilder,
        StatementKey
    },
    value::Value
};

/// Rows per batched statement when the caller does not choose.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Rows per batched statement.
    pub batch_size: usize,

    /// Upper bound for any requested batch size.
    pub max_batch_size: usize,

    /// Dialect used by sessions that do not name one.
    pub default_dialect: String
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size:      DEFAULT_BATCH_SIZE,
            max_batch_size:  DEFAULT_MAX_BATCH_SIZE,
            default_dialect: "sqlserver".to_string()
        }
    }
}

/// Row selection of a read, update or delete.
#[derive(Debug, Clone, Default)]
pub enum Where {
    /// Every row.
    #[default]
    All,

    /// Predicate expression, parsed against the entity.
    Expr(Expr),

    /// Ready condition tree.
    Tree(ConditionNode)
}

impl From<Expr> for Where {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl From<ConditionNode> for Where {
    fn from(tree: ConditionNode) -> Self {
        Self::Tree(tree)
    }
}

impl From<Comparison> for Where {
    fn from(comparison: Comparison) -> Self {
        Self::Tree(comparison.into())
    }
}

impl<E, T> From<crate::column::Column<E, T>> for Where {
    fn from(column: crate::column::Column<E, T>) -> Self {
        Self::Expr(column.into())
    }
}

#[derive(Debug)]
struct Inner {
    config:     EngineConfig,
    dialects:   DialectRegistry,
    metadata:   MetadataCache,
    statements: StatementCache
}

/// Translation engine with its caches.
#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<Inner>
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config:   EngineConfig,
    dialects: Vec<(String, DialectSettings)>
}

impl EngineBuilder {
    /// Rows per batched statement.
    #[must_use]
    pub const fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Upper bound for batch sizes.
    #[must_use]
    pub const fn max_batch_size(mut self, max: usize) -> Self {
        self.config.max_batch_size = max;
        self
    }

    /// Dialect for sessions that do not name one.
    #[must_use]
    pub fn default_dialect(mut self, id: impl Into<String>) -> Self {
        self.config.default_dialect = id.into();
        self
    }

    /// Register extra dialect settings.
    ///
    /// Custom settings are registered before the built-ins and therefore
    /// take precedence over a built-in with the same identifier.
    #[must_use]
    pub fn dialect(mut self, id: impl Into<String>, settings: DialectSettings) -> Self {
        self.dialects.push((id.into(), settings));
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBatchSize`] when the default batch size is outside of
    /// `1..=max_batch_size`; [`Error::UnsupportedDialect`] when the default
    /// dialect is not registered.
    pub fn build(self) -> Result<Engine> {
        let config = self.config;
        if config.batch_size == 0 || config.batch_size > config.max_batch_size {
            return Err(Error::InvalidBatchSize {
                size: config.batch_size,
                max:  config.max_batch_size
            });
        }

        let dialects = DialectRegistry::new();
        for (id, settings) in self.dialects {
            dialects.register(&id, settings);
        }
        dialects.register_builtins();
        dialects.resolve(&config.default_dialect)?;

        debug!(
            dialects = dialects.len(),
            batch_size = config.batch_size,
            default_dialect = %config.default_dialect,
            "engine ready"
        );
        Ok(Engine {
            inner: Arc::new(Inner {
                config,
                dialects,
                metadata: MetadataCache::new(),
                statements: StatementCache::new()
            })
        })
    }
}

impl Engine {
    /// Engine with default configuration and the built-in dialects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                config:     EngineConfig::default(),
                dialects:   DialectRegistry::with_builtins(),
                metadata:   MetadataCache::new(),
                statements: StatementCache::new()
            })
        }
    }

    /// Start configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Dialect registry.
    #[must_use]
    pub fn dialects(&self) -> &DialectRegistry {
        &self.inner.dialects
    }

    /// Entity shape cache.
    #[must_use]
    pub fn metadata(&self) -> &MetadataCache {
        &self.inner.metadata
    }

    /// Generated statement cache.
    #[must_use]
    pub fn statements(&self) -> &StatementCache {
        &self.inner.statements
    }

    /// Shape of `E`.
    #[must_use]
    pub fn shape<E: Entity>(&self) -> Arc<EntityShape> {
        self.inner.metadata.get::<E>()
    }

    /// Drop every cached shape and statement.
    pub fn flush(&self) {
        self.inner.metadata.flush();
        self.inner.statements.flush();
    }

    /// Translate a predicate into a condition tree for `E`.
    ///
    /// # Errors
    ///
    /// See [`parser::parse`].
    pub fn parse<E: Entity>(&self, expr: &Expr) -> Result<ConditionNode> {
        parser::parse(expr, &self.shape::<E>())
    }

    /// Rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// Resolution, parse or build failures.
    pub fn query<E: Entity>(
        &self,
        dialect: &str,
        filter: impl Into<Where>,
        options: &QueryOptions
    ) -> Result<Command> {
        let op = OperationKind::Query;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let condition = self.condition(&shape, filter.into())?;
        let key = self
            .key(&shape, op, &settings, condition.as_ref())
            .options(options.clone());
        let statement = self.inner.statements.get_or_compute(key, || {
            self.statement_builder(&settings, &shape).query(condition.as_ref(), options)
        })?;
        statement.bind::<E>(&values(condition.as_ref()), &[])
    }

    /// Number of rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn count<E: Entity>(
        &self,
        dialect: &str,
        filter: impl Into<Where>,
        hints: Option<&str>
    ) -> Result<Command> {
        self.filtered::<E>(dialect, OperationKind::Count, filter.into(), hints)
    }

    /// Whether any row of `E` matches `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn exists<E: Entity>(
        &self,
        dialect: &str,
        filter: impl Into<Where>,
        hints: Option<&str>
    ) -> Result<Command> {
        self.filtered::<E>(dialect, OperationKind::Exists, filter.into(), hints)
    }

    /// Aggregate over rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn aggregate<E: Entity>(
        &self,
        dialect: &str,
        aggregate: &Aggregate,
        filter: impl Into<Where>
    ) -> Result<Command> {
        let op = aggregate.function.operation();
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let condition = self.condition(&shape, filter.into())?;
        let key = self
            .key(&shape, op, &settings, condition.as_ref())
            .aggregate(aggregate.clone());
        let statement = self.inner.statements.get_or_compute(key, || {
            self.statement_builder(&settings, &shape)
                .aggregate(aggregate, condition.as_ref())
        })?;
        statement.bind::<E>(&values(condition.as_ref()), &[])
    }

    /// `AVG` of `field`.
    ///
    /// # Errors
    ///
    /// As [`aggregate`](Self::aggregate).
    pub fn average<E: Entity>(
        &self,
        dialect: &str,
        field: &str,
        filter: impl Into<Where>
    ) -> Result<Command> {
        self.aggregate::<E>(dialect, &Aggregate::average(field), filter)
    }

    /// `SUM` of `field`.
    ///
    /// # Errors
    ///
    /// As [`aggregate`](Self::aggregate).
    pub fn sum<E: Entity>(&self, dialect: &str, field: &str, filter: impl Into<Where>) -> Result<Command> {
        self.aggregate::<E>(dialect, &Aggregate::sum(field), filter)
    }

    /// `MIN` of `field`.
    ///
    /// # Errors
    ///
    /// As [`aggregate`](Self::aggregate).
    pub fn min<E: Entity>(&self, dialect: &str, field: &str, filter: impl Into<Where>) -> Result<Command> {
        self.aggregate::<E>(dialect, &Aggregate::min(field), filter)
    }

    /// `MAX` of `field`.
    ///
    /// # Errors
    ///
    /// As [`aggregate`](Self::aggregate).
    pub fn max<E: Entity>(&self, dialect: &str, field: &str, filter: impl Into<Where>) -> Result<Command> {
        self.aggregate::<E>(dialect, &Aggregate::max(field), filter)
    }

    /// Insert one entity.
    ///
    /// # Errors
    ///
    /// Resolution or build failures; [`Error::MissingField`] when the entity
    /// does not expose a mapped property.
    pub fn insert<E: Entity>(&self, dialect: &str, entity: &E) -> Result<Command> {
        let op = OperationKind::Insert;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let key = self.key(&shape, op, &settings, None);
        let statement = self
            .inner
            .statements
            .get_or_compute(key, || self.statement_builder(&settings, &shape).insert())?;
        statement.bind(&[], &[entity])
    }

    /// Insert entities in batches of `batch_size` rows, or of the configured
    /// size when `None`.
    ///
    /// On a dialect without multi-statement support the configured size
    /// falls back to single rows; an explicit size above one is rejected.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBatchSize`] outside of `1..=max_batch_size`, plus the
    /// errors of [`insert`](Self::insert).
    pub fn insert_all<E: Entity>(
        &self,
        dialect: &str,
        entities: &[E],
        batch_size: Option<usize>
    ) -> Result<Vec<Command>> {
        let op = OperationKind::InsertAll;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let size = self.batch_size(&settings, batch_size)?;
        entities
            .chunks(size)
            .map(|chunk| {
                let key = self.key(&shape, op, &settings, None).batch_size(chunk.len());
                let statement = self.inner.statements.get_or_compute(key, || {
                    self.statement_builder(&settings, &shape).insert_all(chunk.len())
                })?;
                statement.bind(&[], &chunk.iter().collect::<Vec<_>>())
            })
            .collect()
    }

    /// Update one entity matched on its primary key.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPrimaryKey`] when `E` has no key, plus the errors of
    /// [`insert`](Self::insert).
    pub fn update<E: Entity>(&self, dialect: &str, entity: &E) -> Result<Command> {
        self.update_where(dialect, entity, Where::All)
    }

    /// Update the rows matching `filter` with the values of `entity`.
    ///
    /// [`Where::All`] matches on the primary key instead of every row.
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update) and [`query`](Self::query).
    pub fn update_where<E: Entity>(
        &self,
        dialect: &str,
        entity: &E,
        filter: impl Into<Where>
    ) -> Result<Command> {
        let op = OperationKind::Update;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let condition = self.condition(&shape, filter.into())?;
        let key = self.key(&shape, op, &settings, condition.as_ref());
        let statement = self.inner.statements.get_or_compute(key, || {
            self.statement_builder(&settings, &shape).update(condition.as_ref())
        })?;
        statement.bind(&values(condition.as_ref()), &[entity])
    }

    /// Update entities in batches, each row matched on `qualifiers` or on
    /// the primary key when empty.
    ///
    /// # Errors
    ///
    /// As [`insert_all`](Self::insert_all) and [`update`](Self::update).
    pub fn update_all<E: Entity>(
        &self,
        dialect: &str,
        entities: &[E],
        qualifiers: &[&str],
        batch_size: Option<usize>
    ) -> Result<Vec<Command>> {
        let op = OperationKind::UpdateAll;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let size = self.batch_size(&settings, batch_size)?;
        let qualifiers = owned(qualifiers);
        entities
            .chunks(size)
            .map(|chunk| {
                let key = self
                    .key(&shape, op, &settings, None)
                    .fields(qualifiers.clone())
                    .batch_size(chunk.len());
                let statement = self.inner.statements.get_or_compute(key, || {
                    self.statement_builder(&settings, &shape)
                        .update_all(chunk.len(), &qualifiers)
                })?;
                statement.bind(&[], &chunk.iter().collect::<Vec<_>>())
            })
            .collect()
    }

    /// Delete the rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn delete<E: Entity>(&self, dialect: &str, filter: impl Into<Where>) -> Result<Command> {
        self.filtered::<E>(dialect, OperationKind::Delete, filter.into(), None)
    }

    /// Delete the given entities by primary key.
    ///
    /// A single key column renders `IN`; composite keys render one `AND`
    /// group per entity joined by `OR`. An empty slice matches no row.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPrimaryKey`] when `E` has no key;
    /// [`Error::MissingField`] when an entity does not expose a key property.
    pub fn delete_all<E: Entity>(&self, dialect: &str, entities: &[E]) -> Result<Command> {
        let shape = self.shape::<E>();
        let keys = shape.primary_keys().collect::<Vec<_>>();
        let key_value = |entity: &E, property: &'static str| {
            entity.property(property).ok_or_else(|| Error::MissingField {
                entity: shape.type_name(),
                field:  property.to_string()
            })
        };

        let tree: ConditionNode = match keys.as_slice() {
            [] => {
                return Err(Error::MissingPrimaryKey {
                    entity:    shape.type_name(),
                    operation: OperationKind::DeleteAll
                });
            }
            [key, ..] if entities.is_empty() => {
                Comparison::new(key.property, Operator::In, Value::List(Vec::new())).into()
            }
            [key] => {
                let list = entities
                    .iter()
                    .map(|e| key_value(e, key.property))
                    .collect::<Result<Vec<_>>>()?;
                Comparison::new(key.property, Operator::In, Value::List(list)).into()
            }
            composite => ConditionNode::or(
                entities
                    .iter()
                    .map(|e| {
                        composite
                            .iter()
                            .map(|k| {
                                key_value(e, k.property)
                                    .map(|v| Comparison::new(k.property, Operator::Equal, v))
                            })
                            .collect::<Result<Vec<_>>>()
                            .map(ConditionNode::from_fields)
                    })
                    .collect::<Result<Vec<_>>>()?
            )
        };
        self.filtered::<E>(dialect, OperationKind::DeleteAll, Where::Tree(tree), None)
    }

    /// Insert or update one entity matched on `qualifiers`, or on the
    /// primary key when empty.
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update).
    pub fn merge<E: Entity>(&self, dialect: &str, entity: &E, qualifiers: &[&str]) -> Result<Command> {
        let op = OperationKind::Merge;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let qualifiers = owned(qualifiers);
        let key = self.key(&shape, op, &settings, None).fields(qualifiers.clone());
        let statement = self.inner.statements.get_or_compute(key, || {
            self.statement_builder(&settings, &shape).merge(&qualifiers)
        })?;
        statement.bind(&[], &[entity])
    }

    /// Upsert entities in batches, each row matched on `qualifiers` or on
    /// the primary key when empty.
    ///
    /// # Errors
    ///
    /// As [`insert_all`](Self::insert_all) and [`merge`](Self::merge).
    pub fn merge_all<E: Entity>(
        &self,
        dialect: &str,
        entities: &[E],
        qualifiers: &[&str],
        batch_size: Option<usize>
    ) -> Result<Vec<Command>> {
        let op = OperationKind::MergeAll;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let size = self.batch_size(&settings, batch_size)?;
        let qualifiers = owned(qualifiers);
        entities
            .chunks(size)
            .map(|chunk| {
                let key = self
                    .key(&shape, op, &settings, None)
                    .fields(qualifiers.clone())
                    .batch_size(chunk.len());
                let statement = self.inner.statements.get_or_compute(key, || {
                    self.statement_builder(&settings, &shape)
                        .merge_all(chunk.len(), &qualifiers)
                })?;
                statement.bind(&[], &chunk.iter().collect::<Vec<_>>())
            })
            .collect()
    }

    /// Remove every row of `E`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDialect`] for unknown dialects.
    pub fn truncate<E: Entity>(&self, dialect: &str) -> Result<Command> {
        let op = OperationKind::Truncate;
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let key = self.key(&shape, op, &settings, None);
        let statement = self
            .inner
            .statements
            .get_or_compute(key, || self.statement_builder(&settings, &shape).truncate())?;
        statement.bind::<E>(&[], &[])
    }

    fn filtered<E: Entity>(
        &self,
        dialect: &str,
        op: OperationKind,
        filter: Where,
        hints: Option<&str>
    ) -> Result<Command> {
        let (settings, shape) = self.prepare::<E>(dialect)?;
        let condition = self.condition(&shape, filter)?;
        let key = self
            .key(&shape, op, &settings, condition.as_ref())
            .hints(hints.map(str::to_string));
        let statement = self.inner.statements.get_or_compute(key, || {
            let builder = self.statement_builder(&settings, &shape);
            let condition = condition.as_ref();
            match op {
                OperationKind::Count => builder.count(condition, hints),
                OperationKind::Exists => builder.exists(condition, hints),
                OperationKind::DeleteAll => builder.delete_all(condition),
                _ => builder.delete(condition)
            }
        })?;
        statement.bind::<E>(&values(condition.as_ref()), &[])
    }

    fn prepare<E: Entity>(&self, dialect: &str) -> Result<(Arc<DialectSettings>, Arc<EntityShape>)> {
        let settings = self.inner.dialects.resolve(dialect)?;
        Ok((settings, self.shape::<E>()))
    }

    fn condition(&self, shape: &EntityShape, filter: Where) -> Result<Option<ConditionNode>> {
        let node = match filter {
            Where::All => return Ok(None),
            Where::Expr(expr) => parser::parse(&expr, shape)?,
            Where::Tree(tree) => tree
        };
        // Cache keys carry no values; validate on every call.
        node.validate()?;
        Ok(Some(node))
    }

    fn key(
        &self,
        shape: &EntityShape,
        op: OperationKind,
        settings: &Arc<DialectSettings>,
        condition: Option<&ConditionNode>
    ) -> StatementKey {
        StatementKey::new(shape.type_id(), op, Arc::clone(settings))
            .condition(condition.map(ConditionNode::shape))
    }

    fn statement_builder<'a>(
        &self,
        settings: &'a Arc<DialectSettings>,
        shape: &'a EntityShape
    ) -> StatementBuilder<'a> {
        StatementBuilder::new(settings, shape).with_max_batch_size(self.inner.config.max_batch_size)
    }

    fn batch_size(&self, settings: &DialectSettings, requested: Option<usize>) -> Result<usize> {
        let config = &self.inner.config;
        let size = match requested {
            Some(size) => size,
            None if !settings.multiple_statements_supported => 1,
            None => config.batch_size
        };
        if size == 0 || size > config.max_batch_size {
            return Err(Error::InvalidBatchSize {
                size,
                max: config.max_batch_size
            });
        }
        Ok(size)
    }
}

fn values(condition: Option<&ConditionNode>) -> Vec<Value> {
    condition.map(ConditionNode::values).unwrap_or_default()
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::FieldDescriptor,
        statement::{OrderField, ParameterSource}
    };

    #[derive(Debug, Clone)]
    struct Person {
        id:   i64,
        name: String,
        age:  Option<i32>
    }

    impl Entity for Person {
        fn describe() -> EntityShape {
            EntityShape::new::<Self>("Person")
                .field(FieldDescriptor::new("id", "i64").column("Id").primary().identity())
                .field(FieldDescriptor::new("name", "String").column("Name"))
                .field(FieldDescriptor::new("age", "Option<i32>").column("Age").nullable())
        }

        fn property(&self, name: &str) -> Option<Value> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.clone().into()),
                "age" => Some(self.age.into()),
                _ => None
            }
        }
    }

    struct Membership {
        user:  i64,
        group: i64
    }

    impl Entity for Membership {
        fn describe() -> EntityShape {
            EntityShape::new::<Self>("Membership")
                .field(FieldDescriptor::new("user", "i64").column("UserId").primary())
                .field(FieldDescriptor::new("group", "i64").column("GroupId").primary())
        }

        fn property(&self, name: &str) -> Option<Value> {
            match name {
                "user" => Some(self.user.into()),
                "group" => Some(self.group.into()),
                _ => None
            }
        }
    }

    fn people(n: i64) -> Vec<Person> {
        (1..=n)
            .map(|id| Person {
                id,
                name: format!("p{id}"),
                age: None
            })
            .collect()
    }

    #[test]
    fn query_binds_condition_values() {
        let engine = Engine::new();
        let filter = Expr::member("age").eq(Value::Null) | Expr::member("name").eq("Bob");
        let command = engine
            .query::<Person>("sqlserver", filter, &QueryOptions::new())
            .unwrap();
        assert_eq!(
            command.text,
            "SELECT [Id], [Name], [Age] FROM [dbo].[Person] WHERE ([Age] IS NULL) OR ([Name] = @Name);"
        );
        assert_eq!(command.parameters.len(), 1);
        assert_eq!(command.value("Name"), Some(&Value::from("Bob")));
    }

    #[test]
    fn statements_are_reused_across_values() {
        let engine = Engine::new();
        for name in ["a", "b", "c"] {
            let command = engine
                .count::<Person>("sqlserver", Expr::member("name").eq(name), None)
                .unwrap();
            assert_eq!(command.value("Name"), Some(&Value::from(name)));
        }
        assert_eq!(engine.statements().len(), 1);
        assert_eq!(engine.metadata().len(), 1);

        engine.flush();
        assert!(engine.statements().is_empty());
        assert!(engine.metadata().is_empty());
    }

    #[test]
    fn unknown_dialect() {
        let err = Engine::new().truncate::<Person>("oracle").unwrap_err();
        assert_eq!(err, Error::UnsupportedDialect("oracle".into()));
    }

    #[test]
    fn insert_binds_entity_properties() {
        let engine = Engine::new();
        let person = Person {
            id:   0,
            name: "Ann".into(),
            age:  Some(30)
        };
        let command = engine.insert("postgres", &person).unwrap();
        assert_eq!(
            command.text,
            "INSERT INTO \"public\".\"Person\" (\"Name\", \"Age\") VALUES (@Name, @Age) RETURNING \"Id\" AS \"Result\";"
        );
        assert_eq!(command.value("Age"), Some(&Value::I32(30)));
    }

    #[test]
    fn insert_all_chunks_rows() {
        let engine = Engine::new();
        let commands = engine.insert_all("sqlserver", &people(5), Some(2)).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].value("Name_1"), Some(&Value::from("p2")));
        assert_eq!(commands[2].parameters.len(), 2);
        assert_eq!(engine.statements().len(), 2);

        let err = engine.insert_all("sqlserver", &people(1), Some(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidBatchSize { size: 0, .. }));
    }

    #[test]
    fn configured_batch_size() {
        let engine = Engine::builder().batch_size(3).build().unwrap();
        let commands = engine.insert_all("sqlite", &people(7), None).unwrap();
        assert_eq!(commands.len(), 3);

        let err = Engine::builder().batch_size(5).max_batch_size(4).build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBatchSize {
                size: 5,
                max:  4
            }
        );
    }

    #[test]
    fn single_statement_dialect_falls_back_to_single_rows() {
        let mut settings = crate::dialect::sqlite::settings();
        settings.multiple_statements_supported = false;
        let engine = Engine::builder().dialect("strict", settings).build().unwrap();
        let commands = engine.insert_all("strict", &people(3), None).unwrap();
        assert_eq!(commands.len(), 3);
        assert!(engine.insert_all("strict", &people(3), Some(2)).is_err());
    }

    #[test]
    fn update_by_key_and_by_filter() {
        let engine = Engine::new();
        let person = people(1).remove(0);
        let command = engine.update("sqlserver", &person).unwrap();
        assert!(command.text.ends_with("WHERE ([Id] = @Id);"));
        assert_eq!(command.value("Id"), Some(&Value::I64(1)));

        let command = engine
            .update_where("sqlserver", &person, Expr::member("name").eq("old"))
            .unwrap();
        assert_eq!(command.value("Name"), Some(&Value::from("p1")));
        assert_eq!(command.value("Name_1"), Some(&Value::from("old")));
    }

    #[test]
    fn update_all_with_qualifiers() {
        let engine = Engine::new();
        let commands = engine
            .update_all("sqlserver", &people(2), &["name"], None)
            .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].value("Name_1"), Some(&Value::from("p2")));
    }

    #[test]
    fn delete_all_by_single_key() {
        let engine = Engine::new();
        let command = engine.delete_all("sqlserver", &people(2)).unwrap();
        assert_eq!(
            command.text,
            "DELETE FROM [dbo].[Person] WHERE ([Id] IN (@Id_In_0, @Id_In_1));"
        );
        assert_eq!(command.value("Id_In_1"), Some(&Value::I64(2)));
    }

    #[test]
    fn delete_all_by_composite_key() {
        let engine = Engine::new();
        let rows = [
            Membership {
                user:  1,
                group: 2
            },
            Membership {
                user:  3,
                group: 4
            }
        ];
        let command = engine.delete_all("sqlite", &rows).unwrap();
        assert_eq!(
            command.text,
            "DELETE FROM [Membership] WHERE (([UserId] = @UserId) AND ([GroupId] = @GroupId)) OR (([UserId] = @UserId_1) AND ([GroupId] = @GroupId_1));"
        );
        assert_eq!(command.value("GroupId_1"), Some(&Value::I64(4)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "batch_size": 25 }"#).unwrap();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(config.default_dialect, "sqlserver");

        let json = serde_json::to_value(&EngineConfig::default()).unwrap();
        assert_eq!(json["batch_size"], DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn delete_all_without_entities_matches_nothing() {
        let engine = Engine::new();
        let command = engine.delete_all::<Membership>("sqlserver", &[]).unwrap();
        assert_eq!(command.text, "DELETE FROM [dbo].[Membership] WHERE (1 = 0);");
        assert!(command.parameters.is_empty());

        let command = engine.delete_all::<Person>("sqlite", &[]).unwrap();
        assert_eq!(command.text, "DELETE FROM [Person] WHERE (1 = 0);");
    }

    #[test]
    fn invalid_tree_fails_on_cold_and_warm_cache() {
        let engine = Engine::new();
        let invalid = || {
            Where::Tree(ConditionNode::Comparison(Comparison {
                field:    "name".into(),
                operator: Operator::Equal,
                value:    Value::Null,
                db_type:  None,
                function: None
            }))
        };

        let cold = engine.delete::<Person>("sqlserver", invalid()).unwrap_err();
        assert!(matches!(cold, Error::InvalidConditionShape { ref field, .. } if field == "name"));

        engine
            .delete::<Person>("sqlserver", Comparison::new("name", Operator::Equal, "a"))
            .unwrap();
        assert_eq!(engine.statements().len(), 1);

        let warm = engine.delete::<Person>("sqlserver", invalid()).unwrap_err();
        assert_eq!(warm, cold);
        assert!(engine.query::<Person>("sqlserver", invalid(), &QueryOptions::new()).is_err());
    }

    #[test]
    fn merge_all_chunks_rows() {
        let engine = Engine::new();
        let commands = engine.merge_all("postgres", &people(3), &[], Some(2)).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].value("Id_1"), Some(&Value::I64(2)));
        assert_eq!(commands[1].value("Name"), Some(&Value::from("p3")));
        assert!(commands[0].text.contains("ON CONFLICT (\"Id\")"));
        assert_eq!(engine.statements().len(), 2);

        let err = engine.merge_all("postgres", &people(1), &[], Some(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidBatchSize { size: 0, .. }));
    }

    #[test]
    fn merge_and_aggregates() {
        let engine = Engine::new();
        let person = people(1).remove(0);
        let command = engine.merge("mysql", &person, &[]).unwrap();
        assert!(command.text.contains("ON DUPLICATE KEY UPDATE"));

        let command = engine.average::<Person>("sqlserver", "age", Where::All).unwrap();
        assert!(command.text.starts_with("SELECT AVG(CAST([Age] AS FLOAT))"));
        let command = engine.max::<Person>("postgres", "id", Where::All).unwrap();
        assert!(command.text.starts_with("SELECT MAX(\"Id\") AS \"MaxValue\""));
    }

    #[test]
    fn ordered_query_options() {
        let engine = Engine::new();
        let options = QueryOptions::new().order_by(OrderField::asc("name")).top(3);
        let command = engine.query::<Person>("sqlserver", Where::All, &options).unwrap();
        assert_eq!(
            command.text,
            "SELECT TOP (3) [Id], [Name], [Age] FROM [dbo].[Person] ORDER BY [Name] ASC;"
        );
    }

    #[test]
    fn parse_uses_cached_shape() {
        let engine = Engine::new();
        let node = engine.parse::<Person>(&Expr::member("Name").eq("x")).unwrap();
        assert_eq!(node.values(), vec![Value::from("x")]);
        let shape = engine.shape::<Person>();
        let statement = StatementBuilder::new(&engine.dialects().resolve("pg").unwrap(), &shape)
            .delete(Some(&node))
            .unwrap();
        assert_eq!(statement.text(), "DELETE FROM \"public\".\"Person\" WHERE (\"Name\" = @Name);");
        assert_eq!(statement.parameters()[0].source, ParameterSource::Condition(0));
    }
}
