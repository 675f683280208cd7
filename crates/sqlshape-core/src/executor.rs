// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Executor contract and async sessions.
//!
//! The engine never talks to a database. An [`Executor`] receives finished
//! [`Command`]s; a [`Session`] translates synchronously and awaits only the
//! executor.
//!
//! # Overview
//!
//! - [`Executor`] — Async trait implemented by the database client adapter
//! - [`Session`] — Engine + executor + dialect
//! - [`ExecutionError`] — Translation, execution or result failure
//!
//! # Example
//!
//! ```rust,ignore
//! let session = Session::new(&engine, &client).with_dialect("postgres");
//! let rows = session.query::<User>(User::COLUMNS.active.is_true(), &QueryOptions::new()).await?;
//! ```

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    command::Command,
    engine::{Engine, Where},
    entity::Entity,
    error::Error,
    statement::{Aggregate, QueryOptions},
    value::Value
};

/// Database client adapter.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Client error type.
    type Error: StdError + Send + Sync + 'static;

    /// Materialized row type.
    type Row: Send;

    /// Run a command that returns rows.
    async fn execute_query(&self, command: Command) -> Result<Vec<Self::Row>, Self::Error>;

    /// Run a command and return the number of affected rows.
    async fn execute_non_query(&self, command: Command) -> Result<u64, Self::Error>;

    /// Run a command and return the first column of the first row.
    async fn execute_scalar(&self, command: Command) -> Result<Option<Value>, Self::Error>;
}

/// Error wrapper for session operations.
#[derive(Debug)]
pub enum ExecutionError<E> {
    /// The operation could not be translated to SQL.
    Translation(Error),

    /// The executor failed.
    Execution(E),

    /// The executor answered with a scalar the operation cannot interpret.
    UnexpectedScalar(Option<Value>)
}

impl<E: fmt::Display> fmt::Display for ExecutionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translation(e) => write!(f, "translation failed: {e}"),
            Self::Execution(e) => write!(f, "execution failed: {e}"),
            Self::UnexpectedScalar(Some(value)) => write!(f, "unexpected scalar result: {value:?}"),
            Self::UnexpectedScalar(None) => f.write_str("unexpected empty scalar result")
        }
    }
}

impl<E: StdError + 'static> StdError for ExecutionError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Translation(e) => Some(e),
            Self::Execution(e) => Some(e),
            Self::UnexpectedScalar(_) => None
        }
    }
}

impl<E> From<Error> for ExecutionError<E> {
    fn from(error: Error) -> Self {
        Self::Translation(error)
    }
}

impl<E> ExecutionError<E> {
    /// Check if translation failed.
    pub const fn is_translation(&self) -> bool {
        matches!(self, Self::Translation(_))
    }

    /// Check if the executor failed.
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Translation error, if any.
    pub fn translation(self) -> Option<Error> {
        match self {
            Self::Translation(e) => Some(e),
            _ => None
        }
    }

    /// Executor error, if any.
    pub fn execution(self) -> Option<E> {
        match self {
            Self::Execution(e) => Some(e),
            _ => None
        }
    }
}

type SessionResult<T, X> = Result<T, ExecutionError<<X as Executor>::Error>>;

/// Engine, executor and dialect bound together.
#[derive(Debug)]
pub struct Session<'e, X> {
    engine:   &'e Engine,
    executor: &'e X,
    dialect:  String
}

impl<'e, X: Executor> Session<'e, X> {
    /// Session on the engine's default dialect.
    pub fn new(engine: &'e Engine, executor: &'e X) -> Self {
        Self {
            engine,
            executor,
            dialect: engine.config().default_dialect.clone()
        }
    }

    /// Switch to another dialect identifier.
    #[must_use]
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    /// Dialect identifier in use.
    #[must_use]
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::Translation`] before anything is sent;
    /// [`ExecutionError::Execution`] from the executor.
    pub async fn query<E: Entity>(
        &self,
        filter: impl Into<Where>,
        options: &QueryOptions
    ) -> SessionResult<Vec<X::Row>, X> {
        let command = self.engine.query::<E>(&self.dialect, filter, options)?;
        self.rows(command).await
    }

    /// Number of rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query); [`ExecutionError::UnexpectedScalar`] when
    /// the executor does not answer with an integer.
    pub async fn count<E: Entity>(&self, filter: impl Into<Where>) -> SessionResult<i64, X> {
        let command = self.engine.count::<E>(&self.dialect, filter, None)?;
        let value = self.scalar(command).await?;
        match value {
            Some(Value::I64(n)) => Ok(n),
            Some(Value::I32(n)) => Ok(i64::from(n)),
            Some(Value::I16(n)) => Ok(i64::from(n)),
            other => Err(ExecutionError::UnexpectedScalar(other))
        }
    }

    /// Whether any row of `E` matches `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn exists<E: Entity>(&self, filter: impl Into<Where>) -> SessionResult<bool, X> {
        let command = self.engine.exists::<E>(&self.dialect, filter, None)?;
        let value = self.scalar(command).await?;
        Ok(value.is_some_and(|v| !v.is_null()))
    }

    /// Aggregate over rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn aggregate<E: Entity>(
        &self,
        aggregate: &Aggregate,
        filter: impl Into<Where>
    ) -> SessionResult<Option<Value>, X> {
        let command = self.engine.aggregate::<E>(&self.dialect, aggregate, filter)?;
        self.scalar(command).await
    }

    /// Insert one entity and return the generated identity, if any.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn insert<E: Entity>(&self, entity: &E) -> SessionResult<Option<Value>, X> {
        let command = self.engine.insert(&self.dialect, entity)?;
        self.scalar(command).await
    }

    /// Insert entities in batches and return the affected row count.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query). Batches sent before a failure stay applied.
    pub async fn insert_all<E: Entity>(&self, entities: &[E]) -> SessionResult<u64, X> {
        let commands = self.engine.insert_all(&self.dialect, entities, None)?;
        self.non_queries(commands).await
    }

    /// Update one entity by primary key.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn update<E: Entity>(&self, entity: &E) -> SessionResult<u64, X> {
        let command = self.engine.update(&self.dialect, entity)?;
        self.non_query(command).await
    }

    /// Update the rows matching `filter` with the values of `entity`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn update_where<E: Entity>(
        &self,
        entity: &E,
        filter: impl Into<Where>
    ) -> SessionResult<u64, X> {
        let command = self.engine.update_where(&self.dialect, entity, filter)?;
        self.non_query(command).await
    }

    /// Update entities in batches matched on `qualifiers`.
    ///
    /// # Errors
    ///
    /// As [`insert_all`](Self::insert_all).
    pub async fn update_all<E: Entity>(
        &self,
        entities: &[E],
        qualifiers: &[&str]
    ) -> SessionResult<u64, X> {
        let commands = self
            .engine
            .update_all(&self.dialect, entities, qualifiers, None)?;
        self.non_queries(commands).await
    }

    /// Delete the rows of `E` matching `filter`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn delete<E: Entity>(&self, filter: impl Into<Where>) -> SessionResult<u64, X> {
        let command = self.engine.delete::<E>(&self.dialect, filter)?;
        self.non_query(command).await
    }

    /// Delete entities by primary key.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn delete_all<E: Entity>(&self, entities: &[E]) -> SessionResult<u64, X> {
        let command = self.engine.delete_all(&self.dialect, entities)?;
        self.non_query(command).await
    }

    /// Upsert one entity and return the identity, if any.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn merge<E: Entity>(
        &self,
        entity: &E,
        qualifiers: &[&str]
    ) -> SessionResult<Option<Value>, X> {
        let command = self.engine.merge(&self.dialect, entity, qualifiers)?;
        self.scalar(command).await
    }

    /// Upsert entities in batches and return the affected row count.
    ///
    /// # Errors
    ///
    /// As [`insert_all`](Self::insert_all).
    pub async fn merge_all<E: Entity>(
        &self,
        entities: &[E],
        qualifiers: &[&str]
    ) -> SessionResult<u64, X> {
        let commands = self
            .engine
            .merge_all(&self.dialect, entities, qualifiers, None)?;
        self.non_queries(commands).await
    }

    /// Remove every row of `E`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub async fn truncate<E: Entity>(&self) -> SessionResult<u64, X> {
        let command = self.engine.truncate::<E>(&self.dialect)?;
        self.non_query(command).await
    }

    async fn rows(&self, command: Command) -> SessionResult<Vec<X::Row>, X> {
        debug!(dialect = %self.dialect, sql = %command.text, "executing query");
        self.executor
            .execute_query(command)
            .await
            .map_err(ExecutionError::Execution)
    }

    async fn scalar(&self, command: Command) -> SessionResult<Option<Value>, X> {
        debug!(dialect = %self.dialect, sql = %command.text, "executing scalar");
        self.executor
            .execute_scalar(command)
            .await
            .map_err(ExecutionError::Execution)
    }

    async fn non_query(&self, command: Command) -> SessionResult<u64, X> {
        debug!(dialect = %self.dialect, sql = %command.text, "executing non-query");
        self.executor
            .execute_non_query(command)
            .await
            .map_err(ExecutionError::Execution)
    }

    async fn non_queries(&self, commands: Vec<Command>) -> SessionResult<u64, X> {
        let mut affected = 0;
        for command in commands {
            affected += self.non_query(command).await?;
        }
        Ok(affected)
    }
}
