// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core engine for sqlshape.
//!
//! This crate turns typed predicates and entity descriptions into
//! parameterized SQL for several dialects and caches everything that does
//! not depend on the bound values. It is used by `#[derive(Entity)]`
//! generated code and can also be used standalone with manual
//! [`Entity`] implementations.
//!
//! # Overview
//!
//! - [`Entity`] / [`EntityShape`] — Entity registration and metadata
//! - [`Column`] / [`Expr`] — Typed predicate DSL
//! - [`ConditionNode`] — Condition tree produced by [`parse`]
//! - [`DialectSettings`] / [`DialectRegistry`] — Per-dialect constants
//! - [`StatementBuilder`] — SQL text generation
//! - [`Engine`] — Caches and the per-operation pipeline
//! - [`Executor`] / [`Session`] — Hand-off to a database client
//! - [`prelude`] — Convenient re-exports
//!
//! # Usage
//!
//! ```rust,ignore
//! use sqlshape_core::prelude::*;
//!
//! let engine = Engine::new();
//! let command = engine.query::<User>("postgres", User::COLUMNS.email.ends_with("@corp.io"), &QueryOptions::new())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod column;
pub mod command;
pub mod condition;
pub mod dialect;
pub mod engine;
pub mod entity;
pub mod error;
pub mod executor;
pub mod expression;
pub mod metadata;
pub mod parser;
pub mod prelude;
pub mod statement;
pub mod value;

/// Re-export async_trait for executor implementations.
pub use async_trait::async_trait;
pub use cache::StatementCache;
pub use column::Column;
pub use command::{Command, CommandType, Parameter, ParameterDirection};
pub use condition::{Combinator, Comparison, ConditionNode, ConditionShape, Operator};
pub use dialect::{DialectKind, DialectRegistry, DialectSettings};
pub use engine::{DEFAULT_BATCH_SIZE, Engine, EngineBuilder, EngineConfig, Where};
pub use entity::{Entity, EntityShape, FieldDescriptor};
pub use error::{Error, Result, Stage};
pub use executor::{ExecutionError, Executor, Session};
pub use expression::{BinaryOp, Capture, Expr};
pub use metadata::MetadataCache;
pub use parser::parse;
pub use statement::{
    Aggregate, AggregateFunction, DEFAULT_MAX_BATCH_SIZE, GeneratedStatement, OperationKind,
    OrderField, ParameterDescriptor, ParameterSource, QueryOptions, StatementBuilder, StatementKey
};
pub use value::{DbType, Value};

/// Row window of a query.
///
/// Rendered as `OFFSET .. FETCH NEXT ..` on SQL Server and as
/// `LIMIT .. OFFSET ..` elsewhere.
///
/// # Example
///
/// ```rust
/// use sqlshape_core::Pagination;
///
/// let page = Pagination::new(10, 0); // First 10 rows
/// let next = Pagination::new(10, 10); // Next 10 rows
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pagination {
    /// Maximum number of rows to return.
    pub limit: u64,

    /// Number of rows to skip.
    pub offset: u64
}

impl Pagination {
    /// Create a row window.
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit,
            offset
        }
    }

    /// Window for a zero-based page number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sqlshape_core::Pagination;
    ///
    /// let page_2 = Pagination::page(2, 25); // offset=50, limit=25
    /// assert_eq!(page_2.offset, 50);
    /// ```
    #[must_use]
    pub const fn page(page: u64, per_page: u64) -> Self {
        Self {
            limit:  per_page,
            offset: page.saturating_mul(per_page)
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit:  100,
            offset: 0
        }
    }
}

/// Sort direction of an `ORDER BY` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,

    /// Descending order (Z-A, 9-0, newest first).
    Desc
}

impl SortDirection {
    /// Convert to SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_new() {
        let p = Pagination::new(50, 100);
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 100);
    }

    #[test]
    fn pagination_page() {
        let p = Pagination::page(2, 25);
        assert_eq!(p.limit, 25);
        assert_eq!(p.offset, 50);
        assert_eq!(Pagination::page(u64::MAX, 2).offset, u64::MAX);
    }

    #[test]
    fn pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn sort_direction_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }
}
