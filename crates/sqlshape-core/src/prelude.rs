// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use sqlshape_core::prelude::*;
//!
//! let engine = Engine::new();
//! assert!(engine.dialects().contains("sqlserver"));
//! ```

pub use crate::{
    Aggregate, Column, Command, Comparison, ConditionNode, DbType, Engine, EngineConfig, Entity,
    EntityShape, Error, ExecutionError, Executor, Expr, FieldDescriptor, Operator, OrderField,
    Pagination, QueryOptions, Session, SortDirection, Value, Where, async_trait
};
