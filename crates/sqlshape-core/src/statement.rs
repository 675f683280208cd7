// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated statements and their late-bound parameters.
//!
//! A [`GeneratedStatement`] is the cacheable half of a command: SQL text and
//! a descriptor per placeholder saying where its value comes from. Binding
//! pairs it with the values of one call and yields a [`Command`].
//!
//! # Overview
//!
//! - [`OperationKind`] — Which statement was generated
//! - [`QueryOptions`] / [`OrderField`] / [`Aggregate`] — Statement options
//! - [`ParameterSource`] — Where a placeholder's value comes from
//! - [`StatementBuilder`] — Renders statements for one dialect and entity
//! - [`StatementKey`] — Structural cache key

mod builder;
mod coerce;
mod key;

use std::{any::TypeId, fmt, sync::Arc};

pub use builder::{DEFAULT_MAX_BATCH_SIZE, StatementBuilder};
pub use key::StatementKey;

use crate::{
    Pagination, SortDirection,
    command::{Command, Parameter},
    dialect::DialectSettings,
    entity::Entity,
    error::{Error, Result},
    value::{DbType, Value}
};

/// Kind of generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `SELECT` of rows.
    Query,
    /// `COUNT(*)`.
    Count,
    /// Existence probe.
    Exists,
    /// `AVG`.
    Average,
    /// `SUM`.
    Sum,
    /// `MIN`.
    Min,
    /// `MAX`.
    Max,
    /// Single-row `INSERT`.
    Insert,
    /// Batched `INSERT`.
    InsertAll,
    /// Single-row `UPDATE`.
    Update,
    /// Batched `UPDATE`.
    UpdateAll,
    /// `DELETE` by condition.
    Delete,
    /// `DELETE` of a set of rows.
    DeleteAll,
    /// Upsert.
    Merge,
    /// Batched upsert.
    MergeAll,
    /// Remove every row.
    Truncate
}

impl OperationKind {
    /// Lower-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Count => "count",
            Self::Exists => "exists",
            Self::Average => "average",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Insert => "insert",
            Self::InsertAll => "insert_all",
            Self::Update => "update",
            Self::UpdateAll => "update_all",
            Self::Delete => "delete",
            Self::DeleteAll => "delete_all",
            Self::Merge => "merge",
            Self::MergeAll => "merge_all",
            Self::Truncate => "truncate"
        }
    }

    /// Check if the statement only reads.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(
            self,
            Self::Query | Self::Count | Self::Exists | Self::Average | Self::Sum | Self::Min | Self::Max
        )
    }

    /// Check if the statement is built per batch.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::InsertAll | Self::UpdateAll | Self::MergeAll)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderField {
    /// Property or column name.
    pub field: String,

    /// Direction.
    pub direction: SortDirection
}

impl OrderField {
    /// Order by `field` in `direction`.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction
        }
    }

    /// Ascending order.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending order.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Options of a row query.
///
/// # Example
///
/// ```rust
/// use sqlshape_core::{OrderField, Pagination, QueryOptions};
///
/// let options = QueryOptions::new()
///     .fields(["id", "name"])
///     .order_by(OrderField::desc("id"))
///     .page(Pagination::page(2, 25));
/// assert_eq!(options.fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryOptions {
    /// Projected fields. Empty selects every field.
    pub fields: Vec<String>,

    /// Sort order.
    pub order_by: Vec<OrderField>,

    /// Maximum rows when no page is given.
    pub top: Option<u64>,

    /// Page window, taking precedence over `top`.
    pub page: Option<Pagination>,

    /// Raw table hints, e.g. `WITH (NOLOCK)`.
    pub hints: Option<String>
}

impl QueryOptions {
    /// Default options: every field, no order, no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a subset of fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Append a sort entry.
    #[must_use]
    pub fn order_by(mut self, field: OrderField) -> Self {
        self.order_by.push(field);
        self
    }

    /// Limit the number of rows.
    #[must_use]
    pub const fn top(mut self, rows: u64) -> Self {
        self.top = Some(rows);
        self
    }

    /// Select one page.
    #[must_use]
    pub const fn page(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach table hints.
    #[must_use]
    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        self.hints = Some(hints.into());
        self
    }
}

/// Aggregate function over one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// `AVG`
    Average,
    /// `SUM`
    Sum,
    /// `MIN`
    Min,
    /// `MAX`
    Max
}

impl AggregateFunction {
    /// SQL function name.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Average => "AVG",
            Self::Sum => "SUM",
            Self::Min => "MIN",
            Self::Max => "MAX"
        }
    }

    /// Result column alias.
    #[must_use]
    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Average => "AverageValue",
            Self::Sum => "SumValue",
            Self::Min => "MinValue",
            Self::Max => "MaxValue"
        }
    }

    /// Operation kind of the generated statement.
    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        match self {
            Self::Average => OperationKind::Average,
            Self::Sum => OperationKind::Sum,
            Self::Min => OperationKind::Min,
            Self::Max => OperationKind::Max
        }
    }
}

/// Aggregate request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aggregate {
    /// Function.
    pub function: AggregateFunction,

    /// Property or column name.
    pub field: String,

    /// Cast target for `AVG`. The dialect default applies when unset.
    pub db_type: Option<DbType>,

    /// Raw table hints.
    pub hints: Option<String>
}

impl Aggregate {
    /// Aggregate `function` over `field`.
    pub fn new(function: AggregateFunction, field: impl Into<String>) -> Self {
        Self {
            function,
            field: field.into(),
            db_type: None,
            hints: None
        }
    }

    /// `AVG(field)`
    pub fn average(field: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Average, field)
    }

    /// `SUM(field)`
    pub fn sum(field: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Sum, field)
    }

    /// `MIN(field)`
    pub fn min(field: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Min, field)
    }

    /// `MAX(field)`
    pub fn max(field: impl Into<String>) -> Self {
        Self::new(AggregateFunction::Max, field)
    }

    /// Cast the argument to an explicit type.
    #[must_use]
    pub const fn cast(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    /// Attach table hints.
    #[must_use]
    pub fn hints(mut self, hints: impl Into<String>) -> Self {
        self.hints = Some(hints.into());
        self
    }
}

/// Origin of a placeholder's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterSource {
    /// N-th value of the condition tree in traversal order.
    Condition(usize),

    /// Property of the n-th entity of the call.
    Property {
        /// Row index within the batch.
        row:      usize,
        /// Property name.
        property: &'static str
    }
}

/// Placeholder descriptor of a generated statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    /// Name without the dialect prefix.
    pub name: String,

    /// Where the value comes from.
    pub source: ParameterSource,

    /// Explicit database type.
    pub db_type: Option<DbType>
}

/// Cached SQL text with its parameter descriptors.
///
/// Immutable once built. Shared through `Arc` by the statement cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStatement {
    text:        String,
    parameters:  Vec<ParameterDescriptor>,
    settings:    Arc<DialectSettings>,
    entity:      TypeId,
    entity_name: &'static str,
    operation:   OperationKind,
    batch_size:  Option<usize>
}

impl GeneratedStatement {
    /// SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder descriptors in text order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Dialect the text was rendered for.
    #[must_use]
    pub fn settings(&self) -> &Arc<DialectSettings> {
        &self.settings
    }

    /// Entity type identity.
    #[must_use]
    pub const fn entity(&self) -> TypeId {
        self.entity
    }

    /// Entity type name.
    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    /// Operation kind.
    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Rows per statement for batched operations.
    #[must_use]
    pub const fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    /// Bind condition values and entity rows into a command.
    ///
    /// `conditions` are the values of the condition tree in traversal order
    /// (see [`ConditionNode::values`](crate::ConditionNode::values)); `rows`
    /// are the entities the statement reads properties from.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingField`] when a row lacks a referenced property.
    /// - [`Error::InvalidConditionShape`] when fewer condition values are
    ///   supplied than the statement has condition placeholders.
    pub fn bind<E: Entity>(&self, conditions: &[Value], rows: &[&E]) -> Result<Command> {
        let parameters = self
            .parameters
            .iter()
            .map(|descriptor| {
                let value = match &descriptor.source {
                    ParameterSource::Condition(index) => {
                        conditions.get(*index).cloned().ok_or_else(|| {
                            Error::invalid_shape(
                                &descriptor.name,
                                format!("no condition value at position {index}")
                            )
                        })?
                    }
                    ParameterSource::Property {
                        row,
                        property
                    } => rows
                        .get(*row)
                        .and_then(|entity| entity.property(property))
                        .ok_or_else(|| Error::MissingField {
                            entity: self.entity_name,
                            field:  (*property).to_string()
                        })?
                };
                let value = coerce::coerce(&self.settings, descriptor.db_type, value);
                Ok(Parameter::input(descriptor.name.clone(), value, descriptor.db_type))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Command::text(self.text.clone(), parameters))
    }
}
