// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL text generation.
//!
//! # Rendering Rules
//!
//! | Construct | Output |
//! |-----------|--------|
//! | Comparison | `([Name] = @Name)` |
//! | Function field | `(LEN([Name]) > @Name)` |
//! | Null check | `([Age] IS NULL)` |
//! | Range | `([Age] BETWEEN @Age_Left AND @Age_Right)` |
//! | List | `([Id] IN (@Id_In_0, @Id_In_1))` |
//! | Empty list | `(1 = 0)`, or `(1 = 1)` for `NOT IN` |
//! | Nested group | `((A) OR (B)) AND (C)` |
//! | Repeated name | `@Name`, `@Name_1`, `@Name_2` |
//! | Batch row `n > 0` | `@Name_n` |
//! | Batch upsert row | one `MERGE` / upsert per row, `n AS [OrderColumn]` |

use std::{collections::HashSet, sync::Arc};

use tracing::trace;

use super::{
    Aggregate, AggregateFunction, GeneratedStatement, OperationKind, ParameterDescriptor,
    ParameterSource, QueryOptions
};
use crate::{
    condition::{Comparison, ConditionNode, Operator},
    dialect::{DialectKind, DialectSettings},
    entity::{EntityShape, FieldDescriptor},
    error::{Error, Result},
    value::DbType
};

/// Largest batch accepted when no other limit is configured.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Renders statements of one entity for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    settings:       &'a Arc<DialectSettings>,
    shape:          &'a EntityShape,
    max_batch_size: usize
}

impl<'a> StatementBuilder<'a> {
    /// Builder for `shape` in `settings`.
    #[must_use]
    pub const fn new(settings: &'a Arc<DialectSettings>, shape: &'a EntityShape) -> Self {
        Self {
            settings,
            shape,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE
        }
    }

    /// Override the largest accepted batch size.
    #[must_use]
    pub const fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// `SELECT` rows matching `condition`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] for unknown projected, ordered or compared
    /// fields; [`Error::UnsupportedDialectFeature`] for hints the dialect
    /// rejects.
    pub fn query(
        &self,
        condition: Option<&ConditionNode>,
        options: &QueryOptions
    ) -> Result<GeneratedStatement> {
        let op = OperationKind::Query;
        let columns = self.projection(&options.fields, op)?;
        let uses_top = self.kind().uses_top();
        let mut params = Placeholders::default();

        let mut sql = String::from("SELECT ");
        if let (true, None, Some(top)) = (uses_top, options.page, options.top) {
            sql.push_str(&format!("TOP ({top}) "));
        }
        sql.push_str(&self.column_list(&columns));
        sql.push_str(" FROM ");
        sql.push_str(&self.table());
        self.push_hints(&mut sql, options.hints.as_deref(), op)?;
        self.push_where(&mut sql, condition, &mut params)?;

        let mut order = self.order_clause(options)?;
        match options.page {
            Some(page) if uses_top => {
                if order.is_empty() {
                    order = self.default_order();
                }
                sql.push_str(&order);
                sql.push_str(&format!(
                    " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                    page.offset, page.limit
                ));
            }
            Some(page) => {
                sql.push_str(&order);
                sql.push_str(&format!(" LIMIT {} OFFSET {}", page.limit, page.offset));
            }
            None => {
                sql.push_str(&order);
                if let (false, Some(top)) = (uses_top, options.top) {
                    sql.push_str(&format!(" LIMIT {top}"));
                }
            }
        }
        sql.push(';');
        Ok(self.finish(op, sql, params, None))
    }

    /// `COUNT(*)` of rows matching `condition`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn count(
        &self,
        condition: Option<&ConditionNode>,
        hints: Option<&str>
    ) -> Result<GeneratedStatement> {
        let op = OperationKind::Count;
        let mut params = Placeholders::default();
        let mut sql = format!(
            "SELECT COUNT(*) AS {} FROM {}",
            self.settings.quote("CountValue"),
            self.table()
        );
        self.push_hints(&mut sql, hints, op)?;
        self.push_where(&mut sql, condition, &mut params)?;
        sql.push(';');
        Ok(self.finish(op, sql, params, None))
    }

    /// Probe for at least one row matching `condition`.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn exists(
        &self,
        condition: Option<&ConditionNode>,
        hints: Option<&str>
    ) -> Result<GeneratedStatement> {
        let op = OperationKind::Exists;
        let mut params = Placeholders::default();
        let alias = self.settings.quote("ExistsValue");
        let mut sql = if self.kind().uses_top() {
            format!("SELECT TOP (1) 1 AS {alias} FROM {}", self.table())
        } else {
            format!("SELECT 1 AS {alias} FROM {}", self.table())
        };
        self.push_hints(&mut sql, hints, op)?;
        self.push_where(&mut sql, condition, &mut params)?;
        if !self.kind().uses_top() {
            sql.push_str(" LIMIT 1");
        }
        sql.push(';');
        Ok(self.finish(op, sql, params, None))
    }

    /// Aggregate over one field of rows matching `condition`.
    ///
    /// `AVG` always casts its argument, to the requested type or else to
    /// the dialect's default averageable type.
    ///
    /// # Errors
    ///
    /// As [`query`](Self::query).
    pub fn aggregate(
        &self,
        aggregate: &Aggregate,
        condition: Option<&ConditionNode>
    ) -> Result<GeneratedStatement> {
        let op = aggregate.function.operation();
        let field = self.field(&aggregate.field)?;
        let column = self.settings.quote(field.column);
        let argument = match aggregate.function {
            AggregateFunction::Average => {
                let target = aggregate
                    .db_type
                    .unwrap_or(self.settings.default_averageable_type);
                format!("CAST({column} AS {})", self.settings.type_name(target))
            }
            _ => column
        };

        let mut params = Placeholders::default();
        let mut sql = format!(
            "SELECT {}({argument}) AS {} FROM {}",
            aggregate.function.as_sql(),
            self.settings.quote(aggregate.function.alias()),
            self.table()
        );
        self.push_hints(&mut sql, aggregate.hints.as_deref(), op)?;
        self.push_where(&mut sql, condition, &mut params)?;
        sql.push(';');
        Ok(self.finish(op, sql, params, None))
    }

    /// `INSERT` of one entity, returning the identity when there is one.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyFieldSet`] when every field is database generated.
    pub fn insert(&self) -> Result<GeneratedStatement> {
        let op = OperationKind::Insert;
        let mut params = Placeholders::default();
        let sql = self.insert_row(0, false, &mut params, op)?;
        Ok(self.finish(op, sql, params, None))
    }

    /// `batch_size` single-row inserts in one command.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBatchSize`] outside of `1..=max`;
    /// [`Error::UnsupportedDialectFeature`] for more than one row on a
    /// dialect without multi-statement support.
    pub fn insert_all(&self, batch_size: usize) -> Result<GeneratedStatement> {
        let op = OperationKind::InsertAll;
        self.check_batch(batch_size, op)?;
        let mut params = Placeholders::default();
        let statements = (0..batch_size)
            .map(|row| self.insert_row(row, true, &mut params, op))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(op, statements.join(" "), params, Some(batch_size)))
    }

    /// `UPDATE` of one entity.
    ///
    /// Without a condition the row is matched on its primary key.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPrimaryKey`] when no condition is given and the entity
    /// has no key; [`Error::EmptyFieldSet`] when nothing is assignable.
    pub fn update(&self, condition: Option<&ConditionNode>) -> Result<GeneratedStatement> {
        let op = OperationKind::Update;
        let mut params = Placeholders::default();
        let sql = match condition {
            Some(node) => {
                let set = self.set_clause(0, &[], &mut params, op)?;
                let mut sql = format!("UPDATE {} SET {set}", self.table());
                self.push_where(&mut sql, Some(node), &mut params)?;
                sql.push(';');
                sql
            }
            None => {
                let keys = self.qualifiers(&[], op)?;
                self.update_row(0, &keys, &mut params, op)?
            }
        };
        Ok(self.finish(op, sql, params, None))
    }

    /// `batch_size` single-row updates matched on `qualifiers`.
    ///
    /// Empty `qualifiers` select the primary key.
    ///
    /// # Errors
    ///
    /// As [`update`](Self::update) and [`insert_all`](Self::insert_all).
    pub fn update_all(&self, batch_size: usize, qualifiers: &[String]) -> Result<GeneratedStatement> {
        let op = OperationKind::UpdateAll;
        self.check_batch(batch_size, op)?;
        let keys = self.qualifiers(qualifiers, op)?;
        let mut params = Placeholders::default();
        let statements = (0..batch_size)
            .map(|row| self.update_row(row, &keys, &mut params, op))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(op, statements.join(" "), params, Some(batch_size)))
    }

    /// `DELETE` of rows matching `condition`, or of every row without one.
    ///
    /// # Errors
    ///
    /// [`Error::MissingField`] for unknown compared fields.
    pub fn delete(&self, condition: Option<&ConditionNode>) -> Result<GeneratedStatement> {
        self.delete_as(OperationKind::Delete, condition)
    }

    /// `DELETE` of a set of rows, typically selected by key list.
    ///
    /// # Errors
    ///
    /// As [`delete`](Self::delete).
    pub fn delete_all(&self, condition: Option<&ConditionNode>) -> Result<GeneratedStatement> {
        self.delete_as(OperationKind::DeleteAll, condition)
    }

    /// Upsert of one entity matched on `qualifiers`.
    ///
    /// Empty `qualifiers` select the primary key.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPrimaryKey`] when no qualifier can be determined.
    pub fn merge(&self, qualifiers: &[String]) -> Result<GeneratedStatement> {
        let op = OperationKind::Merge;
        let keys = self.qualifiers(qualifiers, op)?;
        let mut params = Placeholders::default();
        let sql = self.merge_row(0, false, &keys, &mut params, op)?;
        Ok(self.finish(op, sql, params, None))
    }

    /// `batch_size` single-row upserts matched on `qualifiers`.
    ///
    /// Rows that return an identity also return their position as
    /// `OrderColumn`.
    ///
    /// # Errors
    ///
    /// As [`merge`](Self::merge) and [`insert_all`](Self::insert_all).
    pub fn merge_all(&self, batch_size: usize, qualifiers: &[String]) -> Result<GeneratedStatement> {
        let op = OperationKind::MergeAll;
        self.check_batch(batch_size, op)?;
        let keys = self.qualifiers(qualifiers, op)?;
        let mut params = Placeholders::default();
        let statements = (0..batch_size)
            .map(|row| self.merge_row(row, true, &keys, &mut params, op))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(op, statements.join(" "), params, Some(batch_size)))
    }

    /// Remove every row.
    ///
    /// Dialects without `TRUNCATE TABLE` get an unconditional `DELETE`.
    ///
    /// # Errors
    ///
    /// Infallible for built-in dialects; kept fallible like every other
    /// operation.
    pub fn truncate(&self) -> Result<GeneratedStatement> {
        let op = OperationKind::Truncate;
        let sql = if self.kind().supports_truncate() {
            format!("TRUNCATE TABLE {};", self.table())
        } else {
            format!("DELETE FROM {};", self.table())
        };
        Ok(self.finish(op, sql, Placeholders::default(), None))
    }

    fn delete_as(
        &self,
        op: OperationKind,
        condition: Option<&ConditionNode>
    ) -> Result<GeneratedStatement> {
        let mut params = Placeholders::default();
        let mut sql = format!("DELETE FROM {}", self.table());
        self.push_where(&mut sql, condition, &mut params)?;
        sql.push(';');
        Ok(self.finish(op, sql, params, None))
    }

    fn insert_row(
        &self,
        row: usize,
        ordered: bool,
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        let fields = self.writable(op)?;
        let values = self.row_parameters(&fields, row, params);
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(),
            self.column_list(&fields),
            values.join(", ")
        );
        if let Some(identity) = self.shape.identity() {
            let result = self.settings.quote("Result");
            let order = self.order_column(row, ordered);
            let retrieval = match self.kind() {
                DialectKind::SqlServer => {
                    format!("; SELECT CONVERT(BIGINT, SCOPE_IDENTITY()) AS {result}{order}")
                }
                DialectKind::PostgreSql => format!(
                    " RETURNING {} AS {result}{order}",
                    self.settings.quote(identity.column)
                ),
                DialectKind::MySql => format!("; SELECT LAST_INSERT_ID() AS {result}{order}"),
                DialectKind::Sqlite => format!("; SELECT last_insert_rowid() AS {result}{order}")
            };
            sql.push_str(&retrieval);
        }
        sql.push(';');
        Ok(sql)
    }

    fn update_row(
        &self,
        row: usize,
        keys: &[&FieldDescriptor],
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        let set = self.set_clause(row, keys, params, op)?;
        let filter = keys
            .iter()
            .map(|key| {
                let name = params.add(row_base(key.column, row), property(key, row), key.db_type);
                format!(
                    "({} = {})",
                    self.settings.quote(key.column),
                    self.settings.parameter(&name)
                )
            })
            .collect::<Vec<_>>()
            .join(" AND ");
        Ok(format!("UPDATE {} SET {set} WHERE {filter};", self.table()))
    }

    fn set_clause(
        &self,
        row: usize,
        keys: &[&FieldDescriptor],
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        let fields = self
            .shape
            .fields()
            .iter()
            .filter(|f| f.is_writable() && !f.primary && !keys.contains(f))
            .collect::<Vec<_>>();
        if fields.is_empty() {
            return Err(self.empty(op));
        }
        Ok(fields
            .iter()
            .map(|f| {
                let name = params.add(row_base(f.column, row), property(f, row), f.db_type);
                format!("{} = {}", self.settings.quote(f.column), self.settings.parameter(&name))
            })
            .collect::<Vec<_>>()
            .join(", "))
    }

    fn merge_row(
        &self,
        row: usize,
        ordered: bool,
        keys: &[&FieldDescriptor],
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        match self.kind() {
            DialectKind::SqlServer => self.merge_statement(row, ordered, keys, params, op),
            kind => self.upsert_statement(kind, row, ordered, keys, params, op)
        }
    }

    fn order_column(&self, row: usize, ordered: bool) -> String {
        if ordered {
            format!(", {row} AS {}", self.settings.quote("OrderColumn"))
        } else {
            String::new()
        }
    }

    fn merge_statement(
        &self,
        row: usize,
        ordered: bool,
        keys: &[&FieldDescriptor],
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        let q = |column: &str| self.settings.quote(column);
        let all = self.shape.fields().iter().collect::<Vec<_>>();
        let source = self
            .row_parameters(&all, row, params)
            .iter()
            .zip(&all)
            .map(|(param, f)| format!("{param} AS {}", q(f.column)))
            .collect::<Vec<_>>()
            .join(", ");
        let on = keys
            .iter()
            .map(|k| format!("S.{0} = T.{0}", q(k.column)))
            .collect::<Vec<_>>()
            .join(" AND ");
        let inserted = self.writable(op)?;
        let insert_values = inserted
            .iter()
            .map(|f| format!("S.{}", q(f.column)))
            .collect::<Vec<_>>()
            .join(", ");
        let updates = self.upsert_assignments(keys, |column| format!("T.{column} = S.{column}"));

        let mut sql = format!(
            "MERGE {} AS T USING (SELECT {source}) AS S ON ({on}) WHEN NOT MATCHED THEN INSERT ({}) VALUES ({insert_values})",
            self.table(),
            self.column_list(&inserted)
        );
        if !updates.is_empty() {
            sql.push_str(" WHEN MATCHED THEN UPDATE SET ");
            sql.push_str(&updates.join(", "));
        }
        if let Some(identity) = self.shape.identity() {
            sql.push_str(&format!(
                " OUTPUT INSERTED.{} AS {}{}",
                q(identity.column),
                q("Result"),
                self.order_column(row, ordered)
            ));
        }
        sql.push(';');
        Ok(sql)
    }

    fn upsert_statement(
        &self,
        kind: DialectKind,
        row: usize,
        ordered: bool,
        keys: &[&FieldDescriptor],
        params: &mut Placeholders,
        op: OperationKind
    ) -> Result<String> {
        let fields = self
            .shape
            .fields()
            .iter()
            .filter(|f| f.is_writable() || keys.contains(f))
            .collect::<Vec<_>>();
        if fields.is_empty() {
            return Err(self.empty(op));
        }
        let values = self.row_parameters(&fields, row, params).join(", ");
        let columns = self.column_list(&fields);
        let table = self.table();

        let sql = match kind {
            DialectKind::PostgreSql => {
                let conflict = self.column_list(keys);
                let updates = self.upsert_assignments(keys, |c| format!("{c} = EXCLUDED.{c}"));
                let action = if updates.is_empty() {
                    "DO NOTHING".to_string()
                } else {
                    format!("DO UPDATE SET {}", updates.join(", "))
                };
                let returning = self.shape.identity().map_or_else(String::new, |id| {
                    format!(
                        " RETURNING {} AS {}{}",
                        self.settings.quote(id.column),
                        self.settings.quote("Result"),
                        self.order_column(row, ordered)
                    )
                });
                format!(
                    "INSERT INTO {table} ({columns}) VALUES ({values}) ON CONFLICT ({conflict}) {action}{returning};"
                )
            }
            DialectKind::MySql => {
                let mut updates = self.upsert_assignments(keys, |c| format!("{c} = VALUES({c})"));
                if updates.is_empty() {
                    let first = keys.iter().map(|k| self.settings.quote(k.column));
                    updates.extend(first.take(1).map(|c| format!("{c} = {c}")));
                }
                format!(
                    "INSERT INTO {table} ({columns}) VALUES ({values}) ON DUPLICATE KEY UPDATE {};",
                    updates.join(", ")
                )
            }
            _ => format!("INSERT OR REPLACE INTO {table} ({columns}) VALUES ({values});")
        };
        Ok(sql)
    }

    fn upsert_assignments<F>(&self, keys: &[&FieldDescriptor], assign: F) -> Vec<String>
    where
        F: Fn(&str) -> String
    {
        self.shape
            .fields()
            .iter()
            .filter(|f| f.is_writable() && !f.primary && !keys.contains(f))
            .map(|f| assign(&self.settings.quote(f.column)))
            .collect()
    }

    fn row_parameters(
        &self,
        fields: &[&FieldDescriptor],
        row: usize,
        params: &mut Placeholders
    ) -> Vec<String> {
        fields
            .iter()
            .map(|f| {
                let name = params.add(row_base(f.column, row), property(f, row), f.db_type);
                self.settings.parameter(&name)
            })
            .collect()
    }

    fn push_hints(&self, sql: &mut String, hints: Option<&str>, op: OperationKind) -> Result<()> {
        let Some(hints) = hints else {
            return Ok(());
        };
        if !self.settings.table_hints_supported {
            return Err(self.unsupported("table hints", op));
        }
        sql.push(' ');
        sql.push_str(hints);
        Ok(())
    }

    fn push_where(
        &self,
        sql: &mut String,
        condition: Option<&ConditionNode>,
        params: &mut Placeholders
    ) -> Result<()> {
        let Some(node) = condition else {
            return Ok(());
        };
        node.validate()?;
        if let Some(filter) = self.render_node(node, params, true)? {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        Ok(())
    }

    fn render_node(
        &self,
        node: &ConditionNode,
        params: &mut Placeholders,
        outermost: bool
    ) -> Result<Option<String>> {
        match node {
            ConditionNode::Comparison(c) => Ok(Some(format!("({})", self.render_comparison(c, params)?))),
            ConditionNode::Group {
                combinator,
                children
            } => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(part) = self.render_node(child, params, false)? {
                        parts.push(part);
                    }
                }
                let rendered = match parts.len() {
                    0 => None,
                    1 => parts.pop(),
                    _ => {
                        let joined = parts.join(&format!(" {} ", combinator.as_sql()));
                        Some(if outermost { joined } else { format!("({joined})") })
                    }
                };
                Ok(rendered)
            }
        }
    }

    fn render_comparison(&self, c: &Comparison, params: &mut Placeholders) -> Result<String> {
        let field = self.field(&c.field)?;
        let quoted = self.settings.quote(field.column);
        let column = match c.function.as_deref() {
            Some(template) => template.replace("{0}", &quoted),
            None => quoted
        };
        let base = parameter_base(field.column);
        let db_type = c.db_type.or(field.db_type);
        let op = c.operator;

        let text = match op {
            Operator::IsNull | Operator::IsNotNull => format!("{column} {}", op.as_sql()),
            Operator::In | Operator::NotIn => {
                let count = c.arity();
                if count == 0 {
                    let always = if op == Operator::In { "1 = 0" } else { "1 = 1" };
                    return Ok(always.to_string());
                }
                let names = (0..count)
                    .map(|i| {
                        let name = params.condition(format!("{base}_In_{i}"), db_type);
                        self.settings.parameter(&name)
                    })
                    .collect::<Vec<_>>();
                format!("{column} {} ({})", op.as_sql(), names.join(", "))
            }
            Operator::Between | Operator::NotBetween => {
                let left = params.condition(format!("{base}_Left"), db_type);
                let right = params.condition(format!("{base}_Right"), db_type);
                format!(
                    "{column} {} {} AND {}",
                    op.as_sql(),
                    self.settings.parameter(&left),
                    self.settings.parameter(&right)
                )
            }
            _ => {
                let name = params.condition(base, db_type);
                format!("{column} {} {}", op.as_sql(), self.settings.parameter(&name))
            }
        };
        Ok(text)
    }

    fn order_clause(&self, options: &QueryOptions) -> Result<String> {
        if options.order_by.is_empty() {
            return Ok(String::new());
        }
        let entries = options
            .order_by
            .iter()
            .map(|o| {
                let field = self.field(&o.field)?;
                Ok(format!("{} {}", self.settings.quote(field.column), o.direction.as_sql()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(" ORDER BY {}", entries.join(", ")))
    }

    fn default_order(&self) -> String {
        let keys = self
            .shape
            .primary_keys()
            .map(|k| format!("{} ASC", self.settings.quote(k.column)))
            .collect::<Vec<_>>();
        if keys.is_empty() {
            " ORDER BY (SELECT NULL)".to_string()
        } else {
            format!(" ORDER BY {}", keys.join(", "))
        }
    }

    fn projection(&self, fields: &[String], op: OperationKind) -> Result<Vec<&'a FieldDescriptor>> {
        let selected = if fields.is_empty() {
            self.shape.fields().iter().collect::<Vec<_>>()
        } else {
            fields
                .iter()
                .map(|name| self.field(name))
                .collect::<Result<Vec<_>>>()?
        };
        if selected.is_empty() {
            return Err(self.empty(op));
        }
        Ok(selected)
    }

    fn writable(&self, op: OperationKind) -> Result<Vec<&'a FieldDescriptor>> {
        let fields = self
            .shape
            .fields()
            .iter()
            .filter(|f| f.is_writable())
            .collect::<Vec<_>>();
        if fields.is_empty() {
            return Err(self.empty(op));
        }
        Ok(fields)
    }

    fn qualifiers(&self, names: &[String], op: OperationKind) -> Result<Vec<&'a FieldDescriptor>> {
        if !names.is_empty() {
            return names.iter().map(|name| self.field(name)).collect();
        }
        let keys = self.shape.primary_keys().collect::<Vec<_>>();
        if keys.is_empty() {
            return Err(Error::MissingPrimaryKey {
                entity:    self.shape.type_name(),
                operation: op
            });
        }
        Ok(keys)
    }

    fn check_batch(&self, batch_size: usize, op: OperationKind) -> Result<()> {
        if batch_size == 0 || batch_size > self.max_batch_size {
            return Err(Error::InvalidBatchSize {
                size: batch_size,
                max:  self.max_batch_size
            });
        }
        if batch_size > 1 && !self.settings.multiple_statements_supported {
            return Err(self.unsupported("multiple statements per command", op));
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Result<&'a FieldDescriptor> {
        self.shape.find(name).ok_or_else(|| Error::MissingField {
            entity: self.shape.type_name(),
            field:  name.to_string()
        })
    }

    fn column_list(&self, fields: &[&FieldDescriptor]) -> String {
        fields
            .iter()
            .map(|f| self.settings.quote(f.column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn table(&self) -> String {
        self.settings.table(self.shape.table(), self.shape.schema_name())
    }

    fn kind(&self) -> DialectKind {
        self.settings.kind
    }

    fn empty(&self, operation: OperationKind) -> Error {
        Error::EmptyFieldSet {
            entity: self.shape.type_name(),
            operation
        }
    }

    fn unsupported(&self, feature: &'static str, operation: OperationKind) -> Error {
        Error::UnsupportedDialectFeature {
            dialect: self.settings.name.clone(),
            feature,
            operation
        }
    }

    fn finish(
        &self,
        operation: OperationKind,
        text: String,
        params: Placeholders,
        batch_size: Option<usize>
    ) -> GeneratedStatement {
        trace!(
            entity = self.shape.type_name(),
            dialect = %self.settings.name,
            %operation,
            sql = %text,
            "rendered statement"
        );
        GeneratedStatement {
            text,
            parameters: params.parameters,
            settings: Arc::clone(self.settings),
            entity: self.shape.type_id(),
            entity_name: self.shape.type_name(),
            operation,
            batch_size
        }
    }
}

/// Unique placeholder names of one statement.
#[derive(Debug, Default)]
struct Placeholders {
    used:       HashSet<String>,
    parameters: Vec<ParameterDescriptor>,
    next_value: usize
}

impl Placeholders {
    fn add(&mut self, base: String, source: ParameterSource, db_type: Option<DbType>) -> String {
        let mut name = base.clone();
        let mut suffix = 1;
        while self.used.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(name.clone());
        self.parameters.push(ParameterDescriptor {
            name: name.clone(),
            source,
            db_type
        });
        name
    }

    fn condition(&mut self, base: String, db_type: Option<DbType>) -> String {
        let source = ParameterSource::Condition(self.next_value);
        self.next_value += 1;
        self.add(base, source, db_type)
    }
}

const fn property(field: &FieldDescriptor, row: usize) -> ParameterSource {
    ParameterSource::Property {
        row,
        property: field.property
    }
}

fn parameter_base(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn row_base(column: &str, row: usize) -> String {
    let base = parameter_base(column);
    if row == 0 { base } else { format!("{base}_{row}") }
}
