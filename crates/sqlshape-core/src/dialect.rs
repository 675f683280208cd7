// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Database dialect settings and their registry.
//!
//! A [`DialectSettings`] value is the constant table the statement builder
//! consults for every piece of dialect-specific syntax: identifier quotes,
//! parameter prefix, schema handling and which optional features exist.
//!
//! # Overview
//!
//! - [`DialectKind`] — Syntax family (row limiting, upserts, identity)
//! - [`DialectSettings`] — Immutable per-engine constants
//! - [`DialectRegistry`] — Identifier to settings lookup
//! - [`sqlserver`], [`postgres`], [`mysql`], [`sqlite`] — Built-in bootstraps
//!
//! # Supported Databases
//!
//! | Dialect | Quotes | Prefix | Default schema | Hints |
//! |---------|--------|--------|----------------|-------|
//! | SQL Server | `[` `]` | `@` | `dbo` | yes |
//! | PostgreSQL | `"` `"` | `@` | `public` | no |
//! | MySQL | `` ` `` `` ` `` | `@` | none | no |
//! | SQLite | `[` `]` | `@` | none | no |

pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::{
    error::{Error, Result},
    value::DbType
};

/// Syntax family of a dialect.
///
/// Selects the constructs that differ beyond quoting: row limiting, upsert
/// statements, identity retrieval and type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DialectKind {
    /// Microsoft SQL Server.
    ///
    /// - Limiting: `TOP (n)`, `OFFSET .. FETCH NEXT`
    /// - Upsert: `MERGE`
    /// - Identity: `SCOPE_IDENTITY()`
    SqlServer,

    /// PostgreSQL.
    ///
    /// - Limiting: `LIMIT .. OFFSET ..`
    /// - Upsert: `ON CONFLICT .. DO UPDATE`
    /// - Identity: `RETURNING`
    PostgreSql,

    /// MySQL / MariaDB.
    ///
    /// - Limiting: `LIMIT .. OFFSET ..`
    /// - Upsert: `ON DUPLICATE KEY UPDATE`
    /// - Identity: `LAST_INSERT_ID()`
    MySql,

    /// SQLite.
    ///
    /// - Limiting: `LIMIT .. OFFSET ..`
    /// - Upsert: `INSERT OR REPLACE`
    /// - Identity: `last_insert_rowid()`
    Sqlite
}

impl DialectKind {
    /// Check if row limiting uses `TOP` instead of `LIMIT`.
    #[must_use]
    pub const fn uses_top(&self) -> bool {
        matches!(self, Self::SqlServer)
    }

    /// Check if `TRUNCATE TABLE` exists.
    #[must_use]
    pub const fn supports_truncate(&self) -> bool {
        !matches!(self, Self::Sqlite)
    }
}

/// Immutable constant table for one database dialect.
///
/// Equality and hashing are structural, so settings take part in
/// statement cache keys directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialectSettings {
    /// Human-readable dialect name used in errors and logs.
    pub name: String,

    /// Syntax family.
    pub kind: DialectKind,

    /// Opening identifier quote.
    pub opening_quote: String,

    /// Closing identifier quote.
    pub closing_quote: String,

    /// Prefix of named parameters.
    pub parameter_prefix: String,

    /// Separator between schema and object names.
    pub schema_separator: String,

    /// Schema assumed when an entity declares none.
    pub default_schema: Option<String>,

    /// Whether `WITH (...)` table hints are accepted.
    pub table_hints_supported: bool,

    /// Whether several statements may be sent in one command.
    pub multiple_statements_supported: bool,

    /// Type `AVG` arguments are cast to when no type is given.
    pub default_averageable_type: DbType
}

impl DialectSettings {
    /// Quote an identifier, splitting dotted names on the schema separator.
    ///
    /// Segments that are already quoted are kept as they are.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sqlshape_core::dialect::sqlserver;
    ///
    /// let settings = sqlserver::settings();
    /// assert_eq!(settings.quote("dbo.Person"), "[dbo].[Person]");
    /// assert_eq!(settings.quote("[Name]"), "[Name]");
    /// ```
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        identifier
            .split(self.schema_separator.as_str())
            .map(|segment| self.quote_segment(segment.trim()))
            .collect::<Vec<_>>()
            .join(&self.schema_separator)
    }

    fn quote_segment(&self, segment: &str) -> String {
        if self.is_quoted(segment) {
            segment.to_string()
        } else {
            let doubled = self.closing_quote.repeat(2);
            let escaped = segment.replace(self.closing_quote.as_str(), &doubled);
            format!("{}{escaped}{}", self.opening_quote, self.closing_quote)
        }
    }

    /// Check if an identifier segment is wrapped in this dialect's quotes.
    #[must_use]
    pub fn is_quoted(&self, segment: &str) -> bool {
        segment.len() >= self.opening_quote.len() + self.closing_quote.len()
            && segment.starts_with(self.opening_quote.as_str())
            && segment.ends_with(self.closing_quote.as_str())
    }

    /// Quote a table name, qualifying it with a schema when one applies.
    ///
    /// The entity's own schema wins over the dialect default. Names that
    /// already contain the separator are treated as qualified.
    #[must_use]
    pub fn table(&self, table: &str, schema: Option<&str>) -> String {
        if table.contains(self.schema_separator.as_str()) {
            return self.quote(table);
        }
        match schema.or(self.default_schema.as_deref()) {
            Some(schema) => format!(
                "{}{}{}",
                self.quote(schema),
                self.schema_separator,
                self.quote(table)
            ),
            None => self.quote(table)
        }
    }

    /// Render a named placeholder.
    #[must_use]
    pub fn parameter(&self, name: &str) -> String {
        format!("{}{name}", self.parameter_prefix)
    }

    /// Database type name used as a `CAST` target.
    #[must_use]
    pub const fn type_name(&self, db_type: DbType) -> &'static str {
        match self.kind {
            DialectKind::SqlServer => sqlserver::type_name(db_type),
            DialectKind::PostgreSql => postgres::type_name(db_type),
            DialectKind::MySql => mysql::type_name(db_type),
            DialectKind::Sqlite => sqlite::type_name(db_type)
        }
    }
}

/// Lookup table from dialect identifier to settings.
///
/// Identifiers are matched case-insensitively. Registration is idempotent:
/// the first settings stored under an identifier stay in place.
#[derive(Debug, Default)]
pub struct DialectRegistry {
    dialects: DashMap<String, Arc<DialectSettings>>
}

impl DialectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in dialects registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register every built-in dialect under its identifiers.
    ///
    /// Identifiers that are already taken keep their settings.
    pub fn register_builtins(&self) {
        sqlserver::bootstrap(self);
        postgres::bootstrap(self);
        mysql::bootstrap(self);
        sqlite::bootstrap(self);
    }

    /// Register settings under an identifier.
    ///
    /// Returns the settings now stored for the identifier, which are the
    /// earlier ones when the identifier was already taken.
    pub fn register(&self, id: &str, settings: DialectSettings) -> Arc<DialectSettings> {
        let entry = self.dialects.entry(id.to_ascii_lowercase()).or_insert_with(|| {
            debug!(dialect = id, name = %settings.name, "registered dialect");
            Arc::new(settings)
        });
        Arc::clone(entry.value())
    }

    /// Register the same settings under several identifiers.
    pub fn register_aliases(&self, ids: &[&str], settings: DialectSettings) {
        let shared = Arc::new(settings);
        for id in ids {
            self.dialects
                .entry(id.to_ascii_lowercase())
                .or_insert_with(|| {
                    debug!(dialect = *id, name = %shared.name, "registered dialect");
                    Arc::clone(&shared)
                });
        }
    }

    /// Resolve settings for an identifier.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDialect`] when nothing is registered under `id`.
    pub fn resolve(&self, id: &str) -> Result<Arc<DialectSettings>> {
        self.dialects
            .get(&id.to_ascii_lowercase())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::UnsupportedDialect(id.to_string()))
    }

    /// Check if an identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.dialects.contains_key(&id.to_ascii_lowercase())
    }

    /// Number of registered identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}
