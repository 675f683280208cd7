// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL.

use super::{DialectKind, DialectRegistry, DialectSettings};
use crate::value::DbType;

/// Identifiers this dialect is registered under.
pub const IDS: &[&str] = &["postgres", "postgresql", "pg"];

/// Settings for PostgreSQL.
#[must_use]
pub fn settings() -> DialectSettings {
    DialectSettings {
        name:                          "PostgreSQL".to_string(),
        kind:                          DialectKind::PostgreSql,
        opening_quote:                 "\"".to_string(),
        closing_quote:                 "\"".to_string(),
        parameter_prefix:              "@".to_string(),
        schema_separator:              ".".to_string(),
        default_schema:                Some("public".to_string()),
        table_hints_supported:         false,
        multiple_statements_supported: true,
        default_averageable_type:      DbType::Double
    }
}

/// Register PostgreSQL under [`IDS`].
pub fn bootstrap(registry: &DialectRegistry) {
    registry.register_aliases(IDS, settings());
}

pub(crate) const fn type_name(db_type: DbType) -> &'static str {
    match db_type {
        DbType::Boolean => "BOOLEAN",
        DbType::Int16 => "SMALLINT",
        DbType::Int32 => "INTEGER",
        DbType::Int64 => "BIGINT",
        DbType::Single => "REAL",
        DbType::Double => "DOUBLE PRECISION",
        DbType::Decimal => "NUMERIC",
        DbType::String | DbType::AnsiString => "TEXT",
        DbType::Binary => "BYTEA",
        DbType::Guid => "UUID",
        DbType::Date => "DATE",
        DbType::Time => "TIME",
        DbType::DateTime | DbType::DateTime2 | DbType::SmallDateTime => "TIMESTAMP",
        DbType::DateTimeOffset => "TIMESTAMPTZ"
    }
}
