// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQLite.
//!
//! No schemas, no table hints, no `TRUNCATE`. Booleans bind as integers.

use super::{DialectKind, DialectRegistry, DialectSettings};
use crate::value::DbType;

/// Identifiers this dialect is registered under.
pub const IDS: &[&str] = &["sqlite"];

/// Settings for SQLite.
#[must_use]
pub fn settings() -> DialectSettings {
    DialectSettings {
        name:                          "SQLite".to_string(),
        kind:                          DialectKind::Sqlite,
        opening_quote:                 "[".to_string(),
        closing_quote:                 "]".to_string(),
        parameter_prefix:              "@".to_string(),
        schema_separator:              ".".to_string(),
        default_schema:                None,
        table_hints_supported:         false,
        multiple_statements_supported: true,
        default_averageable_type:      DbType::Double
    }
}

/// Register SQLite under [`IDS`].
pub fn bootstrap(registry: &DialectRegistry) {
    registry.register_aliases(IDS, settings());
}

pub(crate) const fn type_name(db_type: DbType) -> &'static str {
    match db_type {
        DbType::Boolean | DbType::Int16 | DbType::Int32 | DbType::Int64 => "INTEGER",
        DbType::Single | DbType::Double => "REAL",
        DbType::Decimal => "NUMERIC",
        DbType::Binary => "BLOB",
        _ => "TEXT"
    }
}
