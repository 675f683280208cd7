// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! MySQL and MariaDB.

use super::{DialectKind, DialectRegistry, DialectSettings};
use crate::value::DbType;

/// Identifiers this dialect is registered under.
pub const IDS: &[&str] = &["mysql"];

/// Settings for MySQL.
#[must_use]
pub fn settings() -> DialectSettings {
    DialectSettings {
        name:                          "MySQL".to_string(),
        kind:                          DialectKind::MySql,
        opening_quote:                 "`".to_string(),
        closing_quote:                 "`".to_string(),
        parameter_prefix:              "@".to_string(),
        schema_separator:              ".".to_string(),
        default_schema:                None,
        table_hints_supported:         false,
        multiple_statements_supported: true,
        default_averageable_type:      DbType::Double
    }
}

/// Register MySQL under [`IDS`].
pub fn bootstrap(registry: &DialectRegistry) {
    registry.register_aliases(IDS, settings());
}

pub(crate) const fn type_name(db_type: DbType) -> &'static str {
    match db_type {
        DbType::Boolean => "UNSIGNED",
        DbType::Int16 | DbType::Int32 | DbType::Int64 => "SIGNED",
        DbType::Single | DbType::Double => "DOUBLE",
        DbType::Decimal => "DECIMAL(65,30)",
        DbType::String | DbType::AnsiString | DbType::Guid => "CHAR",
        DbType::Binary => "BINARY",
        DbType::Date => "DATE",
        DbType::Time => "TIME",
        DbType::DateTime | DbType::DateTime2 | DbType::SmallDateTime | DbType::DateTimeOffset => {
            "DATETIME"
        }
    }
}
