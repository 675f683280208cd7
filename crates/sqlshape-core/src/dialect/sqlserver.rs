// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Microsoft SQL Server.
//!
//! The primary dialect: bracket quoting, `@` parameters, `dbo` default
//! schema, table hints and multi-statement batches.

use super::{DialectKind, DialectRegistry, DialectSettings};
use crate::value::DbType;

/// Identifiers this dialect is registered under.
pub const IDS: &[&str] = &["sqlserver", "mssql"];

/// Settings for SQL Server.
#[must_use]
pub fn settings() -> DialectSettings {
    DialectSettings {
        name:                          "SQL Server".to_string(),
        kind:                          DialectKind::SqlServer,
        opening_quote:                 "[".to_string(),
        closing_quote:                 "]".to_string(),
        parameter_prefix:              "@".to_string(),
        schema_separator:              ".".to_string(),
        default_schema:                Some("dbo".to_string()),
        table_hints_supported:         true,
        multiple_statements_supported: true,
        default_averageable_type:      DbType::Double
    }
}

/// Register SQL Server under [`IDS`].
pub fn bootstrap(registry: &DialectRegistry) {
    registry.register_aliases(IDS, settings());
}

pub(crate) const fn type_name(db_type: DbType) -> &'static str {
    match db_type {
        DbType::Boolean => "BIT",
        DbType::Int16 => "SMALLINT",
        DbType::Int32 => "INT",
        DbType::Int64 => "BIGINT",
        DbType::Single => "REAL",
        DbType::Double => "FLOAT",
        DbType::Decimal => "DECIMAL(18,2)",
        DbType::String => "NVARCHAR(MAX)",
        DbType::AnsiString => "VARCHAR(MAX)",
        DbType::Binary => "VARBINARY(MAX)",
        DbType::Guid => "UNIQUEIDENTIFIER",
        DbType::Date => "DATE",
        DbType::Time => "TIME",
        DbType::DateTime => "DATETIME",
        DbType::DateTime2 => "DATETIME2",
        DbType::SmallDateTime => "SMALLDATETIME",
        DbType::DateTimeOffset => "DATETIMEOFFSET"
    }
}
