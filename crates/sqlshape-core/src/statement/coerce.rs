// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-dialect adjustments of bound values.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};

use crate::{
    dialect::{DialectKind, DialectSettings},
    value::{DbType, Value}
};

/// Adjust a value to what the dialect stores for `db_type`.
///
/// - SQL Server `smalldatetime` keeps minutes only; seconds of 30 and above
///   round up.
/// - SQLite has no boolean type; booleans bind as `0` / `1`.
pub(super) fn coerce(settings: &DialectSettings, db_type: Option<DbType>, value: Value) -> Value {
    match (settings.kind, db_type, value) {
        (DialectKind::SqlServer, Some(DbType::SmallDateTime), Value::DateTime(dt)) => {
            Value::DateTime(round_to_minute(dt))
        }
        (DialectKind::SqlServer, Some(DbType::SmallDateTime), Value::DateTimeUtc(dt)) => {
            Value::DateTimeUtc(DateTime::<Utc>::from_naive_utc_and_offset(
                round_to_minute(dt.naive_utc()),
                Utc
            ))
        }
        (DialectKind::Sqlite, _, Value::Bool(flag)) => Value::I64(i64::from(flag)),
        (_, _, value) => value
    }
}

fn round_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    let Some(truncated) = dt.with_second(0).and_then(|d| d.with_nanosecond(0)) else {
        return dt;
    };
    if dt.second() >= 30 {
        truncated.checked_add_signed(TimeDelta::minutes(1)).unwrap_or(truncated)
    } else {
        truncated
    }
}
