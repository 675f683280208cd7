// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Host-side parameter values and explicit database types.
//!
//! [`Value`] is what the engine hands to the database client for every
//! placeholder it emits. Rust values convert into it through `From`, with
//! `Option::None` becoming [`Value::Null`] so that `= None` can be rewritten
//! to `IS NULL` during parsing.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// A parameter value in the representation handed to the database client.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// 16-bit integer.
    I16(i16),
    /// 32-bit integer.
    I32(i32),
    /// 64-bit integer.
    I64(i64),
    /// Single precision float.
    F32(f32),
    /// Double precision float.
    F64(f64),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UUID / GUID.
    Uuid(Uuid),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time without offset.
    DateTime(NaiveDateTime),
    /// Date and time in UTC.
    DateTimeUtc(DateTime<Utc>),
    /// Ordered list of values, used by `IN` and `BETWEEN`.
    List(Vec<Value>)
}

impl Value {
    /// Check whether this is [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the elements of a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None
        }
    }

    /// Borrow the text of a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None
        }
    }

    /// Build a list value from any iterator of convertible items.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::DateTimeUtc(v) => write!(f, "{v}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::I16(i16::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::I32(i32::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::I64(i64::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Explicit database type attached to a field or parameter.
///
/// Used for `CAST` targets (see
/// [`DialectSettings::type_name`](crate::DialectSettings::type_name)) and for
/// per-dialect value coercion at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DbType {
    /// Boolean / bit.
    Boolean,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Single precision float.
    Single,
    /// Double precision float.
    Double,
    /// Exact numeric.
    Decimal,
    /// Unicode text.
    String,
    /// Non-unicode text.
    AnsiString,
    /// Binary data.
    Binary,
    /// UUID / GUID.
    Guid,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// High precision date and time.
    DateTime2,
    /// Minute precision date and time (SQL Server `smalldatetime`).
    SmallDateTime,
    /// Date and time with offset.
    DateTimeOffset
}

impl DbType {
    /// Parse a type name as written in `#[column(db_type = "...")]`.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "boolean" | "bool" | "bit" => Self::Boolean,
            "int16" | "smallint" => Self::Int16,
            "int32" | "int" | "integer" => Self::Int32,
            "int64" | "bigint" => Self::Int64,
            "single" | "real" | "float4" => Self::Single,
            "double" | "float" | "float8" => Self::Double,
            "decimal" | "numeric" => Self::Decimal,
            "string" | "nvarchar" | "text" => Self::String,
            "ansistring" | "varchar" => Self::AnsiString,
            "binary" | "varbinary" | "blob" | "bytea" => Self::Binary,
            "guid" | "uuid" | "uniqueidentifier" => Self::Guid,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "datetime2" => Self::DateTime2,
            "smalldatetime" => Self::SmallDateTime,
            "datetimeoffset" => Self::DateTimeOffset,
            _ => return None
        };
        Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_becomes_null() {
        let none: Option<i32> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(5)), Value::I32(5));
    }

    #[test]
    fn bytes_stay_bytes_and_lists_are_explicit() {
        assert_eq!(Value::from(vec![1_u8, 2]), Value::Bytes(vec![1, 2]));
        assert_eq!(
            Value::list(vec![1, 2]),
            Value::List(vec![Value::I32(1), Value::I32(2)])
        );
    }

    #[test]
    fn display_list() {
        let v = Value::list(["a", "b"]);
        assert_eq!(v.to_string(), r#"["a", "b"]"#);
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::list([1, 2]).as_list().map(<[Value]>::len), Some(2));
        assert!(Value::I32(1).as_list().is_none());
    }

    #[test]
    fn db_type_names() {
        assert_eq!(DbType::parse("SmallDateTime"), Some(DbType::SmallDateTime));
        assert_eq!(DbType::parse("VARCHAR"), Some(DbType::AnsiString));
        assert_eq!(DbType::parse("uuid"), Some(DbType::Guid));
        assert_eq!(DbType::parse("geometry"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn db_type_serializes_by_variant_name() {
        assert_eq!(serde_json::to_string(&DbType::SmallDateTime).unwrap(), "\"SmallDateTime\"");
        let ty: DbType = serde_json::from_str("\"AnsiString\"").unwrap();
        assert_eq!(ty, DbType::AnsiString);
    }
}
