// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column mapping configuration.
//!
//! # Supported Attributes
//!
//! | Attribute | Example | Effect |
//! |-----------|---------|--------|
//! | `name` | `#[column(name = "FullName")]` | Custom column name |
//! | `db_type` | `#[column(db_type = "SmallDateTime")]` | Explicit database type |
//! | `skip` | `#[column(skip)]` | Field is not mapped |

use syn::{Attribute, Meta};

/// Database type names accepted by `db_type`, with the `DbType` variant they
/// map to. Matching is case-insensitive.
const DB_TYPES: &[(&str, &str)] = &[
    ("boolean", "Boolean"),
    ("bool", "Boolean"),
    ("bit", "Boolean"),
    ("int16", "Int16"),
    ("smallint", "Int16"),
    ("int32", "Int32"),
    ("int", "Int32"),
    ("integer", "Int32"),
    ("int64", "Int64"),
    ("bigint", "Int64"),
    ("single", "Single"),
    ("real", "Single"),
    ("double", "Double"),
    ("float", "Double"),
    ("decimal", "Decimal"),
    ("numeric", "Decimal"),
    ("string", "String"),
    ("nvarchar", "String"),
    ("text", "String"),
    ("ansistring", "AnsiString"),
    ("varchar", "AnsiString"),
    ("binary", "Binary"),
    ("varbinary", "Binary"),
    ("guid", "Guid"),
    ("uuid", "Guid"),
    ("uniqueidentifier", "Guid"),
    ("date", "Date"),
    ("time", "Time"),
    ("datetime", "DateTime"),
    ("datetime2", "DateTime2"),
    ("smalldatetime", "SmallDateTime"),
    ("datetimeoffset", "DateTimeOffset")
];

/// Column-level mapping parsed from `#[column(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ColumnConfig {
    /// Custom column name.
    pub name: Option<String>,

    /// `DbType` variant name, already validated.
    pub db_type: Option<String>,

    /// Field is not mapped.
    pub skip: bool
}

impl ColumnConfig {
    /// Parse a `#[column(...)]` attribute.
    ///
    /// # Errors
    ///
    /// Unknown keys, malformed values, empty names and unknown `db_type`
    /// names are reported at the offending token.
    pub fn from_attr(attr: &Attribute) -> darling::Result<Self> {
        let mut config = Self::default();

        let Meta::List(meta_list) = &attr.meta else {
            return Err(
                darling::Error::custom("expected #[column(...)]").with_span(attr)
            );
        };

        meta_list
            .parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let _: syn::Token![=] = meta.input.parse()?;
                    let value: syn::LitStr = meta.input.parse()?;
                    if value.value().is_empty() {
                        return Err(syn::Error::new(value.span(), "column name cannot be empty"));
                    }
                    config.name = Some(value.value());
                } else if meta.path.is_ident("db_type") {
                    let _: syn::Token![=] = meta.input.parse()?;
                    let value: syn::LitStr = meta.input.parse()?;
                    let variant = db_type_variant(&value.value()).ok_or_else(|| {
                        syn::Error::new(
                            value.span(),
                            format!("unknown db_type `{}`", value.value())
                        )
                    })?;
                    config.db_type = Some(variant.to_string());
                } else if meta.path.is_ident("skip") {
                    config.skip = true;
                } else {
                    return Err(meta.error("expected `name`, `db_type` or `skip`"));
                }
                Ok(())
            })
            .map_err(darling::Error::from)?;

        Ok(config)
    }
}

fn db_type_variant(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    DB_TYPES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, variant)| *variant)
}
