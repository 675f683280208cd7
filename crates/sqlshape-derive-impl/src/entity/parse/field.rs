// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! ```text
//! field.rs (coordinator)
//! └── column.rs  - #[column(name, db_type, skip)]
//! ```

mod column;

pub use column::ColumnConfig;
use syn::{Field, Ident, Type};

/// Parsed field definition.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Declared type.
    pub ty: Type,

    /// `#[id]` present.
    pub is_id: bool,

    /// `#[identity]` present.
    pub is_identity: bool,

    /// `#[column(...)]` settings.
    pub column: ColumnConfig
}

impl FieldDef {
    /// Parse a named struct field.
    ///
    /// # Errors
    ///
    /// Unnamed fields, a malformed `#[column(...)]` and a skipped key field
    /// are rejected.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut is_id = false;
        let mut is_identity = false;
        let mut column = ColumnConfig::default();

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                is_id = true;
            } else if attr.path().is_ident("identity") {
                is_identity = true;
            } else if attr.path().is_ident("column") {
                column = ColumnConfig::from_attr(attr)?;
            }
        }

        if column.skip && (is_id || is_identity) {
            return Err(darling::Error::custom(
                "key and identity fields cannot be skipped"
            )
            .with_span(&ident));
        }

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            is_id,
            is_identity,
            column
        })
    }

    /// Property name as written.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Check if the declared type is `Option<_>`.
    #[must_use]
    pub fn is_option(&self) -> bool {
        if let Type::Path(type_path) = &self.ty
            && let Some(segment) = type_path.path.segments.last()
        {
            return segment.ident == "Option";
        }
        false
    }

    /// Check if the field takes part in mapping.
    #[must_use]
    pub const fn is_mapped(&self) -> bool {
        !self.column.skip
    }
}
