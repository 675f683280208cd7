// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column name case rules for `rename_all`.

use convert_case::{Case, Casing};
use darling::FromMeta;

/// Case transform applied to property names without an explicit column.
///
/// # Examples
///
/// ```rust,ignore
/// #[entity(rename_all = "PascalCase")]   // created_at -> CreatedAt
/// #[entity(rename_all = "camelCase")]    // created_at -> createdAt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `createdat`
    Lower,

    /// `CREATEDAT`
    Upper,

    /// `CreatedAt`
    Pascal,

    /// `createdAt`
    Camel,

    /// `created_at`
    Snake,

    /// `CREATED_AT`
    ScreamingSnake,

    /// `created-at`
    Kebab
}

impl RenameRule {
    /// Apply the rule to a property name.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Lower => name.replace('_', "").to_lowercase(),
            Self::Upper => name.replace('_', "").to_uppercase(),
            Self::Pascal => name.to_case(Case::UpperCamel),
            Self::Camel => name.to_case(Case::Camel),
            Self::Snake => name.to_case(Case::Snake),
            Self::ScreamingSnake => name.to_case(Case::UpperSnake),
            Self::Kebab => name.to_case(Case::Kebab)
        }
    }
}

impl FromMeta for RenameRule {
    /// Accepted values follow serde's `rename_all` spelling.
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            _ => Err(darling::Error::unknown_value(value))
        }
    }
}
