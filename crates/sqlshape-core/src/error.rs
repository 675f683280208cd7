// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Translation errors.
//!
//! Every failure of the engine is raised synchronously while the statement is
//! being translated, before anything reaches the database client. Each
//! variant knows the [`Stage`] it belongs to so callers can tell a rejected
//! predicate from a dialect limitation.

use thiserror::Error;

use crate::statement::OperationKind;

/// Result alias used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Translation stage that produced an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Dialect lookup.
    Resolve,

    /// Predicate parsing and condition tree construction.
    Parse,

    /// SQL text generation.
    Build
}

impl Stage {
    /// Lower-case stage name for logs and messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Parse => "parse",
            Self::Build => "build"
        }
    }
}

/// Error raised while translating a predicate or building a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The predicate contains a construct that has no SQL translation.
    #[error("unsupported expression `{expression}`: {reason}")]
    UnsupportedExpression {
        /// Rendering of the offending sub-expression.
        expression: String,
        /// Why it cannot be translated.
        reason:     String
    },

    /// The dialect cannot express a requested feature.
    #[error("dialect `{dialect}` does not support {feature} (operation: {operation})")]
    UnsupportedDialectFeature {
        /// Dialect name.
        dialect:   String,
        /// Requested feature, e.g. `table hints`.
        feature:   &'static str,
        /// Operation that requested it.
        operation: OperationKind
    },

    /// A condition violates a structural invariant.
    #[error("invalid condition on `{field}`: {reason}")]
    InvalidConditionShape {
        /// Field the condition targets.
        field:  String,
        /// Violated invariant.
        reason: String
    },

    /// No dialect is registered under the identifier.
    #[error("no dialect registered for `{0}`")]
    UnsupportedDialect(String),

    /// A field is not part of the entity's mapped fields.
    #[error("entity `{entity}` has no mapped field `{field}`")]
    MissingField {
        /// Entity type name.
        entity: &'static str,
        /// Requested property or column.
        field:  String
    },

    /// The operation needs a primary key and the entity declares none.
    #[error("entity `{entity}` has no primary key (required by {operation})")]
    MissingPrimaryKey {
        /// Entity type name.
        entity:    &'static str,
        /// Operation that needed the key.
        operation: OperationKind
    },

    /// The operation resolved to zero fields.
    #[error("entity `{entity}` has no fields to use for {operation}")]
    EmptyFieldSet {
        /// Entity type name.
        entity:    &'static str,
        /// Operation that needed the fields.
        operation: OperationKind
    },

    /// Batch size outside of `1..=max`.
    #[error("batch size {size} is outside of the allowed range 1..={max}")]
    InvalidBatchSize {
        /// Requested size.
        size: usize,
        /// Configured maximum.
        max:  usize
    }
}

impl Error {
    /// Stage of the translation pipeline that raised this error.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedDialect(_) => Stage::Resolve,
            Self::UnsupportedExpression { .. } | Self::InvalidConditionShape { .. } => Stage::Parse,
            Self::UnsupportedDialectFeature { .. }
            | Self::MissingField { .. }
            | Self::MissingPrimaryKey { .. }
            | Self::EmptyFieldSet { .. }
            | Self::InvalidBatchSize { .. } => Stage::Build
        }
    }

    pub(crate) fn unsupported(expression: impl ToString, reason: impl Into<String>) -> Self {
        Self::UnsupportedExpression {
            expression: expression.to_string(),
            reason:     reason.into()
        }
    }

    pub(crate) fn invalid_shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConditionShape {
            field:  field.into(),
            reason: reason.into()
        }
    }
}
