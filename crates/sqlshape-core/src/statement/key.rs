// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Structural statement cache keys.

use std::{any::TypeId, sync::Arc};

use super::{Aggregate, OperationKind, QueryOptions};
use crate::{condition::ConditionShape, dialect::DialectSettings};

/// Everything that determines the text of a generated statement.
///
/// Values never take part: two calls whose predicates differ only in the
/// compared values share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementKey {
    /// Entity type.
    pub entity: TypeId,

    /// Operation.
    pub operation: OperationKind,

    /// Dialect the text is rendered for.
    pub dialect: Arc<DialectSettings>,

    /// Operation specific field list: projection, qualifiers.
    pub fields: Vec<String>,

    /// Shape of the condition tree.
    pub condition: Option<ConditionShape>,

    /// Row query options.
    pub options: Option<QueryOptions>,

    /// Aggregate request.
    pub aggregate: Option<Aggregate>,

    /// Table hints outside of query options.
    pub hints: Option<String>,

    /// Rows per statement.
    pub batch_size: Option<usize>
}

impl StatementKey {
    /// Key for `operation` on entity `entity` in `dialect`.
    #[must_use]
    pub const fn new(entity: TypeId, operation: OperationKind, dialect: Arc<DialectSettings>) -> Self {
        Self {
            entity,
            operation,
            dialect,
            fields: Vec::new(),
            condition: None,
            options: None,
            aggregate: None,
            hints: None,
            batch_size: None
        }
    }

    /// Set the field list.
    #[must_use]
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Set the condition shape.
    #[must_use]
    pub fn condition(mut self, condition: Option<ConditionShape>) -> Self {
        self.condition = condition;
        self
    }

    /// Set query options.
    #[must_use]
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the aggregate.
    #[must_use]
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    /// Set table hints.
    #[must_use]
    pub fn hints(mut self, hints: Option<String>) -> Self {
        self.hints = hints;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher}
    };

    use super::*;
    use crate::{
        condition::{Comparison, ConditionNode, Operator},
        dialect::{sqlite, sqlserver}
    };

    struct Person;

    fn hash(key: &StatementKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn key(value: i32) -> StatementKey {
        let tree = ConditionNode::from_fields([Comparison::new("name", Operator::Equal, value)]);
        StatementKey::new(TypeId::of::<Person>(), OperationKind::Query, Arc::new(sqlserver::settings()))
            .condition(Some(tree.shape()))
            .options(QueryOptions::new())
    }

    #[test]
    fn values_do_not_change_the_key() {
        assert_eq!(key(1), key(2));
        assert_eq!(hash(&key(1)), hash(&key(2)));
    }

    #[test]
    fn dialect_and_batch_size_change_the_key() {
        let mut other = key(1);
        other.dialect = Arc::new(sqlite::settings());
        assert_ne!(key(1), other);
        assert_ne!(key(1), key(1).batch_size(3));
        assert_ne!(key(1), key(1).hints(Some("WITH (NOLOCK)".into())));
    }
}
