// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated statement cache.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::{debug, trace};

use crate::{
    error::Result,
    statement::{GeneratedStatement, StatementKey}
};

/// Statements keyed by their structural [`StatementKey`].
///
/// Entries are immutable and shared. Concurrent misses on one key may both
/// render the statement; exactly one result is stored and every caller gets
/// the stored copy.
#[derive(Debug, Default)]
pub struct StatementCache {
    statements: DashMap<StatementKey, Arc<GeneratedStatement>>
}

impl StatementCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored statement for `key`, rendering it with `build` on a miss.
    ///
    /// Failed renders are not stored.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns.
    pub fn get_or_compute<F>(&self, key: StatementKey, build: F) -> Result<Arc<GeneratedStatement>>
    where
        F: FnOnce() -> Result<GeneratedStatement>
    {
        if let Some(found) = self.statements.get(&key) {
            trace!(operation = %key.operation, "statement cache hit");
            return Ok(Arc::clone(found.value()));
        }

        let built = Arc::new(build()?);
        match self.statements.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                debug!(
                    entity = built.entity_name(),
                    operation = %built.operation(),
                    dialect = %built.settings().name,
                    "cached statement"
                );
                entry.insert(Arc::clone(&built));
                Ok(built)
            }
        }
    }

    /// Drop every stored statement.
    pub fn flush(&self) {
        debug!(entries = self.statements.len(), "flushing statement cache");
        self.statements.clear();
    }

    /// Number of stored statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        any::TypeId,
        sync::atomic::{AtomicUsize, Ordering}
    };

    use super::*;
    use crate::{
        dialect::{DialectSettings, sqlserver},
        entity::{EntityShape, FieldDescriptor},
        error::Error,
        statement::{OperationKind, StatementBuilder}
    };

    struct Person;

    fn shape() -> EntityShape {
        EntityShape::new::<Person>("Person").field(FieldDescriptor::new("id", "i64").column("Id").primary())
    }

    fn key(settings: &Arc<DialectSettings>) -> StatementKey {
        StatementKey::new(TypeId::of::<Person>(), OperationKind::Truncate, Arc::clone(settings))
    }

    #[test]
    fn renders_once_per_key() {
        let cache = StatementCache::new();
        let settings = Arc::new(sqlserver::settings());
        let shape = shape();
        let renders = AtomicUsize::new(0);
        let render = || {
            renders.fetch_add(1, Ordering::SeqCst);
            StatementBuilder::new(&settings, &shape).truncate()
        };

        let first = cache.get_or_compute(key(&settings), render).unwrap();
        let second = cache.get_or_compute(key(&settings), render).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_stored() {
        let cache = StatementCache::new();
        let settings = Arc::new(sqlserver::settings());
        let err = cache
            .get_or_compute(key(&settings), || Err(Error::UnsupportedDialect("x".into())))
            .unwrap_err();
        assert_eq!(err, Error::UnsupportedDialect("x".into()));
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_empties() {
        let cache = StatementCache::new();
        let settings = Arc::new(sqlserver::settings());
        let shape = shape();
        cache
            .get_or_compute(key(&settings), || StatementBuilder::new(&settings, &shape).truncate())
            .unwrap();
        cache.flush();
        assert!(cache.is_empty());
    }
}
