// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Memoized entity shapes.

use std::{any::TypeId, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::{debug, trace};

use crate::entity::{Entity, EntityShape};

/// Per-type cache of [`EntityShape`] snapshots.
///
/// A shape is described once per entity type and shared read-only
/// afterwards. When two threads miss at the same time both describe the
/// type, the first insertion wins and the other copy is dropped.
#[derive(Debug, Default)]
pub struct MetadataCache {
    shapes: DashMap<TypeId, Arc<EntityShape>>
}

impl MetadataCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape of `E`, described on first use.
    ///
    /// Generic entities are described on every call and never stored.
    pub fn get<E: Entity>(&self) -> Arc<EntityShape> {
        if E::GENERIC {
            return Arc::new(E::describe());
        }

        let type_id = TypeId::of::<E>();
        if let Some(shape) = self.shapes.get(&type_id) {
            trace!(entity = shape.type_name(), "metadata cache hit");
            return Arc::clone(shape.value());
        }

        let described = Arc::new(E::describe());
        match self.shapes.entry(type_id) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                debug!(
                    entity = described.type_name(),
                    fields = described.fields().len(),
                    "described entity"
                );
                entry.insert(Arc::clone(&described));
                described
            }
        }
    }

    /// Drop every stored shape.
    pub fn flush(&self) {
        debug!(entries = self.shapes.len(), "flushing metadata cache");
        self.shapes.clear();
    }

    /// Number of stored shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
