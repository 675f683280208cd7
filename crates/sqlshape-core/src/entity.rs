// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity registration and shape descriptors.
//!
//! `#[derive(Entity)]` implements [`Entity`] for a struct: it produces the
//! [`EntityShape`] snapshot once per call to [`Entity::describe`] and a
//! by-name property accessor used to bind late values. Manual
//! implementations are equally valid.
//!
//! # Example
//!
//! ```rust
//! use sqlshape_core::{Entity, EntityShape, FieldDescriptor, Value};
//!
//! struct Person {
//!     id:   i64,
//!     name: String
//! }
//!
//! impl Entity for Person {
//!     fn describe() -> EntityShape {
//!         EntityShape::new::<Self>("Person")
//!             .field(FieldDescriptor::new("id", "i64").column("Id").primary().identity())
//!             .field(FieldDescriptor::new("name", "String").column("Name"))
//!     }
//!
//!     fn property(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "id" => Some(self.id.into()),
//!             "name" => Some(self.name.clone().into()),
//!             _ => None
//!         }
//!     }
//! }
//!
//! let shape = Person::describe();
//! assert_eq!(shape.primary_keys().count(), 1);
//! ```

use std::any::{TypeId, type_name};

use crate::value::{DbType, Value};

/// A type mapped to a database table.
pub trait Entity: 'static {
    /// Whether the type is generic.
    ///
    /// Generic entities bypass the metadata cache and are described anew on
    /// every call.
    const GENERIC: bool = false;

    /// Build the shape snapshot of this entity.
    fn describe() -> EntityShape;

    /// Read a property by its name.
    ///
    /// Returns `None` for names that are not mapped properties.
    fn property(&self, name: &str) -> Option<Value>;
}

/// Immutable description of one mapped field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Rust property name.
    pub property: &'static str,

    /// Database column name.
    pub column: &'static str,

    /// Declared Rust type, as written.
    pub type_name: &'static str,

    /// Whether the property is an `Option`.
    pub nullable: bool,

    /// Part of the primary key.
    pub primary: bool,

    /// Generated by the database on insert.
    pub identity: bool,

    /// Explicit database type.
    pub db_type: Option<DbType>
}

impl FieldDescriptor {
    /// Describe a property whose column has the same name.
    #[must_use]
    pub const fn new(property: &'static str, type_name: &'static str) -> Self {
        Self {
            property,
            column: property,
            type_name,
            nullable: false,
            primary: false,
            identity: false,
            db_type: None
        }
    }

    /// Map to a differently named column.
    #[must_use]
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }

    /// Mark as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as part of the primary key.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Mark as database generated.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Attach an explicit database type.
    #[must_use]
    pub const fn db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    /// Check if the field is assignable by an insert or update.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !self.identity
    }
}

/// Shape of an entity: table, schema and ordered fields.
///
/// Fields keep declaration order, which fixes the column and parameter order
/// of every generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityShape {
    type_id:   TypeId,
    type_name: &'static str,
    table:     &'static str,
    schema:    Option<&'static str>,
    fields:    Vec<FieldDescriptor>
}

impl EntityShape {
    /// Start a shape for `E` mapped to `table`.
    #[must_use]
    pub fn new<E: 'static>(table: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: short_type_name(type_name::<E>()),
            table,
            schema: None,
            fields: Vec::new()
        }
    }

    /// Set the schema.
    #[must_use]
    pub fn schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Identity of the described type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Short name of the described type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Table name, unqualified.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Declared schema.
    #[must_use]
    pub const fn schema_name(&self) -> Option<&'static str> {
        self.schema
    }

    /// All fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Find a field by property name, falling back to column name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.property == name)
            .or_else(|| self.fields.iter().find(|f| f.column.eq_ignore_ascii_case(name)))
    }

    /// Primary key fields.
    pub fn primary_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.primary)
    }

    /// The identity field, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.identity)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full
    }
}
