// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[entity(...)]`
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(
//!     table = "People",          // Optional: table name (default: struct name)
//!     schema = "hr",             // Optional: schema (default: dialect default)
//!     rename_all = "PascalCase"  // Optional: column case transform
//! )]
//! pub struct Person { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct Person {
//!     #[id]                                   // Primary key (repeat for composite keys)
//!     #[identity]                             // Generated by the database on insert
//!     pub id: i64,
//!
//!     #[column(name = "FullName")]            // Explicit column name
//!     pub name: String,
//!
//!     #[column(db_type = "SmallDateTime")]    // Explicit database type
//!     pub seen_at: chrono::NaiveDateTime,
//!
//!     #[column(skip)]                         // Not mapped
//!     pub cache: Vec<u8>,
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! For a `Person` entity, the macro generates:
//!
//! | Generated Item | Description |
//! |----------------|-------------|
//! | `impl Entity for Person` | Shape snapshot and property accessor |
//! | `PersonColumns` | One typed `Column<Person, T>` per mapped field |
//! | `Person::COLUMNS` | Constant instance of `PersonColumns` |

mod entity;

use proc_macro::TokenStream;

/// Derive macro registering a struct as a mapped entity.
///
/// # Entity Attributes
///
/// | Attribute | Required | Default | Description |
/// |-----------|----------|---------|-------------|
/// | `table` | No | struct name | Database table name |
/// | `schema` | No | dialect default | Database schema name |
/// | `rename_all` | No | none | `lowercase`, `UPPERCASE`, `PascalCase`, `camelCase`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case` |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[id]` | Part of the primary key. |
/// | `#[identity]` | Database generated. Excluded from inserts and updates. |
/// | `#[column(name = "...")]` | Explicit column name, overrides `rename_all`. |
/// | `#[column(db_type = "...")]` | Explicit database type, e.g. `"SmallDateTime"`. |
/// | `#[column(skip)]` | Field is not mapped. |
///
/// Mapped field types must convert into `sqlshape::Value` and implement
/// `Clone`.
///
/// # Example
///
/// ```rust,ignore
/// use sqlshape::{Engine, Entity, QueryOptions};
///
/// #[derive(Entity)]
/// #[entity(table = "Person", rename_all = "PascalCase")]
/// pub struct Person {
///     #[id]
///     #[identity]
///     pub id: i64,
///     pub name: String,
///     pub age: Option<i32>,
/// }
///
/// let engine = Engine::new();
/// let filter = Person::COLUMNS.age.is_null() | Person::COLUMNS.name.eq("Bob");
/// let command = engine.query::<Person>("sqlserver", filter, &QueryOptions::new())?;
/// // SELECT [Id], [Name], [Age] FROM [dbo].[Person] WHERE ([Age] IS NULL) OR ([Name] = @Name);
/// ```
#[proc_macro_derive(Entity, attributes(entity, id, identity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
