// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # sqlshape
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] derive macro from `sqlshape-derive-impl`
//! - All types from `sqlshape-core` ([`Engine`], [`Session`], [`Column`],
//!   [`QueryOptions`], [`Pagination`])
//!
//! # Quick Start
//!
//! ```rust
//! use sqlshape::{Engine, Entity, QueryOptions};
//!
//! #[derive(Entity)]
//! #[entity(table = "Person", rename_all = "PascalCase")]
//! pub struct Person {
//!     #[id]
//!     #[identity]
//!     pub id:   i64,
//!     pub name: String,
//!     pub age:  Option<i32>
//! }
//!
//! let engine = Engine::new();
//! let filter = Person::COLUMNS.age.is_null() | Person::COLUMNS.name.eq("Bob");
//! let command = engine
//!     .query::<Person>("sqlserver", filter, &QueryOptions::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     command.text,
//!     "SELECT [Id], [Name], [Age] FROM [dbo].[Person] WHERE ([Age] IS NULL) OR ([Name] = @Name);"
//! );
//! assert_eq!(command.parameters.len(), 1);
//! ```

pub use sqlshape_core::*;
pub use sqlshape_derive_impl::Entity;
