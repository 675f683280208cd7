// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Entity derive macro.
//!
//! Entity-level attributes are parsed with [`darling`]; field-level
//! attributes are marker style (`#[id]`, `#[identity]`) or a small key list
//! (`#[column(...)]`) and are parsed by hand.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (coordinator)
//! ├── entity.rs      - Entity-level parsing (EntityDef)
//! ├── field.rs       - Field-level parsing (FieldDef)
//! │   └── column.rs  - #[column(name, db_type, skip)]
//! └── rename.rs      - rename_all case rules
//! ```
//!
//! # Data Structures
//!
//! ```text
//! EntityDef
//! ├── ident: Ident               (struct name, e.g. "Person")
//! ├── vis: Visibility
//! ├── generics: Generics
//! ├── table: String              (default: struct name)
//! ├── schema: Option<String>
//! ├── rename_all: Option<RenameRule>
//! └── fields: Vec<FieldDef>
//!     └── FieldDef
//!         ├── ident: Ident
//!         ├── ty: Type
//!         ├── is_id: bool
//!         ├── is_identity: bool
//!         └── column: ColumnConfig (name, db_type, skip)
//! ```

mod entity;
mod field;
mod rename;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use rename::RenameRule;
