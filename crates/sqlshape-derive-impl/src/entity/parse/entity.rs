// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level definition and parsing.
//!
//! # Parsing Flow
//!
//! ```text
//! DeriveInput
//!     │
//!     ├─► EntityAttrs::from_derive_input()  (darling)
//!     │       └─► table, schema, rename_all
//!     │
//!     ├─► FieldDef::from_field() for each field
//!     │       └─► #[id], #[identity], #[column(...)]
//!     │
//!     └─► validation
//!             ├─► no lifetime parameters
//!             ├─► at most one #[identity]
//!             └─► at least one mapped field
//! ```

use darling::FromDeriveInput;
use proc_macro2::Span;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Visibility};

use super::{FieldDef, RenameRule};

/// Entity-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityAttrs {
    ident: Ident,

    vis: Visibility,

    generics: Generics,

    /// Table name. Defaults to the struct name.
    #[darling(default)]
    table: Option<String>,

    /// Schema. Defaults to the dialect's default schema.
    #[darling(default)]
    schema: Option<String>,

    /// Case transform for columns without an explicit name.
    #[darling(default)]
    rename_all: Option<RenameRule>
}

/// Complete parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Struct visibility, reused for the generated columns struct.
    pub vis: Visibility,

    /// Type and const parameters.
    pub generics: Generics,

    /// Table name.
    pub table: String,

    /// Explicit schema.
    pub schema: Option<String>,

    /// Column case transform.
    pub rename_all: Option<RenameRule>,

    /// All fields in declaration order, skipped ones included.
    pub fields: Vec<FieldDef>
}

impl EntityDef {
    /// Parse a derive input into an entity definition.
    ///
    /// # Errors
    ///
    /// - not a struct with named fields
    /// - unknown or malformed `#[entity(...)]` keys
    /// - lifetime parameters
    /// - more than one `#[identity]` field
    /// - no mapped field
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        let Data::Struct(data) = &input.data else {
            return Err(darling::Error::custom("Entity can only be derived for structs")
                .with_span(&input.ident));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(darling::Error::custom("Entity requires named fields")
                .with_span(&input.ident));
        };

        let mut errors = darling::Error::accumulator();

        if let Some(lifetime) = attrs
            .generics
            .params
            .iter()
            .find(|p| matches!(p, GenericParam::Lifetime(_)))
        {
            errors.push(
                darling::Error::custom("Entity types cannot borrow: remove lifetime parameters")
                    .with_span(lifetime)
            );
        }

        if let Some(table) = &attrs.table
            && table.is_empty()
        {
            errors.push(darling::Error::custom("table name cannot be empty").with_span(&input.ident));
        }

        let fields: Vec<FieldDef> = named
            .named
            .iter()
            .filter_map(|f| errors.handle(FieldDef::from_field(f)))
            .collect();

        let identities: Vec<_> = fields.iter().filter(|f| f.is_identity).collect();
        if let Some(second) = identities.get(1) {
            errors.push(
                darling::Error::custom("at most one field can be marked #[identity]")
                    .with_span(&second.ident)
            );
        }

        if fields.len() == named.named.len() && fields.iter().all(|f| !f.is_mapped()) {
            errors.push(
                darling::Error::custom("Entity needs at least one mapped field")
                    .with_span(&input.ident)
            );
        }

        errors.finish()?;

        let table = attrs.table.unwrap_or_else(|| attrs.ident.to_string());

        Ok(Self {
            ident: attrs.ident,
            vis: attrs.vis,
            generics: attrs.generics,
            table,
            schema: attrs.schema,
            rename_all: attrs.rename_all,
            fields
        })
    }

    /// Fields that take part in mapping, in declaration order.
    pub fn mapped_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_mapped())
    }

    /// Check if the entity has type or const parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Column name of a field: explicit name, then `rename_all`, then the
    /// property name.
    #[must_use]
    pub fn column_name(&self, field: &FieldDef) -> String {
        if let Some(name) = &field.column.name {
            return name.clone();
        }
        let property = field.name_str();
        match self.rename_all {
            Some(rule) => rule.apply(&property),
            None => property
        }
    }

    /// Identifier of the generated columns struct, e.g. `PersonColumns`.
    #[must_use]
    pub fn columns_ident(&self) -> Ident {
        Ident::new(&format!("{}Columns", self.ident), Span::call_site())
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn defaults() {
        let input: DeriveInput = parse_quote! {
            pub struct Person {
                #[id]
                #[identity]
                pub id: i64,
                pub name: String
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "Person");
        assert!(entity.schema.is_none());
        assert!(entity.rename_all.is_none());
        assert!(!entity.is_generic());
        assert_eq!(entity.fields.len(), 2);
        assert_eq!(entity.columns_ident().to_string(), "PersonColumns");
    }

    #[test]
    fn entity_attributes() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "People", schema = "hr", rename_all = "PascalCase")]
            pub struct Person {
                #[id]
                pub person_id: i64,
                #[column(name = "FullName")]
                pub name: String,
                #[column(skip)]
                pub scratch: Vec<u8>
            }
        };
        let entity = EntityDef::from_derive_input(&input).unwrap();
        assert_eq!(entity.table, "People");
        assert_eq!(entity.schema.as_deref(), Some("hr"));

        let columns: Vec<_> = entity
            .mapped_fields()
            .map(|f| entity.column_name(f))
            .collect();
        assert_eq!(columns, ["PersonId", "FullName"]);
    }

    #[test]
    fn generic_entity() {
        let input: DeriveInput = parse_quote! {
            pub struct Tagged<T> {
                #[id]
                pub id: i64,
                pub tag: T
            }
        };
        assert!(EntityDef::from_derive_input(&input).unwrap().is_generic());
    }

    #[test]
    fn lifetimes_are_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Borrowed<'a> {
                pub name: &'a str
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn tuple_struct_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Pair(i64, String);
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn enum_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub enum State { On, Off }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn two_identities_are_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Twice {
                #[identity]
                pub a: i64,
                #[identity]
                pub b: i64
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn all_skipped_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Nothing {
                #[column(skip)]
                pub a: i64
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn unknown_entity_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[entity(tabel = "x")]
            pub struct Typo {
                pub a: i64
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn unknown_rename_rule_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[entity(rename_all = "Title Case")]
            pub struct Typo {
                pub a: i64
            }
        };
        assert!(EntityDef::from_derive_input(&input).is_err());
    }
}
