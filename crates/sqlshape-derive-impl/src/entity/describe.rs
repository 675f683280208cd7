// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::sqlshape::Entity for Person {
//!     const GENERIC: bool = false;
//!
//!     fn describe() -> ::sqlshape::EntityShape {
//!         ::sqlshape::EntityShape::new::<Self>("Person")
//!             .field(::sqlshape::FieldDescriptor::new("id", "i64").column("Id").primary().identity())
//!             .field(::sqlshape::FieldDescriptor::new("age", "Option<i32>").column("Age").nullable())
//!     }
//!
//!     fn property(&self, name: &str) -> Option<::sqlshape::Value> {
//!         match name {
//!             "id" => Some(self.id.clone().into()),
//!             "age" => Some(self.age.clone().into()),
//!             _ => None
//!         }
//!     }
//! }
//! ```
//!
//! Generic entities get `'static` bounds on their type parameters and
//! `Clone + Into<Value>` bounds on every mapped field type.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericParam, parse_quote};

use super::parse::{EntityDef, FieldDef};

pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let generic = entity.is_generic();
    let table = &entity.table;

    let mut generics = entity.generics.clone();
    if generic {
        let params: Vec<_> = generics
            .params
            .iter()
            .filter_map(|p| match p {
                GenericParam::Type(param) => Some(param.ident.clone()),
                _ => None
            })
            .collect();
        let where_clause = generics.make_where_clause();
        for name in params {
            where_clause.predicates.push(parse_quote!(#name: 'static));
        }
        for field in entity.mapped_fields() {
            let ty = &field.ty;
            where_clause.predicates.push(parse_quote! {
                #ty: ::core::clone::Clone + ::core::convert::Into<::sqlshape::Value>
            });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let schema = entity.schema.as_ref().map(|schema| quote! { .schema(#schema) });
    let descriptors = entity.mapped_fields().map(|f| descriptor(entity, f));
    let arms = entity.mapped_fields().map(property_arm);

    quote! {
        #[automatically_derived]
        impl #impl_generics ::sqlshape::Entity for #ident #ty_generics #where_clause {
            const GENERIC: bool = #generic;

            fn describe() -> ::sqlshape::EntityShape {
                ::sqlshape::EntityShape::new::<Self>(#table)
                    #schema
                    #(#descriptors)*
            }

            fn property(&self, name: &str) -> ::core::option::Option<::sqlshape::Value> {
                match name {
                    #(#arms,)*
                    _ => ::core::option::Option::None
                }
            }
        }
    }
}

fn descriptor(entity: &EntityDef, field: &FieldDef) -> TokenStream {
    let property = field.name_str();
    let ty = &field.ty;
    let type_name = quote!(#ty).to_string().replace(' ', "");
    let column = entity.column_name(field);

    let nullable = field.is_option().then(|| quote! { .nullable() });
    let primary = field.is_id.then(|| quote! { .primary() });
    let identity = field.is_identity.then(|| quote! { .identity() });
    let db_type = field.column.db_type.as_ref().map(|variant| {
        let variant = format_ident!("{}", variant);
        quote! { .db_type(::sqlshape::DbType::#variant) }
    });

    quote! {
        .field(
            ::sqlshape::FieldDescriptor::new(#property, #type_name)
                .column(#column)
                #nullable
                #primary
                #identity
                #db_type
        )
    }
}

fn property_arm(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    let property = field.name_str();
    quote! {
        #property => ::core::option::Option::Some(
            ::core::convert::Into::into(::core::clone::Clone::clone(&self.#ident))
        )
    }
}
