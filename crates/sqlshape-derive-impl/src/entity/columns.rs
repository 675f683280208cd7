// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed column handle generation.
//!
//! ```rust,ignore
//! pub struct PersonColumns {
//!     pub id:  ::sqlshape::Column<Person, i64>,
//!     pub age: ::sqlshape::Column<Person, Option<i32>>
//! }
//!
//! impl Person {
//!     pub const COLUMNS: PersonColumns = PersonColumns {
//!         id:  ::sqlshape::Column::new("id"),
//!         age: ::sqlshape::Column::new("age")
//!     };
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::EntityDef;

pub fn generate(entity: &EntityDef) -> TokenStream {
    let vis = &entity.vis;
    let ident = &entity.ident;
    let columns = entity.columns_ident();
    let generics = &entity.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let doc = format!("Typed column handles of [`{ident}`].");
    let const_doc = format!("Column handles for building [`{ident}`] predicates.");

    let fields = entity.mapped_fields().map(|f| {
        let name = &f.ident;
        let ty = &f.ty;
        let field_doc = format!("Handle of `{}`.", f.name_str());
        quote! {
            #[doc = #field_doc]
            #vis #name: ::sqlshape::Column<#ident #ty_generics, #ty>
        }
    });
    let values = entity.mapped_fields().map(|f| {
        let name = &f.ident;
        let property = f.name_str();
        quote! { #name: ::sqlshape::Column::new(#property) }
    });

    quote! {
        #[doc = #doc]
        #vis struct #columns #generics #where_clause {
            #(#fields,)*
        }

        #[automatically_derived]
        impl #impl_generics ::core::clone::Clone for #columns #ty_generics #where_clause {
            fn clone(&self) -> Self {
                *self
            }
        }

        #[automatically_derived]
        impl #impl_generics ::core::marker::Copy for #columns #ty_generics #where_clause {}

        impl #impl_generics #ident #ty_generics #where_clause {
            #[doc = #const_doc]
            #vis const COLUMNS: #columns #ty_generics = #columns {
                #(#values,)*
            };
        }
    }
}
