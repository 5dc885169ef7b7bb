//! Derive macro for `scrub`.
//!
//! This crate generates the traversal code behind `#[derive(Scrub)]`. It:
//! - reads `#[scrub(...)]` container and field attributes
//! - emits a `Scrub` implementation whose `walk` visits every declared field
//!
//! It does **not** decide what gets redacted. Censors and redactors live in
//! the main `scrub` crate and are applied at runtime.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::too_many_lines
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::{Ident, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, parse_quote, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::{add_opaque_bounds, add_scrub_bounds, add_static_bounds};
use transform::walker_ident;

/// Derives `scrub::Scrub` for structs and enums.
///
/// Structs are reported as aggregates, enums as sum types. The generated
/// `walk` visits every declared field, private ones included, and rebuilds
/// the value from the visited copies.
///
/// # Container Attributes
///
/// - `#[scrub(zero = Variant)]` (enums only): the unit variant used as the
///   enum's zero value. Without it the enum must implement `Default`.
///
/// # Field Attributes
///
/// - **No annotation**: the field type must implement `Scrub` and is visited
///   like any other node.
/// - `#[scrub(rename = "Name")]`: the field name reported to censors.
/// - `#[scrub(tag = "value")]`: a tag under the default `scrub` key.
/// - `#[scrub(tag(key = "value", ...))]`: tags under arbitrary keys.
/// - `#[scrub(opaque)]`: the field is copied without inspection. Only name and
///   tag censors can match it, and a match resets it to `Default::default()`.
///   Use this for external types that do not implement `Scrub`. A type with an
///   opaque field reports `rebuildable() == false`; otherwise it is rebuildable
///   when every field type is.
///
/// Fields of tuple structs are named by index (`"0"`, `"1"`). Fields of tuple
/// variants take the name and tags of the field holding the enum, so they
/// accept `opaque` only.
///
/// Unions and types with lifetime parameters are rejected at compile time.
#[proc_macro_derive(Scrub, attributes(scrub))]
pub fn derive_scrub(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the scrub crate root.
///
/// Handles crate renaming (e.g., `redact = { package = "scrub", ... }`). Inside
/// the scrub crate itself `::scrub` resolves through `extern crate self`.
fn crate_root() -> TokenStream {
    match crate_name("scrub") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::scrub },
    }
}

pub(crate) struct DeriveOutput {
    /// `Shape` variant name.
    pub(crate) shape: TokenStream,
    pub(crate) zero_body: TokenStream,
    pub(crate) walk_body: TokenStream,
    /// Body of `rebuildable`.
    pub(crate) rebuildable: TokenStream,
    pub(crate) walked_generics: Vec<Ident>,
    pub(crate) opaque_generics: Vec<Ident>,
    /// The zero value comes from `Default`.
    pub(crate) needs_default: bool,
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "`Scrub` cannot be derived for types with lifetime parameters",
        ));
    }

    let ContainerOptions { zero } = parse_container_options(&attrs)?;
    let root = crate_root();

    let output = match &data {
        Data::Struct(data) => {
            if let Some(zero) = &zero {
                return Err(syn::Error::new(
                    zero.span(),
                    "`zero` is only supported on enums",
                ));
            }
            derive_struct(data, &generics, &root)?
        }
        Data::Enum(data) => derive_enum(data, zero.as_ref(), &generics, &root)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Scrub` cannot be derived for unions",
            ));
        }
    };

    let self_ty: syn::Type = {
        let (_, ty_generics, _) = generics.split_for_impl();
        parse_quote!(#ident #ty_generics)
    };
    let generics = add_scrub_bounds(generics, &output.walked_generics, &root);
    let generics = add_opaque_bounds(generics, &output.opaque_generics);
    let mut generics = add_static_bounds(generics);
    let where_clause = generics.make_where_clause();
    where_clause
        .predicates
        .push(parse_quote!(#self_ty: ::core::clone::Clone));
    if output.needs_default {
        where_clause
            .predicates
            .push(parse_quote!(#self_ty: ::core::default::Default));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let DeriveOutput {
        shape,
        zero_body,
        walk_body,
        rebuildable,
        ..
    } = output;
    let walker = walker_ident();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #root::Scrub for #ident #ty_generics #where_clause {
            fn shape(&self) -> #root::Shape {
                #root::Shape::#shape
            }

            fn zero() -> Self {
                #zero_body
            }

            fn rebuildable() -> bool {
                #rebuildable
            }

            #[allow(unused_variables)]
            fn walk(&self, #walker: &#root::Walker<'_>) -> Self {
                #walk_body
            }
        }
    })
}
