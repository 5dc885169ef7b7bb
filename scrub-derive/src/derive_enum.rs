//! Enum-specific `Scrub` derivation.
//!
//! Enums are sum types: the active variant is kept and its payload visited.
//! Named variant fields carry their own path metadata. Tuple variant payloads
//! are transparent and inherit the path of the field holding the enum, the way
//! `Option` and `Result` do.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, DataEnum, Fields, Result};

use crate::{
    transform::{generate_field_transform, DeriveContext, FieldPath},
    DeriveOutput,
};

pub(crate) fn derive_enum(
    data: &DataEnum,
    zero: Option<&Ident>,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut walked_generics = Vec::new();
    let mut opaque_generics = Vec::new();
    let mut ctx = DeriveContext::new(generics, root, &mut walked_generics, &mut opaque_generics);

    let mut arms = Vec::new();
    for variant in &data.variants {
        let name = &variant.ident;
        let arm = match &variant.fields {
            Fields::Unit => quote! { Self::#name => Self::#name },
            Fields::Named(fields) => {
                let mut bindings = Vec::new();
                let mut metas = Vec::new();
                let mut walks = Vec::new();
                for field in &fields.named {
                    let Some(ident) = field.ident.clone() else {
                        continue;
                    };
                    // Variant fields are as visible as the enum itself.
                    let transform = generate_field_transform(
                        &mut ctx,
                        field,
                        &ident,
                        FieldPath::named(&ident, true),
                    )?;
                    metas.push(transform.meta);
                    walks.push(transform.walk);
                    bindings.push(ident);
                }
                quote! {
                    Self::#name { #(#bindings),* } => {
                        #(#metas)*
                        #(#walks)*
                        Self::#name { #(#bindings),* }
                    }
                }
            }
            Fields::Unnamed(fields) => {
                let mut bindings = Vec::new();
                let mut walks = Vec::new();
                for (index, field) in fields.unnamed.iter().enumerate() {
                    let binding = format_ident!("field_{index}");
                    let transform =
                        generate_field_transform(&mut ctx, field, &binding, FieldPath::Inner)?;
                    walks.push(transform.walk);
                    bindings.push(binding);
                }
                quote! {
                    Self::#name ( #(#bindings),* ) => {
                        #(#walks)*
                        Self::#name ( #(#bindings),* )
                    }
                }
            }
        };
        arms.push(arm);
    }
    let rebuildable = ctx.rebuildable_expr();

    let walk_body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#arms,)*
            }
        }
    };

    let (zero_body, needs_default) = match zero {
        Some(zero) => {
            let variant = data
                .variants
                .iter()
                .find(|variant| &variant.ident == zero)
                .ok_or_else(|| {
                    syn::Error::new(zero.span(), format!("no variant named `{zero}`"))
                })?;
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new(
                    variant.span(),
                    "the `zero` variant must be a unit variant",
                ));
            }
            (quote! { Self::#zero }, false)
        }
        None => (
            quote! { <Self as ::core::default::Default>::default() },
            true,
        ),
    };

    Ok(DeriveOutput {
        shape: quote! { SumType },
        zero_body,
        walk_body,
        rebuildable,
        walked_generics,
        opaque_generics,
        needs_default,
    })
}
