//! Struct-specific `Scrub` derivation.
//!
//! Structs are aggregates. Named fields are reported under their identifier,
//! tuple fields under their index (`"0"`, `"1"`, ...).

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{DataStruct, Fields, Result};

use crate::{
    transform::{generate_field_transform, DeriveContext, FieldPath},
    DeriveOutput,
};

pub(crate) fn derive_struct(
    data: &DataStruct,
    generics: &syn::Generics,
    root: &TokenStream,
) -> Result<DeriveOutput> {
    let mut walked_generics = Vec::new();
    let mut opaque_generics = Vec::new();
    let mut ctx = DeriveContext::new(generics, root, &mut walked_generics, &mut opaque_generics);

    let (zero_body, walk_body) = match &data.fields {
        Fields::Named(fields) => derive_named_struct(&mut ctx, fields)?,
        Fields::Unnamed(fields) => derive_unnamed_struct(&mut ctx, fields)?,
        Fields::Unit => (quote! { Self }, quote! { Self }),
    };
    let rebuildable = ctx.rebuildable_expr();

    Ok(DeriveOutput {
        shape: quote! { Aggregate },
        zero_body,
        walk_body,
        rebuildable,
        walked_generics,
        opaque_generics,
        needs_default: false,
    })
}

fn derive_named_struct(
    ctx: &mut DeriveContext<'_>,
    fields: &syn::FieldsNamed,
) -> Result<(TokenStream, TokenStream)> {
    let mut bindings: Vec<Ident> = Vec::new();
    let mut metas = Vec::new();
    let mut walks = Vec::new();
    let mut zeros = Vec::new();

    for field in &fields.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let public = matches!(field.vis, syn::Visibility::Public(_));
        let transform =
            generate_field_transform(ctx, field, &ident, FieldPath::named(&ident, public))?;
        metas.push(transform.meta);
        walks.push(transform.walk);
        zeros.push(transform.zero);
        bindings.push(ident);
    }

    let zero_body = quote! {
        Self { #(#bindings: #zeros),* }
    };
    let walk_body = quote! {
        #(#metas)*
        let Self { #(#bindings),* } = self;
        #(#walks)*
        Self { #(#bindings),* }
    };
    Ok((zero_body, walk_body))
}

fn derive_unnamed_struct(
    ctx: &mut DeriveContext<'_>,
    fields: &syn::FieldsUnnamed,
) -> Result<(TokenStream, TokenStream)> {
    let mut bindings = Vec::new();
    let mut metas = Vec::new();
    let mut walks = Vec::new();
    let mut zeros = Vec::new();

    for (index, field) in fields.unnamed.iter().enumerate() {
        let binding = format_ident!("field_{index}");
        let public = matches!(field.vis, syn::Visibility::Public(_));
        let path = FieldPath::Declared {
            name: index.to_string(),
            public,
        };
        let transform = generate_field_transform(ctx, field, &binding, path)?;
        metas.push(transform.meta);
        walks.push(transform.walk);
        zeros.push(transform.zero);
        bindings.push(binding);
    }

    let zero_body = quote! {
        Self ( #(#zeros),* )
    };
    let walk_body = quote! {
        #(#metas)*
        let Self ( #(#bindings),* ) = self;
        #(#walks)*
        Self ( #(#bindings),* )
    };
    Ok((zero_body, walk_body))
}
