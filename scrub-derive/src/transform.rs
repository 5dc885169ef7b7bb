//! Shared field transformation logic for struct and enum derivation.
//!
//! Every field is bound by reference from `self`, rebound to its visited copy
//! and finally moved into the rebuilt value. Declared fields also get a
//! `static` `FieldMeta` carrying their name, tags and visibility.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{ext::IdentExt, spanned::Spanned, Result};

use crate::{
    generics::collect_generics_from_type,
    strategy::{parse_field_options, Strategy},
};

/// Name of the walker parameter in the generated `walk`.
pub(crate) fn walker_ident() -> Ident {
    format_ident!("__scrub_walker")
}

/// Accumulated state during field processing.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) root: &'a TokenStream,
    pub(crate) walked_generics: &'a mut Vec<Ident>,
    pub(crate) opaque_generics: &'a mut Vec<Ident>,
    /// Set once any field is `#[scrub(opaque)]`.
    pub(crate) has_opaque: bool,
    /// `rebuildable()` of every walked field type.
    rebuildable_terms: Vec<TokenStream>,
    next_meta: usize,
}

impl<'a> DeriveContext<'a> {
    pub(crate) fn new(
        generics: &'a syn::Generics,
        root: &'a TokenStream,
        walked_generics: &'a mut Vec<Ident>,
        opaque_generics: &'a mut Vec<Ident>,
    ) -> Self {
        Self {
            generics,
            root,
            walked_generics,
            opaque_generics,
            has_opaque: false,
            rebuildable_terms: Vec::new(),
            next_meta: 0,
        }
    }

    /// Body of the generated `rebuildable`: `false` with an opaque field,
    /// otherwise the conjunction of the walked field types' answers.
    pub(crate) fn rebuildable_expr(&self) -> TokenStream {
        if self.has_opaque {
            return quote! { false };
        }
        if self.rebuildable_terms.is_empty() {
            return quote! { true };
        }
        let root = self.root;
        let terms = &self.rebuildable_terms;
        quote! {
            #root::rebuildable_with::<Self>(|| true #(&& #terms)*)
        }
    }
}

/// Where a field sits in the value graph.
pub(crate) enum FieldPath {
    /// A declared field with its own path metadata.
    Declared { name: String, public: bool },
    /// A tuple-variant payload. It reuses the path of the field holding the
    /// enum.
    Inner,
}

impl FieldPath {
    /// Path for a named field, reporting the unraw identifier (`r#type` is
    /// `"type"`).
    pub(crate) fn named(ident: &Ident, public: bool) -> Self {
        FieldPath::Declared {
            name: ident.unraw().to_string(),
            public,
        }
    }
}

/// Generated pieces for one field.
pub(crate) struct FieldTransform {
    /// `static` metadata item, empty for inner paths.
    pub(crate) meta: TokenStream,
    /// `let binding = <visited copy>;`
    pub(crate) walk: TokenStream,
    /// Expression producing the field's zero value.
    pub(crate) zero: TokenStream,
}

/// Generates the transform for a single field.
///
/// | Attribute | Visit | Zero |
/// |-----------|-------|------|
/// | None | `Walker::visit_field` / `visit_inner` | `Scrub::zero` |
/// | `#[scrub(opaque)]` | `Walker::visit_opaque_field` / `visit_opaque_inner` | `Default::default` |
pub(crate) fn generate_field_transform(
    ctx: &mut DeriveContext<'_>,
    field: &syn::Field,
    binding: &Ident,
    path: FieldPath,
) -> Result<FieldTransform> {
    let options = parse_field_options(&field.attrs)?;
    let root = ctx.root;
    let walker = walker_ident();
    let ty = &field.ty;
    let span = field.span();

    let zero = match options.strategy {
        Strategy::Walk => {
            collect_generics_from_type(ty, ctx.generics, ctx.walked_generics);
            ctx.rebuildable_terms
                .push(quote_spanned! { span => <#ty as #root::Scrub>::rebuildable() });
            quote_spanned! { span => <#ty as #root::Scrub>::zero() }
        }
        Strategy::Opaque => {
            ctx.has_opaque = true;
            collect_generics_from_type(ty, ctx.generics, ctx.opaque_generics);
            quote_spanned! { span => <#ty as ::core::default::Default>::default() }
        }
    };

    match path {
        FieldPath::Declared { name, public } => {
            let meta_ident = format_ident!("__SCRUB_FIELD_{}", ctx.next_meta);
            ctx.next_meta += 1;

            let name = options.rename.as_ref().map_or(name, syn::LitStr::value);
            let tags = options.tags.iter().map(|(key, value)| {
                quote! { #root::Tag::new(#key, #value) }
            });
            let visibility = if public {
                quote! { #root::Visibility::Public }
            } else {
                quote! { #root::Visibility::Restricted }
            };
            let meta = quote! {
                static #meta_ident: #root::FieldMeta =
                    #root::FieldMeta::new(#name, &[#(#tags),*], #visibility);
            };
            let walk = match options.strategy {
                Strategy::Walk => quote_spanned! { span =>
                    let #binding = #walker.visit_field(&#meta_ident, #binding);
                },
                Strategy::Opaque => quote_spanned! { span =>
                    let #binding = #walker.visit_opaque_field(&#meta_ident, #binding);
                },
            };
            Ok(FieldTransform { meta, walk, zero })
        }
        FieldPath::Inner => {
            if options.has_path_metadata() {
                return Err(syn::Error::new(
                    options.span.unwrap_or_else(Span::call_site),
                    "`rename` and `tag` are not supported on tuple variant fields; \
                     they take the path of the field holding the enum",
                ));
            }
            let walk = match options.strategy {
                Strategy::Walk => quote_spanned! { span =>
                    let #binding = #walker.visit_inner(#binding);
                },
                Strategy::Opaque => quote_spanned! { span =>
                    let #binding = #walker.visit_opaque_inner(#binding);
                },
            };
            Ok(FieldTransform {
                meta: TokenStream::new(),
                walk,
                zero,
            })
        }
    }
}
