//! Generic type parameter handling and trait bound management.
//!
//! Bounds go on the parameters themselves, never on field types: a predicate
//! such as `Option<Box<Node<T>>>: Scrub` on `impl Scrub for Node<T>` would send
//! trait resolution around in a cycle for recursive types.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` fields are skipped when collecting generics:
//!
//! ```ignore
//! struct TypedId<T> {
//!     id: String,
//!     _marker: PhantomData<T>,  // T needs no Scrub impl
//! }
//! ```
//!
//! `PhantomData<T>` implements `Scrub` for every `T: 'static`, so requiring
//! `T: Scrub` would only reject marker types that are never visited.

use proc_macro2::TokenStream;
use syn::{parse_quote, Ident};

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            if let Some(qself) = &path.qself {
                collect_generics_from_type(&qself.ty, generics, result);
            }
            for segment in &path.path.segments {
                if segment.ident == "PhantomData" {
                    return;
                }
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner_ty) = arg {
                            collect_generics_from_type(inner_ty, generics, result);
                        }
                    }
                }
            }
            if let Some(first) = path.path.segments.first() {
                for param in generics.type_params() {
                    if first.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                        result.push(param.ident.clone());
                    }
                }
            }
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        _ => {}
    }
}

/// Adds `Scrub` bounds to generic parameters used in walked fields.
pub(crate) fn add_scrub_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
    root: &TokenStream,
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(#root::Scrub));
        }
    }
    generics
}

/// Adds `Clone + Default` bounds to generic parameters used in opaque fields.
pub(crate) fn add_opaque_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(::core::clone::Clone));
            param.bounds.push(parse_quote!(::core::default::Default));
        }
    }
    generics
}

/// Adds `'static` to every type parameter; `Scrub` values are type-identified
/// at runtime.
pub(crate) fn add_static_bounds(mut generics: syn::Generics) -> syn::Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    generics
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn collect(ty: TokenStream, generics: TokenStream) -> Vec<String> {
        let ty: syn::Type = syn::parse2(ty).unwrap();
        let generics: syn::Generics = syn::parse2(generics).unwrap();
        let mut result = Vec::new();
        collect_generics_from_type(&ty, &generics, &mut result);
        result.into_iter().map(|ident| ident.to_string()).collect()
    }

    #[test]
    fn finds_parameters_inside_wrappers() {
        assert_eq!(collect(quote! { Vec<Option<T>> }, quote! { <T, U> }), ["T"]);
        assert_eq!(
            collect(quote! { HashMap<K, Box<V>> }, quote! { <K, V> }),
            ["K", "V"]
        );
        assert_eq!(collect(quote! { [T; 4] }, quote! { <T> }), ["T"]);
        assert_eq!(collect(quote! { (T, U) }, quote! { <T, U> }), ["T", "U"]);
    }

    #[test]
    fn skips_phantom_data() {
        assert!(collect(quote! { PhantomData<T> }, quote! { <T> }).is_empty());
        assert!(collect(quote! { ::core::marker::PhantomData<T> }, quote! { <T> }).is_empty());
    }

    #[test]
    fn ignores_types_named_like_nothing_generic() {
        assert!(collect(quote! { String }, quote! { <T> }).is_empty());
        assert!(collect(quote! { module::T }, quote! { <T> }).is_empty());
    }

    #[test]
    fn bounds_are_added_per_parameter() {
        let generics: syn::Generics = syn::parse2(quote! { <T, U, V> }).unwrap();
        let t: Ident = syn::parse2(quote! { T }).unwrap();
        let u: Ident = syn::parse2(quote! { U }).unwrap();
        let generics = add_scrub_bounds(generics, &[t], &quote! { ::scrub });
        let generics = add_opaque_bounds(generics, &[u]);
        let generics = add_static_bounds(generics);
        let rendered: Vec<String> = generics
            .type_params()
            .map(|param| {
                let bounds = &param.bounds;
                quote!(#bounds).to_string().replace(' ', "")
            })
            .collect();
        assert_eq!(
            rendered,
            [
                "::scrub::Scrub+'static",
                "::core::clone::Clone+::core::default::Default+'static",
                "'static",
            ]
        );
    }
}
