//! Parsing of `#[scrub(...)]` field attributes.
//!
//! This module maps attribute syntax to traversal decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitStr, Meta, Result};

/// How the generated `walk` treats a field.
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Walk` | Visited through the field type's `Scrub` impl |
/// | `#[scrub(opaque)]` | `Opaque` | Cloned, zeroed with `Default`, unreadable to content censors |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// The field type implements `Scrub` and is visited like any other node.
    Walk,
    /// The field type is copied without inspection.
    ///
    /// Only name and tag censors can match it. External types that do not
    /// implement `Scrub` (but are `Clone + Default`) use this.
    Opaque,
}

/// Options parsed from a field's `#[scrub(...)]` attributes.
#[derive(Clone, Debug)]
pub(crate) struct FieldOptions {
    pub(crate) strategy: Strategy,
    /// Name reported to censors instead of the Rust identifier.
    pub(crate) rename: Option<LitStr>,
    /// Tags in declaration order, as `(key, value)`.
    pub(crate) tags: Vec<(String, LitStr)>,
    /// Span of the first `#[scrub]` attribute, for later diagnostics.
    pub(crate) span: Option<Span>,
}

impl FieldOptions {
    /// Returns `true` if the field declares a name or tags.
    pub(crate) fn has_path_metadata(&self) -> bool {
        self.rename.is_some() || !self.tags.is_empty()
    }
}

/// Tag key used by the `tag = "..."` shorthand. Matches the engine default.
pub(crate) const DEFAULT_TAG_KEY: &str = "scrub";

pub(crate) fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions {
        strategy: Strategy::Walk,
        rename: None,
        tags: Vec::new(),
        span: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("scrub") {
            continue;
        }
        options.span.get_or_insert(attr.span());

        match &attr.meta {
            Meta::Path(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected field options (e.g., #[scrub(opaque)] or #[scrub(tag = \"secret\")])",
                ));
            }
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("opaque") {
                        if options.strategy == Strategy::Opaque {
                            return Err(meta.error("duplicate `opaque` option"));
                        }
                        options.strategy = Strategy::Opaque;
                        Ok(())
                    } else if meta.path.is_ident("rename") {
                        if options.rename.is_some() {
                            return Err(meta.error("duplicate `rename` option"));
                        }
                        options.rename = Some(meta.value()?.parse()?);
                        Ok(())
                    } else if meta.path.is_ident("tag") {
                        if meta.input.peek(syn::Token![=]) {
                            let value: LitStr = meta.value()?.parse()?;
                            options.tags.push((DEFAULT_TAG_KEY.to_string(), value));
                            Ok(())
                        } else {
                            meta.parse_nested_meta(|tag| {
                                let key = tag.path.get_ident().ok_or_else(|| {
                                    tag.error("tag keys must be plain identifiers")
                                })?;
                                let value: LitStr = tag.value()?.parse()?;
                                options.tags.push((key.to_string(), value));
                                Ok(())
                            })
                        }
                    } else {
                        Err(meta.error(format!(
                            "unknown field option `{}`; expected `opaque`, `rename` or `tag`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[scrub]",
                ));
            }
        }
    }

    Ok(options)
}
