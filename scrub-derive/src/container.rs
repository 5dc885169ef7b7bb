//! Container-level attribute parsing for `#[derive(Scrub)]`.
//!
//! This module handles attributes on the struct/enum itself, not on fields.

use syn::{Attribute, Ident, Meta, Result};

/// Options parsed from container-level `#[scrub(...)]` attributes.
#[derive(Clone, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Unit variant used as the zero value of an enum.
    pub(crate) zero: Option<Ident>,
}

/// Parses container-level `#[scrub(...)]` attributes.
pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("scrub") {
            continue;
        }

        match &attr.meta {
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "expected container options (e.g., #[scrub(zero = Variant)])",
                ));
            }
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("zero") {
                        if options.zero.is_some() {
                            return Err(meta.error("duplicate `zero` option"));
                        }
                        options.zero = Some(meta.value()?.parse()?);
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{}`; expected `zero`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for container-level #[scrub]",
                ));
            }
        }
    }

    Ok(options)
}
