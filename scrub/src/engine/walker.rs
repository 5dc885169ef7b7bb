//! Recursive visit of a value graph.
//!
//! Every node goes through [`Scrubber::visit`]:
//!
//! 1. past the depth bound, the node becomes its zero value;
//! 2. allow-listed types are cloned unchanged;
//! 3. filters run in registration order, and the first matching one produces
//!    the replacement;
//! 4. otherwise the node rebuilds itself through `Scrub::walk`, which calls
//!    back into the [`Walker`] for each child.
//!
//! None of these steps can fail. Irregular input degrades to a clone or a zero
//! value.

use std::{any::TypeId, collections::HashSet, fmt};

use super::{config::Filter, Builder, Scrub};
use crate::shape::{Field, FieldMeta, Shape, View};

/// The redaction engine.
///
/// Built once with [`Scrubber::builder`] and immutable afterwards. A single
/// `Scrubber` can serve any number of threads.
///
/// ```rust
/// use scrub::{Scrub, Scrubber};
///
/// #[derive(Clone, Debug, PartialEq, Scrub)]
/// struct Login {
///     user: String,
///     password: String,
/// }
///
/// let scrubber = Scrubber::builder().field("password").build().unwrap();
/// let login = Login { user: "alice".into(), password: "p@ss".into() };
///
/// let redacted = scrubber.redact("login", &login);
/// assert_eq!(redacted.password, "[REDACTED]");
/// assert_eq!(login.password, "p@ss");
/// ```
pub struct Scrubber {
    pub(super) filters: Vec<Filter>,
    pub(super) allowed: HashSet<TypeId>,
    pub(super) tag_key: String,
    pub(super) message: String,
    pub(super) max_depth: usize,
}

impl Scrubber {
    /// Starts a configuration.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns a redacted, independent copy of `value`.
    ///
    /// `name` is the field name seen by censors at the root node.
    #[must_use]
    pub fn redact<T: Scrub>(&self, name: &str, value: &T) -> T {
        self.visit(Field::root(name), value, 0)
    }

    /// The tag key whose value is reported as [`Field::group`].
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// The replacement used for matched string-shaped nodes.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Depth past which nodes are truncated to their zero value.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn visit<T: Scrub>(&self, field: Field<'_>, value: &T, depth: usize) -> T {
        if depth > self.max_depth {
            tracing::trace!(depth, field = field.name(), "depth bound reached, truncating");
            return T::zero();
        }
        if self.allowed.contains(&TypeId::of::<T>()) {
            return value.clone();
        }

        let view = value.view();
        if let Some(filter) = self.matching_filter(&field, view) {
            return view
                .and_then(|view| filter.replace::<T>(view))
                .unwrap_or_else(|| self.default_redaction(value));
        }

        value.walk(&Walker {
            scrubber: self,
            field,
            depth,
        })
    }

    fn visit_opaque<T>(&self, field: Field<'_>, value: &T, depth: usize) -> T
    where
        T: Clone + Default + 'static,
    {
        if depth > self.max_depth {
            tracing::trace!(depth, field = field.name(), "depth bound reached, truncating");
            return T::default();
        }
        if self.allowed.contains(&TypeId::of::<T>()) {
            return value.clone();
        }
        // Unreadable content: only name and tag censors can match, and no
        // redactor can act on it.
        if self.matching_filter(&field, None).is_some() {
            return T::default();
        }
        value.clone()
    }

    fn matching_filter(&self, field: &Field<'_>, view: Option<View<'_>>) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|filter| filter.censor().censor(field, view))
    }

    fn default_redaction<T: Scrub>(&self, value: &T) -> T {
        if value.shape() == Shape::String {
            T::from_text(self.message.clone()).unwrap_or_else(T::zero)
        } else {
            T::zero()
        }
    }
}

impl fmt::Debug for Scrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrubber")
            .field("filters", &self.filters.len())
            .field("allowed", &self.allowed.len())
            .field("tag_key", &self.tag_key)
            .field("message", &self.message)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Traversal context for one node.
///
/// `Scrub::walk` implementations call back into the walker for each child;
/// every call visits the child one level deeper.
pub struct Walker<'a> {
    scrubber: &'a Scrubber,
    field: Field<'a>,
    depth: usize,
}

impl<'a> Walker<'a> {
    /// Depth of the node being walked. The root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Path metadata of the node being walked.
    pub fn field(&self) -> &Field<'a> {
        &self.field
    }

    /// Visits a declared field of an aggregate or enum variant.
    #[doc(hidden)]
    pub fn visit_field<T: Scrub>(&self, meta: &'static FieldMeta, value: &T) -> T {
        let field = Field::declared(meta, &self.scrubber.tag_key);
        self.scrubber.visit(field, value, self.depth + 1)
    }

    /// Visits a `#[scrub(opaque)]` field: cloned, or defaulted when a name or
    /// tag censor matches.
    #[doc(hidden)]
    pub fn visit_opaque_field<T>(&self, meta: &'static FieldMeta, value: &T) -> T
    where
        T: Clone + Default + 'static,
    {
        let field = Field::declared(meta, &self.scrubber.tag_key);
        self.scrubber.visit_opaque(field, value, self.depth + 1)
    }

    /// Visits the value held by a reference or sum type. The enclosing field
    /// passes through unchanged.
    pub fn visit_inner<T: Scrub>(&self, value: &T) -> T {
        self.scrubber.visit(self.field, value, self.depth + 1)
    }

    /// Opaque counterpart of [`Walker::visit_inner`].
    #[doc(hidden)]
    pub fn visit_opaque_inner<T>(&self, value: &T) -> T
    where
        T: Clone + Default + 'static,
    {
        self.scrubber.visit_opaque(self.field, value, self.depth + 1)
    }

    /// Visits a sequence element or map value. Elements carry no name and no
    /// tags.
    pub fn visit_element<T: Scrub>(&self, value: &T) -> T {
        self.scrubber.visit(Field::anonymous(), value, self.depth + 1)
    }
}

impl fmt::Debug for Walker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("field", &self.field)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn scrubber_is_shareable_across_threads() {
        assert_send_sync::<Scrubber>();
    }

    #[test]
    fn depth_past_the_bound_yields_zero() {
        let scrubber = Scrubber::builder().max_depth(1).build().unwrap();
        let nested = vec![vec![1_u8, 2], vec![3]];
        // Outer vec at 0, inner vecs at 1, their elements at 2.
        assert_eq!(scrubber.redact("v", &nested), vec![vec![0, 0], vec![0]]);
    }

    #[test]
    fn allowed_types_are_cloned_before_censors_run() {
        let scrubber = Scrubber::builder()
            .contains("")
            .allow::<String>()
            .build()
            .unwrap();
        assert_eq!(scrubber.redact("v", &"kept".to_string()), "kept");
    }

    #[test]
    fn unmatched_strings_and_scalars_are_copied() {
        let scrubber = Scrubber::builder().field("other").build().unwrap();
        assert_eq!(scrubber.redact("v", &"text".to_string()), "text");
        assert_eq!(scrubber.redact("v", &42_u64), 42);
    }

    #[test]
    fn default_redaction_depends_on_shape() {
        let scrubber = Scrubber::builder()
            .field("v")
            .message("gone")
            .build()
            .unwrap();
        assert_eq!(scrubber.redact("v", &"text".to_string()), "gone");
        assert_eq!(scrubber.redact("v", &-5_i32), 0);
        assert_eq!(scrubber.redact("v", &vec![1_u8]), Vec::<u8>::new());
    }
}
