//! Node metadata: what a value looks like and where it sits.
//!
//! These types carry no behavior of their own. The engine builds them while it
//! walks a value and hands them to censors and redactors:
//!
//! - [`Shape`]: the structural classification of a node.
//! - [`Field`]: the path metadata of a node (name, tags, visibility).
//! - [`View`]: a type-erased, read-only view of a node's value.
//!
//! [`FieldMeta`] and [`Tag`] are the static descriptions emitted by
//! `#[derive(Scrub)]` for every declared field.

use std::{
    any::{Any, TypeId},
    fmt,
};

use crate::engine::Scrub;

/// Structural classification of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Numbers, booleans, chars and other plain copyable values.
    Scalar,
    /// String-like values. Content censors and text redactors act on these.
    String,
    /// An owning pointer (`Box`, `Rc`, `Arc`).
    Reference,
    /// A struct with declared fields.
    Aggregate,
    /// An ordered collection visited positionally.
    Sequence,
    /// An associative collection. Keys are copied, values are visited.
    Map,
    /// A value holding at most one of several alternatives (`Option`, enums).
    SumType,
    /// A handle whose content cannot be inspected; copied, never walked.
    Opaque,
}

/// Whether a field is readable from outside its defining module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Declared `pub`.
    #[default]
    Public,
    /// Private or `pub(...)`-restricted. Still visited: the derive reads and
    /// writes such fields from inside the defining module.
    Restricted,
}

/// A single key/value annotation declared on a field with `#[scrub(tag ...)]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    key: &'static str,
    value: &'static str,
}

impl Tag {
    /// Constructs a tag.
    pub const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }

    /// The annotation key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The annotation value.
    pub fn value(&self) -> &'static str {
        self.value
    }
}

/// Static description of a declared field.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct FieldMeta {
    name: &'static str,
    tags: &'static [Tag],
    visibility: Visibility,
}

impl FieldMeta {
    pub const fn new(name: &'static str, tags: &'static [Tag], visibility: Visibility) -> Self {
        Self {
            name,
            tags,
            visibility,
        }
    }
}

/// Path metadata of the node currently being visited.
///
/// Root values carry the name passed to `redact`. Sequence elements and map
/// values carry an empty name and no tags. References and sum types pass the
/// enclosing field through to the value they hold.
#[derive(Clone, Copy, Debug)]
pub struct Field<'a> {
    name: &'a str,
    tags: &'a [Tag],
    visibility: Visibility,
    group: Option<&'a str>,
}

impl<'a> Field<'a> {
    pub(crate) fn root(name: &'a str) -> Self {
        Self {
            name,
            tags: &[],
            visibility: Visibility::Public,
            group: None,
        }
    }

    pub(crate) fn anonymous() -> Self {
        Self::root("")
    }

    pub(crate) fn declared(meta: &'a FieldMeta, tag_key: &str) -> Self {
        let group = meta
            .tags
            .iter()
            .find(|tag| tag.key == tag_key)
            .map(|tag| tag.value);
        Self {
            name: meta.name,
            tags: meta.tags,
            visibility: meta.visibility,
            group,
        }
    }

    /// The field name, or the root name, or `""` for anonymous positions.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// All tags declared on the field, in declaration order.
    pub fn tags(&self) -> &'a [Tag] {
        self.tags
    }

    /// The first tag value declared under `key`.
    pub fn tag(&self, key: &str) -> Option<&'a str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value)
    }

    /// The tag value under the engine's configured tag key.
    pub fn group(&self) -> Option<&'a str> {
        self.group
    }

    /// Declared visibility of the field.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
}

/// Read-only, type-erased view of a node's value.
///
/// Produced by [`Scrub::view`]. Content censors use [`View::as_str`]; type
/// censors use [`View::type_id`]; custom censors and redactors can recover the
/// concrete value with [`View::downcast_ref`].
#[derive(Clone, Copy)]
pub struct View<'a> {
    value: &'a dyn Any,
    type_name: &'static str,
    shape: Shape,
    text: Option<&'a str>,
}

impl<'a> View<'a> {
    /// Builds the view of a value through its `Scrub` impl.
    pub fn of<T: Scrub>(value: &'a T) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            shape: value.shape(),
            text: value.text(),
        }
    }

    /// Runtime type of the value.
    pub fn type_id(&self) -> TypeId {
        Any::type_id(self.value)
    }

    /// Name of the runtime type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Shape of the value.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// String content, for string-shaped values.
    pub fn as_str(&self) -> Option<&'a str> {
        self.text
    }

    /// Returns `true` if the value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Returns the value as a `T` if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("type_name", &self.type_name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}
