//! The traversal and cloning engine.
//!
//! - **`Scrub`** (this module): the introspection capability a type opts into,
//!   by hand or with `#[derive(Scrub)]`.
//! - **`impls`**: `Scrub` for standard library scalars, strings, pointers and
//!   collections.
//! - **`walker`**: [`Scrubber`], the engine entry point, and [`Walker`], the
//!   per-node context handed to `Scrub::walk`.
//! - **`config`**: [`Builder`] and [`Filter`], assembled once and frozen into a
//!   `Scrubber`.

mod config;
mod impls;
mod walker;

pub use config::{Builder, Filter, DEFAULT_MAX_DEPTH, DEFAULT_TAG_KEY};
pub use impls::Opaque;
pub use walker::{Scrubber, Walker};

use std::{any::TypeId, cell::RefCell};

use crate::shape::{Shape, View};

/// A type the engine can classify, inspect, zero and rebuild.
///
/// Every value passed to [`Scrubber::redact`], and every value reachable from
/// it, implements this trait. Implementations exist for the standard building
/// blocks; user types get one from `#[derive(Scrub)]`.
///
/// ## Implementing by hand
///
/// Leaf types (newtypes around strings, foreign scalars) only need `shape`,
/// `zero` and `walk`; string-like leaves also override `text` and `from_text`
/// so content censors and text redactors can act on them:
///
/// ```rust
/// use scrub::{Scrub, Shape, Walker};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct ApiKey(String);
///
/// impl Scrub for ApiKey {
///     fn shape(&self) -> Shape {
///         Shape::String
///     }
///
///     fn text(&self) -> Option<&str> {
///         Some(&self.0)
///     }
///
///     fn from_text(text: String) -> Option<Self> {
///         Some(ApiKey(text))
///     }
///
///     fn zero() -> Self {
///         ApiKey(String::new())
///     }
///
///     fn walk(&self, _walker: &Walker<'_>) -> Self {
///         self.clone()
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Scrub`",
    label = "this type cannot be walked for redaction",
    note = "use `#[derive(Scrub)]` on the type definition",
    note = "or mark the field `#[scrub(opaque)]` to copy it without inspection"
)]
pub trait Scrub: Clone + 'static {
    /// Structural classification of this value.
    fn shape(&self) -> Shape;

    /// String content, for string-shaped values.
    fn text(&self) -> Option<&str> {
        None
    }

    /// Read-only view used by censors and redactors.
    ///
    /// `None` means the content cannot be read at all. Only name and tag
    /// censors can match such a node.
    fn view(&self) -> Option<View<'_>> {
        Some(View::of(self))
    }

    /// The zero value of this type: empty strings and collections, `None`,
    /// numeric zero, and field-wise zero for aggregates.
    #[must_use]
    fn zero() -> Self;

    /// Builds a value from replacement text. Only string-shaped types return
    /// `Some`.
    fn from_text(text: String) -> Option<Self> {
        let _ = text;
        None
    }

    /// Whether a value of this type can be rebuilt as a unit with all of its
    /// content visible to the engine.
    ///
    /// Maps consult this for their key and value types and degrade to an empty
    /// map when either answer is `false`.
    fn rebuildable() -> bool {
        true
    }

    /// Returns an independent copy of `self`, visiting children through
    /// `walker`.
    #[must_use]
    fn walk(&self, walker: &Walker<'_>) -> Self;
}

thread_local! {
    static REBUILDABLE_IN_PROGRESS: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Evaluates `check` as the `rebuildable` answer of `T`.
///
/// Derived impls combine the answers of their field types, which recurses for
/// self-referential types. A type already being evaluated on this thread
/// answers `true`, leaving the decision to its other fields.
#[doc(hidden)]
pub fn rebuildable_with<T: 'static>(check: impl FnOnce() -> bool) -> bool {
    let id = TypeId::of::<T>();
    let entered = REBUILDABLE_IN_PROGRESS.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.contains(&id) {
            false
        } else {
            stack.push(id);
            true
        }
    });
    if !entered {
        return true;
    }
    let rebuildable = check();
    REBUILDABLE_IN_PROGRESS.with(|stack| {
        stack.borrow_mut().retain(|entry| *entry != id);
    });
    rebuildable
}
