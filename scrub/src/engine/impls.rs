//! `Scrub` implementations for standard library types.
//!
//! | Shape | Types |
//! |-------|-------|
//! | Scalar | integers, floats, `bool`, `char`, `()`, `Duration`, `PhantomData` |
//! | String | `String`, `Cow<'static, str>` |
//! | Reference | `Box<T>`, `Rc<T>`, `Arc<T>` |
//! | SumType | `Option<T>`, `Result<T, E>` |
//! | Sequence | `Vec<T>`, `VecDeque<T>`, `[T; N]`, tuples, `HashSet<T>`, `BTreeSet<T>` |
//! | Map | `HashMap<K, V>`, `BTreeMap<K, V>` |
//! | Opaque | [`Opaque<T>`] |
//!
//! Map keys are cloned and never censored. A map whose key or value type is
//! not rebuildable is replaced by an empty map.
//!
//! Sets are sequences without positions: they are rebuilt by inserting the
//! redacted elements, so elements that redact to the same value merge and the
//! copy can be shorter than the input. Every other sequence keeps its length.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    rc::Rc,
    sync::Arc,
    time::Duration,
};

use super::{Scrub, Walker};
use crate::shape::{Shape, View};

// =============================================================================
// Scalars and strings
// =============================================================================

macro_rules! impl_scrub_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scrub for $ty {
                fn shape(&self) -> Shape {
                    Shape::Scalar
                }

                fn zero() -> Self {
                    <$ty as Default>::default()
                }

                fn walk(&self, _walker: &Walker<'_>) -> Self {
                    *self
                }
            }
        )*
    };
}

impl_scrub_scalar!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, (),
    Duration,
);

impl<T: ?Sized + 'static> Scrub for PhantomData<T> {
    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    fn zero() -> Self {
        PhantomData
    }

    fn walk(&self, _walker: &Walker<'_>) -> Self {
        PhantomData
    }
}

impl Scrub for String {
    fn shape(&self) -> Shape {
        Shape::String
    }

    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }

    fn zero() -> Self {
        String::new()
    }

    fn from_text(text: String) -> Option<Self> {
        Some(text)
    }

    fn walk(&self, _walker: &Walker<'_>) -> Self {
        self.clone()
    }
}

impl Scrub for Cow<'static, str> {
    fn shape(&self) -> Shape {
        Shape::String
    }

    fn text(&self) -> Option<&str> {
        Some(self.as_ref())
    }

    fn zero() -> Self {
        Cow::Borrowed("")
    }

    fn from_text(text: String) -> Option<Self> {
        Some(Cow::Owned(text))
    }

    fn walk(&self, _walker: &Walker<'_>) -> Self {
        self.clone()
    }
}

// =============================================================================
// References
// =============================================================================

macro_rules! impl_scrub_reference {
    ($($ptr:ident),*) => {
        $(
            impl<T: Scrub> Scrub for $ptr<T> {
                fn shape(&self) -> Shape {
                    Shape::Reference
                }

                fn zero() -> Self {
                    $ptr::new(T::zero())
                }

                fn rebuildable() -> bool {
                    T::rebuildable()
                }

                fn walk(&self, walker: &Walker<'_>) -> Self {
                    $ptr::new(walker.visit_inner(&**self))
                }
            }
        )*
    };
}

impl_scrub_reference!(Box, Rc, Arc);

// =============================================================================
// Sum types
// =============================================================================

impl<T: Scrub> Scrub for Option<T> {
    fn shape(&self) -> Shape {
        Shape::SumType
    }

    fn zero() -> Self {
        None
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        self.as_ref().map(|value| walker.visit_inner(value))
    }
}

/// The zero value of a `Result` is `Ok` holding the zero value of `T`.
impl<T: Scrub, E: Scrub> Scrub for Result<T, E> {
    fn shape(&self) -> Shape {
        Shape::SumType
    }

    fn zero() -> Self {
        Ok(T::zero())
    }

    fn rebuildable() -> bool {
        T::rebuildable() && E::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        match self {
            Ok(value) => Ok(walker.visit_inner(value)),
            Err(err) => Err(walker.visit_inner(err)),
        }
    }
}

// =============================================================================
// Sequences
// =============================================================================

impl<T: Scrub> Scrub for Vec<T> {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn zero() -> Self {
        Vec::new()
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        self.iter().map(|value| walker.visit_element(value)).collect()
    }
}

impl<T: Scrub> Scrub for VecDeque<T> {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn zero() -> Self {
        VecDeque::new()
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        self.iter().map(|value| walker.visit_element(value)).collect()
    }
}

impl<T: Scrub, const N: usize> Scrub for [T; N] {
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        std::array::from_fn(|index| walker.visit_element(&self[index]))
    }
}

macro_rules! impl_scrub_tuple {
    ($(($($name:ident . $index:tt),+)),* $(,)?) => {
        $(
            impl<$($name: Scrub),+> Scrub for ($($name,)+) {
                fn shape(&self) -> Shape {
                    Shape::Sequence
                }

                fn zero() -> Self {
                    ($($name::zero(),)+)
                }

                fn rebuildable() -> bool {
                    true $(&& $name::rebuildable())+
                }

                fn walk(&self, walker: &Walker<'_>) -> Self {
                    ($(walker.visit_element(&self.$index),)+)
                }
            }
        )*
    };
}

impl_scrub_tuple!(
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
);

impl<T, S> Scrub for HashSet<T, S>
where
    T: Scrub + Hash + Eq,
    S: BuildHasher + Clone + Default + 'static,
{
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn zero() -> Self {
        HashSet::with_hasher(S::default())
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        let mut result = HashSet::with_capacity_and_hasher(self.len(), self.hasher().clone());
        result.extend(self.iter().map(|value| walker.visit_element(value)));
        result
    }
}

impl<T> Scrub for BTreeSet<T>
where
    T: Scrub + Ord,
{
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn zero() -> Self {
        BTreeSet::new()
    }

    fn rebuildable() -> bool {
        T::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        self.iter().map(|value| walker.visit_element(value)).collect()
    }
}

// =============================================================================
// Maps
// =============================================================================

fn entries_rebuildable<K: Scrub, V: Scrub>(walker: &Walker<'_>) -> bool {
    let rebuildable = K::rebuildable() && V::rebuildable();
    if !rebuildable {
        tracing::trace!(
            depth = walker.depth(),
            field = walker.field().name(),
            key = std::any::type_name::<K>(),
            value = std::any::type_name::<V>(),
            "map entries cannot be rebuilt, replacing with an empty map"
        );
    }
    rebuildable
}

impl<K, V, S> Scrub for HashMap<K, V, S>
where
    K: Scrub + Hash + Eq,
    V: Scrub,
    S: BuildHasher + Clone + Default + 'static,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn zero() -> Self {
        HashMap::with_hasher(S::default())
    }

    fn rebuildable() -> bool {
        K::rebuildable() && V::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        if !entries_rebuildable::<K, V>(walker) {
            return Self::zero();
        }
        let mut result = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        result.extend(
            self.iter()
                .map(|(key, value)| (key.clone(), walker.visit_element(value))),
        );
        result
    }
}

impl<K, V> Scrub for BTreeMap<K, V>
where
    K: Scrub + Ord,
    V: Scrub,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn zero() -> Self {
        BTreeMap::new()
    }

    fn rebuildable() -> bool {
        K::rebuildable() && V::rebuildable()
    }

    fn walk(&self, walker: &Walker<'_>) -> Self {
        if !entries_rebuildable::<K, V>(walker) {
            return Self::zero();
        }
        self.iter()
            .map(|(key, value)| (key.clone(), walker.visit_element(value)))
            .collect()
    }
}

// =============================================================================
// Opaque handles
// =============================================================================

/// A handle the engine copies without looking inside.
///
/// Use it for callbacks, channel senders, connection pools and similar values
/// that have no meaningful content to redact. The handle is cloned as is; its
/// zero value is the empty handle. Censors see no value for it, so only name
/// and tag censors can match, and a match empties the handle.
///
/// Maps never hold opaque values through a redaction: a map whose values are
/// opaque is replaced by an empty map.
pub struct Opaque<T>(Option<T>);

impl<T> Opaque<T> {
    /// Wraps a handle.
    pub fn new(handle: T) -> Self {
        Opaque(Some(handle))
    }

    /// The empty handle.
    pub fn empty() -> Self {
        Opaque(None)
    }

    /// The wrapped handle, if any.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Returns `true` if no handle is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Unwraps the handle.
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T: Clone> Clone for Opaque<T> {
    fn clone(&self) -> Self {
        Opaque(self.0.clone())
    }
}

impl<T> Default for Opaque<T> {
    fn default() -> Self {
        Opaque::empty()
    }
}

impl<T> fmt::Debug for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            f.write_str("Opaque(..)")
        } else {
            f.write_str("Opaque(empty)")
        }
    }
}

impl<T: Clone + 'static> Scrub for Opaque<T> {
    fn shape(&self) -> Shape {
        Shape::Opaque
    }

    fn view(&self) -> Option<View<'_>> {
        None
    }

    fn zero() -> Self {
        Opaque::empty()
    }

    fn rebuildable() -> bool {
        false
    }

    fn walk(&self, _walker: &Walker<'_>) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        borrow::Cow,
        collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
        rc::Rc,
        sync::Arc,
    };

    use super::Opaque;
    use crate::{Scrub, Scrubber, Shape};

    fn secret_scrubber() -> Scrubber {
        Scrubber::builder().contains("secret").build().unwrap()
    }

    #[test]
    fn shapes_are_classified() {
        assert_eq!(1_u8.shape(), Shape::Scalar);
        assert_eq!('x'.shape(), Shape::Scalar);
        assert_eq!(String::new().shape(), Shape::String);
        assert_eq!(Cow::<'static, str>::Borrowed("x").shape(), Shape::String);
        assert_eq!(Box::new(1_u8).shape(), Shape::Reference);
        assert_eq!(Some(1_u8).shape(), Shape::SumType);
        assert_eq!(vec![1_u8].shape(), Shape::Sequence);
        assert_eq!((1_u8, 2_u8).shape(), Shape::Sequence);
        assert_eq!(HashMap::<String, u8>::new().shape(), Shape::Map);
        assert_eq!(Opaque::new(1_u8).shape(), Shape::Opaque);
    }

    #[test]
    fn zero_values() {
        assert_eq!(<i64 as Scrub>::zero(), 0);
        assert_eq!(<String as Scrub>::zero(), "");
        assert_eq!(<Option<String> as Scrub>::zero(), None);
        assert_eq!(*<Box<u32> as Scrub>::zero(), 0);
        assert_eq!(<[u8; 3] as Scrub>::zero(), [0, 0, 0]);
        assert_eq!(<(u8, String) as Scrub>::zero(), (0, String::new()));
        assert_eq!(<Result<u8, String> as Scrub>::zero(), Ok(0));
        assert!(<Opaque<u8> as Scrub>::zero().is_empty());
    }

    #[test]
    fn pointers_rebuild_around_redacted_pointee() {
        let scrubber = secret_scrubber();
        let boxed = Box::new("secret".to_string());
        let rc = Rc::new("secret".to_string());
        let arc = Arc::new("public".to_string());

        assert_eq!(*scrubber.redact("v", &boxed), "[REDACTED]");
        assert_eq!(*scrubber.redact("v", &rc), "[REDACTED]");
        let copy = scrubber.redact("v", &arc);
        assert_eq!(*copy, "public");
        assert!(!Arc::ptr_eq(&copy, &arc));
    }

    #[test]
    fn sum_types_visit_held_value() {
        let scrubber = secret_scrubber();
        assert_eq!(
            scrubber.redact("v", &Some("secret".to_string())),
            Some("[REDACTED]".to_string())
        );
        assert_eq!(scrubber.redact("v", &None::<String>), None);

        let err: Result<u8, String> = Err("secret".to_string());
        assert_eq!(scrubber.redact("v", &err), Err("[REDACTED]".to_string()));
    }

    #[test]
    fn sequences_visit_every_element() {
        let scrubber = secret_scrubber();
        let values = vec!["secret".to_string(), "public".to_string()];
        assert_eq!(scrubber.redact("v", &values), vec!["[REDACTED]", "public"]);

        let deque: VecDeque<String> = values.iter().cloned().collect();
        let redacted = scrubber.redact("v", &deque);
        assert_eq!(redacted.front().map(String::as_str), Some("[REDACTED]"));

        let array = ["secret".to_string(), "x".to_string()];
        assert_eq!(scrubber.redact("v", &array), ["[REDACTED]", "x"]);

        let tuple = (1_u8, "secret".to_string());
        assert_eq!(scrubber.redact("v", &tuple), (1, "[REDACTED]".to_string()));
    }

    #[test]
    fn sets_rebuild_from_redacted_elements() {
        let scrubber = secret_scrubber();
        let set: HashSet<String> = ["secret-a".to_string(), "public".to_string()].into();
        let redacted = scrubber.redact("v", &set);
        assert!(redacted.contains("[REDACTED]"));
        assert!(redacted.contains("public"));

        // Elements that redact to the same value merge; the set shrinks.
        let set: BTreeSet<String> = ["secret-a".to_string(), "secret-b".to_string()].into();
        let redacted = scrubber.redact("v", &set);
        assert_eq!(redacted.len(), 1);
    }

    #[test]
    fn map_keys_are_copied_and_values_visited() {
        let scrubber = secret_scrubber();
        let mut map = BTreeMap::new();
        map.insert("secret-key".to_string(), "secret-value".to_string());
        map.insert("other".to_string(), "plain".to_string());

        let redacted = scrubber.redact("v", &map);
        assert_eq!(redacted["secret-key"], "[REDACTED]");
        assert_eq!(redacted["other"], "plain");
    }

    #[test]
    fn maps_of_opaque_values_become_empty() {
        let scrubber = secret_scrubber();
        let mut map = HashMap::new();
        map.insert("handle".to_string(), Opaque::new(7_u32));
        let redacted = scrubber.redact("v", &map);
        assert!(redacted.is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn opaque_handles_are_copied_not_inspected() {
        let scrubber = Scrubber::builder().type_of::<u32>().build().unwrap();
        let handle = Opaque::new(7_u32);
        let copy = scrubber.redact("handle", &handle);
        assert_eq!(copy.get(), Some(&7));

        let scrubber = Scrubber::builder().field("handle").build().unwrap();
        assert!(scrubber.redact("handle", &handle).is_empty());
    }
}
