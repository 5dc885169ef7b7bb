//! Censors: predicates deciding whether a node must be redacted.
//!
//! A censor sees the node's path metadata and, when the content is readable,
//! a [`View`] of its value. Content-based censors treat a missing view as "no
//! match". Censors never fail.

use std::{any::TypeId, fmt};

use regex::Regex;

use crate::shape::{Field, View};

/// Decides whether a node must be redacted.
///
/// Implemented for closures, so ad-hoc rules need no new type:
///
/// ```rust
/// use scrub::{Field, Scrubber, View};
///
/// let scrubber = Scrubber::builder()
///     .censor(|field: &Field<'_>, _value: Option<View<'_>>| field.name().ends_with("_key"))
///     .build()
///     .unwrap();
/// assert_eq!(scrubber.redact("api_key", &"abc".to_string()), "[REDACTED]");
/// ```
pub trait Censor: Send + Sync {
    /// Returns `true` when the node must be redacted.
    fn censor(&self, field: &Field<'_>, value: Option<View<'_>>) -> bool;
}

impl<F> Censor for F
where
    F: Fn(&Field<'_>, Option<View<'_>>) -> bool + Send + Sync,
{
    fn censor(&self, field: &Field<'_>, value: Option<View<'_>>) -> bool {
        self(field, value)
    }
}

/// Matches values whose runtime type is exactly one type.
#[derive(Clone, Copy, Debug)]
pub struct TypeCensor {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeCensor {
    /// Name of the matched type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Censor for TypeCensor {
    fn censor(&self, _field: &Field<'_>, value: Option<View<'_>>) -> bool {
        value.is_some_and(|view| view.type_id() == self.type_id)
    }
}

/// Matches string values containing a substring.
#[derive(Clone, Debug)]
pub struct ContainsCensor {
    needle: String,
}

impl Censor for ContainsCensor {
    fn censor(&self, _field: &Field<'_>, value: Option<View<'_>>) -> bool {
        value
            .and_then(|view| view.as_str())
            .is_some_and(|text| text.contains(self.needle.as_str()))
    }
}

/// Matches string values against a regular expression.
#[derive(Clone, Debug)]
pub struct RegexCensor {
    regex: Regex,
}

impl Censor for RegexCensor {
    fn censor(&self, _field: &Field<'_>, value: Option<View<'_>>) -> bool {
        value
            .and_then(|view| view.as_str())
            .is_some_and(|text| self.regex.is_match(text))
    }
}

/// How a [`TagCensor`] compares a tag value.
pub enum TagMatcher {
    /// The tag value equals the string.
    Exact(String),
    /// The tag value contains the string.
    Contains(String),
    /// The regex matches the tag value.
    Regex(Regex),
    /// The predicate accepts the tag value.
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl TagMatcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            TagMatcher::Exact(expected) => value == expected,
            TagMatcher::Contains(needle) => value.contains(needle.as_str()),
            TagMatcher::Regex(regex) => regex.is_match(value),
            TagMatcher::Predicate(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for TagMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagMatcher::Exact(value) => f.debug_tuple("Exact").field(value).finish(),
            TagMatcher::Contains(value) => f.debug_tuple("Contains").field(value).finish(),
            TagMatcher::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            TagMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Matches fields by one of their tags.
///
/// Without an explicit key the censor reads the field's group, i.e. the tag
/// under the engine's configured tag key.
#[derive(Debug)]
pub struct TagCensor {
    key: Option<String>,
    matcher: TagMatcher,
}

impl TagCensor {
    /// Compares the tag under the engine's tag key.
    pub fn group(matcher: TagMatcher) -> Self {
        Self { key: None, matcher }
    }

    /// Compares the tag under `key`.
    pub fn keyed(key: impl Into<String>, matcher: TagMatcher) -> Self {
        Self {
            key: Some(key.into()),
            matcher,
        }
    }
}

impl Censor for TagCensor {
    fn censor(&self, field: &Field<'_>, _value: Option<View<'_>>) -> bool {
        let tag = match &self.key {
            Some(key) => field.tag(key),
            None => field.group(),
        };
        tag.is_some_and(|tag| self.matcher.matches(tag))
    }
}

/// Matches fields by exact name.
#[derive(Clone, Debug)]
pub struct FieldNameCensor {
    name: String,
}

impl Censor for FieldNameCensor {
    fn censor(&self, field: &Field<'_>, _value: Option<View<'_>>) -> bool {
        field.name() == self.name
    }
}

/// Matches fields whose name starts with a prefix.
#[derive(Clone, Debug)]
pub struct FieldPrefixCensor {
    prefix: String,
}

impl Censor for FieldPrefixCensor {
    fn censor(&self, field: &Field<'_>, _value: Option<View<'_>>) -> bool {
        field.name().starts_with(self.prefix.as_str())
    }
}

/// Matches values of type `T`.
pub fn type_of<T: 'static>() -> TypeCensor {
    TypeCensor {
        type_id: TypeId::of::<T>(),
        type_name: std::any::type_name::<T>(),
    }
}

/// Matches string values containing `needle`.
pub fn contains(needle: impl Into<String>) -> ContainsCensor {
    ContainsCensor {
        needle: needle.into(),
    }
}

/// Matches string values the regex matches.
pub fn regex(regex: Regex) -> RegexCensor {
    RegexCensor { regex }
}

/// Matches fields whose group tag equals `value`.
pub fn tag(value: impl Into<String>) -> TagCensor {
    TagCensor::group(TagMatcher::Exact(value.into()))
}

/// Matches fields whose tag under `key` equals `value`.
pub fn tag_key(key: impl Into<String>, value: impl Into<String>) -> TagCensor {
    TagCensor::keyed(key, TagMatcher::Exact(value.into()))
}

/// Matches fields named exactly `name`.
pub fn field_name(name: impl Into<String>) -> FieldNameCensor {
    FieldNameCensor { name: name.into() }
}

/// Matches fields whose name starts with `prefix`.
pub fn field_prefix(prefix: impl Into<String>) -> FieldPrefixCensor {
    FieldPrefixCensor {
        prefix: prefix.into(),
    }
}
