//! Redactors: transforms producing the replacement for a matched node.
//!
//! A redactor returns `None` when it does not apply to the node it is given;
//! the engine then tries the filter's next redactor and finally falls back to
//! its default (the configured message for strings, the zero value for
//! everything else).
//!
//! The text redactors here operate on Unicode scalar values and apply only to
//! string-shaped nodes.

use std::{any::Any, fmt};

use crate::{engine::Scrub, shape::View};

/// Produces the replacement for a matched node.
pub trait Redactor: Send + Sync {
    /// Returns the replacement, or `None` when this redactor does not apply.
    fn redact(&self, original: View<'_>) -> Option<Replacement>;
}

impl<F> Redactor for F
where
    F: Fn(View<'_>) -> Option<Replacement> + Send + Sync,
{
    fn redact(&self, original: View<'_>) -> Option<Replacement> {
        self(original)
    }
}

/// The output of a [`Redactor`].
///
/// A replacement only applies if it converts into the node's type: text
/// converts through `Scrub::from_text`, values by downcast. A replacement that
/// does not convert counts as "not applied".
pub enum Replacement {
    /// Replacement text for string-shaped nodes.
    Text(String),
    /// A replacement value of the node's own type.
    Value(Box<dyn Any>),
}

impl Replacement {
    /// Replacement text.
    pub fn text(text: impl Into<String>) -> Self {
        Replacement::Text(text.into())
    }

    /// Replacement value.
    pub fn value<T: Any>(value: T) -> Self {
        Replacement::Value(Box::new(value))
    }

    pub(crate) fn into_value<T: Scrub>(self) -> Option<T> {
        match self {
            Replacement::Text(text) => T::from_text(text),
            Replacement::Value(value) => value.downcast::<T>().ok().map(|value| *value),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Replacement::Value(_) => f.write_str("Value(..)"),
        }
    }
}

/// Replaces string content through a caller-supplied transform.
pub struct ReplaceText<F> {
    transform: F,
}

impl<F> Redactor for ReplaceText<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn redact(&self, original: View<'_>) -> Option<Replacement> {
        original
            .as_str()
            .map(|text| Replacement::Text((self.transform)(text)))
    }
}

impl<F> fmt::Debug for ReplaceText<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReplaceText(..)")
    }
}

/// Masks every character with a symbol, up to a fixed width.
///
/// Values longer than the width keep a visible count of the characters that
/// were cut: `"********** (remained 5 chars)"`.
#[derive(Clone, Copy, Debug)]
pub struct MaskWithSymbol {
    symbol: char,
    max: usize,
}

impl MaskWithSymbol {
    pub(crate) fn apply_to(&self, value: &str) -> String {
        let total = value.chars().count();
        if total > self.max {
            let mut masked: String = std::iter::repeat(self.symbol).take(self.max).collect();
            masked.push_str(&format!(" (remained {} chars)", total - self.max));
            masked
        } else {
            std::iter::repeat(self.symbol).take(total).collect()
        }
    }
}

impl Redactor for MaskWithSymbol {
    fn redact(&self, original: View<'_>) -> Option<Replacement> {
        original
            .as_str()
            .map(|text| Replacement::Text(self.apply_to(text)))
    }
}

/// Which side of a string a [`Partial`] redactor acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    First,
    Last,
}

/// Keeps or masks a fixed number of leading or trailing characters.
#[derive(Clone, Copy, Debug)]
pub struct Partial {
    side: Side,
    count: usize,
    keep: bool,
    mask_char: char,
}

impl Partial {
    /// Uses a specific masking character (default `*`).
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Applies the policy to a string value.
    ///
    /// Keeping more characters than the value has leaves it unchanged; masking
    /// more characters than the value has masks all of it.
    pub(crate) fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        let count = self.count.min(total);
        let span = match (self.side, self.keep) {
            (Side::First, true) => count..total,
            (Side::Last, true) => 0..(total - count),
            (Side::First, false) => 0..count,
            (Side::Last, false) => (total - count)..total,
        };
        for ch in &mut chars[span] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

impl Redactor for Partial {
    fn redact(&self, original: View<'_>) -> Option<Replacement> {
        original
            .as_str()
            .map(|text| Replacement::Text(self.apply_to(text)))
    }
}

/// Replaces string content with `transform(content)`.
pub fn replace<F>(transform: F) -> ReplaceText<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    ReplaceText { transform }
}

/// Replaces string content with a fixed text.
pub fn fixed(text: impl Into<String>) -> ReplaceText<impl Fn(&str) -> String + Send + Sync> {
    let text = text.into();
    replace(move |_: &str| text.clone())
}

/// Masks string content with `symbol`, at most `max` symbols wide.
pub fn mask(symbol: char, max: usize) -> MaskWithSymbol {
    MaskWithSymbol { symbol, max }
}

/// Keeps the first `count` characters visible and masks the rest.
pub fn keep_first(count: usize) -> Partial {
    Partial {
        side: Side::First,
        count,
        keep: true,
        mask_char: '*',
    }
}

/// Keeps the last `count` characters visible and masks the rest.
pub fn keep_last(count: usize) -> Partial {
    Partial {
        side: Side::Last,
        count,
        keep: true,
        mask_char: '*',
    }
}

/// Masks the first `count` characters and keeps the rest.
pub fn mask_first(count: usize) -> Partial {
    Partial {
        side: Side::First,
        count,
        keep: false,
        mask_char: '*',
    }
}

/// Masks the last `count` characters and keeps the rest.
pub fn mask_last(count: usize) -> Partial {
    Partial {
        side: Side::Last,
        count,
        keep: false,
        mask_char: '*',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(replacement: Option<Replacement>) -> String {
        match replacement {
            Some(Replacement::Text(text)) => text,
            other => panic!("expected text replacement, got {other:?}"),
        }
    }

    #[test]
    fn mask_keeps_short_values_fixed_width() {
        let mask = mask('*', 8);
        assert_eq!(mask.apply_to("p@ss"), "****");
        assert_eq!(mask.apply_to(""), "");
        assert_eq!(mask.apply_to("12345678"), "********");
    }

    #[test]
    fn mask_reports_remaining_characters() {
        let mask = mask('#', 4);
        assert_eq!(mask.apply_to("abcdefghij"), "#### (remained 6 chars)");
    }

    #[test]
    fn mask_counts_unicode_scalars() {
        assert_eq!(mask('*', 2).apply_to("秘密数据"), "** (remained 2 chars)");
    }

    #[test]
    fn keep_and_mask_policies() {
        assert_eq!(keep_first(2).apply_to("abcdef"), "ab****");
        assert_eq!(keep_last(4).apply_to("acct_123456"), "*******3456");
        assert_eq!(mask_first(2).apply_to("abcdef"), "**cdef");
        assert_eq!(mask_last(3).apply_to("abcdef"), "abc***");
        assert_eq!(keep_first(2).with_mask_char('#').apply_to("abcdef"), "ab####");
    }

    #[test]
    fn keep_and_mask_policies_saturate() {
        assert_eq!(keep_last(4).apply_to("abc"), "abc");
        assert_eq!(mask_first(10).apply_to("abc"), "***");
        assert_eq!(keep_first(3).apply_to(""), "");
    }

    #[test]
    fn text_redactors_skip_non_string_values() {
        let number = 42_i64;
        assert!(mask('*', 4).redact(View::of(&number)).is_none());
        assert!(keep_last(2).redact(View::of(&number)).is_none());
        assert!(fixed("x").redact(View::of(&number)).is_none());
    }

    #[test]
    fn replace_uses_the_transform() {
        let upper = replace(|text: &str| text.to_uppercase());
        let value = "secret".to_string();
        assert_eq!(text_of(upper.redact(View::of(&value))), "SECRET");
        assert_eq!(text_of(fixed("<gone>").redact(View::of(&value))), "<gone>");
    }

    #[test]
    fn replacement_converts_only_into_matching_types() {
        assert_eq!(
            Replacement::text("x").into_value::<String>(),
            Some("x".to_string())
        );
        assert_eq!(Replacement::text("x").into_value::<u32>(), None);
        assert_eq!(Replacement::value(7_u32).into_value::<u32>(), Some(7));
        assert_eq!(Replacement::value(7_u32).into_value::<u64>(), None);
    }
}
