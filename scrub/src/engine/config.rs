//! Engine configuration.
//!
//! A [`Builder`] collects filters and settings in call order and validates them
//! once in [`Builder::build`]. The resulting [`Scrubber`] is immutable.

use std::{
    any::{type_name, TypeId},
    collections::HashSet,
    fmt,
};

use regex::Regex;

use super::{Scrub, Scrubber};
use crate::{
    censor::{self, Censor, TagMatcher},
    error::ConfigError,
    redactor::Redactor,
    shape::View,
    REDACTED_PLACEHOLDER,
};

/// Default tag key whose value is reported as `Field::group`.
pub const DEFAULT_TAG_KEY: &str = "scrub";

/// Default depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// A censor paired with the redactors that produce its replacement.
///
/// Redactors run in order and the first one that applies wins. When none
/// applies, the engine's default redaction runs.
pub struct Filter {
    censor: Box<dyn Censor>,
    redactors: Vec<Box<dyn Redactor>>,
}

impl Filter {
    /// A filter with no redactors of its own.
    pub fn new<C>(censor: C) -> Self
    where
        C: Censor + 'static,
    {
        Self {
            censor: Box::new(censor),
            redactors: Vec::new(),
        }
    }

    /// Appends a redactor.
    #[must_use]
    pub fn with_redactor<R>(mut self, redactor: R) -> Self
    where
        R: Redactor + 'static,
    {
        self.redactors.push(Box::new(redactor));
        self
    }

    pub(crate) fn censor(&self) -> &dyn Censor {
        self.censor.as_ref()
    }

    /// First replacement that converts into `T`.
    pub(crate) fn replace<T: Scrub>(&self, original: View<'_>) -> Option<T> {
        self.redactors.iter().find_map(|redactor| {
            redactor
                .redact(original)
                .and_then(|replacement| replacement.into_value::<T>())
        })
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("redactors", &self.redactors.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Scrubber`].
///
/// Filter methods append in call order, which is also evaluation order.
/// Invalid regexes and misplaced redactors are recorded as they happen; the
/// tag key is checked once its last value is known. [`Builder::build`] reports
/// the first problem.
///
/// ```rust
/// use scrub::{redactor, Scrubber};
///
/// let scrubber = Scrubber::builder()
///     .field("password")
///     .contains("token=")
///     .with_redactor(redactor::mask('*', 8))
///     .tag("secret")
///     .message("<hidden>")
///     .build()
///     .unwrap();
/// assert_eq!(scrubber.message(), "<hidden>");
/// ```
pub struct Builder {
    filters: Vec<Filter>,
    allowed: HashSet<TypeId>,
    allowed_names: Vec<&'static str>,
    tag_key: String,
    message: String,
    max_depth: usize,
    error: Option<ConfigError>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            filters: Vec::new(),
            allowed: HashSet::new(),
            allowed_names: Vec::new(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
            message: REDACTED_PLACEHOLDER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            error: None,
        }
    }

    fn record(&mut self, error: ConfigError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Appends a prepared filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends a filter around any censor, including closures.
    #[must_use]
    pub fn censor<C>(self, censor: C) -> Self
    where
        C: Censor + 'static,
    {
        self.filter(Filter::new(censor))
    }

    /// Attaches a redactor to the most recently added filter.
    #[must_use]
    pub fn with_redactor<R>(mut self, redactor: R) -> Self
    where
        R: Redactor + 'static,
    {
        match self.filters.pop() {
            Some(filter) => self.filters.push(filter.with_redactor(redactor)),
            None => self.record(ConfigError::DanglingRedactor),
        }
        self
    }

    /// Redacts every value whose runtime type is `T`.
    #[must_use]
    pub fn type_of<T: 'static>(self) -> Self {
        self.censor(censor::type_of::<T>())
    }

    /// Redacts string values containing `needle`.
    #[must_use]
    pub fn contains(self, needle: impl Into<String>) -> Self {
        self.censor(censor::contains(needle))
    }

    /// Redacts string values matching `pattern`.
    #[must_use]
    pub fn regex(mut self, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => self.regex_with(regex),
            Err(source) => {
                self.record(ConfigError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                });
                self
            }
        }
    }

    /// Redacts string values matching a compiled regex.
    #[must_use]
    pub fn regex_with(self, regex: Regex) -> Self {
        self.censor(censor::regex(regex))
    }

    /// Redacts fields whose group tag (the tag under the configured tag key)
    /// equals `value`.
    #[must_use]
    pub fn tag(self, value: impl Into<String>) -> Self {
        self.censor(censor::tag(value))
    }

    /// Redacts fields whose tag under `key` equals `value`.
    #[must_use]
    pub fn tag_with_key(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.censor(censor::tag_key(key, value))
    }

    /// Redacts fields whose group tag contains `needle`.
    #[must_use]
    pub fn tag_contains(self, needle: impl Into<String>) -> Self {
        self.censor(censor::TagCensor::group(TagMatcher::Contains(needle.into())))
    }

    /// Redacts fields whose group tag matches `pattern`.
    #[must_use]
    pub fn tag_regex(mut self, pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => self.censor(censor::TagCensor::group(TagMatcher::Regex(regex))),
            Err(source) => {
                self.record(ConfigError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                });
                self
            }
        }
    }

    /// Redacts fields whose group tag satisfies `predicate`.
    #[must_use]
    pub fn tag_matching<F>(self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.censor(censor::TagCensor::group(TagMatcher::Predicate(Box::new(
            predicate,
        ))))
    }

    /// Redacts fields named exactly `name`.
    #[must_use]
    pub fn field(self, name: impl Into<String>) -> Self {
        self.censor(censor::field_name(name))
    }

    /// Redacts fields whose name starts with `prefix`.
    #[must_use]
    pub fn field_prefix(self, prefix: impl Into<String>) -> Self {
        self.censor(censor::field_prefix(prefix))
    }

    /// Exempts `T` from redaction and traversal: values of this type are
    /// cloned as they are.
    #[must_use]
    pub fn allow<T: 'static>(mut self) -> Self {
        if self.allowed.insert(TypeId::of::<T>()) {
            self.allowed_names.push(type_name::<T>());
        }
        self
    }

    /// Sets the tag key reported as `Field::group`. The final key must not be
    /// empty.
    #[must_use]
    pub fn tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Sets the replacement for matched string values without a redactor.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the depth past which nodes are truncated to their zero value.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validates the configuration and freezes it into an engine.
    pub fn build(self) -> Result<Scrubber, ConfigError> {
        if self.tag_key.is_empty() {
            return Err(ConfigError::EmptyTagKey);
        }
        if let Some(error) = self.error {
            return Err(error);
        }

        tracing::debug!(
            filters = self.filters.len(),
            allowed = ?self.allowed_names,
            tag_key = %self.tag_key,
            max_depth = self.max_depth,
            "scrubber configured"
        );

        Ok(Scrubber {
            filters: self.filters,
            allowed: self.allowed,
            tag_key: self.tag_key,
            message: self.message,
            max_depth: self.max_depth,
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("filters", &self.filters.len())
            .field("allowed", &self.allowed_names)
            .field("tag_key", &self.tag_key)
            .field("message", &self.message)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let scrubber = Scrubber::builder().build().unwrap();
        assert_eq!(scrubber.tag_key(), DEFAULT_TAG_KEY);
        assert_eq!(scrubber.message(), REDACTED_PLACEHOLDER);
        assert_eq!(scrubber.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn empty_tag_key_is_rejected() {
        let result = Scrubber::builder().tag_key("").build();
        assert!(matches!(result, Err(ConfigError::EmptyTagKey)));
    }

    #[test]
    fn invalid_regex_is_rejected_with_pattern() {
        let result = Scrubber::builder().regex("(unclosed").build();
        match result {
            Err(ConfigError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected InvalidRegex, got {other:?}"),
        }

        let result = Scrubber::builder().tag_regex("[").build();
        assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    }

    #[test]
    fn redactor_without_filter_is_rejected() {
        let result = Scrubber::builder()
            .with_redactor(crate::redactor::fixed("x"))
            .field("password")
            .build();
        assert!(matches!(result, Err(ConfigError::DanglingRedactor)));
    }

    #[test]
    fn tag_key_is_checked_after_the_last_call() {
        let scrubber = Scrubber::builder()
            .tag_key("")
            .tag_key("class")
            .build()
            .unwrap();
        assert_eq!(scrubber.tag_key(), "class");

        let result = Scrubber::builder().tag_key("class").tag_key("").build();
        assert!(matches!(result, Err(ConfigError::EmptyTagKey)));
    }

    #[test]
    fn first_error_wins() {
        let result = Scrubber::builder().regex("(").tag_regex("[").build();
        match result {
            Err(ConfigError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "("),
            other => panic!("expected InvalidRegex, got {other:?}"),
        }
    }

    #[test]
    fn filters_keep_registration_order() {
        let builder = Scrubber::builder()
            .field("a")
            .with_redactor(crate::redactor::fixed("first"))
            .field("b");
        assert_eq!(builder.filters.len(), 2);
        assert_eq!(builder.filters[0].redactors.len(), 1);
        assert!(builder.filters[1].redactors.is_empty());
    }

    #[test]
    fn allow_list_deduplicates() {
        let builder = Scrubber::builder().allow::<String>().allow::<String>();
        assert_eq!(builder.allowed.len(), 1);
        assert_eq!(builder.allowed_names, vec![type_name::<String>()]);
    }
}
