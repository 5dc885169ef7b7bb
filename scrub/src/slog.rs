//! Adapters for emitting redacted values through `slog`.
//!
//! [`Scrubber::slog`] wraps a borrowed value in a `slog::Value` that redacts it
//! at serialization time, using the log key as the root field name, and emits
//! the redacted copy as structured JSON via `slog`'s nested-value support.
//!
//! Logging stays infallible: if the redacted copy cannot be converted to JSON,
//! a placeholder string is emitted instead of an error.
//!
//! ```rust
//! use scrub::{Scrub, Scrubber};
//! use serde::Serialize;
//! use slog::{info, o, Discard, Logger};
//!
//! #[derive(Clone, Serialize, Scrub)]
//! struct Login {
//!     user: String,
//!     password: String,
//! }
//!
//! let scrubber = Scrubber::builder().field("password").build().unwrap();
//! let logger = Logger::root(Discard, o!());
//! let login = Login { user: "alice".into(), password: "p@ss".into() };
//!
//! info!(logger, "login"; "login" => scrubber.slog(&login));
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{Scrub, Scrubber};

/// Placeholder emitted when a redacted value cannot be converted to JSON.
pub const SERIALIZATION_FAILED: &str = "Failed to serialize redacted value";

/// A `slog::Value` that logs the redacted form of a borrowed value.
///
/// Nothing is redacted until the record is serialized, so values filtered out
/// by the logger's level cost nothing.
pub struct Scrubbed<'a, T> {
    scrubber: &'a Scrubber,
    value: &'a T,
}

impl<T> Scrubbed<'_, T>
where
    T: Scrub + Serialize,
{
    fn to_json(&self, key: &str) -> JsonValue {
        let redacted = self.scrubber.redact(key, self.value);
        serde_json::to_value(&redacted)
            .unwrap_or_else(|_| JsonValue::String(SERIALIZATION_FAILED.to_string()))
    }
}

impl<T> SlogValue for Scrubbed<'_, T>
where
    T: Scrub + Serialize,
{
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.to_json(key));
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

impl<T> fmt::Debug for Scrubbed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrubbed").finish_non_exhaustive()
    }
}

impl Scrubber {
    /// Wraps `value` for logging with `slog`; the log key becomes the root
    /// field name.
    pub fn slog<'a, T>(&'a self, value: &'a T) -> Scrubbed<'a, T>
    where
        T: Scrub + Serialize,
    {
        Scrubbed {
            scrubber: self,
            value,
        }
    }
}
