//! Configuration errors.
//!
//! These are the only failures the crate reports. Traversal itself never
//! fails: irregular values degrade to a clone or a zero value instead.

use thiserror::Error;

/// Errors returned by `Builder::build`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `tag_key` was set to the empty string.
    #[error("tag key must not be empty")]
    EmptyTagKey,
    /// A pattern passed as a string does not compile.
    #[error("invalid regular expression `{pattern}`")]
    InvalidRegex {
        /// The rejected pattern.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },
    /// `with_redactor` was called before any filter was added.
    #[error("redactor registered before any filter")]
    DanglingRedactor,
}
