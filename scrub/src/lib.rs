//! Redaction of arbitrary values before they are emitted.
//!
//! A [`Scrubber`] walks a value of any type implementing [`Scrub`], decides
//! per node whether it must be redacted, and returns an independent deep copy
//! with matched nodes replaced. The original value is never touched.
//!
//! The pieces:
//! - **Classification**: [`Scrub::shape`] tells the engine what a node is
//!   (scalar, string, reference, aggregate, sequence, map, sum type, opaque).
//! - **Access**: [`Scrub::view`] exposes the node's content to censors.
//!   `#[derive(Scrub)]` generates both, reading private fields from inside the
//!   defining module.
//! - **Censors** ([`censor`]): predicates over the field name, its tags and the
//!   value. The first matching filter wins.
//! - **Redactors** ([`redactor`]): transforms producing the replacement. Without
//!   one, strings become `"[REDACTED]"` and everything else its zero value.
//!
//! Key rules:
//! - Every declared field is visited, whatever its visibility.
//! - Recursion is bounded by depth (32 by default); deeper nodes become zero
//!   values. There is no cycle detection.
//! - Map keys are copied, never censored. Maps whose entries cannot be rebuilt
//!   become empty.
//! - Traversal never fails; only [`Builder::build`] returns errors.
//!
//! ```rust
//! use scrub::{Scrub, Scrubber};
//!
//! #[derive(Clone, Debug, PartialEq, Scrub)]
//! struct User {
//!     name: String,
//!     #[scrub(tag = "secret")]
//!     password: String,
//! }
//!
//! let scrubber = Scrubber::builder().tag("secret").build().unwrap();
//! let user = User { name: "alice".into(), password: "p@ss".into() };
//!
//! let redacted = scrubber.redact("user", &user);
//! assert_eq!(redacted.name, "alice");
//! assert_eq!(redacted.password, "[REDACTED]");
//! ```
//!
//! What this crate does not do:
//! - perform I/O or install a logger (the `slog` feature adds a value adapter)
//! - detect reference cycles

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::return_self_not_must_use
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use scrub_derive::Scrub;

#[allow(unused_extern_crates)]
extern crate self as scrub;

pub mod censor;
mod engine;
mod error;
pub mod redactor;
mod shape;
#[cfg(feature = "slog")]
pub mod slog;

pub use censor::{Censor, TagMatcher};
pub use engine::{
    Builder, Filter, Opaque, Scrub, Scrubber, Walker, DEFAULT_MAX_DEPTH, DEFAULT_TAG_KEY,
};
pub use error::ConfigError;
pub use redactor::{Redactor, Replacement};
#[doc(hidden)]
pub use engine::rebuildable_with;
#[doc(hidden)]
pub use shape::FieldMeta;
pub use shape::{Field, Shape, Tag, View, Visibility};

/// Default replacement for matched string values.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";
