//! Rule-driven sanitizing of nested data.
//!
//! Given a value tree and a set of path rules, this crate produces a new tree
//! where selected fields are masked, redacted, replaced with generated
//! substitutes, or kept. Typical uses are cleaning payloads before logging,
//! snapshotting, or returning them from an API.
//!
//! This crate separates:
//! - **Paths**: how positions in a tree are written and matched
//!   (`user.email`, `items[0]`, `*.token`, `audit.**`).
//! - **Rules**: which [`Mode`] applies where, with the most specific
//!   matching pattern winning.
//! - **Generators**: how substitutes are produced for the `generate` mode.
//!
//! Key rules:
//! - An exact path rule always beats any wildcard rule.
//! - A bare key such as `"password"` matches that key at any depth, unless
//!   `with_key_match_any_level(false)` restricts it to the root.
//! - `redact` replaces whole containers; `mask` only ever touches primitives.
//! - `user` redacts the `user` container as one value; `user.**` redacts each
//!   entry under it.
//!
//! What this crate does:
//! - walks [`Node`] trees, including shared and cyclic ones
//! - converts to and from `serde_json` (feature `json`, on by default)
//! - provides a `slog` integration behind the `slog` feature
//!
//! What it does not do:
//! - stream: the whole output tree is materialized
//! - validate schemas
//! - guarantee that nothing leaks; it applies the declared rules, no more

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
    clippy::len_without_is_empty,
    clippy::return_self_not_must_use
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod error;
mod generate;
#[cfg(feature = "json")]
mod json;
mod node;
mod options;
pub mod path;
mod rules;
#[cfg(feature = "slog")]
pub mod slog;
mod transform;
mod walk;

// Re-exports
pub use error::SanitizeError;
pub use generate::{FieldGenerators, Generator, TypeGenerators};
#[cfg(feature = "json")]
pub use json::{sanitize_json, RuleConfig};
pub use node::{Array, Node, Number, Object, ValueKind};
pub use options::SanitizeOptions;
pub use path::{parse_path, Pattern, Token};
pub use rules::{Mode, RuleSet};
pub use transform::{
    MaskConfig, DEFAULT_MASK_MAX_LENGTH, MASK_CHAR, RANDOM_PLACEHOLDER, REDACTED_PLACEHOLDER,
};
pub use walk::sanitize;
