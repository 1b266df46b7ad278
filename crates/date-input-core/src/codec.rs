//! Date value capability.
//!
//! The reconciliation core never inspects date values directly. Everything it needs from the
//! date/time type (strict parsing, formatting and semantic equality) is reached through the
//! [`DateCodec`] trait, so a host can plug in its own calendar type. The crate ships
//! [`DateFormat`](crate::DateFormat), a chrono-backed codec over [`chrono::NaiveDateTime`].

use std::fmt;

/// Parsing, formatting and comparison primitives for one date format.
///
/// A codec instance is bound to a single format: changing the format means supplying a new
/// codec (see [`DateInput::sync_external_with_format`](crate::DateInput::sync_external_with_format)).
pub trait DateCodec {
    /// The structured date value owned by the host.
    type Value: Clone + fmt::Debug + 'static;

    /// Render `value` as display text.
    fn format(&self, value: &Self::Value) -> String;

    /// Strictly parse `text` and overlay the parsed fields onto `base`.
    ///
    /// Components the format does not express are taken from `base`. When `base` is `None`
    /// the codec chooses its own default. Returns `None` when `text` does not match the format
    /// exactly or the resulting date does not exist.
    fn parse_onto(&self, text: &str, base: Option<&Self::Value>) -> Option<Self::Value>;

    /// Semantic equality of two values (never a string comparison).
    fn is_same(&self, a: &Self::Value, b: &Self::Value) -> bool;
}
