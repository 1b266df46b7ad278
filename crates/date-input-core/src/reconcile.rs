//! Reconciliation of typed text against the current date value.
//!
//! [`Reconciler::reconcile`] is a decision function: it never mutates anything and never
//! fails. Invalid input is an expected steady state, reported as
//! [`Reconciliation::Invalid`] rather than as an error.
//!
//! The outcome depends only on its inputs as long as an overlay base is present. With neither a
//! selected nor a reference value, the codec supplies its own base; [`DateFormat`] uses today's
//! date, so a pattern without a year, month or day then resolves against the clock. Hosts that
//! need repeatable results set a reference value.
//!
//! [`DateFormat`]: crate::DateFormat

use crate::codec::DateCodec;

/// Caller-supplied gate: returns `true` when a syntactically valid date must be rejected.
pub type DisabledDate<V> = dyn Fn(&V) -> bool + Send;

/// Why non-empty text failed to produce an acceptable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The text does not strictly match the format, or names a date that does not exist.
    Unparseable,
    /// The text parsed, but the disabled-date predicate rejected the result.
    Rejected,
}

/// Outcome of reconciling one raw input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation<V> {
    /// The field is empty: the owner should drop its value.
    Remove,
    /// A new, different, acceptable value should become authoritative.
    Commit(V),
    /// The text denotes the value the owner already holds.
    Unchanged,
    /// The text cannot be committed.
    Invalid(InvalidReason),
}

impl<V> Reconciliation<V> {
    /// Returns `true` if the owner must be notified (`Remove` or `Commit`).
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Remove | Self::Commit(_))
    }

    /// The invalid reason, if this outcome marks the field invalid.
    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Invalid(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Inputs of one reconciliation.
pub struct Reconciler<'a, C: DateCodec> {
    /// Format capability.
    pub codec: &'a C,
    /// The value the owner currently holds.
    pub selected: Option<&'a C::Value>,
    /// Overlay base used when nothing is selected.
    pub reference: Option<&'a C::Value>,
    /// Optional rejection predicate.
    pub disabled_date: Option<&'a DisabledDate<C::Value>>,
}

impl<C: DateCodec> Reconciler<'_, C> {
    /// Decide what `raw` means relative to the selected value.
    pub fn reconcile(&self, raw: &str) -> Reconciliation<C::Value> {
        if raw.is_empty() {
            return Reconciliation::Remove;
        }

        let base = self.selected.or(self.reference);
        let Some(candidate) = self.codec.parse_onto(raw, base) else {
            return Reconciliation::Invalid(InvalidReason::Unparseable);
        };

        if self
            .disabled_date
            .is_some_and(|disabled| disabled(&candidate))
        {
            return Reconciliation::Invalid(InvalidReason::Rejected);
        }

        match self.selected {
            Some(selected) if self.codec.is_same(selected, &candidate) => Reconciliation::Unchanged,
            _ => Reconciliation::Commit(candidate),
        }
    }
}
