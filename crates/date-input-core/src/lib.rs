#![warn(missing_docs)]
//! Date Input Core - Headless Text/Date Synchronization Engine
//!
//! # Overview
//!
//! `date-input-core` keeps a free-form text field and a structured date value in sync. It does
//! not draw anything: the host renders the field from [`DateInput::view`], forwards every text
//! change to [`DateInput::handle_input`], and pushes values chosen elsewhere (a calendar, a
//! reset) through [`DateInput::sync_external`].
//!
//! # Core Features
//!
//! - **Strict Parsing**: text commits only when it matches the format exactly
//! - **Overlay Semantics**: components the format does not express are kept from the current value
//! - **Commit Suppression**: text equal to the current value never re-notifies the owner
//! - **Caret Preservation**: external reformats keep the caret where the user left it
//! - **Pluggable Dates**: any date type can be used through [`DateCodec`]; chrono is built in
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DateInput session (state + listeners)      │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Reconciler          │  Caret preservation  │  ← Decisions
//! ├──────────────────────┴──────────────────────┤
//! │  DateCodec (DateFormat over chrono)         │  ← Date capability
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use date_input_core::{DateFormat, DateInput, FieldState, HeadlessField, Reconciliation};
//! use chrono::{Datelike, NaiveDate, Weekday};
//!
//! let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let mut input = DateInput::new(DateFormat::default(), Some(jan_15))
//!     .with_disabled_date(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
//!
//! // A Saturday parses but is rejected.
//! assert!(matches!(input.handle_input("2024-01-20"), Reconciliation::Invalid(_)));
//! assert_eq!(input.field_state(), FieldState::Invalid);
//!
//! // An empty field removes the value.
//! assert_eq!(input.handle_input(""), Reconciliation::Remove);
//! assert_eq!(input.field_state(), FieldState::Empty);
//! ```
//!
//! # Module Description
//!
//! - [`codec`] - date capability trait
//! - [`format`] - format patterns and the chrono codec
//! - [`reconcile`] - pure text/value decision function
//! - [`caret`] - caret capture and restore around reformats
//! - [`options`] - serde-friendly session configuration
//! - [`state`] - the session state machine

pub mod caret;
pub mod codec;
pub mod format;
pub mod options;
pub mod reconcile;
pub mod state;

pub use caret::{CachedSelection, CaretRange, HeadlessField, TextField, snap_to_grapheme};
pub use codec::DateCodec;
pub use format::{DEFAULT_PATTERN, DateFormat, FormatError, FormatField, FormatToken, ParsedFields};
pub use options::DateInputOptions;
pub use reconcile::{DisabledDate, InvalidReason, Reconciler, Reconciliation};
pub use state::{DateInput, DateInputEvent, DateInputListener, DateInputView, FieldState};
