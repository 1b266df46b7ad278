//! Date Input Session
//!
//! [`DateInput`] owns the only mutable state of the engine: the text currently shown in the
//! field and whether that text is invalid. Everything else (the selected value, the format, the
//! acceptability predicate) is configuration supplied by the owning context.
//!
//! # Entry points
//!
//! - [`DateInput::handle_input`]: the user changed the text. The text is echoed immediately,
//!   reconciled against the selected value, and a commit is emitted to subscribers when a new
//!   value (or the absence of one) should become authoritative.
//! - [`DateInput::sync_external`] / [`DateInput::sync_external_with_format`]: the owner pushed
//!   a value. The caret is captured, the text is reformatted and rendered, and the caret is
//!   restored, in that order, inside one call.
//! - [`DateInput::clear`]: the clear affordance was activated.
//!
//! # Example
//!
//! ```rust
//! use date_input_core::{DateFormat, DateInput, DateInputEvent, FieldState, HeadlessField};
//! use chrono::NaiveDate;
//! use std::sync::{Arc, Mutex};
//!
//! let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let mut input = DateInput::new(DateFormat::default(), Some(jan_15));
//! let mut field = HeadlessField::new(input.current_text());
//!
//! let commits = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&commits);
//! input.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
//!
//! input.handle_input("2024-02-20");
//! assert_eq!(input.field_state(), FieldState::Valid);
//!
//! input.handle_input("2024-02-2x");
//! assert_eq!(input.field_state(), FieldState::Invalid);
//!
//! // The owner accepts the committed value and pushes it back.
//! let feb_20 = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! input.sync_external(Some(feb_20), &mut field);
//! assert_eq!(field.text(), "2024-02-20");
//! assert_eq!(commits.lock().unwrap().as_slice(), &[DateInputEvent::Change(Some(feb_20))]);
//! ```

use crate::caret::{CachedSelection, TextField};
use crate::codec::DateCodec;
use crate::format::{DateFormat, FormatError};
use crate::options::DateInputOptions;
use crate::reconcile::{DisabledDate, InvalidReason, Reconciler, Reconciliation};
use unicode_width::UnicodeWidthStr;

/// Coarse state of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// The field shows no text.
    Empty,
    /// The field shows text that denotes an acceptable date.
    Valid,
    /// The field shows text that cannot be committed.
    Invalid,
}

/// Notification sent to the owning context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInputEvent<V> {
    /// A commit: the value (or its absence) should become authoritative.
    Change(Option<V>),
    /// The clear affordance was activated.
    Clear,
}

/// Subscriber callback type.
pub type DateInputListener<V> = Box<dyn FnMut(&DateInputEvent<V>) + Send>;

/// What a renderer needs to draw the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInputView {
    /// Text to show.
    pub text: String,
    /// Coarse field state (drives the invalid style).
    pub state: FieldState,
    /// Hint shown while empty.
    pub placeholder: String,
    /// Label of the clear affordance.
    pub clear_label: String,
    /// Whether the clear affordance is shown.
    pub show_clear: bool,
    /// Whether the field accepts input.
    pub disabled: bool,
    /// Width of `text` in terminal cells (CJK wide characters count as 2).
    pub display_width: usize,
}

/// One date input session.
///
/// Create one per field; drop it when the field goes away.
pub struct DateInput<C: DateCodec = DateFormat> {
    codec: C,
    /// Text currently shown.
    text: String,
    /// `Some` exactly when `text` is non-empty and cannot be committed.
    invalid: Option<InvalidReason>,
    /// Last value supplied by the owner.
    selected: Option<C::Value>,
    /// Overlay base used while nothing is selected.
    reference: Option<C::Value>,
    disabled_date: Option<Box<DisabledDate<C::Value>>>,
    listeners: Vec<DateInputListener<C::Value>>,
    placeholder: String,
    clear_label: String,
    show_clear: bool,
    disabled: bool,
}

impl<C: DateCodec> DateInput<C> {
    /// Start a session showing `selected` (or nothing).
    pub fn new(codec: C, selected: Option<C::Value>) -> Self {
        let defaults = DateInputOptions::default();
        let text = selected
            .as_ref()
            .map(|value| codec.format(value))
            .unwrap_or_default();
        Self {
            codec,
            text,
            invalid: None,
            selected,
            reference: None,
            disabled_date: None,
            listeners: Vec::new(),
            placeholder: defaults.placeholder,
            clear_label: defaults.clear_label,
            show_clear: defaults.show_clear,
            disabled: defaults.disabled,
        }
    }

    /// Reject candidate dates for which `predicate` returns `true`.
    pub fn with_disabled_date<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C::Value) -> bool + Send + 'static,
    {
        self.disabled_date = Some(Box::new(predicate));
        self
    }

    /// Set the overlay base used while nothing is selected.
    pub fn with_reference_value(mut self, reference: C::Value) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Set the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the clear affordance label and visibility.
    pub fn with_clear(mut self, label: impl Into<String>, show: bool) -> Self {
        self.clear_label = label.into();
        self.show_clear = show;
        self
    }

    /// Set whether the field is disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Subscribe to commits and clears.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&DateInputEvent<C::Value>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// The text currently shown.
    pub fn current_text(&self) -> &str {
        &self.text
    }

    /// Whether the shown text is invalid.
    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }

    /// Why the shown text is invalid, if it is.
    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        self.invalid
    }

    /// Coarse field state.
    pub fn field_state(&self) -> FieldState {
        if self.invalid.is_some() {
            FieldState::Invalid
        } else if self.text.is_empty() {
            FieldState::Empty
        } else {
            FieldState::Valid
        }
    }

    /// The last value supplied by the owner.
    pub fn selected_value(&self) -> Option<&C::Value> {
        self.selected.as_ref()
    }

    /// The overlay base used while nothing is selected.
    pub fn reference_value(&self) -> Option<&C::Value> {
        self.reference.as_ref()
    }

    /// Replace the overlay base used while nothing is selected.
    pub fn set_reference_value(&mut self, reference: Option<C::Value>) {
        self.reference = reference;
    }

    /// The active codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Whether the field is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the field.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> DateInputView {
        DateInputView {
            text: self.text.clone(),
            state: self.field_state(),
            placeholder: self.placeholder.clone(),
            clear_label: self.clear_label.clone(),
            show_clear: self.show_clear,
            disabled: self.disabled,
            display_width: self.text.width(),
        }
    }

    /// The user changed the field's text to `raw` (the full new string).
    ///
    /// The text is echoed as typed regardless of validity. Subscribers receive exactly one
    /// [`DateInputEvent::Change`] when the outcome is a commit and nothing otherwise. Input is
    /// ignored while the field is disabled.
    pub fn handle_input(&mut self, raw: &str) -> Reconciliation<C::Value> {
        if self.disabled {
            tracing::debug!("input ignored: field is disabled");
            return Reconciliation::Unchanged;
        }

        self.text.clear();
        self.text.push_str(raw);

        let outcome = Reconciler {
            codec: &self.codec,
            selected: self.selected.as_ref(),
            reference: self.reference.as_ref(),
            disabled_date: self.disabled_date.as_deref(),
        }
        .reconcile(raw);

        match &outcome {
            Reconciliation::Remove => {
                self.invalid = None;
                tracing::debug!("date input emptied; removing value");
                self.emit(DateInputEvent::Change(None));
            }
            Reconciliation::Commit(value) => {
                self.invalid = None;
                tracing::debug!(text = raw, value = ?value, "date input committed");
                self.emit(DateInputEvent::Change(Some(value.clone())));
            }
            Reconciliation::Unchanged => {
                self.invalid = None;
            }
            Reconciliation::Invalid(reason) => {
                self.invalid = Some(*reason);
                tracing::debug!(text = raw, reason = ?reason, "date input invalid");
            }
        }

        outcome
    }

    /// The owner supplied a new value; the format is unchanged.
    pub fn sync_external<F: TextField + ?Sized>(
        &mut self,
        value: Option<C::Value>,
        field: &mut F,
    ) {
        self.apply_external(value, None, field);
    }

    /// The owner supplied a new value together with a new format.
    pub fn sync_external_with_format<F: TextField + ?Sized>(
        &mut self,
        value: Option<C::Value>,
        codec: C,
        field: &mut F,
    ) {
        self.apply_external(value, Some(codec), field);
    }

    fn apply_external<F: TextField + ?Sized>(
        &mut self,
        value: Option<C::Value>,
        codec: Option<C>,
        field: &mut F,
    ) {
        // Capture before the text changes; never carry a caret out of invalid text.
        let cached = CachedSelection::capture(&*field, self.is_invalid());

        if let Some(codec) = codec {
            self.codec = codec;
        }
        self.text = value
            .as_ref()
            .map(|value| self.codec.format(value))
            .unwrap_or_default();
        self.selected = value;
        self.invalid = None;
        tracing::debug!(text = %self.text, "date input synced from owner");

        field.set_text(&self.text);
        if let Some(cached) = cached {
            cached.restore(field, &self.text);
        }
    }

    /// The clear affordance was activated.
    ///
    /// Leaves the field empty and valid and sends [`DateInputEvent::Clear`] once. Ignored while
    /// the field is disabled.
    pub fn clear<F: TextField + ?Sized>(&mut self, field: &mut F) {
        if self.disabled {
            tracing::debug!("clear ignored: field is disabled");
            return;
        }
        self.text.clear();
        self.invalid = None;
        field.set_text("");
        tracing::debug!("date input cleared");
        self.emit(DateInputEvent::Clear);
    }

    /// Focus the field, unless disabled.
    pub fn focus<F: TextField + ?Sized>(&self, field: &mut F) {
        if !self.disabled {
            field.focus();
        }
    }

    fn emit(&mut self, event: DateInputEvent<C::Value>) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl DateInput<DateFormat> {
    /// Start a session from configuration.
    pub fn from_options(
        options: &DateInputOptions,
        selected: Option<chrono::NaiveDateTime>,
    ) -> Result<Self, FormatError> {
        let format = options.date_format()?;
        Ok(Self::new(format, selected)
            .with_placeholder(options.placeholder.clone())
            .with_clear(options.clear_label.clone(), options.show_clear)
            .with_disabled(options.disabled))
    }
}

impl<C> std::fmt::Debug for DateInput<C>
where
    C: DateCodec + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateInput")
            .field("codec", &self.codec)
            .field("text", &self.text)
            .field("invalid", &self.invalid)
            .field("selected", &self.selected)
            .field("reference", &self.reference)
            .field("listeners", &self.listeners.len())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caret::{CaretRange, HeadlessField};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::{Arc, Mutex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    type Events = Arc<Mutex<Vec<DateInputEvent<NaiveDateTime>>>>;

    fn recording(input: &mut DateInput) -> Events {
        let events: Events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        input.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_initial_state_from_selected() {
        let input = DateInput::new(DateFormat::default(), Some(date(2024, 1, 15)));
        assert_eq!(input.current_text(), "2024-01-15");
        assert_eq!(input.field_state(), FieldState::Valid);

        let empty: DateInput = DateInput::new(DateFormat::default(), None);
        assert_eq!(empty.current_text(), "");
        assert_eq!(empty.field_state(), FieldState::Empty);
    }

    #[test]
    fn test_input_is_echoed_even_when_invalid() {
        let mut input = DateInput::new(DateFormat::default(), Some(date(2024, 1, 15)));
        input.handle_input("2024-0");
        assert_eq!(input.current_text(), "2024-0");
        assert_eq!(input.invalid_reason(), Some(InvalidReason::Unparseable));
        assert_eq!(input.selected_value(), Some(&date(2024, 1, 15)));
    }

    #[test]
    fn test_unchanged_clears_invalid_without_commit() {
        let mut input = DateInput::new(DateFormat::default(), Some(date(2024, 1, 15)));
        let events = recording(&mut input);

        input.handle_input("2024-01-1");
        assert!(input.is_invalid());
        assert_eq!(input.handle_input("2024-01-15"), Reconciliation::Unchanged);
        assert!(!input.is_invalid());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_field_ignores_input_clear_and_focus() {
        let mut input =
            DateInput::new(DateFormat::default(), Some(date(2024, 1, 15))).with_disabled(true);
        let events = recording(&mut input);
        let mut field = HeadlessField::new("2024-01-15");

        assert_eq!(input.handle_input(""), Reconciliation::Unchanged);
        input.clear(&mut field);
        input.focus(&mut field);

        assert_eq!(input.current_text(), "2024-01-15");
        assert_eq!(field.text(), "2024-01-15");
        assert!(!field.is_focused());
        assert!(events.lock().unwrap().is_empty());

        input.set_disabled(false);
        input.focus(&mut field);
        assert!(field.is_focused());
    }

    #[test]
    fn test_sync_with_new_format() {
        let mut input = DateInput::new(DateFormat::default(), Some(date(2024, 1, 15)));
        let mut field = HeadlessField::new(input.current_text());
        field.type_text("2024-01-15", 2);

        let format = DateFormat::new("DD/MM/YYYY").unwrap();
        input.sync_external_with_format(Some(date(2024, 3, 1)), format, &mut field);

        assert_eq!(input.current_text(), "01/03/2024");
        assert_eq!(field.text(), "01/03/2024");
        assert_eq!(field.selection(), Some(CaretRange::collapsed(2)));
        assert_eq!(input.codec().pattern(), "DD/MM/YYYY");
        assert_eq!(input.handle_input("01/03/2024"), Reconciliation::Unchanged);
    }

    #[test]
    fn test_sync_to_none_empties_field() {
        let mut input = DateInput::new(DateFormat::default(), Some(date(2024, 1, 15)));
        let mut field = HeadlessField::new(input.current_text());
        input.sync_external(None, &mut field);
        assert_eq!(input.field_state(), FieldState::Empty);
        assert_eq!(field.text(), "");
        assert_eq!(input.selected_value(), None);
    }

    #[test]
    fn test_view_reports_presentation() {
        let format = DateFormat::new("YYYY年MM月DD日").unwrap();
        let input = DateInput::new(format, Some(date(2024, 1, 15)))
            .with_placeholder("选择日期")
            .with_clear("清除", true);
        let view = input.view();
        assert_eq!(view.text, "2024年01月15日");
        assert_eq!(view.display_width, 14);
        assert_eq!(view.placeholder, "选择日期");
        assert_eq!(view.clear_label, "清除");
        assert!(view.show_clear);
        assert!(!view.disabled);
        assert_eq!(view.state, FieldState::Valid);
    }

    #[test]
    fn test_from_options() {
        let options = DateInputOptions {
            format: "DD.MM.YYYY".to_string(),
            placeholder: "dd.mm.yyyy".to_string(),
            ..DateInputOptions::default()
        };
        let input = DateInput::from_options(&options, Some(date(2024, 1, 15))).unwrap();
        assert_eq!(input.current_text(), "15.01.2024");
        assert_eq!(input.view().placeholder, "dd.mm.yyyy");

        let bad = DateInputOptions {
            format: "[none]".to_string(),
            ..DateInputOptions::default()
        };
        assert!(matches!(
            DateInput::from_options(&bad, None),
            Err(FormatError::NoFields(_))
        ));
    }
}
