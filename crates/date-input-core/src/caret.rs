//! Caret access and preservation across reformats.
//!
//! When the owner pushes a new value, the field's text is replaced wholesale. To keep an
//! in-progress edit usable, the caret is captured before the replacement and reapplied after
//! the new text has been rendered. All offsets are character offsets (Unicode scalar values).
//!
//! [`CachedSelection`] is consumed by [`CachedSelection::restore`], so a captured caret can be
//! applied at most once.

use unicode_segmentation::UnicodeSegmentation;

/// A caret or selection range, as half-open character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretRange {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
}

impl CaretRange {
    /// Create a range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed caret at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns `true` if the range selects nothing.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The host's text field, as seen by the core.
pub trait TextField {
    /// Current caret/selection, or `None` when the field has no caret (not focused).
    fn selection(&self) -> Option<CaretRange>;

    /// Move the caret/selection.
    fn set_selection(&mut self, range: CaretRange);

    /// Replace the visible text.
    fn set_text(&mut self, text: &str);

    /// Give the field input focus.
    fn focus(&mut self);
}

/// A caret captured immediately before a reformat.
#[must_use = "a captured selection should be restored after the reformat"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedSelection {
    range: CaretRange,
}

impl CachedSelection {
    /// Capture the field's caret.
    ///
    /// Returns `None` when the field has no caret, or when it was showing invalid text: a caret
    /// anchored in text the user mistyped means nothing in the reformatted value.
    pub fn capture<F: TextField + ?Sized>(field: &F, was_invalid: bool) -> Option<Self> {
        if was_invalid {
            tracing::trace!("caret capture skipped: field was invalid");
            return None;
        }
        let range = field.selection()?;
        tracing::trace!(start = range.start, end = range.end, "caret captured");
        Some(Self { range })
    }

    /// The captured range.
    pub fn range(&self) -> CaretRange {
        self.range
    }

    /// Reapply the caret to `field`, which now shows `text`.
    ///
    /// Offsets are clamped to `text` and moved back to the nearest grapheme boundary. Returns
    /// the range that was applied.
    pub fn restore<F: TextField + ?Sized>(self, field: &mut F, text: &str) -> CaretRange {
        let start = snap_to_grapheme(text, self.range.start);
        let end = snap_to_grapheme(text, self.range.end).max(start);
        let applied = CaretRange::new(start, end);
        field.set_selection(applied);
        tracing::trace!(start, end, "caret restored");
        applied
    }
}

/// Clamp `offset` to `text` and round it down to a grapheme cluster boundary.
pub fn snap_to_grapheme(text: &str, offset: usize) -> usize {
    let mut boundary = 0;
    for grapheme in text.graphemes(true) {
        let next = boundary + grapheme.chars().count();
        if next > offset {
            break;
        }
        boundary = next;
    }
    boundary
}

/// An in-memory [`TextField`], for hosts without a widget handle and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessField {
    text: String,
    selection: CaretRange,
    focused: bool,
}

impl HeadlessField {
    /// Create an unfocused field showing `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: CaretRange::collapsed(text.chars().count()),
            focused: false,
        }
    }

    /// The visible text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Drop focus; the field reports no caret until focused again.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Simulate the user editing the field: new text and caret position.
    pub fn type_text(&mut self, text: &str, caret: usize) {
        self.text = text.to_string();
        self.focused = true;
        self.selection = CaretRange::collapsed(caret.min(text.chars().count()));
    }
}

impl TextField for HeadlessField {
    fn selection(&self) -> Option<CaretRange> {
        self.focused.then_some(self.selection)
    }

    fn set_selection(&mut self, range: CaretRange) {
        self.selection = range;
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        let len = text.chars().count();
        self.selection = CaretRange::collapsed(len);
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grapheme_clamps() {
        assert_eq!(snap_to_grapheme("2024", 10), 4);
        assert_eq!(snap_to_grapheme("2024", 2), 2);
        assert_eq!(snap_to_grapheme("", 3), 0);
    }

    #[test]
    fn test_snap_to_grapheme_rounds_down_inside_cluster() {
        // "e" + combining acute accent is one grapheme of two chars.
        let text = "e\u{301}x";
        assert_eq!(snap_to_grapheme(text, 1), 0);
        assert_eq!(snap_to_grapheme(text, 2), 2);
        assert_eq!(snap_to_grapheme(text, 3), 3);
    }

    #[test]
    fn test_capture_requires_caret() {
        let field = HeadlessField::new("2024-01-15");
        assert_eq!(CachedSelection::capture(&field, false), None);
    }

    #[test]
    fn test_capture_skipped_when_invalid() {
        let mut field = HeadlessField::new("");
        field.type_text("2024-99-99", 4);
        assert_eq!(CachedSelection::capture(&field, true), None);
        assert!(CachedSelection::capture(&field, false).is_some());
    }

    #[test]
    fn test_restore_after_set_text() {
        let mut field = HeadlessField::new("");
        field.type_text("2024-01-15", 4);

        let cached = CachedSelection::capture(&field, false).unwrap();
        field.set_text("2024-03-01");
        assert_eq!(field.selection(), Some(CaretRange::collapsed(10)));

        let applied = cached.restore(&mut field, "2024-03-01");
        assert_eq!(applied, CaretRange::collapsed(4));
        assert_eq!(field.selection(), Some(CaretRange::collapsed(4)));
    }

    #[test]
    fn test_restore_clamps_to_shorter_text() {
        let mut field = HeadlessField::new("");
        field.type_text("2024-01-15", 10);
        field.set_selection(CaretRange::new(5, 10));

        let cached = CachedSelection::capture(&field, false).unwrap();
        field.set_text("24-1-5");
        let applied = cached.restore(&mut field, "24-1-5");
        assert_eq!(applied, CaretRange::new(5, 6));
    }
}
