//! Session configuration.

use crate::format::{DEFAULT_PATTERN, DateFormat, FormatError};
use serde::{Deserialize, Serialize};

/// Configuration of one date input session.
///
/// Deserializes from partial documents; missing keys take their defaults.
///
/// ```rust
/// use date_input_core::DateInputOptions;
///
/// let options = DateInputOptions {
///     format: "DD.MM.YYYY".to_string(),
///     show_clear: true,
///     ..DateInputOptions::default()
/// };
/// assert_eq!(options.date_format().unwrap().pattern(), "DD.MM.YYYY");
/// assert_eq!(options.clear_label, "Clear");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateInputOptions {
    /// Format pattern (see [`crate::format`]).
    pub format: String,
    /// Hint shown while the field is empty.
    pub placeholder: String,
    /// Localized label of the clear affordance.
    pub clear_label: String,
    /// Whether the clear affordance is shown.
    pub show_clear: bool,
    /// Whether the field accepts input.
    pub disabled: bool,
}

impl Default for DateInputOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_PATTERN.to_string(),
            placeholder: String::new(),
            clear_label: "Clear".to_string(),
            show_clear: false,
            disabled: false,
        }
    }
}

impl DateInputOptions {
    /// Compile [`DateInputOptions::format`].
    pub fn date_format(&self) -> Result<DateFormat, FormatError> {
        DateFormat::new(&self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_is_reported() {
        let options = DateInputOptions {
            format: String::new(),
            ..DateInputOptions::default()
        };
        assert_eq!(options.date_format(), Err(FormatError::Empty));
    }
}
