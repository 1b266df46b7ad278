//! Date format patterns.
//!
//! Patterns use the token vocabulary common to JavaScript date pickers:
//!
//! | Token | Meaning | Example |
//! |-------|---------|---------|
//! | `YYYY` / `YY` | four / two digit year | `2024` / `24` |
//! | `M` / `MM` | month, plain / zero padded | `2` / `02` |
//! | `MMM` / `MMMM` | month name, short / long | `Feb` / `February` |
//! | `D` / `DD` | day of month, plain / zero padded | `5` / `05` |
//! | `ddd` / `dddd` | weekday name, short / long | `Mon` / `Monday` |
//! | `H` / `HH` | hour 0-23, plain / zero padded | `7` / `07` |
//! | `h` / `hh` | hour 1-12, plain / zero padded | `7` / `07` |
//! | `m` / `mm` | minute | `5` / `05` |
//! | `s` / `ss` | second | `5` / `05` |
//! | `A` / `a` | meridiem, upper / lower case | `PM` / `pm` |
//!
//! Text inside `[...]` is emitted verbatim; every other character is a literal.
//!
//! Compiled patterns are lowered to chrono format items for both directions. Parsing is strict:
//! the text must parse, the resulting date must exist, and re-rendering it must reproduce the
//! input exactly. `2024-2-5` therefore does not match `YYYY-MM-DD`.

use crate::codec::DateCodec;
use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Pattern used when no format is configured.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[[^\]]*\]|YYYY|YY|MMMM|MMM|MM|M|DD|D|dddd|ddd|HH|H|hh|h|mm|m|ss|s|A|a|.")
        .expect("token pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when compiling a format pattern.
pub enum FormatError {
    #[error("format pattern is empty")]
    /// The pattern contained no characters.
    Empty,

    #[error("format pattern '{0}' contains no date or time fields")]
    /// The pattern consisted only of literals.
    NoFields(String),
}

/// A date or time component referenced by a pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatField {
    /// `YYYY`
    Year,
    /// `YY`
    YearTwoDigit,
    /// `M` / `MM`
    Month {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `MMM`
    MonthShortName,
    /// `MMMM`
    MonthLongName,
    /// `D` / `DD`
    Day {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `ddd`
    WeekdayShortName,
    /// `dddd`
    WeekdayLongName,
    /// `H` / `HH`
    Hour24 {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `h` / `hh`
    Hour12 {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `m` / `mm`
    Minute {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `s` / `ss`
    Second {
        /// Zero padded to two digits.
        padded: bool,
    },
    /// `A` / `a`
    Meridiem {
        /// Render as `AM`/`PM` rather than `am`/`pm`.
        uppercase: bool,
    },
}

impl FormatField {
    fn from_token(token: &str) -> Option<Self> {
        let field = match token {
            "YYYY" => Self::Year,
            "YY" => Self::YearTwoDigit,
            "M" => Self::Month { padded: false },
            "MM" => Self::Month { padded: true },
            "MMM" => Self::MonthShortName,
            "MMMM" => Self::MonthLongName,
            "D" => Self::Day { padded: false },
            "DD" => Self::Day { padded: true },
            "ddd" => Self::WeekdayShortName,
            "dddd" => Self::WeekdayLongName,
            "H" => Self::Hour24 { padded: false },
            "HH" => Self::Hour24 { padded: true },
            "h" => Self::Hour12 { padded: false },
            "hh" => Self::Hour12 { padded: true },
            "m" => Self::Minute { padded: false },
            "mm" => Self::Minute { padded: true },
            "s" => Self::Second { padded: false },
            "ss" => Self::Second { padded: true },
            "A" => Self::Meridiem { uppercase: true },
            "a" => Self::Meridiem { uppercase: false },
            _ => return None,
        };
        Some(field)
    }

    fn item(self) -> Item<'static> {
        let pad = |padded: bool| if padded { Pad::Zero } else { Pad::None };
        match self {
            Self::Year => Item::Numeric(Numeric::Year, Pad::Zero),
            Self::YearTwoDigit => Item::Numeric(Numeric::YearMod100, Pad::Zero),
            Self::Month { padded } => Item::Numeric(Numeric::Month, pad(padded)),
            Self::MonthShortName => Item::Fixed(Fixed::ShortMonthName),
            Self::MonthLongName => Item::Fixed(Fixed::LongMonthName),
            Self::Day { padded } => Item::Numeric(Numeric::Day, pad(padded)),
            Self::WeekdayShortName => Item::Fixed(Fixed::ShortWeekdayName),
            Self::WeekdayLongName => Item::Fixed(Fixed::LongWeekdayName),
            Self::Hour24 { padded } => Item::Numeric(Numeric::Hour, pad(padded)),
            Self::Hour12 { padded } => Item::Numeric(Numeric::Hour12, pad(padded)),
            Self::Minute { padded } => Item::Numeric(Numeric::Minute, pad(padded)),
            Self::Second { padded } => Item::Numeric(Numeric::Second, pad(padded)),
            Self::Meridiem { uppercase: true } => Item::Fixed(Fixed::UpperAmPm),
            Self::Meridiem { uppercase: false } => Item::Fixed(Fixed::LowerAmPm),
        }
    }
}

/// One element of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    /// Verbatim text (adjacent literals are merged).
    Literal(String),
    /// A date or time component.
    Field(FormatField),
}

/// Date/time components recovered from text, before they are applied to a base value.
///
/// `None` means the pattern does not express that component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedFields {
    /// Calendar year.
    pub year: Option<i32>,
    /// Year within its century, 0-99. Only consulted when `year` is `None`.
    pub year_mod_100: Option<i32>,
    /// Month, 1-12.
    pub month: Option<u32>,
    /// Day of month, 1-31.
    pub day: Option<u32>,
    /// 0 for AM, 1 for PM.
    pub hour_div_12: Option<u32>,
    /// Hour within the half day, 0-11.
    pub hour_mod_12: Option<u32>,
    /// Minute, 0-59.
    pub minute: Option<u32>,
    /// Second, 0-60 (60 never combines into a valid value).
    pub second: Option<u32>,
}

impl ParsedFields {
    fn from_parsed(parsed: &Parsed) -> Self {
        Self {
            year: parsed.year(),
            year_mod_100: parsed.year_mod_100(),
            month: parsed.month(),
            day: parsed.day(),
            hour_div_12: parsed.hour_div_12(),
            hour_mod_12: parsed.hour_mod_12(),
            minute: parsed.minute(),
            second: parsed.second(),
        }
    }

    /// Build a new value from `base` with these fields laid over it.
    ///
    /// Components that are `None` keep the base's value. A two-digit year stays in the base's
    /// century when it names the base's own year; otherwise it goes through the 69/68 pivot.
    /// When the day is not expressed, the base day is clamped to the length of the resulting
    /// month. Returns `None` for dates that do not exist (e.g. an explicit February 30th).
    pub fn combine(&self, base: &NaiveDateTime) -> Option<NaiveDateTime> {
        let year = match (self.year, self.year_mod_100) {
            (Some(year), _) => year,
            (None, Some(yy)) if base.year().rem_euclid(100) == yy => base.year(),
            (None, Some(yy)) => expand_two_digit_year(yy),
            (None, None) => base.year(),
        };
        let month = self.month.unwrap_or(base.month());
        let day = match self.day {
            Some(day) => day,
            None => base.day().min(days_in_month(year, month)?),
        };
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let hour = match (self.hour_div_12, self.hour_mod_12) {
            (Some(div), Some(rem)) => div * 12 + rem,
            (None, Some(rem)) => base.hour() / 12 * 12 + rem,
            (Some(div), None) => div * 12 + base.hour() % 12,
            (None, None) => base.hour(),
        };
        let time = NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(base.minute()),
            self.second.unwrap_or(base.second()),
            base.nanosecond(),
        )?;

        Some(date.and_time(time))
    }
}

/// `YY` follows the usual picker convention: 69-99 are 1900s, 00-68 are 2000s.
fn expand_two_digit_year(year_mod_100: i32) -> i32 {
    if year_mod_100 > 68 {
        1900 + year_mod_100
    } else {
        2000 + year_mod_100
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// A compiled date format pattern, usable as a [`DateCodec`] over [`NaiveDateTime`].
///
/// # Example
///
/// ```rust
/// use date_input_core::DateFormat;
/// use chrono::NaiveDate;
///
/// let format = DateFormat::new("DD/MM/YYYY").unwrap();
/// let value = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert_eq!(format.format(&value), "20/02/2024");
/// assert_eq!(format.parse_onto("20/02/2024", &value), Some(value));
/// assert_eq!(format.parse_onto("20/2/2024", &value), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<FormatToken>,
}

impl DateFormat {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, FormatError> {
        if pattern.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut tokens: Vec<FormatToken> = Vec::new();
        for m in TOKEN_PATTERN.find_iter(pattern) {
            let raw = m.as_str();
            let token = match FormatField::from_token(raw) {
                Some(field) => FormatToken::Field(field),
                None => {
                    let literal = raw
                        .strip_prefix('[')
                        .and_then(|rest| rest.strip_suffix(']'))
                        .unwrap_or(raw);
                    if let Some(FormatToken::Literal(prev)) = tokens.last_mut() {
                        prev.push_str(literal);
                        continue;
                    }
                    FormatToken::Literal(literal.to_string())
                }
            };
            tokens.push(token);
        }

        if !tokens.iter().any(|t| matches!(t, FormatToken::Field(_))) {
            return Err(FormatError::NoFields(pattern.to_string()));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    /// The pattern this format was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled tokens.
    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    fn items(&self) -> Vec<Item<'_>> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                FormatToken::Literal(text) if text.is_empty() => None,
                FormatToken::Literal(text) => Some(Item::Literal(text)),
                FormatToken::Field(field) => Some(field.item()),
            })
            .collect()
    }

    /// Render `value` with this pattern.
    pub fn format(&self, value: &NaiveDateTime) -> String {
        let items = self.items();
        value.format_with_items(items.iter()).to_string()
    }

    /// Extract the components expressed by this pattern from `text`.
    ///
    /// This only checks that `text` has the pattern's shape and that each component is in
    /// range; [`DateFormat::parse_onto`] performs the full strict check.
    pub fn parse_fields(&self, text: &str) -> Option<ParsedFields> {
        let items = self.items();
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, items.iter()).ok()?;
        Some(ParsedFields::from_parsed(&parsed))
    }

    /// Strictly parse `text` and overlay it on `base`.
    ///
    /// Fails unless the combined value renders back to exactly `text`; this rejects missing
    /// padding, stray whitespace, case variations of names and weekday names that disagree with
    /// the date.
    pub fn parse_onto(&self, text: &str, base: &NaiveDateTime) -> Option<NaiveDateTime> {
        let candidate = self.parse_fields(text)?.combine(base)?;
        (self.format(&candidate) == text).then_some(candidate)
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            tokens: vec![
                FormatToken::Field(FormatField::Year),
                FormatToken::Literal("-".to_string()),
                FormatToken::Field(FormatField::Month { padded: true }),
                FormatToken::Literal("-".to_string()),
                FormatToken::Field(FormatField::Day { padded: true }),
            ],
        }
    }
}

impl FromStr for DateFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl DateCodec for DateFormat {
    type Value = NaiveDateTime;

    fn format(&self, value: &NaiveDateTime) -> String {
        DateFormat::format(self, value)
    }

    /// Without a base, components the pattern does not express come from today at midnight,
    /// read from the local clock. Pass a base for results that do not depend on the date.
    fn parse_onto(&self, text: &str, base: Option<&NaiveDateTime>) -> Option<NaiveDateTime> {
        let base = base
            .copied()
            .unwrap_or_else(|| Local::now().date_naive().and_time(NaiveTime::MIN));
        DateFormat::parse_onto(self, text, &base)
    }

    fn is_same(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_compile_merges_literals_and_brackets() {
        let format = DateFormat::new("[Day] D [of] MMMM").unwrap();
        assert_eq!(
            format.tokens(),
            &[
                FormatToken::Literal("Day ".to_string()),
                FormatToken::Field(FormatField::Day { padded: false }),
                FormatToken::Literal(" of ".to_string()),
                FormatToken::Field(FormatField::MonthLongName),
            ]
        );
    }

    #[test]
    fn test_compile_rejects_empty_and_literal_only() {
        assert_eq!(DateFormat::new(""), Err(FormatError::Empty));
        assert_eq!(
            DateFormat::new("[YYYY]"),
            Err(FormatError::NoFields("[YYYY]".to_string()))
        );
        assert!(matches!(
            DateFormat::new("--"),
            Err(FormatError::NoFields(_))
        ));
    }

    #[test]
    fn test_default_matches_compiled_default_pattern() {
        assert_eq!(DateFormat::default(), DateFormat::new(DEFAULT_PATTERN).unwrap());
    }

    #[test]
    fn test_format_with_names_and_meridiem() {
        let format = DateFormat::new("ddd, MMM D YYYY h:mm A").unwrap();
        assert_eq!(
            format.format(&at(2024, 3, 1, 15, 7, 0)),
            "Fri, Mar 1 2024 3:07 PM"
        );
    }

    #[test]
    fn test_parse_onto_preserves_unexpressed_time() {
        let format = DateFormat::new("YYYY-MM-DD").unwrap();
        let base = at(2024, 1, 15, 9, 30, 12);
        assert_eq!(
            format.parse_onto("2024-02-20", &base),
            Some(at(2024, 2, 20, 9, 30, 12))
        );
    }

    #[test]
    fn test_parse_onto_sets_month() {
        let format = DateFormat::new("YYYY-MM-DD").unwrap();
        let base = at(2024, 1, 15, 0, 0, 0);
        let parsed = format.parse_onto("2024-11-15", &base).unwrap();
        assert_eq!(parsed.month(), 11);
    }

    #[test]
    fn test_parse_onto_is_strict() {
        let format = DateFormat::new("YYYY-MM-DD").unwrap();
        let base = at(2024, 1, 15, 0, 0, 0);
        for text in [
            "2024-2-20",
            "2024-02-20 ",
            " 2024-02-20",
            "2024/02/20",
            "2024-02-2",
            "2024-02",
            "2024-02-20x",
            "2024-13-40",
            "2024-02-30",
        ] {
            assert_eq!(format.parse_onto(text, &base), None, "{text:?}");
        }
    }

    #[test]
    fn test_parse_onto_rejects_mismatched_weekday() {
        let format = DateFormat::new("ddd YYYY-MM-DD").unwrap();
        let base = at(2024, 1, 15, 0, 0, 0);
        assert_eq!(
            format.parse_onto("Fri 2024-03-01", &base),
            Some(at(2024, 3, 1, 0, 0, 0))
        );
        assert_eq!(format.parse_onto("Mon 2024-03-01", &base), None);
        assert_eq!(format.parse_onto("fri 2024-03-01", &base), None);
    }

    #[test]
    fn test_twelve_hour_clock() {
        let format = DateFormat::new("YYYY-MM-DD hh:mm a").unwrap();
        let base = at(2024, 1, 15, 0, 0, 0);
        assert_eq!(
            format.parse_onto("2024-01-15 12:05 am", &base),
            Some(at(2024, 1, 15, 0, 5, 0))
        );
        assert_eq!(
            format.parse_onto("2024-01-15 01:45 pm", &base),
            Some(at(2024, 1, 15, 13, 45, 0))
        );
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_two_digit_year(24), 2024);
        assert_eq!(expand_two_digit_year(68), 2068);
        assert_eq!(expand_two_digit_year(69), 1969);
        assert_eq!(expand_two_digit_year(99), 1999);
    }

    #[test]
    fn test_two_digit_year_keeps_base_century() {
        let format = DateFormat::new("DD/MM/YY").unwrap();

        let base = at(1950, 6, 1, 0, 0, 0);
        assert_eq!(format.parse_onto("01/06/50", &base), Some(base));
        assert_eq!(format.parse_onto("02/06/50", &base), Some(at(1950, 6, 2, 0, 0, 0)));
        // A different year falls back to the pivot.
        assert_eq!(format.parse_onto("01/06/51", &base), Some(at(2051, 6, 1, 0, 0, 0)));

        let base = at(2100, 3, 1, 0, 0, 0);
        assert_eq!(format.parse_onto("01/03/00", &base), Some(base));
    }

    #[test]
    fn test_combine_clamps_day_when_not_expressed() {
        let base = at(2024, 1, 31, 8, 0, 0);
        let fields = ParsedFields {
            year: Some(2023),
            month: Some(2),
            ..ParsedFields::default()
        };
        assert_eq!(fields.combine(&base), Some(at(2023, 2, 28, 8, 0, 0)));
    }

    #[test]
    fn test_combine_keeps_half_day_for_bare_twelve_hour() {
        let base = at(2024, 1, 31, 20, 0, 0);
        let fields = ParsedFields {
            hour_mod_12: Some(3),
            ..ParsedFields::default()
        };
        assert_eq!(fields.combine(&base), Some(at(2024, 1, 31, 15, 0, 0)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 13), None);
    }
}
