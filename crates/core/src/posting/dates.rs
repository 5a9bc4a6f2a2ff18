//! Date formats used by the posting endpoints.
//!
//! Buku Besar takes ISO `YYYY-MM-DD`; the Neraca stages take `DD-MM-YYYY`.
//! Operators always enter ISO dates and the stage decides the wire format.

use chrono::NaiveDate;

use super::error::PostingError;

/// Wire date format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `YYYY-MM-DD`.
    Iso,
    /// `DD-MM-YYYY`.
    DayMonthYear,
}

impl DateFormat {
    /// The `chrono` pattern for this format.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Iso => "%Y-%m-%d",
            Self::DayMonthYear => "%d-%m-%Y",
        }
    }

    /// The layout shown to operators in error messages.
    #[must_use]
    pub const fn layout(self) -> &'static str {
        match self {
            Self::Iso => "YYYY-MM-DD",
            Self::DayMonthYear => "DD-MM-YYYY",
        }
    }

    /// Formats `date` in this format.
    #[must_use]
    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }

    /// Parses a date written in this format.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::InvalidDate` if the text does not match.
    pub fn parse(self, input: &str) -> Result<NaiveDate, PostingError> {
        NaiveDate::parse_from_str(input.trim(), self.pattern()).map_err(|_| {
            PostingError::InvalidDate {
                input: input.to_string(),
                expected: self.layout(),
            }
        })
    }
}

/// Parses an operator-entered ISO date.
///
/// # Errors
///
/// Returns `PostingError::InvalidDate` for anything but `YYYY-MM-DD`.
pub fn parse_iso(input: &str) -> Result<NaiveDate, PostingError> {
    DateFormat::Iso.parse(input)
}

/// Reformats an ISO date as `DD-MM-YYYY` for the Neraca endpoints.
///
/// # Errors
///
/// Returns `PostingError::InvalidDate` if `iso` is not `YYYY-MM-DD`.
pub fn iso_to_day_month_year(iso: &str) -> Result<String, PostingError> {
    parse_iso(iso).map(|date| DateFormat::DayMonthYear.format(date))
}
