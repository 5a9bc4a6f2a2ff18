//! Neraca Balance calculation and the form that posts it.
//!
//! The Sisa Hasil Usaha amount is never typed by the operator. It is taken
//! from the backend calculation for the selected date, and the post is
//! unavailable until that calculation has been fetched.

use chrono::NaiveDate;
use neraca_shared::types::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use super::command::PostingCommand;
use super::error::PostingError;

/// Response of `GET /posting/neraca-balance/calculate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeracaBalanceCalculation {
    /// Calculated figures.
    #[serde(default)]
    pub calculation_details: Option<CalculationDetails>,
    /// A Neraca Balance already saved for this date, if any.
    #[serde(default)]
    pub existing_record: Option<Value>,
    /// Whether the backend would accept a save.
    #[serde(default)]
    pub can_save: bool,
}

/// Figures behind the Sisa Hasil Usaha.
///
/// Decimal figures are kept as the text the backend sent so nothing is lost
/// before the amount is parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetails {
    /// Sisa Hasil Usaha (net operating result).
    #[serde(default, deserialize_with = "decimal_text")]
    pub sisa_hasil_usaha: Option<String>,
    /// Total expenses.
    #[serde(default, deserialize_with = "decimal_text")]
    pub total_biaya: Option<String>,
    /// Total revenue.
    #[serde(default, deserialize_with = "decimal_text")]
    pub total_pendapatan: Option<String>,
    /// Number of accounts included.
    #[serde(default)]
    pub accounts_processed: Option<Value>,
    /// When the backend ran the calculation.
    #[serde(default)]
    pub calculation_date: Option<Value>,
    /// Fiscal year.
    #[serde(default)]
    pub year: Option<Value>,
}

/// Accepts a JSON string, number or null.
fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected a decimal, got {other}"))),
    }
}

impl NeracaBalanceCalculation {
    /// Parses `calculationDetails.sisaHasilUsaha` as the amount to post.
    ///
    /// Sub-cent digits are rounded half away from zero.
    ///
    /// # Errors
    ///
    /// * `PostingError::CalculationUnavailable` if the figure is absent
    /// * `PostingError::InvalidCalculation` if it is not a decimal number
    pub fn sisa_hasil_usaha(&self) -> Result<Money, PostingError> {
        let text = self
            .calculation_details
            .as_ref()
            .and_then(|details| details.sisa_hasil_usaha.as_deref())
            .ok_or(PostingError::CalculationUnavailable)?;
        let trimmed = text.trim();
        let value = trimmed
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PostingError::InvalidCalculation(format!("sisaHasilUsaha '{text}'")))?;
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Money::from_decimal(rounded).map_err(|err| PostingError::InvalidCalculation(err.to_string()))
    }

    /// Returns true if a Neraca Balance is already saved for the date.
    #[must_use]
    pub fn has_existing_record(&self) -> bool {
        self.existing_record
            .as_ref()
            .is_some_and(|record| !record.is_null())
    }
}

/// Form state for posting Neraca Balance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeracaBalanceForm {
    date: Option<NaiveDate>,
    calculation: Option<NeracaBalanceCalculation>,
}

impl NeracaBalanceForm {
    /// Creates a form for `date` with no calculation yet.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            calculation: None,
        }
    }

    /// The selected date.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Changes the date. A calculation fetched for another date is discarded.
    pub fn set_date(&mut self, date: NaiveDate) {
        if self.date != Some(date) {
            self.date = Some(date);
            self.calculation = None;
        }
    }

    /// Stores the calculation fetched for the current date.
    pub fn attach(&mut self, calculation: NeracaBalanceCalculation) {
        self.calculation = Some(calculation);
    }

    /// The fetched calculation, if any.
    #[must_use]
    pub fn calculation(&self) -> Option<&NeracaBalanceCalculation> {
        self.calculation.as_ref()
    }

    /// The read-only amount pre-filled from the calculation.
    #[must_use]
    pub fn sisa_hasil_usaha_amount(&self) -> Option<Money> {
        self.calculation
            .as_ref()
            .and_then(|calculation| calculation.sisa_hasil_usaha().ok())
    }

    /// Returns true if the form can be posted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.command().is_ok()
    }

    /// Builds the post command.
    ///
    /// # Errors
    ///
    /// * `PostingError::MissingDate` if no date is selected
    /// * `PostingError::CalculationUnavailable` if no usable calculation is attached
    /// * `PostingError::InvalidCalculation` if the amount cannot be parsed
    pub fn command(&self) -> Result<PostingCommand, PostingError> {
        let date = self.date.ok_or(PostingError::MissingDate)?;
        let calculation = self
            .calculation
            .as_ref()
            .ok_or(PostingError::CalculationUnavailable)?;
        Ok(PostingCommand::PostNeracaBalance {
            date,
            sisa_hasil_usaha_amount: calculation.sisa_hasil_usaha()?,
        })
    }
}
