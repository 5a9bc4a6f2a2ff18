//! Money held as integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as a signed count of 1/100 Rupiah so that debit and
//! credit totals compare exactly. `rust_decimal::Decimal` is only used at the
//! boundaries (wire JSON, operator input, display).

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Number of fractional digits carried by the minor unit.
pub const SCALE: u32 = 2;

const MINOR_PER_MAJOR: i64 = 100;

/// Errors converting a decimal value into `Money`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value has more fractional digits than the minor unit allows.
    #[error("Amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),

    /// The value does not fit in the minor-unit range.
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),

    /// The text is not a decimal number.
    #[error("Invalid amount: {0}")]
    Parse(String),
}

/// A monetary amount in minor units (1/100 Rupiah).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole Rupiah.
    #[must_use]
    pub const fn from_major(major: i64) -> Option<Self> {
        match major.checked_mul(MINOR_PER_MAJOR) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Converts a decimal amount, rejecting sub-minor precision instead of rounding.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::OutOfRange(value))?;
        if !scaled.fract().is_zero() {
            return Err(MoneyError::TooPrecise(value));
        }
        scaled
            .to_i64()
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }

    /// Returns the amount as a decimal with two fractional digits.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Returns the raw minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Saturating addition; totals clamp at the minor-unit range.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Absolute difference between two amounts.
    #[must_use]
    pub fn abs_diff(self, other: Self) -> Self {
        Self(i64::try_from(self.0.abs_diff(other.0)).unwrap_or(i64::MAX))
    }

    /// Formats the amount the way the operator sees it: `Rp 100.000,00`.
    #[must_use]
    pub fn format_idr(self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let minor = self.0.unsigned_abs();
        // `MINOR_PER_MAJOR` is a positive constant
        let per_major = MINOR_PER_MAJOR.unsigned_abs();
        let major = group_thousands(minor / per_major);
        let cents = minor % per_major;
        format!("{sign}Rp {major},{cents:02}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_idr())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parses a plain decimal (`150000`, `150000.50`), optionally prefixed with `Rp`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("Rp").unwrap_or(trimmed).trim();
        let value = Decimal::from_str(digits).map_err(|_| MoneyError::Parse(s.to_string()))?;
        Self::from_decimal(value)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    /// Accepts JSON numbers and decimal strings in major units.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(de::Error::custom)
    }
}

/// Serde adapter writing `Money` as a JSON number, for request bodies whose
/// contract declares `amount: number`.
pub mod as_number {
    use super::{Decimal, Money};
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes the amount as a JSON number in major units.
    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&money.to_decimal(), serializer)
    }

    /// Deserializes a JSON number or decimal string in major units.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(100_000), Some(Money::from_minor(10_000_000)));
        assert_eq!(Money::from_major(i64::MAX), None);
    }

    #[test]
    fn test_from_decimal_exact() {
        assert_eq!(
            Money::from_decimal(dec!(150000.50)).unwrap(),
            Money::from_minor(15_000_050)
        );
        assert_eq!(
            Money::from_decimal(dec!(100000.000)).unwrap(),
            Money::from_minor(10_000_000)
        );
    }

    #[test]
    fn test_from_decimal_rejects_sub_minor_precision() {
        assert_eq!(
            Money::from_decimal(dec!(0.001)),
            Err(MoneyError::TooPrecise(dec!(0.001)))
        );
    }

    #[rstest]
    #[case(Money::ZERO, "Rp 0,00")]
    #[case(Money::from_minor(5), "Rp 0,05")]
    #[case(Money::from_minor(99_900), "Rp 999,00")]
    #[case(Money::from_minor(10_000_000), "Rp 100.000,00")]
    #[case(Money::from_minor(123_456_789_01), "Rp 123.456.789,01")]
    #[case(Money::from_minor(-5_000_000), "-Rp 50.000,00")]
    fn test_format_idr(#[case] money: Money, #[case] expected: &str) {
        assert_eq!(money.format_idr(), expected);
        assert_eq!(money.to_string(), expected);
    }

    #[rstest]
    #[case("100000", Money::from_minor(10_000_000))]
    #[case(" 2500.75 ", Money::from_minor(250_075))]
    #[case("Rp 1000", Money::from_minor(100_000))]
    fn test_from_str(#[case] input: &str, #[case] expected: Money) {
        assert_eq!(input.parse::<Money>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!("abc".parse::<Money>(), Err(MoneyError::Parse(_))));
        assert!(matches!(
            "1.005".parse::<Money>(),
            Err(MoneyError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_abs_diff_and_sum() {
        let a = Money::from_minor(15_000_000);
        let b = Money::from_minor(10_000_000);
        assert_eq!(a.abs_diff(b), Money::from_minor(5_000_000));
        assert_eq!(b.abs_diff(a), Money::from_minor(5_000_000));
        assert_eq!([a, b].into_iter().sum::<Money>(), Money::from_minor(25_000_000));
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("100000").unwrap();
        let from_string: Money = serde_json::from_str("\"100000.25\"").unwrap();
        assert_eq!(from_number, Money::from_minor(10_000_000));
        assert_eq!(from_string, Money::from_minor(10_000_025));
    }

    #[test]
    fn test_serde_writes_decimal_string() {
        let value = serde_json::to_value(Money::from_minor(10_000_025)).unwrap();
        assert_eq!(value, serde_json::json!("100000.25"));
        assert_eq!(serde_json::from_value::<Money>(value).unwrap(), Money::from_minor(10_000_025));
    }

    #[test]
    fn test_as_number_reads_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(with = "as_number")]
            amount: Money,
        }

        let body: Body = serde_json::from_str(r#"{"amount": 12500000.5}"#).unwrap();
        assert_eq!(body.amount, Money::from_minor(1_250_000_050));
        let body: Body = serde_json::from_str(r#"{"amount": "0.75"}"#).unwrap();
        assert_eq!(body.amount, Money::from_minor(75));
        assert!(serde_json::from_str::<Body>(r#"{"amount": "0.755"}"#).is_err());
    }

    #[test]
    fn test_as_number_writes_json_number() {
        #[derive(Serialize)]
        struct Body {
            #[serde(with = "as_number")]
            amount: Money,
        }

        let value = serde_json::to_value(Body {
            amount: Money::from_minor(10_000_050),
        })
        .unwrap();
        assert!(value["amount"].is_number());
        assert_eq!(value["amount"].to_string(), "100000.5");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Decimal boundary conversion never changes the amount.
        #[test]
        fn prop_decimal_boundary_is_lossless(minor in -1_000_000_000_000i64..1_000_000_000_000i64) {
            let money = Money::from_minor(minor);
            prop_assert_eq!(Money::from_decimal(money.to_decimal()).unwrap(), money);
        }
    }
}
