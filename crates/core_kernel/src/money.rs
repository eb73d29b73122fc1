//! Money types with precise decimal arithmetic
//!
//! Amounts are held as `rust_decimal::Decimal` rounded to the currency's
//! minor unit (kobo for NGN), so repeated summation over a long ledger never
//! drifts. Every way of building a `Money` from untrusted input goes through
//! [`Money::parse`] or [`Money::try_from_f64`], which reject malformed and
//! non-finite values instead of defaulting them to zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    NGN,
    GHS,
    XOF,
    USD,
    EUR,
    GBP,
    INR,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::XOF => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::NGN => "₦",
            Currency::GHS => "GH₵",
            Currency::XOF => "CFA",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::INR => "₹",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NGN => "NGN",
            Currency::GHS => "GHS",
            Currency::XOF => "XOF",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
        }
    }

    fn minor_factor(&self) -> Decimal {
        Decimal::new(10_i64.pow(self.decimal_places()), 0)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Currency::NGN),
            "GHS" => Ok(Currency::GHS),
            "XOF" => Ok(Currency::XOF),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "INR" => Ok(Currency::INR),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Non-finite amount: {0}")]
    NonFinite(String),

    #[error("Amount {amount} has more than {places} decimal places")]
    ExcessPrecision { amount: String, places: u32 },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// The amount is always rounded to the currency's minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value, rounding to the currency's minor unit
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(currency.decimal_places()),
            currency,
        }
    }

    /// Creates Money from an integer amount in minor units (e.g., kobo)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, 0) / currency.minor_factor(), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Parses a monetary string received at an API or storage boundary
    ///
    /// Accepts plain decimal notation with optional surrounding whitespace
    /// and thousands separators (`"1,250.50"`). Rejects empty strings,
    /// `NaN`/`Infinity` spellings, and amounts finer than the minor unit.
    pub fn parse(input: &str, currency: Currency) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::InvalidAmount("empty amount".to_string()));
        }

        let lowered = trimmed.to_ascii_lowercase();
        if lowered.contains("nan") || lowered.contains("inf") {
            return Err(MoneyError::NonFinite(trimmed.to_string()));
        }

        if !separators_well_placed(trimmed) {
            return Err(MoneyError::InvalidAmount(trimmed.to_string()));
        }
        let normalized: String = trimmed.chars().filter(|c| *c != ',').collect();
        let amount = Decimal::from_str(&normalized)
            .map_err(|_| MoneyError::InvalidAmount(trimmed.to_string()))?;

        Self::exact(amount, currency)
    }

    /// Converts a floating-point amount, rejecting NaN and infinities
    pub fn try_from_f64(value: f64, currency: Currency) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NonFinite(value.to_string()));
        }
        let amount = Decimal::try_from(value)
            .map_err(|_| MoneyError::InvalidAmount(value.to_string()))?;
        Ok(Self::new(amount, currency))
    }

    /// Builds Money only if the amount needs no rounding
    pub fn exact(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let places = currency.decimal_places();
        if amount.normalize().scale() > places {
            return Err(MoneyError::ExcessPrecision {
                amount: amount.to_string(),
                places,
            });
        }
        Ok(Self::new(amount, currency))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the amount in minor units
    pub fn to_minor(&self) -> Result<i64, MoneyError> {
        (self.amount * self.currency.minor_factor())
            .to_i64()
            .ok_or(MoneyError::Overflow)
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch or overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Sums an iterator of amounts in the given currency
    pub fn checked_sum<'a, I>(values: I, currency: Currency) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{}{:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

/// Commas may only group the integer part in threes (`1,250,000.50`)
fn separators_well_placed(text: &str) -> bool {
    if !text.contains(',') {
        return true;
    }
    let unsigned = text.trim_start_matches(['-', '+']);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if fraction.contains(',') {
        return false;
    }
    let mut groups = integer.split(',');
    let leading_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()));
    leading_ok && groups.all(|g| g.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_minor_unit() {
        let m = Money::new(dec!(100.505), Currency::NGN);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::NGN);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.to_minor().unwrap(), 10050);
    }

    #[test]
    fn test_parse_rejects_nan_and_empty() {
        assert!(matches!(
            Money::parse("NaN", Currency::NGN),
            Err(MoneyError::NonFinite(_))
        ));
        assert!(matches!(
            Money::parse("  ", Currency::NGN),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::parse("12abc", Currency::NGN),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_accepts_thousands_separators() {
        let m = Money::parse("1,250.50", Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(1250.50));
        let m = Money::parse("-12,500,000", Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(-12500000));
    }

    #[test]
    fn test_parse_rejects_misplaced_separators() {
        for text in ["1,2,3", ",100", "100,", "12,50.00", "1,000.5,0", "1,,000"] {
            assert!(
                matches!(Money::parse(text, Currency::NGN), Err(MoneyError::InvalidAmount(_))),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_currency_mismatch() {
        let ngn = Money::new(dec!(100.00), Currency::NGN);
        let usd = Money::new(dec!(100.00), Currency::USD);

        let result = ngn.checked_add(&usd);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }
}
