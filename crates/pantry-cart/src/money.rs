//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation to avoid floating-point
//! precision issues in totals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents
/// for USD). All arithmetic is checked and returns `None` on overflow or
/// currency mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse a non-negative decimal string such as `"3.49"`.
    ///
    /// Returns `None` for malformed input, negative amounts, or more
    /// fractional digits than the currency allows.
    ///
    /// ```
    /// use pantry_cart::money::{Currency, Money};
    /// assert_eq!(Money::parse("3.49", Currency::USD), Some(Money::new(349, Currency::USD)));
    /// assert_eq!(Money::parse("2.5", Currency::USD), Some(Money::new(250, Currency::USD)));
    /// assert_eq!(Money::parse("1.999", Currency::USD), None);
    /// ```
    pub fn parse(input: &str, currency: Currency) -> Option<Self> {
        let input = input.trim();
        let places = currency.decimal_places() as usize;
        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if frac.len() > places || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if input.contains('.') && frac.is_empty() {
            return None;
        }

        let scale = 10_i64.checked_pow(places as u32)?;
        let whole: i64 = whole.parse().ok()?;
        let mut minor: i64 = 0;
        if !frac.is_empty() {
            let padded = format!("{:0<width$}", frac, width = places);
            minor = padded.parse().ok()?;
        }
        let amount = whole.checked_mul(scale)?.checked_add(minor)?;
        Some(Self::new(amount, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Add another Money value of the same currency.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values in `currency`.
    ///
    /// Returns `None` on overflow or if any value is in another currency.
    pub fn checked_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        if places == 0 {
            return format!("{}{}", sign, abs);
        }
        let scale = 10_u64.pow(places);
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = places as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(5, Currency::USD).display(), "$0.05");
        assert_eq!(Money::new(-250, Currency::EUR).display_amount(), "-2.50");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_money_parse() {
        assert_eq!(Money::parse("10", Currency::USD).unwrap().amount_cents, 1000);
        assert_eq!(Money::parse("0.99", Currency::USD).unwrap().amount_cents, 99);
        assert_eq!(Money::parse(" 4.5 ", Currency::GBP).unwrap().amount_cents, 450);
        assert_eq!(Money::parse("300", Currency::JPY).unwrap().amount_cents, 300);
    }

    #[test]
    fn test_money_parse_rejects_garbage() {
        assert!(Money::parse("", Currency::USD).is_none());
        assert!(Money::parse("-1.00", Currency::USD).is_none());
        assert!(Money::parse("1.", Currency::USD).is_none());
        assert!(Money::parse(".5", Currency::USD).is_none());
        assert!(Money::parse("1.234", Currency::USD).is_none());
        assert!(Money::parse("1.5", Currency::JPY).is_none());
        assert!(Money::parse("abc", Currency::USD).is_none());
        assert!(Money::parse("99999999999999999999", Currency::USD).is_none());
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.checked_add(&eur).is_none());
        assert_eq!(usd.checked_add(&usd).unwrap().amount_cents, 2000);
    }

    #[test]
    fn test_checked_mul_overflow() {
        let m = Money::new(i64::MAX / 2, Currency::USD);
        assert!(m.checked_mul(3).is_none());
        assert_eq!(Money::new(250, Currency::USD).checked_mul(4).unwrap().amount_cents, 1000);
    }

    #[test]
    fn test_checked_sum() {
        let values = [Money::new(100, Currency::USD), Money::new(250, Currency::USD)];
        assert_eq!(
            Money::checked_sum(&values, Currency::USD),
            Some(Money::new(350, Currency::USD))
        );
        assert_eq!(
            Money::checked_sum(std::iter::empty::<&Money>(), Currency::CAD),
            Some(Money::zero(Currency::CAD))
        );
        assert!(Money::checked_sum(&values, Currency::EUR).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
