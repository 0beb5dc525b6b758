//! Type-safe price representation using decimal arithmetic.
//!
//! All money in KeyMint is carried as [`rust_decimal::Decimal`] - never as a
//! binary float - so cart totals and wallet debits stay exact. Display
//! rounding uses half-up ([`RoundingStrategy::MidpointAwayFromZero`]) to two
//! decimal places.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for display and rounding.
pub const CURRENCY_SCALE: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Create a price from whole currency units (e.g., `49` -> $49).
    #[must_use]
    pub fn from_units(units: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::from(units), currency_code)
    }

    /// Create a price from the smallest currency unit (e.g., cents for USD).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, CURRENCY_SCALE), currency_code)
    }

    /// Multiply by a quantity, e.g. to compute a cart line total.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Add another price. The currency of `self` wins; the demo catalog is
    /// single-currency so mixed-currency sums do not arise in practice.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(self.amount + other.amount, self.currency_code)
    }

    /// Round to two decimal places using half-up rounding.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
            self.currency_code,
        )
    }
}

impl fmt::Display for Price {
    /// Format for display (e.g., `$19.99`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_from_units() {
        let price = Price::from_units(49, CurrencyCode::USD);
        assert_eq!(price.amount, Decimal::from(49));
    }

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(4999, CurrencyCode::USD);
        assert_eq!(price.amount, Decimal::new(4999, 2));
        assert_eq!(price.to_string(), "$49.99");
    }

    #[test]
    fn test_times_and_plus() {
        let price = Price::from_units(49, CurrencyCode::USD);
        let line = price.times(3);
        assert_eq!(line.amount, Decimal::from(147));

        let sum = line.plus(&Price::from_units(99, CurrencyCode::USD));
        assert_eq!(sum.amount, Decimal::from(246));
    }

    #[test]
    fn test_rounded_half_up() {
        // 14.805 rounds up, not to even
        let price = Price::new(Decimal::new(14_805, 3), CurrencyCode::USD);
        assert_eq!(price.rounded().amount, Decimal::new(1481, 2));

        let price = Price::new(Decimal::new(14_804, 3), CurrencyCode::USD);
        assert_eq!(price.rounded().amount, Decimal::new(1480, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_units(49, CurrencyCode::USD).to_string(), "$49.00");
        assert_eq!(Price::from_cents(1480, CurrencyCode::GBP).to_string(), "\u{a3}14.80");
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!(CurrencyCode::from_str("usd").unwrap(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::from_str("EUR").unwrap(), CurrencyCode::EUR);
        assert!(CurrencyCode::from_str("JPY").is_err());
    }

    #[test]
    fn test_serde_amount_as_string() {
        let price = Price::from_cents(4900, CurrencyCode::USD);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, r#"{"amount":"49.00","currency_code":"USD"}"#);

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
