//! Shared validation and rounding helpers.
//!
//! Pure functions used by the forms, the wizard gates, and the totals
//! computation.

use rust_decimal::{Decimal, RoundingStrategy};

use keymint_core::{Email, price::CURRENCY_SCALE};

/// A recoverable, field-scoped validation failure.
///
/// Rendered next to the offending field; never raised as a hard error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Whether the input contains anything besides whitespace.
#[must_use]
pub fn non_empty(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether the input parses as an email address.
#[must_use]
pub fn valid_email(s: &str) -> bool {
    Email::parse(s.trim()).is_ok()
}

/// Round a currency amount to two decimal places, half-up.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert!(non_empty("Acme"));
        assert!(!non_empty(""));
        assert!(!non_empty("   "));
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("  user@example.com  ")); // form inputs arrive untrimmed
        assert!(!valid_email("user@nodot"));
        assert!(!valid_email(""));
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(Decimal::new(14_805, 3)), Decimal::new(1481, 2));
        assert_eq!(round_currency(Decimal::new(14_804, 3)), Decimal::new(1480, 2));
        assert_eq!(round_currency(Decimal::new(55, 1)), Decimal::new(550, 2));
    }
}
