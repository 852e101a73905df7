//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog API reports prices as bare JSON numbers in the store's
//! currency, so [`Price`] carries the amount and the currency separately and
//! only the amount goes over the wire.

use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a price from a string.
#[derive(Debug, Error)]
#[error("Invalid price: {0}")]
pub struct ParsePriceError(String);

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

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    /// Adds two prices. The left-hand currency wins; carts are single-currency.
    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }
}

impl FromStr for Price {
    type Err = ParsePriceError;

    /// Parses a bare decimal amount as USD.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(|amount| Self::new(amount, CurrencyCode::default()))
            .map_err(|e| ParsePriceError(format!("{s}: {e}")))
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
    BRL,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::BRL => "R$",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::BRL => "BRL",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "BRL" => Ok(Self::BRL),
            other => Err(ParsePriceError(format!("unknown currency {other}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_round_trip() {
        for code in ["usd", "EUR", "brl"] {
            let parsed: CurrencyCode = code.parse().unwrap();
            assert_eq!(parsed.code(), code.to_ascii_uppercase());
        }
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price: Price = "139.9".parse().unwrap();
        assert_eq!(price.display(), "$139.90");

        let price = Price::new(Decimal::new(179_999, 3), CurrencyCode::BRL);
        assert_eq!(price.to_string(), "R$180.00");
    }

    #[test]
    fn test_line_total() {
        let price: Price = "19.99".parse().unwrap();
        let total = price * 3;
        assert_eq!(total.amount, Decimal::new(5997, 2));
    }

    #[test]
    fn test_sum_keeps_currency() {
        let a = Price::new(Decimal::ONE, CurrencyCode::EUR);
        let b = Price::new(Decimal::TWO, CurrencyCode::EUR);
        let sum = a + b;
        assert_eq!(sum.amount, Decimal::from(3));
        assert_eq!(sum.currency_code, CurrencyCode::EUR);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("nineteen".parse::<Price>().is_err());
    }
}
