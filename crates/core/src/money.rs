//! Monetary amounts.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Most decimal places an amount may carry (whole cents).
pub const MAX_SCALE: u32 = 2;

/// Most digits an amount may have before the decimal point.
pub const MAX_INTEGER_DIGITS: u32 = 10;

/// A non-negative decimal amount of money (currency is implied by the shop).
///
/// Amounts are kept as raw decimals; rendering them as currency is left to
/// the presentation layer. They fit a `NUMERIC(12, 2)` column exactly: at most
/// two decimal places and ten integer digits, so no store has to round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wrap a decimal, rejecting negative values, sub-cent precision and
    /// values of ten billion or more.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Decimal::ZERO {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        // Trailing zeros ("10.500") are not extra precision.
        if value.normalize().scale() > MAX_SCALE {
            return Err(DomainError::validation(format!(
                "amount cannot have more than {MAX_SCALE} decimal places, got {value}"
            )));
        }
        if value >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
            return Err(DomainError::validation(format!(
                "amount cannot have more than {MAX_INTEGER_DIGITS} integer digits, got {value}"
            )));
        }
        // "-0" parses as a signed zero; store it as a plain zero.
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        Ok(Self(value))
    }

    /// Parse a raw form value such as `"350.00"`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::validation("amount is required"));
        }
        let value = Decimal::from_str(raw)
            .map_err(|_| DomainError::validation(format!("amount is not a number: {raw:?}")))?;
        Self::new(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Amount {}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
