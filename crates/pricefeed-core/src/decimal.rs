//! Precision-safe decimal price type.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. Prices are never routed
//! through binary floating point: JSON numbers are parsed from their textual
//! form, and conversion, averaging and formatting all stay in `Decimal`.

use crate::error::{CoreError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept by [`PriceFormat::FixedPrecision`] by default.
pub const DEFAULT_FRACTION_DIGITS: u32 = 9;

/// Price with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for any value strictly below zero. `-0` is not negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// `None` when the product leaves the `Decimal` range.
    #[inline]
    pub fn checked_mul(&self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    /// Parse a price out of a JSON value.
    ///
    /// Accepts JSON strings (`"1.0001"`) and JSON numbers (`1.0001`, `1e-4`).
    /// serde_json keeps numbers as their source text (`arbitrary_precision`),
    /// so every digit the source sent reaches the `Decimal`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            serde_json::Value::Number(n) => n.to_string().parse(),
            other => Err(CoreError::InvalidPrice(format!(
                "expected string or number, got {other}"
            ))),
        }
    }

    /// Render this price using the given convention.
    pub fn format(&self, format: PriceFormat) -> String {
        format.render(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = CoreError;

    /// Parses plain (`"20.5"`) and scientific (`"2.05e1"`) notation.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match Decimal::from_str(s) {
            Ok(d) => Ok(Self(d)),
            Err(_) if s.contains(['e', 'E']) => Ok(Self(Decimal::from_scientific(s)?)),
            Err(e) => Err(e.into()),
        }
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Output convention for rendered prices.
///
/// A single resolution run uses exactly one convention for every symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormat {
    /// Round half-even to N fractional digits, then strip trailing zeros
    /// and a dangling decimal point.
    FixedPrecision(u32),
    /// Minimal exact decimal form. No rounding.
    Exact,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self::FixedPrecision(DEFAULT_FRACTION_DIGITS)
    }
}

impl PriceFormat {
    /// Render a decimal. Never produces scientific notation.
    pub fn render(&self, value: Decimal) -> String {
        let value = match self {
            Self::FixedPrecision(digits) => {
                value.round_dp_with_strategy(*digits, RoundingStrategy::MidpointNearestEven)
            }
            Self::Exact => value,
        };
        if value.is_zero() {
            return "0".to_string();
        }
        value.normalize().to_string()
    }
}

impl FromStr for PriceFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(Self::default()),
            "exact" => Ok(Self::Exact),
            other => Err(CoreError::InvalidPrice(format!(
                "unknown price format '{other}' (expected fixed or exact)"
            ))),
        }
    }
}
