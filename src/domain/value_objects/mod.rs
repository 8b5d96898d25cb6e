//! Value Objects for the commerce core

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CommerceError, Result};

/// Money value object
///
/// Amounts are kept at full `Decimal` precision through every calculation;
/// rounding happens only in [`Money::display_amount`], the single formatting
/// boundary for user-facing output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }

    pub fn add(&self, other: &Money) -> std::result::Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }

    pub fn subtract(&self, other: &Money) -> std::result::Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount - other.amount, &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }

    /// Fraction of this amount given a percentage in `[0, 100)`.
    pub fn percent(&self, pct: Decimal) -> Money {
        Money::new(self.amount * pct / Decimal::ONE_HUNDRED, &self.currency)
    }

    /// Amount rounded to 2 decimal places for display. The only place
    /// rounding is applied; stored amounts keep full precision.
    pub fn display_amount(&self) -> Decimal {
        self.amount.round_dp(2)
    }
}

impl Default for Money {
    fn default() -> Self { Self::zero("USD") }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_amount(), self.currency)
    }
}

#[derive(Debug, Clone)]
pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Quantity value object: a strictly positive order quantity.
///
/// Zero is not representable; cart lines reach zero only by being removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(CommerceError::InvalidQuantity("quantity must be at least 1".into()));
        }
        Ok(Self(value))
    }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}
