//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Catalog prices are
//! currency-agnostic units, so arithmetic works on the amount and carries
//! the left-hand currency along as a display tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Cents in one whole currency unit.
const CENTS_PER_UNIT: i64 = 100;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "EUR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "€").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            "GBP" => Some(Currency::GBP),
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
/// Amounts are stored in cents. This avoids floating-point precision issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from whole currency units.
    pub const fn from_units(units: i64, currency: Currency) -> Self {
        Self::new(units * CENTS_PER_UNIT, currency)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use pixelmart_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(4.99, Currency::EUR);
    /// assert_eq!(price.amount_cents, 499);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * CENTS_PER_UNIT as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub const fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is an exact number of whole units.
    pub fn is_whole(&self) -> bool {
        self.amount_cents % CENTS_PER_UNIT == 0
    }

    /// Round up to the next whole currency unit.
    ///
    /// ```
    /// use pixelmart_commerce::money::{Money, Currency};
    /// let m = Money::new(120_499, Currency::EUR);
    /// assert_eq!(m.ceil_to_unit().amount_cents, 120_500);
    /// ```
    pub fn ceil_to_unit(&self) -> Money {
        let rem = self.amount_cents.rem_euclid(CENTS_PER_UNIT);
        if rem == 0 {
            *self
        } else {
            Money::new(self.amount_cents + (CENTS_PER_UNIT - rem), self.currency)
        }
    }

    /// Whole units, rounding up any fraction.
    pub fn ceil_units(&self) -> i64 {
        self.ceil_to_unit().amount_cents / CENTS_PER_UNIT
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / CENTS_PER_UNIT as f64
    }

    /// Format for display in the storefront style (e.g., "1.199 €", "4,99 €").
    ///
    /// Whole amounts drop the decimals; thousands are grouped with `.` and
    /// the decimal separator is `,`.
    pub fn display(&self) -> String {
        format!("{} {}", self.display_amount(), self.currency.symbol())
    }

    /// Format the amount without the symbol (e.g., "1.199").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        let units = group_thousands(abs / CENTS_PER_UNIT as u64);
        let cents = abs % CENTS_PER_UNIT as u64;
        if cents == 0 {
            format!("{sign}{units}")
        } else {
            format!("{sign}{units},{cents:02}")
        }
    }

    /// Add another Money value, keeping this value's currency.
    pub fn saturating_add(&self, other: &Money) -> Money {
        Money::new(
            self.amount_cents.saturating_add(other.amount_cents),
            self.currency,
        )
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values.
    pub fn sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Money {
        iter.fold(Money::zero(currency), |acc, m| acc.saturating_add(m))
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(".")
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(&other)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money::new(self.amount_cents.saturating_mul(factor), self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
