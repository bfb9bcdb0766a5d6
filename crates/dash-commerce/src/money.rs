//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest unit of the checkout currency (whole
//! dong for VND). All arithmetic saturates instead of overflowing, and
//! percentage math runs in `i128` with round-half-away-from-zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    VND,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "VND").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::VND => "VND",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::VND => "\u{0111}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::VND => 0,
            _ => 2,
        }
    }

    fn thousands_separator(&self) -> char {
        match self {
            Currency::VND => '.',
            _ => ',',
        }
    }

    fn symbol_is_suffix(&self) -> bool {
        matches!(self, Currency::VND)
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "VND" => Some(Currency::VND),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An amount in minor units.
///
/// The currency is a checkout-wide setting (see `PricingConfig`), so it is not
/// carried per value. On the wire a `Money` is a bare integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Create from minor units.
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Amount in minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if this is positive.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if this is negative.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Money {
        Money(self.0.max(0))
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Multiply by a quantity.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    /// `percent`% of this amount, rounded half away from zero.
    ///
    /// ```
    /// use dash_commerce::Money;
    /// assert_eq!(Money::new(100_000).percentage(15), Money::new(15_000));
    /// assert_eq!(Money::new(15).percentage(50), Money::new(8));
    /// ```
    pub fn percentage(self, percent: i64) -> Money {
        Money(div_round(i128::from(self.0) * i128::from(percent), 100))
    }

    /// `bps` basis points (1/100 of a percent) of this amount, rounded half away from zero.
    pub fn basis_points(self, bps: u32) -> Money {
        Money(div_round(i128::from(self.0) * i128::from(bps), 10_000))
    }

    /// Format for display in the given currency.
    ///
    /// ```
    /// use dash_commerce::{Currency, Money};
    /// assert_eq!(Money::new(49_000).display(Currency::VND), "49.000\u{0111}");
    /// assert_eq!(Money::new(4_999).display(Currency::USD), "$49.99");
    /// ```
    pub fn display(self, currency: Currency) -> String {
        let places = currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let abs = self.0.unsigned_abs();

        let mut amount = group_thousands(abs / divisor, currency.thousands_separator());
        if places > 0 {
            amount.push('.');
            amount.push_str(&format!(
                "{:0width$}",
                abs % divisor,
                width = places as usize
            ));
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        if currency.symbol_is_suffix() {
            format!("{}{}{}", sign, amount, currency.symbol())
        } else {
            format!("{}{}{}", sign, currency.symbol(), amount)
        }
    }
}

fn div_round(numerator: i128, denominator: i128) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let rounded = if 2 * remainder.abs() >= denominator.abs() {
        quotient + numerator.signum() * denominator.signum()
    } else {
        quotient
    };
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        self.saturating_sub(other)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl From<i64> for Money {
    fn from(minor_units: i64) -> Self {
        Money(minor_units)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(Currency::default()))
    }
}
