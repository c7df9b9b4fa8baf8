//! Monetary amounts in minor units.
//!
//! Prices arrive as decimal text (`"2.5"`, `"0.05"`) and are stored as whole
//! cents so that `quantity × unit_price` sums are exact.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::ValueObject;

const MINOR_PER_MAJOR: i64 = 100;
const MAX_FRACTION_DIGITS: usize = 2;

/// Amount in the smallest currency unit (e.g. grosz, cents).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

/// Why a decimal string could not be read as [`Money`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    NotANumber(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' is too large")]
    Overflow(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self × quantity`, or `None` on overflow.
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Parse a decimal amount such as `"12"`, `"2.5"` or `"-0.05"`.
    ///
    /// At most two fractional digits are accepted; nothing is rounded.
    pub fn parse_decimal(input: &str) -> Result<Money, MoneyParseError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(MoneyParseError::NotANumber(text.to_string()));
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(MoneyParseError::TooPrecise(text.to_string()));
        }

        let overflow = || MoneyParseError::Overflow(text.to_string());

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let mut fraction_units: i64 = 0;
        for i in 0..MAX_FRACTION_DIGITS {
            let digit = fraction.as_bytes().get(i).map_or(0, |b| i64::from(b - b'0'));
            fraction_units = fraction_units * 10 + digit;
        }

        let cents = whole_units
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|c| c.checked_add(fraction_units))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Display adapter with thousands separators: `1,234,567.89`.
    pub fn grouped(&self) -> Grouped {
        Grouped(*self)
    }

    fn split(&self) -> (&'static str, u64, u64) {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        (sign, abs / MINOR_PER_MAJOR as u64, abs % MINOR_PER_MAJOR as u64)
    }
}

/// Always two decimal places, no grouping: `1234.50`.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (sign, major, minor) = self.split();
        write!(f, "{sign}{major}.{minor:02}")
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

/// See [`Money::grouped`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grouped(Money);

impl core::fmt::Display for Grouped {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (sign, major, minor) = self.0.split();
        let digits = major.to_string();

        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }

        write!(f, "{sign}{out}.{minor:02}")
    }
}
