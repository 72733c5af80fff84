//! # Money Module
//!
//! Provides the `Rupiah` type for handling monetary values safely.
//!
//! ## Why Integer Rupiah?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a year of ledger rows as f64 drifts:                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Rupiah has no minor unit in day-to-day retail, so every amount in      │
//! │  the sheet is a whole number of rupiah. We keep it that way: i64.       │
//! │                                                                         │
//! │    harga_beli 2.500 × stok 100 = 250.000   (exact, always)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sheet Input
//! The spreadsheet endpoint is loosely typed: a cell may come back as `2500`,
//! `2500.0`, `"2500"` or `""`. Deserialization accepts all of them and turns
//! anything unusable into zero, which is what the cash book has always shown
//! for a blank cell.
//!
//! ## Usage
//! ```rust
//! use amsa_core::money::Rupiah;
//!
//! let price = Rupiah::new(3500);
//! let line = price * 3;
//! assert_eq!(line.amount(), 10_500);
//! assert_eq!(line.to_string(), "Rp 10.500");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Rupiah Type
// =============================================================================

/// A monetary value in whole Indonesian rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: cash balance and surplus can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Bare number on the wire**: matches the sheet columns
/// - **Saturating arithmetic**: a runaway sheet cell pins at `i64::MAX`
///   instead of wrapping or panicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Rupiah(#[ts(type = "number")] i64);

impl Rupiah {
    /// Creates a value from whole rupiah.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Returns the amount in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Rupiah(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Rupiah(self.0.saturating_abs())
    }

    /// Negative values become zero.
    ///
    /// Used for chart slices: an overdrawn cash book still renders as an
    /// empty slice instead of a negative one.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Rupiah(0)
        } else {
            Rupiah(self.0)
        }
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use amsa_core::money::Rupiah;
    ///
    /// let harga_beli = Rupiah::new(3000);
    /// assert_eq!(harga_beli.multiply_quantity(48).amount(), 144_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Rupiah(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats as `Rp 1.900.000` (Indonesian thousands separator).
impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Rupiah {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Rupiah {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientAmountVisitor).map(Rupiah)
    }
}

/// Accepts numbers, numeric strings, blanks and nulls.
pub(crate) struct LenientAmountVisitor;

impl<'de> Visitor<'de> for LenientAmountVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or an empty cell")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        Ok(i64::try_from(v).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        Ok(round_to_amount(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let v = v.trim();
        if let Ok(n) = v.parse::<i64>() {
            return Ok(n);
        }
        Ok(v.parse::<f64>().map(round_to_amount).unwrap_or(0))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(LenientAmountVisitor)
    }
}

/// Rounds to whole rupiah. NaN and infinities read as 0; anything beyond
/// the i64 range is clamped to its nearest end.
fn round_to_amount(v: f64) -> i64 {
    const LIMIT: f64 = i64::MAX as f64;
    if !v.is_finite() {
        0
    } else if v >= LIMIT {
        i64::MAX
    } else if v <= -LIMIT {
        i64::MIN
    } else {
        v.round() as i64
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Add for Rupiah {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Rupiah(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Rupiah {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Rupiah {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Rupiah(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Rupiah {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Rupiah {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Rupiah(self.0.saturating_neg())
    }
}

impl Mul<i64> for Rupiah {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Rupiah(self.0.saturating_mul(qty))
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Rupiah>>(iter: I) -> Self {
        iter.fold(Rupiah::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Rupiah> for Rupiah {
    fn sum<I: Iterator<Item = &'a Rupiah>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
