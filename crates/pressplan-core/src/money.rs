//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    4294.05 / 560 × 560 = 4294.049999999999  ❌ WRONG!                   │
//! │                                                                         │
//! │  Release plans divide all the time: cost per unit, fractions of the    │
//! │  marketing budget, deposit splits. Cents-as-integers can't hold        │
//! │  $7.667946... per unit either.                                          │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimal                                            │
//! │    28 significant digits, base 10, rounded only for display            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pressplan_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let price = Money::from_decimal(dec!(35));
//! let gross = price.multiply_quantity(560);
//! assert_eq!(gross.to_string(), "$19,600.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the release's currency (dollars).
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values are outflows and running deficits
/// - **No rounding on arithmetic**: intermediate values keep full precision,
///   only [`Money::round_cents`] and `Display` round
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ManufacturingCost.total_cost ──┬──► deposit / balance outflows        │
/// │  FixedReleaseCosts.* ───────────┤                                       │
/// │                                 └──► PnlSummary.total_cost_basis       │
/// │                                                                         │
/// │  SalesPlan.unit_price ──► gross ──► fees ──► CashFlowRow.cash_in       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from a decimal dollar amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// ## Example
    /// ```rust
    /// use pressplan_core::money::Money;
    ///
    /// let deposit = Money::from_major_minor(2147, 2);
    /// assert_eq!(deposit.to_string(), "$2,147.02");
    ///
    /// let shortfall = Money::from_major_minor(-5, 50);
    /// assert_eq!(shortfall.to_string(), "-$5.50");
    /// ```
    ///
    /// ## Note
    /// For negative amounts only the major unit carries the sign.
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        let cents = if major < 0 {
            i128::from(major) * 100 - i128::from(minor)
        } else {
            i128::from(major) * 100 + i128::from(minor)
        };
        Money(Decimal::from_i128_with_scale(cents, 2))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds to whole cents using Bankers Rounding (round half to even).
    ///
    /// ```text
    /// 0.125 → 0.12    0.135 → 0.14    (ties go to the even cent)
    /// ```
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Multiplies money by a unit or order count.
    ///
    /// ## Example
    /// ```rust
    /// use pressplan_core::money::Money;
    ///
    /// let fee = Money::from_major_minor(0, 30);
    /// assert_eq!(fee.multiply_quantity(560).to_string(), "$168.00");
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies money by an arbitrary factor (budget fractions, splits).
    #[inline]
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Spreads the amount evenly over `units` (must be non-zero).
    ///
    /// Returns `None` for zero units instead of dividing by zero.
    pub fn per_unit(&self, units: u64) -> Option<Self> {
        if units == 0 {
            return None;
        }
        Some(Money(self.0 / Decimal::from(units)))
    }

    /// Calculates the percentage part of a processing fee.
    ///
    /// No rounding happens here; processors settle per transaction and the
    /// plan works with the expected value.
    ///
    /// ## Example
    /// ```rust
    /// use pressplan_core::money::Money;
    /// use pressplan_core::types::Rate;
    ///
    /// let gross = Money::from_major_minor(19_600, 0);
    /// let fee = gross.calculate_fee(Rate::from_bps(290));
    /// assert_eq!(fee.to_string(), "$568.40");
    /// ```
    #[inline]
    pub fn calculate_fee(&self, rate: Rate) -> Money {
        Money(self.0 * rate.fraction())
    }

    // -------------------------------------------------------------------------
    // Checked arithmetic
    // -------------------------------------------------------------------------
    //
    // Record constructors bound signs and ranges but not magnitudes, so the
    // calculators use these and report `None` as `CoreError::Overflow`.

    /// `self + other`, or `None` past the decimal range.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self - other`, or `None` past the decimal range.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// [`Money::multiply_quantity`] without the panic.
    ///
    /// ## Example
    /// ```rust
    /// use pressplan_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_decimal(Decimal::MAX);
    /// assert!(price.checked_multiply_quantity(2).is_none());
    /// assert!(price.checked_multiply_quantity(1).is_some());
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: u64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// [`Money::scale`] without the panic.
    #[inline]
    pub fn checked_scale(&self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the report currency format: `$` + thousands separators +
/// two decimals, with a leading `-` for negative amounts (`-$1,234.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.2}", rounded.abs());
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        write!(f, "{}${}.{}", sign, group_thousands(whole), cents)
    }
}

/// Inserts `,` every three digits from the right.
fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
