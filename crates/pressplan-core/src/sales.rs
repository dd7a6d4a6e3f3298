//! # Sales Allocator
//!
//! Spreads a forecast of total units sold across the months of the sales
//! window, in whole units, so that the months add back up to the forecast
//! exactly.
//!
//! ## Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  units_sold = round(units × sell_through)                    e.g. 5    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  raw[i] = round(units_sold × weight[i])        [0.7, 0.3] → [4, 2]     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  drift = units_sold − Σ raw                                 5 − 6 = −1 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  walk months 0,1,2,… (wrapping) moving one unit at a time  → [3, 2]    │
//! │  until drift = 0                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding is round-half-to-even throughout (`3.5 → 4`, `2.5 → 2`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigurationError, CoreError, CoreResult};
use crate::types::{ManufacturingCost, SalesPlan};

/// Decay of the default curve: month `i` weighs `1 / (1 + 0.6·i)`.
pub const DEFAULT_CURVE_DECAY: Decimal = dec!(0.6);

// =============================================================================
// Weights
// =============================================================================

/// Front-loaded default sales curve for `months` months, normalized to sum
/// to 1.
///
/// ## Example
/// ```rust
/// use pressplan_core::sales::default_sales_weights;
///
/// let weights = default_sales_weights(8);
/// assert_eq!(weights.len(), 8);
/// assert!(weights[0] > weights[7]);
/// assert!(default_sales_weights(0).is_empty());
/// ```
pub fn default_sales_weights(months: u32) -> Vec<Decimal> {
    let raw: Vec<Decimal> = (0..months)
        .map(|i| Decimal::ONE / (Decimal::ONE + DEFAULT_CURVE_DECAY * Decimal::from(i)))
        .collect();

    normalize_weights(&raw)
}

/// Scales relative weights so they sum to 1.
///
/// An all-zero (or empty) sequence is returned unchanged; there is nothing to
/// scale.
pub fn normalize_weights(weights: &[Decimal]) -> Vec<Decimal> {
    let total: Decimal = weights.iter().sum();
    if total.is_zero() {
        return weights.to_vec();
    }

    weights.iter().map(|w| *w / total).collect()
}

// =============================================================================
// Allocation
// =============================================================================

/// Units and orders per month of the sales window.
///
/// Index 0 is the release month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesAllocation {
    pub units_by_month: Vec<u64>,
    pub orders_by_month: Vec<u64>,
}

impl SalesAllocation {
    /// Number of months in the window.
    pub fn months(&self) -> usize {
        self.units_by_month.len()
    }

    pub fn total_units(&self) -> u64 {
        self.units_by_month.iter().sum()
    }

    pub fn total_orders(&self) -> u64 {
        self.orders_by_month.iter().sum()
    }

    /// Units and orders for a month offset, or `None` outside the window.
    pub fn month(&self, offset: i32) -> Option<(u64, u64)> {
        let index = usize::try_from(offset).ok()?;
        Some((
            *self.units_by_month.get(index)?,
            *self.orders_by_month.get(index)?,
        ))
    }
}

/// Total units expected to sell: `round(units × sell_through)`.
///
/// ## Example
/// ```rust
/// use pressplan_core::{ManufacturingCost, Money, SalesPlan};
/// use pressplan_core::sales::units_sold;
/// use rust_decimal_macros::dec;
///
/// let run = ManufacturingCost::new(560, Money::from_decimal(dec!(4294.05))).unwrap();
/// let plan = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(0.8), 8).unwrap();
/// assert_eq!(units_sold(&run, &plan).unwrap(), 448);
/// ```
pub fn units_sold(manufacturing: &ManufacturingCost, plan: &SalesPlan) -> CoreResult<u64> {
    let expected = Decimal::from(manufacturing.units()) * plan.sell_through_fraction();
    whole_units(round_half_even(expected), "units sold")
}

/// Estimated orders for a month's units: `ceil(units / avg_units_per_order)`,
/// zero when nothing sells.
pub fn orders_for_units(units: u64, avg_units_per_order: Decimal) -> CoreResult<u64> {
    if units == 0 {
        return Ok(0);
    }

    let orders = Decimal::from(units)
        .checked_div(avg_units_per_order)
        .ok_or(CoreError::Overflow {
            context: "orders per month",
        })?;

    whole_units(orders.ceil(), "orders per month")
}

/// Distributes `total` units over `weights.len()` months.
///
/// The result always sums to `total` exactly. When rounding over-assigns,
/// units are taken back one at a time walking the months in order; months
/// already at zero are passed over so no month goes negative.
///
/// ## Errors
/// - [`CoreError::EmptySalesWindow`] when `total > 0` and there are no months
/// - [`ConfigurationError::MustNotBeNegative`] for a negative weight
///
/// ## Example
/// ```rust
/// use pressplan_core::sales::allocate_units;
/// use rust_decimal_macros::dec;
///
/// let weights = [dec!(0.7), dec!(0.3)];
/// assert_eq!(allocate_units(3, &weights).unwrap(), vec![2, 1]);
/// assert_eq!(allocate_units(5, &weights).unwrap(), vec![3, 2]);
/// ```
pub fn allocate_units(total: u64, weights: &[Decimal]) -> CoreResult<Vec<u64>> {
    if weights.is_empty() {
        if total > 0 {
            return Err(CoreError::EmptySalesWindow { units: total });
        }
        return Ok(Vec::new());
    }

    if weights.iter().any(|w| *w < Decimal::ZERO) {
        return Err(ConfigurationError::MustNotBeNegative {
            field: "sales weights".to_string(),
        }
        .into());
    }

    let target = Decimal::from(total);
    let mut allocated = weights
        .iter()
        .map(|w| whole_units(round_half_even(target * *w), "monthly unit allocation"))
        .collect::<CoreResult<Vec<u64>>>()?;

    let assigned: u64 = allocated.iter().sum();
    let mut drift = i128::from(total) - i128::from(assigned);
    if drift != 0 {
        debug!(%drift, months = allocated.len(), "Correcting rounding drift in sales allocation");
    }

    let months = allocated.len();
    let mut cursor = 0usize;
    while drift != 0 {
        let month = cursor % months;
        if drift > 0 {
            allocated[month] += 1;
            drift -= 1;
        } else if allocated[month] > 0 {
            allocated[month] -= 1;
            drift += 1;
        }
        cursor += 1;
    }

    Ok(allocated)
}

/// Runs the full allocation for a release: units sold, spread over the plan's
/// weights, with per-month order estimates.
pub fn allocate_sales(
    manufacturing: &ManufacturingCost,
    plan: &SalesPlan,
) -> CoreResult<SalesAllocation> {
    let total = units_sold(manufacturing, plan)?;
    let units_by_month = allocate_units(total, &plan.weights())?;
    let orders_by_month = units_by_month
        .iter()
        .map(|units| orders_for_units(*units, plan.avg_units_per_order()))
        .collect::<CoreResult<Vec<u64>>>()?;

    debug!(
        units_sold = total,
        months = units_by_month.len(),
        "Allocated sales across window"
    );

    Ok(SalesAllocation {
        units_by_month,
        orders_by_month,
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn round_half_even(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

fn whole_units(value: Decimal, context: &'static str) -> CoreResult<u64> {
    value.to_u64().ok_or(CoreError::Overflow { context })
}

// =============================================================================
// Unit Tests
// =============================================================================
