//! # Domain Types
//!
//! The parameter records every calculation consumes.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Parameters                               │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ManufacturingCost │  │FixedReleaseCosts │  │PaymentProcessorFees  │  │
//! │  │ ──────────────── │  │ ──────────────── │  │ ──────────────────── │  │
//! │  │ units            │  │ marketing        │  │ percentage_rate      │  │
//! │  │ total_cost       │  │ mastering        │  │ fixed_fee_per_order  │  │
//! │  └──────────────────┘  │ artwork          │  └──────────────────────┘  │
//! │                        └──────────────────┘                             │
//! │  ┌──────────────────┐  ┌──────────────────────────────────────────┐    │
//! │  │    SalesPlan     │  │            CashFlowSchedule              │    │
//! │  │ ──────────────── │  │ ──────────────────────────────────────── │    │
//! │  │ unit_price       │  │ release_date                             │    │
//! │  │ avg_units/order  │  │ deposit fraction + PaymentOffsets        │    │
//! │  │ sell_through     │  │ marketing_profile: [MarketingSlice]      │    │
//! │  │ window, weights  │  └──────────────────────────────────────────┘    │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  P&L Calculator      ◄── first four records                            │
//! │  Timeline Builder    ◄── all five                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Construction Rules
//! Every record is immutable and built through a validating constructor that
//! returns [`CoreResult`]. Fields are private: a record that exists is a
//! record that passed validation. `Default` impls reproduce the label's
//! standard 560-unit pressing plan.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ConfigurationError, CoreError, CoreResult};
use crate::money::Money;
use crate::sales::{default_sales_weights, normalize_weights};
use crate::validation::{
    validate_fraction, validate_fraction_sum, validate_length, validate_month_offset,
    validate_non_negative, validate_positive, validate_rate, validate_units, validate_window,
};

// =============================================================================
// Rate
// =============================================================================

/// A proportional rate stored as a plain fraction.
///
/// `0.029` = 2.9%. Basis points are accepted for convenience
/// (1 bps = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(#[ts(type = "number")] Decimal);

impl Rate {
    /// Creates a rate from a fraction (`0.029` for 2.9%).
    #[inline]
    pub const fn from_fraction(fraction: Decimal) -> Self {
        Rate(fraction)
    }

    /// Creates a rate from basis points (`290` for 2.9%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::new(i64::from(bps), 4))
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// What's left of a sale after the rate is taken (`1 - rate`).
    #[inline]
    pub fn complement(&self) -> Decimal {
        Decimal::ONE - self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(Decimal::ZERO)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Manufacturing
// =============================================================================

/// One pressing run: how many units, and what the plant charged in total.
///
/// `total_cost` is the all-in invoice (plates, pressing, jackets, inbound
/// freight).
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ManufacturingCost {
    units: u32,
    total_cost: Money,
}

impl ManufacturingCost {
    /// Creates a validated manufacturing run.
    ///
    /// ## Rules
    /// - `units > 0`
    /// - `total_cost >= 0`
    pub fn new(units: u32, total_cost: Money) -> CoreResult<Self> {
        validate_units("units", units)?;
        validate_non_negative("manufacturing.total_cost", total_cost.amount())?;

        Ok(Self { units, total_cost })
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// Manufacturing cost of a single unit.
    pub fn cost_per_unit(&self) -> Money {
        // units > 0 is a constructor invariant
        self.total_cost
            .per_unit(u64::from(self.units))
            .unwrap_or_default()
    }
}

impl Default for ManufacturingCost {
    fn default() -> Self {
        Self {
            units: 560,
            total_cost: Money::from_decimal(dec!(4294.05)),
        }
    }
}

// =============================================================================
// Fixed Release Costs
// =============================================================================

/// Costs paid once per release regardless of how many units sell.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct FixedReleaseCosts {
    marketing: Money,
    mastering: Money,
    artwork: Money,
}

impl FixedReleaseCosts {
    /// Creates validated fixed costs (all must be non-negative, and their
    /// total representable).
    pub fn new(marketing: Money, mastering: Money, artwork: Money) -> CoreResult<Self> {
        validate_non_negative("fixed_costs.marketing", marketing.amount())?;
        validate_non_negative("fixed_costs.mastering", mastering.amount())?;
        validate_non_negative("fixed_costs.artwork", artwork.amount())?;
        marketing
            .checked_add(mastering)
            .and_then(|sum| sum.checked_add(artwork))
            .ok_or(CoreError::Overflow {
                context: "fixed release costs",
            })?;

        Ok(Self {
            marketing,
            mastering,
            artwork,
        })
    }

    pub fn marketing(&self) -> Money {
        self.marketing
    }

    pub fn mastering(&self) -> Money {
        self.mastering
    }

    pub fn artwork(&self) -> Money {
        self.artwork
    }

    /// Marketing + mastering + artwork. Checked at construction.
    pub fn total(&self) -> Money {
        self.marketing + self.mastering + self.artwork
    }
}

impl Default for FixedReleaseCosts {
    fn default() -> Self {
        Self {
            marketing: Money::from_decimal(dec!(5000)),
            mastering: Money::from_decimal(dec!(2000)),
            artwork: Money::from_decimal(dec!(1000)),
        }
    }
}

// =============================================================================
// Payment Processor Fees
// =============================================================================

/// Storefront payment processing: a percentage of gross plus a flat fee per
/// order.
///
/// ```text
/// fee(order) = gross × percentage_rate + fixed_fee_per_order
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PaymentProcessorFees {
    percentage_rate: Rate,
    fixed_fee_per_order: Money,
}

impl PaymentProcessorFees {
    /// Creates a validated fee structure.
    ///
    /// ## Rules
    /// - `percentage_rate` in `[0, 1)`
    /// - `fixed_fee_per_order >= 0`
    pub fn new(percentage_rate: Rate, fixed_fee_per_order: Money) -> CoreResult<Self> {
        validate_rate("fees.percentage_rate", percentage_rate.fraction())?;
        validate_non_negative("fees.fixed_fee_per_order", fixed_fee_per_order.amount())?;

        Ok(Self {
            percentage_rate,
            fixed_fee_per_order,
        })
    }

    pub fn percentage_rate(&self) -> Rate {
        self.percentage_rate
    }

    pub fn fixed_fee_per_order(&self) -> Money {
        self.fixed_fee_per_order
    }

    /// Total processing fees on `gross` taken over `orders` orders.
    pub fn fees_for(&self, gross: Money, orders: u64) -> CoreResult<Money> {
        let overflow = CoreError::Overflow {
            context: "processing fees",
        };
        // rate < 1, so the percentage part never exceeds gross
        let percentage = gross.calculate_fee(self.percentage_rate);
        self.fixed_fee_per_order
            .checked_multiply_quantity(orders)
            .and_then(|flat| percentage.checked_add(flat))
            .ok_or(overflow)
    }
}

impl Default for PaymentProcessorFees {
    fn default() -> Self {
        Self {
            percentage_rate: Rate::from_bps(290),
            fixed_fee_per_order: Money::from_major_minor(0, 30),
        }
    }
}

// =============================================================================
// Sales Plan
// =============================================================================

/// How the pressing is expected to sell.
///
/// ## Sales Curve
/// Sales start in the release month (offset 0) and run for
/// `sales_window_months`. Without explicit weights a front-loaded curve is
/// used:
/// ```text
/// weight[i] ∝ 1 / (1 + 0.6·i)
///
/// month:   0     1     2     3     4  ...
///          ████  ███   ██    ██    █
/// ```
/// Supplied weights are relative; they are normalized before allocation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SalesPlan {
    unit_price: Money,
    #[ts(type = "number")]
    avg_units_per_order: Decimal,
    #[ts(type = "number")]
    sell_through_fraction: Decimal,
    sales_window_months: u32,
    #[ts(type = "Array<number> | null")]
    monthly_weights: Option<Vec<Decimal>>,
}

impl SalesPlan {
    /// Creates a validated sales plan using the default sales curve.
    ///
    /// ## Rules
    /// - `unit_price > 0`
    /// - `avg_units_per_order > 0`
    /// - `sell_through_fraction` in `[0, 1]`
    /// - `sales_window_months` at most [`MAX_PLAN_MONTHS`](crate::validation::MAX_PLAN_MONTHS)
    pub fn new(
        unit_price: Money,
        avg_units_per_order: Decimal,
        sell_through_fraction: Decimal,
        sales_window_months: u32,
    ) -> CoreResult<Self> {
        validate_positive("sales.unit_price", unit_price.amount())?;
        validate_positive("sales.avg_units_per_order", avg_units_per_order)?;
        validate_fraction("sales.sell_through_fraction", sell_through_fraction)?;
        validate_window("sales.sales_window_months", sales_window_months)?;

        Ok(Self {
            unit_price,
            avg_units_per_order,
            sell_through_fraction,
            sales_window_months,
            monthly_weights: None,
        })
    }

    /// Replaces the default curve with explicit per-month weights.
    ///
    /// ## Rules
    /// - one weight per month of the sales window
    /// - every weight `>= 0`
    /// - at least one weight `> 0` when the window is non-empty
    ///
    /// ## Example
    /// ```rust
    /// use pressplan_core::{Money, SalesPlan};
    /// use rust_decimal_macros::dec;
    ///
    /// let plan = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(1), 2).unwrap();
    /// assert!(plan.clone().with_monthly_weights(vec![dec!(7), dec!(3)]).is_ok());
    /// assert!(plan.with_monthly_weights(vec![dec!(1)]).is_err());
    /// ```
    pub fn with_monthly_weights(mut self, weights: Vec<Decimal>) -> CoreResult<Self> {
        validate_length(
            "sales.monthly_weights",
            self.sales_window_months as usize,
            weights.len(),
        )?;
        for weight in &weights {
            validate_non_negative("sales.monthly_weights", *weight)?;
        }
        if !weights.is_empty() {
            let total = weights
                .iter()
                .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w))
                .ok_or(CoreError::Overflow {
                    context: "sales.monthly_weights (sum)",
                })?;
            validate_positive("sales.monthly_weights (sum)", total)?;
        }

        self.monthly_weights = Some(weights);
        Ok(self)
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn avg_units_per_order(&self) -> Decimal {
        self.avg_units_per_order
    }

    pub fn sell_through_fraction(&self) -> Decimal {
        self.sell_through_fraction
    }

    pub fn sales_window_months(&self) -> u32 {
        self.sales_window_months
    }

    /// The weights exactly as supplied, if any.
    pub fn monthly_weights(&self) -> Option<&[Decimal]> {
        self.monthly_weights.as_deref()
    }

    /// Normalized weights (sum to 1) for every month of the window.
    pub fn weights(&self) -> Vec<Decimal> {
        match &self.monthly_weights {
            Some(weights) => normalize_weights(weights),
            None => default_sales_weights(self.sales_window_months),
        }
    }
}

impl Default for SalesPlan {
    fn default() -> Self {
        Self {
            unit_price: Money::from_decimal(dec!(35)),
            avg_units_per_order: Decimal::ONE,
            sell_through_fraction: Decimal::ONE,
            sales_window_months: 8,
            monthly_weights: None,
        }
    }
}

// =============================================================================
// Cash-Flow Schedule
// =============================================================================

/// A share of the marketing budget spent in one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarketingSlice {
    /// Month offset from the release month (negative = before release).
    pub offset: i32,

    /// Fraction of the total marketing budget.
    #[ts(type = "number")]
    pub fraction: Decimal,
}

impl MarketingSlice {
    pub const fn new(offset: i32, fraction: Decimal) -> Self {
        Self { offset, fraction }
    }

    /// 25% the month before release, 50% in the release month, 25% after.
    pub fn default_profile() -> Vec<MarketingSlice> {
        vec![
            MarketingSlice::new(-1, dec!(0.25)),
            MarketingSlice::new(0, dec!(0.50)),
            MarketingSlice::new(1, dec!(0.25)),
        ]
    }
}

/// When each fixed payment is due, in months relative to the release month.
///
/// ```text
///  -4        -3          -2          -1      0 (release)
///  deposit   mastering   balance             sales start
///            artwork
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentOffsets {
    pub manufacturing_deposit: i32,
    pub manufacturing_balance: i32,
    pub mastering: i32,
    pub artwork: i32,
}

impl Default for PaymentOffsets {
    fn default() -> Self {
        Self {
            manufacturing_deposit: -4,
            manufacturing_balance: -2,
            mastering: -3,
            artwork: -3,
        }
    }
}

/// Payment timing for a release.
///
/// ## Rules
/// - `manufacturing_deposit_fraction` in `[0, 1]`
/// - every offset within [`MAX_PLAN_MONTHS`](crate::validation::MAX_PLAN_MONTHS)
///   of the release month
/// - marketing fractions each `>= 0`, offsets unique, and summing to 1.0
///   within 0.001 (no silent correction)
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CashFlowSchedule {
    #[ts(as = "String")]
    release_date: NaiveDate,
    #[ts(type = "number")]
    manufacturing_deposit_fraction: Decimal,
    offsets: PaymentOffsets,
    marketing_profile: Vec<MarketingSlice>,
}

impl CashFlowSchedule {
    /// Creates a validated schedule.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use pressplan_core::{CashFlowSchedule, MarketingSlice, PaymentOffsets};
    /// use rust_decimal_macros::dec;
    ///
    /// let release = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
    /// let overspent = vec![
    ///     MarketingSlice::new(-1, dec!(0.25)),
    ///     MarketingSlice::new(0, dec!(0.5)),
    ///     MarketingSlice::new(1, dec!(0.3)),
    /// ];
    /// let result = CashFlowSchedule::new(release, dec!(0.5), PaymentOffsets::default(), overspent);
    /// assert!(result.is_err());
    /// ```
    pub fn new(
        release_date: NaiveDate,
        manufacturing_deposit_fraction: Decimal,
        offsets: PaymentOffsets,
        marketing_profile: Vec<MarketingSlice>,
    ) -> CoreResult<Self> {
        validate_fraction(
            "schedule.manufacturing_deposit_fraction",
            manufacturing_deposit_fraction,
        )?;
        validate_month_offset("schedule.manufacturing_deposit offset", offsets.manufacturing_deposit)?;
        validate_month_offset("schedule.manufacturing_balance offset", offsets.manufacturing_balance)?;
        validate_month_offset("schedule.mastering offset", offsets.mastering)?;
        validate_month_offset("schedule.artwork offset", offsets.artwork)?;

        for (i, slice) in marketing_profile.iter().enumerate() {
            validate_month_offset("schedule.marketing_profile offset", slice.offset)?;
            validate_non_negative("schedule.marketing_profile", slice.fraction)?;
            if marketing_profile[..i].iter().any(|s| s.offset == slice.offset) {
                return Err(ConfigurationError::Duplicate {
                    field: "schedule.marketing_profile offset".to_string(),
                    value: slice.offset.to_string(),
                }
                .into());
            }
        }

        let fractions: Vec<Decimal> = marketing_profile.iter().map(|s| s.fraction).collect();
        validate_fraction_sum("schedule.marketing_profile", &fractions)?;

        Ok(Self {
            release_date,
            manufacturing_deposit_fraction,
            offsets,
            marketing_profile,
        })
    }

    /// The standard schedule around `release_date`: 50% deposit four months
    /// out, balance at two, mastering and artwork at three, marketing
    /// 25/50/25 around release.
    pub fn with_defaults(release_date: NaiveDate) -> Self {
        Self {
            release_date,
            manufacturing_deposit_fraction: dec!(0.50),
            offsets: PaymentOffsets::default(),
            marketing_profile: MarketingSlice::default_profile(),
        }
    }

    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    pub fn manufacturing_deposit_fraction(&self) -> Decimal {
        self.manufacturing_deposit_fraction
    }

    pub fn offsets(&self) -> PaymentOffsets {
        self.offsets
    }

    pub fn marketing_profile(&self) -> &[MarketingSlice] {
        &self.marketing_profile
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
