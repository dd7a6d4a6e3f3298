//! # P&L Calculator
//!
//! Single-shot profitability of a release: no time dimension, just "if this
//! many sell at this price, what's left after fees and costs?"
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  units_sold      = round(units × sell_through)                         │
//! │  gross_revenue   = units_sold × unit_price                             │
//! │  orders          = ceil(units_sold / avg_units_per_order)              │
//! │  processing_fees = gross × rate + orders × fixed_fee                   │
//! │  cost_basis      = manufacturing_total + marketing + mastering + art   │
//! │  net_profit      = gross − processing_fees − cost_basis                │
//! │                                                                         │
//! │  break_even_price solves  p·sold − (p·sold·rate + orders·fee) = basis  │
//! │                    →  p = (basis + orders·fee) / (sold · (1 − rate))   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `all_in_cost_per_unit` spreads the cost basis over every unit PRESSED,
//! while the break-even price only has to be covered by the units SOLD.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sales::{orders_for_units, units_sold};
use crate::types::{FixedReleaseCosts, ManufacturingCost, PaymentProcessorFees, SalesPlan};

// =============================================================================
// Break-Even Price
// =============================================================================

/// Minimum unit price that recovers the cost basis after processing fees.
///
/// When nothing sells there is no such price. That is reported as
/// [`BreakEvenPrice::Undefined`], never as a division fault; check for it
/// before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum BreakEvenPrice {
    /// Unit price at which net profit is exactly zero.
    Price(Money),

    /// No units sell, so no price breaks even.
    Undefined,
}

impl BreakEvenPrice {
    /// The price, if one exists.
    pub fn price(&self) -> Option<Money> {
        match self {
            BreakEvenPrice::Price(price) => Some(*price),
            BreakEvenPrice::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, BreakEvenPrice::Undefined)
    }
}

impl fmt::Display for BreakEvenPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEvenPrice::Price(price) => write!(f, "{}", price),
            BreakEvenPrice::Undefined => write!(f, "undefined (no units sold)"),
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Every intermediate and final figure of the P&L, for display.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PnlSummary {
    pub units: u32,
    #[ts(type = "number")]
    pub units_sold: u64,
    pub manufacturing_total: Money,
    pub fixed_total: Money,
    pub total_cost_basis: Money,
    pub manufacturing_cost_per_unit: Money,
    /// Cost basis over units pressed (not units sold).
    pub all_in_cost_per_unit: Money,
    pub unit_price: Money,
    pub gross_revenue: Money,
    #[ts(type = "number")]
    pub estimated_orders: u64,
    pub processing_fees: Money,
    pub net_profit_pre_tax: Money,
    pub break_even_price: BreakEvenPrice,
}

impl PnlSummary {
    /// True when the release clears its costs before tax.
    pub fn is_profitable(&self) -> bool {
        self.net_profit_pre_tax.is_positive()
    }
}

/// Computes the release P&L.
///
/// Pure: the same records always produce the same summary.
///
/// ## Example
/// ```rust
/// use pressplan_core::pnl::compute_release_pnl;
/// use pressplan_core::{FixedReleaseCosts, ManufacturingCost, PaymentProcessorFees, SalesPlan};
///
/// let pnl = compute_release_pnl(
///     &ManufacturingCost::default(),
///     &FixedReleaseCosts::default(),
///     &SalesPlan::default(),
///     &PaymentProcessorFees::default(),
/// )
/// .unwrap();
///
/// assert_eq!(pnl.units_sold, 560);
/// assert_eq!(pnl.gross_revenue.to_string(), "$19,600.00");
/// assert_eq!(pnl.net_profit_pre_tax.to_string(), "$6,569.55");
/// ```
pub fn compute_release_pnl(
    manufacturing: &ManufacturingCost,
    fixed: &FixedReleaseCosts,
    sales: &SalesPlan,
    fees: &PaymentProcessorFees,
) -> CoreResult<PnlSummary> {
    let units_sold = units_sold(manufacturing, sales)?;
    let gross_revenue = sales
        .unit_price()
        .checked_multiply_quantity(units_sold)
        .ok_or(CoreError::Overflow {
            context: "gross revenue",
        })?;
    let estimated_orders = orders_for_units(units_sold, sales.avg_units_per_order())?;
    let processing_fees = fees.fees_for(gross_revenue, estimated_orders)?;

    let total_cost_basis = manufacturing
        .total_cost()
        .checked_add(fixed.total())
        .ok_or(CoreError::Overflow {
            context: "total cost basis",
        })?;
    let net_profit_pre_tax = gross_revenue
        .checked_sub(processing_fees)
        .and_then(|net| net.checked_sub(total_cost_basis))
        .ok_or(CoreError::Overflow {
            context: "net profit",
        })?;

    // units > 0 is a ManufacturingCost invariant
    let all_in_cost_per_unit = total_cost_basis
        .per_unit(u64::from(manufacturing.units()))
        .unwrap_or_default();

    let break_even_price = break_even_price(total_cost_basis, units_sold, estimated_orders, fees)?;

    Ok(PnlSummary {
        units: manufacturing.units(),
        units_sold,
        manufacturing_total: manufacturing.total_cost(),
        fixed_total: fixed.total(),
        total_cost_basis,
        manufacturing_cost_per_unit: manufacturing.cost_per_unit(),
        all_in_cost_per_unit,
        unit_price: sales.unit_price(),
        gross_revenue,
        estimated_orders,
        processing_fees,
        net_profit_pre_tax,
        break_even_price,
    })
}

fn break_even_price(
    total_cost_basis: Money,
    units_sold: u64,
    estimated_orders: u64,
    fees: &PaymentProcessorFees,
) -> CoreResult<BreakEvenPrice> {
    if units_sold == 0 {
        return Ok(BreakEvenPrice::Undefined);
    }

    let to_recover = fees
        .fixed_fee_per_order()
        .checked_multiply_quantity(estimated_orders)
        .and_then(|flat| total_cost_basis.checked_add(flat))
        .ok_or(CoreError::Overflow {
            context: "break-even price",
        })?;
    // rate < 1, so the kept share of each sale is positive
    let kept_per_unit_sold = Decimal::from(units_sold) * fees.percentage_rate().complement();
    let price = to_recover
        .amount()
        .checked_div(kept_per_unit_sold)
        .ok_or(CoreError::Overflow {
            context: "break-even price",
        })?;

    Ok(BreakEvenPrice::Price(Money::from_decimal(price)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rate;
    use rust_decimal_macros::dec;

    fn money(amount: Decimal) -> Money {
        Money::from_decimal(amount)
    }

    fn sales(price: Decimal, avg: Decimal, sell_through: Decimal) -> SalesPlan {
        SalesPlan::new(money(price), avg, sell_through, 8).unwrap()
    }

    /// 560 units, $4,294.05 run, $8,000 fixed, $35, all sold, 2.9% + $0.30.
    #[test]
    fn test_standard_pressing() {
        let pnl = compute_release_pnl(
            &ManufacturingCost::new(560, money(dec!(4294.05))).unwrap(),
            &FixedReleaseCosts::new(money(dec!(5000)), money(dec!(2000)), money(dec!(1000))).unwrap(),
            &sales(dec!(35), dec!(1), dec!(1)),
            &PaymentProcessorFees::new(Rate::from_fraction(dec!(0.029)), money(dec!(0.30))).unwrap(),
        )
        .unwrap();

        assert_eq!(pnl.units, 560);
        assert_eq!(pnl.units_sold, 560);
        assert_eq!(pnl.gross_revenue.amount(), dec!(19600));
        assert_eq!(pnl.estimated_orders, 560);
        assert_eq!(pnl.processing_fees.amount(), dec!(736.40));
        assert_eq!(pnl.total_cost_basis.amount(), dec!(12294.05));
        assert_eq!(pnl.net_profit_pre_tax.amount(), dec!(6569.55));
        assert_eq!(pnl.fixed_total.amount(), dec!(8000));
        assert_eq!(pnl.manufacturing_cost_per_unit.round_cents().amount(), dec!(7.67));
        assert_eq!(pnl.all_in_cost_per_unit.round_cents().amount(), dec!(21.95));
        assert_eq!(
            pnl.break_even_price.price().unwrap().round_cents().amount(),
            dec!(22.92)
        );
        assert!(pnl.is_profitable());
    }

    #[test]
    fn test_nothing_sells_break_even_undefined() {
        let pnl = compute_release_pnl(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales(dec!(35), dec!(1), dec!(0)),
            &PaymentProcessorFees::default(),
        )
        .unwrap();

        assert_eq!(pnl.units_sold, 0);
        assert_eq!(pnl.estimated_orders, 0);
        assert!(pnl.gross_revenue.is_zero());
        assert!(pnl.break_even_price.is_undefined());
        assert_eq!(pnl.break_even_price.price(), None);
        assert_eq!(pnl.net_profit_pre_tax.amount(), dec!(-12294.05));
        assert!(!pnl.is_profitable());
        assert_eq!(pnl.break_even_price.to_string(), "undefined (no units sold)");
    }

    #[test]
    fn test_break_even_price_zeroes_profit() {
        let run = ManufacturingCost::default();
        let fixed = FixedReleaseCosts::default();
        let fees = PaymentProcessorFees::default();

        let first = compute_release_pnl(&run, &fixed, &sales(dec!(35), dec!(1.15), dec!(0.8)), &fees)
            .unwrap();
        let break_even = first.break_even_price.price().unwrap();

        let at_break_even = compute_release_pnl(
            &run,
            &fixed,
            &SalesPlan::new(break_even, dec!(1.15), dec!(0.8), 8).unwrap(),
            &fees,
        )
        .unwrap();
        assert!(at_break_even.net_profit_pre_tax.amount().abs() < dec!(0.000001));
    }

    #[test]
    fn test_orders_batch_with_multi_unit_orders() {
        let pnl = compute_release_pnl(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales(dec!(35), dec!(1.15), dec!(1)),
            &PaymentProcessorFees::default(),
        )
        .unwrap();

        // 560 / 1.15 = 486.95… → 487 orders
        assert_eq!(pnl.estimated_orders, 487);
        assert_eq!(pnl.processing_fees.amount(), dec!(568.40) + dec!(146.10));
    }

    #[test]
    fn test_cost_per_unit_uses_units_pressed() {
        let pnl = compute_release_pnl(
            &ManufacturingCost::new(500, money(dec!(3000))).unwrap(),
            &FixedReleaseCosts::new(money(dec!(2000)), Money::zero(), Money::zero()).unwrap(),
            &SalesPlan::new(money(dec!(30)), dec!(1), dec!(0.5), 4).unwrap(),
            &PaymentProcessorFees::new(Rate::zero(), Money::zero()).unwrap(),
        )
        .unwrap();

        assert_eq!(pnl.units_sold, 250);
        assert_eq!(pnl.all_in_cost_per_unit.amount(), dec!(10));
        assert_eq!(pnl.break_even_price, BreakEvenPrice::Price(money(dec!(20))));
    }

    #[test]
    fn test_pnl_is_idempotent() {
        let run = ManufacturingCost::default();
        let fixed = FixedReleaseCosts::default();
        let plan = SalesPlan::default();
        let fees = PaymentProcessorFees::default();

        assert_eq!(
            compute_release_pnl(&run, &fixed, &plan, &fees).unwrap(),
            compute_release_pnl(&run, &fixed, &plan, &fees).unwrap()
        );
    }

    #[test]
    fn test_huge_unit_price_reports_overflow() {
        let result = compute_release_pnl(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales(Decimal::MAX / dec!(100), dec!(1), dec!(1)),
            &PaymentProcessorFees::default(),
        );
        assert!(matches!(
            result,
            Err(CoreError::Overflow {
                context: "gross revenue"
            })
        ));
    }

    #[test]
    fn test_huge_cost_basis_reports_overflow() {
        let result = compute_release_pnl(
            &ManufacturingCost::new(560, money(Decimal::MAX)).unwrap(),
            &FixedReleaseCosts::default(),
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
        );
        assert!(matches!(result, Err(CoreError::Overflow { .. })));
    }

    #[test]
    fn test_break_even_serializes_with_tag() {
        let json = serde_json::to_string(&BreakEvenPrice::Undefined).unwrap();
        assert_eq!(json, r#"{"kind":"undefined"}"#);
    }
}
