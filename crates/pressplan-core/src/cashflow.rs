//! # Cash-Flow Timeline
//!
//! Month-by-month ledger of a release: money out while the record is being
//! made, money in once it sells, and the running balance in between.
//!
//! ## Timeline Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Outflows (schedule)              Inflows (sales allocator)             │
//! │  ───────────────────              ─────────────────────────             │
//! │  deposit    @ -4  ──┐             units_by_month[0..N)                  │
//! │  mastering  @ -3  ──┤             orders_by_month[0..N)                 │
//! │  artwork    @ -3  ──┼─► Σ per     gross − (gross·rate + orders·fee)     │
//! │  balance    @ -2  ──┤   offset         │                                │
//! │  marketing  @ -1… ──┘     │            │                                │
//! │                           ▼            ▼                                │
//! │   offset: -4   -3   -2   -1    0    1    2  …  N-1                      │
//! │   out:    ███  ███  ███  ██    ██   █                                   │
//! │   in:                          ███  ██   █  …  ▪                        │
//! │   cumulative ────────────────────────────────────►                      │
//! │                                     ▲ first row ≥ 0: "Break-even"       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Span
//! From the earliest of (release month, any outflow) to the latest of
//! (release month, last sales month, any outflow). Every scheduled payment
//! therefore lands on a row and total `cash_out` equals the cost basis.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::calendar::{add_months, month_label};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::sales::allocate_sales;
use crate::types::{
    CashFlowSchedule, FixedReleaseCosts, ManufacturingCost, PaymentProcessorFees, SalesPlan,
};

// =============================================================================
// Annotations
// =============================================================================

/// Why a row is notable. Rendered as the row's label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Annotation {
    /// Plant deposit, with its share of the manufacturing total (truncated).
    ManufacturingDeposit { percent: u32 },
    /// Remainder of the plant invoice.
    ManufacturingBalance,
    Mastering,
    Artwork,
    /// A marketing slice, with its share of the budget (rounded).
    Marketing { percent: u32 },
    /// First month the cumulative balance is back at or above zero.
    BreakEvenReached,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::ManufacturingDeposit { percent } => write!(f, "MFG deposit ({}%)", percent),
            Annotation::ManufacturingBalance => write!(f, "MFG balance"),
            Annotation::Mastering => write!(f, "Mastering"),
            Annotation::Artwork => write!(f, "Artwork"),
            Annotation::Marketing { percent } => write!(f, "Marketing ({}%)", percent),
            Annotation::BreakEvenReached => write!(f, "Break-even reached"),
        }
    }
}

// =============================================================================
// Outflows
// =============================================================================

/// One scheduled payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledOutflow {
    pub offset: i32,
    pub amount: Money,
    pub annotation: Annotation,
}

/// Every payment the schedule makes, in annotation order: deposit, balance,
/// mastering, artwork, then marketing slices in profile order.
///
/// Several payments may share an offset; they are kept separate here and
/// summed when the timeline is built.
pub fn scheduled_outflows(
    manufacturing: &ManufacturingCost,
    fixed: &FixedReleaseCosts,
    schedule: &CashFlowSchedule,
) -> CoreResult<Vec<ScheduledOutflow>> {
    let offsets = schedule.offsets();
    let deposit_fraction = schedule.manufacturing_deposit_fraction();
    // deposit fraction is in [0, 1]
    let deposit = manufacturing.total_cost().scale(deposit_fraction);
    let balance = manufacturing.total_cost() - deposit;

    let mut outflows = vec![
        ScheduledOutflow {
            offset: offsets.manufacturing_deposit,
            amount: deposit,
            annotation: Annotation::ManufacturingDeposit {
                percent: whole_percent((deposit_fraction * Decimal::ONE_HUNDRED).trunc()),
            },
        },
        ScheduledOutflow {
            offset: offsets.manufacturing_balance,
            amount: balance,
            annotation: Annotation::ManufacturingBalance,
        },
        ScheduledOutflow {
            offset: offsets.mastering,
            amount: fixed.mastering(),
            annotation: Annotation::Mastering,
        },
        ScheduledOutflow {
            offset: offsets.artwork,
            amount: fixed.artwork(),
            annotation: Annotation::Artwork,
        },
    ];

    for slice in schedule.marketing_profile() {
        let amount = fixed
            .marketing()
            .checked_scale(slice.fraction)
            .ok_or(CoreError::Overflow {
                context: "marketing slice",
            })?;
        outflows.push(ScheduledOutflow {
            offset: slice.offset,
            amount,
            annotation: Annotation::Marketing {
                percent: whole_percent((slice.fraction * Decimal::ONE_HUNDRED).round()),
            },
        });
    }

    Ok(outflows)
}

/// Fractions feeding this are validated into `[0, ~1]`, so the percentage
/// always fits.
fn whole_percent(percent: Decimal) -> u32 {
    percent.to_u32().unwrap_or_default()
}

// =============================================================================
// Timeline
// =============================================================================

/// One calendar month of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CashFlowRow {
    /// Months from the release month (negative = before release).
    pub offset: i32,
    /// Release day-of-month carried into this month (clamped).
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// `YYYY-MM`.
    pub month: String,
    #[ts(type = "number")]
    pub units_sold: u64,
    pub cash_in_after_fees: Money,
    pub cash_out: Money,
    pub net: Money,
    pub cumulative_balance: Money,
    pub annotations: Vec<Annotation>,
}

impl CashFlowRow {
    /// Annotations joined for a single table cell (`"Mastering; Artwork"`).
    pub fn detail(&self) -> String {
        self.annotations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Ordered monthly rows, ascending by offset.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Timeline {
    pub rows: Vec<CashFlowRow>,
}

impl Timeline {
    /// The row carrying the break-even annotation, if the balance recovers.
    pub fn break_even_row(&self) -> Option<&CashFlowRow> {
        self.rows
            .iter()
            .find(|row| row.annotations.contains(&Annotation::BreakEvenReached))
    }

    pub fn total_cash_in(&self) -> Money {
        self.rows.iter().map(|row| row.cash_in_after_fees).sum()
    }

    pub fn total_cash_out(&self) -> Money {
        self.rows.iter().map(|row| row.cash_out).sum()
    }

    /// Balance after the last row.
    pub fn final_balance(&self) -> Money {
        self.rows
            .last()
            .map(|row| row.cumulative_balance)
            .unwrap_or_default()
    }

    /// Deepest point of the running balance: the cash the release has to be
    /// fronted before sales pay it back.
    pub fn lowest_balance(&self) -> Money {
        self.rows
            .iter()
            .map(|row| row.cumulative_balance)
            .min()
            .unwrap_or_default()
    }
}

/// Builds the month-by-month cash-flow ledger.
///
/// ## Errors
/// - [`CoreError::EmptySalesWindow`] when units sell into a zero-month window
/// - [`CoreError::DateOutOfRange`] when a row's month can't be represented
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use pressplan_core::cashflow::build_cashflow_timeline;
/// use pressplan_core::*;
///
/// let release = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
/// let timeline = build_cashflow_timeline(
///     &ManufacturingCost::default(),
///     &FixedReleaseCosts::default(),
///     &SalesPlan::default(),
///     &PaymentProcessorFees::default(),
///     &CashFlowSchedule::with_defaults(release),
/// )
/// .unwrap();
///
/// assert_eq!(timeline.rows.first().unwrap().month, "2025-11");
/// assert_eq!(timeline.rows.last().unwrap().month, "2026-10");
/// ```
pub fn build_cashflow_timeline(
    manufacturing: &ManufacturingCost,
    fixed: &FixedReleaseCosts,
    sales: &SalesPlan,
    fees: &PaymentProcessorFees,
    schedule: &CashFlowSchedule,
) -> CoreResult<Timeline> {
    let allocation = allocate_sales(manufacturing, sales)?;
    let outflows = scheduled_outflows(manufacturing, fixed, schedule)?;

    // Additive: payments sharing a month are summed, never replaced.
    let mut cash_out: BTreeMap<i32, Money> = BTreeMap::new();
    let mut labels: BTreeMap<i32, Vec<Annotation>> = BTreeMap::new();
    for outflow in &outflows {
        let slot = cash_out.entry(outflow.offset).or_default();
        *slot = slot.checked_add(outflow.amount).ok_or(CoreError::Overflow {
            context: "monthly cash out",
        })?;
        labels.entry(outflow.offset).or_default().push(outflow.annotation);
    }

    let last_sales_month = i32::try_from(allocation.months()).map_err(|_| CoreError::Overflow {
        context: "sales window length",
    })? - 1;
    let start = cash_out.keys().next().copied().unwrap_or(0).min(0);
    let end = cash_out
        .keys()
        .next_back()
        .copied()
        .unwrap_or(0)
        .max(last_sales_month)
        .max(0);

    debug!(start, end, outflows = outflows.len(), "Building cash-flow timeline");

    let span = usize::try_from(i64::from(end) - i64::from(start) + 1).map_err(|_| {
        CoreError::Overflow {
            context: "timeline length",
        }
    })?;
    let mut rows = Vec::with_capacity(span);
    let mut cumulative = Money::zero();
    // Running totals in row order, so the `Timeline` sums can't overflow later.
    let mut total_in = Money::zero();
    let mut total_out = Money::zero();
    let mut break_even_marked = false;

    for offset in start..=end {
        let date = add_months(schedule.release_date(), offset)
            .ok_or(CoreError::DateOutOfRange { offset })?;

        let (units_sold, cash_in_after_fees) = match allocation.month(offset) {
            Some((units, orders)) => (units, cash_in_for_month(sales, fees, units, orders)?),
            None => (0, Money::zero()),
        };

        let out = cash_out.get(&offset).copied().unwrap_or_default();
        let net = cash_in_after_fees.checked_sub(out).ok_or(CoreError::Overflow {
            context: "monthly net",
        })?;
        cumulative = cumulative.checked_add(net).ok_or(CoreError::Overflow {
            context: "cumulative balance",
        })?;
        total_in = total_in
            .checked_add(cash_in_after_fees)
            .ok_or(CoreError::Overflow {
                context: "total cash in",
            })?;
        total_out = total_out.checked_add(out).ok_or(CoreError::Overflow {
            context: "total cash out",
        })?;

        let mut annotations = labels.remove(&offset).unwrap_or_default();
        if !break_even_marked && !cumulative.is_negative() {
            annotations.push(Annotation::BreakEvenReached);
            break_even_marked = true;
            debug!(offset, balance = %cumulative, "Cumulative balance reached break-even");
        }

        rows.push(CashFlowRow {
            offset,
            date,
            month: month_label(date),
            units_sold,
            cash_in_after_fees,
            cash_out: out,
            net,
            cumulative_balance: cumulative,
            annotations,
        });
    }

    debug!(cash_in = %total_in, cash_out = %total_out, "Cash-flow timeline built");

    Ok(Timeline { rows })
}

/// Gross for the month less its processing fees.
fn cash_in_for_month(
    sales: &SalesPlan,
    fees: &PaymentProcessorFees,
    units: u64,
    orders: u64,
) -> CoreResult<Money> {
    let gross = sales
        .unit_price()
        .checked_multiply_quantity(units)
        .ok_or(CoreError::Overflow {
            context: "monthly gross",
        })?;
    let taken = fees.fees_for(gross, orders)?;
    gross.checked_sub(taken).ok_or(CoreError::Overflow {
        context: "monthly cash in",
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarketingSlice, PaymentOffsets};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn release() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 13).unwrap()
    }

    fn standard_timeline() -> Timeline {
        build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
            &CashFlowSchedule::with_defaults(release()),
        )
        .unwrap()
    }

    fn row(timeline: &Timeline, offset: i32) -> &CashFlowRow {
        timeline.rows.iter().find(|r| r.offset == offset).unwrap()
    }

    #[test]
    fn test_standard_span() {
        let timeline = standard_timeline();
        let offsets: Vec<i32> = timeline.rows.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, (-4..=7).collect::<Vec<_>>());
        assert_eq!(timeline.rows[0].month, "2025-11");
        assert_eq!(row(&timeline, 0).month, "2026-03");
    }

    #[test]
    fn test_standard_outflows_and_labels() {
        let timeline = standard_timeline();

        let deposit = row(&timeline, -4);
        assert_eq!(deposit.cash_out.amount(), dec!(2147.025));
        assert_eq!(deposit.detail(), "MFG deposit (50%)");

        let production = row(&timeline, -3);
        assert_eq!(production.cash_out.amount(), dec!(3000));
        assert_eq!(production.annotations, vec![Annotation::Mastering, Annotation::Artwork]);

        assert_eq!(row(&timeline, -2).cash_out.amount(), dec!(2147.025));
        assert_eq!(row(&timeline, -1).cash_out.amount(), dec!(1250));
        assert_eq!(row(&timeline, -1).detail(), "Marketing (25%)");
        assert_eq!(row(&timeline, 0).cash_out.amount(), dec!(2500));
        assert_eq!(row(&timeline, 1).cash_out.amount(), dec!(1250));
        assert!(row(&timeline, 2).cash_out.is_zero());
    }

    #[test]
    fn test_no_cash_in_before_release() {
        let timeline = standard_timeline();
        for r in timeline.rows.iter().filter(|r| r.offset < 0) {
            assert!(r.cash_in_after_fees.is_zero());
            assert_eq!(r.units_sold, 0);
        }
        assert!(row(&timeline, 0).cash_in_after_fees.is_positive());
    }

    #[test]
    fn test_cost_basis_conserved() {
        let timeline = standard_timeline();
        assert_eq!(timeline.total_cash_out().amount(), dec!(12294.05));
    }

    #[test]
    fn test_final_balance_matches_pnl_with_single_unit_orders() {
        let timeline = standard_timeline();
        // 560 × (35 − 1.015 − 0.30) − 12,294.05
        assert_eq!(timeline.total_cash_in().amount(), dec!(18863.60));
        assert_eq!(timeline.final_balance().amount(), dec!(6569.55));
        assert_eq!(timeline.lowest_balance().amount(), dec!(-8544.05));
    }

    #[test]
    fn test_cumulative_balance_composition() {
        let timeline = standard_timeline();
        assert_eq!(timeline.rows[0].cumulative_balance, timeline.rows[0].net);
        for pair in timeline.rows.windows(2) {
            assert_eq!(pair[1].cumulative_balance, pair[0].cumulative_balance + pair[1].net);
            assert_eq!(pair[1].net, pair[1].cash_in_after_fees - pair[1].cash_out);
        }
    }

    #[test]
    fn test_break_even_marked_once() {
        let timeline = standard_timeline();
        let marked: Vec<i32> = timeline
            .rows
            .iter()
            .filter(|r| r.annotations.contains(&Annotation::BreakEvenReached))
            .map(|r| r.offset)
            .collect();
        assert_eq!(marked, vec![3]);

        let first = timeline.break_even_row().unwrap();
        assert_eq!(first.month, "2026-06");
        assert!(timeline
            .rows
            .iter()
            .take_while(|r| r.offset < 3)
            .all(|r| r.cumulative_balance.is_negative()));
    }

    #[test]
    fn test_no_break_even_when_nothing_sells() {
        let sales = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(0), 0).unwrap();
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &CashFlowSchedule::with_defaults(release()),
        )
        .unwrap();

        // span is the outflows only: deposit at -4 through marketing at +1
        let offsets: Vec<i32> = timeline.rows.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, (-4..=1).collect::<Vec<_>>());
        assert!(timeline.total_cash_in().is_zero());
        assert!(timeline.break_even_row().is_none());
        assert_eq!(timeline.final_balance().amount(), dec!(-12294.05));
    }

    #[test]
    fn test_empty_window_with_sales_is_an_error() {
        let sales = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(1), 0).unwrap();
        let result = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &CashFlowSchedule::with_defaults(release()),
        );
        assert!(matches!(result, Err(CoreError::EmptySalesWindow { units: 560 })));
    }

    #[test]
    fn test_payments_on_same_month_accumulate() {
        let offsets = PaymentOffsets {
            manufacturing_deposit: -3,
            manufacturing_balance: -3,
            mastering: -3,
            artwork: -3,
        };
        let schedule = CashFlowSchedule::new(
            release(),
            dec!(0.5),
            offsets,
            vec![MarketingSlice::new(-3, dec!(1))],
        )
        .unwrap();
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
            &schedule,
        )
        .unwrap();

        let first = &timeline.rows[0];
        assert_eq!(first.offset, -3);
        assert_eq!(first.cash_out.amount(), dec!(12294.05));
        assert_eq!(
            first.detail(),
            "MFG deposit (50%); MFG balance; Mastering; Artwork; Marketing (100%)"
        );
    }

    #[test]
    fn test_span_covers_payments_after_sales_window() {
        let schedule = CashFlowSchedule::new(
            release(),
            dec!(0.5),
            PaymentOffsets::default(),
            vec![MarketingSlice::new(0, dec!(0.6)), MarketingSlice::new(5, dec!(0.4))],
        )
        .unwrap();
        let sales = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(1), 2).unwrap();
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &schedule,
        )
        .unwrap();

        assert_eq!(timeline.rows.last().unwrap().offset, 5);
        assert_eq!(timeline.rows.last().unwrap().cash_out.amount(), dec!(2000));
        assert_eq!(timeline.total_cash_out().amount(), dec!(12294.05));
    }

    #[test]
    fn test_release_month_included_when_all_payments_follow_it() {
        let offsets = PaymentOffsets {
            manufacturing_deposit: 1,
            manufacturing_balance: 2,
            mastering: 1,
            artwork: 1,
        };
        let schedule =
            CashFlowSchedule::new(release(), dec!(0.5), offsets, vec![MarketingSlice::new(2, dec!(1))])
                .unwrap();
        let sales = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(1), 1).unwrap();
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &schedule,
        )
        .unwrap();

        assert_eq!(timeline.rows.first().unwrap().offset, 0);
        assert_eq!(timeline.rows.first().unwrap().units_sold, 560);
        // all sales land before any payment: break-even immediately
        assert_eq!(timeline.break_even_row().unwrap().offset, 0);
    }

    #[test]
    fn test_two_month_window_reconciles() {
        let run = ManufacturingCost::new(5, Money::from_decimal(dec!(50))).unwrap();
        let sales = SalesPlan::new(Money::from_decimal(dec!(35)), dec!(1), dec!(1), 2)
            .unwrap()
            .with_monthly_weights(vec![dec!(0.7), dec!(0.3)])
            .unwrap();
        let timeline = build_cashflow_timeline(
            &run,
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &CashFlowSchedule::with_defaults(release()),
        )
        .unwrap();

        assert_eq!(row(&timeline, 0).units_sold, 3);
        assert_eq!(row(&timeline, 1).units_sold, 2);
    }

    #[test]
    fn test_month_dates_clamp_to_month_end() {
        let schedule = CashFlowSchedule::with_defaults(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
            &schedule,
        )
        .unwrap();

        assert_eq!(row(&timeline, 1).date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(row(&timeline, -2).date, NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());
        assert_eq!(row(&timeline, -2).month, "2023-11");
    }

    #[test]
    fn test_deposit_percent_truncates_marketing_rounds() {
        let schedule = CashFlowSchedule::new(
            release(),
            dec!(0.339),
            PaymentOffsets::default(),
            vec![MarketingSlice::new(0, dec!(0.335)), MarketingSlice::new(1, dec!(0.665))],
        )
        .unwrap();
        let outflows = scheduled_outflows(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &schedule,
        )
        .unwrap();

        assert_eq!(outflows[0].annotation.to_string(), "MFG deposit (33%)");
        assert_eq!(outflows[4].annotation.to_string(), "Marketing (34%)");
        assert_eq!(outflows[5].annotation.to_string(), "Marketing (66%)");
    }

    #[test]
    fn test_huge_unit_price_reports_overflow() {
        let sales =
            SalesPlan::new(Money::from_decimal(Decimal::MAX / dec!(100)), dec!(1), dec!(1), 8).unwrap();
        let result = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &sales,
            &PaymentProcessorFees::default(),
            &CashFlowSchedule::with_defaults(release()),
        );
        assert!(matches!(result, Err(CoreError::Overflow { .. })));
    }

    #[test]
    fn test_marketing_budget_overflow_reported() {
        let fixed =
            FixedReleaseCosts::new(Money::from_decimal(Decimal::MAX), Money::zero(), Money::zero())
                .unwrap();
        let schedule = CashFlowSchedule::new(
            release(),
            dec!(0.5),
            PaymentOffsets::default(),
            vec![MarketingSlice::new(0, dec!(1.0005))],
        )
        .unwrap();
        let result = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &fixed,
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
            &schedule,
        );
        assert!(matches!(
            result,
            Err(CoreError::Overflow {
                context: "marketing slice"
            })
        ));
    }

    #[test]
    fn test_widest_schedule_spans_full_horizon() {
        let offsets = PaymentOffsets {
            manufacturing_deposit: -1200,
            ..PaymentOffsets::default()
        };
        let schedule = CashFlowSchedule::new(
            release(),
            dec!(0.5),
            offsets,
            vec![MarketingSlice::new(1200, dec!(1))],
        )
        .unwrap();
        let timeline = build_cashflow_timeline(
            &ManufacturingCost::default(),
            &FixedReleaseCosts::default(),
            &SalesPlan::default(),
            &PaymentProcessorFees::default(),
            &schedule,
        )
        .unwrap();

        assert_eq!(timeline.rows.len(), 2401);
        assert_eq!(timeline.rows.first().unwrap().month, "1926-03");
        assert_eq!(timeline.rows.last().unwrap().month, "2126-03");
        assert_eq!(timeline.total_cash_out().amount(), dec!(12294.05));
    }

    #[test]
    fn test_timeline_is_idempotent() {
        assert_eq!(standard_timeline(), standard_timeline());
    }

    proptest! {
        #[test]
        fn prop_balance_composes_and_costs_are_conserved(
            sell_through_pct in 0u32..=100,
            months in 1u32..18,
            units in 1u32..5_000,
        ) {
            let run = ManufacturingCost::new(units, Money::from_decimal(dec!(4294.05))).unwrap();
            let sales = SalesPlan::new(
                Money::from_decimal(dec!(35)),
                dec!(1.15),
                Decimal::new(i64::from(sell_through_pct), 2),
                months,
            )
            .unwrap();
            let timeline = build_cashflow_timeline(
                &run,
                &FixedReleaseCosts::default(),
                &sales,
                &PaymentProcessorFees::default(),
                &CashFlowSchedule::with_defaults(release()),
            )
            .unwrap();

            prop_assert_eq!(timeline.rows[0].cumulative_balance, timeline.rows[0].net);
            for pair in timeline.rows.windows(2) {
                prop_assert_eq!(pair[1].offset, pair[0].offset + 1);
                prop_assert_eq!(
                    pair[1].cumulative_balance,
                    pair[0].cumulative_balance + pair[1].net
                );
            }
            prop_assert_eq!(timeline.total_cash_out().amount(), dec!(12294.05));
            prop_assert!(timeline
                .rows
                .iter()
                .filter(|r| r.annotations.contains(&Annotation::BreakEvenReached))
                .count() <= 1);
        }
    }
}
