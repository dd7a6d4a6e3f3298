//! # Release Plan
//!
//! Bundles the five parameter records so a host can run both calculators
//! from one value.

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::cashflow::{build_cashflow_timeline, Timeline};
use crate::error::CoreResult;
use crate::pnl::{compute_release_pnl, PnlSummary};
use crate::types::{
    CashFlowSchedule, FixedReleaseCosts, ManufacturingCost, PaymentProcessorFees, SalesPlan,
};

/// Everything needed to plan a release. Each record was validated when it
/// was built, so a `ReleasePlan` is always computable (modulo
/// cross-record checks such as an empty sales window).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePlan {
    pub manufacturing: ManufacturingCost,
    pub fixed_costs: FixedReleaseCosts,
    pub sales: SalesPlan,
    pub fees: PaymentProcessorFees,
    pub schedule: CashFlowSchedule,
}

impl ReleasePlan {
    /// The standard 560-unit plan released on `release_date`.
    pub fn with_defaults(release_date: NaiveDate) -> Self {
        Self {
            manufacturing: ManufacturingCost::default(),
            fixed_costs: FixedReleaseCosts::default(),
            sales: SalesPlan::default(),
            fees: PaymentProcessorFees::default(),
            schedule: CashFlowSchedule::with_defaults(release_date),
        }
    }

    pub fn pnl(&self) -> CoreResult<PnlSummary> {
        compute_release_pnl(&self.manufacturing, &self.fixed_costs, &self.sales, &self.fees)
    }

    pub fn timeline(&self) -> CoreResult<Timeline> {
        build_cashflow_timeline(
            &self.manufacturing,
            &self.fixed_costs,
            &self.sales,
            &self.fees,
            &self.schedule,
        )
    }

    /// Runs both calculators.
    pub fn report(&self) -> CoreResult<ReleaseReport> {
        Ok(ReleaseReport {
            pnl: self.pnl()?,
            timeline: self.timeline()?,
        })
    }
}

/// P&L summary plus the monthly ledger.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ReleaseReport {
    pub pnl: PnlSummary,
    pub timeline: Timeline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan() -> ReleasePlan {
        ReleasePlan::with_defaults(NaiveDate::from_ymd_opt(2026, 3, 13).unwrap())
    }

    #[test]
    fn test_report_combines_both_calculators() {
        let report = plan().report().unwrap();
        assert_eq!(report.pnl.net_profit_pre_tax.amount(), dec!(6569.55));
        assert_eq!(report.timeline.rows.len(), 12);
        assert_eq!(report.pnl.total_cost_basis, report.timeline.total_cash_out());
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(plan().report().unwrap()).unwrap();
        assert_eq!(json["pnl"]["units_sold"], 560);
        assert_eq!(json["pnl"]["break_even_price"]["kind"], "price");
        assert_eq!(json["timeline"]["rows"][0]["month"], "2025-11");
        assert_eq!(
            json["timeline"]["rows"][0]["annotations"][0]["kind"],
            "manufacturing_deposit"
        );
        assert_eq!(json["timeline"]["rows"][0]["annotations"][0]["percent"], 50);
    }
}
