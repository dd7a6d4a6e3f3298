//! Text rendering of a release report.
//!
//! ```text
//! Month       Units      Cash In     Cash Out          Net   Cumulative  Detail
//! 2025-11         0        $0.00    $2,147.03   -$2,147.03   -$2,147.03  MFG deposit (50%)
//! ```
//!
//! Each section is a `Display` wrapper so it can be written straight to any
//! formatter.

use std::fmt;

use pressplan_core::{PnlSummary, ReleaseReport, Timeline};

const MONEY_WIDTH: usize = 13;

/// Key figures, one per line.
pub struct PnlTable<'a>(pub &'a PnlSummary);

impl fmt::Display for PnlTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pnl = self.0;
        let lines: [(&str, String); 13] = [
            ("Units pressed", pnl.units.to_string()),
            ("Units sold", pnl.units_sold.to_string()),
            ("Manufacturing total", pnl.manufacturing_total.to_string()),
            ("Fixed release costs", pnl.fixed_total.to_string()),
            ("Total cost basis", pnl.total_cost_basis.to_string()),
            ("Manufacturing / unit", pnl.manufacturing_cost_per_unit.to_string()),
            ("All-in cost / unit", pnl.all_in_cost_per_unit.to_string()),
            ("Unit price", pnl.unit_price.to_string()),
            ("Gross revenue", pnl.gross_revenue.to_string()),
            ("Estimated orders", pnl.estimated_orders.to_string()),
            ("Processing fees", pnl.processing_fees.to_string()),
            ("Net profit (pre-tax)", pnl.net_profit_pre_tax.to_string()),
            ("Break-even price", pnl.break_even_price.to_string()),
        ];

        writeln!(f, "P&L SUMMARY")?;
        for (label, value) in lines {
            writeln!(f, "  {:<22}{:>w$}", label, value, w = MONEY_WIDTH)?;
        }
        Ok(())
    }
}

/// Fixed-width month-by-month table followed by totals.
pub struct TimelineTable<'a>(pub &'a Timeline);

impl fmt::Display for TimelineTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeline = self.0;

        writeln!(f, "CASH-FLOW TIMELINE")?;
        writeln!(
            f,
            "{:<8}{:>8}{:>w$}{:>w$}{:>w$}{:>w$}  {}",
            "Month",
            "Units",
            "Cash In",
            "Cash Out",
            "Net",
            "Cumulative",
            "Detail",
            w = MONEY_WIDTH
        )?;

        for row in &timeline.rows {
            writeln!(
                f,
                "{:<8}{:>8}{:>w$}{:>w$}{:>w$}{:>w$}  {}",
                row.month,
                row.units_sold,
                row.cash_in_after_fees.to_string(),
                row.cash_out.to_string(),
                row.net.to_string(),
                row.cumulative_balance.to_string(),
                row.detail(),
                w = MONEY_WIDTH
            )?;
        }

        writeln!(f)?;
        writeln!(f, "  Total cash in:   {}", timeline.total_cash_in())?;
        writeln!(f, "  Total cash out:  {}", timeline.total_cash_out())?;
        writeln!(f, "  Lowest balance:  {}", timeline.lowest_balance())?;
        match timeline.break_even_row() {
            Some(row) => writeln!(f, "  Break-even:      {}", row.month),
            None => writeln!(f, "  Break-even:      not reached"),
        }
    }
}

pub fn render_pnl(pnl: &PnlSummary) -> String {
    PnlTable(pnl).to_string()
}

pub fn render_timeline(timeline: &Timeline) -> String {
    TimelineTable(timeline).to_string()
}

/// P&L section, a blank line, then the timeline.
pub fn render_report(report: &ReleaseReport) -> String {
    format!(
        "{}\n{}",
        PnlTable(&report.pnl),
        TimelineTable(&report.timeline)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pressplan_core::ReleasePlan;

    fn report() -> ReleaseReport {
        ReleasePlan::with_defaults(NaiveDate::from_ymd_opt(2026, 3, 13).unwrap())
            .report()
            .unwrap()
    }

    #[test]
    fn test_pnl_lines() {
        let text = render_pnl(&report().pnl);
        assert!(text.starts_with("P&L SUMMARY\n"));
        assert!(text.contains("Processing fees"));
        assert!(text.contains("$736.40"));
        assert!(text.contains("$6,569.55"));
        assert!(text.contains("$12,294.05"));
        assert_eq!(text.lines().count(), 14);
    }

    #[test]
    fn test_timeline_table() {
        let text = render_timeline(&report().timeline);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].starts_with("Month"));
        assert!(lines[2].starts_with("2025-11"));
        assert!(lines[2].contains("MFG deposit (50%)"));
        assert!(text.contains("Break-even reached"));
        assert!(text.contains("  Break-even:      2026-06"));
        assert!(text.contains("  Lowest balance:  -$8,544.05"));
    }

    #[test]
    fn test_columns_line_up() {
        let text = render_timeline(&report().timeline);
        let header_end = text.lines().nth(1).unwrap().find("Cumulative").unwrap() + "Cumulative".len();
        for line in text.lines().skip(2).take(12) {
            let cumulative = &line[..header_end];
            assert!(cumulative.ends_with(|c: char| c.is_ascii_digit()), "{line}");
        }
    }

    #[test]
    fn test_timeline_without_break_even() {
        let mut timeline = report().timeline;
        timeline.rows.truncate(2);
        let text = TimelineTable(&timeline).to_string();
        assert!(text.ends_with("  Break-even:      not reached\n"));
    }

    #[test]
    fn test_report_has_both_sections() {
        let text = render_report(&report());
        assert!(text.contains("P&L SUMMARY"));
        assert!(text.contains("CASH-FLOW TIMELINE"));
    }
}
