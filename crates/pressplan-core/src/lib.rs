//! # pressplan-core: Pure Release Math
//!
//! Financial planning for a vinyl release: cost basis, processing fees,
//! break-even pricing, and a month-by-month cash-flow timeline.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pressplan Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pressplan-cli                                │   │
//! │  │    release.toml ──► ReleasePlan ──► text table / JSON           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pressplan-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   sales   │  │    pnl    │  │ cashflow  │  │   │
//! │  │   │ parameter │─►│ allocator │  │  summary  │  │ timeline  │  │   │
//! │  │   │  records  │  └─────┬─────┘  └───────────┘  └─────▲─────┘  │   │
//! │  │   └───────────┘        └───────────────────────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO SHARED STATE • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Parameter records (manufacturing, fixed costs, fees, sales, schedule)
//! - [`money`] - Exact decimal `Money` and its report formatting
//! - [`sales`] - Sales allocator (weighted curve, exact integer reconciliation)
//! - [`pnl`] - Single-shot P&L and break-even price
//! - [`cashflow`] - Monthly cash-flow ledger
//! - [`calendar`] - Calendar month arithmetic
//! - [`plan`] - `ReleasePlan` bundling all inputs
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, every call is reentrant
//! 2. **No I/O**: files, network and the clock belong to the host
//! 3. **Decimal Money**: never binary floating point
//! 4. **Explicit Errors**: invalid records can't be built; failures are typed
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pressplan_core::ReleasePlan;
//!
//! let release = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
//! let report = ReleasePlan::with_defaults(release).report().unwrap();
//!
//! assert_eq!(report.pnl.net_profit_pre_tax.to_string(), "$6,569.55");
//! assert_eq!(report.timeline.break_even_row().unwrap().month, "2026-06");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod cashflow;
pub mod error;
pub mod money;
pub mod plan;
pub mod pnl;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cashflow::{build_cashflow_timeline, Annotation, CashFlowRow, Timeline};
pub use error::{ConfigurationError, CoreError, CoreResult};
pub use money::Money;
pub use plan::{ReleasePlan, ReleaseReport};
pub use pnl::{compute_release_pnl, BreakEvenPrice, PnlSummary};
pub use sales::{allocate_sales, SalesAllocation};
pub use types::*;
