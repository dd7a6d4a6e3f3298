//! # Error Types
//!
//! Domain-specific error types for pressplan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pressplan-core errors (this file)                                     │
//! │  ├── ConfigurationError - A parameter record was provably invalid      │
//! │  └── CoreError          - Anything a calculation can fail with         │
//! │                                                                         │
//! │  pressplan-cli errors (app)                                            │
//! │  └── CliError           - Config files, env vars, output               │
//! │                                                                         │
//! │  Flow: ConfigurationError → CoreError → CliError → exit code           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An undefined break-even price is NOT an error. It is a value
//! ([`crate::pnl::BreakEvenPrice::Undefined`]) the caller checks before
//! formatting.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the calculators.
///
/// Nothing here is transient: the same inputs fail the same way every time,
/// so callers should surface the message and ask for corrected input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A parameter record failed validation.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Units were forecast to sell but the sales window has no months.
    ///
    /// This is a configuration error that spans two records
    /// (`ManufacturingCost` × `SalesPlan`), so no single constructor can catch
    /// it. [`CoreError::is_configuration`] groups it with
    /// [`CoreError::Configuration`].
    ///
    /// ## When This Occurs
    /// ```text
    /// sales_window_months = 0, sell_through = 0.5, units = 500
    ///      │
    ///      ▼
    /// 250 units to place into 0 months
    ///      │
    ///      ▼
    /// EmptySalesWindow { units: 250 }
    /// ```
    #[error("Cannot allocate {units} units into an empty sales window")]
    EmptySalesWindow { units: u64 },

    /// A value left the representable decimal range.
    #[error("Arithmetic overflow while computing {context}")]
    Overflow { context: &'static str },

    /// Month arithmetic ran past the supported calendar.
    #[error("Month offset {offset} from the release date is outside the calendar")]
    DateOutOfRange { offset: i32 },
}

impl CoreError {
    /// True for errors the caller fixes by changing the plan's inputs, as
    /// opposed to arithmetic or calendar limits.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CoreError::Configuration(_) | CoreError::EmptySalesWindow { .. }
        )
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Input validation errors.
///
/// Every variant names the offending field so the input can be fixed without
/// reading code.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must lie inside a range.
    #[error("{field} must be in {range}, got {value}")]
    OutOfRange {
        field: String,
        range: String,
        value: String,
    },

    /// Sequence length doesn't match a declared count.
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Fractions that must add up to one don't.
    #[error("{field} fractions must sum to 1.0, got {sum}")]
    FractionSum { field: String, sum: String },

    /// Same key supplied twice.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
