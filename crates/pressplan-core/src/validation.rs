//! # Validation Module
//!
//! Field-level checks shared by the parameter constructors in [`crate::types`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Scenario file (pressplan-cli)                                │
//! │  └── Type validation (TOML deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Record constructors (types.rs)                               │
//! │  └── THIS MODULE: ranges, signs, lengths, fraction sums                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculators                                                  │
//! │  └── Only checks that depend on several records at once                │
//! │      (e.g. units to sell vs. an empty sales window)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pressplan_core::validation::{validate_fraction, validate_positive};
//! use rust_decimal_macros::dec;
//!
//! assert!(validate_fraction("sell_through_fraction", dec!(0.8)).is_ok());
//! assert!(validate_positive("unit_price", dec!(0)).is_err());
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ConfigurationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ConfigurationError>;

/// How far a set of fractions may stray from 1.0 and still count as whole.
pub const FRACTION_SUM_TOLERANCE: Decimal = dec!(0.001);

// =============================================================================
// Numeric Validators
// =============================================================================

/// Value must be strictly greater than zero.
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ConfigurationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Value must be zero or more (costs, fees).
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Value must lie in the closed interval `[0, 1]`.
///
/// ## Example
/// ```rust
/// use pressplan_core::validation::validate_fraction;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_fraction("deposit_fraction", dec!(0)).is_ok());
/// assert!(validate_fraction("deposit_fraction", dec!(1)).is_ok());
/// assert!(validate_fraction("deposit_fraction", dec!(1.01)).is_err());
/// ```
pub fn validate_fraction(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigurationError::OutOfRange {
            field: field.to_string(),
            range: "[0, 1]".to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

/// Value must lie in the half-open interval `[0, 1)`.
///
/// Used for percentage fee rates: a rate of 1.0 would eat the whole sale and
/// make the break-even price undefined.
pub fn validate_rate(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(ConfigurationError::OutOfRange {
            field: field.to_string(),
            range: "[0, 1)".to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

/// Unit counts must be at least one.
pub fn validate_units(field: &str, units: u32) -> ValidationResult<()> {
    if units == 0 {
        return Err(ConfigurationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Sequence length must match a declared count.
pub fn validate_length(field: &str, expected: usize, actual: usize) -> ValidationResult<()> {
    if expected != actual {
        return Err(ConfigurationError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }

    Ok(())
}

/// Fractions must add up to 1.0 within [`FRACTION_SUM_TOLERANCE`].
///
/// ## Example
/// ```rust
/// use pressplan_core::validation::validate_fraction_sum;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_fraction_sum("marketing_profile", &[dec!(0.25), dec!(0.5), dec!(0.25)]).is_ok());
/// assert!(validate_fraction_sum("marketing_profile", &[dec!(0.25), dec!(0.5), dec!(0.3)]).is_err());
/// ```
pub fn validate_fraction_sum(field: &str, fractions: &[Decimal]) -> ValidationResult<()> {
    let sum = fractions
        .iter()
        .try_fold(Decimal::ZERO, |acc, f| acc.checked_add(*f));

    match sum {
        Some(sum) if is_whole(sum) => Ok(()),
        Some(sum) => Err(ConfigurationError::FractionSum {
            field: field.to_string(),
            sum: sum.to_string(),
        }),
        None => Err(ConfigurationError::FractionSum {
            field: field.to_string(),
            sum: "overflow".to_string(),
        }),
    }
}

fn is_whole(sum: Decimal) -> bool {
    sum.checked_sub(Decimal::ONE)
        .map_or(false, |gap| gap.abs() <= FRACTION_SUM_TOLERANCE)
}

// =============================================================================
// Calendar Validators
// =============================================================================

/// Longest horizon a plan may reach, in months either side of release.
pub const MAX_PLAN_MONTHS: u32 = 1200;

/// Month offsets must stay within [`MAX_PLAN_MONTHS`] of the release month.
pub fn validate_month_offset(field: &str, offset: i32) -> ValidationResult<()> {
    if offset.unsigned_abs() > MAX_PLAN_MONTHS {
        return Err(ConfigurationError::OutOfRange {
            field: field.to_string(),
            range: format!("[-{max}, {max}]", max = MAX_PLAN_MONTHS),
            value: offset.to_string(),
        });
    }

    Ok(())
}

/// Sales windows may run at most [`MAX_PLAN_MONTHS`] months.
pub fn validate_window(field: &str, months: u32) -> ValidationResult<()> {
    if months > MAX_PLAN_MONTHS {
        return Err(ConfigurationError::OutOfRange {
            field: field.to_string(),
            range: format!("[0, {}]", MAX_PLAN_MONTHS),
            value: months.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
