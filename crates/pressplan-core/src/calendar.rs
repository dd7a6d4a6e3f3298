//! # Calendar Months
//!
//! Month arithmetic relative to a release date.
//!
//! ```text
//! release 2024-01-31
//!   +1 → 2024-02-29   (clamped, leap year)
//!   +2 → 2024-03-31
//!   -2 → 2023-11-30   (clamped)
//! ```

use chrono::{Months, NaiveDate};

/// Adds (or, for negative `months`, subtracts) calendar months.
///
/// The day of month is clamped to the last valid day of the target month.
/// Returns `None` only past the limits of the representable calendar.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use pressplan_core::calendar::add_months;
///
/// let release = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(add_months(release, 1), NaiveDate::from_ymd_opt(2024, 2, 29));
/// assert_eq!(add_months(release, -2), NaiveDate::from_ymd_opt(2023, 11, 30));
/// ```
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let span = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(span)
    } else {
        date.checked_sub_months(span)
    }
}

/// `YYYY-MM` label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
