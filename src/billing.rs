//! Billing date engine - recurring payment date arithmetic
//!
//! Pure calendar math, no storage access. The one invariant that
//! matters: the computed date always lands on the requested billing day
//! unless the target month is too short, in which case it clamps to the
//! last day of that month (Feb 29 in leap years, Feb 28 otherwise).

use crate::policy::BillingCycle;
use chrono::{Datelike, NaiveDate};

/// Compute the next occurrence of a recurring billing date.
///
/// Advances `current` by one cycle unit (one calendar month or one
/// calendar year, with proper December and year rollover), then pins the
/// day-of-month to `billing_day`, clamped to the length of the target
/// month.
pub fn calculate_next_payment_date(
    current: NaiveDate,
    cycle: BillingCycle,
    billing_day: u32,
) -> NaiveDate {
    let (year, month) = match cycle {
        BillingCycle::Monthly => {
            if current.month() == 12 {
                (current.year() + 1, 1)
            } else {
                (current.year(), current.month() + 1)
            }
        }
        BillingCycle::Yearly => (current.year() + 1, current.month()),
    };

    let day = billing_day.clamp(1, days_in_month(year, month));

    // The day is clamped into the valid range for (year, month), so
    // construction cannot fail.
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("clamped day is valid for the target month")
}

/// Number of days in a month, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
