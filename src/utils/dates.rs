// utils/dates.rs
//! Calendar arithmetic for membership windows.
//!
//! All comparisons are made on UTC calendar days, so the time-of-day part of a
//! timestamp never changes how many days a member has left.

use chrono::{DateTime, Days, Months, NaiveTime, TimeZone, Utc};

/// Adds exactly one calendar month to `start`.
///
/// When the target month is shorter than `start`'s day-of-month the result is
/// clamped to its last day, so Jan 31 becomes Feb 28 (or Feb 29 in leap years).
pub fn add_exact_calendar_month(start: DateTime<Utc>) -> DateTime<Utc> {
    add_calendar_months(start, 1)
}

/// Adds `months` calendar months to `start`, clamping from the original day.
///
/// Adding 2 months to Jan 31 gives Mar 31, not the Mar 28/29 you would get by
/// chaining two single-month additions through February.
pub fn add_calendar_months(start: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Adds a fixed number of days, keeping the time of day.
pub fn add_days(start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    start
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Midnight (UTC) of the day `at` falls on.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&at.date_naive().and_time(NaiveTime::MIN))
}

/// Whole calendar days from `now`'s day until `end`'s day, never negative.
///
/// A window ending later today yields 0.
pub fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = end
        .date_naive()
        .signed_duration_since(now.date_naive())
        .num_days()
        .max(0);

    u32::try_from(days).unwrap_or(u32::MAX)
}

/// True once `end`'s calendar day lies strictly before `now`'s.
pub fn is_expired(end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    end.date_naive() < now.date_naive()
}
