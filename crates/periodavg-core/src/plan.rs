//! Bucket planning: boundary arithmetic and enumeration of fully
//! encompassed periods.
//!
//! All arithmetic here operates on local wall-clock time in the target
//! timezone. A session uses a single fixed zone, so ordering local times
//! is equivalent to ordering the instants they denote, and no DST
//! resolution is needed for containment tests.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Granularity, PlannedBucket};

/// Last representable local instant of a day (23:59:59.999999).
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap()
}

/// Canonical key for the week containing `local`: calendar year, `w`,
/// two-digit ISO week number (e.g. `2024w05`).
///
/// The year component is the plain calendar year, not the ISO week-year.
/// Around New Year the two disagree: a Monday in late December can open
/// ISO week 01 of the following year, and its key then carries the old
/// year. Kept as-is so planner keys and feed-side keys stay derivable
/// from a bare timestamp.
pub fn week_key(local: NaiveDateTime) -> String {
    local.format("%Yw%V").to_string()
}

/// Canonical key for the month containing `local` (e.g. `2024m03`).
pub fn month_key(local: NaiveDateTime) -> String {
    local.format("%Ym%m").to_string()
}

/// First Monday at local midnight that is at or after `succeeding`.
///
/// If `succeeding` already is exactly Monday midnight it is returned
/// unchanged; otherwise the result is the following Monday.
pub fn first_monday_at_or_after(succeeding: NaiveDateTime) -> NaiveDateTime {
    let days_from_monday = succeeding.weekday().num_days_from_monday();
    if days_from_monday == 0 && succeeding.time() == NaiveTime::MIN {
        return succeeding;
    }
    let monday = succeeding.date() + Duration::days((7 - days_from_monday) as i64);
    monday.and_time(NaiveTime::MIN)
}

/// First moment of a month (day 1, local midnight) at or after `succeeding`.
///
/// If `succeeding` lies exactly on its month's first moment that moment is
/// returned; otherwise the first moment of the following month, with
/// December rolling over into January of the next year.
pub fn first_month_start_at_or_after(succeeding: NaiveDateTime) -> NaiveDateTime {
    let month_start = NaiveDate::from_ymd_opt(succeeding.year(), succeeding.month(), 1)
        .unwrap()
        .and_time(NaiveTime::MIN);
    if month_start >= succeeding {
        return month_start;
    }
    next_month_start(succeeding.date())
}

fn next_month_start(date: NaiveDate) -> NaiveDateTime {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_time(NaiveTime::MIN)
}

/// Last local instant of the month containing `within`
/// (last calendar day, 23:59:59.999999). Leap years fall out of the
/// first-of-next-month-minus-one-day computation.
pub fn last_moment_of_month(within: NaiveDateTime) -> NaiveDateTime {
    let next = next_month_start(within.date());
    (next.date() - Duration::days(1)).and_time(end_of_day())
}

/// Enumerate every ISO week (Monday start) lying entirely inside
/// `[start, end]` local time.
///
/// A week qualifies when its last instant, Monday midnight plus seven days
/// minus one microsecond, is at or before `end`. Weeks clipped by either
/// range boundary are never produced.
pub fn planned_weeks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<PlannedBucket> {
    let mut buckets = Vec::new();
    let mut week_start = first_monday_at_or_after(start);
    let span = Duration::weeks(1) - Duration::microseconds(1);

    while week_start + span <= end {
        buckets.push(PlannedBucket {
            key: week_key(week_start),
            granularity: Granularity::Week,
            start_local: week_start,
            last_local: week_start + span,
        });
        week_start += Duration::weeks(1);
    }

    buckets
}

/// Enumerate every calendar month lying entirely inside `[start, end]`
/// local time.
///
/// A month qualifies when its last instant (last day, 23:59:59.999999) is
/// at or before `end`. Months clipped by either range boundary are never
/// produced.
pub fn planned_months(start: NaiveDateTime, end: NaiveDateTime) -> Vec<PlannedBucket> {
    let mut buckets = Vec::new();
    let mut month_start = first_month_start_at_or_after(start);
    let mut month_end = last_moment_of_month(month_start);

    while month_end <= end {
        buckets.push(PlannedBucket {
            key: month_key(month_start),
            granularity: Granularity::Month,
            start_local: month_start,
            last_local: month_end,
        });
        month_start = first_month_start_at_or_after(month_end);
        month_end = last_moment_of_month(month_start);
    }

    buckets
}
