//! Core data types for periodavg.
//!
//! This module defines the primary types used throughout the library:
//! - [`Granularity`] - Bucket granularity (week/month)
//! - [`Aggregate`] - Running (sum, count) pair for one bucket
//! - [`DataPoint`] - Capability contract for observations
//! - [`Observation`] - Plain record satisfying [`DataPoint`]
//! - [`PlannedBucket`] - A fully encompassed period produced by the planner

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::{PeriodAvgError, Result};

/// Abbreviated month names, indexed by month number minus one.
pub const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// ISO week, Monday 00:00:00 to Sunday 23:59:59.999999 local time.
    Week,
    /// Calendar month, day 1 00:00:00 to last day 23:59:59.999999 local time.
    Month,
}

impl Granularity {
    /// The separator character inside bucket keys of this granularity
    /// (`2024w05` vs `2024m05`).
    pub fn key_tag(self) -> char {
        match self {
            Granularity::Week => 'w',
            Granularity::Month => 'm',
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// Running aggregate of one bucket: sum of observed values and the
/// number of observations folded in so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Sum of all folded values.
    pub sum: f64,
    /// Number of folded values.
    pub count: u64,
}

impl Aggregate {
    /// Fold one value into the running pair.
    pub fn fold(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Average of the folded values, rounded to `decimals` fractional digits.
    ///
    /// Returns [`PeriodAvgError::EmptyBucket`] when nothing has been folded
    /// in; callers rendering reports filter such buckets out instead of
    /// dividing by zero.
    pub fn average(&self, decimals: u32) -> Result<f64> {
        if self.count == 0 {
            return Err(PeriodAvgError::EmptyBucket);
        }
        let scale = 10f64.powi(decimals as i32);
        Ok((self.sum / self.count as f64 * scale).round() / scale)
    }

    /// Average rounded to two decimals, the default report precision.
    pub fn average_2dp(&self) -> Result<f64> {
        self.average(2)
    }
}

/// Capability contract for a single observation.
///
/// Any record exposing an absolute instant and a numeric value can be fed
/// into [`crate::stats::Statistics::consider`]; no further structure is
/// required.
pub trait DataPoint {
    /// The absolute instant the observation was taken.
    fn point_in_time(&self) -> DateTime<Utc>;
    /// The observed value.
    fn value(&self) -> f64;
}

/// Plain observation record, the simplest [`DataPoint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Instant the value was observed.
    pub at: DateTime<Utc>,
    /// Observed value.
    pub value: f64,
}

impl DataPoint for Observation {
    fn point_in_time(&self) -> DateTime<Utc> {
        self.at
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// A fully encompassed week or month produced by the planner.
///
/// Boundaries are local wall-clock times in the target timezone;
/// `last_local` is the last representable microsecond of the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedBucket {
    /// Canonical bucket key (`2024w05` or `2024m03`).
    pub key: String,
    /// Week or month.
    pub granularity: Granularity,
    /// First instant of the period, local time.
    pub start_local: NaiveDateTime,
    /// Last instant of the period, local time.
    pub last_local: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn granularity_display() {
        assert_eq!(format!("{}", Granularity::Week), "week");
        assert_eq!(format!("{}", Granularity::Month), "month");
    }

    #[test]
    fn granularity_key_tag() {
        assert_eq!(Granularity::Week.key_tag(), 'w');
        assert_eq!(Granularity::Month.key_tag(), 'm');
    }

    #[test]
    fn aggregate_starts_at_zero() {
        let agg = Aggregate::default();
        assert_eq!(agg.sum, 0.0);
        assert_eq!(agg.count, 0);
    }

    #[test]
    fn aggregate_fold_accumulates() {
        let mut agg = Aggregate::default();
        agg.fold(4.0);
        agg.fold(6.0);
        assert_eq!(agg.sum, 10.0);
        assert_eq!(agg.count, 2);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let agg = Aggregate { sum: 1.0, count: 3 };
        assert_eq!(agg.average_2dp().unwrap(), 0.33);

        let agg = Aggregate { sum: 10.0, count: 4 };
        assert_eq!(agg.average_2dp().unwrap(), 2.5);
    }

    #[test]
    fn average_with_custom_decimals() {
        let agg = Aggregate { sum: 1.0, count: 3 };
        assert_eq!(agg.average(4).unwrap(), 0.3333);
        assert_eq!(agg.average(0).unwrap(), 0.0);
    }

    #[test]
    fn average_of_empty_bucket_is_an_error() {
        let agg = Aggregate::default();
        assert!(matches!(
            agg.average_2dp(),
            Err(crate::error::PeriodAvgError::EmptyBucket)
        ));
    }

    #[test]
    fn observation_satisfies_datapoint() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).single().unwrap();
        let obs = Observation { at, value: 4.0 };
        assert_eq!(obs.point_in_time(), at);
        assert_eq!(obs.value(), 4.0);
    }

    #[test]
    fn month_abbrev_covers_the_year() {
        assert_eq!(MONTH_ABBREV.len(), 12);
        assert_eq!(MONTH_ABBREV[0], "Jan");
        assert_eq!(MONTH_ABBREV[11], "Dec");
    }

    #[test]
    fn granularity_serialization() {
        assert_eq!(
            serde_json::to_string(&Granularity::Week).unwrap(),
            "\"week\""
        );
        assert_eq!(
            serde_json::to_string(&Granularity::Month).unwrap(),
            "\"month\""
        );
    }
}
