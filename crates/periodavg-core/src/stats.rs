//! The aggregation session: a bucket table seeded once at construction,
//! then fed one observation at a time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{PeriodAvgError, Result};
use crate::models::{Aggregate, DataPoint, Granularity};
use crate::plan::{month_key, planned_months, planned_weeks, week_key};
use crate::tz::to_local_naive;

/// Running weekly and monthly averages over a fixed time range.
///
/// Construction enumerates every ISO week and calendar month fully
/// encompassed by `[start, end]` in the target timezone and seeds a zeroed
/// aggregate for each. [`Statistics::consider`] then folds observations
/// into whichever of those buckets they fall in; observations landing in a
/// clipped boundary period are silently dropped for that granularity.
///
/// The table is exclusively owned by the session. Feeding is expected to
/// be serial; there is no internal locking.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use periodavg_core::prelude::*;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).single().unwrap();
/// let mut stats = Statistics::utc(start, end).unwrap();
///
/// stats.consider(&Observation {
///     at: Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).single().unwrap(),
///     value: 4.0,
/// });
///
/// let agg = stats.aggregate("2024w01").unwrap();
/// assert_eq!((agg.sum, agg.count), (4.0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct Statistics {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
    table: BTreeMap<String, Aggregate>,
}

impl Statistics {
    /// Create a session over `[start, end]` with bucket boundaries taken
    /// in `tz`.
    ///
    /// Returns [`PeriodAvgError::InvalidRange`] when `start` is not
    /// earlier than `end`. A valid but short range may still plan zero
    /// buckets; that is not an error.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Result<Self> {
        if start >= end {
            return Err(PeriodAvgError::InvalidRange(format!(
                "start '{start}' must be earlier than end '{end}'"
            )));
        }

        let local_start = to_local_naive(start, tz);
        let local_end = to_local_naive(end, tz);

        let mut table = BTreeMap::new();
        for bucket in planned_weeks(local_start, local_end)
            .into_iter()
            .chain(planned_months(local_start, local_end))
        {
            table.insert(bucket.key, Aggregate::default());
        }

        Ok(Self {
            start,
            end,
            tz,
            table,
        })
    }

    /// Create a session with UTC bucket boundaries, the default zone.
    pub fn utc(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::new(start, end, chrono_tz::UTC)
    }

    /// The timezone bucket boundaries are taken in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The range supplied at construction.
    pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Number of planned buckets across both granularities.
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    /// Fold one observation into its week and month bucket, where planned.
    ///
    /// The observation's instant is viewed in the session timezone and the
    /// week and month keys re-derived with the planner's formats. A key
    /// with no planned bucket means the observation lies in a partial
    /// boundary period; it is ignored for that granularity.
    pub fn consider(&mut self, datapoint: &impl DataPoint) {
        let local = to_local_naive(datapoint.point_in_time(), self.tz);
        let value = datapoint.value();

        for key in [week_key(local), month_key(local)] {
            if let Some(aggregate) = self.table.get_mut(&key) {
                aggregate.fold(value);
            }
        }
    }

    /// Aggregate for one bucket key, if that bucket was planned.
    pub fn aggregate(&self, key: &str) -> Option<&Aggregate> {
        self.table.get(key)
    }

    /// Key-ordered aggregates of one granularity.
    pub fn aggregates(
        &self,
        granularity: Granularity,
    ) -> impl Iterator<Item = (&str, &Aggregate)> {
        let tag = granularity.key_tag();
        self.table
            .iter()
            .filter(move |(key, _)| key.contains(tag))
            .map(|(key, aggregate)| (key.as_str(), aggregate))
    }

    /// Key-ordered week aggregates.
    pub fn week_aggregates(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.aggregates(Granularity::Week)
    }

    /// Key-ordered month aggregates.
    pub fn month_aggregates(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.aggregates(Granularity::Month)
    }
}
