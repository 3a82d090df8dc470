//! # periodavg-core
//!
//! Running weekly and monthly averages over fully encompassed calendar
//! periods.
//!
//! This library partitions a stream of timestamped numeric observations
//! into ISO-week (Monday-start) and calendar-month buckets in a target
//! timezone, keeping only periods that lie entirely inside a caller-supplied
//! time range. Partial boundary periods are never reported.
//!
//! ## Features
//!
//! - **Complete periods only**: a week or month is bucketed only when its
//!   whole span fits inside `[start, end]`; observations in clipped
//!   boundary periods are silently dropped.
//! - **Incremental feed**: observations arrive one at a time, in any order,
//!   and fold into running `(sum, count)` pairs.
//! - **IANA timezones**: bucket boundaries are taken in any timezone from
//!   the IANA database via chrono-tz (UTC by default).
//! - **Stable keys**: buckets are addressed by canonical string keys,
//!   `2024w05` for weeks and `2024m03` for months.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use periodavg_core::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).single().unwrap();
//! let mut stats = Statistics::utc(start, end).unwrap();
//!
//! for (day, value) in [(2, 4.0), (3, 6.0)] {
//!     stats.consider(&Observation {
//!         at: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).single().unwrap(),
//!         value,
//!     });
//! }
//!
//! let week = stats.aggregate("2024w01").unwrap();
//! assert_eq!(week.average_2dp().unwrap(), 5.0);
//! ```

pub mod error;
pub mod models;
pub mod parse;
pub mod plan;
pub mod stats;
pub mod tz;

// Re-export commonly used types at the crate root
pub use error::{PeriodAvgError, Result};
pub use models::{Aggregate, DataPoint, Granularity, MONTH_ABBREV, Observation, PlannedBucket};
pub use parse::{TimestampFormat, parse_timestamp};
pub use stats::Statistics;

/// Prelude module for convenient imports.
///
/// ```
/// use periodavg_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{PeriodAvgError, Result};
    pub use crate::models::*;
    pub use crate::parse::{TimestampFormat, parse_timestamp};
    pub use crate::plan::{planned_months, planned_weeks};
    pub use crate::stats::Statistics;
    pub use crate::tz::parse_tz;
}
