//! Grouping records by local calendar day.
//!
//! [`partition`] parses every record's timestamp with the schema variant's
//! format, converts it to the configured zone and groups records under a
//! sortable [`DayKey`] (`YYYYMMDD`). Iterating the resulting
//! [`DayBuckets`] visits days in chronological order; within a day records
//! keep the order they were encountered in.
//!
//! A single unparseable timestamp fails the whole batch, so no buckets are
//! produced for a source with bad data.
//!
//! # Example
//!
//! ```rust
//! use tweetpack::Record;
//! use tweetpack::config::TimeZoneSetting;
//! use tweetpack::core::partition::partition;
//!
//! let records = vec![
//!     Record::new("1", "hi", "2021-05-01 10:00:00 +0000"),
//!     Record::new("2", "later", "2021-05-02 09:00:00 +0000"),
//! ];
//! let buckets = partition(records, "%Y-%m-%d %H:%M:%S %z", TimeZoneSetting::utc())?;
//! let days: Vec<&str> = buckets.keys().map(|k| k.as_str()).collect();
//! assert_eq!(days, ["20210501", "20210502"]);
//! # Ok::<(), tweetpack::TweetpackError>(())
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};

use crate::Record;
use crate::config::TimeZoneSetting;
use crate::error::Result;

/// Sortable `YYYYMMDD` day identifier.
///
/// Lexicographic order equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(String);

impl DayKey {
    /// Builds the key for the civil date of `dt`.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        DayKey(format!("{:04}{:02}{:02}", dt.year(), dt.month(), dt.day()))
    }

    /// Parses an eight-digit `YYYYMMDD` key.
    pub fn parse(s: &str) -> Option<Self> {
        (s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit())).then(|| DayKey(s.to_string()))
    }

    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Four-digit year.
    pub fn year(&self) -> &str {
        &self.0[..4]
    }

    /// Two-digit month.
    pub fn month(&self) -> &str {
        &self.0[4..6]
    }

    /// Two-digit day of month.
    pub fn day(&self) -> &str {
        &self.0[6..]
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.year(), self.month(), self.day())
    }
}

/// A record paired with its localized timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRecord {
    pub record: Record,
    pub local_time: DateTime<FixedOffset>,
}

/// Records sharing one local calendar day.
pub type DayBucket = Vec<DatedRecord>;

/// Day buckets in chronological key order.
pub type DayBuckets = BTreeMap<DayKey, DayBucket>;

/// Groups `records` by the local day of their timestamp.
///
/// Fails with [`TweetpackError::TimestampParse`](crate::TweetpackError::TimestampParse)
/// on the first record whose `created_at` does not match `format`.
pub fn partition(
    records: Vec<Record>,
    format: &'static str,
    zone: TimeZoneSetting,
) -> Result<DayBuckets> {
    let mut buckets = DayBuckets::new();
    for record in records {
        let local_time = zone.localize(&record.timestamp(format)?);
        buckets
            .entry(DayKey::from_datetime(&local_time))
            .or_default()
            .push(DatedRecord { record, local_time });
    }
    Ok(buckets)
}

/// Orders a day's records most recent first.
///
/// The sort is stable: records with identical timestamps keep their
/// encounter order.
pub fn newest_first(records: &mut [DatedRecord]) {
    records.sort_by(|a, b| b.local_time.cmp(&a.local_time));
}
