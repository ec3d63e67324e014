//! Normalized tweet record.
//!
//! [`Record`] is what every schema variant is normalized into before
//! deduplication and day partitioning. It keeps the raw `id` and
//! `created_at` text from the export: the id is parsed lazily for
//! deduplication, and the timestamp is parsed by the day partitioner with
//! the format of the schema variant the record came from.
//!
//! # Example
//!
//! ```
//! use tweetpack::Record;
//!
//! let record = Record::new("1", "hi", "Sat May 01 10:00:00 +0000 2021").with_author("alice");
//! assert_eq!(record.id().ok(), Some(1));
//! assert_eq!(record.permalink(""), "https://twitter.com/alice/status/1");
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TweetpackError};

/// Base URL for constructed permalinks.
pub const PERMALINK_BASE: &str = "https://twitter.com";

/// A single normalized tweet.
///
/// | Field | Description |
/// |-------|-------------|
/// | `id` | Raw id text; parsed as `u64` for deduplication |
/// | `body` | Display text (`text`, falling back to `full_text`) |
/// | `created_at` | Raw timestamp text in the variant's format |
/// | `author` | Screen name, when the record carries one |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Raw identifier as found in the export (may be empty in legacy exports).
    pub id: String,

    /// Text to render. Newlines are preserved.
    pub body: String,

    /// Raw timestamp text.
    pub created_at: String,

    /// Screen name of the author, if the record names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub author: Option<String>,
}

impl Record {
    /// Creates a record without an author.
    pub fn new(
        id: impl Into<String>,
        body: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            created_at: created_at.into(),
            author: None,
        }
    }

    /// Builder method to set the author handle.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Returns the raw id text.
    pub fn id_str(&self) -> &str {
        &self.id
    }

    /// Parses the id as an unsigned integer.
    ///
    /// Fails with [`TweetpackError::InvalidIdentifier`] for empty or
    /// non-numeric ids; callers treat that as "cannot deduplicate".
    pub fn id(&self) -> Result<u64> {
        // `u64::from_str` accepts a leading `+`; ids never carry a sign.
        let parsed = match self.id.strip_prefix('+') {
            Some(_) => "+".parse::<u64>(),
            None => self.id.parse::<u64>(),
        };
        parsed.map_err(|source| TweetpackError::InvalidIdentifier {
                value: self.id.clone(),
                source,
            })
    }

    /// Returns the body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the raw timestamp text.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Returns the author handle, if present.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Parses `created_at` with a chrono format string.
    pub fn timestamp(&self, format: &'static str) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_str(&self.created_at, format)
            .map_err(|source| TweetpackError::timestamp(&self.created_at, format, source))
    }

    /// Builds the status permalink, using `fallback_author` when the record
    /// has no author of its own.
    pub fn permalink(&self, fallback_author: &str) -> String {
        let author = self.author().unwrap_or(fallback_author);
        format!("{PERMALINK_BASE}/{author}/status/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_record_new() {
        let record = Record::new("42", "hello", "2013-04-01 12:00:00 +0000");
        assert_eq!(record.id_str(), "42");
        assert_eq!(record.body(), "hello");
        assert!(record.author().is_none());
    }

    #[test]
    fn test_id_parse() {
        assert_eq!(Record::new("1234567890123", "", "").id().unwrap(), 1234567890123);
    }

    #[test]
    fn test_id_parse_invalid() {
        let err = Record::new("", "", "").id().unwrap_err();
        assert!(!err.is_fatal());
        assert!(Record::new("-5", "", "").id().is_err());
        assert!(Record::new("12a", "", "").id().is_err());
        assert!(Record::new("+5", "", "").id().is_err());
    }

    #[test]
    fn test_timestamp_modern() {
        let record = Record::new("1", "", "Sat May 01 10:00:00 +0000 2021");
        let ts = record.timestamp("%a %b %d %H:%M:%S %z %Y").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 5, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_timestamp_legacy_with_offset() {
        let record = Record::new("1", "", "2013-04-01 23:30:00 +0900");
        let ts = record.timestamp("%Y-%m-%d %H:%M:%S %z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2013, 4, 1, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_timestamp_mismatch() {
        let record = Record::new("1", "", "2021-05-01T10:00:00Z");
        let err = record.timestamp("%a %b %d %H:%M:%S %z %Y").unwrap_err();
        assert!(err.is_timestamp_parse());
        assert!(err.to_string().contains("2021-05-01T10:00:00Z"));
    }

    #[test]
    fn test_permalink_prefers_own_author() {
        let record = Record::new("7", "", "").with_author("bob");
        assert_eq!(record.permalink("alice"), "https://twitter.com/bob/status/7");
    }

    #[test]
    fn test_permalink_fallback() {
        let record = Record::new("7", "", "");
        assert_eq!(record.permalink("alice"), "https://twitter.com/alice/status/7");
        assert_eq!(record.permalink(""), "https://twitter.com//status/7");
    }

    #[test]
    fn test_record_serialization() {
        let record = Record::new("1", "hi", "x");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("author"));
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
