//! Archive entry schema variants.
//!
//! Twitter has shipped several archive layouts over the years. Each one
//! wraps its JSON payload in a JavaScript assignment or header line and
//! formats `created_at` differently. [`SchemaVariant`] captures those
//! per-layout details, and [`EntryClassifier`] maps archive entry names to a
//! variant using a pattern table.
//!
//! | Variant | Entry names | Framing | Timestamp |
//! |---------|-------------|---------|-----------|
//! | `Legacy` | `data/js/tweets/*.js` | first line | `2013-04-01 12:34:56 +0000` |
//! | `Modern` | `tweet.js`, `data/tweet.js`, `data/tweets.js`, `data/tweets-part*.js` | up to `=` | `Sat May 01 10:00:00 +0000 2021` |
//! | `Account` | `account.js`, `data/account.js` | up to `=` | n/a |
//!
//! # Example
//!
//! ```rust
//! use tweetpack::schema::{EntryClassifier, SchemaVariant};
//!
//! let classifier = EntryClassifier::new()?;
//! assert_eq!(classifier.classify("data/tweets-part1.js"), Some(SchemaVariant::Modern));
//! assert_eq!(classifier.classify("data/js/tweets/2013_04.js"), Some(SchemaVariant::Legacy));
//! assert_eq!(classifier.classify("data/like.js"), None);
//! # Ok::<(), tweetpack::TweetpackError>(())
//! ```

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TweetpackError};

/// Entry name patterns, in precedence order.
const ENTRY_PATTERNS: &[(&str, SchemaVariant)] = &[
    ("account.js", SchemaVariant::Account),
    ("data/account.js", SchemaVariant::Account),
    ("data/js/tweets/*.js", SchemaVariant::Legacy),
    ("tweet.js", SchemaVariant::Modern),
    ("data/tweet.js", SchemaVariant::Modern),
    ("data/tweets.js", SchemaVariant::Modern),
    ("data/tweets-part*.js", SchemaVariant::Modern),
];

/// Known archive entry layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Pre-2019 archives: one file per month under `data/js/tweets/`,
    /// first line is a `Grailbird.data... =` header.
    Legacy,

    /// Current archives: `window.YTD.tweets.part0 = [ ... ]`, records
    /// optionally wrapped as `{"tweet": {...}}`.
    Modern,

    /// Account metadata: `window.YTD.account.part0 = [{"account": {...}}]`.
    Account,
}

impl SchemaVariant {
    /// Returns a display name for log messages.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaVariant::Legacy => "legacy tweets",
            SchemaVariant::Modern => "tweets",
            SchemaVariant::Account => "account",
        }
    }

    /// Returns the byte that terminates the framing prefix.
    pub fn delimiter(&self) -> u8 {
        match self {
            SchemaVariant::Legacy => b'\n',
            SchemaVariant::Modern | SchemaVariant::Account => b'=',
        }
    }

    /// Returns the chrono format of `created_at`, or `None` for entries
    /// that carry no tweet records.
    pub fn timestamp_format(&self) -> Option<&'static str> {
        match self {
            SchemaVariant::Legacy => Some("%Y-%m-%d %H:%M:%S %z"),
            SchemaVariant::Modern => Some("%a %b %d %H:%M:%S %z %Y"),
            SchemaVariant::Account => None,
        }
    }

    /// Returns `true` if entries of this variant hold tweet records.
    pub fn holds_tweets(&self) -> bool {
        self.timestamp_format().is_some()
    }

    /// Skips the framing prefix (everything up to and including the
    /// delimiter) and returns the JSON payload.
    pub fn strip_framing<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let delimiter = self.delimiter();
        bytes
            .iter()
            .position(|&b| b == delimiter)
            .map(|pos| &bytes[pos + 1..])
            .ok_or_else(|| TweetpackError::missing_framing(char::from(delimiter)))
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps archive entry names to schema variants.
///
/// `*` never crosses a `/`, so `data/js/tweets/*.js` only matches files
/// directly inside that directory.
#[derive(Debug, Clone)]
pub struct EntryClassifier {
    set: GlobSet,
}

impl EntryClassifier {
    /// Compiles the built-in pattern table.
    pub fn new() -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for (pattern, _) in ENTRY_PATTERNS {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| TweetpackError::InvalidPattern {
                    pattern: (*pattern).to_string(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| TweetpackError::InvalidPattern {
                pattern: "<entry table>".to_string(),
                source,
            })?;
        Ok(Self { set })
    }

    /// Returns the variant of the first matching pattern, if any.
    pub fn classify(&self, entry_name: &str) -> Option<SchemaVariant> {
        self.set
            .matches(entry_name)
            .into_iter()
            .min()
            .map(|idx| ENTRY_PATTERNS[idx].1)
    }
}
