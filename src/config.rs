//! Pipeline configuration.
//!
//! [`PipelineConfig`] is a plain builder-style struct with no CLI framework
//! dependency; the binary fills it from command-line flags.
//!
//! # Example
//!
//! ```rust
//! use tweetpack::config::{PipelineConfig, TimeZoneSetting};
//!
//! let config = PipelineConfig::new()
//!     .with_output_root("journal")
//!     .with_link_prefix("../blob/master/journal")
//!     .with_time_zone("+09:00".parse::<TimeZoneSetting>().unwrap());
//!
//! assert_eq!(config.link_prefix, "../blob/master/journal");
//! ```

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Largest offset chrono accepts, in seconds.
const MAX_OFFSET_SECONDS: i32 = 86_399;

/// Time zone used to decide which calendar day a tweet belongs to.
///
/// Deserialization rejects fixed offsets of a day or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "TimeZoneRepr")]
pub enum TimeZoneSetting {
    /// The host's local time zone (honours `TZ`)
    #[default]
    Local,

    /// A fixed offset east of UTC, in seconds
    Fixed {
        /// Seconds east of UTC
        seconds_east: i32,
    },
}

/// Unvalidated serde shape of [`TimeZoneSetting`].
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TimeZoneRepr {
    Local,
    Fixed { seconds_east: i32 },
}

impl TryFrom<TimeZoneRepr> for TimeZoneSetting {
    type Error = String;

    fn try_from(repr: TimeZoneRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeZoneRepr::Local => Ok(TimeZoneSetting::Local),
            TimeZoneRepr::Fixed { seconds_east } => TimeZoneSetting::fixed(seconds_east),
        }
    }
}

impl TimeZoneSetting {
    /// A fixed offset, rejecting offsets of a day or more.
    pub fn fixed(seconds_east: i32) -> Result<Self, String> {
        if seconds_east.unsigned_abs() > MAX_OFFSET_SECONDS.unsigned_abs() {
            return Err(format!(
                "UTC offset of {} seconds is out of range (at most {} either way)",
                seconds_east, MAX_OFFSET_SECONDS
            ));
        }
        Ok(TimeZoneSetting::Fixed { seconds_east })
    }

    /// UTC.
    pub fn utc() -> Self {
        TimeZoneSetting::Fixed { seconds_east: 0 }
    }

    /// Converts a parsed timestamp into civil time of this zone.
    ///
    /// A `Fixed` value built directly with an out-of-range offset is
    /// treated as UTC; [`fixed`](Self::fixed), parsing and deserialization
    /// never produce one.
    pub fn localize<Tz: TimeZone>(&self, ts: &DateTime<Tz>) -> DateTime<FixedOffset> {
        match self {
            TimeZoneSetting::Local => ts.with_timezone(&Local).fixed_offset(),
            TimeZoneSetting::Fixed { seconds_east } => {
                let offset = FixedOffset::east_opt(*seconds_east).unwrap_or_else(|| Utc.fix());
                ts.with_timezone(&offset)
            }
        }
    }
}

impl std::fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Fixed { seconds_east: 0 } => write!(f, "UTC"),
            TimeZoneSetting::Fixed { seconds_east } => {
                let sign = if *seconds_east < 0 { '-' } else { '+' };
                let abs = seconds_east.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
            }
        }
    }
}

impl std::str::FromStr for TimeZoneSetting {
    type Err = String;

    /// Accepts `local`, `utc`, `z`, `+HH:MM`, `-HHMM` or `+HH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "local" => return Ok(TimeZoneSetting::Local),
            "utc" | "z" => return Ok(TimeZoneSetting::utc()),
            _ => {}
        }

        let invalid = || {
            format!(
                "Unknown UTC offset: '{}'. Expected local, UTC, +HH:MM or -HHMM",
                s
            )
        };

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let (hours, minutes) = match digits.len() {
            2 => (&digits[..2], "0"),
            4 => (&digits[..2], &digits[2..]),
            _ => return Err(invalid()),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        TimeZoneSetting::fixed(sign * (hours * 3600 + minutes * 60))
    }
}

/// Configuration for one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory under which `YYYY/MM/DD.md` documents are written (default: `.`)
    pub output_root: PathBuf,

    /// Prefix joined in front of `YYYY/MM/DD.md` in index links (default: `.`)
    pub link_prefix: String,

    /// Zone used to bucket tweets into days (default: host local)
    pub time_zone: TimeZoneSetting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            link_prefix: ".".to_string(),
            time_zone: TimeZoneSetting::Local,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output root directory.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Sets the link prefix used by the index.
    #[must_use]
    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = prefix.into();
        self
    }

    /// Sets the bucketing time zone.
    #[must_use]
    pub fn with_time_zone(mut self, zone: TimeZoneSetting) -> Self {
        self.time_zone = zone;
        self
    }
}
