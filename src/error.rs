//! Unified error types for tweetpack.
//!
//! This module provides a single [`TweetpackError`] enum that covers every
//! failure the pipeline can surface. Most variants are fatal and abort the
//! run; two of them ([`InvalidIdentifier`](TweetpackError::InvalidIdentifier)
//! and [`MissingAccountMetadata`](TweetpackError::MissingAccountMetadata))
//! are returned by low-level helpers so callers can decide to degrade
//! instead of aborting.
//!
//! # Entry context
//!
//! The normalizer is a pure transform and does not know which archive entry
//! it is looking at. Callers attach that context afterwards with
//! [`TweetpackError::with_entry`]:
//!
//! ```rust
//! use tweetpack::TweetpackError;
//!
//! let err = TweetpackError::missing_framing('=').with_entry("data/tweets.js");
//! assert!(err.to_string().contains("data/tweets.js"));
//! ```

use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for tweetpack operations.
pub type Result<T> = std::result::Result<T, TweetpackError>;

/// The error type for all tweetpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TweetpackError {
    /// An I/O error without a more specific location (e.g. writing the index to stdout).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Creating a directory or opening/writing a day-document failed.
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// The directory or document being touched
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The compressed container could not be opened or an entry could not be read.
    #[error("Cannot read archive {}: {source}", path.display())]
    Archive {
        /// The archive on disk
        path: PathBuf,
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// A JSON/structural decode failure.
    #[error("Malformed input{}: {source}", in_entry(entry))]
    MalformedInput {
        /// The archive entry being decoded, if known
        entry: Option<String>,
        /// What went wrong
        #[source]
        source: ParseErrorKind,
    },

    /// A record's timestamp does not match its schema variant's format.
    #[error("Invalid timestamp '{value}'{} (expected '{format}'): {source}", in_entry(entry))]
    TimestampParse {
        /// The archive entry being decoded, if known
        entry: Option<String>,
        /// The raw timestamp text
        value: String,
        /// The chrono format string that was applied
        format: &'static str,
        /// The underlying chrono error
        #[source]
        source: chrono::ParseError,
    },

    /// A record id is not a well-formed unsigned integer.
    ///
    /// Not fatal: the record is emitted but cannot be deduplicated.
    #[error("Invalid record id '{value}': {source}")]
    InvalidIdentifier {
        /// The raw id text
        value: String,
        /// The underlying integer parse error
        #[source]
        source: ParseIntError,
    },

    /// No usable account handle was found.
    ///
    /// Not fatal: permalinks fall back to an empty author segment.
    #[error("No account metadata found{}", in_entry(entry))]
    MissingAccountMetadata {
        /// The account entry that was inspected, if any
        entry: Option<String>,
    },

    /// An input path pattern could not be compiled.
    #[error("Invalid input pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// The underlying glob error
        #[source]
        source: globset::Error,
    },
}

/// Kinds of malformed input.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON decode error (carries line and column)
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The entry has no framing line before its JSON payload
    #[error("missing {delimiter:?} framing before JSON payload")]
    MissingFraming {
        /// The delimiter that was searched for
        delimiter: char,
    },
}

fn in_entry(entry: &Option<String>) -> String {
    entry
        .as_ref()
        .map(|name| format!(" in {name}"))
        .unwrap_or_default()
}

impl From<serde_json::Error> for TweetpackError {
    fn from(err: serde_json::Error) -> Self {
        TweetpackError::malformed_json(err)
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TweetpackError {
    /// Creates a malformed-input error from a JSON decode failure.
    pub fn malformed_json(source: serde_json::Error) -> Self {
        TweetpackError::MalformedInput {
            entry: None,
            source: ParseErrorKind::Json(source),
        }
    }

    /// Creates a malformed-input error for an entry lacking its framing line.
    pub fn missing_framing(delimiter: char) -> Self {
        TweetpackError::MalformedInput {
            entry: None,
            source: ParseErrorKind::MissingFraming { delimiter },
        }
    }

    /// Creates a timestamp parse error.
    pub fn timestamp(
        value: impl Into<String>,
        format: &'static str,
        source: chrono::ParseError,
    ) -> Self {
        TweetpackError::TimestampParse {
            entry: None,
            value: value.into(),
            format,
            source,
        }
    }

    /// Creates a filesystem error for `path`.
    pub fn filesystem(path: impl AsRef<Path>, source: io::Error) -> Self {
        TweetpackError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an archive error for `path`.
    pub fn archive(path: impl AsRef<Path>, source: zip::result::ZipError) -> Self {
        TweetpackError::Archive {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attaches the archive entry name to errors raised while decoding that entry.
    ///
    /// Errors that already carry an entry, or that are not about entry
    /// content, are returned unchanged.
    #[must_use]
    pub fn with_entry(self, name: &str) -> Self {
        match self {
            TweetpackError::MalformedInput {
                entry: None,
                source,
            } => TweetpackError::MalformedInput {
                entry: Some(name.to_string()),
                source,
            },
            TweetpackError::TimestampParse {
                entry: None,
                value,
                format,
                source,
            } => TweetpackError::TimestampParse {
                entry: Some(name.to_string()),
                value,
                format,
                source,
            },
            TweetpackError::MissingAccountMetadata { entry: None } => {
                TweetpackError::MissingAccountMetadata {
                    entry: Some(name.to_string()),
                }
            }
            other => other,
        }
    }

    /// Returns the archive entry this error was raised for, if known.
    pub fn entry(&self) -> Option<&str> {
        match self {
            TweetpackError::MalformedInput { entry, .. }
            | TweetpackError::TimestampParse { entry, .. }
            | TweetpackError::MissingAccountMetadata { entry } => entry.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this is a malformed-input error.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, TweetpackError::MalformedInput { .. })
    }

    /// Returns `true` if this is a timestamp parse error.
    pub fn is_timestamp_parse(&self) -> bool {
        matches!(self, TweetpackError::TimestampParse { .. })
    }

    /// Returns `true` if this is a filesystem error.
    pub fn is_filesystem(&self) -> bool {
        matches!(self, TweetpackError::Filesystem { .. })
    }

    /// Returns `false` for the kinds the pipeline degrades on instead of aborting.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            TweetpackError::InvalidIdentifier { .. } | TweetpackError::MissingAccountMetadata { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
