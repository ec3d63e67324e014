//! Core pipeline stages.
//!
//! This module contains:
//! - [`dedup`] - Run-scoped set of already-processed record ids
//! - [`partition`] - Grouping of records into local calendar days
//! - [`writer`] - Per-day Markdown document emission
//! - [`index`] - Year/month/day index and its rendering
//!
//! The stages are plain state objects threaded through by
//! [`Pipeline`](crate::pipeline::Pipeline); nothing here is global.

pub mod dedup;
pub mod index;
pub mod partition;
pub mod writer;

pub use dedup::DedupTracker;
pub use index::{Index, render_index};
pub use partition::{DatedRecord, DayBucket, DayBuckets, DayKey, newest_first, partition};
pub use writer::{DayWrite, DocumentState, DocumentWriter, WriteMode, escape_markdown};
