//! # Tweetpack
//!
//! A Rust library for turning Twitter archive exports into a journal of
//! per-day Markdown documents plus a year/month index.
//!
//! ## Overview
//!
//! Tweetpack reads one or more archive zip files and understands the two
//! layouts Twitter has shipped over the years:
//! - **Legacy** - `data/js/tweets/YYYY_MM.js` monthly files
//! - **Modern** - `tweet.js`, `data/tweets.js` and `data/tweets-partN.js`
//!
//! Tweets are deduplicated by id across all archives, grouped by calendar
//! day in a chosen time zone and written to `<root>/YYYY/MM/DD.md`, newest
//! first. The index links every written day.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tweetpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = PipelineConfig::new()
//!         .with_output_root("journal")
//!         .with_link_prefix("journal")
//!         .with_time_zone(TimeZoneSetting::utc());
//!
//!     let mut pipeline = Pipeline::new(config)?;
//!     for archive in expand_inputs(&["exports/*.zip"])? {
//!         pipeline.process_archive(archive)?;
//!     }
//!     print!("{}", pipeline.render_index());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`pipeline`] - [`Pipeline`] run context and [`RunSummary`](pipeline::RunSummary)
//! - [`archive`] - zip container access
//! - [`schema`] - entry classification and framing ([`SchemaVariant`](schema::SchemaVariant))
//! - [`parsing`] - tweet and account payload decoding
//! - [`core`] - dedup, day partitioning, document writing and the index
//! - [`record`] - the normalized [`Record`]
//! - [`inputs`] - glob expansion of input arguments
//! - [`config`] - [`PipelineConfig`](config::PipelineConfig) and time zone selection
//! - [`error`] - [`TweetpackError`] and [`Result`]
//! - [`prelude`] - Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod inputs;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parsing;
pub mod pipeline;
pub mod record;
pub mod schema;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TweetpackError};
pub use pipeline::Pipeline;
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tweetpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Pipeline, Record};

    // Error types
    pub use crate::error::{Result, TweetpackError};

    // Configuration
    pub use crate::config::{PipelineConfig, TimeZoneSetting};

    // Stages
    pub use crate::core::{DedupTracker, DocumentWriter, Index, partition, render_index};
    pub use crate::inputs::expand_inputs;
    pub use crate::parsing::normalize;
    pub use crate::pipeline::RunSummary;
    pub use crate::schema::{EntryClassifier, SchemaVariant};
}
