//! Pipeline driver.
//!
//! [`Pipeline`] owns everything that lives for one run: the dedup tracker,
//! the document writer (and its created-documents set) and the index.
//! Archives are processed strictly one after another, and within an
//! archive entries are processed in listing order:
//!
//! ```text
//! entry bytes ─► strip framing ─► normalize ─► dedup ─► partition ─► write days ─► index
//! ```
//!
//! After the last archive, [`Pipeline::render_index`] produces the
//! navigation page.
//!
//! # Example
//!
//! ```rust,no_run
//! use tweetpack::config::PipelineConfig;
//! use tweetpack::pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::new().with_output_root("journal"))?;
//! pipeline.process_archive("twitter-2021.zip")?;
//! pipeline.process_archive("twitter-2022.zip")?;
//! print!("{}", pipeline.render_index());
//! # Ok::<(), tweetpack::TweetpackError>(())
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::Record;
use crate::archive::Archive;
use crate::config::PipelineConfig;
use crate::core::{DedupTracker, DocumentWriter, Index, WriteMode, partition, render_index};
use crate::error::Result;
use crate::parsing::normalize;
use crate::schema::{EntryClassifier, SchemaVariant};

/// Counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Archives processed
    pub archives: usize,
    /// Tweet entries processed
    pub entries: usize,
    /// Records decoded from tweet entries
    pub records_seen: usize,
    /// Records written to day-documents
    pub records_written: usize,
    /// Records dropped because their id was already emitted
    pub duplicates_skipped: usize,
    /// Day-documents created
    pub documents_created: usize,
    /// Writes that appended to an already-created day-document
    pub documents_appended: usize,
}

/// Run context threading state through every stage.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    classifier: EntryClassifier,
    tracker: DedupTracker,
    writer: DocumentWriter,
    index: Index,
    summary: RunSummary,
}

impl Pipeline {
    /// Creates a pipeline with empty run state.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            classifier: EntryClassifier::new()?,
            tracker: DedupTracker::new(),
            writer: DocumentWriter::new(config.output_root.clone()),
            index: Index::new(),
            summary: RunSummary::default(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Days written so far.
    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Processes every tweet entry of one archive.
    ///
    /// The account entry is read first so its handle applies to all entries.
    /// Errors carry the archive entry name where one applies.
    pub fn process_archive(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut archive = Archive::open(path, &self.classifier)?;
        let handle = archive.account_handle()?;
        info!(archive = %path.display(), handle = %handle, "processing archive");

        for entry in archive.tweet_entries() {
            let bytes = archive.read_entry(&entry)?;
            self.process_entry(&entry.name, entry.variant, &bytes, &handle)?;
        }
        self.summary.archives += 1;
        Ok(())
    }

    /// Processes one framed entry's bytes.
    ///
    /// Entries whose variant holds no tweets are ignored.
    pub fn process_entry(
        &mut self,
        name: &str,
        variant: SchemaVariant,
        bytes: &[u8],
        fallback_author: &str,
    ) -> Result<()> {
        let Some(format) = variant.timestamp_format() else {
            return Ok(());
        };
        debug!(entry = name, %variant, bytes = bytes.len(), "reading entry");

        let records = variant
            .strip_framing(bytes)
            .and_then(normalize)
            .map_err(|e| e.with_entry(name))?;
        self.summary.entries += 1;
        self.process_records(records, format, fallback_author)
            .map_err(|e| e.with_entry(name))
    }

    /// Deduplicates, partitions and writes already-normalized records.
    ///
    /// All timestamps are validated before any day is written, so a bad
    /// timestamp leaves this batch entirely unwritten.
    pub fn process_records(
        &mut self,
        records: Vec<Record>,
        format: &'static str,
        fallback_author: &str,
    ) -> Result<()> {
        self.summary.records_seen += records.len();
        let (fresh, skipped) = self.tracker.admit(records);
        self.summary.duplicates_skipped += skipped;

        let buckets = partition(fresh, format, self.config.time_zone)?;
        for (key, mut day) in buckets {
            let outcome = self
                .writer
                .write_day(&key, &mut day, fallback_author, &mut self.index)?;
            match outcome.mode {
                WriteMode::Created => self.summary.documents_created += 1,
                WriteMode::Appended => self.summary.documents_appended += 1,
            }
            self.summary.records_written += outcome.written;
        }
        Ok(())
    }

    /// Renders the navigation index with the configured link prefix.
    pub fn render_index(&self) -> String {
        render_index(&self.index, &self.config.link_prefix)
    }

    /// Writes the navigation index to `out`.
    pub fn write_index<W: Write>(&self, out: &mut W) -> Result<()> {
        self.index.render_to(out, &self.config.link_prefix)?;
        Ok(())
    }

    /// Consumes the pipeline, returning the final index and counters.
    pub fn finish(self) -> (Index, RunSummary) {
        (self.index, self.summary)
    }
}
