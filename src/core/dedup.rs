//! Run-scoped record deduplication.
//!
//! The same tweet can appear in more than one archive (or more than once in
//! a single archive). [`DedupTracker`] remembers every numeric id admitted
//! during the current run so each one is emitted at most once. Records whose
//! id does not parse cannot be tracked and are always admitted.
//!
//! The tracker is not persisted: a fresh run starts empty.

use std::collections::HashSet;

use tracing::warn;

use crate::Record;

/// Set of record ids already admitted during this run.
#[derive(Debug, Default, Clone)]
pub struct DedupTracker {
    seen: HashSet<u64>,
}

impl DedupTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` only for an id that has already been marked.
    ///
    /// `None` (no parseable id) always returns `true`.
    pub fn should_process(&self, id: Option<u64>) -> bool {
        match id {
            Some(id) => !self.seen.contains(&id),
            None => true,
        }
    }

    /// Records an id as processed. `None` is a no-op.
    pub fn mark_processed(&mut self, id: Option<u64>) {
        if let Some(id) = id {
            self.seen.insert(id);
        }
    }

    /// Number of distinct ids marked so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if no id has been marked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Filters `records` down to the ones not seen before, marking each
    /// admitted id. Returns the admitted records in input order and the
    /// number of duplicates dropped.
    pub fn admit(&mut self, records: Vec<Record>) -> (Vec<Record>, usize) {
        let mut skipped = 0;
        let admitted = records
            .into_iter()
            .filter(|record| {
                let id = match record.id() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        warn!(error = %err, "record cannot be deduplicated");
                        None
                    }
                };
                if self.should_process(id) {
                    self.mark_processed(id);
                    true
                } else {
                    skipped += 1;
                    false
                }
            })
            .collect();
        (admitted, skipped)
    }
}
