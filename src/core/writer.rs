//! Per-day Markdown document emission.
//!
//! Each day is written to `<root>/<YYYY>/<MM>/<DD>.md`. The first time a
//! document is touched during a run it is created (truncating any file
//! left by a previous run) and gets a header with the number of records in
//! that write; later writes in the same run append entries without a new
//! header, so the header count only reflects the first write.
//!
//! Each entry looks like:
//!
//! ```text
//! <escaped body>
//! *[2021-05-01 12:00:00 +0000](https://twitter.com/alice/status/2)*
//!
//! ```

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::index::Index;
use super::partition::{DatedRecord, DayKey, newest_first};
use crate::error::{Result, TweetpackError};

/// Format of the timestamp shown in each entry's link text.
pub const ENTRY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Set of document paths created during this run.
#[derive(Debug, Default, Clone)]
pub struct DocumentState {
    created: HashSet<PathBuf>,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `path` was created earlier in this run.
    pub fn is_created(&self, path: &Path) -> bool {
        self.created.contains(path)
    }

    fn mark_created(&mut self, path: PathBuf) {
        self.created.insert(path);
    }

    /// Number of documents created so far.
    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// How a day-document was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// First write in this run: truncated and given a header
    Created,
    /// Document already created in this run: entries appended
    Appended,
}

/// Outcome of writing one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWrite {
    pub path: PathBuf,
    pub mode: WriteMode,
    pub written: usize,
}

/// Writes day buckets under an output root.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    root: PathBuf,
    state: DocumentState,
}

impl DocumentWriter {
    /// Creates a writer rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: DocumentState::new(),
        }
    }

    /// Returns the output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the per-run document state.
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Returns the document path for `key`.
    pub fn document_path(&self, key: &DayKey) -> PathBuf {
        self.root
            .join(key.year())
            .join(key.month())
            .join(format!("{}.md", key.day()))
    }

    /// Writes one day's records, most recent first.
    ///
    /// `key` is added to `index` after the first entry reaches the file. On
    /// a write error the remaining records of the day are skipped; bytes
    /// already written stay on disk. The file is closed on every path.
    pub fn write_day(
        &mut self,
        key: &DayKey,
        records: &mut [DatedRecord],
        fallback_author: &str,
        index: &mut Index,
    ) -> Result<DayWrite> {
        let path = self.document_path(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| TweetpackError::filesystem(dir, e))?;
        }

        newest_first(records);

        let (mut file, mode) = if self.state.is_created(&path) {
            let file = OpenOptions::new()
                .append(true)
                .open(&path)
                .map_err(|e| TweetpackError::filesystem(&path, e))?;
            warn!(
                path = %path.display(),
                records = records.len(),
                "reopened day document; header count left unchanged"
            );
            (file, WriteMode::Appended)
        } else {
            let mut file =
                File::create(&path).map_err(|e| TweetpackError::filesystem(&path, e))?;
            self.state.mark_created(path.clone());
            file.write_all(day_header(key, records.len()).as_bytes())
                .map_err(|e| TweetpackError::filesystem(&path, e))?;
            (file, WriteMode::Created)
        };

        let mut written = 0;
        for dated in records.iter() {
            file.write_all(format_entry(dated, fallback_author).as_bytes())
                .map_err(|e| TweetpackError::filesystem(&path, e))?;
            if written == 0 {
                index.insert(key);
            }
            written += 1;
        }

        debug!(path = %path.display(), ?mode, written, "day document written");
        Ok(DayWrite {
            path,
            mode,
            written,
        })
    }
}

/// Header line of a freshly created day-document.
pub fn day_header(key: &DayKey, count: usize) -> String {
    format!("### {} ({} tweets)\n\n", key, count)
}

/// Renders one entry: escaped body, then the timestamp/permalink line.
pub fn format_entry(dated: &DatedRecord, fallback_author: &str) -> String {
    format!(
        "{}  \n*[{}]({})*\n\n",
        escape_markdown(dated.record.body()),
        dated.local_time.format(ENTRY_TIME_FORMAT),
        dated.record.permalink(fallback_author)
    )
}

/// Escapes a body for Markdown.
///
/// Newlines become hard breaks (`"  \n"`); `*`, `-`, `[` and `]` get a
/// leading backslash. Single pass, so already-escaped text is escaped again
/// rather than skipped.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("  \n"),
            '*' | '-' | '[' | ']' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use crate::config::TimeZoneSetting;
    use crate::core::partition::partition;
    use tempfile::tempdir;

    const MODERN: &str = "%a %b %d %H:%M:%S %z %Y";

    fn day(records: Vec<Record>) -> (DayKey, Vec<DatedRecord>) {
        partition(records, MODERN, TimeZoneSetting::utc())
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a*b"), "a\\*b");
        assert_eq!(escape_markdown("[x](y)"), "\\[x\\](y)");
        assert_eq!(escape_markdown("well-known"), "well\\-known");
        assert_eq!(escape_markdown("l1\nl2"), "l1  \nl2");
        assert_eq!(escape_markdown("plain #tag @you"), "plain #tag @you");
    }

    #[test]
    fn test_escape_markdown_no_double_processing() {
        assert_eq!(escape_markdown("\\*"), "\\\\*");
        assert_eq!(escape_markdown("-\n-"), "\\-  \n\\-");
    }

    #[test]
    fn test_day_header() {
        let key = DayKey::parse("20210501").unwrap();
        assert_eq!(day_header(&key, 2), "### 2021/05/01 (2 tweets)\n\n");
    }

    #[test]
    fn test_format_entry() {
        let (_, records) = day(vec![Record::new("2", "bye", "Sat May 01 12:00:00 +0000 2021")]);
        assert_eq!(
            format_entry(&records[0], "alice"),
            "bye  \n*[2021-05-01 12:00:00 +0000](https://twitter.com/alice/status/2)*\n\n"
        );
    }

    #[test]
    fn test_write_day_creates_document() {
        let dir = tempdir().unwrap();
        let mut writer = DocumentWriter::new(dir.path());
        let mut index = Index::new();
        let (key, mut records) = day(vec![
            Record::new("1", "hi", "Sat May 01 10:00:00 +0000 2021"),
            Record::new("2", "bye", "Sat May 01 12:00:00 +0000 2021"),
        ]);

        let outcome = writer.write_day(&key, &mut records, "alice", &mut index).unwrap();
        assert_eq!(outcome.mode, WriteMode::Created);
        assert_eq!(outcome.written, 2);
        assert_eq!(outcome.path, dir.path().join("2021").join("05").join("01.md"));

        let content = fs::read_to_string(&outcome.path).unwrap();
        assert!(content.starts_with("### 2021/05/01 (2 tweets)\n\n"));
        assert!(content.find("bye").unwrap() < content.find("hi").unwrap());
        assert!(index.contains("2021", "05", "01"));
    }

    #[test]
    fn test_write_day_appends_without_header() {
        let dir = tempdir().unwrap();
        let mut writer = DocumentWriter::new(dir.path());
        let mut index = Index::new();

        let (key, mut first) = day(vec![Record::new("1", "one", "Sat May 01 10:00:00 +0000 2021")]);
        writer.write_day(&key, &mut first, "a", &mut index).unwrap();

        let (_, mut second) = day(vec![
            Record::new("2", "two", "Sat May 01 11:00:00 +0000 2021"),
            Record::new("3", "three", "Sat May 01 12:00:00 +0000 2021"),
        ]);
        let outcome = writer.write_day(&key, &mut second, "a", &mut index).unwrap();
        assert_eq!(outcome.mode, WriteMode::Appended);

        let content = fs::read_to_string(&outcome.path).unwrap();
        assert_eq!(content.matches("### ").count(), 1);
        assert!(content.contains("(1 tweets)"));
        assert!(content.contains("one"));
        assert!(content.contains("three"));
        assert_eq!(writer.state().len(), 1);
    }

    #[test]
    fn test_first_write_in_run_truncates_stale_file() {
        let dir = tempdir().unwrap();
        let mut writer = DocumentWriter::new(dir.path());
        let (key, mut records) = day(vec![Record::new("1", "fresh", "Sat May 01 10:00:00 +0000 2021")]);
        let path = writer.document_path(&key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale content from an earlier run\n").unwrap();

        writer
            .write_day(&key, &mut records, "a", &mut Index::new())
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("fresh"));
    }

    #[test]
    fn test_write_day_filesystem_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();
        let mut writer = DocumentWriter::new(&blocker);
        let mut index = Index::new();
        let (key, mut records) = day(vec![Record::new("1", "x", "Sat May 01 10:00:00 +0000 2021")]);

        let err = writer
            .write_day(&key, &mut records, "a", &mut index)
            .unwrap_err();
        assert!(err.is_filesystem());
        assert!(index.is_empty());
    }
}
