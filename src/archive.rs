//! Reading Twitter archive zip files.
//!
//! [`Archive`] opens a zip container, classifies its entries with an
//! [`EntryClassifier`] and hands out raw entry bytes. It never interprets
//! tweet payloads itself; that is the pipeline's job.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Result, TweetpackError};
use crate::parsing::parse_account_handle;
use crate::schema::{EntryClassifier, SchemaVariant};

/// A classified archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position in the zip central directory
    pub index: usize,
    /// Entry name as stored in the archive
    pub name: String,
    /// Detected layout
    pub variant: SchemaVariant,
}

/// An opened archive with its recognised entries in listing order.
pub struct Archive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Opens `path` and classifies every entry.
    ///
    /// Entries that are directories or match no known layout are ignored.
    pub fn open(path: impl AsRef<Path>, classifier: &EntryClassifier) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| TweetpackError::archive(&path, ZipError::Io(e)))?;
        let mut zip =
            ZipArchive::new(BufReader::new(file)).map_err(|e| TweetpackError::archive(&path, e))?;

        let mut entries = Vec::new();
        for index in 0..zip.len() {
            let file = zip
                .by_index_raw(index)
                .map_err(|e| TweetpackError::archive(&path, e))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            match classifier.classify(&name) {
                Some(variant) => entries.push(ArchiveEntry {
                    index,
                    name,
                    variant,
                }),
                None => debug!(entry = %name, "skipping unrecognised entry"),
            }
        }

        Ok(Self {
            path,
            zip,
            entries,
        })
    }

    /// Path of the archive on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recognised entries in listing order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entries that hold tweet records, in listing order.
    pub fn tweet_entries(&self) -> Vec<ArchiveEntry> {
        self.entries
            .iter()
            .filter(|e| e.variant.holds_tweets())
            .cloned()
            .collect()
    }

    /// Reads an entry's full decompressed content.
    pub fn read_entry(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let mut file = self
            .zip
            .by_index(entry.index)
            .map_err(|e| TweetpackError::archive(&self.path, e))?;
        let mut buf = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
        file.read_to_end(&mut buf)
            .map_err(|e| TweetpackError::archive(&self.path, ZipError::Io(e)))?;
        Ok(buf)
    }

    /// Returns the fallback author handle from the first account entry.
    ///
    /// A missing account entry, or one without a username, yields an empty
    /// handle with a warning. A malformed account entry is an error.
    pub fn account_handle(&mut self) -> Result<String> {
        let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.variant == SchemaVariant::Account)
            .cloned()
        else {
            warn!(archive = %self.path.display(), "no account entry; permalinks use an empty handle");
            return Ok(String::new());
        };

        let bytes = self.read_entry(&entry)?;
        let handle = entry
            .variant
            .strip_framing(&bytes)
            .and_then(parse_account_handle)
            .map_err(|e| e.with_entry(&entry.name));

        match handle {
            Ok(handle) => Ok(handle),
            Err(err) if !err.is_fatal() => {
                warn!(archive = %self.path.display(), error = %err, "permalinks use an empty handle");
                Ok(String::new())
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
