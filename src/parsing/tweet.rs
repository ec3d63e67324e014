//! Tweet entry normalization.
//!
//! A tweet entry payload is a JSON array. Depending on the export version
//! each element is either the tweet object itself or a wrapper whose
//! `tweet` field holds the complete tweet:
//!
//! ```json
//! [
//!   {"id_str": "1", "text": "hi", "created_at": "...", "user": {"screen_name": "alice"}},
//!   {"tweet": {"id_str": "2", "full_text": "bye", "created_at": "..."}}
//! ]
//! ```
//!
//! When the wrapper field is present it replaces the outer object before
//! anything else is read.

use serde::Deserialize;
use serde_json::Value;

use crate::Record;
use crate::error::{Result, TweetpackError};

/// Raw tweet object as found in any export version.
#[derive(Debug, Default, Deserialize)]
pub struct RawTweet {
    /// Identifier as a string (all modern exports)
    #[serde(default)]
    pub id_str: Option<String>,
    /// Numeric identifier (some legacy exports carry only this)
    #[serde(default)]
    pub id: Option<Value>,
    /// Primary text
    #[serde(default)]
    pub text: Option<String>,
    /// Extended text, used when `text` is empty
    #[serde(default)]
    pub full_text: Option<String>,
    /// Timestamp in the variant's format
    #[serde(default)]
    pub created_at: Option<String>,
    /// Author, present in legacy exports
    #[serde(default)]
    pub user: Option<RawUser>,
    /// Newer exports wrap each record as `{"tweet": {...}}`
    #[serde(default)]
    pub tweet: Option<Box<RawTweet>>,
}

/// Raw author object.
#[derive(Debug, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub screen_name: Option<String>,
}

impl RawTweet {
    /// Substitutes the nested replacement payload, if any.
    #[must_use]
    pub fn resolve(self) -> RawTweet {
        match self.tweet {
            Some(inner) => *inner,
            None => self,
        }
    }

    /// Returns the id text: `id_str`, else `id` rendered as text, else empty.
    pub fn id_text(&self) -> String {
        if let Some(id) = self.id_str.as_deref().filter(|s| !s.is_empty()) {
            return id.to_string();
        }
        match &self.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// Converts into a [`Record`]. Call [`resolve`](Self::resolve) first.
    pub fn into_record(self) -> Record {
        let id = self.id_text();
        let body = extract_body(self.text, self.full_text);
        let mut record = Record::new(id, body, self.created_at.unwrap_or_default());
        if let Some(name) = self.user.and_then(|u| u.screen_name) {
            record = record.with_author(name);
        }
        record
    }
}

/// Picks `text`, falling back to `full_text` when `text` is missing or empty.
pub fn extract_body(text: Option<String>, full_text: Option<String>) -> String {
    match text {
        Some(text) if !text.is_empty() => text,
        _ => full_text.unwrap_or_default(),
    }
}

/// Decodes a de-framed tweet payload into records, in payload order.
///
/// Fails with [`TweetpackError::MalformedInput`] when the payload is not a
/// JSON array of objects. Timestamps and ids are not validated here.
pub fn normalize(payload: &[u8]) -> Result<Vec<Record>> {
    let raws: Vec<RawTweet> =
        serde_json::from_slice(payload).map_err(TweetpackError::malformed_json)?;
    Ok(raws
        .into_iter()
        .map(|raw| raw.resolve().into_record())
        .collect())
}
