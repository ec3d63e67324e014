//! Raw export shapes and their normalization.
//!
//! - [`tweet`] decodes tweet entries into [`Record`](crate::Record)s
//! - [`account`] extracts the fallback author handle from account metadata
//!
//! Both operate on an already de-framed JSON payload; skipping the
//! JavaScript assignment header is done by
//! [`SchemaVariant::strip_framing`](crate::schema::SchemaVariant::strip_framing).

pub mod account;
pub mod tweet;

pub use account::parse_account_handle;
pub use tweet::{RawTweet, RawUser, normalize};
