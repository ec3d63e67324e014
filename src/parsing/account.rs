//! Account metadata extraction.
//!
//! The account entry payload looks like:
//!
//! ```json
//! [{"account": {"username": "alice", "accountId": "123", ...}}]
//! ```
//!
//! Only the first element is consulted.

use serde::Deserialize;

use crate::error::{Result, TweetpackError};

#[derive(Debug, Deserialize)]
struct AccountEntry {
    #[serde(default)]
    account: Option<AccountInfo>,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(default)]
    username: Option<String>,
}

/// Returns the username of the first account entry.
///
/// Fails with [`TweetpackError::MissingAccountMetadata`] when the array is
/// empty or the first entry has no username, and with
/// [`TweetpackError::MalformedInput`] when the payload does not decode.
pub fn parse_account_handle(payload: &[u8]) -> Result<String> {
    let entries: Vec<AccountEntry> =
        serde_json::from_slice(payload).map_err(TweetpackError::malformed_json)?;
    entries
        .into_iter()
        .next()
        .and_then(|entry| entry.account)
        .and_then(|account| account.username)
        .filter(|name| !name.is_empty())
        .ok_or(TweetpackError::MissingAccountMetadata { entry: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_wins() {
        let payload = br#"[{"account": {"username": "alice"}}, {"account": {"username": "bob"}}]"#;
        assert_eq!(parse_account_handle(payload).unwrap(), "alice");
    }

    #[test]
    fn test_empty_array_is_missing() {
        let err = parse_account_handle(b"[]").unwrap_err();
        assert!(matches!(err, TweetpackError::MissingAccountMetadata { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_missing_username_is_missing() {
        let err = parse_account_handle(br#"[{"account": {"accountId": "1"}}]"#).unwrap_err();
        assert!(matches!(err, TweetpackError::MissingAccountMetadata { .. }));
    }

    #[test]
    fn test_malformed_is_fatal() {
        let err = parse_account_handle(b"{not json").unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.is_fatal());
    }
}
