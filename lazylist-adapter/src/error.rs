use alloc::string::String;

use thiserror::Error;

/// Why a page fetch failed.
///
/// Fetches are all-or-nothing: on failure nothing is appended, existing pages
/// are untouched, and the next end-of-window trigger may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport failed before a page arrived.
    #[error("network error: {0}")]
    Network(String),
    /// A response arrived but could not be decoded into a page.
    #[error("decode error: {0}")]
    Decode(String),
}

/// The external refresh operation failed.
///
/// The pull indicator returns to rest either way; callers that want to show
/// the outcome surface it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("refresh failed: {0}")]
pub struct RefreshError(pub String);
