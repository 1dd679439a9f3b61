//! Transfer error type for retry classification.

use thiserror::Error;

/// Error returned by a single GET (curl failure, HTTP error, or local write failure).
/// Kept separate from `anyhow` so it can be classified before retry decisions.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
