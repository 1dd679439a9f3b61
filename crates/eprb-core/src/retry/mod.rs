//! Retry and backoff policy.
//!
//! Error classification (timeouts, connection failures, retryable HTTP
//! statuses) and exponential backoff decisions live here so the registry
//! client and the batch downloader share one policy object.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy, DEFAULT_RETRY_STATUSES};
pub use run::run_with_retry;
