//! Batch downloader.
//!
//! Each expected file is an independent task. A fixed-size pool of worker
//! threads drains a shared queue; results come back over a channel and are
//! counted as they complete. One failed transfer never cancels the others.

mod pool;

use crate::http::HttpClient;
use crate::retry::FetchError;
use std::path::{Path, PathBuf};

pub use pool::download_all;

/// Default cap on concurrent transfers.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Something that can GET a URL into a local file.
pub trait Fetch: Sync {
    /// Returns bytes written. Must leave nothing at `dest` on error.
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

impl Fetch for HttpClient {
    fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.download_to(url, dest)
    }
}

/// Outcome of one file transfer.
#[derive(Debug)]
pub enum DownloadResult {
    Succeeded { bytes: u64 },
    Failed { cause: FetchError },
}

/// A transfer that did not produce its file.
#[derive(Debug)]
pub struct DownloadFailure {
    pub path: PathBuf,
    pub cause: FetchError,
}

/// Result of a whole batch. `failures` is in expected-file order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub bytes: u64,
    pub failures: Vec<DownloadFailure>,
}

/// Downloads one file. Every error is caught here, logged and turned into
/// `DownloadResult::Failed`.
pub fn download_one<F: Fetch + ?Sized>(fetcher: &F, url: &str, path: &Path) -> DownloadResult {
    match fetcher.fetch_to(url, path) {
        Ok(bytes) => DownloadResult::Succeeded { bytes },
        Err(cause) => {
            tracing::debug!(url, path = %path.display(), error = %cause, "download failed");
            DownloadResult::Failed { cause }
        }
    }
}
