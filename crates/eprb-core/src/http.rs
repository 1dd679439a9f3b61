//! Shared HTTP GET client.
//!
//! Wraps libcurl (via the `curl` crate) with an injected [`RetryPolicy`].
//! Idle `Easy` handles are pooled so concurrent workers reuse connections;
//! the client itself is `Sync` and meant to be shared behind an `Arc`.
//!
//! Downloads stream into a hidden temp file next to the destination and are
//! persisted under the final name only once the transfer succeeded. Every
//! attempt gets its own temp file, so two transfers aimed at the same name
//! never share bytes; the later rename wins.

use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use curl::easy::Easy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Suffix of the temp file a body is streamed into before the rename to its final name.
const TEMP_SUFFIX: &str = ".part";

/// Transport knobs applied to every request.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Upper bound for one whole transfer (one attempt).
    pub transfer_timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            user_agent: format!("eprb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// GET-only client with retry and a pool of reusable curl handles.
pub struct HttpClient {
    opts: HttpOptions,
    retry: RetryPolicy,
    idle: Mutex<Vec<Easy>>,
}

impl HttpClient {
    pub fn new(opts: HttpOptions, retry: RetryPolicy) -> Self {
        Self {
            opts,
            retry,
            idle: Mutex::new(Vec::new()),
        }
    }

    /// GETs `url` into memory, retrying transient failures per the policy.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        run_with_retry(&self.retry, || {
            let mut body = Vec::new();
            self.perform(url, |data| {
                body.extend_from_slice(data);
                Ok(())
            })?;
            Ok(body)
        })
    }

    /// GETs `url` into `dest`, retrying transient failures per the policy.
    /// Returns the number of bytes written. On failure nothing is left at `dest`
    /// and the attempt's temp file is removed.
    pub fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        run_with_retry(&self.retry, || self.download_once(url, dest))
    }

    fn download_once(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut part = temp_file_for(dest)?;
        let mut written = 0u64;
        self.perform(url, |data| {
            part.write_all(data)?;
            written += data.len() as u64;
            Ok(())
        })?;
        part.flush()?;
        // Dropping `part` on any early return deletes the temp file.
        part.persist(dest).map_err(|e| FetchError::Storage(e.error))?;
        Ok(written)
    }

    fn perform<F>(&self, url: &str, sink: F) -> Result<(), FetchError>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        let mut easy = self.checkout();
        let res = self.perform_with(&mut easy, url, sink);
        self.checkin(easy);
        res
    }

    fn perform_with<F>(&self, easy: &mut Easy, url: &str, mut sink: F) -> Result<(), FetchError>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.opts.user_agent)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.transfer_timeout)?;
        easy.low_speed_limit(self.opts.low_speed_limit)?;
        easy.low_speed_time(self.opts.low_speed_time)?;

        let mut sink_error: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(FetchError::Storage(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(())
    }

    fn checkout(&self) -> Easy {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_else(Easy::new)
    }

    // reset() keeps the handle's connection cache alive.
    fn checkin(&self, mut easy: Easy) {
        easy.reset();
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(easy);
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(HttpOptions::default(), RetryPolicy::default())
    }
}

/// Creates `.{name}.XXXXXX.part` in the destination's directory.
fn temp_file_for(dest: &Path) -> io::Result<NamedTempFile> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
}
