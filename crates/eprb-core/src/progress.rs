//! Progress and outcome reporting.
//!
//! Core components never log progress through ambient state; they call an
//! injected [`Reporter`]. [`TracingReporter`] is the CLI's implementation.

use crate::plan::ExpectedFile;
use crate::registry::PackageDescriptor;
use crate::retry::FetchError;
use std::path::Path;

/// Snapshot of batch progress. `completed` counts finished transfers, failed ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}

/// Receives run events. Called from the coordinating thread only.
pub trait Reporter {
    /// Destination created; nothing fetched yet.
    fn started(&self, version: &str, base_dir: &Path);
    /// Catalog fetched; `total` files will be attempted.
    fn planned(&self, packages: &[PackageDescriptor], total: usize);
    fn downloaded(&self, stats: &ProgressStats, file: &ExpectedFile, bytes: u64);
    fn download_failed(&self, stats: &ProgressStats, file: &ExpectedFile, cause: &FetchError);
    /// Presence check finished; `missing` is empty when everything landed.
    fn verified(&self, missing: &[String]);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn started(&self, version: &str, base_dir: &Path) {
        tracing::info!("Starting build for Kibana version {version} in {}", base_dir.display());
    }

    fn planned(&self, packages: &[PackageDescriptor], total: usize) {
        for package in packages {
            tracing::debug!(download = %package.download, "package: {}", package.label());
        }
        tracing::info!("Total files to download: {total} ({} packages)", packages.len());
    }

    fn downloaded(&self, stats: &ProgressStats, file: &ExpectedFile, bytes: u64) {
        tracing::info!(bytes, "Downloaded: ({} of {}) {}", stats.completed, stats.total, file.name);
    }

    fn download_failed(&self, stats: &ProgressStats, file: &ExpectedFile, cause: &FetchError) {
        tracing::warn!(
            url = %file.url,
            failed = stats.failed,
            "Failed: ({} of {}) {}: {}",
            stats.completed,
            stats.total,
            file.name,
            cause
        );
    }

    fn verified(&self, missing: &[String]) {
        if missing.is_empty() {
            tracing::info!("All files have been successfully downloaded and verified.");
        } else {
            tracing::warn!("Missing files ({}): {:?}", missing.len(), missing);
        }
    }
}
