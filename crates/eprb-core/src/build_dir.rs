//! Per-run destination directory: `{builds_dir}/{timestamp}-{version}/integrations`.

use crate::url_model::sanitize_filename_for_linux;
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H%M%S";
pub const INTEGRATIONS_DIR: &str = "integrations";

/// Directories owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirs {
    pub base: PathBuf,
    pub integrations: PathBuf,
}

/// `2024-01-02-030405-8.11.1`. The version is sanitized so it stays one path component.
pub fn folder_name(timestamp: &NaiveDateTime, version: &str) -> String {
    format!(
        "{}-{}",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize_filename_for_linux(version)
    )
}

/// Creates a fresh run directory and its `integrations/` subdirectory.
/// Fails with `AlreadyExists` rather than reusing a previous run's directory.
pub fn create_build_dirs(
    builds_root: &Path,
    version: &str,
    timestamp: &NaiveDateTime,
) -> io::Result<BuildDirs> {
    fs::create_dir_all(builds_root)?;
    let base = builds_root.join(folder_name(timestamp, version));
    fs::create_dir(&base)?;
    let integrations = base.join(INTEGRATIONS_DIR);
    fs::create_dir(&integrations)?;
    Ok(BuildDirs { base, integrations })
}
