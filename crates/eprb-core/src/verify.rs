//! Completeness check after the download pool has drained.
//!
//! Presence only: a file that exists under the expected name counts as
//! downloaded, whatever its size or content.

use crate::plan::ExpectedFile;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

/// Returns the names of expected files absent from `dir`, in expected order.
///
/// Scans the directory once, then checks membership per expected name.
pub fn verify(dir: &Path, expected: &[ExpectedFile]) -> io::Result<Vec<String>> {
    let present = present_names(dir)?;
    Ok(expected
        .iter()
        .filter(|f| !present.contains(OsStr::new(&f.name)))
        .map(|f| f.name.clone())
        .collect())
}

fn present_names(dir: &Path) -> io::Result<HashSet<OsString>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect()
}
