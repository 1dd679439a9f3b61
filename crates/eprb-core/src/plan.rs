//! Expected files: the fixed download contract derived from a catalog.
//!
//! Every package contributes exactly two entries (artifact, then signature).
//! The list is built before any transfer starts and is never mutated, which
//! is what makes the post-download presence check meaningful.

use crate::registry::{PackageDescriptor, RegistryClient, RegistryError};
use crate::url_model::local_file_name;
use std::path::{Path, PathBuf};

/// A file the run must produce: where it lands and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFile {
    /// Local file name inside the destination directory.
    pub name: String,
    pub path: PathBuf,
    pub url: String,
}

/// Which of a package's two files an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Artifact,
    Signature,
}

/// Derives `2 * packages.len()` expected files rooted at `dest_dir`.
pub fn expected_files(
    registry: &RegistryClient,
    packages: &[PackageDescriptor],
    dest_dir: &Path,
) -> Result<Vec<ExpectedFile>, RegistryError> {
    let mut files = Vec::with_capacity(packages.len() * 2);
    for package in packages {
        for role in [FileRole::Artifact, FileRole::Signature] {
            let server_path = match role {
                FileRole::Artifact => &package.download,
                FileRole::Signature => &package.signature_path,
            };
            let url = registry.resolve(server_path)?;
            let name = local_file_name(url.as_str());
            files.push(ExpectedFile {
                path: dest_dir.join(&name),
                name,
                url: url.into(),
            });
        }
    }
    Ok(files)
}
