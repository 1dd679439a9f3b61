//! Docker build-context scaffolding: `Dockerfile` and `readme.md`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the Kibana version in the readme template.
pub const VERSION_PLACEHOLDER: &str = "{version}";

pub const DOCKERFILE: &str = "FROM docker.elastic.co/package-registry/package-registry:main\n\
COPY ../integrations/ /packages/package-registry/\n\
WORKDIR /package-registry\n";

/// Readme template shipped with the binary.
pub const DEFAULT_README_TEMPLATE: &str = include_str!("../support/instructions.md");

/// Where the readme template comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReadmeTemplate {
    #[default]
    Embedded,
    File(PathBuf),
}

impl ReadmeTemplate {
    pub fn load(&self) -> io::Result<String> {
        match self {
            ReadmeTemplate::Embedded => Ok(DEFAULT_README_TEMPLATE.to_string()),
            ReadmeTemplate::File(path) => fs::read_to_string(path),
        }
    }
}

impl fmt::Display for ReadmeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadmeTemplate::Embedded => f.write_str("(embedded)"),
            ReadmeTemplate::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Writes `Dockerfile` into `base_dir`.
pub fn write_dockerfile(base_dir: &Path) -> io::Result<PathBuf> {
    let path = base_dir.join("Dockerfile");
    fs::write(&path, DOCKERFILE)?;
    tracing::info!("Dockerfile created at {}", path.display());
    Ok(path)
}

/// Replaces every `{version}` in `template`; nothing else changes.
pub fn render_readme(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Renders `template` and writes it to `base_dir/readme.md`.
pub fn write_readme(base_dir: &Path, template: &str, version: &str) -> io::Result<PathBuf> {
    let path = base_dir.join("readme.md");
    fs::write(&path, render_readme(template, version))?;
    tracing::info!("Created readme.md at {}", path.display());
    Ok(path)
}
