//! One build run: destination → catalog → downloads → verification → scaffold.
//!
//! Only a template, destination, registry or scaffold failure aborts the run; per-file
//! transfer failures end up in `BuildOutcome::failures` and `missing`.

use crate::build_dir::{create_build_dirs, BuildDirs};
use crate::config::EprbConfig;
use crate::downloader::{download_all, DownloadFailure};
use crate::http::{HttpClient, HttpOptions};
use crate::plan::expected_files;
use crate::progress::Reporter;
use crate::registry::{RegistryClient, RegistryError};
use crate::retry::RetryPolicy;
use crate::scaffold::{self, ReadmeTemplate};
use crate::verify::verify;
use chrono::Local;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Everything a run needs, resolved from config and CLI overrides.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub registry_url: String,
    pub builds_dir: PathBuf,
    pub max_concurrent: usize,
    pub http: HttpOptions,
    pub retry: RetryPolicy,
    pub readme_template: ReadmeTemplate,
}

impl BuildSettings {
    pub fn from_config(cfg: &EprbConfig) -> Self {
        Self {
            registry_url: cfg.registry_url.clone(),
            builds_dir: cfg.builds_dir.clone(),
            max_concurrent: cfg.max_concurrent_downloads.max(1),
            http: cfg.http_options(),
            retry: cfg.retry_policy(),
            readme_template: cfg
                .readme_template
                .clone()
                .map(ReadmeTemplate::File)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot create build directory under {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read readme template {template}: {source}")]
    Template {
        template: ReadmeTemplate,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("cannot write {path}: {source}")]
    Scaffold {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct BuildOutcome {
    pub dirs: BuildDirs,
    pub dockerfile_path: PathBuf,
    pub readme_path: PathBuf,
    pub packages: usize,
    pub total_files: usize,
    pub succeeded: usize,
    /// Bytes written by successful transfers.
    pub bytes: u64,
    pub failures: Vec<DownloadFailure>,
    /// Expected files absent after the pool drained (failed or never written).
    pub missing: Vec<String>,
}

impl BuildOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Runs one build for `version`.
pub fn run_build(
    settings: &BuildSettings,
    version: &str,
    reporter: &dyn Reporter,
) -> Result<BuildOutcome, BuildError> {
    // Read before creating directories or touching the network.
    let template = settings
        .readme_template
        .load()
        .map_err(|source| BuildError::Template {
            template: settings.readme_template.clone(),
            source,
        })?;

    let now = Local::now().naive_local();
    let dirs = create_build_dirs(&settings.builds_dir, version, &now).map_err(|source| {
        BuildError::Destination {
            path: settings.builds_dir.clone(),
            source,
        }
    })?;
    reporter.started(version, &dirs.base);

    let http = Arc::new(HttpClient::new(settings.http.clone(), settings.retry.clone()));
    let registry = RegistryClient::new(&settings.registry_url, Arc::clone(&http))?;
    let packages = registry.fetch(version)?;

    let expected = expected_files(&registry, &packages, &dirs.integrations)?;
    reporter.planned(&packages, expected.len());

    let summary = download_all(http.as_ref(), &expected, settings.max_concurrent, reporter);

    let missing = match verify(&dirs.integrations, &expected) {
        Ok(missing) => missing,
        Err(e) => {
            tracing::warn!(
                dir = %dirs.integrations.display(),
                error = %e,
                "cannot scan download directory; treating every file as missing"
            );
            expected.iter().map(|f| f.name.clone()).collect()
        }
    };
    reporter.verified(&missing);

    let dockerfile_path =
        scaffold::write_dockerfile(&dirs.base).map_err(|source| BuildError::Scaffold {
            path: dirs.base.join("Dockerfile"),
            source,
        })?;
    let readme_path = scaffold::write_readme(&dirs.base, &template, version)
        .map_err(|source| BuildError::Scaffold {
            path: dirs.base.join("readme.md"),
            source,
        })?;

    Ok(BuildOutcome {
        dirs,
        dockerfile_path,
        readme_path,
        packages: packages.len(),
        total_files: summary.total,
        succeeded: summary.succeeded,
        bytes: summary.bytes,
        failures: summary.failures,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_from_default_config() {
        let s = BuildSettings::from_config(&EprbConfig::default());
        assert_eq!(s.registry_url, "https://epr.elastic.co");
        assert_eq!(s.max_concurrent, 10);
        assert_eq!(s.readme_template, ReadmeTemplate::Embedded);
    }

    #[test]
    fn settings_use_template_file_and_clamp_workers() {
        let cfg = EprbConfig {
            max_concurrent_downloads: 0,
            readme_template: Some(PathBuf::from("/tmp/t.md")),
            ..EprbConfig::default()
        };
        let s = BuildSettings::from_config(&cfg);
        assert_eq!(s.max_concurrent, 1);
        assert_eq!(s.readme_template, ReadmeTemplate::File(PathBuf::from("/tmp/t.md")));
    }

    #[test]
    fn invalid_registry_url_aborts_after_destination() {
        let root = tempfile::tempdir().unwrap();
        let settings = BuildSettings {
            registry_url: "::not a url::".to_string(),
            builds_dir: root.path().to_path_buf(),
            ..BuildSettings::from_config(&EprbConfig::default())
        };
        let err = run_build(&settings, "8.11.1", &crate::progress::TracingReporter).unwrap_err();
        assert!(matches!(err, BuildError::Registry(RegistryError::InvalidUrl { .. })));
    }
}
