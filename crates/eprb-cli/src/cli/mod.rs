//! CLI for eprb.

mod commands;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use eprb_core::config::{self, EprbConfig};
use std::path::PathBuf;

use commands::run_build;

/// Exit status for malformed or missing arguments.
const USAGE_EXIT_CODE: i32 = 2;

/// Download every integration package for a Kibana version from the Elastic
/// Package Registry and scaffold a Docker build context for an offline registry.
#[derive(Debug, Parser)]
#[command(name = "eprb", disable_version_flag = true)]
pub struct Cli {
    /// Kibana version to build for. Example: -v 8.11.1
    #[arg(short = 'v', long = "version", value_name = "VERSION", value_parser = parse_kibana_version)]
    pub kibana_version: String,

    /// Registry base URL (overrides `registry_url` in config.toml).
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Directory receiving the `{timestamp}-{version}` build folders.
    #[arg(long, value_name = "DIR")]
    pub builds_dir: Option<PathBuf>,

    /// Maximum concurrent downloads.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Read configuration from this file instead of ~/.config/eprb/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Rejects versions that would be unusable in a query string or a directory name.
fn parse_kibana_version(s: &str) -> Result<String, String> {
    let v = s.trim();
    if v.is_empty() {
        return Err("version must not be empty".to_string());
    }
    if let Some(c) = v
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')))
    {
        return Err(format!("invalid character {c:?} in version {v:?}"));
    }
    Ok(v.to_string())
}

impl Cli {
    /// Parses `std::env::args`. On a usage error logs it, prints help and exits with status 2.
    pub fn parse_args() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) if e.kind() == ErrorKind::DisplayHelp => e.exit(),
            Err(e) => {
                tracing::error!("{}", e.render().to_string().trim_end());
                let _ = Cli::command().print_help();
                std::process::exit(USAGE_EXIT_CODE);
            }
        }
    }

    /// Applies command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut EprbConfig) {
        if let Some(url) = &self.registry {
            cfg.registry_url = url.clone();
        }
        if let Some(dir) = &self.builds_dir {
            cfg.builds_dir = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent_downloads = jobs;
        }
    }

    pub fn run(self) -> Result<()> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        self.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        run_build(&cfg, &self.kibana_version)
    }
}

#[cfg(test)]
mod tests;
