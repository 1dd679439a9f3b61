//! `eprb -v <version>`: run one build and print the summary.

use anyhow::Result;
use eprb_core::config::EprbConfig;
use eprb_core::pipeline::{self, BuildOutcome, BuildSettings};
use eprb_core::progress::TracingReporter;
use std::io::IsTerminal;

const RULE_WIDTH: usize = 40;

pub fn run_build(cfg: &EprbConfig, version: &str) -> Result<()> {
    let settings = BuildSettings::from_config(cfg);
    tracing::info!("{}", ".".repeat(61));
    tracing::info!("Registry: {}", settings.registry_url);
    tracing::info!("Concurrent downloads: {}", settings.max_concurrent);

    let outcome = pipeline::run_build(&settings, version, &TracingReporter)?;
    summarize(&outcome);
    print_banner(&outcome);
    Ok(())
}

fn summarize(outcome: &BuildOutcome) {
    tracing::info!("{}", ".".repeat(61));
    tracing::info!(
        "Downloaded {} of {} files for {} packages ({} bytes)",
        outcome.succeeded,
        outcome.total_files,
        outcome.packages,
        outcome.bytes
    );
    for failure in &outcome.failures {
        tracing::warn!("Failed: {} ({})", failure.path.display(), failure.cause);
    }
    if outcome.is_complete() {
        tracing::info!("Build completed successfully!");
    } else {
        tracing::warn!(
            "Build completed with {} missing file(s); see the list above",
            outcome.missing.len()
        );
    }
}

fn print_banner(outcome: &BuildOutcome) {
    let (bold, reset) = if std::io::stdout().is_terminal() {
        ("\x1b[1m", "\x1b[0m")
    } else {
        ("", "")
    };
    let rule = "*".repeat(RULE_WIDTH);
    println!("\n{rule}");
    println!("{bold}EPR Build Completed{reset}");
    println!(
        "Refer to the documentation in: {bold}{}{reset}",
        outcome.readme_path.display()
    );
    println!("{rule}\n");
}
