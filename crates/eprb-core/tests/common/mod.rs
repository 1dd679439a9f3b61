#![allow(dead_code)]

pub mod registry_server;

use eprb_core::plan::ExpectedFile;
use eprb_core::progress::{ProgressStats, Reporter};
use eprb_core::registry::PackageDescriptor;
use eprb_core::retry::FetchError;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Reporter that records events instead of logging them.
#[derive(Default)]
pub struct RecordingReporter {
    pub started: Mutex<Option<(String, PathBuf)>>,
    /// (package labels, total files)
    pub planned: Mutex<Option<(Vec<String>, usize)>>,
    /// (running completed counter, file name, succeeded)
    pub completions: Mutex<Vec<(usize, String, bool)>>,
    pub verified: Mutex<Option<Vec<String>>>,
}

impl Reporter for RecordingReporter {
    fn started(&self, version: &str, base_dir: &Path) {
        *self.started.lock().unwrap() = Some((version.to_string(), base_dir.to_path_buf()));
    }

    fn planned(&self, packages: &[PackageDescriptor], total: usize) {
        let labels = packages.iter().map(PackageDescriptor::label).collect();
        *self.planned.lock().unwrap() = Some((labels, total));
    }

    fn downloaded(&self, stats: &ProgressStats, file: &ExpectedFile, _bytes: u64) {
        self.completions
            .lock()
            .unwrap()
            .push((stats.completed, file.name.clone(), true));
    }

    fn download_failed(&self, stats: &ProgressStats, file: &ExpectedFile, _cause: &FetchError) {
        self.completions
            .lock()
            .unwrap()
            .push((stats.completed, file.name.clone(), false));
    }

    fn verified(&self, missing: &[String]) {
        *self.verified.lock().unwrap() = Some(missing.to_vec());
    }
}
