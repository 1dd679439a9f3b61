//! Bounded worker pool over a shared task queue.

use std::collections::VecDeque;
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;

use super::{download_one, BatchSummary, DownloadFailure, DownloadResult, Fetch};
use crate::plan::ExpectedFile;
use crate::progress::{ProgressStats, Reporter};

/// Downloads every file in `files` with at most `max_concurrent` transfers in
/// flight. Progress is reported as transfers complete, not as they are
/// dispatched. Returns after every worker has finished.
pub fn download_all<F: Fetch + ?Sized>(
    fetcher: &F,
    files: &[ExpectedFile],
    max_concurrent: usize,
    reporter: &dyn Reporter,
) -> BatchSummary {
    let count = files.len();
    let mut summary = BatchSummary {
        total: count,
        ..BatchSummary::default()
    };
    if count == 0 {
        return summary;
    }

    let work: Mutex<VecDeque<usize>> = Mutex::new((0..count).collect());
    let (tx, rx) = mpsc::channel::<(usize, DownloadResult)>();
    let num_workers = max_concurrent.max(1).min(count);
    tracing::debug!(files = count, workers = num_workers, "starting download pool");

    let mut stats = ProgressStats {
        total: count,
        ..ProgressStats::default()
    };
    let mut failures: Vec<(usize, DownloadFailure)> = Vec::new();

    thread::scope(|s| {
        for _ in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || loop {
                let next = work
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some(index) = next else {
                    break;
                };
                let file = &files[index];
                let res = download_one(fetcher, &file.url, &file.path);
                if tx.send((index, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        // Ends once every worker has dropped its sender.
        for (index, res) in rx {
            let file = &files[index];
            stats.completed += 1;
            match res {
                DownloadResult::Succeeded { bytes } => {
                    summary.succeeded += 1;
                    summary.bytes += bytes;
                    reporter.downloaded(&stats, file, bytes);
                }
                DownloadResult::Failed { cause } => {
                    stats.failed += 1;
                    reporter.download_failed(&stats, file, &cause);
                    failures.push((
                        index,
                        DownloadFailure {
                            path: file.path.clone(),
                            cause,
                        },
                    ));
                }
            }
        }
    });

    failures.sort_by_key(|(index, _)| *index);
    summary.failures = failures.into_iter().map(|(_, f)| f).collect();
    summary
}
