//! Progress reporting hooks for the extraction loop.

use tracing::info;

use crate::types::SplitType;

/// Receives progress notifications from [`crate::extract_log_mel_feats`].
pub trait Progress {
    fn started(&mut self, _split: SplitType, _total_files: usize) {}

    /// Called after each input file with the number of records it produced.
    fn file_done(&mut self, _index: usize, _file_name: &str, _records: usize) {}

    fn finished(&mut self, _total_records: usize) {}
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Emits progress through `tracing`, one line every `every` files.
#[derive(Debug, Clone)]
pub struct LogProgress {
    every: usize,
    total: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            total: 0,
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Progress for LogProgress {
    fn started(&mut self, split: SplitType, total_files: usize) {
        self.total = total_files;
        info!(%split, total_files, "extracting log-mel features");
    }

    fn file_done(&mut self, index: usize, file_name: &str, records: usize) {
        let done = index + 1;
        if done % self.every == 0 || done == self.total {
            info!(done, total = self.total, last = file_name, records, "progress");
        }
    }

    fn finished(&mut self, total_records: usize) {
        info!(total_records, "extraction finished");
    }
}
