//! Progress for a run over several production report files.
//!
//! Pulling page text out of a PDF report is what takes time, so progress is
//! counted in report files, not pages or employee records.

use std::sync::Arc;

/// Receives one update per production report file read.
pub trait ProgressCallback: Send + Sync {
    /// Number of report files about to be read.
    fn set_total(&self, total: u64);

    /// `delta` more report files have been turned into records.
    fn inc(&self, delta: u64);

    /// Names the report file being read.
    fn set_message(&self, msg: String);

    /// All report files are read; `msg` carries the record count.
    fn finish(&self, msg: String);
}

/// Reads report files without showing anything.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
