/// Scan progress reporting.
///
/// The walk itself is synchronous; it reports through a [`ScanObserver`].
/// The background worker in [`super::start_scan`] adapts that observer into
/// lightweight [`ScanProgress`] messages sent over a crossbeam channel.
use super::result::{ScanResult, ScanWarning};
use std::ops::ControlFlow;
use std::time::Duration;

/// Running totals, emitted every few thousand entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub files_found: u64,
    pub dirs_found: u64,
    pub total_size: u64,
    pub current_path: String,
}

/// Hooks called from inside the walk.
pub trait ScanObserver {
    /// Periodic update. Returning `Break` abandons the walk.
    fn on_progress(&mut self, _update: &ProgressUpdate) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// A non-fatal problem was recorded.
    fn on_warning(&mut self, _warning: &ScanWarning) {}
}

/// The silent observer.
impl ScanObserver for () {}

/// Messages sent from the scan thread to the caller.
#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update(ProgressUpdate),
    /// A non-fatal error (e.g. permission denied on one file).
    Warning(ScanWarning),
    /// Scanning completed; the result is handed over whole.
    Complete {
        result: Box<ScanResult>,
        duration: Duration,
    },
    /// The root could not be scanned at all.
    Failed(String),
    /// Scan was cancelled by the caller.
    Cancelled,
}
