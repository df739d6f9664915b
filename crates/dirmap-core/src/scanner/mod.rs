/// Scanner module: orchestrates the filesystem walk.
///
/// The aggregation itself ([`aggregate`]) is single-threaded and
/// synchronous. [`start_scan`] wraps it for interactive callers: the walk
/// runs on a named background thread, progress arrives over a bounded
/// crossbeam channel, and the caller may cancel or simply drop the handle
/// to abandon the scan.
pub mod options;
pub mod progress;
pub mod result;
pub mod walk;

pub use options::{ScanOptions, TraversalPolicy, DEFAULT_IGNORE_GLOBS, HIDDEN_MARKER};
pub use progress::{ProgressUpdate, ScanObserver, ScanProgress};
pub use result::{ScanResult, ScanWarning};
pub use walk::{aggregate, aggregate_observed, ScanAccumulator, PROGRESS_INTERVAL};

use crate::error::ScanError;
use crossbeam_channel::{Receiver, Sender};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the consumer falls behind, the scanner blocks briefly on `send`
/// rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop at the next progress checkpoint.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan ends, handing each intermediate message to
    /// `on_message`. Returns the result, or `None` if the scan was cancelled
    /// or failed (the failure is passed to `on_message` first).
    pub fn wait(self, mut on_message: impl FnMut(&ScanProgress)) -> Option<ScanResult> {
        for message in self.progress_rx.iter() {
            match message {
                ScanProgress::Complete { result, .. } => return Some(*result),
                other => {
                    let finished = matches!(other, ScanProgress::Cancelled | ScanProgress::Failed(_));
                    on_message(&other);
                    if finished {
                        return None;
                    }
                }
            }
        }
        None
    }
}

/// Observer that forwards walk events to the channel and polls the cancel
/// flag.
struct ChannelObserver {
    tx: Sender<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
}

impl ScanObserver for ChannelObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) -> ControlFlow<()> {
        if self.cancel_flag.load(Ordering::Relaxed) {
            return ControlFlow::Break(());
        }
        let _ = self.tx.send(ScanProgress::Update(update.clone()));
        ControlFlow::Continue(())
    }

    fn on_warning(&mut self, warning: &ScanWarning) {
        let _ = self.tx.send(ScanProgress::Warning(warning.clone()));
    }
}

/// Start a new scan on a background thread.
///
/// Returns a `ScanHandle` for receiving progress and requesting
/// cancellation. The final message is always one of `Complete`, `Failed`,
/// or `Cancelled`.
pub fn start_scan(
    root_path: PathBuf,
    options: ScanOptions,
    largest_n: usize,
) -> Result<ScanHandle, ScanError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("dirmap-scanner".into())
        .spawn(move || {
            let start = Instant::now();
            let mut observer = ChannelObserver {
                tx: progress_tx.clone(),
                cancel_flag: cancel_clone,
            };
            let message = match aggregate_observed(&root_path, &options, largest_n, &mut observer) {
                Ok(result) => ScanProgress::Complete {
                    result: Box::new(result),
                    duration: start.elapsed(),
                },
                Err(ScanError::Cancelled) => ScanProgress::Cancelled,
                Err(err) => {
                    info!("Scan of {} failed: {err}", root_path.display());
                    ScanProgress::Failed(err.to_string())
                }
            };
            let _ = progress_tx.send(message);
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        _thread: Some(thread),
    })
}
