//! Progress reporting from the scan phase.
//!
//! Only the worker owning partition 0 reports. It pushes ticks into a
//! bounded channel with `try_send`, so a slow consumer costs dropped
//! updates, never a stalled worker. The calling thread drains the channel
//! into a [`ProgressSink`] while the scan runs.

use crossbeam_channel::Sender;

/// Ticks per full partition. One tick is 0.01%.
pub const PROGRESS_RESOLUTION: u64 = 10_000;

/// Capacity of the worker-to-sink progress channel.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Receives `(count, total)` progress updates.
pub trait ProgressSink {
    fn report(&mut self, count: u64, total: u64);

    /// Called exactly once when the run is complete.
    fn finish(&mut self) {
        self.report(1, 1);
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _count: u64, _total: u64) {}

    fn finish(&mut self) {}
}

/// One progress update on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTick {
    pub count: u64,
    pub total: u64,
}

/// Worker-side end of the progress channel. Sends only when the tick changes.
#[derive(Debug)]
pub(crate) struct WorkerProgress {
    tx: Sender<ProgressTick>,
    last: Option<u64>,
}

impl WorkerProgress {
    pub(crate) fn new(tx: Sender<ProgressTick>) -> Self {
        Self { tx, last: None }
    }

    /// `fraction` is the share of the partition already scanned.
    pub(crate) fn update(&mut self, fraction: f64) {
        let count = ((fraction * PROGRESS_RESOLUTION as f64) as u64).min(PROGRESS_RESOLUTION);
        if self.last == Some(count) {
            return;
        }
        self.last = Some(count);
        // Full channel or gone receiver: skip this tick.
        let _ = self.tx.try_send(ProgressTick {
            count,
            total: PROGRESS_RESOLUTION,
        });
    }
}
