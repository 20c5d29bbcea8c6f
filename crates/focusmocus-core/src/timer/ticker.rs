//! Cancellable one-second tick source.
//!
//! Arming spawns a tokio task that feeds a private channel. The returned
//! [`TickHandle`] owns the receiving end, so once the handle is cancelled or
//! dropped no further tick can be observed.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Period of the engine tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Ticker;

impl Ticker {
    /// Start delivering ticks every `period`, the first one `period` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(period: Duration) -> TickHandle {
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                let at = interval.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        });
        TickHandle { task, rx }
    }
}

/// An armed tick source. Dropping it cancels the periodic task.
pub struct TickHandle {
    task: JoinHandle<()>,
    rx: mpsc::Receiver<Instant>,
}

impl TickHandle {
    /// Wait for the next tick. `None` only if the task died.
    pub async fn next(&mut self) -> Option<Instant> {
        self.rx.recv().await
    }

    /// Stop the periodic task. No tick is delivered afterwards.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
