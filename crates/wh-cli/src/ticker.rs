//! Periodic callback on the tokio runtime, cancelled when dropped.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Period of the live counter.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running periodic task.
///
/// The task stops when its callback returns [`ControlFlow::Break`], when
/// [`Ticker::cancel`] is called, or when the `Ticker` is dropped.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Calls `on_tick` every `period`, starting one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Aborts the ticker task.
    ///
    /// On a current-thread runtime no callback runs after this returns; on a
    /// multi-threaded one a callback already in progress may still finish.
    pub fn cancel(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
