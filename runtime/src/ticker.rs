//! Cancellable repeating task that feeds actions into a store.
//!
//! [`spawn`] drives time-based reducer logic (such as queue position decay)
//! by sending a freshly built action at a fixed period. The handle is the
//! only way to stop the loop: calling [`TickerHandle::cancel`] or dropping
//! the handle ends the task, and the task also ends on its own when the
//! store shuts down.
//!
//! # Example
//!
//! ```ignore
//! let handle = ticker::spawn(store.clone(), Duration::from_secs(10), move || {
//!     Action::QueueTick { slot_id }
//! });
//! // ... later, when the queue entry is replaced or cleared:
//! handle.cancel();
//! ```

use crate::store::Store;
use fila_core::reducer::Reducer;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Handle to a running ticker task
///
/// Dropping the handle cancels the ticker.
#[derive(Debug)]
pub struct TickerHandle {
    cancel: watch::Sender<bool>,
}

impl TickerHandle {
    /// Stop the ticker
    ///
    /// Idempotent; the task exits before its next tick.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

/// Spawn a ticker that sends `make_action()` to the store every `period`
///
/// The first action fires one full period after the call, not immediately.
/// Missed ticks are skipped rather than bursted, so a stalled runtime does
/// not flood the store with catch-up actions. The task exits when the
/// handle is cancelled or dropped, or when the store rejects a send
/// (shutdown).
pub fn spawn<S, A, E, R, F>(
    store: Store<S, A, E, R>,
    period: Duration,
    make_action: F,
) -> TickerHandle
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn() -> A + Send + Sync + 'static,
{
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; consume it so the
        // first action lands a full period from now.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    metrics::counter!("fila_ticker_ticks_total").increment(1);
                    if store.send(make_action()).await.is_err() {
                        tracing::debug!("Ticker stopping: store is shutting down");
                        break;
                    }
                },
                changed = cancel_rx.changed() => {
                    if changed.is_err() || *cancel_rx.borrow() {
                        tracing::trace!("Ticker cancelled");
                        break;
                    }
                },
            }
        }
    });

    TickerHandle { cancel: cancel_tx }
}
