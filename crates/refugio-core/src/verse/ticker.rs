//! Periodic recomputation of the verse selection, with an owned lifecycle.
//!
//! The ticker task is the only writer of the current `Selection`; readers get
//! whole values through a watch channel. Dropping the `TickerHandle` aborts the
//! task, so nothing keeps ticking after its owner is gone.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::clock::Clock;
use super::select::{AnchoredSelector, Selection};

const MIN_PERIOD: Duration = Duration::from_secs(1);

pub struct SelectionTicker;

impl SelectionTicker {
    /// Compute the selection now, then again every `period` on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        selector: Arc<AnchoredSelector>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> TickerHandle {
        let period = period.max(MIN_PERIOD);
        let initial = selector.select_at(clock.now());
        tracing::debug!(day = initial.day, index = initial.index, "initial verse selection");
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let next = selector.select_at(clock.now());
                let prev_day = tx.borrow().day;
                if next.day != prev_day {
                    tracing::debug!(
                        day = next.day,
                        index = next.index,
                        "anchored day changed, rotating verse"
                    );
                }
                tx.send_replace(next);
            }
        });

        TickerHandle {
            rx,
            task: Some(task),
        }
    }
}

/// Owner of a running ticker.
pub struct TickerHandle {
    rx: watch::Receiver<Selection>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Latest published selection.
    pub fn current(&self) -> Selection {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every recomputation.
    /// `changed()` returns an error once the ticker is stopped.
    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the ticker and wait for its task to wind down.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::debug!("verse ticker stopped");
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
