//! Cancelable delayed delivery.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Delivers the last scheduled event once `delay` passes without a newer one.
///
/// Scheduling again, calling [`Debouncer::cancel`], or dropping the debouncer
/// aborts the pending delivery.
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period before delivery.
    delay: Duration,
    /// Timer task for the pending event.
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates an idle debouncer.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending event with `event`, delivered to `tx` after the
    /// quiet period.
    pub fn schedule<E: Send + 'static>(&mut self, event: E, tx: &UnboundedSender<E>) {
        self.cancel();

        // The deadline is fixed now, not when the timer task is first polled.
        #[allow(clippy::arithmetic_side_effects)]
        let deadline = Instant::now() + self.delay;
        let tx = tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(event);
        }));
    }

    /// Drops the pending event, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns whether an event is still waiting for its deadline.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
