//! Task ownership and completion delivery for a controller.

use std::future::Future;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

/// Owns a controller's background tasks and the channel they report on.
///
/// Dropping the mailbox aborts every task still running.
#[derive(Debug)]
pub struct Mailbox<E> {
    tx: UnboundedSender<E>,
    rx: UnboundedReceiver<E>,
    tasks: JoinSet<()>,
}

impl<E: Send + 'static> Default for Mailbox<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send + 'static> Mailbox<E> {
    /// Creates an empty mailbox.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            tasks: JoinSet::new(),
        }
    }

    /// Returns a sender for events produced outside `spawn`.
    pub fn sender(&self) -> UnboundedSender<E> {
        self.tx.clone()
    }

    /// Runs `task` in the background and posts its output.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        // Reap finished tasks so the set does not grow without bound.
        while self.tasks.try_join_next().is_some() {}

        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    /// Waits for the next event.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Returns the number of tasks not yet reaped.
    #[cfg(test)]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
