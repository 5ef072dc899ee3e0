// ── Single-slot debounce timer ──

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Runs only the most recently scheduled action, after a quiet period.
///
/// Scheduling cancels whatever is pending. Cancelling the parent token
/// (controller teardown) cancels the pending action too.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    parent: CancellationToken,
    slot: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration, parent: CancellationToken) -> Self {
        Self {
            delay,
            parent,
            slot: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.parent.child_token();
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => action.await,
            }
        });
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pending.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_action_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300), CancellationToken::new());
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = runs.clone();
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_drops_pending() {
        let parent = CancellationToken::new();
        let debouncer = Debouncer::new(Duration::from_millis(300), parent.clone());
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        parent.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
