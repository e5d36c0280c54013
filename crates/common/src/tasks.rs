//! Cancelable delayed tasks.
//!
//! Replaces fire-and-forget timers: a component that owns a `DelayedTask`
//! and is torn down before the deadline never observes the callback.

use std::time::Duration;
use tokio::task::JoinHandle;

/// One-shot delayed closure, cancelled when the handle is dropped.
pub struct DelayedTask {
    handle: JoinHandle<()>,
}

impl DelayedTask {
    /// Spawn `f` to run after `delay`. Must be called within a tokio runtime.
    pub fn spawn<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self { handle }
    }

    /// Cancel explicitly; dropping the handle has the same effect.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the task to fire or be cancelled.
    pub async fn join(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let task = DelayedTask::spawn(Duration::from_millis(10), move || {
            flag.store(true, Ordering::SeqCst)
        });
        task.join().await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropped_before_deadline_never_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let task = DelayedTask::spawn(Duration::from_millis(50), move || {
            flag.store(true, Ordering::SeqCst)
        });
        drop(task);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancel_then_join_returns() {
        let task = DelayedTask::spawn(Duration::from_secs(30), || {});
        task.cancel();
        task.join().await;
    }
}
