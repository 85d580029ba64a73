//! Cancellable delayed dispatch for type-as-you-search input.
//!
//! # Responsibility
//! - Delay a dispatch until input has settled; a newer dispatch cancels
//!   the pending one.
//!
//! # Invariants
//! - At most one dispatch is pending at a time.
//! - Dropping the debouncer aborts any pending dispatch.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default settle delay, matching the search input's behavior.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delayed single-slot dispatcher over the tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `action` to run after the settle delay.
    ///
    /// Any previously scheduled action that has not started is aborted,
    /// so only the newest dispatch fires.
    pub fn dispatch<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Aborts the pending dispatch, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a dispatch is scheduled and has not completed.
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

#[cfg(test)]
mod tests {
    use super::{Debouncer, DEFAULT_DEBOUNCE};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn only_the_newest_dispatch_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for _ in 0..3 {
            let fired = Arc::clone(&fired);
            debouncer.dispatch(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_waits_for_the_settle_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE);

        {
            let fired = Arc::clone(&fired);
            debouncer.dispatch(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Yield without advancing past the delay; nothing fires yet.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_dispatch() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        {
            let fired = Arc::clone(&fired);
            debouncer.dispatch(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
