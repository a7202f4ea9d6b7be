//! Trailing-edge debouncer on the tokio timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delays a callback until calls stop arriving for `delay`.
///
/// Each [`Debouncer::call`] cancels the pending invocation and schedules a
/// new one, so only the arguments of the last call in a burst are delivered.
/// A zero delay still defers the callback to a later scheduler turn.
///
/// Must be used from inside a tokio runtime. Dropping the debouncer cancels
/// any pending invocation.
pub struct Debouncer<T> {
    callback: Callback<T>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// `delay_ms` of zero or less means "next scheduler turn".
    pub fn new<F>(callback: F, delay_ms: i64) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let delay = u64::try_from(delay_ms).map_or(Duration::ZERO, Duration::from_millis);
        Self {
            callback: Arc::new(callback),
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call(&self, args: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // An abort can land after the timer fired but before this task
            // was polled again; the generation check covers that window.
            if current.load(Ordering::SeqCst) == generation {
                callback(args);
            }
        }));
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
