//! Trailing-edge debouncing on the tokio runtime.
//!
//! A [`Debouncer`] watches one value (the search query) and owns at most one
//! armed timer. Every [`Debouncer::trigger`] cancels the armed timer and arms
//! a new one, so a burst of triggers collapses into a single delivery that
//! happens one quiet window after the last trigger. Fired values are sent on
//! an unbounded channel and picked up by the owner's event loop.
//!
//! Only the timer is cancellable. Whatever the receiver starts in response to
//! a fired value is out of the debouncer's hands.

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

/// Quiet window used when none is configured.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

pub struct Debouncer<T> {
    window: Duration,
    tx: UnboundedSender<T>,
    watched: Option<T>,
    armed: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + fmt::Debug + Send + 'static,
{
    /// Create an idle debouncer delivering fired values to `tx`.
    pub fn new(window: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            window,
            tx,
            watched: None,
            armed: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Value that will be delivered when the armed timer fires.
    pub fn watched(&self) -> Option<&T> {
        self.watched.as_ref()
    }

    /// Rebind the watched value.
    ///
    /// When the value actually changes while a timer is armed, that timer is
    /// replaced by a fresh one carrying the new value. An idle debouncer
    /// stays idle: watching never fires on its own.
    pub fn watch(&mut self, value: T) {
        if self.watched.as_ref() == Some(&value) {
            return;
        }
        trace!(?value, "Debouncer watching new value");
        self.watched = Some(value);
        if self.is_armed() {
            self.arm();
        }
    }

    /// Restart the quiet window.
    pub fn trigger(&mut self) {
        self.arm();
    }

    /// Disarm without delivering anything.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
    }

    /// Whether a timer is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.armed.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn arm(&mut self) {
        self.cancel();
        let Some(value) = self.watched.clone() else {
            debug!("Debouncer triggered with nothing to deliver");
            return;
        };

        let deadline = Instant::now() + self.window;
        let tx = self.tx.clone();
        self.armed = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!(?value, "Debounce window elapsed");
            // The receiver may already be gone during shutdown.
            let _ = tx.send(value);
        }));
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("watched", &self.watched)
            .field("armed", &self.armed.is_some())
            .finish()
    }
}
