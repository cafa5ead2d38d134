//! Scheduled refresh and view-scoped requests
//!
//! Both types own their tokio tasks and abort them on drop, so closing a view
//! never leaves a timer or a late response behind.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Results buffered between the timer task and the consumer
const POLL_BUFFER: usize = 4;

/// Runs a fetch on a fixed interval, starting immediately
pub struct Poller<T> {
    results: mpsc::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Poller<T> {
    pub fn spawn<F, Fut>(interval: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, results) = mpsc::channel(POLL_BUFFER);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::trace!("Polling tick");

                if tx.send(fetch().await).await.is_err() {
                    break;
                }
            }
        });

        Self { results, task }
    }
}

impl<T> Poller<T> {
    /// Next fetch result, or `None` once the poller has stopped
    pub async fn next(&mut self) -> Option<T> {
        self.results.recv().await
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the timer and discard buffered results
    pub fn stop(self) {
        self.task.abort();
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Result of a request spawned in a [`ViewScope`]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Pending<T> {
    /// The value, or `None` if the scope was abandoned first
    pub async fn result(self) -> Option<T> {
        self.rx.await.ok()
    }
}

/// Owner of the in-flight requests of one view
pub struct ViewScope {
    live: Arc<AtomicBool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn is_abandoned(&self) -> bool {
        !self.live.load(Ordering::Acquire)
    }

    /// Run `fut` on behalf of the view
    pub fn spawn<F>(&self, fut: F) -> Pending<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        if self.is_abandoned() {
            return Pending { rx };
        }

        let live = Arc::clone(&self.live);
        let handle = tokio::spawn(async move {
            let value = fut.await;
            if live.load(Ordering::Acquire) {
                let _ = tx.send(value);
            }
        });

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);

        Pending { rx }
    }

    /// Drop every in-flight request; later results are discarded
    pub fn abandon(&self) {
        self.live.store(false, Ordering::Release);

        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        let count = tasks.len();
        for task in tasks.drain(..) {
            task.abort();
        }
        if count > 0 {
            tracing::debug!(count, "Abandoned in-flight view requests");
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.abandon();
    }
}
