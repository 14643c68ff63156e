//! Task scope binding background loops to the lifetime of their owner.
//!
//! Every loop spawned through a [`TaskScope`] receives a [`ShutdownSignal`]
//! and must observe it at each suspension point. [`TaskScope::shutdown`]
//! cancels all loops together and waits for them; dropping the scope aborts
//! whatever is still running.

use log::{debug, warn};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cancellation signal shared by every loop of a scope
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once shutdown is requested or the scope is gone
    pub async fn cancelled(&mut self) {
        // A dropped sender means the owning scope is gone.
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }
}

/// Owner of a group of cancellable background loops
pub struct TaskScope {
    shutdown: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScope {
    /// Empty scope
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// New handle on the scope's cancellation signal
    #[must_use]
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.shutdown.subscribe(),
        }
    }

    /// Spawn a named loop on the current runtime
    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Starting {}", name);
        self.tasks.push((name, tokio::spawn(task)));
    }

    /// Number of loops still owned by the scope
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the scope owns no loops
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Cancel every loop and wait for all of them to exit
    pub async fn shutdown(&mut self) {
        self.shutdown.send_replace(true);
        for (name, handle) in self.tasks.drain(..) {
            match handle.await {
                Ok(()) => debug!("{} stopped", name),
                Err(e) if e.is_cancelled() => debug!("{} aborted", name),
                Err(e) => warn!("{} terminated abnormally: {}", name, e),
            }
        }
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
        for (_, handle) in &self.tasks {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_every_loop() {
        let mut scope = TaskScope::new();
        let ticks = Arc::new(AtomicUsize::new(0));

        for name in ["first", "second"] {
            let mut signal = scope.signal();
            let ticks = Arc::clone(&ticks);
            scope.spawn(name, async move {
                loop {
                    tokio::select! {
                        biased;
                        () = signal.cancelled() => break,
                        () = tokio::time::sleep(Duration::from_millis(100)) => {
                            ticks.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
            });
        }

        tokio::time::sleep(Duration::from_millis(350)).await;
        scope.shutdown().await;
        let after_shutdown = ticks.load(Ordering::SeqCst);
        assert_eq!(after_shutdown, 6);
        assert!(scope.is_empty());
        assert!(scope.is_cancelled());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_shutdown);
    }

    #[tokio::test]
    async fn test_signal_after_drop_resolves() {
        let scope = TaskScope::new();
        let mut signal = scope.signal();
        drop(scope);
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }
}
