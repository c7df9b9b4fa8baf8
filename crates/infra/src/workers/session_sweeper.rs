use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::store::InMemorySessionStore;

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Periodically drops idle sessions so their inventories are released even
/// if the client never comes back.
#[derive(Debug)]
pub struct SessionSweeper;

impl SessionSweeper {
    /// Spawn a sweeper thread ticking every `interval`.
    ///
    /// Returns `None` if the OS refuses to spawn the thread; sessions then
    /// only expire lazily on access.
    pub fn spawn(store: Arc<InMemorySessionStore>, interval: Duration) -> Option<WorkerHandle> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("session-sweeper".to_string())
            .spawn(move || sweep_loop(&store, &shutdown_rx, interval));

        match join {
            Ok(join) => Some(WorkerHandle {
                shutdown: shutdown_tx,
                join: Some(join),
            }),
            Err(err) => {
                warn!(error = %err, "failed to spawn session sweeper");
                None
            }
        }
    }
}

fn sweep_loop(store: &InMemorySessionStore, shutdown_rx: &mpsc::Receiver<()>, interval: Duration) {
    loop {
        match shutdown_rx.recv_timeout(interval) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                store.sweep(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweeper_removes_expired_sessions_and_stops() {
        let store = Arc::new(InMemorySessionStore::new(Duration::from_millis(10)));
        store.start();
        store.start();

        let handle = SessionSweeper::spawn(store.clone(), Duration::from_millis(5)).unwrap();

        for _ in 0..200 {
            if store.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        handle.shutdown();

        assert!(store.is_empty());
    }
}
