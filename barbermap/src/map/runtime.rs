//! Single-flight guard for the map widget's process-wide runtime.
//!
//! The underlying widget needs remote runtime assets (tile endpoints,
//! styles) loaded at most once per process. Concurrent mounts must await
//! the same in-progress load rather than re-trigger it; once loaded, later
//! mounts pass through immediately.
//!
//! If the load never completes (no network), every waiter stays pending —
//! the accepted degraded mode for the map surface.

use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::debug;

/// State of the shared runtime load.
enum GateState {
    /// No load attempted yet.
    NotLoaded,
    /// A load is in flight; waiters subscribe for completion.
    Loading(broadcast::Sender<()>),
    /// Runtime is available.
    Ready,
}

/// Process-wide single-flight gate for the widget runtime.
///
/// Shared (via `Arc`) by every [`super::MapSurface`] using the same widget.
pub struct RuntimeGate {
    state: Mutex<GateState>,
}

impl RuntimeGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::NotLoaded),
        }
    }

    /// Whether the runtime has finished loading.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.lock().unwrap(), GateState::Ready)
    }

    /// Ensures the runtime is loaded, running `load` at most once per process.
    ///
    /// The first caller runs `load`; concurrent callers wait for that same
    /// load to finish. Completes immediately once the runtime is ready.
    pub async fn ensure_loaded<F, Fut>(&self, load: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        enum Action {
            Done,
            Run,
            Wait(broadcast::Receiver<()>),
        }

        let action = {
            let mut state = self.state.lock().unwrap();
            match &*state {
                GateState::Ready => Action::Done,
                GateState::Loading(tx) => Action::Wait(tx.subscribe()),
                GateState::NotLoaded => {
                    let (tx, _rx) = broadcast::channel(4);
                    *state = GateState::Loading(tx);
                    Action::Run
                }
            }
        };

        match action {
            Action::Done => {}
            Action::Run => {
                load().await;

                let tx = {
                    let mut state = self.state.lock().unwrap();
                    match std::mem::replace(&mut *state, GateState::Ready) {
                        GateState::Loading(tx) => Some(tx),
                        _ => None,
                    }
                };
                if let Some(tx) = tx {
                    let waiters = tx.receiver_count();
                    let _ = tx.send(());
                    debug!(waiters, "Widget runtime loaded");
                }
            }
            Action::Wait(mut rx) => {
                if rx.recv().await.is_err() {
                    // Loader was dropped without completing; stay pending
                    // rather than letting a mount proceed without a runtime.
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}

impl Default for RuntimeGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_load_runs_once() {
        let gate = RuntimeGate::new();
        let loads = AtomicU32::new(0);

        gate.ensure_loaded(|| async {
            loads.fetch_add(1, Ordering::SeqCst);
        })
        .await;
        gate.ensure_loaded(|| async {
            loads.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(gate.is_loaded());
    }

    #[tokio::test]
    async fn test_concurrent_mounts_share_one_load() {
        let gate = Arc::new(RuntimeGate::new());
        let loads = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            let loads = Arc::clone(&loads);
            handles.push(tokio::spawn(async move {
                gate.ensure_loaded(|| async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                })
                .await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(gate.is_loaded());
    }

    #[tokio::test]
    async fn test_waiter_pends_while_load_in_flight() {
        let gate = Arc::new(RuntimeGate::new());
        let release = Arc::new(tokio::sync::Notify::new());

        let loader_gate = Arc::clone(&gate);
        let loader_release = Arc::clone(&release);
        let loader = tokio::spawn(async move {
            loader_gate
                .ensure_loaded(|| async move {
                    loader_release.notified().await;
                })
                .await;
        });

        // Give the loader a chance to take the Loading slot
        tokio::task::yield_now().await;

        let waiter_gate = Arc::clone(&gate);
        let waiter = tokio::spawn(async move {
            waiter_gate.ensure_loaded(|| async {}).await;
        });

        // Neither completes until the load is released
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!gate.is_loaded());
        assert!(!waiter.is_finished());

        release.notify_one();
        loader.await.unwrap();
        waiter.await.unwrap();
        assert!(gate.is_loaded());
    }
}
