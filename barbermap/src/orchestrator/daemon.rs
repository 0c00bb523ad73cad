//! Background daemon driving the search cycle.
//!
//! Owns the session state machine: geolocation at startup, debounce
//! coalescing of query/viewport changes, sequence-tagged search dispatch,
//! and the one-shot demo seed. State snapshots are published over a watch
//! channel; the handle in [`super`] feeds commands in over an mpsc channel.
//!
//! A single search cycle:
//!
//! ```text
//! Idle ──change──► PendingDebounce ──window elapses──► InFlight
//!   ▲                    │ (restarted by each change)      │
//!   │                    └──teardown──► canceled           │
//!   └───────── latest response applied / stale discarded ──┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::OrchestratorConfig;
use crate::coord::Coordinates;
use crate::geolocate::GeoLocator;
use crate::provider::{ProviderError, SearchProvider};
use crate::shop::{SearchState, Shop};

/// State-changing commands from the orchestrator handle.
#[derive(Debug)]
pub(super) enum Command {
    SetQuery(String),
    SetCoordinates(Coordinates),
}

/// Completion of one dispatched search, tagged with its sequence number.
type SearchOutcome = (u64, Result<Vec<Shop>, ProviderError>);

/// A deadline far enough away to stand in for "no deadline armed".
///
/// Needed because `select!` evaluates disabled branches' futures.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 365)
}

pub(super) struct SearchDaemon<S, G> {
    search: Arc<S>,
    geolocator: Arc<G>,
    config: OrchestratorConfig,
    command_rx: mpsc::UnboundedReceiver<Command>,
    state_tx: watch::Sender<SearchState>,
}

impl<S, G> SearchDaemon<S, G>
where
    S: SearchProvider,
    G: GeoLocator,
{
    pub(super) fn new(
        search: Arc<S>,
        geolocator: Arc<G>,
        config: OrchestratorConfig,
        command_rx: mpsc::UnboundedReceiver<Command>,
        state_tx: watch::Sender<SearchState>,
    ) -> Self {
        Self {
            search,
            geolocator,
            config,
            command_rx,
            state_tx,
        }
    }

    /// Runs the daemon until the token is cancelled or all handles drop.
    pub(super) async fn run(mut self, shutdown: CancellationToken) {
        self.initialize(&shutdown).await;
        if shutdown.is_cancelled() {
            return;
        }

        // The initial search goes through the same debounce window as any
        // other change, so a set_query right after startup coalesces with it.
        let mut debounce_deadline = Some(Instant::now() + self.config.debounce);
        let mut seed_deadline = self
            .config
            .seed_enabled
            .then(|| Instant::now() + self.config.seed_delay);
        let mut seeded = false;
        let mut latest_seq: u64 = 0;

        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SearchOutcome>();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Search orchestrator shutting down; pending work canceled");
                    break;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::SetQuery(query)) => {
                            self.state_tx.send_modify(|s| s.query = query);
                        }
                        Some(Command::SetCoordinates(coords)) => {
                            self.state_tx.send_modify(|s| s.coordinates = coords);
                        }
                        // All handles dropped; nothing can drive the session.
                        None => break,
                    }
                    debounce_deadline = Some(Instant::now() + self.config.debounce);
                }

                _ = sleep_until(debounce_deadline.unwrap_or_else(far_future)),
                    if debounce_deadline.is_some() =>
                {
                    debounce_deadline = None;
                    self.issue_search(&mut latest_seq, &done_tx);
                }

                Some((seq, outcome)) = done_rx.recv() => {
                    self.apply_outcome(seq, latest_seq, outcome);
                }

                _ = sleep_until(seed_deadline.unwrap_or_else(far_future)),
                    if seed_deadline.is_some() =>
                {
                    seed_deadline = None;
                    if !seeded && self.state_tx.borrow().results.is_empty() {
                        seeded = true;
                        self.seed_demo_data().await;
                        self.issue_search(&mut latest_seq, &done_tx);
                    }
                }
            }
        }
    }

    /// One-shot geolocation at startup.
    ///
    /// Best-effort: on failure the default center stays in place and the
    /// session proceeds without any user-visible error.
    async fn initialize(&mut self, shutdown: &CancellationToken) {
        let located = tokio::select! {
            _ = shutdown.cancelled() => return,
            result = self.geolocator.locate() => result,
        };

        match located {
            Ok(coords) => {
                info!(position = %coords, "Geolocation acquired");
                self.state_tx.send_modify(|s| s.coordinates = coords);
            }
            Err(e) => {
                debug!(error = %e, "Geolocation unavailable; keeping default center");
            }
        }
    }

    /// Dispatches a search for the current state, tagged with a fresh
    /// sequence number.
    fn issue_search(&self, latest_seq: &mut u64, done_tx: &mpsc::UnboundedSender<SearchOutcome>) {
        *latest_seq += 1;
        let seq = *latest_seq;

        let (center, query) = {
            let state = self.state_tx.borrow();
            (state.coordinates, state.query.clone())
        };
        self.state_tx.send_modify(|s| s.loading = true);

        debug!(seq, center = %center, query = %query, "Issuing nearby search");

        let search = Arc::clone(&self.search);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = search.find_nearby(center, &query).await;
            // Receiver gone means the daemon stopped; nothing to report.
            let _ = done_tx.send((seq, outcome));
        });
    }

    /// Applies a completed search, discarding anything but the latest issue.
    fn apply_outcome(
        &self,
        seq: u64,
        latest_seq: u64,
        outcome: Result<Vec<Shop>, ProviderError>,
    ) {
        if seq != latest_seq {
            debug!(seq, latest_seq, "Discarding stale search response");
            return;
        }

        match outcome {
            Ok(shops) => {
                debug!(seq, count = shops.len(), "Search completed");
                self.state_tx.send_modify(|s| {
                    s.results = shops;
                    s.loading = false;
                });
            }
            Err(e) => {
                // Last-known-good results stay in place.
                warn!(seq, error = %e, "Search failed; keeping previous results");
                self.state_tx.send_modify(|s| s.loading = false);
            }
        }
    }

    /// Invokes the one-time demo seed capability.
    async fn seed_demo_data(&self) {
        let center = self.state_tx.borrow().coordinates;
        match self.search.seed_demo(center).await {
            Ok(()) => info!(center = %center, "Demo data seeded"),
            Err(e) => warn!(error = %e, "Demo seed failed"),
        }
    }
}
