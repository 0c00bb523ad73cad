//! Search orchestrator - the core coordinator of the discovery session.
//!
//! Owns the single live [`SearchState`] and drives the
//! location/search/view loop:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     SearchOrchestrator                         │
//! │                                                                │
//! │  set_query ─────┐                                              │
//! │  set_coords ────┼─► Command channel ─► SearchDaemon            │
//! │                 │      (debounce, sequence numbers,            │
//! │  subscribe ◄────┼── watch channel ◄── geolocation, seed)       │
//! │                 │                                              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both the map surface and the list view render from the watch channel's
//! latest snapshot; neither talks to the backend directly.
//!
//! # Usage
//!
//! ```ignore
//! use barbermap::orchestrator::{OrchestratorConfig, SearchOrchestrator};
//!
//! let orchestrator = SearchOrchestrator::spawn(search, geolocator, config);
//! orchestrator.set_query("fade");
//!
//! let mut state_rx = orchestrator.subscribe();
//! state_rx.changed().await?;
//!
//! orchestrator.shutdown().await;
//! ```

mod daemon;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::coord::{Coordinates, DEFAULT_CENTER};
use crate::geolocate::GeoLocator;
use crate::provider::SearchProvider;
use crate::shop::SearchState;
use daemon::{Command, SearchDaemon};

/// Debounce window restarted by every query or viewport change.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Delay after startup before the one-shot empty-results seed check.
pub const DEFAULT_SEED_DELAY: Duration = Duration::from_millis(800);

/// Configuration for the search orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Debounce window for query/viewport changes.
    pub debounce: Duration,
    /// Delay before the one-shot seed check.
    pub seed_delay: Duration,
    /// Whether the demo-seed side channel is used at all.
    pub seed_enabled: bool,
    /// Viewport center before geolocation (and after geolocation failure).
    pub default_center: Coordinates,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            seed_delay: DEFAULT_SEED_DELAY,
            seed_enabled: true,
            default_center: DEFAULT_CENTER,
        }
    }
}

impl OrchestratorConfig {
    /// Set the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Disable the demo-seed side channel.
    pub fn without_seed(mut self) -> Self {
        self.seed_enabled = false;
        self
    }

    /// Set the starting viewport center.
    pub fn with_default_center(mut self, center: Coordinates) -> Self {
        self.default_center = center;
        self
    }
}

/// Handle to the running search orchestrator.
///
/// Cheap to use from UI code: commands are fire-and-forget, state arrives
/// through the watch channel.
pub struct SearchOrchestrator {
    command_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<SearchState>,
    shutdown: CancellationToken,
    daemon_handle: Option<JoinHandle<()>>,
}

impl SearchOrchestrator {
    /// Spawns the orchestrator daemon.
    ///
    /// The daemon immediately performs its one-shot geolocation attempt and
    /// then issues the initial search through the normal debounce window.
    pub fn spawn<S, G>(search: Arc<S>, geolocator: Arc<G>, config: OrchestratorConfig) -> Self
    where
        S: SearchProvider,
        G: GeoLocator,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::initial(config.default_center));
        let shutdown = CancellationToken::new();

        let daemon = SearchDaemon::new(search, geolocator, config, command_rx, state_tx);
        let daemon_shutdown = shutdown.clone();
        let daemon_handle = Some(tokio::spawn(async move {
            daemon.run(daemon_shutdown).await;
        }));

        info!("Search orchestrator started");

        Self {
            command_tx,
            state_rx,
            shutdown,
            daemon_handle,
        }
    }

    /// Updates the free-text query and restarts the debounce window.
    pub fn set_query(&self, query: impl Into<String>) {
        let _ = self.command_tx.send(Command::SetQuery(query.into()));
    }

    /// Updates the viewport center and restarts the debounce window.
    ///
    /// Shares the debounce channel with [`Self::set_query`], so rapid mixed
    /// changes issue at most one request.
    pub fn set_coordinates(&self, coords: Coordinates) {
        let _ = self.command_tx.send(Command::SetCoordinates(coords));
    }

    /// Subscribes to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_rx.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.state_rx.borrow().clone()
    }

    /// Token cancelled when the orchestrator shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether the daemon is still running.
    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Shuts the orchestrator down, canceling any pending debounce.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.daemon_handle.take() {
            match handle.await {
                Ok(()) => info!("Search orchestrator stopped"),
                Err(e) => tracing::error!("Search daemon task panicked: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocate::{FixedGeoLocator, GeolocateError};
    use crate::provider::ProviderError;
    use crate::shop::Shop;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Geolocator that always fails.
    struct NoGeoLocator;

    impl GeoLocator for NoGeoLocator {
        async fn locate(&self) -> Result<Coordinates, GeolocateError> {
            Err(GeolocateError::Unavailable("denied".to_string()))
        }
    }

    /// Search provider with scripted per-call delays and responses.
    ///
    /// Calls beyond the script get an immediate empty result.
    struct ScriptedSearch {
        calls: Mutex<Vec<(Coordinates, String)>>,
        seeds: Mutex<Vec<Coordinates>>,
        script: Mutex<VecDeque<(Duration, Result<Vec<Shop>, ProviderError>)>>,
    }

    impl ScriptedSearch {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                seeds: Mutex::new(Vec::new()),
                script: Mutex::new(VecDeque::new()),
            }
        }

        fn push_response(&self, delay: Duration, response: Result<Vec<Shop>, ProviderError>) {
            self.script.lock().unwrap().push_back((delay, response));
        }

        fn calls(&self) -> Vec<(Coordinates, String)> {
            self.calls.lock().unwrap().clone()
        }

        fn seed_count(&self) -> usize {
            self.seeds.lock().unwrap().len()
        }
    }

    impl SearchProvider for ScriptedSearch {
        async fn find_nearby(
            &self,
            center: Coordinates,
            query: &str,
        ) -> Result<Vec<Shop>, ProviderError> {
            self.calls.lock().unwrap().push((center, query.to_string()));
            let scripted = self.script.lock().unwrap().pop_front();
            match scripted {
                Some((delay, response)) => {
                    tokio::time::sleep(delay).await;
                    response
                }
                None => Ok(Vec::new()),
            }
        }

        async fn seed_demo(&self, center: Coordinates) -> Result<(), ProviderError> {
            self.seeds.lock().unwrap().push(center);
            Ok(())
        }
    }

    fn shop(id: &str, name: &str) -> Shop {
        Shop {
            id: id.to_string(),
            name: name.to_string(),
            lat: 37.78,
            lng: -122.41,
            address: String::new(),
            rating: 4.5,
        }
    }

    fn config() -> OrchestratorConfig {
        OrchestratorConfig::default().without_seed()
    }

    async fn settle(orchestrator: &SearchOrchestrator) -> SearchState {
        let mut rx = orchestrator.subscribe();
        let state = tokio::time::timeout(
            Duration::from_secs(10),
            rx.wait_for(|s| !s.loading),
        )
        .await
        .expect("state should settle")
        .expect("daemon should be alive")
        .clone();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_geolocation_failure_searches_default_center() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        // Let the initial debounce window elapse and the search complete
        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = settle(&orchestrator).await;

        let calls = search.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, DEFAULT_CENTER);
        assert_eq!(calls[0].1, "");

        assert!(state.results.is_empty());
        assert!(!state.loading);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_geolocation_success_updates_center() {
        let here = Coordinates::new(48.8566, 2.3522).unwrap();
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator = SearchOrchestrator::spawn(
            Arc::clone(&search),
            Arc::new(FixedGeoLocator::new(here)),
            config(),
        );

        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = settle(&orchestrator).await;

        assert_eq!(state.coordinates, here);
        assert_eq!(search.calls()[0].0, here);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_changes_issues_one_search() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        orchestrator.set_query("fade");
        tokio::time::sleep(Duration::from_millis(50)).await;
        orchestrator.set_query("fade cut");

        tokio::time::sleep(Duration::from_millis(400)).await;
        settle(&orchestrator).await;

        let calls = search.calls();
        assert_eq!(calls.len(), 1, "burst must coalesce into one request");
        assert_eq!(calls[0].1, "fade cut");
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_and_viewport_share_one_debounce_window() {
        let target = Coordinates::new(40.7128, -74.0060).unwrap();
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        orchestrator.set_query("beard trim");
        tokio::time::sleep(Duration::from_millis(100)).await;
        orchestrator.set_coordinates(target);

        tokio::time::sleep(Duration::from_millis(400)).await;
        settle(&orchestrator).await;

        let calls = search.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, target);
        assert_eq!(calls[0].1, "beard trim");
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_results() {
        let search = Arc::new(ScriptedSearch::new());
        // First issued search is slow and answers with the stale set
        search.push_response(Duration::from_millis(500), Ok(vec![shop("old", "Old Shop")]));
        // Second issued search is fast and answers with the fresh set
        search.push_response(Duration::from_millis(10), Ok(vec![shop("new", "New Shop")]));

        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        // Initial search fires at ~250ms and stays in flight until ~750ms
        tokio::time::sleep(Duration::from_millis(300)).await;
        orchestrator.set_coordinates(Coordinates::new(40.0, -74.0).unwrap());

        // Fresh results land first
        let mut rx = orchestrator.subscribe();
        let state = tokio::time::timeout(
            Duration::from_secs(10),
            rx.wait_for(|s| !s.results.is_empty()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(state.results[0].id, "new");

        // Let the stale response arrive; it must be discarded
        tokio::time::sleep(Duration::from_millis(600)).await;
        let state = orchestrator.state();
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].id, "new");
        assert!(!state.loading);

        assert_eq!(search.calls().len(), 2);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_known_results() {
        let search = Arc::new(ScriptedSearch::new());
        search.push_response(Duration::ZERO, Ok(vec![shop("1", "Fade Factory")]));
        search.push_response(
            Duration::ZERO,
            Err(ProviderError::HttpError("boom".to_string())),
        );

        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = settle(&orchestrator).await;
        assert_eq!(state.results.len(), 1);

        orchestrator.set_query("anything");
        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = settle(&orchestrator).await;

        // Transport failure clears loading but preserves the result set
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].id, "1");
        assert!(!state.loading);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_fires_once_when_results_stay_empty() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator = SearchOrchestrator::spawn(
            Arc::clone(&search),
            Arc::new(NoGeoLocator),
            OrchestratorConfig::default(),
        );

        // Past the seed delay: initial search came back empty, so the seed
        // fires and a re-search is issued.
        tokio::time::sleep(Duration::from_millis(1200)).await;
        settle(&orchestrator).await;
        assert_eq!(search.seed_count(), 1);
        assert_eq!(search.calls().len(), 2);

        // Results remain empty, but the seed never re-fires
        orchestrator.set_query("fade");
        tokio::time::sleep(Duration::from_millis(1500)).await;
        settle(&orchestrator).await;
        assert_eq!(search.seed_count(), 1);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_skipped_when_results_arrive() {
        let search = Arc::new(ScriptedSearch::new());
        search.push_response(Duration::ZERO, Ok(vec![shop("1", "Fade Factory")]));

        let orchestrator = SearchOrchestrator::spawn(
            Arc::clone(&search),
            Arc::new(NoGeoLocator),
            OrchestratorConfig::default(),
        );

        tokio::time::sleep(Duration::from_millis(1200)).await;
        settle(&orchestrator).await;

        assert_eq!(search.seed_count(), 0);
        assert_eq!(search.calls().len(), 1);
        orchestrator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_debounce() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        orchestrator.set_query("fade");
        tokio::time::sleep(Duration::from_millis(100)).await;
        orchestrator.shutdown().await;

        // Window would have elapsed by now; the canceled search must not fire
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(search.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_recenters_and_researches() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        tokio::time::sleep(Duration::from_millis(400)).await;
        settle(&orchestrator).await;

        // Selecting a list item routes its coordinates back into the loop
        let selected = Coordinates::new(37.8044, -122.2712).unwrap();
        orchestrator.set_coordinates(selected);
        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = settle(&orchestrator).await;

        assert_eq!(state.coordinates, selected);
        let calls = search.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, selected);
        orchestrator.shutdown().await;
    }

    #[tokio::test]
    async fn test_is_running_reflects_shutdown() {
        let search = Arc::new(ScriptedSearch::new());
        let orchestrator =
            SearchOrchestrator::spawn(Arc::clone(&search), Arc::new(NoGeoLocator), config());

        assert!(orchestrator.is_running());
        orchestrator.shutdown().await;
    }
}
