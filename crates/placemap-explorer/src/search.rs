//! Search-as-you-type: debounced input, geocode, then places near the first
//! hit, normalized into one list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use placemap_core::Place;
use placemap_geo::{normalize_geocode, normalize_places, PlaceGateway};
use tokio::sync::{mpsc, watch};

use crate::debounce::Debouncer;

/// Observable state of the search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub is_loading: bool,
    pub places: Vec<Place>,
}

struct Shared<G> {
    gateway: G,
    state: watch::Sender<SearchState>,
    results: mpsc::UnboundedSender<Vec<Place>>,
    /// Token of the newest search; results carrying an older one are stale.
    latest: AtomicU64,
}

impl<G: PlaceGateway> Shared<G> {
    fn invalidate(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn emit(&self, places: Vec<Place>) {
        if self.results.send(places).is_err() {
            tracing::debug!("search results receiver dropped");
        }
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Run the search claimed by `token`. The token is taken when the search
    /// is triggered, so a clear that lands before this task runs wins.
    async fn search(&self, token: u64, text: String) {
        if !self.is_current(token) {
            tracing::debug!(token, query = %text, "search superseded before it started");
            return;
        }
        self.state.send_modify(|s| s.is_loading = true);

        let mut places = Vec::new();
        match self.gateway.geocode(&text).await {
            Some(geocoded) => {
                places.extend(normalize_geocode(&geocoded));
                if let Some(first) = geocoded.first() {
                    let place_id = &first.properties.place_id;
                    match self.gateway.places_near(place_id).await {
                        Some(nearby) => places.extend(normalize_places(&nearby)),
                        None => {
                            tracing::warn!(place_id = %place_id, "places lookup failed");
                        }
                    }
                }
            }
            None => tracing::warn!(query = %text, "geocode lookup failed"),
        }

        if !self.is_current(token) {
            tracing::debug!(token, query = %text, "discarding stale search results");
            return;
        }

        tracing::debug!(token, results = places.len(), "search settled");
        self.state.send_modify(|s| {
            s.places.clone_from(&places);
            s.is_loading = false;
        });
        self.emit(places);
    }
}

/// Drives searches from raw input text.
///
/// Results are emitted on the receiver returned by [`SearchPipeline::new`],
/// one `Vec<Place>` per settled search (an empty input emits `[]`).
pub struct SearchPipeline<G: PlaceGateway> {
    shared: Arc<Shared<G>>,
    debouncer: Debouncer<String>,
}

impl<G: PlaceGateway> SearchPipeline<G> {
    pub fn new(gateway: G, debounce_ms: i64) -> (Self, mpsc::UnboundedReceiver<Vec<Place>>) {
        let (state, _) = watch::channel(SearchState::default());
        let (results, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            gateway,
            state,
            results,
            latest: AtomicU64::new(0),
        });

        let trigger = Arc::clone(&shared);
        let debouncer = Debouncer::new(
            move |text: String| {
                let token = trigger.invalidate();
                let shared = Arc::clone(&trigger);
                tokio::spawn(async move { shared.search(token, text).await });
            },
            debounce_ms,
        );

        (Self { shared, debouncer }, rx)
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Record new search-box text.
    ///
    /// Blank text clears results at once and cancels anything pending or in
    /// flight; otherwise the search runs after the debounce window.
    pub fn input(&self, text: &str) {
        self.shared.state.send_modify(|s| text.clone_into(&mut s.query));

        if text.trim().is_empty() {
            self.debouncer.cancel();
            self.shared.invalidate();
            self.shared.state.send_modify(|s| {
                s.places.clear();
                s.is_loading = false;
            });
            self.shared.emit(Vec::new());
            return;
        }

        self.debouncer.call(text.to_string());
    }

    /// Run one search immediately, bypassing the debouncer.
    pub async fn search(&self, text: &str) {
        let token = self.shared.invalidate();
        self.shared.search(token, text.to_string()).await;
    }

    /// Reset the box on focus. A pending debounced search still runs.
    pub fn focus(&self) {
        self.shared.state.send_modify(|s| {
            s.query.clear();
            s.places.clear();
            s.is_loading = false;
        });
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
