//! Root composition: persisted places plus the latest search, on one map.

use placemap_core::Place;
use tokio::sync::mpsc;

use crate::map::{MapEngine, MapSurface, ReconcileReport};
use crate::storage::StorageClient;

pub struct App<S: MapSurface> {
    engine: MapEngine<S>,
    persisted: Vec<Place>,
    latest_search: Vec<Place>,
}

impl<S: MapSurface> App<S> {
    /// Load persisted places once and draw them.
    pub async fn mount(storage: &StorageClient, mut engine: MapEngine<S>) -> Self {
        let persisted = storage.list_places().await;
        tracing::info!(count = persisted.len(), "loaded persisted places");
        engine.reconcile(&persisted);
        Self {
            engine,
            persisted,
            latest_search: Vec::new(),
        }
    }

    /// Replace the search half of the map with `places`.
    pub fn on_search(&mut self, places: Vec<Place>) -> ReconcileReport {
        self.latest_search = places;
        let merged = self.places();
        self.engine.reconcile(&merged)
    }

    /// Persisted places followed by the latest search results.
    #[must_use]
    pub fn places(&self) -> Vec<Place> {
        self.persisted
            .iter()
            .chain(&self.latest_search)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn persisted(&self) -> &[Place] {
        &self.persisted
    }

    #[must_use]
    pub fn engine(&self) -> &MapEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MapEngine<S> {
        &mut self.engine
    }

    /// Apply search emissions until the sender side closes, then unmount the
    /// map and return its surface.
    pub async fn run(mut self, mut results: mpsc::UnboundedReceiver<Vec<Place>>) -> S {
        while let Some(places) = results.recv().await {
            let report = self.on_search(places);
            tracing::info!(
                results = self.latest_search.len(),
                created = report.created,
                removed = report.removed,
                "search results applied"
            );
        }
        tracing::debug!("search channel closed; unmounting map");
        self.engine.unmount()
    }
}
