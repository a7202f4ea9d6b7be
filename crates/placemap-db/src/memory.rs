//! Process-local [`PlaceStore`] used for `PLACEMAP_STORAGE=memory` and
//! route tests. Contents are lost when the process exits.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::places::{NewPlace, PlaceRow, UpdateOutcome};
use crate::store::PlaceStore;
use crate::DbError;

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, PlaceRow>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPlaceStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryPlaceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaceStore for MemoryPlaceStore {
    async fn list(&self) -> Result<Vec<PlaceRow>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<PlaceRow>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn create(&self, place: &NewPlace) -> Result<PlaceRow, DbError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let row = PlaceRow::from_new(inner.last_id, place.clone());
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, place: &NewPlace) -> Result<UpdateOutcome, DbError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        if row.matches(place) {
            return Ok(UpdateOutcome::Unchanged);
        }
        *row = PlaceRow::from_new(id, place.clone());
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn new_place(name: &str) -> NewPlace {
        NewPlace {
            name: name.to_string(),
            location_name: format!("{name}, Somewhere"),
            category: "administrative".to_string(),
            points: json!({
                "type": "Point",
                "coordinates": { "lat": 1.0, "lon": 2.0 },
                "place_id": format!("{name}-id")
            }),
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_lists_in_order() {
        let store = MemoryPlaceStore::new();
        let a = store.create(&new_place("a")).await.unwrap();
        let b = store.create(&new_place("b")).await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryPlaceStore::new();
        let a = store.create(&new_place("a")).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        let b = store.create(&new_place("b")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn update_reports_changed_unchanged_and_missing() {
        let store = MemoryPlaceStore::new();
        let row = store.create(&new_place("a")).await.unwrap();

        assert_eq!(
            store.update(row.id, &new_place("a")).await.unwrap(),
            UpdateOutcome::Unchanged
        );
        assert_eq!(
            store.update(row.id, &new_place("renamed")).await.unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(
            store.get(row.id).await.unwrap().map(|r| r.name),
            Some("renamed".to_string())
        );
        assert_eq!(
            store.update(99, &new_place("x")).await.unwrap(),
            UpdateOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn delete_missing_returns_false() {
        let store = MemoryPlaceStore::new();
        assert!(!store.delete(7).await.unwrap());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryPlaceStore::new();
        let other = store.clone();
        store.create(&new_place("a")).await.unwrap();
        assert_eq!(other.list().await.unwrap().len(), 1);
    }
}
