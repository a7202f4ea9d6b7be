use placemap_core::{Place, StoredPlace};
use placemap_geo::{from_stored_place, HttpClient};

pub const PLACES_PATH: &str = "/api/places";

/// Reads persisted places from the storage API.
///
/// Wraps an [`HttpClient`] configured with the API's base URL, so paths are
/// relative (`/api/places`).
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: HttpClient,
}

impl StorageClient {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Fetch stored places as returned by the API.
    ///
    /// A failed request or a non-array body yields an empty list; malformed
    /// elements are skipped. Both are logged.
    pub async fn list_stored(&self) -> Vec<StoredPlace> {
        let Some(body) = self.http.fetch_json(PLACES_PATH, "GET").await else {
            tracing::warn!(path = PLACES_PATH, "could not load stored places");
            return Vec::new();
        };
        let serde_json::Value::Array(items) = body else {
            tracing::warn!(path = PLACES_PATH, "stored places response is not an array");
            return Vec::new();
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<StoredPlace>(item) {
                Ok(place) => Some(place),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed stored place");
                    None
                }
            })
            .collect()
    }

    /// Stored places normalized to [`Place`].
    pub async fn list_places(&self) -> Vec<Place> {
        self.list_stored()
            .await
            .into_iter()
            .map(from_stored_place)
            .collect()
    }
}
