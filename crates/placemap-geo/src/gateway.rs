use std::future::Future;

use crate::client::GeoapifyClient;
use crate::types::{GeocodeResponse, PlacesResponse};

/// Read-only source of geocoding and nearby-place results.
///
/// `None` means the call failed or could not be made; it has already been
/// logged by the implementation.
pub trait PlaceGateway: Send + Sync + 'static {
    fn geocode(&self, query: &str) -> impl Future<Output = Option<GeocodeResponse>> + Send;

    fn places_near(&self, place_id: &str) -> impl Future<Output = Option<PlacesResponse>> + Send;
}

impl PlaceGateway for GeoapifyClient {
    fn geocode(&self, query: &str) -> impl Future<Output = Option<GeocodeResponse>> + Send {
        GeoapifyClient::geocode(self, query)
    }

    fn places_near(&self, place_id: &str) -> impl Future<Output = Option<PlacesResponse>> + Send {
        GeoapifyClient::places_near(self, place_id)
    }
}
