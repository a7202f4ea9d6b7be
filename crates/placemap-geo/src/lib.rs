pub mod client;
pub mod error;
pub mod gateway;
pub mod http;
pub mod normalize;
pub mod types;

pub use client::{GeoapifyClient, PLACE_CATEGORIES, PLACES_LIMIT};
pub use error::GeoError;
pub use gateway::PlaceGateway;
pub use http::HttpClient;
pub use normalize::{
    from_geocode_feature, from_places_feature, from_stored_place, normalize_geocode,
    normalize_places,
};
pub use types::{
    Feature, FeatureCollection, GeocodeProperties, GeocodeResponse, PlacesProperties,
    PlacesResponse,
};
