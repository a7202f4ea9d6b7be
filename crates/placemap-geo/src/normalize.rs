//! Conversion from provider features to the canonical [`Place`].

use placemap_core::{Categories, Place, Points, StoredPlace};

use crate::types::{Feature, GeocodeProperties, GeocodeResponse, PlacesProperties, PlacesResponse};

/// Geocoding result: the formatted address doubles as the display name.
#[must_use]
pub fn from_geocode_feature(feature: &Feature<GeocodeProperties>) -> Place {
    let p = &feature.properties;
    Place {
        name: p.formatted.clone(),
        location_name: p.formatted.clone(),
        category: Categories::from_optional(p.category.clone()),
        points: Points::point(p.lat, p.lon, p.place_id.clone()),
    }
}

#[must_use]
pub fn from_places_feature(feature: &Feature<PlacesProperties>) -> Place {
    let p = &feature.properties;
    Place {
        name: p.name.clone(),
        location_name: p.formatted.clone(),
        category: Categories::from_optional(p.categories.clone()),
        points: Points::point(p.lat, p.lon, p.place_id.clone()),
    }
}

/// Stored record from the storage API. Field for field, with the stored
/// category string read as a single category.
#[must_use]
pub fn from_stored_place(stored: StoredPlace) -> Place {
    Place::from(stored)
}

#[must_use]
pub fn normalize_geocode(response: &GeocodeResponse) -> Vec<Place> {
    response.features.iter().map(from_geocode_feature).collect()
}

#[must_use]
pub fn normalize_places(response: &PlacesResponse) -> Vec<Place> {
    response.features.iter().map(from_places_feature).collect()
}
