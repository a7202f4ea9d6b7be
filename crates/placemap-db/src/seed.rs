use serde_json::json;

use crate::places::NewPlace;
use crate::store::PlaceStore;
use crate::DbError;

/// Demo places inserted on first start when seeding is enabled.
///
/// Coordinates are numeric strings; readers accept both encodings.
#[must_use]
pub fn seed_places() -> Vec<NewPlace> {
    [
        (
            "Copenhagen",
            "1357 Copenhagen, Denmark",
            "populated_place",
            "55.6867243",
            "12.5700724",
            "5158b49487e0232940592beff494e6d74b40f00103f901662ad10000000000c00207920307313335372b646b",
        ),
        (
            "Mexico",
            "Mexico City, Mexico",
            "administrative",
            "19.4326296",
            "-99.1331785",
            "51f1811dff85c858c05914483fd0c06e3340f00101f9014a00150000000000c00208",
        ),
        (
            "Breda",
            "Breda, NB, Netherlands",
            "administrative",
            "51.5887845",
            "4.7760237",
            "5104aff1f4a51a13405924f25d4a5dcb4940f00101f9017c64290000000000c00208",
        ),
        (
            "Japan",
            "Tokyo, Japan",
            "administrative",
            "35.6821936",
            "139.762221",
            "51626a4b1d64786140592fc5b01e52d74140f00101f901d58b170000000000c00208",
        ),
        (
            "Reykjavik City Hall",
            "Reykjavik City Hall, Tjarnargata 11, 101 Reykjavik, Iceland",
            "tourism.sights.city_hall",
            "64.145981",
            "-21.9422367",
            "514997a36c36f135c0599835b1c057095040f00101f9017d60270000000000c00208",
        ),
    ]
    .into_iter()
    .map(|(name, location_name, category, lat, lon, place_id)| NewPlace {
        name: name.to_string(),
        location_name: location_name.to_string(),
        category: category.to_string(),
        points: json!({
            "type": "Point",
            "coordinates": { "lat": lat, "lon": lon },
            "place_id": place_id,
        }),
    })
    .collect()
}

/// Insert [`seed_places`] if the store holds no places yet.
///
/// Returns the number of places inserted (zero when the store was already
/// populated).
///
/// # Errors
///
/// Returns [`DbError`] if listing or inserting fails.
pub async fn seed_if_empty<S: PlaceStore>(store: &S) -> Result<usize, DbError> {
    if !store.list().await?.is_empty() {
        tracing::debug!("places table already populated; skipping seed");
        return Ok(0);
    }

    let places = seed_places();
    for place in &places {
        store.create(place).await?;
    }
    tracing::info!(count = places.len(), "seeded places");
    Ok(places.len())
}
