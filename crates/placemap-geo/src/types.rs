//! Geoapify response types.
//!
//! Both endpoints return a GeoJSON-style `{"features": [{"properties": {...}}]}`
//! body. Only the properties the explorer reads are modelled; everything else
//! the provider sends is ignored.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use placemap_core::CategoryField;

/// A `{"features": [...]}` body with typed per-feature properties.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
        }
    }
}

impl<P: DeserializeOwned> FeatureCollection<P> {
    /// Parses a raw body feature by feature.
    ///
    /// A feature that fails to deserialize (missing `place_id`, `lat` or
    /// `lon`, or wrongly typed fields) is skipped and logged; the remaining
    /// features are kept. A body with no `features` array yields an empty
    /// collection.
    #[must_use]
    pub fn from_value(body: &serde_json::Value) -> Self {
        let Some(raw) = body.get("features").and_then(serde_json::Value::as_array) else {
            tracing::warn!("response has no features array");
            return Self::default();
        };

        let features = raw
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<Feature<P>>(value.clone()) {
                    Ok(feature) => Some(feature),
                    Err(e) => {
                        tracing::debug!(index, error = %e, "skipping malformed feature");
                        None
                    }
                }
            })
            .collect();

        Self { features }
    }
}

impl<P> FeatureCollection<P> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Feature<P>> {
        self.features.first()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature<P> {
    pub properties: P,
}

/// Properties of one geocoding result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeProperties {
    #[serde(default)]
    pub formatted: Option<String>,
    /// Single category string such as `"populated_place"`; often absent.
    #[serde(default)]
    pub category: Option<CategoryField>,
    pub lat: f64,
    pub lon: f64,
    pub place_id: String,
}

/// Properties of one places-near result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacesProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default)]
    pub categories: Option<CategoryField>,
    pub lat: f64,
    pub lon: f64,
    pub place_id: String,
}

pub type GeocodeResponse = FeatureCollection<GeocodeProperties>;
pub type PlacesResponse = FeatureCollection<PlacesProperties>;
