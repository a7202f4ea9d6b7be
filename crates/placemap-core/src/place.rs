//! The canonical `Place` record shared by storage, search results and the map.

use serde::{Deserialize, Deserializer, Serialize};

/// Category value used when a source carries no category at all.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// A named geo-point. Built by the normalizers and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default)]
    pub category: Categories,
    pub points: Points,
}

impl Place {
    /// Stable key used to reconcile map markers against a list of places.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.points.place_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Points {
    #[serde(rename = "type", default = "point_type")]
    pub kind: String,
    pub coordinates: Coordinates,
    pub place_id: String,
}

impl Points {
    #[must_use]
    pub fn point(lat: f64, lon: f64, place_id: impl Into<String>) -> Self {
        Self {
            kind: point_type(),
            coordinates: Coordinates { lat, lon },
            place_id: place_id.into(),
        }
    }
}

fn point_type() -> String {
    "Point".to_string()
}

/// Latitude/longitude pair. No range validation is applied.
///
/// Stored records sometimes carry coordinates as numeric strings
/// (`"55.6867243"`), so both encodings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate '{s}': {e}")))?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "coordinate must be finite, got {value}"
        )))
    }
}

/// Category as it appears on the wire: one string, or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Single(String),
    Many(Vec<String>),
}

/// Ordered category list, normalized from either [`CategoryField`] shape.
///
/// Never empty: an absent or empty category becomes `["unknown"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryField", into = "CategoryField")]
pub struct Categories(Vec<String>);

impl Categories {
    #[must_use]
    pub fn unknown() -> Self {
        Self(vec![UNKNOWN_CATEGORY.to_string()])
    }

    /// Normalize an optional wire value, falling back to `"unknown"`.
    #[must_use]
    pub fn from_optional(field: Option<CategoryField>) -> Self {
        field.map_or_else(Self::unknown, Self::from)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Top-level segment of the first category (`tourism.sights` -> `tourism`).
    ///
    /// Returns `None` for an empty or `"unknown"` category.
    #[must_use]
    pub fn display_segment(&self) -> Option<&str> {
        let first = self.first()?;
        let segment = first.split('.').next().unwrap_or(first).trim();
        if segment.is_empty() || segment == UNKNOWN_CATEGORY {
            None
        } else {
            Some(segment)
        }
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<CategoryField> for Categories {
    fn from(field: CategoryField) -> Self {
        let values: Vec<String> = match field {
            CategoryField::Single(s) => vec![s],
            CategoryField::Many(v) => v,
        };
        if values.is_empty() {
            Self::unknown()
        } else {
            Self(values)
        }
    }
}

impl From<Categories> for CategoryField {
    fn from(categories: Categories) -> Self {
        let mut values = categories.0;
        if values.len() == 1 {
            CategoryField::Single(values.remove(0))
        } else {
            CategoryField::Many(values)
        }
    }
}

impl From<&str> for Categories {
    fn from(value: &str) -> Self {
        Self::from(CategoryField::Single(value.to_string()))
    }
}

impl From<Vec<String>> for Categories {
    fn from(values: Vec<String>) -> Self {
        Self::from(CategoryField::Many(values))
    }
}

/// A place as returned by the storage API (`GET /api/places`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlace {
    pub id: i64,
    pub name: String,
    pub location_name: String,
    pub category: String,
    pub points: Points,
}

impl From<StoredPlace> for Place {
    fn from(stored: StoredPlace) -> Self {
        Self {
            name: Some(stored.name),
            location_name: Some(stored.location_name),
            category: Categories::from(stored.category.as_str()),
            points: stored.points,
        }
    }
}
