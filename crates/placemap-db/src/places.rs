//! Row types for the `places` table.

/// Input record for creating or replacing a place.
///
/// `points` is stored verbatim as JSONB; the API layer has already checked
/// that it is valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub name: String,
    pub location_name: String,
    pub category: String,
    pub points: serde_json::Value,
}

/// A row from the `places` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PlaceRow {
    pub id: i64,
    pub name: String,
    pub location_name: String,
    pub category: String,
    pub points: serde_json::Value,
}

impl PlaceRow {
    #[must_use]
    pub fn from_new(id: i64, place: NewPlace) -> Self {
        Self {
            id,
            name: place.name,
            location_name: place.location_name,
            category: place.category,
            points: place.points,
        }
    }

    /// True if every stored column already equals `place`.
    #[must_use]
    pub fn matches(&self, place: &NewPlace) -> bool {
        self.name == place.name
            && self.location_name == place.location_name
            && self.category == place.category
            && self.points == place.points
    }
}

/// Result of replacing a place's columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one column changed.
    Updated,
    /// The row exists but the new values equal the stored ones.
    Unchanged,
    NotFound,
}
