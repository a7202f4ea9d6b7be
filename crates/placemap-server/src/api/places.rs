//! CRUD handlers for `/api/places`.
//!
//! Collection and record bodies are bare JSON (no `data`/`meta` envelope)
//! because the explorer reads `GET /api/places` as a plain array. Errors
//! still use the [`ApiError`] envelope.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use placemap_db::{NewPlace, PlaceRow, PlaceStore, UpdateOutcome};
use serde::Serialize;
use serde_json::Value;

use super::{map_db_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct PlaceItem {
    pub id: i64,
    pub name: String,
    pub location_name: String,
    pub category: String,
    pub points: Value,
}

impl From<PlaceRow> for PlaceItem {
    fn from(row: PlaceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location_name: row.location_name,
            category: row.category,
            points: row.points,
        }
    }
}

pub(super) async fn list_places<S: PlaceStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<PlaceItem>>, ApiError> {
    let rows = state
        .store
        .list()
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;
    Ok(Json(rows.into_iter().map(PlaceItem::from).collect()))
}

pub(super) async fn get_place<S: PlaceStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PlaceItem>, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(place_not_found(req_id.0));
    };
    match state.store.get(id).await {
        Ok(Some(row)) => Ok(Json(PlaceItem::from(row))),
        Ok(None) => Err(place_not_found(req_id.0)),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

pub(super) async fn create_place<S: PlaceStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PlaceItem>), ApiError> {
    let place = validated_place(&req_id.0, body)?;

    match state.store.create(&place).await {
        Ok(row) => {
            tracing::info!(id = row.id, name = %row.name, "place created");
            Ok((StatusCode::CREATED, Json(PlaceItem::from(row))))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create place");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "failed to create place",
            ))
        }
    }
}

/// `204` when a column changed, `304` when the stored row already matches.
pub(super) async fn update_place<S: PlaceStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(place_not_found(req_id.0));
    };
    let place = validated_place(&req_id.0, body)?;

    match state.store.update(id, &place).await {
        Ok(UpdateOutcome::Updated) => Ok(StatusCode::NO_CONTENT),
        Ok(UpdateOutcome::Unchanged) => Ok(StatusCode::NOT_MODIFIED),
        Ok(UpdateOutcome::NotFound) => Err(place_not_found(req_id.0)),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

/// `204` when a row was removed, `304` when there was nothing to remove.
pub(super) async fn delete_place<S: PlaceStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(place_not_found(req_id.0));
    };
    match state.store.delete(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Ok(StatusCode::NOT_MODIFIED),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

fn place_not_found(request_id: String) -> ApiError {
    ApiError::new(request_id, "not_found", "place not found")
}

fn validated_place(
    req_id: &str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<NewPlace, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(req_id, "bad_request", rejection.body_text())
    })?;
    validate_place(&body).map_err(|fields| ApiError::validation(req_id, fields))
}

/// Check a create/update payload.
///
/// `name`, `location_name` and `category` must be non-blank strings;
/// `points` must be a string holding valid JSON, which is decoded for
/// storage. Every failing field is reported, not only the first.
pub(super) fn validate_place(body: &Value) -> Result<NewPlace, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    let name = required_string(body, "name", &mut errors);
    let location_name = required_string(body, "location_name", &mut errors);
    let category = required_string(body, "category", &mut errors);
    let points = required_string(body, "points", &mut errors).and_then(|raw| {
        match serde_json::from_str::<Value>(&raw) {
            Ok(points) => Some(points),
            Err(_) => {
                errors.insert(
                    "points".to_string(),
                    "The points field must be a valid JSON string.".to_string(),
                );
                None
            }
        }
    });

    match (name, location_name, category, points) {
        (Some(name), Some(location_name), Some(category), Some(points)) if errors.is_empty() => {
            Ok(NewPlace {
                name,
                location_name,
                category,
                points,
            })
        }
        _ => Err(errors),
    }
}

fn required_string(
    body: &Value,
    field: &str,
    errors: &mut BTreeMap<String, String>,
) -> Option<String> {
    match body.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        None | Some(Value::Null | Value::String(_)) => {
            errors.insert(field.to_string(), format!("The {field} field is required."));
            None
        }
        Some(_) => {
            errors.insert(field.to_string(), format!("The {field} field must be a string."));
            None
        }
    }
}

#[cfg(test)]
#[path = "places_test.rs"]
mod tests;
