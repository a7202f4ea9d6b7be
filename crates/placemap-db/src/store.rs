use std::future::Future;

use crate::places::{NewPlace, PlaceRow, UpdateOutcome};
use crate::DbError;

/// Persistence boundary for places.
///
/// Implemented by [`crate::PgPlaceStore`] and [`crate::MemoryPlaceStore`].
/// Handlers are generic over this trait so route tests can run without a
/// database.
pub trait PlaceStore: Clone + Send + Sync + 'static {
    /// All places ordered by ascending `id`.
    fn list(&self) -> impl Future<Output = Result<Vec<PlaceRow>, DbError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Option<PlaceRow>, DbError>> + Send;

    fn create(&self, place: &NewPlace) -> impl Future<Output = Result<PlaceRow, DbError>> + Send;

    /// Replace every column of `id`.
    fn update(
        &self,
        id: i64,
        place: &NewPlace,
    ) -> impl Future<Output = Result<UpdateOutcome, DbError>> + Send;

    /// Returns `true` if a row was removed.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<(), DbError>> + Send;
}
