//! Postgres-backed [`PlaceStore`].

use sqlx::PgPool;

use crate::places::{NewPlace, PlaceRow, UpdateOutcome};
use crate::store::PlaceStore;
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl PlaceStore for PgPlaceStore {
    async fn list(&self) -> Result<Vec<PlaceRow>, DbError> {
        let rows = sqlx::query_as::<_, PlaceRow>(
            "SELECT id, name, location_name, category, points \
             FROM places \
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<PlaceRow>, DbError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            "SELECT id, name, location_name, category, points \
             FROM places \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, place: &NewPlace) -> Result<PlaceRow, DbError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            "INSERT INTO places (name, location_name, category, points) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, location_name, category, points",
        )
        .bind(&place.name)
        .bind(&place.location_name)
        .bind(&place.category)
        .bind(&place.points)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, place: &NewPlace) -> Result<UpdateOutcome, DbError> {
        // JSONB equality ignores key order, so re-sending the same points
        // object in a different order counts as unchanged.
        let updated: Option<i64> = sqlx::query_scalar::<_, i64>(
            "UPDATE places \
             SET name = $2, location_name = $3, category = $4, points = $5 \
             WHERE id = $1 \
               AND (name, location_name, category, points) \
                   IS DISTINCT FROM ($2::text, $3::text, $4::text, $5::jsonb) \
             RETURNING id",
        )
        .bind(id)
        .bind(&place.name)
        .bind(&place.location_name)
        .bind(&place.category)
        .bind(&place.points)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_some() {
            return Ok(UpdateOutcome::Updated);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM places WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists {
            UpdateOutcome::Unchanged
        } else {
            UpdateOutcome::NotFound
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}
