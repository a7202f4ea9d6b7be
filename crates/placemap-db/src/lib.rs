//! Place persistence: the [`PlaceStore`] seam with Postgres and in-memory
//! backends, plus pool setup and seeding.

pub mod memory;
pub mod places;
pub mod pool;
pub mod postgres;
pub mod seed;
pub mod store;

use thiserror::Error;

pub use memory::MemoryPlaceStore;
pub use places::{NewPlace, PlaceRow, UpdateOutcome};
pub use pool::{connect_pool, connect_pool_from_config, ping, run_migrations, PoolConfig};
pub use postgres::PgPlaceStore;
pub use seed::{seed_if_empty, seed_places};
pub use store::PlaceStore;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}
