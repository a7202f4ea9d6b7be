mod api;
mod middleware;

use placemap_core::{ServerConfig, StorageBackend};
use placemap_db::{MemoryPlaceStore, PgPlaceStore, PlaceStore};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = placemap_core::load_server_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, storage = ?config.storage, "starting placemap-server");

    match config.storage {
        StorageBackend::Postgres => {
            let pool = placemap_db::connect_pool_from_config(&config).await?;
            let applied = placemap_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            serve(PgPlaceStore::new(pool), &config).await
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; places are lost on restart");
            serve(MemoryPlaceStore::new(), &config).await
        }
    }
}

async fn serve<S: PlaceStore>(store: S, config: &ServerConfig) -> anyhow::Result<()> {
    if config.seed_on_startup {
        placemap_db::seed_if_empty(&store).await?;
    }

    let app = build_app(AppState { store });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
