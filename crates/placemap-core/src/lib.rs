pub mod app_config;
pub mod category;
pub mod config;
pub mod place;

pub use app_config::{Environment, ExplorerConfig, ServerConfig, StorageBackend};
pub use category::{category_color, FALLBACK_COLOR};
pub use config::{
    load_explorer_config, load_explorer_config_from_env, load_server_config,
    load_server_config_from_env, parse_delay_ms,
};
pub use place::{Categories, CategoryField, Coordinates, Place, Points, StoredPlace};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
