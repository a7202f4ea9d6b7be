mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placemap")]
#[command(about = "Search places and explore them on a map from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the geocoded place plus what is nearby
    Search {
        /// Free-text location, e.g. "Amsterdam"
        query: String,
    },
    /// List places stored by the storage API
    Places,
    /// Read search-box input from stdin, one line per edit, and drive the map
    Explore {
        /// Override the debounce window from PLACEMAP_SEARCH_DEBOUNCE_MS
        #[arg(long)]
        debounce_ms: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = placemap_core::load_explorer_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { query } => commands::run_search(&config, &query).await,
        Commands::Places => commands::run_places(&config).await,
        Commands::Explore { debounce_ms } => commands::run_explore(&config, debounce_ms).await,
    }
}

#[cfg(test)]
mod tests;
