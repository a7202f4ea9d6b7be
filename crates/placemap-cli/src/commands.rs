//! Command handlers. Results go to stdout, logs to stderr.

use std::time::Duration;

use placemap_core::{ExplorerConfig, Place};
use placemap_explorer::{App, MapEngine, MapOptions, SearchPipeline, StorageClient, TracingSurface};
use placemap_geo::{GeoapifyClient, HttpClient};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Extra time after the debounce window for a search started by the last
/// line to reach the network before input handling shuts down.
const EOF_GRACE: Duration = Duration::from_millis(50);

fn geoapify(config: &ExplorerConfig) -> anyhow::Result<GeoapifyClient> {
    let http = HttpClient::new(&config.user_agent)?;
    Ok(GeoapifyClient::new(http, config.geoapify_api_key.clone())?)
}

fn storage(config: &ExplorerConfig) -> anyhow::Result<StorageClient> {
    let http = HttpClient::with_base_url(&config.user_agent, &config.api_base_url)?;
    Ok(StorageClient::new(http))
}

/// One tab-separated line per place: key, name, coordinates, categories.
pub(crate) fn format_place(place: &Place) -> String {
    let coords = &place.points.coordinates;
    format!(
        "{}\t{}\t{:.6},{:.6}\t{}",
        place.key(),
        place.name.as_deref().unwrap_or("-"),
        coords.lat,
        coords.lon,
        place.category.as_slice().join(",")
    )
}

fn print_places(places: &[Place]) {
    for place in places {
        println!("{}", format_place(place));
    }
}

pub(crate) async fn run_search(config: &ExplorerConfig, query: &str) -> anyhow::Result<()> {
    let (pipeline, mut results) = SearchPipeline::new(geoapify(config)?, config.search_debounce_ms);
    pipeline.search(query).await;

    match results.try_recv() {
        Ok(places) if !places.is_empty() => print_places(&places),
        _ => println!("no places found for '{query}'"),
    }
    Ok(())
}

pub(crate) async fn run_places(config: &ExplorerConfig) -> anyhow::Result<()> {
    let places = storage(config)?.list_places().await;
    if places.is_empty() {
        println!("no stored places");
    }
    print_places(&places);
    Ok(())
}

/// Drive the whole explorer from stdin until EOF.
///
/// Every line is treated as the full contents of the search box. At EOF the
/// pending search (if any) is allowed to start, the pipeline is dropped and
/// the app unmounts once the last in-flight search settles.
pub(crate) async fn run_explore(
    config: &ExplorerConfig,
    debounce_ms: Option<i64>,
) -> anyhow::Result<()> {
    let debounce_ms = debounce_ms.unwrap_or(config.search_debounce_ms).max(0);
    let (pipeline, results) = SearchPipeline::new(geoapify(config)?, debounce_ms);

    let engine = MapEngine::mount(
        TracingSurface::new(),
        &MapOptions::new(config.mapbox_access_token.clone()),
    );
    let app = App::mount(&storage(config)?, engine).await;
    tracing::info!(persisted = app.persisted().len(), "explorer ready; type a place per line");

    let window = Duration::from_millis(u64::try_from(debounce_ms).unwrap_or(0));
    let (input, surface) = tokio::join!(read_input(pipeline, window), app.run(results));

    tracing::info!(
        markers = surface.live_markers(),
        destroyed = surface.is_destroyed(),
        "explorer closed"
    );
    input
}

async fn read_input(
    pipeline: SearchPipeline<GeoapifyClient>,
    window: Duration,
) -> anyhow::Result<()> {
    let mut updates = pipeline.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut was_loading = false;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => pipeline.input(&line),
                None => break,
            },
            Ok(()) = updates.changed() => {
                let state = updates.borrow_and_update().clone();
                // Print once per settled search.
                if was_loading && !state.is_loading && !state.query.trim().is_empty() {
                    println!("# {} result(s) for '{}'", state.places.len(), state.query);
                    print_places(&state.places);
                }
                was_loading = state.is_loading;
            }
        }
    }

    tokio::time::sleep(window + EOF_GRACE).await;
    Ok(())
}
