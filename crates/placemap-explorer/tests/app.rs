//! End-to-end tests for `App` against a wiremock storage API.

use placemap_core::{Categories, Place, Points};
use placemap_explorer::{App, MapEngine, MapOptions, StorageClient, TracingSurface};
use placemap_geo::HttpClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn storage_for(server: &MockServer) -> StorageClient {
    let http = HttpClient::with_base_url("placemap-test", &server.uri()).expect("http client");
    StorageClient::new(http)
}

fn engine() -> MapEngine<TracingSurface> {
    MapEngine::mount(TracingSurface::new(), &MapOptions::new(None))
}

fn search_place(id: &str) -> Place {
    Place {
        name: Some(id.to_string()),
        location_name: None,
        category: Categories::from("tourism"),
        points: Points::point(52.0, 4.0, id),
    }
}

async fn mount_places(server: &MockServer, body: serde_json::Value, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/places"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn mount_draws_persisted_places() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        serde_json::json!([
            {
                "id": 1,
                "name": "Copenhagen",
                "location_name": "1357 Copenhagen, Denmark",
                "category": "populated_place",
                "points": {
                    "type": "Point",
                    "coordinates": { "lat": "55.6867243", "lon": "12.5700724" },
                    "place_id": "cph"
                }
            },
            {
                "id": 2,
                "name": "Breda",
                "location_name": "Breda, NB, Netherlands",
                "category": "administrative",
                "points": {
                    "type": "Point",
                    "coordinates": { "lat": 51.5887845, "lon": 4.7760237 },
                    "place_id": "breda"
                }
            }
        ]),
        200,
    )
    .await;

    let app = App::mount(&storage_for(&server), engine()).await;

    assert_eq!(app.persisted().len(), 2);
    assert_eq!(app.persisted()[0].name.as_deref(), Some("Copenhagen"));
    assert!((app.persisted()[0].points.coordinates.lat - 55.686_724_3).abs() < 1e-9);
    assert_eq!(app.engine().len(), 2);
    assert_eq!(app.engine().surface().live_markers(), 2);
}

#[tokio::test]
async fn malformed_elements_are_skipped() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        serde_json::json!([
            { "id": 1, "name": "no points" },
            {
                "id": 2,
                "name": "Tokyo",
                "location_name": "Tokyo, Japan",
                "category": "administrative",
                "points": {
                    "type": "Point",
                    "coordinates": { "lat": 35.68, "lon": 139.76 },
                    "place_id": "tokyo"
                }
            }
        ]),
        200,
    )
    .await;

    let app = App::mount(&storage_for(&server), engine()).await;

    assert_eq!(app.persisted().len(), 1);
    assert!(app.engine().contains("tokyo"));
}

#[tokio::test]
async fn non_array_or_failed_response_yields_empty_map() {
    for (body, status) in [
        (serde_json::json!({ "places": [] }), 200),
        (serde_json::json!({ "error": "down" }), 500),
    ] {
        let server = MockServer::start().await;
        mount_places(&server, body, status).await;

        let app = App::mount(&storage_for(&server), engine()).await;

        assert!(app.persisted().is_empty());
        assert!(app.engine().is_empty());
    }
}

#[tokio::test]
async fn search_results_replace_previous_search_but_keep_persisted() {
    let server = MockServer::start().await;
    mount_places(
        &server,
        serde_json::json!([{
            "id": 1,
            "name": "Breda",
            "location_name": "Breda, NB, Netherlands",
            "category": "administrative",
            "points": {
                "type": "Point",
                "coordinates": { "lat": 51.58, "lon": 4.77 },
                "place_id": "breda"
            }
        }]),
        200,
    )
    .await;
    let mut app = App::mount(&storage_for(&server), engine()).await;

    app.on_search(vec![search_place("a"), search_place("b")]);
    let keys: Vec<String> = app.places().iter().map(|p| p.key().to_string()).collect();
    assert_eq!(keys, ["breda", "a", "b"]);

    let report = app.on_search(vec![search_place("c")]);
    let keys: Vec<String> = app.places().iter().map(|p| p.key().to_string()).collect();
    assert_eq!(keys, ["breda", "c"]);
    assert_eq!(report.removed, 2);
    assert_eq!(report.created, 1);
    assert_eq!(report.retained, 1);

    app.on_search(Vec::new());
    assert_eq!(app.engine().len(), 1);
}

#[tokio::test]
async fn run_applies_emissions_then_unmounts_on_close() {
    let server = MockServer::start().await;
    mount_places(&server, serde_json::json!([]), 200).await;
    let app = App::mount(&storage_for(&server), engine()).await;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send(vec![search_place("a"), search_place("b")]).unwrap();
    tx.send(vec![search_place("b")]).unwrap();
    drop(tx);

    let surface = app.run(rx).await;

    assert!(surface.is_destroyed());
    assert_eq!(surface.live_markers(), 0);
    assert_eq!(surface.open_popups(), 0);
}
