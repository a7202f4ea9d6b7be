use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use placemap_geo::{GeocodeResponse, PlacesResponse};
use serde_json::json;

use super::*;

const DEBOUNCE_MS: i64 = 100;

/// Scripted gateway. Query `"slow"` takes 500ms, `"nowhere"` has no hits,
/// `"broken"` fails; everything else geocodes to `{query}-id` with two
/// nearby places.
#[derive(Clone, Default)]
struct FakeGateway {
    calls: Arc<Mutex<Vec<String>>>,
    places_fail: bool,
}

impl FakeGateway {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PlaceGateway for FakeGateway {
    fn geocode(&self, query: &str) -> impl Future<Output = Option<GeocodeResponse>> + Send {
        let query = query.to_string();
        self.calls.lock().unwrap().push(format!("geocode:{query}"));
        async move {
            match query.as_str() {
                "broken" => return None,
                "nowhere" => return Some(GeocodeResponse::default()),
                "slow" => tokio::time::sleep(Duration::from_millis(500)).await,
                _ => {}
            }
            Some(GeocodeResponse::from_value(&json!({
                "features": [{
                    "properties": {
                        "formatted": query,
                        "lat": 52.37,
                        "lon": 4.89,
                        "place_id": format!("{query}-id")
                    }
                }]
            })))
        }
    }

    fn places_near(&self, place_id: &str) -> impl Future<Output = Option<PlacesResponse>> + Send {
        let place_id = place_id.to_string();
        self.calls.lock().unwrap().push(format!("places:{place_id}"));
        let fail = self.places_fail;
        async move {
            if fail {
                return None;
            }
            Some(PlacesResponse::from_value(&json!({
                "features": [
                    { "properties": { "name": "near-1", "categories": ["catering.cafe"], "lat": 52.36, "lon": 4.88, "place_id": format!("{place_id}-1") } },
                    { "properties": { "name": "near-2", "categories": ["tourism"], "lat": 52.38, "lon": 4.9, "place_id": format!("{place_id}-2") } }
                ]
            })))
        }
    }
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn keys(places: &[Place]) -> Vec<&str> {
    places.iter().map(Place::key).collect()
}

#[tokio::test(start_paused = true)]
async fn geocode_hit_then_nearby_places_emits_combined_list() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    pipeline.input("Amsterdam");
    advance(150).await;

    let emitted = rx.try_recv().expect("one emission");
    assert_eq!(emitted.len(), 3);
    assert_eq!(keys(&emitted), ["Amsterdam-id", "Amsterdam-id-1", "Amsterdam-id-2"]);
    assert_eq!(emitted[0].name.as_deref(), Some("Amsterdam"));
    assert_eq!(gateway.calls(), ["geocode:Amsterdam", "places:Amsterdam-id"]);

    let state = pipeline.state();
    assert_eq!(state.query, "Amsterdam");
    assert!(!state.is_loading);
    assert_eq!(state.places, emitted);
}

#[tokio::test(start_paused = true)]
async fn empty_input_emits_empty_list_without_gateway_calls() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    pipeline.input("   ");

    assert_eq!(rx.try_recv().expect("immediate emission"), Vec::<Place>::new());
    advance(500).await;
    assert!(rx.try_recv().is_err());
    assert!(gateway.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn typing_burst_runs_one_search_for_final_text() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    for text in ["A", "Am", "Ams", "Amst"] {
        pipeline.input(text);
        advance(20).await;
    }
    advance(200).await;

    assert_eq!(gateway.calls(), ["geocode:Amst", "places:Amst-id"]);
    assert_eq!(keys(&rx.try_recv().expect("emission"))[0], "Amst-id");
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn no_geocode_hit_skips_places_lookup() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    pipeline.input("nowhere");
    advance(150).await;

    assert!(rx.try_recv().expect("emission").is_empty());
    assert_eq!(gateway.calls(), ["geocode:nowhere"]);
}

#[tokio::test(start_paused = true)]
async fn failed_geocode_emits_empty_list() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    pipeline.input("broken");
    advance(150).await;

    assert!(rx.try_recv().expect("emission").is_empty());
    assert!(!pipeline.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn failed_places_lookup_keeps_geocode_results() {
    let gateway = FakeGateway {
        places_fail: true,
        ..FakeGateway::default()
    };
    let (pipeline, mut rx) = SearchPipeline::new(gateway, DEBOUNCE_MS);

    pipeline.input("Breda");
    advance(150).await;

    assert_eq!(keys(&rx.try_recv().expect("emission")), ["Breda-id"]);
}

#[tokio::test(start_paused = true)]
async fn slow_earlier_search_is_discarded_when_newer_one_starts() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    pipeline.input("slow");
    advance(150).await;
    assert!(pipeline.state().is_loading, "slow search should be in flight");

    pipeline.input("fast");
    advance(150).await;
    assert_eq!(keys(&rx.try_recv().expect("fast results"))[0], "fast-id");

    advance(600).await;
    assert!(rx.try_recv().is_err(), "stale results must not be emitted");
    assert_eq!(keys(&pipeline.state().places)[0], "fast-id");
}

#[tokio::test(start_paused = true)]
async fn clearing_input_invalidates_in_flight_search() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway, DEBOUNCE_MS);

    pipeline.input("slow");
    advance(150).await;
    pipeline.input("");

    assert!(rx.try_recv().expect("clear emission").is_empty());
    assert!(!pipeline.state().is_loading);
    advance(600).await;
    assert!(rx.try_recv().is_err());
    assert!(pipeline.state().places.is_empty());
}

#[tokio::test]
async fn search_triggered_before_a_clear_never_runs() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway.clone(), DEBOUNCE_MS);

    // Debounce fired and claimed its token, but the task has not run yet.
    let token = pipeline.shared.invalidate();
    pipeline.input("");
    assert!(rx.try_recv().expect("clear emission").is_empty());

    pipeline.shared.search(token, "Amsterdam".to_string()).await;

    assert!(rx.try_recv().is_err());
    assert!(!pipeline.state().is_loading);
    assert!(gateway.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn focus_resets_state_but_keeps_pending_search() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway, DEBOUNCE_MS);
    let mut watcher = pipeline.subscribe();

    pipeline.input("Delft");
    pipeline.focus();
    let state = watcher.borrow_and_update().clone();
    assert!(state.query.is_empty());
    assert!(state.places.is_empty());
    assert!(!state.is_loading);

    advance(150).await;
    assert_eq!(keys(&rx.try_recv().expect("pending search ran"))[0], "Delft-id");
}

#[tokio::test]
async fn direct_search_bypasses_debounce() {
    let gateway = FakeGateway::default();
    let (pipeline, mut rx) = SearchPipeline::new(gateway, 10_000);

    pipeline.search("Utrecht").await;

    assert_eq!(rx.try_recv().expect("emission").len(), 3);
}
