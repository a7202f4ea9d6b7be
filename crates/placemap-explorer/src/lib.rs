pub mod app;
pub mod debounce;
pub mod map;
pub mod search;
pub mod storage;
pub mod surface;

pub use app::App;
pub use debounce::Debouncer;
pub use map::{
    default_controls, popup_html, LngLat, MapControl, MapEngine, MapOptions, MapSurface,
    MarkerSpec, PopupSpec, ReconcileReport,
};
pub use search::{SearchPipeline, SearchState};
pub use storage::StorageClient;
pub use surface::{MarkerHandle, PopupHandle, TracingSurface};
