//! A [`MapSurface`] with no renderer: every call becomes a `tracing` event.
//!
//! Used by the terminal explorer, where there is no map to draw on but the
//! marker churn is still worth seeing.

use std::collections::BTreeSet;

use crate::map::{LngLat, MapControl, MapOptions, MapSurface, MarkerSpec, PopupSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopupHandle(pub u64);

#[derive(Debug, Default)]
pub struct TracingSurface {
    next_handle: u64,
    live_markers: BTreeSet<MarkerHandle>,
    open_popups: BTreeSet<PopupHandle>,
    destroyed: bool,
}

impl TracingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn live_markers(&self) -> usize {
        self.live_markers.len()
    }

    #[must_use]
    pub fn open_popups(&self) -> usize {
        self.open_popups.len()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapSurface for TracingSurface {
    type Marker = MarkerHandle;
    type Popup = PopupHandle;

    fn configure(&mut self, options: &MapOptions) {
        tracing::info!(
            style = %options.style,
            center_lng = options.center.lng,
            center_lat = options.center.lat,
            zoom = options.zoom,
            projection = ?options.projection,
            has_token = options.access_token.is_some(),
            "map configured"
        );
    }

    fn add_control(&mut self, control: &MapControl) {
        tracing::debug!(?control, "control added");
    }

    fn create_marker(&mut self, spec: &MarkerSpec) -> MarkerHandle {
        let handle = MarkerHandle(self.next());
        self.live_markers.insert(handle);
        tracing::info!(
            marker = handle.0,
            lng = spec.position.lng,
            lat = spec.position.lat,
            color = spec.color,
            "marker added"
        );
        handle
    }

    fn create_popup(&mut self, spec: &PopupSpec) -> PopupHandle {
        let handle = PopupHandle(self.next());
        tracing::debug!(popup = handle.0, html = %spec.html, "popup created");
        handle
    }

    fn attach_popup(&mut self, popup: &PopupHandle, at: LngLat) {
        self.open_popups.insert(*popup);
        tracing::info!(popup = popup.0, lng = at.lng, lat = at.lat, "popup shown");
    }

    fn detach_popup(&mut self, popup: &PopupHandle) {
        self.open_popups.remove(popup);
        tracing::debug!(popup = popup.0, "popup hidden");
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.live_markers.remove(&marker);
        tracing::info!(marker = marker.0, "marker removed");
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        tracing::info!(
            leaked_markers = self.live_markers.len(),
            "map destroyed"
        );
    }
}
