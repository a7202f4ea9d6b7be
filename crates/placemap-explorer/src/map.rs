//! Keeps a map's marker and popup set in step with a list of places.
//!
//! The rendering library sits behind [`MapSurface`]. [`MapEngine`] owns the
//! handle table and diffs it against every new list by `place_id`, so
//! unchanged places keep their handles and only the difference touches the
//! surface.

use std::collections::{BTreeMap, HashSet};

use placemap_core::{category_color, Place};

pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/streets-v12";
pub const DEFAULT_CENTER: LngLat = LngLat {
    lng: 4.892_453_4,
    lat: 52.373_079_6,
};
pub const DEFAULT_ZOOM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl From<&Place> for LngLat {
    fn from(place: &Place) -> Self {
        Self {
            lng: place.points.coordinates.lon,
            lat: place.points.coordinates.lat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Mercator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Without a token the surface may render nothing, but nothing fails.
    pub access_token: Option<String>,
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
    pub projection: Projection,
    pub attribution_control: bool,
}

impl MapOptions {
    #[must_use]
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token,
            style: DEFAULT_STYLE.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            projection: Projection::Mercator,
            attribution_control: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleUnit {
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapControl {
    Geolocate {
        high_accuracy: bool,
        track_user_location: bool,
        show_accuracy_circle: bool,
        show_user_heading: bool,
    },
    Navigation {
        show_compass: bool,
        show_zoom: bool,
        visualize_pitch: bool,
    },
    Scale {
        unit: ScaleUnit,
        max_width: u32,
    },
}

/// Controls added on mount, in order.
#[must_use]
pub fn default_controls() -> [MapControl; 3] {
    [
        MapControl::Geolocate {
            high_accuracy: true,
            track_user_location: true,
            show_accuracy_circle: true,
            show_user_heading: true,
        },
        MapControl::Navigation {
            show_compass: true,
            show_zoom: true,
            visualize_pitch: true,
        },
        MapControl::Scale {
            unit: ScaleUnit::Metric,
            max_width: 80,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Map,
    Viewport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LngLat,
    pub color: &'static str,
    pub rotation: f64,
    pub anchor: Anchor,
    pub pitch_alignment: Alignment,
    pub rotation_alignment: Alignment,
    pub class_name: &'static str,
}

impl MarkerSpec {
    #[must_use]
    pub fn for_place(place: &Place) -> Self {
        Self {
            position: LngLat::from(place),
            color: category_color(&place.category),
            rotation: 45.0,
            anchor: Anchor::Center,
            pitch_alignment: Alignment::Map,
            rotation_alignment: Alignment::Map,
            class_name: "marker-enlarged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSpec {
    pub html: String,
    pub close_button: bool,
    pub close_on_click: bool,
    pub class_name: &'static str,
}

impl PopupSpec {
    #[must_use]
    pub fn for_place(place: &Place) -> Self {
        Self {
            html: popup_html(place),
            close_button: false,
            close_on_click: false,
            class_name: "mapboxgl-popup",
        }
    }
}

/// Popup body: name, location, category segment, then `lat, lon`.
#[must_use]
pub fn popup_html(place: &Place) -> String {
    let coords = place.points.coordinates;
    format!(
        "<h3>{}</h3><p>{}</p><p>{}</p><p>{}, {}</p>",
        escape_html(place.name.as_deref().unwrap_or_default()),
        escape_html(place.location_name.as_deref().unwrap_or_default()),
        escape_html(place.category.display_segment().unwrap_or_default()),
        coords.lat,
        coords.lon,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// The rendering backend: one map instance plus its markers and popups.
pub trait MapSurface {
    type Marker;
    type Popup;

    fn configure(&mut self, options: &MapOptions);

    fn add_control(&mut self, control: &MapControl);

    /// Creates a marker and places it on the map.
    fn create_marker(&mut self, spec: &MarkerSpec) -> Self::Marker;

    /// Creates a popup that is not yet shown.
    fn create_popup(&mut self, spec: &PopupSpec) -> Self::Popup;

    fn attach_popup(&mut self, popup: &Self::Popup, at: LngLat);

    fn detach_popup(&mut self, popup: &Self::Popup);

    fn remove_marker(&mut self, marker: Self::Marker);

    fn destroy(&mut self);
}

/// What one [`MapEngine::reconcile`] pass did. A place whose content
/// changed under the same key counts as one removal plus one creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub removed: usize,
    pub retained: usize,
}

struct Entry<S: MapSurface> {
    place: Place,
    marker: S::Marker,
    popup: S::Popup,
    popup_attached: bool,
}

/// Content equality for reconciliation. Coordinates compare by bit
/// pattern so a NaN coordinate still matches its own entry.
fn same_content(a: &Place, b: &Place) -> bool {
    let (ca, cb) = (&a.points.coordinates, &b.points.coordinates);
    a.name == b.name
        && a.location_name == b.location_name
        && a.category == b.category
        && a.points.kind == b.points.kind
        && a.points.place_id == b.points.place_id
        && ca.lat.to_bits() == cb.lat.to_bits()
        && ca.lon.to_bits() == cb.lon.to_bits()
}

pub struct MapEngine<S: MapSurface> {
    surface: S,
    entries: BTreeMap<String, Entry<S>>,
}

impl<S: MapSurface> MapEngine<S> {
    /// Configures `surface` and adds the standard controls.
    pub fn mount(mut surface: S, options: &MapOptions) -> Self {
        if options.access_token.is_none() {
            tracing::warn!("MAPBOX_ACCESS_TOKEN is not set; map tiles will not load");
        }
        surface.configure(options);
        for control in &default_controls() {
            surface.add_control(control);
        }
        Self {
            surface,
            entries: BTreeMap::new(),
        }
    }

    /// Bring the marker set in line with `places`.
    ///
    /// Keys are `place_id`s; within one list the first occurrence of a key
    /// wins.
    pub fn reconcile(&mut self, places: &[Place]) -> ReconcileReport {
        let mut seen = HashSet::new();
        let mut desired: Vec<&Place> = Vec::with_capacity(places.len());
        for place in places {
            if seen.insert(place.key()) {
                desired.push(place);
            }
        }

        let mut report = ReconcileReport::default();

        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                !desired
                    .iter()
                    .any(|place| place.key() == key.as_str() && same_content(place, &entry.place))
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            if let Some(entry) = self.entries.remove(&key) {
                self.teardown(entry);
                report.removed += 1;
            }
        }

        for place in desired {
            if self.entries.contains_key(place.key()) {
                report.retained += 1;
                continue;
            }
            let marker = self.surface.create_marker(&MarkerSpec::for_place(place));
            let popup = self.surface.create_popup(&PopupSpec::for_place(place));
            self.entries.insert(
                place.key().to_string(),
                Entry {
                    place: place.clone(),
                    marker,
                    popup,
                    popup_attached: false,
                },
            );
            report.created += 1;
        }

        tracing::debug!(
            created = report.created,
            removed = report.removed,
            retained = report.retained,
            "map reconciled"
        );
        report
    }

    /// Show the popup for `place_id`. Unknown keys are ignored.
    pub fn pointer_enter(&mut self, place_id: &str) {
        let Some(entry) = self.entries.get_mut(place_id) else {
            return;
        };
        if !entry.popup_attached {
            self.surface
                .attach_popup(&entry.popup, LngLat::from(&entry.place));
            entry.popup_attached = true;
        }
    }

    pub fn pointer_leave(&mut self, place_id: &str) {
        let Some(entry) = self.entries.get_mut(place_id) else {
            return;
        };
        if entry.popup_attached {
            self.surface.detach_popup(&entry.popup);
            entry.popup_attached = false;
        }
    }

    /// Remove every marker and popup, destroy the map, and hand the surface
    /// back.
    pub fn unmount(mut self) -> S {
        let entries = std::mem::take(&mut self.entries);
        for entry in entries.into_values() {
            self.teardown(entry);
        }
        self.surface.destroy();
        self.surface
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, place_id: &str) -> bool {
        self.entries.contains_key(place_id)
    }

    #[must_use]
    pub fn marker(&self, place_id: &str) -> Option<&S::Marker> {
        self.entries.get(place_id).map(|entry| &entry.marker)
    }

    #[must_use]
    pub fn is_popup_open(&self, place_id: &str) -> bool {
        self.entries
            .get(place_id)
            .is_some_and(|entry| entry.popup_attached)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn teardown(&mut self, entry: Entry<S>) {
        if entry.popup_attached {
            self.surface.detach_popup(&entry.popup);
        }
        self.surface.remove_marker(entry.marker);
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
