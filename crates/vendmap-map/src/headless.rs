//! In-memory [`MapView`] with no rendering.
//!
//! Used by the CLI and by tests. It keeps the state a real widget would
//! (attached markers, camera, layers, styles) and queues the events a real
//! widget would emit, so a driver loop can feed them back into the session.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::f64::consts::PI;

use vendmap_core::{BoundaryStyle, MapConfig};

use crate::boundary::BoundaryLayer;
use crate::geo::{Bounds, Coordinate, Padding};
use crate::view::{Animation, MapEvent, MapView, MarkerHandle, MarkerKind};

const TILE_SIZE_PX: f64 = 256.0;
const DEFAULT_VIEWPORT_PX: (f64, f64) = (1024.0, 768.0);

#[derive(Debug)]
pub struct HeadlessMap {
    next_marker: u64,
    markers: HashMap<MarkerHandle, (Coordinate, MarkerKind)>,
    attached: BTreeSet<MarkerHandle>,
    popup: Option<MarkerHandle>,
    center: Coordinate,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    max_bounds: Bounds,
    viewport_px: (f64, f64),
    last_animation: Option<Animation>,
    boundary_features: Option<usize>,
    boundary_style: Option<BoundaryStyle>,
    feature_styles: HashMap<usize, BoundaryStyle>,
    detail_layer: Option<String>,
    events: VecDeque<MapEvent>,
}

impl HeadlessMap {
    /// Start at the configured initial view, like a freshly mounted widget.
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        let (min_zoom, max_zoom) = if config.zoom.min <= config.zoom.max {
            (config.zoom.min, config.zoom.max)
        } else {
            tracing::warn!(
                min = config.zoom.min,
                max = config.zoom.max,
                "unusable zoom range; using 0..=22"
            );
            (0.0, 22.0)
        };
        Self {
            next_marker: 1,
            markers: HashMap::new(),
            attached: BTreeSet::new(),
            popup: None,
            center: config.view.center.into(),
            zoom: config.view.initial_zoom,
            min_zoom,
            max_zoom,
            max_bounds: usable_bounds(config.view.max_bounds.into()),
            viewport_px: DEFAULT_VIEWPORT_PX,
            last_animation: None,
            boundary_features: None,
            boundary_style: None,
            feature_styles: HashMap::new(),
            detail_layer: None,
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_viewport(mut self, width_px: f64, height_px: f64) -> Self {
        self.viewport_px = (width_px.max(1.0), height_px.max(1.0));
        self
    }

    /// Simulate a user zoom gesture.
    pub fn zoom_to(&mut self, zoom: f64) {
        self.move_camera(self.center, zoom);
    }

    /// Simulate the pointer entering or leaving a boundary feature.
    pub fn hover_feature(&mut self, feature: usize, entered: bool) {
        self.events.push_back(if entered {
            MapEvent::BoundaryHoverStart { feature }
        } else {
            MapEvent::BoundaryHoverEnd { feature }
        });
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Number of live markers, attached or not.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn attached(&self) -> &BTreeSet<MarkerHandle> {
        &self.attached
    }

    #[must_use]
    pub fn popup(&self) -> Option<MarkerHandle> {
        self.popup
    }

    #[must_use]
    pub fn marker(&self, handle: MarkerHandle) -> Option<(Coordinate, MarkerKind)> {
        self.markers.get(&handle).copied()
    }

    #[must_use]
    pub fn last_animation(&self) -> Option<Animation> {
        self.last_animation
    }

    #[must_use]
    pub fn boundary_feature_count(&self) -> Option<usize> {
        self.boundary_features
    }

    #[must_use]
    pub fn boundary_style(&self) -> Option<&BoundaryStyle> {
        self.boundary_style.as_ref()
    }

    #[must_use]
    pub fn feature_style(&self, feature: usize) -> Option<&BoundaryStyle> {
        self.feature_styles.get(&feature)
    }

    #[must_use]
    pub fn detail_layer(&self) -> Option<&str> {
        self.detail_layer.as_deref()
    }

    fn move_camera(&mut self, center: Coordinate, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.center = Coordinate {
            lat: center.lat.clamp(self.max_bounds.south, self.max_bounds.north),
            lon: center.lon.clamp(self.max_bounds.west, self.max_bounds.east),
        };
        self.events.push_back(MapEvent::ZoomEnd { zoom: self.zoom });
    }

    /// Largest whole zoom at which `bounds` fits the viewport minus padding,
    /// using Web Mercator tile math.
    fn zoom_for_bounds(&self, bounds: &Bounds, padding: Padding) -> f64 {
        let pad = 2.0 * f64::from(padding.0);
        let width = (self.viewport_px.0 - pad).max(1.0);
        let height = (self.viewport_px.1 - pad).max(1.0);

        let lon_fraction = bounds.lon_span() / 360.0;
        let lat_fraction = (mercator_y(bounds.north) - mercator_y(bounds.south)) / (2.0 * PI);

        let fit = |pixels: f64, fraction: f64| {
            if fraction <= f64::EPSILON {
                f64::INFINITY
            } else {
                (pixels / (TILE_SIZE_PX * fraction)).log2()
            }
        };

        fit(width, lon_fraction).min(fit(height, lat_fraction)).floor()
    }
}

/// `bounds` if it is finite and not inverted, the whole Mercator world
/// otherwise, so camera clamping never sees NaN or min > max.
fn usable_bounds(bounds: Bounds) -> Bounds {
    let finite = [bounds.south, bounds.west, bounds.north, bounds.east]
        .iter()
        .all(|n| n.is_finite());
    if finite && bounds.south <= bounds.north && bounds.west <= bounds.east {
        bounds
    } else {
        tracing::warn!(?bounds, "unusable max bounds; allowing the whole world");
        Bounds {
            south: -85.051_1,
            west: -180.0,
            north: 85.051_1,
            east: 180.0,
        }
    }
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.051_1, 85.051_1).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

impl MapView for HeadlessMap {
    fn create_marker(&mut self, coordinate: Coordinate, kind: MarkerKind) -> MarkerHandle {
        let handle = MarkerHandle(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(handle, (coordinate, kind));
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.detach(handle);
        self.markers.remove(&handle);
    }

    fn attach(&mut self, handle: MarkerHandle) {
        if self.markers.contains_key(&handle) {
            self.attached.insert(handle);
        }
    }

    fn detach(&mut self, handle: MarkerHandle) {
        self.attached.remove(&handle);
        if self.popup == Some(handle) {
            self.popup = None;
        }
    }

    fn is_attached(&self, handle: MarkerHandle) -> bool {
        self.attached.contains(&handle)
    }

    fn open_popup(&mut self, handle: MarkerHandle) {
        if self.attached.contains(&handle) {
            self.popup = Some(handle);
        }
    }

    fn pan_to(&mut self, coordinate: Coordinate, zoom: f64, animation: Animation) {
        self.last_animation = Some(animation);
        self.move_camera(coordinate, zoom);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: Padding, animation: Animation) {
        self.last_animation = Some(animation);
        let zoom = self.zoom_for_bounds(&bounds, padding);
        self.move_camera(bounds.center(), zoom);
    }

    fn current_zoom(&self) -> f64 {
        self.zoom
    }

    fn add_boundary_layer(&mut self, layer: &BoundaryLayer, style: &BoundaryStyle) {
        self.boundary_features = Some(layer.len());
        self.boundary_style = Some(style.clone());
        self.feature_styles.clear();
    }

    fn set_boundary_style(&mut self, style: &BoundaryStyle) {
        if self.boundary_features.is_some() {
            self.boundary_style = Some(style.clone());
            self.feature_styles.clear();
        }
    }

    fn set_feature_style(&mut self, feature: usize, style: &BoundaryStyle) {
        if self.boundary_features.is_some_and(|n| feature < n) {
            self.feature_styles.insert(feature, style.clone());
        }
    }

    fn attach_detail_layer(&mut self, url_template: &str) {
        self.detail_layer = Some(url_template.to_string());
    }

    fn detach_detail_layer(&mut self) {
        self.detail_layer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> HeadlessMap {
        HeadlessMap::new(&MapConfig::default())
    }

    #[test]
    fn starts_at_initial_view() {
        let m = map();
        assert!((m.current_zoom() - 7.0).abs() < f64::EPSILON);
        assert_eq!(m.center(), Coordinate { lat: 51.1657, lon: 10.4515 });
    }

    #[test]
    fn zoom_is_clamped_and_reported() {
        let mut m = map();
        m.zoom_to(20.0);
        assert!((m.current_zoom() - 13.0).abs() < f64::EPSILON);
        assert_eq!(m.drain_events(), vec![MapEvent::ZoomEnd { zoom: 13.0 }]);
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn pan_clamps_to_max_bounds() {
        let mut m = map();
        m.pan_to(Coordinate { lat: 60.0, lon: 2.0 }, 8.0, Animation::Instant);
        assert_eq!(m.center(), Coordinate { lat: 55.5, lon: 5.0 });
    }

    #[test]
    fn attach_detach_are_idempotent() {
        let mut m = map();
        let h = m.create_marker(Coordinate { lat: 50.0, lon: 8.0 }, MarkerKind::Location);
        m.attach(h);
        m.attach(h);
        assert_eq!(m.attached().len(), 1);
        m.detach(h);
        m.detach(h);
        assert!(m.attached().is_empty());
    }

    #[test]
    fn unknown_marker_is_never_attached() {
        let mut m = map();
        m.attach(MarkerHandle(42));
        assert!(!m.is_attached(MarkerHandle(42)));
    }

    #[test]
    fn fit_bounds_zooms_in_for_small_regions() {
        let mut m = map();
        let city = Bounds::covering([
            Coordinate { lat: 52.50, lon: 13.35 },
            Coordinate { lat: 52.55, lon: 13.45 },
        ])
        .unwrap();
        m.fit_bounds(city, Padding(20), Animation::Instant);
        let city_zoom = m.current_zoom();

        let country = Bounds::covering([
            Coordinate { lat: 47.5, lon: 6.0 },
            Coordinate { lat: 54.8, lon: 15.0 },
        ])
        .unwrap();
        m.fit_bounds(country, Padding(20), Animation::Instant);
        assert!(city_zoom > m.current_zoom());
    }

    #[test]
    fn feature_style_requires_boundary_layer() {
        let mut m = map();
        let style = vendmap_core::StyleSet::default().hover;
        m.set_feature_style(0, &style);
        assert!(m.feature_style(0).is_none());
    }

    #[test]
    fn unusable_max_bounds_do_not_break_camera_moves() {
        let mut config = MapConfig::default();
        config.view.max_bounds.south_west.lat = f64::NAN;
        let mut m = HeadlessMap::new(&config);
        m.pan_to(Coordinate { lat: 52.5, lon: 13.4 }, 9.0, Animation::Instant);
        assert_eq!(m.center(), Coordinate { lat: 52.5, lon: 13.4 });

        config.zoom.min = 15.0;
        let mut m = HeadlessMap::new(&config);
        m.zoom_to(9.0);
        assert!((m.current_zoom() - 9.0).abs() < f64::EPSILON);
    }
}
