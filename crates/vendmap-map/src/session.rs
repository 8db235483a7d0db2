//! One map session: the store, the synchronizer and the presentation
//! controller wired to a single [`MapView`].
//!
//! Everything runs on one logical thread. Data arrives through
//! [`MapSession::load_locations`] and [`MapSession::load_boundaries`] once the
//! startup fetches resolve; until then the session simply works on an empty
//! store.

use serde_json::Value;
use vendmap_core::MapConfig;

use crate::boundary::{BoundaryError, BoundaryLayer};
use crate::camera::CameraCommand;
use crate::geo::{Coordinate, Padding};
use crate::headless::HeadlessMap;
use crate::presentation::{PresentationController, PresentationMode, ThemeMode};
use crate::search::{search, SearchField, SearchQuery};
use crate::store::{IngestReport, LocationStore};
use crate::sync::ViewSync;
use crate::view::{Animation, MapEvent, MapView, MarkerHandle, MarkerKind};

/// Failure reported by the device geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
    #[error("location request timed out")]
    Timeout,
}

/// User-facing message the UI should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LocationUnavailable(String),
}

pub struct MapSession<V: MapView> {
    view: V,
    store: LocationStore,
    sync: ViewSync,
    presentation: PresentationController,
    boundaries: Option<BoundaryLayer>,
    user_marker: Option<MarkerHandle>,
    notice: Option<Notice>,
    locate_zoom: f64,
    boundary_padding: Padding,
}

impl<V: MapView> MapSession<V> {
    #[must_use]
    pub fn new(config: &MapConfig, view: V) -> Self {
        let presentation = PresentationController::new(config, view.current_zoom());
        Self {
            view,
            store: LocationStore::new(),
            sync: ViewSync::new(config),
            presentation,
            boundaries: None,
            user_marker: None,
            notice: None,
            locate_zoom: config.zoom.locate,
            boundary_padding: Padding(config.view.boundary_padding_px),
        }
    }

    /// Ingest fetched location records and show all of them.
    pub fn load_locations(&mut self, raw_records: &[Value]) -> IngestReport {
        let report = self.store.ingest(raw_records, &mut self.view);
        self.sync.show_all(&self.store, &mut self.view);
        tracing::info!(
            admitted = report.admitted,
            rejected = report.rejected,
            "location records loaded"
        );
        report
    }

    /// Add the boundary overlay and frame it.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] when `geojson` is not a feature collection;
    /// the session keeps running without a boundary layer.
    pub fn load_boundaries(&mut self, geojson: &Value) -> Result<usize, BoundaryError> {
        let layer = BoundaryLayer::from_geojson(geojson)?;

        self.view
            .add_boundary_layer(&layer, self.presentation.base_style());
        self.presentation.apply(&mut self.view);

        if let Some(bounds) = layer.bounds() {
            self.sync.camera_mut().issue(
                &mut self.view,
                CameraCommand::FitBounds {
                    bounds,
                    padding: self.boundary_padding,
                    animation: Animation::Instant,
                },
            );
        }

        let count = layer.len();
        tracing::info!(features = count, "boundary layer loaded");
        self.boundaries = Some(layer);
        Ok(count)
    }

    /// Filter by city or zip code. Returns the matched markers.
    pub fn search_by_location(&mut self, term: &str) -> Vec<MarkerHandle> {
        self.search(&SearchQuery::new(term, SearchField::Location))
    }

    /// Filter by location name. Returns the matched markers.
    pub fn search_by_name(&mut self, term: &str) -> Vec<MarkerHandle> {
        self.search(&SearchQuery::new(term, SearchField::Name))
    }

    /// Run `query` and apply the result. An empty query is a [`Self::reset`].
    pub fn search(&mut self, query: &SearchQuery) -> Vec<MarkerHandle> {
        if query.is_empty() {
            self.reset();
            return self.store.markers().collect();
        }

        let matches = search(&self.store, query);
        tracing::debug!(
            term = query.term(),
            field = ?query.field(),
            matches = matches.len(),
            "search applied"
        );
        self.sync.apply_matches(&self.store, &matches, &mut self.view);
        matches
    }

    /// Show every record, clear the no-match state and return to the overview.
    pub fn reset(&mut self) {
        self.notice = None;
        self.sync.reset(&self.store, &mut self.view);
    }

    /// Feed a notification from the view back into the session.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::ZoomEnd { zoom } => {
                self.presentation.on_zoom(zoom, &mut self.view);
            }
            MapEvent::BoundaryHoverStart { feature } | MapEvent::BoundaryHoverEnd { feature } => {
                let known = self
                    .boundaries
                    .as_ref()
                    .is_some_and(|layer| feature < layer.len());
                if known {
                    let entered = matches!(event, MapEvent::BoundaryHoverStart { .. });
                    self.presentation
                        .on_boundary_hover(feature, entered, &mut self.view);
                }
            }
        }
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.presentation.toggle_theme()
    }

    /// Handle the answer of a device location request.
    ///
    /// On success the previous position marker is replaced and the camera
    /// flies to the new one. On failure only a notice is set.
    pub fn show_current_location(&mut self, result: Result<Coordinate, GeolocationError>) {
        match result {
            Ok(coordinate) => {
                if let Some(previous) = self.user_marker.take() {
                    self.view.remove_marker(previous);
                }
                let marker = self
                    .view
                    .create_marker(coordinate, MarkerKind::UserPosition);
                self.view.attach(marker);
                self.view.open_popup(marker);
                self.user_marker = Some(marker);
                self.notice = None;

                let animation = self.sync.animation();
                self.sync.camera_mut().issue(
                    &mut self.view,
                    CameraCommand::PanTo {
                        coordinate,
                        zoom: self.locate_zoom,
                        animation,
                    },
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not determine current location");
                self.notice = Some(Notice::LocationUnavailable(err.to_string()));
            }
        }
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    #[must_use]
    pub fn visible(&self) -> &std::collections::BTreeSet<MarkerHandle> {
        self.sync.visible()
    }

    #[must_use]
    pub fn no_match_found(&self) -> bool {
        self.sync.no_match_found()
    }

    #[must_use]
    pub fn camera_target(&self) -> Option<&CameraCommand> {
        self.sync.camera().target()
    }

    #[must_use]
    pub fn mode(&self) -> PresentationMode {
        self.presentation.mode()
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.presentation.theme()
    }

    #[must_use]
    pub fn boundaries(&self) -> Option<&BoundaryLayer> {
        self.boundaries.as_ref()
    }

    #[must_use]
    pub fn user_marker(&self) -> Option<MarkerHandle> {
        self.user_marker
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

impl MapSession<HeadlessMap> {
    /// Deliver every queued view event. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let events = self.view.drain_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }
}
