//! Applies search results to the map: marker visibility, the no-match flag
//! and the camera.

use std::collections::BTreeSet;
use std::time::Duration;

use vendmap_core::MapConfig;

use crate::camera::{CameraCommand, CameraTracker};
use crate::geo::{Bounds, Coordinate, Padding};
use crate::store::LocationStore;
use crate::view::{Animation, MapView, MarkerHandle};

#[derive(Debug)]
pub struct ViewSync {
    visible: BTreeSet<MarkerHandle>,
    no_match_found: bool,
    camera: CameraTracker,
    detail_zoom: f64,
    match_padding: Padding,
    animation: Animation,
    overview_center: Coordinate,
    overview_zoom: f64,
}

impl ViewSync {
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        Self {
            visible: BTreeSet::new(),
            no_match_found: false,
            camera: CameraTracker::new(),
            detail_zoom: config.zoom.detail,
            match_padding: Padding(config.view.match_padding_px),
            animation: animation_for(config.view.animation_secs),
            overview_center: config.view.center.into(),
            overview_zoom: config.view.reset_zoom,
        }
    }

    /// Make exactly `matches` visible and frame them.
    ///
    /// An empty slice hides everything and raises the no-match flag. Handles
    /// the store does not know are ignored.
    pub fn apply_matches<V>(&mut self, store: &LocationStore, matches: &[MarkerHandle], view: &mut V)
    where
        V: MapView + ?Sized,
    {
        let target: BTreeSet<MarkerHandle> = matches
            .iter()
            .copied()
            .filter(|m| {
                let known = store.contains(*m);
                if !known {
                    tracing::debug!(marker = m.id(), "ignoring unknown marker in match set");
                }
                known
            })
            .collect();

        self.set_visible(store, &target, view);
        self.no_match_found = target.is_empty();

        let coordinates: Vec<(MarkerHandle, Coordinate)> = target
            .iter()
            .filter_map(|m| store.get(*m).map(|r| (*m, r.coordinate)))
            .collect();

        match coordinates.as_slice() {
            [] => {
                tracing::debug!("search produced no matches");
            }
            [(marker, coordinate)] => {
                self.camera.issue(
                    view,
                    CameraCommand::PanTo {
                        coordinate: *coordinate,
                        zoom: self.detail_zoom,
                        animation: self.animation,
                    },
                );
                view.open_popup(*marker);
            }
            many => {
                if let Some(bounds) = Bounds::covering(many.iter().map(|(_, c)| *c)) {
                    self.camera.issue(
                        view,
                        CameraCommand::FitBounds {
                            bounds,
                            padding: self.match_padding,
                            animation: self.animation,
                        },
                    );
                }
            }
        }
    }

    /// Show every record, clear the no-match flag and return the camera to
    /// the overview.
    pub fn reset<V>(&mut self, store: &LocationStore, view: &mut V)
    where
        V: MapView + ?Sized,
    {
        self.show_all(store, view);
        self.camera.issue(
            view,
            CameraCommand::PanTo {
                coordinate: self.overview_center,
                zoom: self.overview_zoom,
                animation: Animation::Instant,
            },
        );
    }

    /// Show every record without moving the camera. Used after ingestion.
    pub fn show_all<V>(&mut self, store: &LocationStore, view: &mut V)
    where
        V: MapView + ?Sized,
    {
        let all: BTreeSet<MarkerHandle> = store.markers().collect();
        self.set_visible(store, &all, view);
        self.no_match_found = false;
    }

    fn set_visible<V>(&mut self, store: &LocationStore, target: &BTreeSet<MarkerHandle>, view: &mut V)
    where
        V: MapView + ?Sized,
    {
        for marker in store.markers() {
            let attached = view.is_attached(marker);
            if target.contains(&marker) {
                if !attached {
                    view.attach(marker);
                }
            } else if attached {
                view.detach(marker);
            }
        }
        self.visible.clone_from(target);
    }

    /// Markers currently shown on the map.
    #[must_use]
    pub fn visible(&self) -> &BTreeSet<MarkerHandle> {
        &self.visible
    }

    #[must_use]
    pub fn no_match_found(&self) -> bool {
        self.no_match_found
    }

    #[must_use]
    pub fn camera(&self) -> &CameraTracker {
        &self.camera
    }

    pub(crate) fn camera_mut(&mut self) -> &mut CameraTracker {
        &mut self.camera
    }

    pub(crate) fn animation(&self) -> Animation {
        self.animation
    }
}

/// Animated move of `secs`, or an instant one when `secs` is not a usable
/// duration.
fn animation_for(secs: f64) -> Animation {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Animation::Animated { duration },
        _ => {
            tracing::warn!(secs, "unusable animation duration; moving instantly");
            Animation::Instant
        }
    }
}
