//! The port through which the engine drives a concrete map widget.
//!
//! Implementations own rendering; the engine only issues commands and reads
//! back the little state it needs (attachment, current zoom).

use std::time::Duration;

use vendmap_core::BoundaryStyle;

use crate::boundary::BoundaryLayer;
use crate::geo::{Bounds, Coordinate, Padding};

/// Opaque reference to one marker created by a [`MapView`].
///
/// Only views mint handles; everything else receives them from
/// [`MapView::create_marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub(crate) u64);

impl MarkerHandle {
    /// For [`MapView`] implementations outside this crate.
    #[must_use]
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What a marker stands for, so the view can pick its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Location,
    UserPosition,
}

/// How a camera move is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Instant,
    Animated { duration: Duration },
}

/// Notifications the view reports back to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// A zoom gesture or camera move settled at `zoom`.
    ZoomEnd { zoom: f64 },
    /// The pointer entered the boundary feature at `feature` (index into the layer).
    BoundaryHoverStart { feature: usize },
    BoundaryHoverEnd { feature: usize },
}

/// Commands the engine needs from a map widget.
///
/// `attach` and `detach` must tolerate repeats; callers still check
/// [`MapView::is_attached`] first.
pub trait MapView {
    fn create_marker(&mut self, coordinate: Coordinate, kind: MarkerKind) -> MarkerHandle;
    /// Detach and forget a marker; its handle is dead afterwards.
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn attach(&mut self, handle: MarkerHandle);
    fn detach(&mut self, handle: MarkerHandle);
    fn is_attached(&self, handle: MarkerHandle) -> bool;
    fn open_popup(&mut self, handle: MarkerHandle);

    fn pan_to(&mut self, coordinate: Coordinate, zoom: f64, animation: Animation);
    fn fit_bounds(&mut self, bounds: Bounds, padding: Padding, animation: Animation);
    fn current_zoom(&self) -> f64;

    fn add_boundary_layer(&mut self, layer: &BoundaryLayer, style: &BoundaryStyle);
    fn set_boundary_style(&mut self, style: &BoundaryStyle);
    fn set_feature_style(&mut self, feature: usize, style: &BoundaryStyle);

    fn attach_detail_layer(&mut self, url_template: &str);
    fn detach_detail_layer(&mut self);
}
