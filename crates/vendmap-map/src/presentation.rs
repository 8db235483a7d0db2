//! Zoom-driven presentation mode and the user-toggled theme.
//!
//! The two axes never influence each other: zoom changes only move
//! [`PresentationMode`], the toggle only flips [`ThemeMode`].

use vendmap_core::{MapConfig, StyleSet};

use crate::view::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Filled boundary polygons, no street tiles.
    BoundaryFill,
    /// Street tiles with the boundary fill hidden.
    StreetDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Class for the page body, if any.
    #[must_use]
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            ThemeMode::Light => None,
            ThemeMode::Dark => Some("dark-mode"),
        }
    }

    /// Class for the map container.
    #[must_use]
    pub fn map_class(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Debug)]
pub struct PresentationController {
    mode: PresentationMode,
    theme: ThemeMode,
    street_threshold: f64,
    hover_limit: f64,
    tile_url: String,
    styles: StyleSet,
}

impl PresentationController {
    /// Start in the mode matching `initial_zoom`. No layer commands are sent
    /// until the first transition.
    #[must_use]
    pub fn new(config: &MapConfig, initial_zoom: f64) -> Self {
        let street_threshold = config.zoom.street_threshold;
        Self {
            mode: mode_for(initial_zoom, street_threshold),
            theme: ThemeMode::default(),
            street_threshold,
            hover_limit: config.zoom.hover_limit,
            tile_url: config.detail_tile_url.clone(),
            styles: config.styles.clone(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = ?self.theme, "theme toggled");
        self.theme
    }

    /// React to a settled zoom level. Returns the new mode when the
    /// threshold was crossed, `None` otherwise.
    pub fn on_zoom<V>(&mut self, zoom: f64, view: &mut V) -> Option<PresentationMode>
    where
        V: MapView + ?Sized,
    {
        let next = mode_for(zoom, self.street_threshold);
        if next == self.mode {
            return None;
        }

        self.mode = next;
        tracing::debug!(zoom, mode = ?next, "presentation mode changed");
        self.apply(view);
        Some(next)
    }

    /// Re-send the layer commands for the current mode, e.g. after the
    /// boundary layer arrives late.
    pub fn apply<V>(&self, view: &mut V)
    where
        V: MapView + ?Sized,
    {
        match self.mode {
            PresentationMode::StreetDetail => view.attach_detail_layer(&self.tile_url),
            PresentationMode::BoundaryFill => view.detach_detail_layer(),
        }
        view.set_boundary_style(self.resting_style());
    }

    /// Style a boundary feature on pointer enter/leave. Highlighting only
    /// happens below the hover zoom limit; leaving restores the style of the
    /// current mode.
    pub fn on_boundary_hover<V>(&self, feature: usize, entered: bool, view: &mut V) -> bool
    where
        V: MapView + ?Sized,
    {
        if view.current_zoom() >= self.hover_limit {
            return false;
        }
        let style = if entered {
            &self.styles.hover
        } else {
            self.resting_style()
        };
        view.set_feature_style(feature, style);
        true
    }

    /// Boundary style for the current mode when nothing is hovered.
    #[must_use]
    pub fn resting_style(&self) -> &vendmap_core::BoundaryStyle {
        match self.mode {
            PresentationMode::BoundaryFill => &self.styles.base,
            PresentationMode::StreetDetail => &self.styles.hidden,
        }
    }

    #[must_use]
    pub fn base_style(&self) -> &vendmap_core::BoundaryStyle {
        &self.styles.base
    }
}

fn mode_for(zoom: f64, threshold: f64) -> PresentationMode {
    if zoom >= threshold {
        PresentationMode::StreetDetail
    } else {
        PresentationMode::BoundaryFill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryLayer;
    use crate::headless::HeadlessMap;

    fn setup() -> (PresentationController, HeadlessMap) {
        let config = MapConfig::default();
        let mut view = HeadlessMap::new(&config);
        let layer = BoundaryLayer::default();
        view.add_boundary_layer(&layer, &config.styles.base);
        (PresentationController::new(&config, 7.0), view)
    }

    #[test]
    fn starts_in_boundary_fill_below_threshold() {
        let (ctl, _) = setup();
        assert_eq!(ctl.mode(), PresentationMode::BoundaryFill);
        let config = MapConfig::default();
        assert_eq!(
            PresentationController::new(&config, 11.0).mode(),
            PresentationMode::StreetDetail
        );
    }

    #[test]
    fn crossing_upward_enters_street_detail() {
        let (mut ctl, mut view) = setup();
        assert_eq!(
            ctl.on_zoom(10.0, &mut view),
            Some(PresentationMode::StreetDetail)
        );
        assert!(view.detail_layer().is_some());
        assert!(view.boundary_style().unwrap().fill_opacity.abs() < f64::EPSILON);
        assert_eq!(view.boundary_style().unwrap().stroke_color, "transparent");
    }

    #[test]
    fn crossing_downward_restores_boundary_fill() {
        let (mut ctl, mut view) = setup();
        ctl.on_zoom(12.0, &mut view);
        assert_eq!(
            ctl.on_zoom(9.0, &mut view),
            Some(PresentationMode::BoundaryFill)
        );
        assert!(view.detail_layer().is_none());
        assert!((view.boundary_style().unwrap().fill_opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zoom_within_same_mode_is_no_transition() {
        let (mut ctl, mut view) = setup();
        assert_eq!(ctl.on_zoom(8.0, &mut view), None);
        ctl.on_zoom(11.0, &mut view);
        assert_eq!(ctl.on_zoom(13.0, &mut view), None);
    }

    #[test]
    fn theme_toggle_flips_and_leaves_mode_alone() {
        let (mut ctl, _) = setup();
        assert_eq!(ctl.theme(), ThemeMode::Light);
        assert_eq!(ctl.toggle_theme(), ThemeMode::Dark);
        assert_eq!(ctl.mode(), PresentationMode::BoundaryFill);
        assert_eq!(ctl.toggle_theme(), ThemeMode::Light);
    }

    #[test]
    fn theme_class_projection() {
        assert_eq!(ThemeMode::Dark.body_class(), Some("dark-mode"));
        assert_eq!(ThemeMode::Dark.map_class(), "dark");
        assert_eq!(ThemeMode::Light.body_class(), None);
        assert_eq!(ThemeMode::Light.map_class(), "light");
    }

    #[test]
    fn hover_is_ignored_at_high_zoom() {
        let (ctl, mut view) = setup();
        view.zoom_to(12.0);
        assert!(!ctl.on_boundary_hover(0, true, &mut view));
    }

    #[test]
    fn hover_end_in_street_detail_restores_hidden_style() {
        let config = MapConfig::default();
        let mut view = HeadlessMap::new(&config);
        let doc = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Berlin"},
                "geometry": {"type": "Polygon", "coordinates": [[[13.1, 52.3], [13.8, 52.3], [13.8, 52.7], [13.1, 52.3]]]}
            }]
        });
        let layer = BoundaryLayer::from_geojson(&doc).unwrap();
        view.add_boundary_layer(&layer, &config.styles.base);
        let mut ctl = PresentationController::new(&config, 7.0);

        view.zoom_to(10.0);
        ctl.on_zoom(10.0, &mut view);
        assert_eq!(ctl.mode(), PresentationMode::StreetDetail);

        assert!(ctl.on_boundary_hover(0, true, &mut view));
        assert_eq!(view.feature_style(0).unwrap().fill_color, "white");
        assert!(ctl.on_boundary_hover(0, false, &mut view));
        assert!(view.feature_style(0).unwrap().fill_opacity.abs() < f64::EPSILON);
        assert_eq!(view.feature_style(0), Some(&config.styles.hidden));
    }
}
