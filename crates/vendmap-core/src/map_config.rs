//! Per-deployment map settings loaded from YAML.
//!
//! Every field has a default matching the German vending-machine map, so a
//! deployment file only needs to list what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub center: LatLng,
    pub initial_zoom: f64,
    /// Zoom used by the "reset map" action. Lower than `initial_zoom` so the
    /// whole country fits on narrow screens.
    pub reset_zoom: f64,
    pub max_bounds: MaxBounds,
    pub match_padding_px: u32,
    pub boundary_padding_px: u32,
    pub animation_secs: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng {
                lat: 51.1657,
                lng: 10.4515,
            },
            initial_zoom: 7.0,
            reset_zoom: 6.0,
            max_bounds: MaxBounds {
                south_west: LatLng { lat: 47.0, lng: 5.0 },
                north_east: LatLng {
                    lat: 55.5,
                    lng: 16.0,
                },
            },
            match_padding_px: 20,
            boundary_padding_px: 10,
            animation_secs: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    /// Street tiles replace the boundary fill at or above this zoom.
    pub street_threshold: f64,
    /// Boundary hover highlighting is active below this zoom.
    pub hover_limit: f64,
    /// Zoom used when a search yields exactly one location.
    pub detail: f64,
    /// Zoom used when centering on the user's own position.
    pub locate: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 3.0,
            max: 13.0,
            street_threshold: 10.0,
            hover_limit: 12.0,
            detail: 12.0,
            locate: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSet {
    pub base: BoundaryStyle,
    pub hover: BoundaryStyle,
    /// Applied while street tiles are shown.
    pub hidden: BoundaryStyle,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            base: BoundaryStyle {
                fill_color: "black".to_string(),
                stroke_color: "white".to_string(),
                weight: 0.5,
                fill_opacity: 1.0,
            },
            hover: BoundaryStyle {
                fill_color: "white".to_string(),
                stroke_color: "black".to_string(),
                weight: 0.5,
                fill_opacity: 1.0,
            },
            hidden: BoundaryStyle {
                fill_color: "black".to_string(),
                stroke_color: "transparent".to_string(),
                weight: 0.5,
                fill_opacity: 0.0,
            },
        }
    }
}

/// Where a dataset is read from: a local file or an HTTP(S) endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl From<String> for DataSource {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl From<&str> for DataSource {
    fn from(raw: &str) -> Self {
        DataSource::from(raw.to_string())
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.to_string()
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSources {
    pub locations: DataSource,
    pub boundaries: DataSource,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            locations: DataSource::from("./assets/locations.json"),
            boundaries: DataSource::from("./assets/states.geojson"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub zoom: ZoomConfig,
    pub styles: StyleSet,
    pub data: DataSources,
    pub detail_tile_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            zoom: ZoomConfig::default(),
            styles: StyleSet::default(),
            data: DataSources::default(),
            detail_tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
        }
    }
}

/// Longest camera animation a config may ask for.
pub const MAX_ANIMATION_SECS: f64 = 60.0;

impl MapConfig {
    /// Check the cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        let view = &self.view;
        let sw = view.max_bounds.south_west;
        let ne = view.max_bounds.north_east;
        let center = view.center;

        let numbers = [
            zoom.min,
            zoom.max,
            zoom.street_threshold,
            zoom.hover_limit,
            zoom.detail,
            zoom.locate,
            view.initial_zoom,
            view.reset_zoom,
            view.animation_secs,
            center.lat,
            center.lng,
            sw.lat,
            sw.lng,
            ne.lat,
            ne.lng,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err(ConfigError::Validation(
                "zoom levels, coordinates and animation duration must be finite".to_string(),
            ));
        }

        if zoom.min > zoom.max {
            return Err(ConfigError::Validation(format!(
                "zoom.min ({}) is greater than zoom.max ({})",
                zoom.min, zoom.max
            )));
        }

        if zoom.street_threshold < zoom.min || zoom.street_threshold > zoom.max {
            return Err(ConfigError::Validation(format!(
                "zoom.street_threshold ({}) must lie within [{}, {}]",
                zoom.street_threshold, zoom.min, zoom.max
            )));
        }

        if sw.lat >= ne.lat || sw.lng >= ne.lng {
            return Err(ConfigError::Validation(
                "view.max_bounds south_west must be below and left of north_east".to_string(),
            ));
        }

        if center.lat < sw.lat || center.lat > ne.lat || center.lng < sw.lng || center.lng > ne.lng
        {
            return Err(ConfigError::Validation(
                "view.center lies outside view.max_bounds".to_string(),
            ));
        }

        if view.animation_secs <= 0.0 || view.animation_secs > MAX_ANIMATION_SECS {
            return Err(ConfigError::Validation(format!(
                "view.animation_secs must lie within (0, {MAX_ANIMATION_SECS}]"
            )));
        }

        Ok(())
    }
}

/// Load and validate a map configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_map_config(path: &Path) -> Result<MapConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MapFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: MapConfig = serde_yaml::from_str(&content).map_err(ConfigError::MapFileParse)?;
    config.validate()?;

    Ok(config)
}
