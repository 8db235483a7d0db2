//! Shared configuration for the vendmap workspace.
//!
//! [`AppConfig`] comes from the process environment, [`MapConfig`] from the
//! per-deployment YAML file it points at.

pub mod app_config;
pub mod config;
pub mod map_config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use map_config::{
    load_map_config, BoundaryStyle, DataSource, DataSources, LatLng, MapConfig, MaxBounds,
    StyleSet, ViewConfig, ZoomConfig, MAX_ANIMATION_SECS,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read map config {path}: {source}")]
    MapFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse map config: {0}")]
    MapFileParse(#[source] serde_yaml::Error),

    #[error("invalid map config: {0}")]
    Validation(String),
}
