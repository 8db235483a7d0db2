//! Config resolution and session bootstrap shared by every subcommand.

use anyhow::Context;
use vendmap_core::{AppConfig, DataSource, MapConfig};
use vendmap_fetch::{load_datasets, DataClient};
use vendmap_map::{HeadlessMap, MapSession};

/// Load the map config file, falling back to built-in defaults when it does
/// not exist, then apply the env-level data source overrides.
pub(crate) fn resolve_map_config(config: &AppConfig) -> anyhow::Result<MapConfig> {
    let path = &config.map_config_path;
    let map_config = if path.exists() {
        vendmap_core::load_map_config(path)
            .with_context(|| format!("loading map config from {}", path.display()))?
    } else {
        tracing::info!(path = %path.display(), "map config not found; using defaults");
        MapConfig::default()
    };
    Ok(apply_source_overrides(config, map_config))
}

pub(crate) fn apply_source_overrides(config: &AppConfig, mut map_config: MapConfig) -> MapConfig {
    if let Some(locations) = &config.locations_source {
        map_config.data.locations = DataSource::from(locations.as_str());
    }
    if let Some(boundaries) = &config.boundaries_source {
        map_config.data.boundaries = DataSource::from(boundaries.as_str());
    }
    map_config
}

/// Fetch both datasets and hand them to a fresh headless session.
///
/// Fetch and parse failures are logged and leave the session with less data;
/// only an unusable HTTP client aborts startup.
pub(crate) async fn start_session(
    config: &AppConfig,
    map_config: &MapConfig,
) -> anyhow::Result<MapSession<HeadlessMap>> {
    tracing::info!(
        env = %config.env,
        locations = %map_config.data.locations,
        boundaries = %map_config.data.boundaries,
        "starting map session"
    );
    let client = DataClient::new(config.request_timeout_secs, &config.user_agent)
        .context("building HTTP client")?;
    let datasets = load_datasets(&client, &map_config.data).await;

    let mut session = MapSession::new(map_config, HeadlessMap::new(map_config));

    if let Some(doc) = &datasets.boundaries {
        if let Err(e) = session.load_boundaries(doc) {
            tracing::error!(source = %map_config.data.boundaries, error = %e, "boundary data unusable");
        }
    }
    session.load_locations(&datasets.locations);
    session.pump_events();

    Ok(session)
}
