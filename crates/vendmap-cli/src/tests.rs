use std::path::PathBuf;

use serde_json::json;
use vendmap_core::{AppConfig, DataSource, Environment, MapConfig};
use vendmap_map::PresentationMode;

use super::*;

fn app_config(locations: Option<&str>, boundaries: Option<&str>) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        map_config_path: PathBuf::from("/nonexistent/vendmap/map.yaml"),
        locations_source: locations.map(str::to_string),
        boundaries_source: boundaries.map(str::to_string),
        request_timeout_secs: 5,
        user_agent: "vendmap-test/0.1".to_string(),
    }
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vendmap-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vendmap"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_summary_command() {
    let cli = Cli::try_parse_from(["vendmap", "summary"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Summary)));
}

#[test]
fn parses_directory_command() {
    let cli = Cli::try_parse_from(["vendmap", "directory"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Directory)));
}

#[test]
fn search_defaults_to_location_field() {
    let cli = Cli::try_parse_from(["vendmap", "search", "berlin"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Search { by, term }) => {
            assert_eq!(by, SearchBy::Location);
            assert_eq!(term, "berlin");
        }
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn search_by_name() {
    let cli = Cli::try_parse_from(["vendmap", "search", "--by", "name", "Shop"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            by: SearchBy::Name,
            ..
        })
    ));
}

#[test]
fn search_without_term_is_empty() {
    let cli = Cli::try_parse_from(["vendmap", "search"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Search { term, .. }) => assert!(term.is_empty()),
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn search_rejects_unknown_field() {
    let result = Cli::try_parse_from(["vendmap", "search", "--by", "phone", "123"]);
    assert!(result.is_err());
}

#[test]
fn locate_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from(["vendmap", "locate", "-33.86", "151.2"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Locate { lat, lon }) => {
            assert!((lat - -33.86).abs() < f64::EPSILON);
            assert!((lon - 151.2).abs() < f64::EPSILON);
        }
        other => panic!("expected locate command, got {other:?}"),
    }
}

#[test]
fn locate_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["vendmap", "locate", "52.5"]).is_err());
}

#[test]
fn search_by_maps_to_search_field() {
    assert_eq!(SearchField::from(SearchBy::Location), SearchField::Location);
    assert_eq!(SearchField::from(SearchBy::Name), SearchField::Name);
}

#[test]
fn missing_map_config_falls_back_to_defaults() {
    let map_config =
        startup::resolve_map_config(&app_config(None, None)).expect("defaults should resolve");
    assert_eq!(map_config.data, MapConfig::default().data);
}

#[test]
fn source_overrides_replace_configured_sources() {
    let config = app_config(
        Some("https://example.com/api/locations.php"),
        Some("/srv/data/states.geojson"),
    );
    let map_config = startup::apply_source_overrides(&config, MapConfig::default());

    assert_eq!(
        map_config.data.locations,
        DataSource::Url("https://example.com/api/locations.php".to_string())
    );
    assert_eq!(
        map_config.data.boundaries,
        DataSource::File(PathBuf::from("/srv/data/states.geojson"))
    );
}

#[tokio::test]
async fn start_session_loads_file_sources() {
    let locations = temp_file(
        "locations.json",
        &json!([
            {"name": "Shop1", "city": "Berlin", "zipcode": "10115", "lat": "52.52", "lon": "13.40"},
            {"name": "Shop2", "city": "Munich", "zipcode": "80331", "lat": 48.13, "lon": 11.58},
            {"name": "Broken", "city": "Nowhere", "lat": "", "lon": "13.0"}
        ])
        .to_string(),
    );
    let boundaries = temp_file(
        "states.geojson",
        &json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Berlin"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[13.0, 52.3], [13.8, 52.3], [13.8, 52.7], [13.0, 52.3]]]
                }
            }]
        })
        .to_string(),
    );

    let config = app_config(locations.to_str(), boundaries.to_str());
    let map_config = startup::resolve_map_config(&config).expect("defaults should resolve");
    let session = startup::start_session(&config, &map_config)
        .await
        .expect("session should start");

    assert_eq!(session.store().len(), 2);
    assert_eq!(session.store().rejected(), 1);
    assert_eq!(session.visible().len(), 2);
    assert_eq!(session.boundaries().map(|layer| layer.len()), Some(1));
    assert_eq!(session.mode(), PresentationMode::BoundaryFill);

    std::fs::remove_file(locations).ok();
    std::fs::remove_file(boundaries).ok();
}

#[tokio::test]
async fn start_session_survives_missing_sources() {
    let config = app_config(
        Some("/nonexistent/vendmap/locations.json"),
        Some("/nonexistent/vendmap/states.geojson"),
    );
    let map_config = startup::resolve_map_config(&config).expect("defaults should resolve");
    let session = startup::start_session(&config, &map_config)
        .await
        .expect("missing data must not abort startup");

    assert!(session.store().is_empty());
    assert!(session.boundaries().is_none());
}
