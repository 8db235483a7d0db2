use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings. Everything that differs per map deployment lives
/// in [`crate::MapConfig`] instead.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub map_config_path: PathBuf,
    /// Overrides `data.locations` from the map config when set.
    pub locations_source: Option<String>,
    /// Overrides `data.boundaries` from the map config when set.
    pub boundaries_source: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}
