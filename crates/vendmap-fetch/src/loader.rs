//! Concurrent, failure-tolerant startup load of both datasets.

use serde_json::Value;
use vendmap_core::DataSources;

use crate::client::DataClient;

/// Whatever could be loaded. Missing pieces are empty, never errors.
#[derive(Debug, Default)]
pub struct Datasets {
    pub locations: Vec<Value>,
    pub boundaries: Option<Value>,
}

/// Fetch locations and boundaries concurrently.
///
/// A failed fetch is logged at `error` level and leaves that dataset empty so
/// the map can still start with whatever did load.
pub async fn load_datasets(client: &DataClient, sources: &DataSources) -> Datasets {
    let (locations, boundaries) = tokio::join!(
        client.fetch_locations(&sources.locations),
        client.fetch_boundaries(&sources.boundaries),
    );

    let locations = match locations {
        Ok(records) => {
            tracing::info!(source = %sources.locations, count = records.len(), "fetched location records");
            records
        }
        Err(e) => {
            tracing::error!(source = %sources.locations, error = %e, "failed to load location records");
            Vec::new()
        }
    };

    let boundaries = match boundaries {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::error!(source = %sources.boundaries, error = %e, "failed to load boundary shapes");
            None
        }
    };

    Datasets {
        locations,
        boundaries,
    }
}
