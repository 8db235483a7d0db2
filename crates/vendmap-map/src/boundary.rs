//! Administrative boundary overlay parsed from a GeoJSON `FeatureCollection`.
//!
//! Only what the engine needs is kept: each feature's display name and
//! bounding box. Geometry stays with the rendering side.

use serde_json::Value;

use crate::geo::{Bounds, Coordinate};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    #[error("expected a GeoJSON FeatureCollection, got type {0:?}")]
    NotFeatureCollection(Option<String>),
    #[error("FeatureCollection has no `features` array")]
    MissingFeatures,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    /// `None` when the feature has no usable geometry.
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryLayer {
    features: Vec<BoundaryFeature>,
    bounds: Option<Bounds>,
}

impl BoundaryLayer {
    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the document is not a feature collection.
    /// Individual malformed features are kept with `bounds: None`.
    pub fn from_geojson(doc: &Value) -> Result<Self, BoundaryError> {
        let kind = doc.get("type").and_then(Value::as_str);
        if kind != Some("FeatureCollection") {
            return Err(BoundaryError::NotFeatureCollection(kind.map(str::to_string)));
        }

        let features = doc
            .get("features")
            .and_then(Value::as_array)
            .ok_or(BoundaryError::MissingFeatures)?;

        let features: Vec<BoundaryFeature> = features
            .iter()
            .map(|feature| {
                let name = feature
                    .get("properties")
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                let bounds = feature
                    .get("geometry")
                    .and_then(|g| g.get("coordinates"))
                    .and_then(geometry_bounds);
                if bounds.is_none() {
                    tracing::debug!(name = %name, "boundary feature has no usable geometry");
                }
                BoundaryFeature { name, bounds }
            })
            .collect();

        let bounds = features
            .iter()
            .filter_map(|f| f.bounds)
            .reduce(|mut acc, b| {
                acc.union(&b);
                acc
            });

        Ok(Self { features, bounds })
    }

    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    #[must_use]
    pub fn feature(&self, index: usize) -> Option<&BoundaryFeature> {
        self.features.get(index)
    }

    /// Union of all feature bounds, `None` if no feature had geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Walk nested GeoJSON coordinate arrays of any depth. Positions are
/// `[lon, lat, ...]`.
fn geometry_bounds(coordinates: &Value) -> Option<Bounds> {
    let items = coordinates.as_array()?;

    if let [lon, lat, ..] = items.as_slice() {
        if let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) {
            return Coordinate::new(lat, lon).map(Bounds::from_point);
        }
    }

    items.iter().filter_map(geometry_bounds).reduce(|mut acc, b| {
        acc.union(&b);
        acc
    })
}
