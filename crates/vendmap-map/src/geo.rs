//! Plain geographic value types shared by the store, the boundary layer and
//! the camera.

use vendmap_core::{LatLng, MaxBounds};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN and infinities.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Self {
            lat: value.lat,
            lon: value.lng,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Axis-aligned lat/lon rectangle. Never empty: built from at least one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    #[must_use]
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south: point.lat,
            west: point.lon,
            north: point.lat,
            east: point.lon,
        }
    }

    /// Smallest rectangle covering every coordinate, or `None` for an empty input.
    pub fn covering<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut acc, p| {
            acc.extend(p);
            acc
        }))
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
    }

    pub fn union(&mut self, other: &Bounds) {
        self.south = self.south.min(other.south);
        self.north = self.north.max(other.north);
        self.west = self.west.min(other.west);
        self.east = self.east.max(other.east);
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.south + self.north) / 2.0,
            lon: (self.west + self.east) / 2.0,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }
}

impl From<MaxBounds> for Bounds {
    fn from(value: MaxBounds) -> Self {
        Self {
            south: value.south_west.lat,
            west: value.south_west.lng,
            north: value.north_east.lat,
            east: value.north_east.lng,
        }
    }
}

/// Screen-space margin in pixels kept around fitted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding(pub u32);
