//! Coordinate axes for gridded model output.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::Season;

/// Kind of a field dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionKind {
    Time,
    Season,
    Year,
    Latitude,
    Longitude,
}

impl DimensionKind {
    /// Conventional short name used by model output ("time", "lat", ...).
    pub fn short_name(&self) -> &'static str {
        match self {
            DimensionKind::Time => "time",
            DimensionKind::Season => "season",
            DimensionKind::Year => "year",
            DimensionKind::Latitude => "lat",
            DimensionKind::Longitude => "lon",
        }
    }
}

impl std::fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DimensionKind::Time => "time",
            DimensionKind::Season => "season",
            DimensionKind::Year => "year",
            DimensionKind::Latitude => "latitude",
            DimensionKind::Longitude => "longitude",
        };
        f.write_str(name)
    }
}

/// A field dimension together with its coordinate values.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Time(Vec<DateTime<Utc>>),
    Season(Vec<Season>),
    Year(Vec<i32>),
    /// Latitudes in degrees north.
    Latitude(Vec<f64>),
    /// Longitudes in degrees east.
    Longitude(Vec<f64>),
}

impl Dimension {
    pub fn kind(&self) -> DimensionKind {
        match self {
            Dimension::Time(_) => DimensionKind::Time,
            Dimension::Season(_) => DimensionKind::Season,
            Dimension::Year(_) => DimensionKind::Year,
            Dimension::Latitude(_) => DimensionKind::Latitude,
            Dimension::Longitude(_) => DimensionKind::Longitude,
        }
    }

    /// Number of coordinate values.
    pub fn len(&self) -> usize {
        match self {
            Dimension::Time(v) => v.len(),
            Dimension::Season(v) => v.len(),
            Dimension::Year(v) => v.len(),
            Dimension::Latitude(v) => v.len(),
            Dimension::Longitude(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the coordinates at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Dimension {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }

        match self {
            Dimension::Time(v) => Dimension::Time(pick(v, indices)),
            Dimension::Season(v) => Dimension::Season(pick(v, indices)),
            Dimension::Year(v) => Dimension::Year(pick(v, indices)),
            Dimension::Latitude(v) => Dimension::Latitude(pick(v, indices)),
            Dimension::Longitude(v) => Dimension::Longitude(pick(v, indices)),
        }
    }
}

/// The horizontal lat/lon grid of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl LatLonGrid {
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            latitudes,
            longitudes,
        }
    }

    /// Grid dimensions (nlat, nlon).
    pub fn shape(&self) -> (usize, usize) {
        (self.latitudes.len(), self.longitudes.len())
    }

    /// Total number of grid cells.
    pub fn len(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable key identifying this exact set of coordinates.
    ///
    /// Bit-identical coordinates always give the same key; callers compare
    /// the grids themselves to rule out collisions.
    pub fn key(&self) -> GridKey {
        let mut hasher = DefaultHasher::new();
        self.latitudes.len().hash(&mut hasher);
        self.longitudes.len().hash(&mut hasher);
        for v in self.latitudes.iter().chain(self.longitudes.iter()) {
            v.to_bits().hash(&mut hasher);
        }
        GridKey(hasher.finish())
    }

    /// Short description for logs and error messages, e.g. "2x2 grid".
    pub fn describe(&self) -> String {
        let (nlat, nlon) = self.shape();
        format!("{}x{} grid", nlat, nlon)
    }
}

/// Cache key for lat/lon grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey(pub u64);
