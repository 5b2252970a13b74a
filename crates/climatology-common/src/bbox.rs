//! Geographic lat/lon windows.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees, inclusive on every edge.
///
/// Longitudes may use either the 0..360 or the -180..180 convention; see
/// [`BoundingBox::contains_lon`] for how the two are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// A box is well formed when neither extent is inverted.
    pub fn is_valid(&self) -> bool {
        self.min_lon <= self.max_lon && self.min_lat <= self.max_lat
    }

    /// Check if a latitude falls inside the box.
    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat
    }

    /// Check if a longitude falls inside the box.
    ///
    /// A coordinate also matches when shifting it by a full turn lands it
    /// inside, so a 120..280 window selects -100 from a -180..180 grid.
    pub fn contains_lon(&self, lon: f64) -> bool {
        let inside = |l: f64| l >= self.min_lon && l <= self.max_lon;
        inside(lon) || inside(lon + 360.0) || inside(lon - 360.0)
    }

    /// Check if a point is contained within this box.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.contains_lat(lat) && self.contains_lon(lon)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        // Global coverage
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lon [{}, {}] lat [{}, {}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let bbox = BoundingBox::new(120.0, -1.0, 280.0, 1.0);
        assert!(bbox.contains(120.0, -1.0));
        assert!(bbox.contains(280.0, 1.0));
        assert!(!bbox.contains(119.9, 0.0));
        assert!(!bbox.contains(200.0, 1.5));
    }

    #[test]
    fn test_longitude_wrap() {
        let bbox = BoundingBox::new(120.0, -1.0, 280.0, 1.0);
        assert!(bbox.contains_lon(-100.0));
        assert!(bbox.contains_lon(-80.0));
        assert!(!bbox.contains_lon(-70.0));
        assert!(!bbox.contains_lon(0.0));

        let west = BoundingBox::new(-10.0, 49.0, 2.0, 61.0);
        assert!(west.contains_lon(358.0));
        assert!(!west.contains_lon(300.0));
    }

    #[test]
    fn test_dimensions_and_validity() {
        let bbox = BoundingBox::new(-100.0, 30.0, -90.0, 40.0);
        assert!((bbox.width() - 10.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 10.0).abs() < f64::EPSILON);
        assert!(bbox.is_valid());
        assert!(!BoundingBox::new(10.0, 0.0, 0.0, 1.0).is_valid());
    }
}
