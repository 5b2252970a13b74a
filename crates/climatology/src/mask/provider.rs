//! Minimal rectangle-based country boundaries.

use climatology_common::{BoundingBox, ClimateResult, LatLonGrid};

use super::{CountryBoundaryProvider, CountryCodeGrid};
use crate::types::CountryCode;

/// Assigns countries from lat/lon boxes.
///
/// Cell centres are tested against the boxes in insertion order and take the
/// first match. Meant for tests and small regional domains; real country
/// outlines come from a dedicated boundary provider.
#[derive(Debug, Clone, Default)]
pub struct RegionBoxProvider {
    regions: Vec<(CountryCode, BoundingBox)>,
}

impl RegionBoxProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box for a country. A country may have several boxes.
    pub fn with_region(mut self, code: impl Into<CountryCode>, bbox: BoundingBox) -> Self {
        self.regions.push((code.into(), bbox));
        self
    }

    pub fn regions(&self) -> &[(CountryCode, BoundingBox)] {
        &self.regions
    }

    fn code_for(&self, lon: f64, lat: f64) -> Option<CountryCode> {
        self.regions
            .iter()
            .find(|(_, bbox)| bbox.contains(lon, lat))
            .map(|(code, _)| code.clone())
    }
}

impl CountryBoundaryProvider for RegionBoxProvider {
    fn country_grid(&self, grid: &LatLonGrid) -> ClimateResult<CountryCodeGrid> {
        let cells = grid
            .latitudes
            .iter()
            .flat_map(|&lat| grid.longitudes.iter().map(move |&lon| (lon, lat)))
            .map(|(lon, lat)| self.code_for(lon, lat))
            .collect();
        CountryCodeGrid::new(grid.clone(), cells)
    }
}
