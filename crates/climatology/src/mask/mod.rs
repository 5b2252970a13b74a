//! Country masking.
//!
//! A [`CountryBoundaryProvider`] turns a lat/lon grid into a
//! [`CountryCodeGrid`]. The [`SpatialMasker`] asks the provider once per
//! distinct grid, caches the result, and uses it to average a field over the
//! cells of one country.

mod cache;
mod provider;

pub use cache::{MaskCache, DEFAULT_MASK_CACHE_CAPACITY};
pub use provider::RegionBoxProvider;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use climatology_common::{ClimateError, ClimateResult, DimensionKind, GriddedField, LatLonGrid};
use ndarray::Array2;

use crate::config::CountryEntry;
use crate::report::{ClimatologyReport, CountryBlock};
use crate::types::{CacheStats, CountryCode};

/// Source of country boundaries.
///
/// Implementations rasterize their boundary data onto the requested grid.
/// The same grid must always yield the same codes.
pub trait CountryBoundaryProvider {
    /// Country code of every cell of `grid`, aligned cell for cell.
    fn country_grid(&self, grid: &LatLonGrid) -> ClimateResult<CountryCodeGrid>;
}

impl<T: CountryBoundaryProvider + ?Sized> CountryBoundaryProvider for Arc<T> {
    fn country_grid(&self, grid: &LatLonGrid) -> ClimateResult<CountryCodeGrid> {
        (**self).country_grid(grid)
    }
}

/// Country code per lat/lon cell. `None` marks cells outside every country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCodeGrid {
    grid: LatLonGrid,
    cells: Array2<Option<CountryCode>>,
}

impl CountryCodeGrid {
    /// Build from codes in row-major (latitude, longitude) order.
    pub fn new(grid: LatLonGrid, cells: Vec<Option<CountryCode>>) -> ClimateResult<Self> {
        let cells = Array2::from_shape_vec(grid.shape(), cells)?;
        Ok(Self { grid, cells })
    }

    /// A grid where no cell belongs to any country.
    pub fn unassigned(grid: LatLonGrid) -> Self {
        let cells = Array2::from_elem(grid.shape(), None);
        Self { grid, cells }
    }

    pub fn grid(&self) -> &LatLonGrid {
        &self.grid
    }

    /// Code at a (latitude index, longitude index) cell.
    pub fn code_at(&self, lat: usize, lon: usize) -> Option<&CountryCode> {
        self.cells.get((lat, lon)).and_then(Option::as_ref)
    }

    /// Number of cells assigned to `code`.
    pub fn cell_count(&self, code: &str) -> usize {
        self.cells
            .iter()
            .filter(|c| c.as_ref().is_some_and(|c| c.as_str() == code))
            .count()
    }

    /// Distinct codes present on the grid.
    pub fn codes(&self) -> BTreeSet<&CountryCode> {
        self.cells.iter().flatten().collect()
    }
}

/// A field restricted to the cells of one country.
#[derive(Debug, Clone)]
pub struct CountrySelection {
    /// Copy of the input with every cell outside the country set to NaN.
    pub field: GriddedField,
    pub code: CountryCode,
    /// Mask cells assigned to the code.
    pub matched_cells: usize,
    grid: String,
}

/// Applies country masks to gridded fields.
pub struct SpatialMasker<P> {
    provider: P,
    cache: Mutex<MaskCache>,
}

impl<P: CountryBoundaryProvider> SpatialMasker<P> {
    pub fn new(provider: P) -> Self {
        Self::with_cache_capacity(provider, DEFAULT_MASK_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(provider: P, capacity: usize) -> Self {
        Self {
            provider,
            cache: Mutex::new(MaskCache::new(capacity)),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Country grid for the field's lat/lon coordinates.
    ///
    /// The provider is only consulted the first time a grid is seen.
    pub fn build_mask(&self, field: &GriddedField) -> ClimateResult<Arc<CountryCodeGrid>> {
        let grid = field.grid()?;
        let key = grid.key();

        if let Some(mask) = self.lock_cache().get(&key, &grid) {
            return Ok(mask);
        }

        let mask = self.provider.country_grid(&grid)?;
        if mask.grid() != &grid {
            return Err(ClimateError::GridMismatch(format!(
                "provider returned a {} for a {}",
                mask.grid().describe(),
                grid.describe()
            )));
        }

        tracing::info!(
            grid = %grid.describe(),
            countries = mask.codes().len(),
            "Built country mask"
        );

        let mask = Arc::new(mask);
        self.lock_cache().insert(key, Arc::clone(&mask));
        Ok(mask)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    /// Per-country annual averages of an annual-mean field in mm/day.
    ///
    /// Countries come out in the order given, years in ascending order.
    pub fn country_report(
        &self,
        annual: &GriddedField,
        countries: &[CountryEntry],
    ) -> ClimateResult<ClimatologyReport> {
        let years = annual
            .years()
            .ok_or(ClimateError::MissingDimension(DimensionKind::Year))?;
        let mut order: Vec<usize> = (0..years.len()).collect();
        order.sort_by_key(|&i| years[i]);

        let mask = self.build_mask(annual)?;
        let mut report = ClimatologyReport::new();

        for country in countries {
            if mask.cell_count(country.code.as_str()) == 0 {
                return Err(ClimateError::CountryNotFound {
                    code: country.code.to_string(),
                    grid: mask.grid().describe(),
                });
            }

            let mut block = CountryBlock::new(&country.name, country.code.clone());
            for &i in &order {
                let slice = annual.index(DimensionKind::Year, i)?;
                let selection = select(&slice, &mask, &country.code)?;
                block.push(years[i], average(&selection)?);
            }
            tracing::debug!(
                country = %country.name,
                code = %country.code,
                years = block.rows().len(),
                "Computed country annual averages"
            );
            report.push(block);
        }

        Ok(report)
    }

    fn lock_cache(&self) -> MutexGuard<'_, MaskCache> {
        // Cached grids are immutable, so a poisoned lock still holds valid data.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keep the cells of `field` that the mask assigns to `code`.
pub fn select(
    field: &GriddedField,
    mask: &CountryCodeGrid,
    code: &CountryCode,
) -> ClimateResult<CountrySelection> {
    let grid = field.grid()?;
    if &grid != mask.grid() {
        return Err(ClimateError::GridMismatch(format!(
            "field is on a {}, mask is on a {}",
            grid.describe(),
            mask.grid().describe()
        )));
    }

    let lat_ax = field.require_axis(DimensionKind::Latitude)?;
    let lon_ax = field.require_axis(DimensionKind::Longitude)?;
    let inside = mask.cells.map(|c| c.as_ref() == Some(code));

    let mut data = field.data().clone();
    for (idx, value) in data.indexed_iter_mut() {
        if !inside[[idx[lat_ax], idx[lon_ax]]] {
            *value = f64::NAN;
        }
    }

    Ok(CountrySelection {
        field: field.with_data(data)?,
        code: code.clone(),
        matched_cells: mask.cell_count(code.as_str()),
        grid: grid.describe(),
    })
}

/// Mean over the non-missing cells of a country selection.
pub fn average(selection: &CountrySelection) -> ClimateResult<f64> {
    if selection.matched_cells == 0 {
        return Err(ClimateError::CountryNotFound {
            code: selection.code.to_string(),
            grid: selection.grid.clone(),
        });
    }

    let mean = selection.field.nanmean();
    if mean.is_nan() {
        tracing::warn!(
            code = %selection.code,
            cells = selection.matched_cells,
            "Every cell of the country is missing"
        );
    }
    Ok(mean)
}
