//! Common test fixtures for climatology tests.
//!
//! This module provides pre-defined regions and small datasets that
//! represent common scenarios.

use climatology_common::Dataset;

use crate::generators::{create_dataset, create_precip_field, monthly_times};

/// Common bounding box definitions for testing.
pub mod bbox {
    use climatology_common::BoundingBox;

    /// Rough box around Great Britain.
    pub const UNITED_KINGDOM: BoundingBox = BoundingBox {
        min_lon: -8.0,
        min_lat: 50.0,
        max_lon: 2.0,
        max_lat: 59.0,
    };

    /// Rough box around mainland France.
    pub const FRANCE: BoundingBox = BoundingBox {
        min_lon: -5.0,
        min_lat: 42.0,
        max_lon: 8.0,
        max_lat: 51.0,
    };

    /// Equatorial Pacific ENSO window.
    pub const NINO_BAND: BoundingBox = BoundingBox {
        min_lon: 120.0,
        min_lat: -1.0,
        max_lon: 280.0,
        max_lat: 1.0,
    };
}

/// Model names used as `source_id`.
pub mod models {
    pub const ACCESS_CM2: &str = "ACCESS-CM2";
    pub const CSIRO_MK3: &str = "CSIRO-Mk3-6-0";
}

/// Latitudes of the 2x2 UK fixture grid.
pub const UK_2X2_LATITUDES: [f64; 2] = [0.0, 55.0];

/// Longitudes of the 2x2 UK fixture grid.
pub const UK_2X2_LONGITUDES: [f64; 2] = [-2.0, 150.0];

/// Twelve months of 2010 on a 2x2 grid where only cell (55N, 2W) is in the UK
/// and cell (0N, 150E) lies in the equatorial band.
///
/// The UK cell holds `uk_value` every month and every other cell is dry,
/// all in `units`.
pub fn uk_2x2_dataset(units: &str, uk_value: f64) -> Dataset {
    let field = create_precip_field(
        monthly_times(2010, 12),
        UK_2X2_LATITUDES.to_vec(),
        UK_2X2_LONGITUDES.to_vec(),
        units,
        |_, i, j| if (i, j) == (1, 0) { uk_value } else { 0.0 },
    );
    create_dataset(field, models::ACCESS_CM2)
}
