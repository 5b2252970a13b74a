//! Precipitation Climatology Diagnostics
//!
//! This crate turns monthly model precipitation into the summaries used to
//! evaluate a climate model:
//!
//! - **Seasonal climatology**: mean map per meteorological season in mm/day
//! - **Country report**: annual average per country, as a text table
//! - **Zonal profile**: longitude mean over latitude and time
//! - **ENSO band**: equatorial Pacific precipitation over longitude and time
//!
//! # Architecture
//!
//! ```text
//! Dataset (pr, source_id)
//!      │
//!      ▼
//! ClimatologyPipeline::run(dataset, config)
//!      │
//!      ├─► seasonal_mean ─► UnitConverter ─► select_season ─► SeasonalClimatology
//!      │
//!      ├─► annual_mean ─► UnitConverter ─► SpatialMasker ─► ClimatologyReport
//!      │                                        │
//!      │                                        └─► MaskCache ◄─ CountryBoundaryProvider
//!      │
//!      ├─► zonal_mean ─► ZonalProfile
//!      │
//!      └─► extract_band ─► EnsoSeries
//! ```
//!
//! # Example
//!
//! ```ignore
//! use climatology::{ClimatologyConfig, ClimatologyPipeline, RegionBoxProvider};
//!
//! let provider = RegionBoxProvider::new()
//!     .with_region("GB", BoundingBox::new(-8.0, 50.0, 2.0, 59.0));
//! let pipeline = ClimatologyPipeline::new(provider);
//!
//! let outputs = pipeline.run(&dataset, &ClimatologyConfig::default())?;
//! outputs.report.write_to_file(DEFAULT_REPORT_FILE)?;
//! ```

pub mod config;
pub mod equatorial;
pub mod mask;
pub mod pipeline;
pub mod report;
pub mod temporal;
pub mod types;
pub mod units;
pub mod zonal;

// Re-export commonly used types at crate root
pub use config::{ClimatologyConfig, CountryEntry, MaskRegion, DEFAULT_COLORBAR_LEVELS};
pub use equatorial::{default_enso_window, extract_band, EnsoSeries};
pub use mask::{
    CountryBoundaryProvider, CountryCodeGrid, CountrySelection, MaskCache, RegionBoxProvider,
    SpatialMasker,
};
pub use pipeline::{ClimatologyOutputs, ClimatologyPipeline, SeasonalClimatology};
pub use report::{ClimatologyReport, CountryBlock, DEFAULT_REPORT_FILE};
pub use temporal::{annual_mean, seasonal_mean, select_season, select_year};
pub use types::{CacheStats, CountryCode};
pub use units::{PrecipitationUnits, UnitConverter, PRECIPITATION_UPPER_BOUND, SECONDS_PER_DAY};
pub use zonal::{zonal_mean, ZonalProfile, ZONAL_PANEL_LATITUDES};

pub use climatology_common::{
    BoundingBox, ClimateError, ClimateResult, Dataset, Dimension, DimensionKind, ErrorKind,
    GriddedField, LatLonGrid, Season,
};
