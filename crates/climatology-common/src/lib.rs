//! Common types shared by the precipitation climatology crates.

pub mod bbox;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use dataset::{Dataset, SOURCE_ID_ATTR};
pub use error::{ClimateError, ClimateResult, ErrorKind};
pub use field::{nanmean_axis, GriddedField};
pub use grid::{Dimension, DimensionKind, GridKey, LatLonGrid};
pub use time::{year_of, Season, SeasonParseError};
