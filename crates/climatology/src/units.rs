//! Precipitation unit conversion and plausibility checks.

use climatology_common::{ClimateError, ClimateResult, GriddedField};
use serde::{Deserialize, Serialize};

/// Seconds per day. With a water density of 1000 kg m-3, 1 kg m-2 of
/// precipitation is a 1 mm layer, so kg m-2 s-1 times this is mm/day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Largest physically plausible daily precipitation, inclusive.
pub const PRECIPITATION_UPPER_BOUND: f64 = 2000.0;

/// Precipitation units accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecipitationUnits {
    /// Mass flux, "kg m-2 s-1" (CMIP convention)
    #[serde(rename = "kg m-2 s-1")]
    KgPerSquareMetrePerSecond,
    /// Depth per day, "mm/day"
    #[serde(rename = "mm/day")]
    MillimetresPerDay,
}

impl PrecipitationUnits {
    pub fn label(&self) -> &'static str {
        match self {
            Self::KgPerSquareMetrePerSecond => "kg m-2 s-1",
            Self::MillimetresPerDay => "mm/day",
        }
    }

    /// Factor taking a value in these units to mm/day.
    pub fn to_mm_per_day_factor(&self) -> f64 {
        match self {
            Self::KgPerSquareMetrePerSecond => SECONDS_PER_DAY,
            Self::MillimetresPerDay => 1.0,
        }
    }
}

impl std::fmt::Display for PrecipitationUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PrecipitationUnits {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg m-2 s-1" => Ok(Self::KgPerSquareMetrePerSecond),
            "mm/day" => Ok(Self::MillimetresPerDay),
            other => Err(ClimateError::UnrecognizedUnits(other.to_string())),
        }
    }
}

/// Converts precipitation fields to mm/day and rejects implausible values.
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    upper_bound: f64,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            upper_bound: PRECIPITATION_UPPER_BOUND,
        }
    }
}

impl UnitConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different inclusive upper bound (mm/day).
    pub fn with_upper_bound(upper_bound: f64) -> Self {
        Self { upper_bound }
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Convert `field`, declared to be in `declared_unit`, to mm/day.
    ///
    /// Fields already in mm/day keep their values. The result is checked
    /// cell by cell (NaN cells are ignored): anything below zero or above the
    /// upper bound fails the whole conversion.
    pub fn convert(&self, field: &GriddedField, declared_unit: &str) -> ClimateResult<GriddedField> {
        let units: PrecipitationUnits = declared_unit.parse()?;
        let factor = units.to_mm_per_day_factor();

        let converted = match units {
            PrecipitationUnits::MillimetresPerDay => field.clone(),
            PrecipitationUnits::KgPerSquareMetrePerSecond => field.map_values(|v| v * factor),
        }
        .with_units(PrecipitationUnits::MillimetresPerDay.label());

        self.validate(&converted)?;

        tracing::debug!(
            field = converted.name(),
            from = %units,
            factor,
            "Converted precipitation to mm/day"
        );
        Ok(converted)
    }

    /// Check that every non-NaN value of a mm/day field is within bounds.
    pub fn validate(&self, field: &GriddedField) -> ClimateResult<()> {
        let Some((min, max)) = field.min_max() else {
            return Ok(());
        };

        if min < 0.0 {
            return Err(ClimateError::NegativePrecipitation { value: min });
        }
        if max > self.upper_bound {
            return Err(ClimateError::ImplausiblePrecipitation {
                value: max,
                bound: self.upper_bound,
            });
        }
        Ok(())
    }
}
