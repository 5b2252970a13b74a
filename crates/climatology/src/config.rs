//! Configuration for a climatology run.

use std::collections::HashSet;

use climatology_common::{BoundingBox, ClimateError, ClimateResult, Season};
use serde::{Deserialize, Serialize};

use crate::equatorial::default_enso_window;
use crate::types::CountryCode;

/// Default colorbar levels for the seasonal map: 0 to 12 mm/day in steps of 1.5.
pub const DEFAULT_COLORBAR_LEVELS: [f64; 9] = [0.0, 1.5, 3.0, 4.5, 6.0, 7.5, 9.0, 10.5, 12.0];

/// A country to report on: display name and boundary code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub name: String,
    pub code: CountryCode,
}

impl CountryEntry {
    pub fn new(name: impl Into<String>, code: impl Into<CountryCode>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Surface to blank out on the seasonal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskRegion {
    Land,
    Ocean,
}

impl MaskRegion {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "land" => Some(Self::Land),
            "ocean" => Some(Self::Ocean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Ocean => "ocean",
        }
    }
}

impl std::fmt::Display for MaskRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the climatology pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimatologyConfig {
    /// Name of the precipitation variable in the dataset.
    pub variable: String,

    /// Season shown on the climatology map.
    pub season: Season,

    /// Countries for the annual report, in output order.
    pub countries: Vec<CountryEntry>,

    /// Optional land/ocean masking for the map. Passed through to rendering.
    pub mask_region: Option<MaskRegion>,

    /// Colorbar levels for the map. `None` uses [`DEFAULT_COLORBAR_LEVELS`].
    pub colorbar_levels: Option<Vec<f64>>,

    /// Draw gridlines on the map.
    pub plot_gridlines: bool,

    /// Lat/lon window for the equatorial band.
    pub enso_window: BoundingBox,
}

impl Default for ClimatologyConfig {
    fn default() -> Self {
        Self {
            variable: "pr".to_string(),
            season: Season::Djf,
            countries: vec![CountryEntry::new("United Kingdom", "GB")],
            mask_region: None,
            colorbar_levels: None,
            plot_gridlines: false,
            enso_window: default_enso_window(),
        }
    }
}

impl ClimatologyConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `CLIMATOLOGY_VARIABLE`, `CLIMATOLOGY_SEASON` and
    /// `CLIMATOLOGY_MASK_REGION`. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("CLIMATOLOGY_VARIABLE") {
            if !val.trim().is_empty() {
                config.variable = val.trim().to_string();
            }
        }

        if let Some(val) = lookup("CLIMATOLOGY_SEASON") {
            match val.parse() {
                Ok(season) => config.season = season,
                Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring CLIMATOLOGY_SEASON"),
            }
        }

        if let Some(val) = lookup("CLIMATOLOGY_MASK_REGION") {
            match MaskRegion::parse(&val) {
                Some(region) => config.mask_region = Some(region),
                None if val.trim().is_empty() || val.trim().eq_ignore_ascii_case("none") => {
                    config.mask_region = None
                }
                None => tracing::warn!(value = %val, "Ignoring CLIMATOLOGY_MASK_REGION"),
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ClimateResult<()> {
        if self.variable.trim().is_empty() {
            return Err(ClimateError::invalid_config("variable must not be empty"));
        }

        if self.countries.is_empty() {
            return Err(ClimateError::invalid_config("countries must not be empty"));
        }

        let mut names = HashSet::new();
        for country in &self.countries {
            if country.code.as_str().trim().is_empty() {
                return Err(ClimateError::invalid_config(format!(
                    "country '{}' has an empty code",
                    country.name
                )));
            }
            if !names.insert(country.name.as_str()) {
                return Err(ClimateError::invalid_config(format!(
                    "country '{}' listed more than once",
                    country.name
                )));
            }
        }

        if let Some(levels) = &self.colorbar_levels {
            if levels.is_empty() {
                return Err(ClimateError::invalid_config("colorbar_levels must not be empty"));
            }
            if levels.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(ClimateError::invalid_config(
                    "colorbar_levels must be strictly increasing",
                ));
            }
        }

        if !self.enso_window.is_valid() {
            return Err(ClimateError::invalid_config(format!(
                "enso_window is inverted: {}",
                self.enso_window
            )));
        }

        Ok(())
    }

    /// Colorbar levels to use for the map.
    pub fn effective_colorbar_levels(&self) -> Vec<f64> {
        self.colorbar_levels
            .clone()
            .unwrap_or_else(|| DEFAULT_COLORBAR_LEVELS.to_vec())
    }
}
