//! Error types for climatology diagnostics.

use thiserror::Error;

use crate::grid::DimensionKind;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Broad classification of a [`ClimateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape, attributes, units or options. Fix the inputs and rerun.
    Configuration,
    /// Numeric values outside their physical bounds.
    Validation,
    /// A requested key (country code, season, year) is not present.
    Lookup,
    /// Failure writing an output sink.
    Io,
}

/// Primary error type for climatology operations.
#[derive(Debug, Error)]
pub enum ClimateError {
    // === Configuration Errors ===
    #[error("Missing required attribute '{attribute}' on {target}")]
    MissingAttribute { target: String, attribute: String },

    #[error("Variable not found in dataset: {0}")]
    MissingVariable(String),

    #[error("Units not recognized: '{0}' (expected 'kg m-2 s-1' or 'mm/day')")]
    UnrecognizedUnits(String),

    #[error("Missing required dimension: {0}")]
    MissingDimension(DimensionKind),

    #[error("Invalid field shape: {0}")]
    InvalidShape(String),

    #[error("Requested {dimension} window [{min}, {max}] does not intersect field coordinates")]
    EmptyWindow {
        dimension: DimensionKind,
        min: f64,
        max: f64,
    },

    #[error("Field grid does not match country mask grid: {0}")]
    GridMismatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Validation Errors ===
    #[error("Negative precipitation: found {value} mm/day")]
    NegativePrecipitation { value: f64 },

    #[error("Implausible precipitation: found {value} mm/day, above the {bound} mm/day limit")]
    ImplausiblePrecipitation { value: f64, bound: f64 },

    // === Lookup Errors ===
    #[error("Country code '{code}' not present in mask for this grid ({grid})")]
    CountryNotFound { code: String, grid: String },

    #[error("Season {0} not present in field")]
    SeasonNotFound(String),

    #[error("Year {0} not present in field")]
    YearNotFound(i32),

    // === Sink Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClimateError {
    /// Create a MissingAttribute error.
    pub fn missing_attribute(target: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            target: target.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an InvalidShape error.
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClimateError::MissingAttribute { .. }
            | ClimateError::MissingVariable(_)
            | ClimateError::UnrecognizedUnits(_)
            | ClimateError::MissingDimension(_)
            | ClimateError::InvalidShape(_)
            | ClimateError::EmptyWindow { .. }
            | ClimateError::GridMismatch(_)
            | ClimateError::InvalidConfig(_) => ErrorKind::Configuration,

            ClimateError::NegativePrecipitation { .. }
            | ClimateError::ImplausiblePrecipitation { .. } => ErrorKind::Validation,

            ClimateError::CountryNotFound { .. }
            | ClimateError::SeasonNotFound(_)
            | ClimateError::YearNotFound(_) => ErrorKind::Lookup,

            ClimateError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<ndarray::ShapeError> for ClimateError {
    fn from(err: ndarray::ShapeError) -> Self {
        ClimateError::InvalidShape(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ClimateError::UnrecognizedUnits("K".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ClimateError::NegativePrecipitation { value: -86.4 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ClimateError::CountryNotFound {
                code: "GB".into(),
                grid: "2x2".into()
            }
            .kind(),
            ErrorKind::Lookup
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(ClimateError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ClimateError::ImplausiblePrecipitation {
            value: 2160.0,
            bound: 2000.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("Implausible precipitation"));
        assert!(msg.contains("2000"));
        assert!(msg.contains("2160"));

        let err = ClimateError::missing_attribute("dataset", "source_id");
        assert!(err.to_string().contains("source_id"));

        let err = ClimateError::MissingDimension(DimensionKind::Longitude);
        assert_eq!(err.to_string(), "Missing required dimension: longitude");
    }
}
