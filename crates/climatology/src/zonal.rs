//! Zonal (longitude) averages.

use climatology_common::{ClimateError, ClimateResult, DimensionKind, GriddedField};

/// Latitude groups shown together on the zonal line panels.
pub const ZONAL_PANEL_LATITUDES: [&[f64]; 4] =
    [&[0.0], &[-20.0, 20.0], &[-45.0, 45.0], &[-70.0, 70.0]];

/// Mean across longitude, keeping every other axis and the units.
pub fn zonal_mean(field: &GriddedField) -> ClimateResult<GriddedField> {
    let zonal = field.mean_over(DimensionKind::Longitude)?;
    tracing::debug!(
        field = field.name(),
        shape = ?zonal.shape(),
        "Computed zonal mean"
    );
    Ok(zonal)
}

/// Zonal-mean precipitation over latitude and time.
#[derive(Debug, Clone)]
pub struct ZonalProfile {
    field: GriddedField,
}

impl ZonalProfile {
    /// Reduce a field with latitude and longitude axes to its zonal profile.
    pub fn from_field(field: &GriddedField) -> ClimateResult<Self> {
        field.require_axis(DimensionKind::Latitude)?;
        Ok(Self {
            field: zonal_mean(field)?,
        })
    }

    pub fn field(&self) -> &GriddedField {
        &self.field
    }

    pub fn into_field(self) -> GriddedField {
        self.field
    }

    /// Profile at the grid latitudes nearest to each requested latitude.
    ///
    /// Output order follows `targets`. Ties go to the lower index.
    pub fn at_latitudes(&self, targets: &[f64]) -> ClimateResult<GriddedField> {
        let lats = self
            .field
            .latitudes()
            .ok_or(ClimateError::MissingDimension(DimensionKind::Latitude))?;
        if lats.is_empty() {
            return Err(ClimateError::EmptyWindow {
                dimension: DimensionKind::Latitude,
                min: targets.iter().copied().fold(f64::INFINITY, f64::min),
                max: targets.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            });
        }

        let indices: Vec<usize> = targets
            .iter()
            .map(|&target| nearest_index(lats, target))
            .collect();
        self.field.select(DimensionKind::Latitude, &indices)
    }

    /// One selection per entry of [`ZONAL_PANEL_LATITUDES`].
    pub fn panels(&self) -> ClimateResult<Vec<GriddedField>> {
        ZONAL_PANEL_LATITUDES
            .iter()
            .map(|lats| self.at_latitudes(lats))
            .collect()
    }

    /// The profile laid out latitude first, for a latitude/time map.
    pub fn hovmoller(&self) -> ClimateResult<GriddedField> {
        let mut order = vec![DimensionKind::Latitude];
        order.extend(
            self.field
                .dim_kinds()
                .into_iter()
                .filter(|&k| k != DimensionKind::Latitude),
        );
        self.field.transpose(&order)
    }
}

fn nearest_index(values: &[f64], target: f64) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if (v - target).abs() < (values[best] - target).abs() {
            best = i;
        }
    }
    best
}
