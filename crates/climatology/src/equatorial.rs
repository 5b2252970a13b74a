//! Equatorial band extraction for ENSO diagnostics.

use climatology_common::{BoundingBox, ClimateError, ClimateResult, DimensionKind, GriddedField};

/// Default ENSO window: 1°S-1°N, 120°E-280°E (the equatorial Pacific).
pub fn default_enso_window() -> BoundingBox {
    BoundingBox::new(120.0, -1.0, 280.0, 1.0)
}

/// Restrict `field` to `window` (inclusive) and average across latitude.
///
/// Longitude and time are kept, in the field's own coordinate order.
pub fn extract_band(field: &GriddedField, window: &BoundingBox) -> ClimateResult<GriddedField> {
    let lats = field
        .latitudes()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Latitude))?;
    let lons = field
        .longitudes()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Longitude))?;

    let lat_idx: Vec<usize> = positions(lats, |lat| window.contains_lat(lat));
    if lat_idx.is_empty() {
        return Err(ClimateError::EmptyWindow {
            dimension: DimensionKind::Latitude,
            min: window.min_lat,
            max: window.max_lat,
        });
    }

    let lon_idx: Vec<usize> = positions(lons, |lon| window.contains_lon(lon));
    if lon_idx.is_empty() {
        return Err(ClimateError::EmptyWindow {
            dimension: DimensionKind::Longitude,
            min: window.min_lon,
            max: window.max_lon,
        });
    }

    tracing::debug!(
        field = field.name(),
        window = %window,
        latitudes = lat_idx.len(),
        longitudes = lon_idx.len(),
        "Extracting equatorial band"
    );

    field
        .select(DimensionKind::Latitude, &lat_idx)?
        .select(DimensionKind::Longitude, &lon_idx)?
        .mean_over(DimensionKind::Latitude)
}

/// Equatorial precipitation over longitude and time (Hovmöller layout).
#[derive(Debug, Clone)]
pub struct EnsoSeries {
    pub window: BoundingBox,
    field: GriddedField,
}

impl EnsoSeries {
    pub fn from_field(field: &GriddedField, window: BoundingBox) -> ClimateResult<Self> {
        Ok(Self {
            field: extract_band(field, &window)?,
            window,
        })
    }

    pub fn field(&self) -> &GriddedField {
        &self.field
    }

    pub fn into_field(self) -> GriddedField {
        self.field
    }
}

fn positions(values: &[f64], keep: impl Fn(f64) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| keep(v))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use climatology_common::Dimension;

    // One year; value = lat index * 10 + lon index
    fn band_field(lats: Vec<f64>, lons: Vec<f64>) -> GriddedField {
        let (nlat, nlon) = (lats.len(), lons.len());
        let values = (0..nlat)
            .flat_map(|i| (0..nlon).map(move |j| (i * 10 + j) as f64))
            .collect();
        GriddedField::from_vec(
            "pr",
            values,
            vec![
                Dimension::Year(vec![2010]),
                Dimension::Latitude(lats),
                Dimension::Longitude(lons),
            ],
        )
        .unwrap()
        .with_units("kg m-2 s-1")
    }

    #[test]
    fn test_default_window() {
        let field = band_field(vec![-2.0, -1.0, 0.5, 1.5], vec![100.0, 120.0, 200.0, 300.0]);
        let band = extract_band(&field, &default_enso_window()).unwrap();

        assert_eq!(band.dim_kinds(), vec![DimensionKind::Year, DimensionKind::Longitude]);
        assert_eq!(band.longitudes().unwrap(), &[120.0, 200.0]);
        // Latitude rows 1 and 2 averaged
        assert_eq!(band.data()[[0, 0]], 16.0);
        assert_eq!(band.data()[[0, 1]], 17.0);
        assert_eq!(band.units(), Some("kg m-2 s-1"));
    }

    #[test]
    fn test_full_latitude_range_is_plain_mean() {
        let field = band_field(vec![30.0, 10.0, -10.0, -30.0], vec![0.0, 90.0, 180.0, 270.0]);
        let window = BoundingBox::new(0.0, -90.0, 360.0, 90.0);
        let band = extract_band(&field, &window).unwrap();
        let plain = field.mean_over(DimensionKind::Latitude).unwrap();
        assert_eq!(band.data(), plain.data());
    }

    #[test]
    fn test_signed_longitudes_wrap() {
        let field = band_field(vec![0.0], vec![-170.0, -100.0, 0.0, 150.0]);
        let band = extract_band(&field, &default_enso_window()).unwrap();
        assert_eq!(band.longitudes().unwrap(), &[-170.0, -100.0, 150.0]);
    }

    #[test]
    fn test_window_outside_grid() {
        let field = band_field(vec![10.0, 20.0], vec![130.0]);
        let err = extract_band(&field, &default_enso_window()).unwrap_err();
        assert!(matches!(
            err,
            ClimateError::EmptyWindow {
                dimension: DimensionKind::Latitude,
                ..
            }
        ));

        let field = band_field(vec![0.0], vec![10.0, 20.0]);
        let err = extract_band(&field, &default_enso_window()).unwrap_err();
        assert!(err.to_string().contains("longitude window [120, 280]"));
    }

    #[test]
    fn test_enso_series_keeps_window() {
        let field = band_field(vec![0.0], vec![150.0]);
        let series = EnsoSeries::from_field(&field, default_enso_window()).unwrap();
        assert_eq!(series.window, default_enso_window());
        assert_eq!(series.field().shape(), &[1, 1]);
    }
}
