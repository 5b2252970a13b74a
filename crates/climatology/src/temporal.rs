//! Seasonal and annual climatologies.

use std::collections::BTreeMap;

use climatology_common::{
    year_of, ClimateError, ClimateResult, Dimension, DimensionKind, GriddedField, Season,
};

/// Mean over each meteorological season present in the time axis.
///
/// The time dimension is replaced by a season dimension in DJF, MAM, JJA,
/// SON order. Seasons without samples are left out.
pub fn seasonal_mean(field: &GriddedField) -> ClimateResult<GriddedField> {
    let times = field
        .times()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Time))?;

    let groups = group_indices(times.iter().map(Season::of));
    let seasons = groups.keys().copied().collect();
    let indices: Vec<Vec<usize>> = groups.into_values().collect();

    tracing::debug!(
        field = field.name(),
        samples = times.len(),
        seasons = indices.len(),
        "Computing seasonal mean"
    );
    field.group_mean(DimensionKind::Time, &indices, Dimension::Season(seasons))
}

/// Mean over each calendar year present in the time axis.
///
/// The time dimension is replaced by a year dimension in ascending order.
pub fn annual_mean(field: &GriddedField) -> ClimateResult<GriddedField> {
    let times = field
        .times()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Time))?;

    let groups = group_indices(times.iter().map(year_of));
    let years = groups.keys().copied().collect();
    let indices: Vec<Vec<usize>> = groups.into_values().collect();

    tracing::debug!(
        field = field.name(),
        samples = times.len(),
        years = indices.len(),
        "Computing annual mean"
    );
    field.group_mean(DimensionKind::Time, &indices, Dimension::Year(years))
}

/// Pick one season out of a seasonal climatology, dropping the season axis.
pub fn select_season(field: &GriddedField, season: Season) -> ClimateResult<GriddedField> {
    let seasons = field
        .seasons()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Season))?;
    let index = seasons
        .iter()
        .position(|&s| s == season)
        .ok_or_else(|| ClimateError::SeasonNotFound(season.to_string()))?;
    field.index(DimensionKind::Season, index)
}

/// Pick one year out of an annual-mean field, dropping the year axis.
pub fn select_year(field: &GriddedField, year: i32) -> ClimateResult<GriddedField> {
    let years = field
        .years()
        .ok_or(ClimateError::MissingDimension(DimensionKind::Year))?;
    let index = years
        .iter()
        .position(|&y| y == year)
        .ok_or(ClimateError::YearNotFound(year))?;
    field.index(DimensionKind::Year, index)
}

// Sample indices per key, keys in ascending order.
fn group_indices<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, Vec<usize>> {
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, key) in keys.enumerate() {
        groups.entry(key).or_default().push(i);
    }
    groups
}
