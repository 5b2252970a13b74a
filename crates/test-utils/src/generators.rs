//! Test data generators for synthetic model precipitation.
//!
//! These generators create predictable, verifiable fields that can be used
//! across the test suite.

use chrono::{DateTime, TimeZone, Utc};
use climatology_common::{Dataset, Dimension, GriddedField, SOURCE_ID_ATTR};
use ndarray::ArrayD;

/// Units label of CMIP precipitation flux.
pub const FLUX_UNITS: &str = "kg m-2 s-1";

/// Creates monthly timestamps at 00:00 UTC on the 15th of each month.
///
/// # Example
///
/// ```
/// use chrono::Datelike;
/// use test_utils::monthly_times;
///
/// let times = monthly_times(2010, 14);
/// assert_eq!(times.len(), 14);
/// assert_eq!(times[12].year(), 2011);
/// assert_eq!(times[12].month(), 1);
/// ```
pub fn monthly_times(start_year: i32, months: usize) -> Vec<DateTime<Utc>> {
    (0..months)
        .map(|i| {
            let year = start_year + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            Utc.with_ymd_and_hms(year, month, 15, 0, 0, 0)
                .single()
                .unwrap_or_else(|| panic!("invalid date {year}-{month}-15"))
        })
        .collect()
}

/// Evenly spaced latitudes from -90 to 90 inclusive.
pub fn regular_latitudes(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![0.0];
    }
    (0..n)
        .map(|i| -90.0 + 180.0 * i as f64 / (n - 1) as f64)
        .collect()
}

/// Evenly spaced longitudes from 0 up to (not including) 360.
pub fn regular_longitudes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 360.0 * i as f64 / n as f64).collect()
}

/// Creates a (time, latitude, longitude) precipitation field.
///
/// `value` receives `(time index, latitude index, longitude index)`.
pub fn create_precip_field(
    times: Vec<DateTime<Utc>>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    units: &str,
    value: impl Fn(usize, usize, usize) -> f64,
) -> GriddedField {
    let shape = vec![times.len(), latitudes.len(), longitudes.len()];
    let data = ArrayD::from_shape_fn(shape, |idx| value(idx[0], idx[1], idx[2]));
    GriddedField::new(
        "pr",
        data,
        vec![
            Dimension::Time(times),
            Dimension::Latitude(latitudes),
            Dimension::Longitude(longitudes),
        ],
    )
    .unwrap_or_else(|e| panic!("generated field is malformed: {e}"))
    .with_units(units)
}

/// Creates a global field with the same value in every cell.
pub fn create_constant_field(
    months: usize,
    nlat: usize,
    nlon: usize,
    units: &str,
    value: f64,
) -> GriddedField {
    create_precip_field(
        monthly_times(2000, months),
        regular_latitudes(nlat),
        regular_longitudes(nlon),
        units,
        |_, _, _| value,
    )
}

/// Creates a global flux field with a deterministic pseudo-random pattern.
///
/// Values stay between 0 and 1e-4 kg m-2 s-1 (under 9 mm/day), with about a
/// quarter of the cells dry.
pub fn create_random_flux_field(months: usize, nlat: usize, nlon: usize, seed: u32) -> GriddedField {
    create_precip_field(
        monthly_times(2000, months),
        regular_latitudes(nlat),
        regular_longitudes(nlon),
        FLUX_UNITS,
        |t, i, j| {
            let hash = simple_hash(t as u32, (i * nlon + j) as u32, seed);
            if hash % 4 == 0 {
                0.0
            } else {
                (hash % 10_000) as f64 * 1e-8
            }
        },
    )
}

/// Wraps a field in a dataset with a `source_id` attribute.
pub fn create_dataset(field: GriddedField, source_id: &str) -> Dataset {
    Dataset::new()
        .with_attr(SOURCE_ID_ATTR, source_id)
        .with_variable(field)
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
