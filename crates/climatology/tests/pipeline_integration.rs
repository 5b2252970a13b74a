//! End-to-end tests of the climatology pipeline on synthetic datasets.

use std::sync::atomic::{AtomicUsize, Ordering};

use climatology::{
    ClimateError, ClimateResult, ClimatologyConfig, ClimatologyPipeline, CountryBoundaryProvider,
    CountryCodeGrid, CountryEntry, DimensionKind, ErrorKind, LatLonGrid, RegionBoxProvider,
    Season, SECONDS_PER_DAY,
};
use test_utils::{
    assert_all_approx_eq, assert_approx_eq, bbox, create_dataset, create_precip_field,
    create_random_flux_field, models, monthly_times, uk_2x2_dataset, FLUX_UNITS,
};

/// Provider that counts how often it is asked for a grid.
struct CountingProvider {
    inner: RegionBoxProvider,
    calls: AtomicUsize,
}

impl CountingProvider {
    fn new() -> Self {
        Self {
            inner: europe_provider(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CountryBoundaryProvider for CountingProvider {
    fn country_grid(&self, grid: &LatLonGrid) -> ClimateResult<CountryCodeGrid> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.country_grid(grid)
    }
}

fn europe_provider() -> RegionBoxProvider {
    RegionBoxProvider::new()
        .with_region("GB", bbox::UNITED_KINGDOM)
        .with_region("FR", bbox::FRANCE)
}

// =============================================================================
// Country Report
// =============================================================================

#[test]
fn test_single_uk_cell_report_line() {
    let pipeline = ClimatologyPipeline::new(europe_provider());
    let dataset = uk_2x2_dataset("mm/day", 2.0);

    let outputs = pipeline
        .run(&dataset, &ClimatologyConfig::default())
        .unwrap();

    assert_eq!(
        outputs.report.to_string(),
        "United Kingdom            2010 : 2.000 mm/day\n\n"
    );
    assert_approx_eq!(outputs.report.value("United Kingdom", 2010).unwrap(), 2.0, 1e-12);
}

#[test]
fn test_flux_units_converted_before_averaging() {
    let pipeline = ClimatologyPipeline::new(europe_provider());
    let dataset = uk_2x2_dataset(FLUX_UNITS, 2.0 / SECONDS_PER_DAY);

    let report = pipeline
        .country_report(&dataset, &ClimatologyConfig::default())
        .unwrap();

    assert_approx_eq!(report.value("United Kingdom", 2010).unwrap(), 2.0, 1e-9);
    assert!(report.to_string().contains("2010 : 2.000 mm/day"));
}

#[test]
fn test_report_follows_caller_order_then_year() {
    // 24 months over 2010-2011; GB at (55, -2), FR at (47, -2)
    let field = create_precip_field(
        monthly_times(2010, 24),
        vec![0.0, 47.0, 55.0],
        vec![-2.0, 150.0],
        "mm/day",
        |t, i, j| match (i, j) {
            (1, 0) => 3.0 + (t / 12) as f64,
            (2, 0) => 1.0 + (t / 12) as f64,
            _ => 0.0,
        },
    );
    let dataset = create_dataset(field, "ACCESS-CM2");
    let config = ClimatologyConfig {
        countries: vec![
            CountryEntry::new("France", "FR"),
            CountryEntry::new("United Kingdom", "GB"),
        ],
        ..Default::default()
    };

    let report = ClimatologyPipeline::new(europe_provider())
        .country_report(&dataset, &config)
        .unwrap();

    let entries: Vec<(String, i32, f64)> = report
        .entries()
        .map(|(name, year, value)| (name.to_string(), year, value))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("France".to_string(), 2010, 3.0),
            ("France".to_string(), 2011, 4.0),
            ("United Kingdom".to_string(), 2010, 1.0),
            ("United Kingdom".to_string(), 2011, 2.0),
        ]
    );

    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "France                    2010 : 3.000 mm/day");
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "United Kingdom            2010 : 1.000 mm/day");
}

#[test]
fn test_unknown_country_fails_run() {
    let config = ClimatologyConfig {
        countries: vec![CountryEntry::new("Atlantis", "AT")],
        ..Default::default()
    };
    let err = ClimatologyPipeline::new(europe_provider())
        .run(&uk_2x2_dataset("mm/day", 2.0), &config)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(matches!(err, ClimateError::CountryNotFound { ref code, .. } if code == "AT"));
}

// =============================================================================
// Input Checks
// =============================================================================

#[test]
fn test_missing_source_id_fails_before_provider() {
    let provider = CountingProvider::new();
    let pipeline = ClimatologyPipeline::new(provider);
    let dataset = climatology::Dataset::new().with_variable(
        uk_2x2_dataset("mm/day", 2.0)
            .variable("pr")
            .unwrap()
            .clone(),
    );

    let err = pipeline
        .run(&dataset, &ClimatologyConfig::default())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("source_id"));
    assert_eq!(pipeline.masker().provider().calls(), 0);
}

#[test]
fn test_implausible_values_rejected() {
    let pipeline = ClimatologyPipeline::new(europe_provider());
    // 0.025 kg m-2 s-1 is 2160 mm/day
    let err = pipeline
        .run(&uk_2x2_dataset(FLUX_UNITS, 0.025), &ClimatologyConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // 0.023 kg m-2 s-1 is 1987.2 mm/day
    assert!(pipeline
        .run(&uk_2x2_dataset(FLUX_UNITS, 0.023), &ClimatologyConfig::default())
        .is_ok());
}

#[test]
fn test_negative_values_rejected() {
    let err = ClimatologyPipeline::new(europe_provider())
        .seasonal_climatology(
            &uk_2x2_dataset(FLUX_UNITS, -0.001),
            &ClimatologyConfig::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ClimateError::NegativePrecipitation { .. }));
}

#[test]
fn test_unknown_units_rejected() {
    let err = ClimatologyPipeline::new(europe_provider())
        .run(&uk_2x2_dataset("inches", 1.0), &ClimatologyConfig::default())
        .unwrap_err();
    assert!(err.to_string().contains("'inches'"));
}

// =============================================================================
// Mask Cache
// =============================================================================

#[test]
fn test_mask_built_once_across_runs() {
    let pipeline = ClimatologyPipeline::new(CountingProvider::new());
    let config = ClimatologyConfig::default();

    pipeline.run(&uk_2x2_dataset("mm/day", 2.0), &config).unwrap();
    pipeline.run(&uk_2x2_dataset("mm/day", 3.0), &config).unwrap();

    assert_eq!(pipeline.masker().provider().calls(), 1);
    let stats = pipeline.mask_cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

// =============================================================================
// Seasonal, Zonal and ENSO Outputs
// =============================================================================

#[test]
fn test_seasonal_climatology_matches_month_means() {
    let field = create_random_flux_field(12, 5, 8, 7);
    let dataset = create_dataset(field.clone(), models::CSIRO_MK3);
    let config = ClimatologyConfig {
        season: Season::Djf,
        plot_gridlines: true,
        ..Default::default()
    };

    let seasonal = ClimatologyPipeline::new(europe_provider())
        .seasonal_climatology(&dataset, &config)
        .unwrap();

    assert_eq!(
        seasonal.field.dim_kinds(),
        vec![DimensionKind::Latitude, DimensionKind::Longitude]
    );
    assert_eq!(seasonal.field.units(), Some("mm/day"));
    assert_eq!(
        seasonal.title(),
        format!("{} precipitation climatology (DJF)", models::CSIRO_MK3)
    );
    assert!(seasonal.plot_gridlines);
    assert_eq!(seasonal.colorbar_levels.first(), Some(&0.0));
    assert_eq!(seasonal.colorbar_levels.last(), Some(&12.0));

    let raw = field.data();
    for i in 0..5 {
        for j in 0..8 {
            let expected =
                (raw[[0, i, j]] + raw[[1, i, j]] + raw[[11, i, j]]) / 3.0 * SECONDS_PER_DAY;
            assert_approx_eq!(seasonal.field.data()[[i, j]], expected, 1e-9);
        }
    }
}

#[test]
fn test_missing_season_is_lookup_error() {
    let field = create_precip_field(
        monthly_times(2010, 3),
        vec![0.0],
        vec![150.0],
        "mm/day",
        |_, _, _| 1.0,
    );
    let config = ClimatologyConfig {
        season: Season::Son,
        ..Default::default()
    };
    let err = ClimatologyPipeline::new(europe_provider())
        .seasonal_climatology(&create_dataset(field, "ACCESS-CM2"), &config)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn test_zonal_and_enso_outputs() {
    let dataset = uk_2x2_dataset("mm/day", 2.0);
    let outputs = ClimatologyPipeline::new(europe_provider())
        .run(&dataset, &ClimatologyConfig::default())
        .unwrap();

    let zonal = outputs.zonal.field();
    assert_eq!(
        zonal.dim_kinds(),
        vec![DimensionKind::Time, DimensionKind::Latitude]
    );
    // Latitude 55: one wet cell of 2.0 and one dry cell
    assert_all_approx_eq!(
        zonal.data().iter().skip(1).step_by(2),
        vec![1.0; 12],
        1e-12
    );

    let hovmoller = outputs.zonal.hovmoller().unwrap();
    assert_eq!(hovmoller.shape(), &[2, 12]);

    let enso = outputs.enso.field();
    assert_eq!(
        enso.dim_kinds(),
        vec![DimensionKind::Time, DimensionKind::Longitude]
    );
    assert_eq!(enso.longitudes().unwrap(), &[150.0]);
    assert_all_approx_eq!(enso.data().iter(), vec![0.0; 12], 0.0);
}
