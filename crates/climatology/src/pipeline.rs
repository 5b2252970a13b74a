//! End-to-end climatology run over one dataset.

use climatology_common::{ClimateError, ClimateResult, Dataset, GriddedField, Season};

use crate::config::{ClimatologyConfig, MaskRegion};
use crate::equatorial::EnsoSeries;
use crate::mask::{CountryBoundaryProvider, SpatialMasker};
use crate::report::ClimatologyReport;
use crate::temporal::{annual_mean, seasonal_mean, select_season};
use crate::types::CacheStats;
use crate::units::UnitConverter;
use crate::zonal::ZonalProfile;

/// Seasonal climatology map in mm/day, with its display settings.
#[derive(Debug, Clone)]
pub struct SeasonalClimatology {
    /// Latitude x longitude grid.
    pub field: GriddedField,
    pub season: Season,
    /// Model name from the dataset's `source_id`.
    pub model: String,
    pub mask_region: Option<MaskRegion>,
    pub colorbar_levels: Vec<f64>,
    pub plot_gridlines: bool,
}

impl SeasonalClimatology {
    pub fn title(&self) -> String {
        format!("{} precipitation climatology ({})", self.model, self.season)
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ClimatologyOutputs {
    pub seasonal: SeasonalClimatology,
    pub report: ClimatologyReport,
    pub zonal: ZonalProfile,
    pub enso: EnsoSeries,
}

/// The variable, its declared units and the model name, resolved up front
/// from a validated configuration.
struct Inputs<'a> {
    field: &'a GriddedField,
    units: &'a str,
    model: &'a str,
}

fn resolve<'a>(dataset: &'a Dataset, config: &ClimatologyConfig) -> ClimateResult<Inputs<'a>> {
    config.validate()?;
    let field = dataset.variable(&config.variable)?;
    let units = field.units().ok_or_else(|| {
        ClimateError::missing_attribute(format!("variable '{}'", config.variable), "units")
    })?;
    let model = dataset.source_id()?;
    Ok(Inputs {
        field,
        units,
        model,
    })
}

/// Runs the diagnostics for a dataset.
///
/// The country mask cache lives as long as the pipeline, so reusing one
/// pipeline across datasets on the same grid asks the provider only once.
pub struct ClimatologyPipeline<P> {
    masker: SpatialMasker<P>,
    converter: UnitConverter,
}

impl<P: CountryBoundaryProvider> ClimatologyPipeline<P> {
    pub fn new(provider: P) -> Self {
        Self::with_parts(SpatialMasker::new(provider), UnitConverter::default())
    }

    pub fn with_parts(masker: SpatialMasker<P>, converter: UnitConverter) -> Self {
        Self { masker, converter }
    }

    pub fn masker(&self) -> &SpatialMasker<P> {
        &self.masker
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    pub fn mask_cache_stats(&self) -> CacheStats {
        self.masker.cache_stats()
    }

    /// Produce all four outputs. The first error aborts the run.
    ///
    /// Configuration, the variable, its units and the `source_id` attribute
    /// are all checked before any numeric work.
    pub fn run(
        &self,
        dataset: &Dataset,
        config: &ClimatologyConfig,
    ) -> ClimateResult<ClimatologyOutputs> {
        let inputs = resolve(dataset, config)?;

        tracing::info!(
            model = inputs.model,
            variable = %config.variable,
            units = inputs.units,
            season = %config.season,
            countries = config.countries.len(),
            "Starting climatology run"
        );

        let outputs = ClimatologyOutputs {
            seasonal: self.seasonal_from(&inputs, config)?,
            report: self.report_from(&inputs, config)?,
            zonal: ZonalProfile::from_field(inputs.field)?,
            enso: EnsoSeries::from_field(inputs.field, config.enso_window)?,
        };

        tracing::info!(model = inputs.model, "Climatology run complete");
        Ok(outputs)
    }

    /// Seasonal-mean map for the configured season, in mm/day.
    pub fn seasonal_climatology(
        &self,
        dataset: &Dataset,
        config: &ClimatologyConfig,
    ) -> ClimateResult<SeasonalClimatology> {
        let inputs = resolve(dataset, config)?;
        self.seasonal_from(&inputs, config)
    }

    /// Annual average per configured country, in mm/day.
    pub fn country_report(
        &self,
        dataset: &Dataset,
        config: &ClimatologyConfig,
    ) -> ClimateResult<ClimatologyReport> {
        let inputs = resolve(dataset, config)?;
        self.report_from(&inputs, config)
    }

    /// Zonal mean of the variable in its native units.
    pub fn zonal_profile(
        &self,
        dataset: &Dataset,
        config: &ClimatologyConfig,
    ) -> ClimateResult<ZonalProfile> {
        let inputs = resolve(dataset, config)?;
        ZonalProfile::from_field(inputs.field)
    }

    /// Equatorial band of the variable in its native units.
    pub fn enso_series(
        &self,
        dataset: &Dataset,
        config: &ClimatologyConfig,
    ) -> ClimateResult<EnsoSeries> {
        let inputs = resolve(dataset, config)?;
        EnsoSeries::from_field(inputs.field, config.enso_window)
    }

    fn seasonal_from(
        &self,
        inputs: &Inputs<'_>,
        config: &ClimatologyConfig,
    ) -> ClimateResult<SeasonalClimatology> {
        let seasonal = seasonal_mean(inputs.field)?;
        let seasonal = self.converter.convert(&seasonal, inputs.units)?;
        Ok(SeasonalClimatology {
            field: select_season(&seasonal, config.season)?,
            season: config.season,
            model: inputs.model.to_string(),
            mask_region: config.mask_region,
            colorbar_levels: config.effective_colorbar_levels(),
            plot_gridlines: config.plot_gridlines,
        })
    }

    fn report_from(
        &self,
        inputs: &Inputs<'_>,
        config: &ClimatologyConfig,
    ) -> ClimateResult<ClimatologyReport> {
        let annual = annual_mean(inputs.field)?;
        let annual = self.converter.convert(&annual, inputs.units)?;
        self.masker.country_report(&annual, &config.countries)
    }
}
