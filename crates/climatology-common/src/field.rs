//! Labeled gridded fields.
//!
//! A [`GriddedField`] is an immutable `f64` array over named dimensions.
//! Every transformation returns a new field; the input is only borrowed.
//! Missing or masked cells are stored as `NaN` and skipped by every mean.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

use crate::error::{ClimateError, ClimateResult};
use crate::grid::{Dimension, DimensionKind, LatLonGrid};
use crate::time::Season;

/// A numeric array over named coordinate axes, with units and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedField {
    name: String,
    data: ArrayD<f64>,
    dims: Vec<Dimension>,
    units: Option<String>,
    attrs: BTreeMap<String, String>,
}

impl GriddedField {
    /// Create a field, checking the array shape against the coordinates.
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<f64>,
        dims: Vec<Dimension>,
    ) -> ClimateResult<Self> {
        check_layout(data.shape(), &dims)?;
        Ok(Self {
            name: name.into(),
            data,
            dims,
            units: None,
            attrs: BTreeMap::new(),
        })
    }

    /// Create a field from row-major values.
    pub fn from_vec(
        name: impl Into<String>,
        values: Vec<f64>,
        dims: Vec<Dimension>,
    ) -> ClimateResult<Self> {
        let shape: Vec<usize> = dims.iter().map(Dimension::len).collect();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        Self::new(name, data, dims)
    }

    /// Set the units label.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Add a free-form attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Dimension kinds in axis order.
    pub fn dim_kinds(&self) -> Vec<DimensionKind> {
        self.dims.iter().map(Dimension::kind).collect()
    }

    /// Axis index of a dimension, if present.
    pub fn axis(&self, kind: DimensionKind) -> Option<usize> {
        self.dims.iter().position(|d| d.kind() == kind)
    }

    /// Axis index of a dimension, failing if it is absent.
    pub fn require_axis(&self, kind: DimensionKind) -> ClimateResult<usize> {
        self.axis(kind).ok_or(ClimateError::MissingDimension(kind))
    }

    pub fn dimension(&self, kind: DimensionKind) -> Option<&Dimension> {
        self.dims.iter().find(|d| d.kind() == kind)
    }

    pub fn times(&self) -> Option<&[DateTime<Utc>]> {
        match self.dimension(DimensionKind::Time) {
            Some(Dimension::Time(v)) => Some(v),
            _ => None,
        }
    }

    pub fn seasons(&self) -> Option<&[Season]> {
        match self.dimension(DimensionKind::Season) {
            Some(Dimension::Season(v)) => Some(v),
            _ => None,
        }
    }

    pub fn years(&self) -> Option<&[i32]> {
        match self.dimension(DimensionKind::Year) {
            Some(Dimension::Year(v)) => Some(v),
            _ => None,
        }
    }

    pub fn latitudes(&self) -> Option<&[f64]> {
        match self.dimension(DimensionKind::Latitude) {
            Some(Dimension::Latitude(v)) => Some(v),
            _ => None,
        }
    }

    pub fn longitudes(&self) -> Option<&[f64]> {
        match self.dimension(DimensionKind::Longitude) {
            Some(Dimension::Longitude(v)) => Some(v),
            _ => None,
        }
    }

    /// The horizontal grid, requiring both latitude and longitude axes.
    pub fn grid(&self) -> ClimateResult<LatLonGrid> {
        let lats = self
            .latitudes()
            .ok_or(ClimateError::MissingDimension(DimensionKind::Latitude))?;
        let lons = self
            .longitudes()
            .ok_or(ClimateError::MissingDimension(DimensionKind::Longitude))?;
        Ok(LatLonGrid::new(lats.to_vec(), lons.to_vec()))
    }

    /// Smallest and largest non-NaN values, or `None` if every cell is NaN.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of non-NaN cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Mean over every non-NaN cell; NaN when there are none.
    pub fn nanmean(&self) -> f64 {
        let (sum, n) = self
            .data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
        if n == 0 {
            f64::NAN
        } else {
            sum / n as f64
        }
    }

    /// A new field with `f` applied to every value. Metadata is copied.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.mapv(f),
            ..self.clone()
        }
    }

    /// A new field with the same coordinates and metadata but different values.
    pub fn with_data(&self, data: ArrayD<f64>) -> ClimateResult<Self> {
        check_layout(data.shape(), &self.dims)?;
        Ok(Self {
            name: self.name.clone(),
            data,
            dims: self.dims.clone(),
            units: self.units.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Keep only the samples at `indices` along one dimension.
    pub fn select(&self, kind: DimensionKind, indices: &[usize]) -> ClimateResult<Self> {
        let ax = self.require_axis(kind)?;
        let len = self.dims[ax].len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(ClimateError::invalid_shape(format!(
                "index {} out of range for {} axis of length {}",
                bad, kind, len
            )));
        }

        let mut dims = self.dims.clone();
        dims[ax] = self.dims[ax].select(indices);
        Ok(Self {
            data: self.data.select(Axis(ax), indices),
            dims,
            ..self.metadata_only()
        })
    }

    /// Take one sample along a dimension, dropping that dimension.
    pub fn index(&self, kind: DimensionKind, index: usize) -> ClimateResult<Self> {
        let ax = self.require_axis(kind)?;
        let len = self.dims[ax].len();
        if index >= len {
            return Err(ClimateError::invalid_shape(format!(
                "index {} out of range for {} axis of length {}",
                index, kind, len
            )));
        }

        let mut dims = self.dims.clone();
        dims.remove(ax);
        Ok(Self {
            data: self.data.index_axis(Axis(ax), index).to_owned(),
            dims,
            ..self.metadata_only()
        })
    }

    /// Average along a dimension (NaN skipped), dropping that dimension.
    pub fn mean_over(&self, kind: DimensionKind) -> ClimateResult<Self> {
        let ax = self.require_axis(kind)?;
        let mut dims = self.dims.clone();
        dims.remove(ax);
        Ok(Self {
            data: nanmean_axis(self.data.view(), Axis(ax)),
            dims,
            ..self.metadata_only()
        })
    }

    /// Average groups of samples along a dimension.
    ///
    /// `groups[g]` lists the indices averaged into output position `g`; the
    /// dimension is replaced by `grouped`, which must have one coordinate per
    /// group.
    pub fn group_mean(
        &self,
        kind: DimensionKind,
        groups: &[Vec<usize>],
        grouped: Dimension,
    ) -> ClimateResult<Self> {
        let ax = self.require_axis(kind)?;
        if grouped.len() != groups.len() {
            return Err(ClimateError::invalid_shape(format!(
                "{} groups but {} {} coordinates",
                groups.len(),
                grouped.len(),
                grouped.kind()
            )));
        }

        let mut shape = self.data.shape().to_vec();
        shape[ax] = groups.len();
        let mut out = ArrayD::from_elem(IxDyn(&shape), f64::NAN);

        for (g, indices) in groups.iter().enumerate() {
            let members = self.select(kind, indices)?;
            let reduced = nanmean_axis(members.data.view(), Axis(ax));
            out.index_axis_mut(Axis(ax), g).assign(&reduced);
        }

        let mut dims = self.dims.clone();
        dims[ax] = grouped;
        Ok(Self {
            data: out,
            dims,
            ..self.metadata_only()
        })
    }

    /// Reorder axes so that they follow `order`.
    pub fn transpose(&self, order: &[DimensionKind]) -> ClimateResult<Self> {
        if order.len() != self.dims.len() {
            return Err(ClimateError::invalid_shape(format!(
                "transpose order {:?} does not match dimensions {:?}",
                order,
                self.dim_kinds()
            )));
        }
        let perm = order
            .iter()
            .map(|&k| self.require_axis(k))
            .collect::<ClimateResult<Vec<_>>>()?;

        let dims = perm.iter().map(|&ax| self.dims[ax].clone()).collect();
        let data = self
            .data
            .view()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();
        Ok(Self {
            data,
            dims,
            ..self.metadata_only()
        })
    }

    fn metadata_only(&self) -> Self {
        Self {
            name: self.name.clone(),
            data: ArrayD::zeros(IxDyn(&[])),
            dims: Vec::new(),
            units: self.units.clone(),
            attrs: self.attrs.clone(),
        }
    }
}

/// Mean along an axis, skipping NaN. All-NaN lanes yield NaN.
pub fn nanmean_axis(data: ArrayViewD<'_, f64>, axis: Axis) -> ArrayD<f64> {
    data.fold_axis(axis, (0.0, 0usize), |&(sum, n), &x| {
        if x.is_nan() {
            (sum, n)
        } else {
            (sum + x, n + 1)
        }
    })
    .mapv(|(sum, n)| if n == 0 { f64::NAN } else { sum / n as f64 })
}

fn check_layout(shape: &[usize], dims: &[Dimension]) -> ClimateResult<()> {
    if shape.len() != dims.len() {
        return Err(ClimateError::invalid_shape(format!(
            "array has {} axes but {} dimensions were declared",
            shape.len(),
            dims.len()
        )));
    }

    for (i, dim) in dims.iter().enumerate() {
        if shape[i] != dim.len() {
            return Err(ClimateError::invalid_shape(format!(
                "{} axis has length {} but {} coordinates",
                dim.kind(),
                shape[i],
                dim.len()
            )));
        }
        if dims[..i].iter().any(|d| d.kind() == dim.kind()) {
            return Err(ClimateError::invalid_shape(format!(
                "dimension {} declared more than once",
                dim.kind()
            )));
        }
    }

    Ok(())
}
