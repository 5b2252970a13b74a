//! In-memory dataset handle.

use std::collections::BTreeMap;

use crate::error::{ClimateError, ClimateResult};
use crate::field::GriddedField;

/// Dataset attribute naming the model that produced the output.
pub const SOURCE_ID_ATTR: &str = "source_id";

/// A loaded dataset: global attributes plus named variables.
///
/// Reading the dataset from disk happens elsewhere; this is what the
/// diagnostics receive once it is resident in memory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    attrs: BTreeMap<String, String>,
    variables: BTreeMap<String, GriddedField>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset-level attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Add a variable under its own name.
    pub fn with_variable(mut self, field: GriddedField) -> Self {
        self.variables.insert(field.name().to_string(), field);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Look up a dataset attribute, failing if it is absent.
    pub fn require_attr(&self, key: &str) -> ClimateResult<&str> {
        self.attr(key)
            .ok_or_else(|| ClimateError::missing_attribute("dataset", key))
    }

    /// Model identifier from the `source_id` attribute.
    pub fn source_id(&self) -> ClimateResult<&str> {
        self.require_attr(SOURCE_ID_ATTR)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> ClimateResult<&GriddedField> {
        self.variables
            .get(name)
            .ok_or_else(|| ClimateError::MissingVariable(name.to_string()))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}
