//! Name -> function table with schema and validation helpers.

use crate::AnalyticFunction;
use gdelt_types::{
    FunctionError, FunctionSchema, FunctionSummary, ParameterValues, ValidationError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered functions, in registration order.
#[derive(Default, Clone)]
pub struct FunctionCatalog {
    functions: Vec<Arc<dyn AnalyticFunction>>,
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function; one with the same name is replaced in place.
    pub fn register(&mut self, function: Arc<dyn AnalyticFunction>) {
        match self
            .functions
            .iter_mut()
            .find(|f| f.name() == function.name())
        {
            Some(slot) => *slot = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn AnalyticFunction>, FunctionError> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn describe(&self) -> Vec<FunctionSummary> {
        self.functions
            .iter()
            .map(|f| FunctionSummary {
                name: f.name().to_string(),
                label: f.label().to_string(),
                description: f.description().to_string(),
            })
            .collect()
    }

    pub fn schema(&self, name: &str) -> Result<FunctionSchema, FunctionError> {
        let function = self.get(name)?;
        let defaults = function.defaults();
        Ok(FunctionSchema {
            name: function.name().to_string(),
            label: function.label().to_string(),
            description: function.description().to_string(),
            chart: function.chart(),
            parameters: function
                .parameters()
                .iter()
                .map(|p| p.schema(defaults.get(&p.id)))
                .collect(),
        })
    }

    /// Validate raw form values for `name`.
    ///
    /// Unknown ids are rejected first, then each declared parameter is checked
    /// in form order, then the function's own cross-parameter rule runs.
    pub fn check_params(
        &self,
        name: &str,
        raw: &HashMap<String, Value>,
    ) -> Result<ParameterValues, FunctionError> {
        let function = self.get(name)?;
        let specs = function.parameters();

        let mut unknown: Vec<&String> = raw
            .keys()
            .filter(|k| !specs.iter().any(|s| &s.id == *k))
            .collect();
        unknown.sort();
        if let Some(id) = unknown.first() {
            return Err(ValidationError::new("Unknown parameter", id.as_str()).into());
        }

        let mut values = ParameterValues::new();
        for spec in specs {
            let raw_value = raw
                .get(&spec.id)
                .ok_or_else(|| ValidationError::new("Missing value", spec.id.as_str()))?;
            values.insert(spec.id.clone(), spec.validate(raw_value)?);
        }
        function.check_params(&values)?;
        Ok(values)
    }

    pub async fn plot(&self, name: &str, params: ParameterValues) -> Result<String, FunctionError> {
        self.get(name)?.plot(params).await
    }
}
