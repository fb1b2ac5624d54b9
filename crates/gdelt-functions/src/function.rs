//! The analytic function abstraction and its renderer-backed implementation.

use async_trait::async_trait;
use gdelt_params::ParameterSpec;
use gdelt_types::{
    ChartKind, FunctionError, ParamValue, ParameterValues, PlotRenderer, PlotSpec, ValidationError,
};
use std::sync::Arc;

/// A named computation: parameters in, chart HTML out.
#[async_trait]
pub trait AnalyticFunction: Send + Sync {
    fn name(&self) -> &str;

    /// Name to display.
    fn label(&self) -> &str;

    fn description(&self) -> &str;

    fn chart(&self) -> ChartKind;

    /// Declared parameters, in form order.
    fn parameters(&self) -> &[ParameterSpec];

    /// Default value per parameter id.
    fn defaults(&self) -> &ParameterValues;

    /// Rules spanning several parameters; runs after each parameter passed on its own.
    fn check_params(&self, _params: &ParameterValues) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Produce the chart for already-validated parameters.
    async fn plot(&self, params: ParameterValues) -> Result<String, FunctionError>;
}

/// Cross-parameter rule of a [`PlotFunction`].
pub type ParamRule = fn(&ParameterValues) -> Result<(), ValidationError>;

/// Function defined by its metadata; plotting is delegated to a [`PlotRenderer`].
pub struct PlotFunction {
    name: String,
    label: String,
    description: String,
    chart: ChartKind,
    parameters: Vec<ParameterSpec>,
    defaults: ParameterValues,
    rule: Option<ParamRule>,
    renderer: Arc<dyn PlotRenderer>,
}

impl PlotFunction {
    pub fn new(name: &str, label: &str, chart: ChartKind, renderer: Arc<dyn PlotRenderer>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: String::new(),
            chart,
            parameters: Vec::new(),
            defaults: ParameterValues::new(),
            rule: None,
            renderer,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Declare a parameter and its default.
    pub fn with_param(mut self, spec: ParameterSpec, default: ParamValue) -> Self {
        self.defaults.insert(spec.id.clone(), default);
        self.parameters.push(spec);
        self
    }

    pub fn with_rule(mut self, rule: ParamRule) -> Self {
        self.rule = Some(rule);
        self
    }
}

#[async_trait]
impl AnalyticFunction for PlotFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn chart(&self) -> ChartKind {
        self.chart
    }

    fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    fn defaults(&self) -> &ParameterValues {
        &self.defaults
    }

    fn check_params(&self, params: &ParameterValues) -> Result<(), ValidationError> {
        match self.rule {
            Some(rule) => rule(params),
            None => Ok(()),
        }
    }

    async fn plot(&self, params: ParameterValues) -> Result<String, FunctionError> {
        let spec = PlotSpec {
            function: self.name.clone(),
            title: self.label.clone(),
            chart: self.chart,
            parameters: params,
        };
        tracing::debug!(function = %self.name, "rendering plot");
        Ok(self.renderer.render(&spec).await?)
    }
}
