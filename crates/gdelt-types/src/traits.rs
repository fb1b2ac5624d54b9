//! Collaborator traits and the shared error taxonomy.

use crate::ParameterValues;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of chart a function produces; tells the renderer what to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Choropleth,
    Heatmap,
    HeatmapTimeline,
    StackedArea,
}

/// Everything a renderer needs to produce one chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSpec {
    pub function: String,
    pub title: String,
    pub chart: ChartKind,
    pub parameters: ParameterValues,
}

/// Renderer: query the events warehouse and turn the result into chart HTML.
#[async_trait]
pub trait PlotRenderer: Send + Sync {
    /// Render one chart; returns an embeddable HTML fragment.
    async fn render(&self, spec: &PlotSpec) -> Result<String, RenderError>;
}

/// A rejected parameter value: description plus the parameter id to mark.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub parameter: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameter: parameter.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render error: {0}")]
    Other(String),
    #[error("render API error: {0}")]
    Api(String),
    #[error("empty response")]
    EmptyResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("invalid parameter {}: {}", .0.parameter, .0.message)]
    Validation(#[from] ValidationError),
    #[error("renderer: {0}")]
    Render(#[from] RenderError),
    #[error("function error: {0}")]
    Other(String),
}
