//! Mock renderer for tests: deterministic HTML, no network.

use gdelt_types::{PlotRenderer, PlotSpec, RenderError};
use std::time::Duration;

/// Renders a `<div>` naming the function and embedding its parameters as JSON.
/// Can be slowed down or made to fail.
#[derive(Debug, Clone, Default)]
pub struct MockPlotRenderer {
    delay: Option<Duration>,
    failure: Option<String>,
}

impl MockPlotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// The HTML this mock produces for `spec`.
    pub fn expected_html(spec: &PlotSpec) -> String {
        let params = serde_json::to_string(&spec.parameters).unwrap_or_default();
        format!(
            "<div class=\"plot\" data-function=\"{}\" data-chart=\"{:?}\">{}</div>",
            spec.function, spec.chart, params
        )
    }
}

#[async_trait::async_trait]
impl PlotRenderer for MockPlotRenderer {
    async fn render(&self, spec: &PlotSpec) -> Result<String, RenderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref message) = self.failure {
            return Err(RenderError::Other(message.clone()));
        }
        Ok(Self::expected_html(spec))
    }
}
