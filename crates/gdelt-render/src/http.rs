//! HTTP client for a chart rendering service.

use gdelt_types::{PlotRenderer, PlotSpec, RenderError};

/// Renderer that POSTs the plot spec as JSON and takes the response body as HTML.
pub struct HttpPlotRenderer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpPlotRenderer {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
        }
    }

    pub fn from_env() -> Self {
        let url = std::env::var("GDELT_RENDER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8050/render".to_string());
        let api_key = std::env::var("GDELT_RENDER_API_KEY").ok();
        Self::new(url, api_key)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl PlotRenderer for HttpPlotRenderer {
    async fn render(&self, spec: &PlotSpec) -> Result<String, RenderError> {
        let mut req = self.client.post(&self.url).json(spec);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        let res = req
            .send()
            .await
            .map_err(|e| RenderError::Other(e.to_string()))?;
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| RenderError::Other(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(function = %spec.function, %status, "render service rejected plot");
            return Err(RenderError::Api(format!("{}: {}", status, body)));
        }
        if body.trim().is_empty() {
            return Err(RenderError::EmptyResponse);
        }
        Ok(body)
    }
}
