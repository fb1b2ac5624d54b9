//! Plot renderer: HTTP client for the chart rendering service.

mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use gdelt_types::{PlotRenderer, PlotSpec, RenderError};
pub use http::HttpPlotRenderer;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockPlotRenderer;
