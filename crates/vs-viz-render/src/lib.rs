//! # vs-viz-render
//!
//! Renders `vs-viz` artifacts: SVG plots (PNG with the `png` feature) through
//! an immediate-mode [`canvas::Canvas`], and the choropleth as a standalone
//! Leaflet page.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod html;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use output::ImageFormat;
use thiserror::Error;

pub use html::render_choropleth_html;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// An artifact that renders to a single SVG figure.
pub trait SvgPlot {
    /// Plot kind, for logs.
    const KIND: &'static str;

    fn render_svg(&self, config: &VizConfig) -> Result<String>;
}

impl SvgPlot for vs_viz::ScatterFitArtifact {
    const KIND: &'static str = "scatter";

    fn render_svg(&self, config: &VizConfig) -> Result<String> {
        plots::scatter::render(self, config)
    }
}

impl SvgPlot for vs_viz::HistogramArtifact {
    const KIND: &'static str = "histogram";

    fn render_svg(&self, config: &VizConfig) -> Result<String> {
        plots::histogram::render(self, config)
    }
}

impl SvgPlot for vs_viz::BoxplotArtifact {
    const KIND: &'static str = "boxplot";

    fn render_svg(&self, config: &VizConfig) -> Result<String> {
        plots::boxplot::render(self, config)
    }
}

impl SvgPlot for vs_viz::CorrArtifact {
    const KIND: &'static str = "corr";

    fn render_svg(&self, config: &VizConfig) -> Result<String> {
        plots::corr::render(self, config)
    }
}

/// Render a plot to a file, format inferred from the extension (default SVG).
pub fn write_plot<P: SvgPlot>(plot: &P, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let format = ImageFormat::parse(ext)?;
    let bytes = output::encode(plot.render_svg(config)?, format, config.output.dpi)?;
    std::fs::write(path, bytes)?;
    tracing::debug!(kind = P::KIND, path = %path.display(), "wrote plot");
    Ok(())
}

/// Write the choropleth page to `path`.
pub fn write_choropleth(
    artifact: &vs_viz::ChoroplethArtifact,
    path: &Path,
    config: &VizConfig,
) -> Result<()> {
    std::fs::write(path, render_choropleth_html(artifact, config)?)?;
    tracing::debug!(path = %path.display(), units = artifact.units.len(), "wrote choropleth");
    Ok(())
}
