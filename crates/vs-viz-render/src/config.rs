use serde::Deserialize;

use crate::RenderError;
use crate::color::{BUPU_ZERO, BUPU5, Color, ramp_colors};
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub title: TitleConfig,
    pub colors: ColorsConfig,
    pub output: OutputConfig,
    pub histogram: HistogramConfig,
    pub corr: CorrConfig,
    pub choropleth: ChoroplethConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Vanstat.base_config()
    }
}

impl VizConfig {
    /// Resolve from an already-parsed YAML node (e.g. the `viz:` section of a
    /// pipeline config). `theme` selects the base preset; every other section
    /// present replaces the preset's section wholesale.
    pub fn from_yaml_value(doc: serde_yaml_ng::Value) -> crate::Result<Self> {
        if doc.is_null() {
            return Ok(Self::default());
        }
        let theme = doc.get("theme").and_then(|t| t.as_str()).unwrap_or("vanstat");
        let mut config = BuiltinTheme::parse(theme).base_config();
        let overlay: VizOverlay =
            serde_yaml_ng::from_value(doc).map_err(|e| RenderError::Config(e.to_string()))?;
        overlay.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would silently drop plots.
    pub fn validate(&self) -> crate::Result<()> {
        if self.histogram.bins == 0 {
            return Err(RenderError::Config("histogram.bins must be at least 1".into()));
        }
        Ok(())
    }
}

/// Sections a user file may override. Absent sections keep the preset.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VizOverlay {
    theme: Option<String>,
    figure: Option<FigureConfig>,
    font: Option<FontConfig>,
    axes: Option<AxesConfig>,
    grid: Option<GridConfig>,
    title: Option<TitleConfig>,
    colors: Option<ColorsConfig>,
    output: Option<OutputConfig>,
    histogram: Option<HistogramConfig>,
    corr: Option<CorrConfig>,
    choropleth: Option<ChoroplethConfig>,
}

impl VizOverlay {
    fn apply(self, c: &mut VizConfig) {
        if let Some(v) = self.theme {
            c.theme = v;
        }
        if let Some(v) = self.figure {
            c.figure = v;
        }
        if let Some(v) = self.font {
            c.font = v;
        }
        if let Some(v) = self.axes {
            c.axes = v;
        }
        if let Some(v) = self.grid {
            c.grid = v;
        }
        if let Some(v) = self.title {
            c.title = v;
        }
        if let Some(v) = self.colors {
            c.colors = v;
        }
        if let Some(v) = self.output {
            c.output = v;
        }
        if let Some(v) = self.histogram {
            c.histogram = v;
        }
        if let Some(v) = self.corr {
            c.corr = v;
        }
        if let Some(v) = self.choropleth {
            c.choropleth = v;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 720.0,  // 10" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 9.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub tick_length: f64,
    pub minor_ticks: bool,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "out".into(),
            tick_length: 4.0,
            minor_ticks: false,
            minor_tick_length: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
    pub width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::hex("#808080"), alpha: 0.6, width: 0.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub show: bool,
    pub size: f64,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self { show: true, size: 16.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub point: Color,
    pub point_alpha: f64,
    pub fit_line: Color,
    pub bar: Color,
    pub bar_edge: Color,
    pub box_fill: Color,
    pub median: Color,
    pub outlier: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            point: Color::hex("#0000ff"),
            point_alpha: 0.5,
            fit_line: Color::hex("#ff0000"),
            bar: Color::hex("#1f77b4"),
            bar_edge: Color::hex("#ffffff"),
            box_fill: Color::hex("#ffffff"),
            median: Color::hex("#ff7f0e"),
            outlier: Color::hex("#000000"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into(), dpi: 100 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { bins: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorrConfig {
    pub cmap: String,
    pub annotate: bool,
    pub lower_triangle: bool,
}

impl Default for CorrConfig {
    fn default() -> Self {
        Self { cmap: "coolwarm".into(), annotate: true, lower_triangle: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChoroplethConfig {
    /// Sequential ramp sampled for the positive-count bins.
    pub ramp: Vec<Color>,
    pub zero_color: Color,
    pub no_data_color: Color,
    pub fill_opacity: f64,
    pub line_opacity: f64,
    pub line_color: Color,
    pub tiles_url: String,
    pub tiles_attribution: String,
    pub leaflet_version: String,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            ramp: ramp_colors(BUPU5),
            zero_color: Color::hex(BUPU_ZERO),
            no_data_color: Color::hex("#bdbdbd"),
            fill_opacity: 0.75,
            line_opacity: 0.2,
            line_color: Color::hex("#000000"),
            tiles_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            tiles_attribution: "&copy; OpenStreetMap contributors".into(),
            leaflet_version: "1.9.4".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
        let doc: serde_yaml_ng::Value = match user_yaml {
            Some(yaml) => serde_yaml_ng::from_str(yaml).unwrap(),
            None => serde_yaml_ng::Value::Null,
        };
        VizConfig::from_yaml_value(doc)
    }

    #[test]
    fn defaults_match_map_styling() {
        let c = VizConfig::default();
        assert_eq!(c.theme, "vanstat");
        assert_eq!(c.choropleth.ramp.len(), 5);
        assert_eq!(c.choropleth.fill_opacity, 0.75);
        assert_eq!(c.choropleth.line_opacity, 0.2);
        assert_eq!(c.histogram.bins, 10);
    }

    #[test]
    fn theme_then_section_overrides() {
        let c = resolve_config(Some("theme: minimal\nhistogram:\n  bins: 25\n")).unwrap();
        assert_eq!(c.theme, "minimal");
        assert!(!c.grid.show);
        assert_eq!(c.histogram.bins, 25);

        let c = resolve_config(Some("figure:\n  width: 300\n")).unwrap();
        assert_eq!(c.figure.width, 300.0);
        assert_eq!(c.figure.height, 360.0);
        assert!(c.grid.show);
    }

    #[test]
    fn zero_histogram_bins_are_rejected() {
        let err = resolve_config(Some("histogram:\n  bins: 0\n")).unwrap_err();
        assert!(matches!(err, RenderError::Config(ref m) if m.contains("histogram.bins")));
        assert!(resolve_config(Some("histogram:\n  bins: 1\n")).is_ok());
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = resolve_config(Some("colours:\n  point: '#000000'\n")).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn colors_parse_from_hex_strings() {
        let c = resolve_config(Some("choropleth:\n  zero_color: '#ffffff'\n")).unwrap();
        assert_eq!(c.choropleth.zero_color, Color::rgb(255, 255, 255));
        assert_eq!(c.choropleth.fill_opacity, 0.75);
    }
}
