//! Theme presets. Each preset starts from the default sections and
//! adjusts the few it cares about.

use crate::color::Color;
use crate::config::{
    AxesConfig, ChoroplethConfig, ColorsConfig, CorrConfig, FigureConfig, FontConfig,
    GridConfig, HistogramConfig, OutputConfig, TitleConfig, VizConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    /// Screen defaults: outward ticks, light grid.
    Vanstat,
    /// Print figures: inward ticks with minors, no grid, darker marks.
    Paper,
    /// Small type, no title band.
    Minimal,
}

impl BuiltinTheme {
    /// Unknown names fall back to [`BuiltinTheme::Vanstat`].
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "paper" => Self::Paper,
            "minimal" => Self::Minimal,
            _ => Self::Vanstat,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vanstat => "vanstat",
            Self::Paper => "paper",
            Self::Minimal => "minimal",
        }
    }

    pub fn base_config(self) -> VizConfig {
        let mut cfg = VizConfig {
            theme: self.name().into(),
            figure: FigureConfig::default(),
            font: FontConfig::default(),
            axes: AxesConfig::default(),
            grid: GridConfig::default(),
            title: TitleConfig::default(),
            colors: ColorsConfig::default(),
            output: OutputConfig::default(),
            histogram: HistogramConfig::default(),
            corr: CorrConfig::default(),
            choropleth: ChoroplethConfig::default(),
        };
        match self {
            Self::Vanstat => {}
            Self::Paper => {
                cfg.figure = FigureConfig { width: 504.0, height: 324.0 };
                cfg.font = FontConfig { size: 11.0, label_size: 12.0, tick_size: 10.0 };
                cfg.axes = AxesConfig {
                    tick_direction: "in".into(),
                    tick_length: 5.0,
                    minor_ticks: true,
                    minor_tick_length: 3.0,
                };
                cfg.grid.show = false;
                cfg.title = TitleConfig { show: true, size: 13.0 };
                cfg.colors.point = Color::hex("#1f3b73");
                cfg.colors.fit_line = Color::hex("#b2182b");
                cfg.colors.bar = Color::hex("#4e79a7");
                cfg.output = OutputConfig { format: "svg".into(), dpi: 300 };
                cfg.corr.cmap = "rdbu_r".into();
            }
            Self::Minimal => {
                cfg.font = FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0 };
                cfg.axes.tick_length = 3.0;
                cfg.axes.minor_ticks = false;
                cfg.axes.minor_tick_length = 2.0;
                cfg.axes.tick_direction = "out".into();
                cfg.grid.show = false;
                cfg.title.show = false;
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_with_fallback() {
        assert_eq!(BuiltinTheme::parse("Paper"), BuiltinTheme::Paper);
        assert_eq!(BuiltinTheme::parse("nope"), BuiltinTheme::Vanstat);
        assert_eq!(BuiltinTheme::Paper.base_config().corr.cmap, "rdbu_r");
        assert!(!BuiltinTheme::Minimal.base_config().title.show);
        assert_eq!(BuiltinTheme::Minimal.base_config().theme, "minimal");
    }
}
