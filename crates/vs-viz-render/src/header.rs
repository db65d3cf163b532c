use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Vertical space a title occupies above the plot area.
pub fn title_height(config: &VizConfig) -> f64 {
    if config.title.show { config.title.size + 14.0 } else { 0.0 }
}

/// Draw a centred figure title above `area`.
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, config: &VizConfig) {
    if !config.title.show || title.is_empty() {
        return;
    }
    let style = TextStyle {
        size: config.title.size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Alphabetic,
        ..Default::default()
    };
    canvas.text(area.left + area.width / 2.0, area.top - 8.0, title, &style);
}
