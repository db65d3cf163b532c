use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::title_height;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Blank space kept around everything drawn.
const EDGE: f64 = 15.0;
const RIGHT_EDGE: f64 = 20.0;
/// Space between tick labels and the axis label.
const LABEL_GAP: f64 = 6.0;
/// Smallest plot side kept when the canvas is crowded.
const MIN_SIDE: f64 = 50.0;

/// Data region of a plot, in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Size the margins to fit tick labels, axis labels, and the title band.
    pub fn auto(
        canvas: &Canvas,
        y_axis: Option<&Axis>,
        x_axis: Option<&Axis>,
        config: &VizConfig,
    ) -> Self {
        let tick = TextStyle { size: config.font.tick_size, ..Default::default() };
        let label_band = |axis: &Axis| {
            if axis.label.is_empty() { 0.0 } else { config.font.label_size + LABEL_GAP }
        };
        let tick_out = match config.axes.tick_direction.as_str() {
            "out" => config.axes.tick_length,
            _ => 0.0,
        };

        let left = EDGE
            + y_axis.map_or(0.0, |y| {
                let widest = y
                    .tick_labels
                    .iter()
                    .map(|l| canvas.measure_text(l, &tick).width)
                    .fold(0.0_f64, f64::max);
                widest + 8.0 + tick_out + label_band(y)
            });
        let bottom =
            EDGE + x_axis.map_or(0.0, |x| tick.size + LABEL_GAP + tick_out + label_band(x));
        let top = 12.0 + title_height(config);

        Self {
            left,
            top,
            width: (canvas.width - left - RIGHT_EDGE).max(MIN_SIDE),
            height: (canvas.height - top - bottom).max(MIN_SIDE),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_area_fits_inside_canvas() {
        let canvas = Canvas::new(720.0, 360.0);
        let config = VizConfig::default();
        let x = Axis::auto_linear(0.0, 10.0, 6).with_label("pop_density");
        let y = Axis::auto_linear(0.0, 1000.0, 5).with_label("crime_rate");
        let area = PlotArea::auto(&canvas, Some(&y), Some(&x), &config);
        assert!(area.left > 15.0);
        assert!(area.top >= title_height(&config));
        assert!(area.right() <= canvas.width);
        assert!(area.bottom() <= canvas.height);
    }
}
