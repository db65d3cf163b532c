use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::{LineStyle, Style, TextAnchor, TextBaseline, TextStyle};

const FRAME: Color = Color::rgb(0, 0, 0);

#[derive(Clone, Copy)]
enum Edge {
    Bottom,
    Left,
}

/// Pixel position of `v` along `edge`, or `None` when it falls outside the frame.
fn project(edge: Edge, axis: &Axis, area: &PlotArea, v: f64) -> Option<f64> {
    let (px, lo, hi) = match edge {
        Edge::Bottom => (axis.data_to_pixel(v, area.left, area.right()), area.left, area.right()),
        Edge::Left => (axis.data_to_pixel(v, area.bottom(), area.top), area.top, area.bottom()),
    };
    (px >= lo - 0.5 && px <= hi + 0.5).then_some(px)
}

/// Tick mark of `len` at `px`; positive `len` points into the plot.
fn tick(canvas: &mut Canvas, edge: Edge, area: &PlotArea, px: f64, len: f64, style: &LineStyle) {
    match edge {
        Edge::Bottom => canvas.line(px, area.bottom(), px, area.bottom() - len, style),
        Edge::Left => canvas.line(area.left, px, area.left + len, px, style),
    }
}

/// Box frame, optional grid, major and minor ticks, tick labels, axis labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    let inward = config.axes.tick_direction == "in";
    let sign = if inward { 1.0 } else { -1.0 };
    let outward = if inward { 0.0 } else { config.axes.tick_length };
    let edges = [(Edge::Bottom, x_axis), (Edge::Left, y_axis)];

    if config.grid.show {
        let grid =
            LineStyle::solid(config.grid.color.with_alpha(config.grid.alpha), config.grid.width);
        for (edge, axis) in edges {
            for px in axis.tick_positions.iter().filter_map(|&v| project(edge, axis, area, v)) {
                match edge {
                    Edge::Bottom => canvas.line(px, area.top, px, area.bottom(), &grid),
                    Edge::Left => canvas.line(area.left, px, area.right(), px, &grid),
                }
            }
        }
    }

    canvas.rect(area.left, area.top, area.width, area.height, &Style::stroked(FRAME, 0.8));

    let x_ticks = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    let y_ticks = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    let major = LineStyle::solid(FRAME, 0.6);
    for (edge, axis) in edges {
        for (value, label) in axis.tick_positions.iter().zip(&axis.tick_labels) {
            let Some(px) = project(edge, axis, area, *value) else {
                continue;
            };
            tick(canvas, edge, area, px, sign * config.axes.tick_length, &major);
            match edge {
                Edge::Bottom => canvas.text(px, area.bottom() + outward + 3.0, label, &x_ticks),
                Edge::Left => canvas.text(area.left - outward - 4.0, px, label, &y_ticks),
            }
        }
    }

    if config.axes.minor_ticks {
        let minor = LineStyle::solid(FRAME, 0.4);
        for (edge, axis) in edges {
            for px in axis.minor_ticks.iter().filter_map(|&v| project(edge, axis, area, v)) {
                tick(canvas, edge, area, px, sign * config.axes.minor_tick_length, &minor);
            }
        }
    }

    let title = TextStyle {
        size: config.font.label_size,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let y = area.bottom() + outward + config.font.tick_size + 16.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &title);
    }
    if !y_axis.label.is_empty() {
        // Clear the widest tick label so the rotated title never overlaps it.
        let widest = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_ticks).width)
            .fold(0.0_f64, f64::max);
        let x = area.left - outward - widest - 12.0;
        canvas.text_rotated(x, area.top + area.height / 2.0, &y_axis.label, &title, -90.0);
    }
}
