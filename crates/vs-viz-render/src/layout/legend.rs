use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::{LineStyle, MarkerStyle, Style, TextBaseline, TextStyle};

/// One legend row: a swatch and its label.
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

/// Swatch drawn in front of the label.
pub enum LegendKind {
    Line,
    Marker,
}

impl LegendEntry {
    pub fn marker(label: impl Into<String>, color: Color) -> Self {
        Self { label: label.into(), color, kind: LegendKind::Marker }
    }

    pub fn line(label: impl Into<String>, color: Color) -> Self {
        Self { label: label.into(), color, kind: LegendKind::Line }
    }
}

const SWATCH_W: f64 = 14.0;
const GAP: f64 = 6.0;
const PAD: f64 = 6.0;
const INSET: f64 = 5.0;

/// Boxed legend anchored to the top-left corner of the plot area.
pub fn draw_legend(canvas: &mut Canvas, area: &PlotArea, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let label_style =
        TextStyle { size: font_size * 0.85, baseline: TextBaseline::Central, ..Default::default() };
    let row_h = font_size + 4.0;
    let widest = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &label_style).width)
        .fold(0.0_f64, f64::max);

    let (x0, y0) = (area.left + INSET, area.top + INSET);
    let box_style = Style {
        fill: Some(Color::rgba(255, 255, 255, 0.85)),
        ..Style::stroked(Color::rgb(190, 190, 190), 0.5)
    };
    canvas.rect(
        x0,
        y0,
        2.0 * PAD + SWATCH_W + GAP + widest,
        2.0 * PAD + row_h * entries.len() as f64,
        &box_style,
    );

    for (row, entry) in entries.iter().enumerate() {
        let cy = y0 + PAD + row_h * (row as f64 + 0.5);
        let sx = x0 + PAD;
        match entry.kind {
            LegendKind::Line => {
                canvas.line(sx, cy, sx + SWATCH_W, cy, &LineStyle::solid(entry.color, 1.5))
            }
            LegendKind::Marker => canvas.marker(
                sx + SWATCH_W / 2.0,
                cy,
                &MarkerStyle { size: 3.0, color: entry.color, ..Default::default() },
            ),
        }
        canvas.text(sx + SWATCH_W + GAP, cy, &entry.label, &label_style);
    }
}
