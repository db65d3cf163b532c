use vs_viz::CorrArtifact;

use crate::canvas::Canvas;
use crate::color::{self, Color};
use crate::config::VizConfig;
use crate::header::{draw_title, title_height};
use crate::layout::margins::PlotArea;
use crate::primitives::*;
use crate::text::measure_text;

/// Whether cell `(row, col)` is drawn.
fn visible(row: usize, col: usize, lower_triangle: bool) -> bool {
    !lower_triangle || row > col
}

pub fn render(artifact: &CorrArtifact, config: &VizConfig) -> crate::Result<String> {
    let n = artifact.names.len();
    if n == 0 || artifact.corr.len() != n || artifact.corr.iter().any(|r| r.len() != n) {
        return Err(crate::RenderError::Layout(format!(
            "correlation matrix must be {n}x{n} to match its names"
        )));
    }
    let cmap = color::diverging(&config.corr.cmap);
    let lower = artifact.lower_triangle && config.corr.lower_triangle;

    let cell_size = if n <= 12 { 44.0 } else { 22.0 };
    let label_size = config.font.tick_size * 0.9;
    let label_margin = artifact
        .names
        .iter()
        .map(|s| measure_text(s, label_size, FontWeight::Regular).width)
        .fold(0.0_f64, f64::max)
        + 10.0;
    let colorbar_w = 16.0;
    let colorbar_gap = 14.0;

    let matrix = cell_size * n as f64;
    let top = 16.0 + title_height(config);
    let fig_w = label_margin + matrix + colorbar_gap + colorbar_w + 50.0;
    let fig_h = top + matrix + label_margin + 10.0;

    let mut canvas = Canvas::new(fig_w, fig_h);
    let area = PlotArea::manual(label_margin + 10.0, top, matrix, matrix);
    draw_title(&mut canvas, &area, &artifact.title, config);

    let annotate = config.corr.annotate && n <= 20;
    for row in 0..n {
        for col in 0..n {
            if !visible(row, col, lower) {
                continue;
            }
            let x = area.left + col as f64 * cell_size;
            let y = area.top + row as f64 * cell_size;
            match artifact.corr[row][col] {
                Some(val) => {
                    let fill = cmap(val);
                    canvas.rect(x, y, cell_size, cell_size, &Style::filled(fill));
                    if annotate {
                        let text_color = if fill.luminance() < 0.5 {
                            Color::rgb(255, 255, 255)
                        } else {
                            Color::rgb(0, 0, 0)
                        };
                        let style = TextStyle {
                            size: (cell_size * 0.3).min(10.0),
                            color: text_color,
                            anchor: TextAnchor::Middle,
                            baseline: TextBaseline::Central,
                            ..Default::default()
                        };
                        let (cx, cy) = (x + cell_size / 2.0, y + cell_size / 2.0);
                        canvas.text(cx, cy, &format!("{val:.2}"), &style);
                    }
                }
                None => {
                    let empty = Style::stroked(Color::rgb(200, 200, 200), 0.5);
                    canvas.rect(x, y, cell_size, cell_size, &empty);
                }
            }
        }
    }

    // Row labels (left) and column labels (bottom, rotated). The lower
    // triangle never uses the first row or the last column.
    let row_style = TextStyle {
        size: label_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let col_style = TextStyle { size: label_size, anchor: TextAnchor::End, ..Default::default() };
    for (i, name) in artifact.names.iter().enumerate() {
        if !(lower && i == 0) {
            let y = area.top + (i as f64 + 0.5) * cell_size;
            canvas.text(area.left - 4.0, y, name, &row_style);
        }
        if !(lower && i == n - 1) {
            let x = area.left + (i as f64 + 0.5) * cell_size;
            canvas.text_rotated(x, area.bottom() + 6.0, name, &col_style, -45.0);
        }
    }

    // Colorbar, +1 at the top.
    let cb_x = area.right() + colorbar_gap;
    let cb_steps = 50;
    let cb_h = matrix / cb_steps as f64;
    for i in 0..cb_steps {
        let val = 1.0 - 2.0 * i as f64 / (cb_steps - 1) as f64;
        let y = area.top + i as f64 * cb_h;
        canvas.rect(cb_x, y, colorbar_w, cb_h + 0.5, &Style::filled(cmap(val)));
    }
    let cb_label = TextStyle {
        size: label_size,
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    canvas.text(cb_x + colorbar_w + 3.0, area.top, "1.0", &cb_label);
    canvas.text(cb_x + colorbar_w + 3.0, area.top + matrix / 2.0, "0.0", &cb_label);
    canvas.text(cb_x + colorbar_w + 3.0, area.bottom(), "\u{2212}1.0", &cb_label);

    Ok(canvas.finish_svg())
}
