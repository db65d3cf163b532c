use vs_viz::HistogramArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;

pub fn render(artifact: &HistogramArtifact, config: &VizConfig) -> crate::Result<String> {
    let edges = &artifact.bin_edges;
    if edges.len() != artifact.counts.len() + 1 || artifact.counts.is_empty() {
        return Err(crate::RenderError::Layout(format!(
            "histogram needs counts.len() + 1 edges, got {} edges for {} bins",
            edges.len(),
            artifact.counts.len()
        )));
    }

    let mut canvas = Canvas::new(config.figure.width, config.figure.height);

    let x_min = edges[0];
    let x_max = edges[edges.len() - 1];
    let y_max = artifact.counts.iter().copied().max().unwrap_or(0) as f64;

    let x_axis = Axis::auto_linear(x_min, x_max, 7).with_label(&artifact.x_label);
    let y_axis = Axis::auto_linear(0.0, (y_max * 1.05).max(1.0), 6).with_label("count");

    let area = PlotArea::auto(&canvas, Some(&y_axis), Some(&x_axis), config);
    draw_title(&mut canvas, &area, &artifact.title, config);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let bar = Style::filled_stroked(config.colors.bar, config.colors.bar_edge, 0.6);
    let base = y_axis.data_to_pixel(0.0, area.bottom(), area.top);
    for (i, &count) in artifact.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let px_lo = x_axis.data_to_pixel(edges[i], area.left, area.right());
        let px_hi = x_axis.data_to_pixel(edges[i + 1], area.left, area.right());
        let py = y_axis.data_to_pixel(count as f64, area.bottom(), area.top);
        canvas.rect(px_lo, py, px_hi - px_lo, base - py, &bar);
    }

    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bar_per_nonempty_bin() {
        let art = HistogramArtifact::from_values(
            &[0.0, 0.1, 0.2, 2.0, 2.1, 5.0],
            5,
            "log_crime_rate",
            "Histogram for log_crime_rate in van".into(),
        )
        .unwrap();
        let nonempty = art.counts.iter().filter(|&&c| c > 0).count();
        let config = VizConfig::default();
        let svg = render(&art, &config).unwrap();
        let bar_fill = format!(r#"fill="{}""#, config.colors.bar.to_svg_fill());
        assert_eq!(svg.matches(&bar_fill).count(), nonempty);
    }

    #[test]
    fn mismatched_edges_are_a_layout_error() {
        let mut art =
            HistogramArtifact::from_values(&[1.0, 2.0], 2, "x", String::new()).unwrap();
        art.bin_edges.pop();
        assert!(matches!(render(&art, &VizConfig::default()), Err(crate::RenderError::Layout(_))));
    }
}
