use vs_viz::BoxplotArtifact;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;

/// Horizontal boxplot. With `notch` set the box is pinched to the median
/// confidence interval, clamped to the quartiles.
pub fn render(artifact: &BoxplotArtifact, config: &VizConfig) -> crate::Result<String> {
    let s = &artifact.stats;
    let mut canvas = Canvas::new(config.figure.width, config.figure.height);

    let lo = s.min.min(s.notch_lo);
    let hi = s.max.max(s.notch_hi);
    let x_axis = Axis::from_data([lo, hi], 0.05, 7).with_label(&artifact.label);
    let y_axis = Axis::fixed(0.0, 1.0);

    let area = PlotArea::auto(&canvas, None, Some(&x_axis), config);
    draw_title(&mut canvas, &area, &artifact.title, config);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let px = |v: f64| x_axis.data_to_pixel(v, area.left, area.right());
    let cy = area.top + area.height / 2.0;
    let half = area.height * 0.2;
    let black = LineStyle::solid(Color::rgb(0, 0, 0), 1.0);

    // Whiskers and caps.
    canvas.line(px(s.whisker_lo), cy, px(s.q1), cy, &black);
    canvas.line(px(s.q3), cy, px(s.whisker_hi), cy, &black);
    for w in [s.whisker_lo, s.whisker_hi] {
        canvas.line(px(w), cy - half / 2.0, px(w), cy + half / 2.0, &black);
    }

    let box_style = Style::filled_stroked(config.colors.box_fill, Color::rgb(0, 0, 0), 1.0);
    if artifact.notch {
        let n_lo = s.notch_lo.max(s.q1);
        let n_hi = s.notch_hi.min(s.q3);
        let pinch = half * 0.5;
        let outline = [
            (px(s.q1), cy - half),
            (px(n_lo), cy - half),
            (px(s.median), cy - pinch),
            (px(n_hi), cy - half),
            (px(s.q3), cy - half),
            (px(s.q3), cy + half),
            (px(n_hi), cy + half),
            (px(s.median), cy + pinch),
            (px(n_lo), cy + half),
            (px(s.q1), cy + half),
        ];
        canvas.polygon(&outline, &box_style);
        let median = LineStyle::solid(config.colors.median, 1.5);
        canvas.line(px(s.median), cy - pinch, px(s.median), cy + pinch, &median);
    } else {
        canvas.rect(px(s.q1), cy - half, px(s.q3) - px(s.q1), 2.0 * half, &box_style);
        let median = LineStyle::solid(config.colors.median, 1.5);
        canvas.line(px(s.median), cy - half, px(s.median), cy + half, &median);
    }

    let flier = Style::stroked(config.colors.outlier, 0.8);
    for &o in &s.outliers {
        canvas.circle(px(o), cy, 3.0, &flier);
    }

    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notched_box_with_outliers() {
        let art = BoxplotArtifact::from_values(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
            "log_crime_rate",
            "Box Plot for log_crime_rate in van".into(),
            true,
        )
        .unwrap();
        let svg = render(&art, &VizConfig::default()).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<circle").count(), art.stats.outliers.len());
        assert!(svg.contains("Box Plot for log_crime_rate in van"));
    }

    #[test]
    fn plain_box_is_a_rect() {
        let art =
            BoxplotArtifact::from_values(&[1.0, 2.0, 3.0], "v", String::new(), false).unwrap();
        let svg = render(&art, &VizConfig::default()).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 0);
    }
}
