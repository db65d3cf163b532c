use vs_viz::ScatterFitArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::draw_title;
use crate::layout::axes::Axis;
use crate::layout::legend::{LegendEntry, draw_legend};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;

pub fn render(artifact: &ScatterFitArtifact, config: &VizConfig) -> crate::Result<String> {
    let mut canvas = Canvas::new(config.figure.width, config.figure.height);

    let mut y_values = artifact.y.clone();
    let endpoints = artifact.line_endpoints();
    if let Some(ends) = endpoints {
        y_values.extend(ends.iter().map(|p| p.1));
    }
    let x_axis = Axis::from_data(artifact.x.iter().copied(), 0.05, 7).with_label(&artifact.x_label);
    let y_axis = Axis::from_data(y_values, 0.05, 6).with_label(&artifact.y_label);

    let area = PlotArea::auto(&canvas, Some(&y_axis), Some(&x_axis), config);
    draw_title(&mut canvas, &area, &artifact.title, config);
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    let marker = MarkerStyle {
        color: config.colors.point,
        opacity: config.colors.point_alpha,
        size: 2.5,
    };
    for (&x, &y) in artifact.x.iter().zip(&artifact.y) {
        canvas.marker(
            x_axis.data_to_pixel(x, area.left, area.right()),
            y_axis.data_to_pixel(y, area.bottom(), area.top),
            &marker,
        );
    }
    if let Some([(x0, y0), (x1, y1)]) = endpoints {
        canvas.line(
            x_axis.data_to_pixel(x0, area.left, area.right()),
            y_axis.data_to_pixel(y0, area.bottom(), area.top),
            x_axis.data_to_pixel(x1, area.left, area.right()),
            y_axis.data_to_pixel(y1, area.bottom(), area.top),
            &LineStyle::solid(config.colors.fit_line, 1.0),
        );
    }
    canvas.pop_clip();

    let mut entries =
        vec![LegendEntry::marker(format!("n = {}", artifact.x.len()), config.colors.point)];
    if let Some(fit) = &artifact.fit {
        entries.push(LegendEntry::line(
            format!("y = {:.4}x + {:.4} (R² = {:.3})", fit.slope, fit.intercept, fit.r_squared),
            config.colors.fit_line,
        ));
    }
    draw_legend(&mut canvas, &area, &entries, config.font.size);

    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vs_inference::linregress;

    #[test]
    fn one_marker_per_point_and_a_fit_line() {
        let fit = linregress(&[1.0, 2.0, 4.0], &[3.0, 5.0, 9.0]).unwrap();
        let title = "Scatter Plot for (income, crime_rate)".to_string();
        let art = ScatterFitArtifact::from_fit(&fit, "income", "crime_rate", title);
        let svg = render(&art, &VizConfig::default()).unwrap();
        // three data markers + one legend marker
        assert_eq!(svg.matches("<circle").count(), 4);
        assert!(svg.contains("stroke=\"#ff0000\""));
        assert!(svg.contains("Scatter Plot for (income, crime_rate)"));
        assert!(svg.contains(">income<"));
    }
}
