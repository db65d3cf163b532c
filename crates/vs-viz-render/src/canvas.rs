//! SVG canvas that writes elements as they are drawn.
//!
//! Coordinates are points with the origin at the top-left corner. Every
//! number is written with two decimals so identical input gives identical
//! bytes.

use std::fmt::Write as _;

use crate::color::Color;
use crate::primitives::{FontWeight, LineStyle, MarkerStyle, Style, TextStyle};
use crate::text::{TextMetrics, measure_styled};

/// Font stack written on every text element.
pub const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

pub struct Canvas {
    pub width: f64,
    pub height: f64,
    body: String,
    clip_defs: Vec<String>,
    clip_open: bool,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, body: String::new(), clip_defs: Vec::new(), clip_open: false }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        let _ = write!(self.body, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#);
        self.close_shape(style);
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        let _ = write!(self.body, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#);
        self.close_shape(style);
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], style: &Style) {
        self.body.push_str(r#"<polygon points=""#);
        for (i, (x, y)) in points.iter().enumerate() {
            let sep = if i == 0 { "" } else { " " };
            let _ = write!(self.body, "{sep}{x:.2},{y:.2}");
        }
        self.body.push('"');
        self.close_shape(style);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        let _ = write!(
            self.body,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{:.2}""#,
            style.color.to_svg_fill(),
            style.width,
        );
        if let Some(dash) = &style.dash {
            let _ = write!(self.body, r#" stroke-dasharray="{dash}""#);
        }
        self.body.push_str(" />\n");
    }

    /// Filled circle of radius `marker.size` with no outline.
    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        let style = Style { opacity: marker.opacity, ..Style::filled(marker.color) };
        self.circle(x, y, marker.size, &style);
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.write_text(x, y, content, style, None);
    }

    /// Text turned `angle` degrees about its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.write_text(x, y, content, style, Some(angle));
    }

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(content, style)
    }

    /// Clip everything drawn until [`Canvas::pop_clip`] to a rectangle.
    /// An open clip is closed first; clips do not nest.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        self.pop_clip();
        let id = format!("clip{}", self.clip_defs.len());
        self.clip_defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        let _ = writeln!(self.body, r#"<g clip-path="url(#{id})">"#);
        self.clip_open = true;
        id
    }

    pub fn pop_clip(&mut self) {
        if std::mem::take(&mut self.clip_open) {
            self.body.push_str("</g>\n");
        }
    }

    /// Complete document: white background, clip definitions, drawn body.
    pub fn finish_svg(mut self) -> String {
        self.pop_clip();
        let (w, h) = (self.width, self.height);
        let mut out = String::with_capacity(self.body.len() + 512);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if !self.clip_defs.is_empty() {
            let _ = writeln!(out, "<defs>\n{}\n</defs>", self.clip_defs.join("\n"));
        }
        let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="white" />"#);
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn close_shape(&mut self, style: &Style) {
        let fill = style.fill.as_ref().map_or_else(|| "none".to_string(), Color::to_svg_fill);
        let _ = write!(self.body, r#" fill="{fill}""#);
        if let Some(stroke) = &style.stroke {
            let _ = write!(
                self.body,
                r#" stroke="{}" stroke-width="{:.2}""#,
                stroke.to_svg_fill(),
                style.stroke_width
            );
        }
        if (style.opacity - 1.0).abs() > 1e-4 {
            let _ = write!(self.body, r#" opacity="{:.3}""#, style.opacity);
        }
        self.body.push_str(" />\n");
    }

    fn write_text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: Option<f64>) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{:.1}" fill="{}" text-anchor="{}" dominant-baseline="{}""#,
            style.size,
            style.color.to_svg_fill(),
            style.anchor.as_str(),
            style.baseline.as_str(),
        );
        if style.weight == FontWeight::Bold {
            self.body.push_str(r#" font-weight="bold""#);
        }
        if let Some(angle) = angle {
            let _ = write!(self.body, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#);
        }
        let _ = writeln!(self.body, ">{}</text>", escape_xml(content));
    }
}

/// Escape the characters that are special in XML text and attributes.
pub fn escape_xml(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut out, ch| {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas() {
        let svg = Canvas::new(100.0, 50.0).finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn rect_rendering() {
        let mut c = Canvas::new(200.0, 100.0);
        c.rect(10.0, 20.0, 50.0, 30.0, &Style::filled(Color::hex("#ff0000")));
        let svg = c.finish_svg();
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains("width=\"50.00\""));
    }

    #[test]
    fn text_is_escaped() {
        let mut c = Canvas::new(200.0, 100.0);
        c.text(10.0, 20.0, "a < b & c", &TextStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains(FONT_FAMILY));
    }

    #[test]
    fn clipped_elements_are_grouped() {
        let mut c = Canvas::new(100.0, 100.0);
        let id = c.push_clip(0.0, 0.0, 50.0, 50.0);
        c.circle(10.0, 10.0, 2.0, &Style::filled(Color::rgb(0, 0, 255)));
        c.pop_clip();
        c.circle(80.0, 80.0, 2.0, &Style::filled(Color::rgb(0, 0, 255)));
        let svg = c.finish_svg();
        assert!(svg.contains(&format!(r#"<clipPath id="{id}">"#)));
        let group = svg.find(&format!("url(#{id})")).unwrap();
        let close = svg.find("</g>").unwrap();
        let first = svg.find("<circle").unwrap();
        let second = svg.rfind("<circle").unwrap();
        assert!(group < first && first < close && close < second);
    }
}
