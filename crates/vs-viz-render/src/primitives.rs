//! Drawing styles shared by the canvas and the plot renderers.

use crate::color::Color;

const BLACK: Color = Color::rgb(0, 0, 0);

/// Fill and outline for rectangles, polygons, and circles.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    /// Whole-element opacity, applied on top of colour alpha.
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self { fill: Some(color), ..Self::default() }
    }

    pub fn stroked(color: Color, width: f64) -> Self {
        Self { stroke: Some(color), stroke_width: width, ..Self::default() }
    }

    /// Bars and boxes: solid body with a thin edge.
    pub fn filled_stroked(fill: Color, stroke: Color, width: f64) -> Self {
        Self { fill: Some(fill), ..Self::stroked(stroke, width) }
    }
}

/// Stroke for lines and polylines. `dash` is an SVG `stroke-dasharray`.
#[derive(Debug, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Option<String>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::solid(BLACK, 1.0)
    }
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self { dash: Some("6 3".into()), ..Self::solid(color, width) }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: BLACK,
            weight: FontWeight::default(),
            anchor: TextAnchor::default(),
            baseline: TextBaseline::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Horizontal alignment (`text-anchor`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical alignment (`dominant-baseline`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Alphabetic => "auto",
            Self::Central => "central",
            Self::Hanging => "hanging",
        }
    }
}

/// Scatter point: a filled circle of radius `size`.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: Color,
    pub opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { size: 2.5, color: BLACK, opacity: 1.0 }
    }
}
