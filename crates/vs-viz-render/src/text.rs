//! Approximate text metrics.
//!
//! Widths come from per-character advance classes of a typical sans-serif
//! face rather than real glyph metrics. Good enough for margins and legend
//! boxes; viewers substitute their own font anyway.

use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | ' ' | '-' | '/' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.86,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.56,
        _ if ch.is_ascii() => 0.52,
        _ => 0.6,
    }
}

/// Measure `text` at `size_pt`.
pub fn measure_text(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    let em: f64 = text.chars().map(advance_em).sum();
    let bold = if weight == FontWeight::Bold { 1.07 } else { 1.0 };
    TextMetrics { width: em * size_pt * bold, height: size_pt * 1.2, ascent: size_pt * 0.93 }
}

/// Measure text with a [`TextStyle`].
pub fn measure_styled(text: &str, style: &TextStyle) -> TextMetrics {
    measure_text(text, style.size, style.weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_scales_with_size_and_length() {
        let a = measure_text("pop_density", 10.0, FontWeight::Regular);
        let b = measure_text("pop_density", 20.0, FontWeight::Regular);
        let c = measure_text("pop_density_extra", 10.0, FontWeight::Regular);
        assert!(a.width > 30.0);
        assert!((b.width - 2.0 * a.width).abs() < 1e-9);
        assert!(c.width > a.width);
        assert!(a.ascent < a.height);
    }

    #[test]
    fn bold_is_wider() {
        let r = measure_text("Crime", 12.0, FontWeight::Regular);
        let b = measure_text("Crime", 12.0, FontWeight::Bold);
        assert!(b.width > r.width);
    }
}
