use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional). Malformed channels read as 0.
    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize| s.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
        Self {
            r: channel(0).unwrap_or(0),
            g: channel(2).unwrap_or(0),
            b: channel(4).unwrap_or(0),
            a: 1.0,
        }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in `[0, 1]`, for choosing annotation text colour.
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Palettes ---

/// ColorBrewer BuPu, 5 classes (light → dark).
pub const BUPU5: &[&str] = &["#edf8fb", "#b3cde3", "#8c96c6", "#8856a7", "#810f7c"];

/// Lightest BuPu tone, reserved for zero counts.
pub const BUPU_ZERO: &str = "#f7fcfd";

/// Parse a list of hex strings.
pub fn ramp_colors(hex: &[&str]) -> Vec<Color> {
    hex.iter().map(|s| Color::hex(s)).collect()
}

/// Pick `n` colours spread evenly across a sequential ramp.
pub fn ramp_sample(ramp: &[Color], n: usize) -> Vec<Color> {
    match (ramp.len(), n) {
        (_, 0) | (0, _) => Vec::new(),
        (1, _) => vec![ramp[0]; n],
        (_, 1) => vec![ramp[ramp.len() - 1]],
        (m, _) => (0..n)
            .map(|i| {
                let pos = i as f64 * (m - 1) as f64 / (n - 1) as f64;
                let lo = pos.floor() as usize;
                let hi = (lo + 1).min(m - 1);
                Color::lerp(ramp[lo], ramp[hi], pos - lo as f64)
            })
            .collect(),
    }
}

// --- Diverging colormaps for correlation matrices ---

/// RdBu_r diverging colormap: -1.0 → blue, 0.0 → white, +1.0 → red
pub fn rdbu_r(val: f64) -> Color {
    let v = val.clamp(-1.0, 1.0);
    if v < 0.0 {
        Color::lerp(Color::rgb(255, 255, 255), Color::hex("#2166ac"), -v)
    } else {
        Color::lerp(Color::rgb(255, 255, 255), Color::hex("#b2182b"), v)
    }
}

/// coolwarm diverging colormap: -1.0 → blue, 0.0 → light grey, +1.0 → red
pub fn coolwarm(val: f64) -> Color {
    let v = val.clamp(-1.0, 1.0);
    let mid = Color::hex("#dddddd");
    if v < 0.0 {
        Color::lerp(mid, Color::hex("#3b4cc0"), -v)
    } else {
        Color::lerp(mid, Color::hex("#b40426"), v)
    }
}

/// Look up a diverging colormap by name; unknown names fall back to coolwarm.
pub fn diverging(name: &str) -> fn(f64) -> Color {
    match name.to_lowercase().as_str() {
        "rdbu_r" => rdbu_r,
        _ => coolwarm,
    }
}
