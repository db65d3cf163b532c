#[cfg(feature = "png")]
pub mod png;

/// Output image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    #[cfg(feature = "png")]
    Png,
}

impl ImageFormat {
    /// Parse a format name or file extension (case-insensitive).
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            #[cfg(feature = "png")]
            "png" => Ok(Self::Png),
            other => Err(crate::RenderError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            #[cfg(feature = "png")]
            Self::Png => "png",
        }
    }
}

/// Encode an SVG document in the requested format.
pub fn encode(svg: String, format: ImageFormat, _dpi: u32) -> crate::Result<Vec<u8>> {
    match format {
        ImageFormat::Svg => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        ImageFormat::Png => png::svg_to_png(&svg, _dpi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!(ImageFormat::parse("SVG").unwrap(), ImageFormat::Svg);
        assert_eq!(ImageFormat::Svg.extension(), "svg");
        assert!(matches!(
            ImageFormat::parse("pdf"),
            Err(crate::RenderError::UnsupportedFormat(f)) if f == "pdf"
        ));
    }
}
