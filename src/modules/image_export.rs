use image::{ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Png,
    Webp,
}

impl TargetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Png => "PNG",
            TargetFormat::Webp => "WebP",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Png => "image/png",
            TargetFormat::Webp => "image/webp",
        }
    }

    pub fn all() -> [TargetFormat; 2] {
        [TargetFormat::Png, TargetFormat::Webp]
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encodes an RGBA surface into the target format.
///
/// PNG is lossless at default compression. WebP is lossy at `webp_quality`
/// (0..=100), matching what a canvas produces for `image/webp`.
pub fn encode_surface(
    surface: &RgbaImage,
    format: TargetFormat,
    webp_quality: f32,
) -> Result<Vec<u8>, String> {
    let (width, height) = surface.dimensions();
    let mut out = Vec::new();

    match format {
        TargetFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new_with_quality(
                &mut out,
                image::codecs::png::CompressionType::Default,
                image::codecs::png::FilterType::Adaptive,
            );
            encoder.write_image(
                surface.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            ).map_err(|e| format!("Failed to encode PNG: {}", e))?;
        }
        TargetFormat::Webp => {
            let encoder = webp::Encoder::from_rgba(surface.as_raw(), width, height);
            let memory = encoder
                .encode_simple(false, webp_quality.clamp(0.0, 100.0))
                .map_err(|e| format!("Failed to encode WebP: {:?}", e))?;
            out.extend_from_slice(&memory);
        }
    }

    Ok(out)
}
