use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, GenericImageView};

use crate::core::config::ImageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::images::orientation::Orientation;

/// Re-encodes uploads as bounded-width JPEGs. CPU bound; run it off the
/// async workers.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    max_width: u32,
    jpeg_quality: u8,
}

impl ImageProcessor {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_width: config.max_width.max(1),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Target size for a `width` x `height` source: scaled down to
    /// `max_width` with the aspect ratio kept, never scaled up
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= self.max_width {
            return (width, height);
        }

        let scale = self.max_width as f64 / width as f64;
        let new_height = (height as f64 * scale).round() as u32;
        (self.max_width, new_height.max(1))
    }

    /// Decode, turn upright from the EXIF orientation, shrink and re-encode
    pub fn process(&self, data: &[u8]) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(data)
            .map_err(|e| AppError::Validation(format!("Unreadable image: {}", e)))?;
        let source = Orientation::from_bytes(data).apply(decoded);

        let (width, height) = source.dimensions();
        let (target_width, target_height) = self.target_dimensions(width, height);

        let resized = if (target_width, target_height) == (width, height) {
            source
        } else {
            source.resize_exact(target_width, target_height, FilterType::Triangle)
        };

        let rgb = resized.to_rgb8();
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| AppError::Internal(format!("Failed to encode JPEG: {}", e)))?;

        Ok(out)
    }
}
