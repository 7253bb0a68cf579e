// pir/src/processors/compressor.rs
use crate::core::{ImageToolError, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;
use std::path::Path;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn save_with_format(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ImageFormat,
    ) -> Result<()> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let data = self.compress_to_bytes(image, format)?;
        self.write_file(path, &data)
    }

    /// Writes a looping animation built from `frames`.
    pub fn save_animation(&self, frames: Vec<Frame>, path: &Path) -> Result<()> {
        log::debug!("Saving {} frames to {}", frames.len(), path.display());

        let mut data = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut data);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(frames)?;
        }

        self.write_file(path, &data)
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                if image.color().has_alpha() {
                    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
                } else {
                    image.write_with_encoder(encoder)?;
                }
            }
            ImageFormat::Png => {
                image.write_to(&mut buffer, ImageFormat::Png)?;
                if self.optimize_png {
                    return self.optimize_png_bytes(&buffer.into_inner());
                }
            }
            _ => {
                image.write_to(&mut buffer, format)?;
            }
        }

        Ok(buffer.into_inner())
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| ImageToolError::ProcessingError(format!("PNG optimization failed: {}", e)))
    }

    // Encoding happens in memory first, so only the final write can leave a
    // partial file behind.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Err(e) = std::fs::write(path, data) {
            let _ = std::fs::remove_file(path);
            return Err(e.into());
        }

        log::debug!("Saved image: {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
