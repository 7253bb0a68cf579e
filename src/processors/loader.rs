// pir/src/processors/loader.rs
use crate::core::{ImageToolError, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frame, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Largest width or height accepted from a decoder.
const MAX_SIDE: u32 = 100_000;

/// A decoded source image.
pub enum LoadedImage {
    Still(DynamicImage),
    /// Every frame composited to the full canvas, in display order.
    Animated(Vec<Frame>),
}

#[derive(Clone)]
pub struct Loader {
    max_dimensions: (u32, u32),
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: (MAX_SIDE, MAX_SIDE),
        }
    }

    pub fn load(&self, path: &Path) -> Result<LoadedImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let reader = ImageReader::open(path)?.with_guessed_format()?;

        if reader.format() == Some(ImageFormat::Gif) {
            let frames = self.load_frames(path)?;
            if frames.len() > 1 {
                log::debug!("{} is animated ({} frames)", path.display(), frames.len());
                let (width, height) = frames[0].buffer().dimensions();
                self.check_dimensions(width, height)?;
                return Ok(LoadedImage::Animated(frames));
            }
        }

        let image = reader.decode().map_err(|e| {
            ImageToolError::ProcessingError(format!("Failed to decode image: {}", e))
        })?;
        self.check_dimensions(image.width(), image.height())?;

        log::debug!(
            "Loaded image: {}x{} pixels, format: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(LoadedImage::Still(image))
    }

    pub fn detect_format(&self, path: &Path) -> Result<ImageFormat> {
        ImageFormat::from_path(path).map_err(|_| {
            ImageToolError::ProcessingError(format!(
                "Failed to detect format for: {}",
                path.display()
            ))
        })
    }

    fn load_frames(&self, path: &Path) -> Result<Vec<Frame>> {
        let decoder = GifDecoder::new(BufReader::new(File::open(path)?)).map_err(|e| {
            ImageToolError::ProcessingError(format!("Failed to decode GIF: {}", e))
        })?;

        decoder.into_frames().collect_frames().map_err(|e| {
            ImageToolError::ProcessingError(format!("Failed to decode GIF frames: {}", e))
        })
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        let (max_w, max_h) = self.max_dimensions;
        if width > max_w || height > max_h {
            return Err(ImageToolError::ProcessingError(format!(
                "Image dimensions {}x{} exceed maximum {}x{}",
                width, height, max_w, max_h
            )));
        }
        Ok(())
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(ImageToolError::ProcessingError(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
