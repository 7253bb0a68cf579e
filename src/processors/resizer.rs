// pir/src/processors/resizer.rs
use crate::core::{Resolution, ResizeAlgorithm};
use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};

/// Largest size that fits inside `target` with the source aspect ratio.
///
/// The limiting axis lands exactly on its target; the other one is floored.
/// Sources that already fit are returned unchanged.
pub fn fit_dimensions(source: (u32, u32), target: Resolution) -> (u32, u32) {
    let (width, height) = source;
    if width == 0 || height == 0 {
        return source;
    }
    if width <= target.width && height <= target.height {
        return source;
    }

    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);

    // tw/w <= th/h, so width is the limiting axis
    let (new_w, new_h) = if tw * h <= th * w {
        (tw, h * tw / w)
    } else {
        (w * th / h, th)
    };

    (new_w.max(1) as u32, new_h.max(1) as u32)
}

pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn resize_to_fit(&self, image: &DynamicImage, target: Resolution) -> DynamicImage {
        let (width, height) = fit_dimensions(image.dimensions(), target);

        if width == image.width() && height == image.height() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        image.resize_exact(width, height, self.get_filter_type())
    }

    /// Scales to cover `target`, then crops the centered excess.
    pub fn crop_to_fill(&self, image: &DynamicImage, target: Resolution) -> DynamicImage {
        log::debug!(
            "Cropping image from {}x{} to {}",
            image.width(),
            image.height(),
            target
        );

        image.resize_to_fill(target.width, target.height, self.get_filter_type())
    }

    pub fn resize_frame(&self, frame: &RgbaImage, target: Resolution) -> RgbaImage {
        let (width, height) = fit_dimensions(frame.dimensions(), target);

        if (width, height) == frame.dimensions() {
            return frame.clone();
        }

        imageops::resize(frame, width, height, self.get_filter_type())
    }

    fn get_filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
