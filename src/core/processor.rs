// pir/src/core/processor.rs
use super::{
    Action, ImageToolError, ProcessConfig, Resolution, Result, SkipReason, TransformOutcome,
};
use crate::processors::{Compressor, LoadedImage, Loader, MetadataProcessor, Resizer};
use crate::utils::output_file_name;
use image::{DynamicImage, Frame, GenericImageView};
use std::path::{Path, PathBuf};

/// Work done for one file at one resolution.
///
/// Implementations never fail the batch: every problem is reported as
/// [`TransformOutcome::Skipped`].
pub trait FileTransform: Sync {
    fn transform(
        &self,
        file: &str,
        source_dir: &Path,
        dest_dir: &Path,
        resolution: Resolution,
    ) -> TransformOutcome;
}

pub struct ImageProcessor {
    config: ProcessConfig,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
    metadata_processor: MetadataProcessor,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig) -> Self {
        let resizer = Resizer::new(config.algorithm);
        let compressor = Compressor::new(config.quality);

        Self {
            config,
            loader: Loader::new(),
            resizer,
            compressor,
            metadata_processor: MetadataProcessor::new(),
        }
    }

    fn process_single(
        &self,
        file: &str,
        source_dir: &Path,
        dest_dir: &Path,
        resolution: Resolution,
    ) -> Result<TransformOutcome> {
        let input_path = source_dir.join(file);

        match self.loader.load(&input_path)? {
            LoadedImage::Animated(frames) => {
                if self.config.action == Action::Crop {
                    return Ok(TransformOutcome::Skipped(SkipReason::AnimatedCrop));
                }
                self.process_animation(file, frames, dest_dir, resolution)
            }
            LoadedImage::Still(image) => {
                self.process_still(file, &input_path, image, dest_dir, resolution)
            }
        }
    }

    fn process_still(
        &self,
        file: &str,
        input_path: &Path,
        mut image: DynamicImage,
        dest_dir: &Path,
        resolution: Resolution,
    ) -> Result<TransformOutcome> {
        if self.config.rotate {
            image = self.metadata_processor.auto_orient(image, input_path);
        }

        let image = match self.config.action {
            Action::Resize => self.resizer.resize_to_fit(&image, resolution),
            Action::Crop => {
                let (width, height) = image.dimensions();
                if width <= resolution.width || height <= resolution.height {
                    return Ok(TransformOutcome::Skipped(SkipReason::CropTooSmall {
                        width,
                        height,
                        target: resolution,
                    }));
                }
                self.resizer.crop_to_fill(&image, resolution)
            }
        };

        let output_path = self.output_path(file, dest_dir, image.dimensions());
        let format = self.loader.detect_format(input_path)?;
        self.compressor.save_with_format(&image, &output_path, format)?;

        Ok(TransformOutcome::Written(output_path))
    }

    fn process_animation(
        &self,
        file: &str,
        frames: Vec<Frame>,
        dest_dir: &Path,
        resolution: Resolution,
    ) -> Result<TransformOutcome> {
        let resized: Vec<Frame> = frames
            .into_iter()
            .map(|frame| {
                let delay = frame.delay();
                let buffer = self.resizer.resize_frame(frame.buffer(), resolution);
                Frame::from_parts(buffer, 0, 0, delay)
            })
            .collect();

        let first = resized.first().ok_or_else(|| {
            ImageToolError::ProcessingError(format!("{} has no frames", file))
        })?;
        let mut output_path = self.output_path(file, dest_dir, first.buffer().dimensions());
        // frames are always re-encoded as GIF, whatever the source was named
        let is_gif = output_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("gif"));
        if !is_gif {
            output_path.set_extension("gif");
        }

        self.compressor.save_animation(resized, &output_path)?;

        Ok(TransformOutcome::Written(output_path))
    }

    fn output_path(&self, file: &str, dest_dir: &Path, dimensions: (u32, u32)) -> PathBuf {
        if self.config.organize {
            dest_dir.join(file)
        } else {
            dest_dir.join(output_file_name(file, dimensions))
        }
    }
}

impl FileTransform for ImageProcessor {
    fn transform(
        &self,
        file: &str,
        source_dir: &Path,
        dest_dir: &Path,
        resolution: Resolution,
    ) -> TransformOutcome {
        self.process_single(file, source_dir, dest_dir, resolution)
            .unwrap_or_else(|e| TransformOutcome::Skipped(SkipReason::Failed(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{animated_gif, jpeg_with_orientation};
    use image::{Rgb, RgbImage};

    fn config(action: Action, organize: bool) -> ProcessConfig {
        ProcessConfig {
            action,
            organize,
            resolutions: vec![Resolution::square(100)],
            ..Default::default()
        }
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        DynamicImage::new_rgb8(width, height).save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_resize_writes_suffixed_file() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write_png(src.path(), "photo.png", 400, 200);

        let processor = ImageProcessor::new(config(Action::Resize, false));
        let outcome = processor.transform("photo.png", src.path(), dst.path(), Resolution::square(100));

        let expected = dst.path().join("photo - 100x50.png");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        assert_eq!(image::open(&expected).unwrap().dimensions(), (100, 50));
    }

    #[test]
    fn test_organized_output_keeps_file_name() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write_png(src.path(), "photo.png", 400, 200);

        let processor = ImageProcessor::new(config(Action::Resize, true));
        let outcome = processor.transform("photo.png", src.path(), dst.path(), Resolution::square(100));

        assert_eq!(outcome, TransformOutcome::Written(dst.path().join("photo.png")));
    }

    #[test]
    fn test_crop_is_exact() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write_png(src.path(), "wide.png", 400, 200);

        let processor = ImageProcessor::new(config(Action::Crop, false));
        let outcome = processor.transform("wide.png", src.path(), dst.path(), Resolution::new(90, 150));

        let expected = dst.path().join("wide - 90x150.png");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        assert_eq!(image::open(&expected).unwrap().dimensions(), (90, 150));
    }

    #[test]
    fn test_crop_skips_when_not_larger_on_both_axes() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write_png(src.path(), "small.png", 400, 200);

        let processor = ImageProcessor::new(config(Action::Crop, false));
        for target in [Resolution::new(100, 200), Resolution::new(400, 100), Resolution::new(500, 500)] {
            let outcome = processor.transform("small.png", src.path(), dst.path(), target);
            assert_eq!(
                outcome,
                TransformOutcome::Skipped(SkipReason::CropTooSmall {
                    width: 400,
                    height: 200,
                    target,
                })
            );
        }
        assert_eq!(std::fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("bad.jpg"), b"not an image").unwrap();

        let processor = ImageProcessor::new(config(Action::Resize, false));
        let outcome = processor.transform("bad.jpg", src.path(), dst.path(), Resolution::square(10));

        assert!(matches!(outcome, TransformOutcome::Skipped(SkipReason::Failed(_))));
        assert_eq!(std::fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dst = tempfile::tempdir().unwrap();
        let processor = ImageProcessor::new(config(Action::Resize, false));

        let outcome = processor.transform("ghost.png", dst.path(), dst.path(), Resolution::square(10));
        assert!(!outcome.is_written());
    }

    #[test]
    fn test_jpeg_keeps_format() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([10, 200, 30])))
            .save(src.path().join("green.jpg"))
            .unwrap();

        let processor = ImageProcessor::new(config(Action::Resize, false));
        let outcome = processor.transform("green.jpg", src.path(), dst.path(), Resolution::square(30));

        let expected = dst.path().join("green - 30x30.jpg");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        let reader = image::ImageReader::open(&expected)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(image::ImageFormat::Jpeg));
    }

    #[test]
    fn test_rotate_applies_exif_orientation() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("cam.jpg"), jpeg_with_orientation(200, 100, 6)).unwrap();

        let processor = ImageProcessor::new(ProcessConfig {
            rotate: true,
            ..config(Action::Resize, false)
        });
        let outcome = processor.transform("cam.jpg", src.path(), dst.path(), Resolution::square(50));

        let expected = dst.path().join("cam - 25x50.jpg");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        assert_eq!(image::open(&expected).unwrap().dimensions(), (25, 50));
    }

    #[test]
    fn test_orientation_ignored_without_rotate() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("cam.jpg"), jpeg_with_orientation(200, 100, 6)).unwrap();

        let processor = ImageProcessor::new(config(Action::Resize, false));
        let outcome = processor.transform("cam.jpg", src.path(), dst.path(), Resolution::square(50));

        let expected = dst.path().join("cam - 50x25.jpg");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        assert_eq!(image::open(&expected).unwrap().dimensions(), (50, 25));
    }

    #[test]
    fn test_animation_is_written_with_gif_extension() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("spin.png"), animated_gif(100, 50, 3)).unwrap();

        let flat = ImageProcessor::new(config(Action::Resize, false));
        let outcome = flat.transform("spin.png", src.path(), dst.path(), Resolution::square(50));
        let expected = dst.path().join("spin - 50x25.gif");
        assert_eq!(outcome, TransformOutcome::Written(expected.clone()));
        let reader = image::ImageReader::open(&expected)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(image::ImageFormat::Gif));

        let organized = ImageProcessor::new(config(Action::Resize, true));
        let outcome = organized.transform("spin.png", src.path(), dst.path(), Resolution::square(50));
        assert_eq!(outcome, TransformOutcome::Written(dst.path().join("spin.gif")));
        assert!(!dst.path().join("spin.png").exists());
    }
}
