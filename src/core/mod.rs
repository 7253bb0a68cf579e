// pir/src/core/mod.rs
pub mod processor;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_QUALITY: u8 = 90;
pub const DEFAULT_WORKERS: usize = 6;
pub const MAX_QUALITY: u8 = 95;

/// Target dimensions for one pass over the file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ImageToolError;

    /// Accepts `WIDTHxHEIGHT` or a single `WIDTH` for a square target.
    fn from_str(token: &str) -> Result<Self> {
        let invalid = || {
            ImageToolError::InvalidArgument(format!(
                "invalid resolution '{}', expected WIDTHxHEIGHT or WIDTH",
                token
            ))
        };

        let parse_side = |part: &str| -> Result<u32> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            match part.parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(value) => Ok(value),
            }
        };

        match token.split_once('x') {
            Some((width, height)) => Ok(Self::new(parse_side(width)?, parse_side(height)?)),
            None => Ok(Self::square(parse_side(token)?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fit inside the target, preserving aspect ratio.
    Resize,
    /// Fill the target and cut the centered excess.
    Crop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Resize => f.write_str("resize"),
            Action::Crop => f.write_str("crop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub resolutions: Vec<Resolution>,
    pub action: Action,
    pub quality: u8,
    pub algorithm: ResizeAlgorithm,
    pub rotate: bool,
    pub organize: bool,
    pub skip_confirmation: bool,
    pub verbose: bool,
    pub workers: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./output"),
            resolutions: Vec::new(),
            action: Action::Resize,
            quality: DEFAULT_QUALITY,
            algorithm: ResizeAlgorithm::Lanczos3,
            rotate: false,
            organize: false,
            skip_confirmation: false,
            verbose: false,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolutions.is_empty() {
            return Err(ImageToolError::InvalidArgument(
                "At least one resolution must be given".to_string(),
            ));
        }

        if self.quality == 0 || self.quality > MAX_QUALITY {
            return Err(ImageToolError::InvalidArgument(format!(
                "Quality must be between 1 and {}",
                MAX_QUALITY
            )));
        }

        if self.workers == 0 {
            return Err(ImageToolError::InvalidArgument(
                "Worker count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Directory the files of `resolution` are written to.
    pub fn destination_for(&self, resolution: Resolution) -> PathBuf {
        if self.organize {
            self.output_dir.join(resolution.to_string())
        } else {
            self.output_dir.clone()
        }
    }
}

/// Input files resolved from a single file or directory argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub base_dir: PathBuf,
    pub files: Vec<String>,
}

impl ImageSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Source is not larger than the target on both axes.
    CropTooSmall {
        width: u32,
        height: u32,
        target: Resolution,
    },
    AnimatedCrop,
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CropTooSmall {
                width,
                height,
                target,
            } => write!(f, "{}x{} is too small to crop to {}", width, height, target),
            SkipReason::AnimatedCrop => f.write_str("animated images cannot be cropped"),
            SkipReason::Failed(cause) => f.write_str(cause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Written(PathBuf),
    Skipped(SkipReason),
}

impl TransformOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, TransformOutcome::Written(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub resolution: Resolution,
    pub destination: PathBuf,
    pub written: usize,
    /// In completion order, not file-list order.
    pub skipped: Vec<SkippedFile>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub resolutions: Vec<ResolutionOutcome>,
    pub total_files: usize,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn skipped_count(&self) -> usize {
        self.resolutions.iter().map(|r| r.skipped.len()).sum()
    }

    pub fn written_count(&self) -> usize {
        self.resolutions.iter().map(|r| r.written).sum()
    }
}

#[derive(Error, Debug)]
pub enum ImageToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Input path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("No supported image files found in {0}")]
    NoSupportedFiles(PathBuf),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Cancelled by user")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ImageToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_square_resolution() {
        assert_eq!("100".parse::<Resolution>().unwrap(), Resolution::new(100, 100));
    }

    #[test]
    fn test_parse_width_and_height() {
        assert_eq!(
            "200x150".parse::<Resolution>().unwrap(),
            Resolution::new(200, 150)
        );
        assert_eq!(
            "1920x1080".parse::<Resolution>().unwrap(),
            Resolution::new(1920, 1080)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for token in [
            "", "x", "100x", "x100", "100X100", "-100", "+5", "10x10x10", "abc", "0", "0x10",
            " 100", "99999999999",
        ] {
            match token.parse::<Resolution>() {
                Err(ImageToolError::InvalidArgument(msg)) => {
                    assert!(msg.contains(&format!("'{}'", token)), "{}", msg)
                }
                other => panic!("{:?} parsed as {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_resolution_display_round_trips_through_parse() {
        let resolution = Resolution::new(640, 480);
        assert_eq!(resolution.to_string(), "640x480");
        assert_eq!(resolution.to_string().parse::<Resolution>().unwrap(), resolution);
    }

    #[test]
    fn test_validate_quality_bounds() {
        let mut config = ProcessConfig {
            resolutions: vec![Resolution::square(10)],
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.quality = 0;
        assert!(config.validate().is_err());
        config.quality = 96;
        assert!(config.validate().is_err());
        config.quality = 95;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_resolutions_and_workers() {
        let config = ProcessConfig::default();
        assert!(config.validate().is_err());

        let config = ProcessConfig {
            resolutions: vec![Resolution::square(10)],
            workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_destination_for_organized_output() {
        let mut config = ProcessConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        let resolution = Resolution::new(1000, 500);

        assert_eq!(config.destination_for(resolution), PathBuf::from("out"));
        config.organize = true;
        assert_eq!(
            config.destination_for(resolution),
            PathBuf::from("out").join("1000x500")
        );
    }
}
