// pir/src/cli.rs
use crate::core::{
    Action, ProcessConfig, Resolution, ResizeAlgorithm, DEFAULT_QUALITY, DEFAULT_WORKERS,
    MAX_QUALITY,
};
use clap::{Args, Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pir", author, version, about = "Resize or crop images to one or more resolutions", long_about = None)]
pub struct Cli {
    /// Input image or folder of images
    pub input: PathBuf,

    /// Output folder
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Target resolution(s): WIDTHxHEIGHT or WIDTH, comma separated
    #[arg(short, long = "resolution", required = true, value_delimiter = ',')]
    pub resolutions: Vec<Resolution>,

    #[command(flatten)]
    pub action: ActionArgs,

    /// Rotate images according to their EXIF orientation
    #[arg(long)]
    pub rotate: bool,

    /// Group output into one folder per resolution instead of suffixing file names
    #[arg(long)]
    pub organize: bool,

    /// Print the configuration and file list before starting
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not ask for confirmation before processing
    #[arg(short = 'y', long = "yes")]
    pub skip_confirmation: bool,

    /// Output quality (1-95)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=MAX_QUALITY as i64))]
    pub quality: u8,

    /// Resampling filter
    #[arg(short = 'f', long = "filter", value_enum, default_value_t = Algorithm::Antialias)]
    pub algorithm: Algorithm,

    /// Number of images processed in parallel
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_WORKERS,
          value_parser = parse_workers)]
    pub threads: usize,
}

#[derive(Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
pub struct ActionArgs {
    /// Fit images inside the resolution, keeping their aspect ratio
    #[arg(long)]
    pub resize: bool,

    /// Crop images to exactly the resolution, centered
    #[arg(long)]
    pub crop: bool,
}

impl From<ActionArgs> for Action {
    fn from(args: ActionArgs) -> Self {
        if args.crop {
            Action::Crop
        } else {
            Action::Resize
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    #[value(alias = "lanczos")]
    Antialias,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Antialias => ResizeAlgorithm::Lanczos3,
        }
    }
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Job configuration for files found under `input_dir`.
    pub fn to_config(&self, input_dir: &Path) -> ProcessConfig {
        ProcessConfig {
            input_dir: input_dir.to_path_buf(),
            output_dir: self.output.clone(),
            resolutions: self.resolutions.clone(),
            action: self.action.into(),
            quality: self.quality,
            algorithm: self.algorithm.into(),
            rotate: self.rotate,
            organize: self.organize,
            skip_confirmation: self.skip_confirmation,
            verbose: self.verbose,
            workers: self.threads,
        }
    }
}
