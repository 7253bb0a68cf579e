pub mod cli;
pub mod core;
mod processors;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use crate::cli::{Algorithm, Cli};
pub use crate::core::processor::{FileTransform, ImageProcessor};
pub use crate::core::{
    Action, BatchOutcome, ImageSet, ImageToolError, ProcessConfig, Resolution,
    ResolutionOutcome, ResizeAlgorithm, Result, SkipReason, SkippedFile, TransformOutcome,
};
pub use crate::processors::{
    apply_orientation, fit_dimensions, orientation_steps, BatchProcessor, Compressor, LoadedImage,
    Loader, MetadataProcessor, ProgressReporter, Resizer, Transpose,
};
pub use crate::utils::{collect_image_files, format_elapsed, is_supported_format, output_file_name};
