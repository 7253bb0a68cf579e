// pir/src/processors/mod.rs
mod batch;
mod compressor;
mod loader;
mod metadata;
mod progress;
mod resizer;

pub use batch::BatchProcessor;
pub use compressor::Compressor;
pub use loader::{LoadedImage, Loader};
pub use metadata::{apply_orientation, orientation_steps, MetadataProcessor, Transpose};
pub use progress::ProgressReporter;
pub use resizer::{fit_dimensions, Resizer};
