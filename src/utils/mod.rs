// pir/src/utils/mod.rs
use crate::core::{ImageSet, ImageToolError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

/// Extensions picked up from the input, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Resolves the input argument into a base directory and the supported
/// files directly inside it, in the order the filesystem lists them.
pub fn collect_image_files(input: &Path) -> Result<ImageSet> {
    if !input.exists() {
        return Err(ImageToolError::NotFound(input.to_path_buf()));
    }

    let set = if input.is_dir() {
        let files = WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Cannot read entry in {}: {}", input.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_supported_format(entry.path()))
            .filter_map(|entry| file_name_of(entry.path()))
            .collect();

        ImageSet {
            base_dir: input.to_path_buf(),
            files,
        }
    } else {
        let base_dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let files = if is_supported_format(input) {
            file_name_of(input).into_iter().collect()
        } else {
            Vec::new()
        };

        ImageSet { base_dir, files }
    };

    if set.is_empty() {
        return Err(ImageToolError::NoSupportedFiles(input.to_path_buf()));
    }

    log::debug!(
        "Found {} image(s) in {}",
        set.len(),
        set.base_dir.display()
    );

    Ok(set)
}

fn file_name_of(path: &Path) -> Option<String> {
    let name = path.file_name()?;
    match name.to_str() {
        Some(name) => Some(name.to_string()),
        None => {
            log::warn!("Skipping non UTF-8 file name: {}", path.display());
            None
        }
    }
}

/// `photo.jpg` at 640x480 becomes `photo - 640x480.jpg`.
pub fn output_file_name(file: &str, (width, height): (u32, u32)) -> String {
    let path = Path::new(file);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file);

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{} - {}x{}.{}", stem, width, height, ext),
        None => format!("{} - {}x{}", stem, width, height),
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let whole = elapsed.as_secs();
        format!("{}m {:02}s", whole / 60, whole % 60)
    }
}
