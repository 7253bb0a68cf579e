// pir/src/processors/metadata.rs
use exif::{Exif, In, Reader, Tag};
use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One geometric step. Rotations are counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Transpose {
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        // image rotates clockwise
        match self {
            Transpose::FlipHorizontal => image.fliph(),
            Transpose::FlipVertical => image.flipv(),
            Transpose::Rotate90 => image.rotate270(),
            Transpose::Rotate180 => image.rotate180(),
            Transpose::Rotate270 => image.rotate90(),
        }
    }
}

/// Steps that bring an image stored with EXIF `orientation` upright.
/// Unknown values map to no steps.
pub fn orientation_steps(orientation: u32) -> &'static [Transpose] {
    use Transpose::*;

    match orientation {
        2 => &[FlipHorizontal],
        3 => &[Rotate180],
        4 => &[FlipVertical],
        5 => &[FlipHorizontal, Rotate90],
        6 => &[Rotate270],
        7 => &[FlipVertical, Rotate90],
        8 => &[Rotate90],
        _ => &[],
    }
}

pub fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    orientation_steps(orientation)
        .iter()
        .fold(image, |image, step| step.apply(image))
}

pub struct MetadataProcessor;

impl MetadataProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn read_metadata(&self, path: &Path) -> Option<Exif> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("Cannot open {} for EXIF: {}", path.display(), e);
                return None;
            }
        };
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => {
                log::debug!("Found EXIF data in {}", path.display());
                Some(exif)
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", path.display());
                None
            }
            Err(e) => {
                log::debug!("Ignoring unreadable EXIF in {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn read_orientation(&self, path: &Path) -> Option<u32> {
        let exif = self.read_metadata(path)?;
        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
    }

    /// Rotates `image` upright according to the EXIF data of `path`.
    /// Missing or malformed orientation leaves the image as is.
    pub fn auto_orient(&self, image: DynamicImage, path: &Path) -> DynamicImage {
        match self.read_orientation(path) {
            Some(orientation) if orientation != 1 => {
                log::debug!("Applying EXIF orientation {} to {}", orientation, path.display());
                apply_orientation(image, orientation)
            }
            _ => image,
        }
    }
}

impl Default for MetadataProcessor {
    fn default() -> Self {
        Self::new()
    }
}
