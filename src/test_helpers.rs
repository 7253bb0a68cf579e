//! Shared fixtures for the unit tests.
//!
//! Builds small encoded images in memory: a JPEG carrying a hand-written
//! EXIF block, and a multi-frame GIF.

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{Delay, Frame, Rgb, RgbImage, Rgba, RgbaImage};

/// JPEG of `width`x`height` whose EXIF block holds only the given
/// Orientation value.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let mut jpeg = Vec::new();
    let pixels = RgbImage::from_pixel(width, height, Rgb([200, 60, 20]));
    JpegEncoder::new_with_quality(&mut jpeg, 90)
        .encode_image(&pixels)
        .unwrap();

    let [hi, lo] = orientation.to_be_bytes();
    let mut app1: Vec<u8> = vec![0xFF, 0xE1, 0x00, 0x22];
    app1.extend_from_slice(b"Exif\0\0");
    // big-endian TIFF header, first IFD at offset 8
    app1.extend_from_slice(b"MM\0\x2A\0\0\0\x08");
    // one entry: tag 0x0112, SHORT, count 1, value inline
    app1.extend_from_slice(&[0x00, 0x01]);
    app1.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, hi, lo, 0x00, 0x00]);
    app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    // right after SOI
    jpeg.splice(2..2, app1);
    jpeg
}

/// GIF with `count` frames of `width`x`height`.
pub fn animated_gif(width: u32, height: u32, count: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        let frames = (0..count).map(|i| {
            Frame::from_parts(
                RgbaImage::from_pixel(width, height, Rgba([i.wrapping_mul(60), 0, 0, 255])),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }
    bytes
}
