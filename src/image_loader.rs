use std::path::Path;

use image::{DynamicImage, GrayImage, ImageReader, Luma, RgbImage};
use tracing::debug;

use crate::error::{DqcError, Result};
use crate::types::DpiSource;

/// An in-memory page: 8-bit RGB samples (R, G, B order) plus the density it was
/// captured or rendered at.
///
/// Extractors only ever borrow it and derive their own working copies.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbImage,
    source_channels: u8,
    dpi: f64,
    dpi_source: DpiSource,
}

impl DecodedImage {
    /// Wrap a decoded image, remembering how many channels the source had before
    /// expansion to RGB. Alpha is discarded.
    pub fn from_dynamic(image: DynamicImage, dpi: f64, dpi_source: DpiSource) -> Self {
        let source_channels = if image.color().has_color() { 3 } else { 1 };
        Self {
            pixels: image.to_rgb8(),
            source_channels,
            dpi,
            dpi_source,
        }
    }

    pub fn from_rgb(pixels: RgbImage, dpi: f64, dpi_source: DpiSource) -> Self {
        Self {
            pixels,
            source_channels: 3,
            dpi,
            dpi_source,
        }
    }

    pub fn from_gray(gray: GrayImage, dpi: f64, dpi_source: DpiSource) -> Self {
        Self {
            pixels: DynamicImage::ImageLuma8(gray).to_rgb8(),
            source_channels: 1,
            dpi,
            dpi_source,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn source_channels(&self) -> u8 {
        self.source_channels
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn dpi_source(&self) -> DpiSource {
        self.dpi_source
    }

    /// Fresh grayscale copy using BT.601 luma weights (0.299 R + 0.587 G + 0.114 B).
    pub fn to_gray(&self) -> GrayImage {
        let (width, height) = self.pixels.dimensions();
        let mut gray = GrayImage::new(width, height);
        for (src, dst) in self.pixels.pixels().zip(gray.pixels_mut()) {
            let [r, g, b] = src.0;
            *dst = Luma([bt601_luma(r, g, b)]);
        }
        gray
    }
}

/// Fixed-point BT.601 conversion with round-half-up, matching the common
/// 14-bit integer formulation.
pub fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;
    let y = (r as u32 * R + g as u32 * G + b as u32 * B + (1 << (SHIFT - 1))) >> SHIFT;
    y.min(255) as u8
}

/// Decode a raster file from disk. The format is sniffed from the content, so
/// the extension only matters for classification.
pub fn load_raster(path: &Path, dpi: f64, dpi_source: DpiSource) -> Result<DecodedImage> {
    let decode_err = |message: String| DqcError::decode(path.display().to_string(), message);
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(e.to_string()))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "raster decoded"
    );
    Ok(DecodedImage::from_dynamic(image, dpi, dpi_source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_raster(Path::new("/nonexistent/path/image.png"), 96.0, DpiSource::Assumed);
        assert!(matches!(result.unwrap_err(), DqcError::Decode { .. }));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not a png").expect("write");

        let err = load_raster(&path, 96.0, DpiSource::Assumed).unwrap_err();
        match err {
            DqcError::Decode { path: p, .. } => assert!(p.ends_with("broken.png")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn grayscale_png_keeps_single_channel_provenance() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(6, 4, Luma([120])).save(&path).expect("write");

        let decoded = load_raster(&path, 300.0, DpiSource::Declared).expect("decode");
        assert_eq!(decoded.source_channels(), 1);
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
        assert_eq!(decoded.pixels().get_pixel(0, 0), &Rgb([120, 120, 120]));
        assert!((decoded.dpi() - 300.0).abs() < f64::EPSILON);
        assert_eq!(decoded.dpi_source(), DpiSource::Declared);
    }

    #[test]
    fn rgba_png_drops_alpha() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("rgba.png");
        RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0]))
            .save(&path)
            .expect("write");

        let decoded = load_raster(&path, 96.0, DpiSource::Assumed).expect("decode");
        assert_eq!(decoded.source_channels(), 3);
        assert_eq!(decoded.pixels().get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn luma_uses_bt601_weights() {
        assert_eq!(bt601_luma(0, 0, 0), 0);
        assert_eq!(bt601_luma(255, 255, 255), 255);
        assert_eq!(bt601_luma(255, 0, 0), 76);
        assert_eq!(bt601_luma(0, 255, 0), 150);
        assert_eq!(bt601_luma(0, 0, 255), 29);
    }

    #[test]
    fn to_gray_returns_independent_copy() {
        let decoded =
            DecodedImage::from_rgb(RgbImage::from_pixel(2, 2, Rgb([90, 90, 90])), 96.0, DpiSource::Assumed);
        let mut gray = decoded.to_gray();
        gray.put_pixel(0, 0, Luma([0]));
        assert_eq!(decoded.pixels().get_pixel(0, 0), &Rgb([90, 90, 90]));
        assert_eq!(decoded.to_gray().get_pixel(0, 0), &Luma([90]));
    }
}
