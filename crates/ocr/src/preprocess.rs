use image::imageops::{self, FilterType};
use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use std::path::Path;
use thiserror::Error;

/// Uniform upscale applied before recognition; low-resolution phone shots
/// need the extra pixels for glyph separation.
const UPSCALE: u32 = 2;
/// Gaussian sigma equivalent to a 5×5 smoothing kernel.
const BLUR_SIGMA: f32 = 1.1;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Load an image file and normalize it for OCR.
pub fn prepare(path: &Path) -> Result<GrayImage, PreprocessError> {
    Ok(normalize(image::open(path)?.to_luma8()))
}

/// Normalize raw image bytes (JPEG / PNG / WEBP / …) for OCR.
pub fn prepare_from_bytes(data: &[u8]) -> Result<GrayImage, PreprocessError> {
    Ok(normalize(image::load_from_memory(data)?.to_luma8()))
}

/// 2× cubic upscale, Gaussian smoothing, Otsu binarization.
///
/// The automatic threshold copes with varying lighting without per-document
/// tuning; strongly non-uniform illumination remains a known failure mode.
fn normalize(gray: GrayImage) -> GrayImage {
    let upscaled = imageops::resize(
        &gray,
        gray.width() * UPSCALE,
        gray.height() * UPSCALE,
        FilterType::CatmullRom,
    );
    let smoothed = gaussian_blur_f32(&upscaled, BLUR_SIGMA);
    let level = otsu_level(&smoothed);
    threshold(&smoothed, level, ThresholdType::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Luma};
    use std::collections::BTreeSet;
    use std::io::Cursor;

    fn gradient_gray(width: u32, height: u32) -> GrayImage {
        ImageBuffer::from_fn(width, height, |x, _| Luma([(x * 255 / width) as u8]))
    }

    fn png_bytes(img: GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn output_dimensions_are_exactly_doubled() {
        let result = prepare_from_bytes(&png_bytes(gradient_gray(40, 24))).unwrap();
        assert_eq!(result.width(), 80);
        assert_eq!(result.height(), 48);
    }

    #[test]
    fn output_is_binarized_to_two_levels() {
        let result = prepare_from_bytes(&png_bytes(gradient_gray(64, 32))).unwrap();
        let values: BTreeSet<u8> = result.pixels().map(|p| p[0]).collect();
        assert!(values.iter().all(|v| *v == 0 || *v == 255));
        // A gradient straddles any threshold, so both levels must appear.
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn uniform_image_collapses_without_panicking() {
        let img: GrayImage = ImageBuffer::from_fn(8, 8, |_, _| Luma([128u8]));
        let result = prepare_from_bytes(&png_bytes(img)).unwrap();
        let values: BTreeSet<u8> = result.pixels().map(|p| p[0]).collect();
        assert!(values.len() <= 2);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = prepare_from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }

    #[test]
    fn prepare_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.png");
        std::fs::write(&path, png_bytes(gradient_gray(10, 10))).unwrap();
        let result = prepare(&path).unwrap();
        assert_eq!((result.width(), result.height()), (20, 20));
    }

    #[test]
    fn missing_file_fails_with_decode_error() {
        let err = prepare(Path::new("/nonexistent/doc.png")).unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }
}
