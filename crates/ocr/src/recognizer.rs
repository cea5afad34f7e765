use image::GrayImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image buffer rejected by OCR engine: {0}")]
    Image(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// Abstraction over an OCR engine.
/// Implementations take a preprocessed grayscale grid and return the
/// recognized text fragments in the order the engine reports them.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError>;
}

/// Run the backend and flatten its fragments into a single string,
/// separated by single spaces. Fragment order is the engine's; none is
/// imposed here.
pub fn extract_text(backend: &dyn OcrBackend, image: &GrayImage) -> Result<String, OcrError> {
    Ok(backend.recognize(image)?.join(" "))
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns preset fragments — used in tests and in builds without an OCR
/// engine compiled in.
pub struct MockRecognizer {
    fragments: Vec<String>,
}

impl MockRecognizer {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self { fragments: vec![] }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<Vec<String>, OcrError> {
        Ok(self.fragments.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use image::GrayImage;
    use leptess::LepTess;
    use std::io::Cursor;
    use std::sync::Mutex;

    /// English-language Tesseract backend.
    ///
    /// The engine is expensive to construct, so one instance is built at
    /// startup and shared; LepTess is not Sync, hence the mutex.
    pub struct TesseractRecognizer {
        engine: Mutex<LepTess>,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<&str>) -> Result<Self, OcrError> {
            let engine =
                LepTess::new(data_path, "eng").map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(Self {
                engine: Mutex::new(engine),
            })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image: &GrayImage) -> Result<Vec<String>, OcrError> {
            // LepTess consumes encoded bytes, not raw pixel grids.
            let mut png = Vec::new();
            image::DynamicImage::ImageLuma8(image.clone())
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| OcrError::Image(e.to_string()))?;

            let mut engine = self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            engine
                .set_image_from_mem(&png)
                .map_err(|e| OcrError::Image(e.to_string()))?;
            let text = engine
                .get_utf8_text()
                .map_err(|e| OcrError::Engine(e.to_string()))?;

            Ok(text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect())
        }
    }
}
