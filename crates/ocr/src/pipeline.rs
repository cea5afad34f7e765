use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use idscan_core::{FieldSet, NarrativeOutcome};
use idscan_llm::NarrativeBackend;

use crate::extract::FieldExtractor;
use crate::ner::EntityTagger;
use crate::preprocess;
use crate::recognizer::{self, OcrBackend, OcrError};
use crate::staging::StagedUpload;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of one document extraction run.
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Flat OCR text, fragments joined with single spaces.
    pub raw_text: String,
    /// Pattern/entity extraction over the raw text.
    pub fields: FieldSet,
    /// Remote narrative extraction, degraded to an error description when
    /// the service call fails.
    pub narrative: NarrativeOutcome,
}

/// Orchestrates: stage → preprocess → OCR → field extraction → narrative.
///
/// The staged copy is removed on every exit path. The backends are shared,
/// read-only process singletons constructed once at startup; each run owns
/// its own image data and shares no other mutable state.
pub struct ExtractionPipeline {
    recognizer: Arc<dyn OcrBackend>,
    tagger: Arc<dyn EntityTagger>,
    narrative: Arc<dyn NarrativeBackend>,
    spool_dir: PathBuf,
}

impl ExtractionPipeline {
    pub fn new(
        recognizer: Arc<dyn OcrBackend>,
        tagger: Arc<dyn EntityTagger>,
        narrative: Arc<dyn NarrativeBackend>,
        spool_dir: PathBuf,
    ) -> Self {
        Self {
            recognizer,
            tagger,
            narrative,
            spool_dir,
        }
    }

    /// Process one uploaded document image.
    ///
    /// Decode and OCR failures abort the run; remote narrative failures do
    /// not — they degrade into the outcome so the caller still receives the
    /// recognized text and pattern fields.
    pub async fn run(&self, data: &[u8], ext: &str) -> Result<ExtractionOutcome, PipelineError> {
        // 1. Stage under a collision-resistant name. The guard removes the
        //    file even when a later stage errors out.
        let staged = StagedUpload::create(&self.spool_dir, data, ext).await?;

        // 2. Normalize for recognition.
        let prepared = preprocess::prepare(staged.path())?;

        // 3. OCR.
        let raw_text = recognizer::extract_text(self.recognizer.as_ref(), &prepared)?;
        tracing::info!(chars = raw_text.len(), "Recognized document text");

        // 4. Deterministic field extraction.
        let fields = FieldExtractor::extract(&raw_text, self.tagger.as_ref());

        // 5. Remote narrative extraction.
        let narrative = match self.narrative.answer(&raw_text).await {
            Ok(answer) => NarrativeOutcome::Answer(answer),
            Err(e) => {
                tracing::warn!("Narrative extraction degraded: {e}");
                NarrativeOutcome::Degraded(e.to_string())
            }
        };

        // 6. Cleanup before the invocation completes.
        staged.remove().await?;

        Ok(ExtractionOutcome {
            raw_text,
            fields,
            narrative,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::RuleBasedTagger;
    use crate::recognizer::MockRecognizer;
    use idscan_llm::MockNarrative;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::io::Cursor;

    const DOC_LINE: &str =
        "Name: John Smith Father: Robert Smith DOB: 01/02/1990 Gender: Male ID: XY-9988";

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(8, 8, |x, _| Luma([(x * 32) as u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn spool_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    fn pipeline_with(
        recognizer: Arc<dyn OcrBackend>,
        narrative: Arc<dyn NarrativeBackend>,
        spool_dir: PathBuf,
    ) -> ExtractionPipeline {
        ExtractionPipeline::new(recognizer, Arc::new(RuleBasedTagger), narrative, spool_dir)
    }

    #[tokio::test]
    async fn run_produces_text_fields_and_answer() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(
            Arc::new(MockRecognizer::new([DOC_LINE])),
            Arc::new(MockNarrative::answering("Name: John Smith\nID Number: XY-9988")),
            dir.path().to_path_buf(),
        );

        let outcome = pipeline.run(&tiny_png(), "png").await.unwrap();

        assert_eq!(outcome.raw_text, DOC_LINE);
        assert_eq!(outcome.fields.id_number.as_deref(), Some("XY-9988"));
        assert_eq!(outcome.fields.gender.as_deref(), Some("Male"));
        assert_eq!(
            outcome.narrative,
            NarrativeOutcome::Answer("Name: John Smith\nID Number: XY-9988".into())
        );
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn remote_failure_degrades_but_run_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(
            Arc::new(MockRecognizer::new([DOC_LINE])),
            Arc::new(MockNarrative::failing(503, "upstream overloaded")),
            dir.path().to_path_buf(),
        );

        let outcome = pipeline.run(&tiny_png(), "png").await.unwrap();

        assert!(outcome.narrative.is_degraded());
        let answers = outcome.narrative.as_text();
        assert!(answers.contains("503"), "missing status in {answers:?}");
        assert!(answers.contains("upstream overloaded"));
        // The deterministic path is unaffected.
        assert_eq!(outcome.fields.id_number.as_deref(), Some("XY-9988"));
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn undecodable_image_aborts_and_leaves_no_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(
            Arc::new(MockRecognizer::empty()),
            Arc::new(MockNarrative::answering("unused")),
            dir.path().to_path_buf(),
        );

        let err = pipeline.run(b"not an image", "png").await.unwrap_err();

        assert!(matches!(err, PipelineError::Preprocess(_)));
        assert!(spool_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn ocr_failure_aborts_and_leaves_no_staged_file() {
        struct FailingRecognizer;
        impl OcrBackend for FailingRecognizer {
            fn recognize(&self, _image: &GrayImage) -> Result<Vec<String>, OcrError> {
                Err(OcrError::Engine("synthetic engine fault".into()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(
            Arc::new(FailingRecognizer),
            Arc::new(MockNarrative::answering("unused")),
            dir.path().to_path_buf(),
        );

        let err = pipeline.run(&tiny_png(), "png").await.unwrap_err();

        assert!(matches!(err, PipelineError::Ocr(_)));
        assert!(spool_is_empty(dir.path()));
    }
}
