pub mod extract;
pub mod ner;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod staging;

pub use extract::FieldExtractor;
pub use ner::{Entity, EntityLabel, EntityTagger, MockTagger, RuleBasedTagger};
pub use pipeline::{ExtractionOutcome, ExtractionPipeline, PipelineError};
pub use preprocess::{prepare, prepare_from_bytes, PreprocessError};
pub use recognizer::{extract_text, MockRecognizer, OcrBackend, OcrError};
pub use staging::{sanitize_ext, StagedUpload};
