//! idscan-server — identity-document field extraction over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use idscan_llm::{GeminiClient, GeminiConfig};
use idscan_ocr::{ExtractionPipeline, OcrBackend, RuleBasedTagger};
use idscan_server::{create_server, AppState};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(feature = "tesseract")]
fn ocr_backend() -> anyhow::Result<Arc<dyn OcrBackend>> {
    use idscan_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    let data_path = std::env::var("IDSCAN_TESSDATA").ok();
    let recognizer = TesseractRecognizer::new(data_path.as_deref())
        .context("Failed to initialize Tesseract")?;
    Ok(Arc::new(recognizer))
}

#[cfg(not(feature = "tesseract"))]
fn ocr_backend() -> anyhow::Result<Arc<dyn OcrBackend>> {
    tracing::warn!(
        "No OCR engine compiled in — recognition returns empty text \
         (build with `--features tesseract`)"
    );
    Ok(Arc::new(idscan_ocr::MockRecognizer::empty()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let host = std::env::var("IDSCAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("IDSCAN_PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .context("IDSCAN_PORT must be a valid port number")?;
    let spool_dir = std::env::var("IDSCAN_SPOOL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("idscan-spool"));
    std::fs::create_dir_all(&spool_dir)
        .with_context(|| format!("Failed to create spool directory {}", spool_dir.display()))?;

    // The remote credential has no default; refuse to start without it.
    let gemini = GeminiConfig::from_env().context("Narrative extractor configuration")?;
    let narrative = Arc::new(GeminiClient::new(gemini)?);

    // The OCR reader and entity tagger are expensive, read-only singletons:
    // constructed once here and shared by every request.
    let recognizer = ocr_backend()?;
    let tagger = Arc::new(RuleBasedTagger);

    let state = Arc::new(AppState {
        pipeline: ExtractionPipeline::new(recognizer, tagger, narrative, spool_dir),
    });

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    tracing::info!("Starting idscan-server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_server(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped cleanly");
    Ok(())
}
