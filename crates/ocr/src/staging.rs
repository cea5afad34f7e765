//! Transient spool storage for uploaded document images.
//!
//! Uploads carry personal-identity photos, so a staged copy must never
//! outlive its request: the guard removes the file on drop, covering error
//! and panic paths as well as the normal explicit removal.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Reduce an untrusted extension hint to a short alphanumeric suffix.
/// Anything else (path separators, dots, empty input) collapses to `bin`.
pub fn sanitize_ext(ext: &str) -> String {
    let cleaned: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}

/// A staged upload that removes itself when dropped.
///
/// The filename is derived from a v4 uuid, never from caller input, so a
/// hostile filename can neither traverse out of the spool directory nor
/// collide with a concurrent request.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    removed: bool,
}

impl StagedUpload {
    /// Write `data` into `spool_dir` under a fresh unique name.
    pub async fn create(
        spool_dir: &Path,
        data: &[u8],
        ext: &str,
    ) -> std::io::Result<StagedUpload> {
        tokio::fs::create_dir_all(spool_dir).await?;
        let path = spool_dir.join(format!("{}.{}", Uuid::new_v4(), sanitize_ext(ext)));
        tokio::fs::write(&path, data).await?;
        Ok(StagedUpload {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file now instead of waiting for drop.
    pub async fn remove(mut self) -> std::io::Result<()> {
        self.removed = true;
        tokio::fs::remove_file(&self.path).await
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!("Failed to remove staged file {}: {e}", self.path.display());
        }
    }
}
