//! Local-disk storage for uploaded resumes.
//!
//! Files live flat in `Config::upload_dir` and are served back unauthenticated
//! by the `/uploads` service. Writing a name that already exists overwrites it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

/// Reduces an arbitrary client-supplied name to a flat, ASCII-only filename.
///
/// Non-ASCII characters are decomposed and dropped, path separators and runs
/// of whitespace become `_`, anything outside `[A-Za-z0-9_.-]` is removed, and
/// leading/trailing dots and underscores are trimmed. The result can be empty.
pub fn secure_filename(raw: &str) -> String {
    let ascii: String = raw.nfkd().filter(char::is_ascii).collect();
    let unslashed = ascii.replace(['/', '\\'], " ");
    let joined = unslashed.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stored name for a resume: `{user_id}_{job_id}_{original}` after sanitizing.
pub fn resume_filename(user_id: i64, job_id: i64, original: &str) -> String {
    secure_filename(&format!("{user_id}_{job_id}_{original}"))
}

/// An upload written under a private temporary name in the uploads directory.
///
/// Nothing is visible at the final name until [`StagedUpload::commit`].
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

/// Writes `bytes` to a fresh `.upload-*.part` file inside `dir`.
pub async fn stage_upload(dir: &Path, bytes: &[u8]) -> std::io::Result<StagedUpload> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!(".upload-{:016x}.part", rand::random::<u64>()));
    tokio::fs::write(&path, bytes).await?;
    debug!("Staged upload {} ({} bytes)", path.display(), bytes.len());
    Ok(StagedUpload { path })
}

impl StagedUpload {
    /// Moves the staged file to `dir/filename`, replacing any existing file.
    pub async fn commit(self, dir: &Path, filename: &str) -> std::io::Result<()> {
        let target = dir.join(filename);
        tokio::fs::rename(&self.path, &target).await?;
        info!("Stored upload {}", target.display());
        Ok(())
    }

    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!("Failed to remove staged upload {}: {e}", self.path.display());
        }
    }
}
