//! Attachment encoding pipeline.
//!
//! Turns picked files into self-describing data URIs before submission. Only
//! image and video files are accepted; everything else is rejected per file
//! with a reason, and one file's failure never aborts the rest of the batch.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::models::Attachment;

/// A file excluded from the encoded batch, with the reason it was skipped.
#[derive(Debug)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of encoding a batch of files. `attachments` may be shorter than the
/// input when files were rejected.
#[derive(Debug, Default)]
pub struct EncodedBatch {
    pub attachments: Vec<Attachment>,
    pub rejected: Vec<RejectedFile>,
}

/// Map a file extension to its MIME type. Returns `None` for extensions this
/// pipeline does not know; unknown files are rejected, not guessed at.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        _ => return None,
    };
    Some(mime)
}

/// Whether a MIME type is accepted as an attachment.
pub fn is_media_mime(mime: &str) -> bool {
    let mime_lower = mime.to_lowercase();
    mime_lower.starts_with("image/") || mime_lower.starts_with("video/")
}

/// Encode one file as a data URI.
async fn encode_file(path: &Path) -> Result<Attachment, String> {
    let mime = match mime_for_path(path) {
        Some(mime) if is_media_mime(mime) => mime,
        Some(mime) => return Err(format!("unsupported file type {}", mime)),
        None => return Err("unsupported file type".to_string()),
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("read failed: {}", e))?;

    let uri = format!("data:{};base64,{}", mime, B64.encode(&bytes));
    Ok(Attachment::from_data_uri(uri))
}

/// Encode a batch of picked files. Rejections are collected, not fatal.
pub async fn encode_attachments(paths: &[PathBuf]) -> EncodedBatch {
    let mut batch = EncodedBatch::default();

    for path in paths {
        match encode_file(path).await {
            Ok(attachment) => batch.attachments.push(attachment),
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "skipping attachment");
                batch.rejected.push(RejectedFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    batch
}
