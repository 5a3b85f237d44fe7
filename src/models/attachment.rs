//! Attachment model: a self-describing data URI carrying inline media.

use serde::{Deserialize, Serialize};

/// Broad media class of an attachment, read off the data-URI MIME tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

/// An encoded media blob stored inline with the incident.
///
/// Serialized as the bare data-URI string (`data:<mime>;base64,<payload>`),
/// which embeds its own MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(String);

impl Attachment {
    pub fn from_data_uri(uri: impl Into<String>) -> Self {
        Attachment(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify by data-URI prefix. Anything that is not an image or video
    /// data URI is `Unknown` and renders as the placeholder image.
    pub fn media_kind(&self) -> MediaKind {
        if self.0.starts_with("data:image/") {
            MediaKind::Image
        } else if self.0.starts_with("data:video/") {
            MediaKind::Video
        } else {
            MediaKind::Unknown
        }
    }
}
