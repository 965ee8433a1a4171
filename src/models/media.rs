use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a stored media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
    Voice,
}

impl MediaKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(MediaKind::Photo),
            "video" => Some(MediaKind::Video),
            "document" => Some(MediaKind::Document),
            "voice" => Some(MediaKind::Voice),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Voice => "voice",
        }
    }
}

/// Metadata for a media file received over the transport
///
/// Only metadata is stored; the binary payload stays on the platform side,
/// referenced by the opaque `file_ref` handle. Immutable after creation
/// except by deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub owner_id: String,
    /// Opaque transport file handle
    pub file_ref: String,
    pub kind: MediaKind,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// An inbound media upload as delivered by the transport adapter
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_ref: String,
    pub kind: MediaKind,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}
