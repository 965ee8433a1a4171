use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned id
    pub id: i64,
    /// Opaque identity of the owning user
    pub owner_id: String,
    pub title: String,
    pub content: String,
    /// Optional free-text tag; absent is stored as NULL, never as ""
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every edit; always >= created_at
    pub last_edited_at: DateTime<Utc>,
}

impl Note {
    /// Whether the note has been edited since creation
    pub fn was_edited(&self) -> bool {
        self.last_edited_at > self.created_at
    }
}
