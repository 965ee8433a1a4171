//! Account-level aggregation: stats, full export, bulk deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Store;
use crate::error::Result;
use crate::models::{Media, Note, Reminder};
use crate::reminders::ReminderManager;
use crate::transport::SharedTransport;

/// Per-owner usage counts with the note category breakdown
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub note_count: i64,
    pub reminder_count: i64,
    pub media_count: i64,
    /// (category, count) pairs; notes without a category are excluded
    pub category_breakdown: Vec<(String, i64)>,
}

/// Full snapshot of an owner's data, serialized for the export file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
    pub media: Vec<Media>,
    pub exported_at: DateTime<Utc>,
}

/// What `/delete` may target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Note,
    Reminder,
    Media,
}

impl ItemKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "note" => Some(ItemKind::Note),
            "reminder" => Some(ItemKind::Reminder),
            "media" => Some(ItemKind::Media),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Note => "Note",
            ItemKind::Reminder => "Reminder",
            ItemKind::Media => "Media file",
        }
    }
}

/// Gather the owner's usage counts and category breakdown
pub async fn stats(store: &Store, owner_id: &str) -> Result<Stats> {
    let (note_count, reminder_count, media_count, category_breakdown) = tokio::try_join!(
        store.count_notes(owner_id),
        store.count_reminders(owner_id),
        store.count_media(owner_id),
        store.notes_by_category(owner_id),
    )?;

    Ok(Stats {
        note_count,
        reminder_count,
        media_count,
        category_breakdown,
    })
}

/// Build the owner's export snapshot
pub async fn export_document(store: &Store, owner_id: &str) -> Result<ExportDocument> {
    let (notes, reminders, media) = tokio::try_join!(
        store.list_notes(owner_id),
        store.list_reminders(owner_id),
        store.list_media(owner_id),
    )?;

    Ok(ExportDocument {
        notes,
        reminders,
        media,
        exported_at: Utc::now(),
    })
}

/// Export the owner's full account as a JSON attachment.
///
/// The document is written to a transient path under the OS temp directory,
/// handed to the transport, and the temp file is removed whether or not the
/// send succeeded.
pub async fn export_all(store: &Store, transport: &SharedTransport, owner_id: &str) -> Result<()> {
    let document = export_document(store, owner_id).await?;
    let json = serde_json::to_vec_pretty(&document)?;

    let file_name = format!(
        "export_{}_{}.json",
        sanitize_owner(owner_id),
        Utc::now().timestamp_millis()
    );
    let path = std::env::temp_dir().join(file_name);

    tokio::fs::write(&path, &json).await?;

    let sent = transport
        .send_file(owner_id, &path.to_string_lossy(), "export.json")
        .await;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove export artifact {:?}: {}", path, e);
    }

    sent?;

    tracing::info!(
        "Exported {} notes, {} reminders, {} media for owner {}",
        document.notes.len(),
        document.reminders.len(),
        document.media.len(),
        owner_id
    );

    Ok(())
}

/// Delete all three entity kinds for the owner.
///
/// Deletes run concurrently; a partial failure leaves whichever kinds
/// succeeded deleted, with no rollback. Armed reminder timers are cancelled.
pub async fn clear_all(
    store: &Store,
    reminders: &ReminderManager,
    owner_id: &str,
) -> Result<(u64, u64, u64)> {
    let (notes, cleared_reminders, media) = tokio::join!(
        store.delete_notes_for(owner_id),
        reminders.clear_owner(owner_id),
        store.delete_media_for(owner_id),
    );

    let deleted = (notes?, cleared_reminders?, media?);

    tracing::info!(
        "Cleared owner {}: {} notes, {} reminders, {} media",
        owner_id,
        deleted.0,
        deleted.1,
        deleted.2
    );

    Ok(deleted)
}

/// Dispatch a `/delete` to the right entity kind; idempotent like the
/// per-kind deletes
pub async fn delete_item(
    store: &Store,
    reminders: &ReminderManager,
    owner_id: &str,
    kind: ItemKind,
    id: i64,
) -> Result<u64> {
    match kind {
        ItemKind::Note => crate::notes::delete_note(store, owner_id, id).await,
        ItemKind::Reminder => reminders.delete_reminder(owner_id, id).await,
        ItemKind::Media => crate::media::delete_media(store, owner_id, id).await,
    }
}

/// Owner ids are opaque strings; keep the export filename filesystem-safe
fn sanitize_owner(owner_id: &str) -> String {
    owner_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_kind() {
        assert_eq!(ItemKind::parse("note"), Some(ItemKind::Note));
        assert_eq!(ItemKind::parse("Reminder"), Some(ItemKind::Reminder));
        assert_eq!(ItemKind::parse("MEDIA"), Some(ItemKind::Media));
        assert_eq!(ItemKind::parse("notes"), None);
    }

    #[test]
    fn test_sanitize_owner() {
        assert_eq!(sanitize_owner("12345"), "12345");
        assert_eq!(sanitize_owner("user@host/../x"), "user_host____x");
    }
}
