//! Note manager: CRUD plus substring search over the owner's notes.

use chrono::Utc;

use crate::constants::{USAGE_EDITNOTE, USAGE_NOTE};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Note;

/// Create a note; `created_at == last_edited_at == now`
pub async fn create_note(
    store: &Store,
    owner_id: &str,
    title: &str,
    content: &str,
    category: Option<&str>,
) -> Result<Note> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(AppError::Validation(USAGE_NOTE.to_string()));
    }

    let note = store
        .insert_note(owner_id, title, content, category, Utc::now())
        .await?;

    tracing::info!("Note {} created for owner {}", note.id, owner_id);

    Ok(note)
}

/// Overwrite a note's title, content, and category, bumping `last_edited_at`.
///
/// A category not supplied on edit reverts to absent; edits are full
/// overwrites, not merges.
pub async fn edit_note(
    store: &Store,
    owner_id: &str,
    id: i64,
    title: &str,
    content: &str,
    category: Option<&str>,
) -> Result<Note> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(AppError::Validation(USAGE_EDITNOTE.to_string()));
    }

    let mut note = store
        .find_note(owner_id, id)
        .await?
        .ok_or(AppError::NotFound("Note"))?;

    note.title = title.to_string();
    note.content = content.to_string();
    note.category = category.map(str::to_string);
    note.last_edited_at = Utc::now();

    store.update_note(&note).await?;

    tracing::info!("Note {} edited for owner {}", note.id, owner_id);

    Ok(note)
}

/// The owner's notes, newest first
pub async fn list_notes(store: &Store, owner_id: &str) -> Result<Vec<Note>> {
    store.list_notes(owner_id).await
}

/// Notes whose title, content, or category contains `query` as a
/// case-sensitive substring. An empty result is not an error.
pub async fn search_notes(store: &Store, owner_id: &str, query: &str) -> Result<Vec<Note>> {
    store.search_notes(owner_id, query).await
}

/// Idempotent delete; returns the affected count (0 for an unknown id)
pub async fn delete_note(store: &Store, owner_id: &str, id: i64) -> Result<u64> {
    let affected = store.delete_note(owner_id, id).await?;

    if affected > 0 {
        tracing::info!("Note {} deleted for owner {}", id, owner_id);
    }

    Ok(affected)
}
