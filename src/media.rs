//! Media manager: metadata capture for files received over the transport.
//!
//! Only metadata is persisted; the binary payload stays on the platform side
//! and is reached through the opaque file handle when the owner asks for a
//! stored file back.

use chrono::Utc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Media, MediaUpload};
use crate::transport::SharedTransport;

/// Record metadata for a received file; `uploaded_at = now`
pub async fn record_media(store: &Store, owner_id: &str, upload: &MediaUpload) -> Result<Media> {
    let media = store
        .insert_media(
            owner_id,
            &upload.file_ref,
            upload.kind,
            upload.caption.as_deref(),
            upload.file_name.as_deref(),
            upload.mime_type.as_deref(),
            Utc::now(),
        )
        .await?;

    tracing::info!(
        "Stored {} metadata {} for owner {}",
        media.kind.label(),
        media.id,
        owner_id
    );

    Ok(media)
}

/// The owner's media, newest upload first
pub async fn list_media(store: &Store, owner_id: &str) -> Result<Vec<Media>> {
    store.list_media(owner_id).await
}

/// Re-deliver a stored file: resolve the opaque handle to a URL and hand it
/// to the transport as an attachment
pub async fn send_media_file(
    store: &Store,
    transport: &SharedTransport,
    owner_id: &str,
    id: i64,
) -> Result<Media> {
    let media = store
        .find_media(owner_id, id)
        .await?
        .ok_or(AppError::NotFound("Media file"))?;

    let link = transport.resolve_file_link(&media.file_ref).await?;
    let display_name = media
        .file_name
        .clone()
        .unwrap_or_else(|| format!("media_{}", media.id));

    transport.send_file(owner_id, &link, &display_name).await?;

    Ok(media)
}

/// Idempotent delete; returns the affected count (0 for an unknown id)
pub async fn delete_media(store: &Store, owner_id: &str, id: i64) -> Result<u64> {
    let affected = store.delete_media(owner_id, id).await?;

    if affected > 0 {
        tracing::info!("Media {} deleted for owner {}", id, owner_id);
    }

    Ok(affected)
}
