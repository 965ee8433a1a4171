use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Media, MediaKind};

use super::Store;

impl Store {
    /// Insert media metadata and return it with its store-assigned id
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_media(
        &self,
        owner_id: &str,
        file_ref: &str,
        kind: MediaKind,
        caption: Option<&str>,
        file_name: Option<&str>,
        mime_type: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Media> {
        let id = sqlx::query(
            "INSERT INTO media (owner_id, file_ref, kind, caption, file_name, mime_type, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(file_ref)
        .bind(kind)
        .bind(caption)
        .bind(file_name)
        .bind(mime_type)
        .bind(now)
        .execute(self.pool()?)
        .await?
        .last_insert_rowid();

        Ok(Media {
            id,
            owner_id: owner_id.to_string(),
            file_ref: file_ref.to_string(),
            kind,
            caption: caption.map(str::to_string),
            file_name: file_name.map(str::to_string),
            mime_type: mime_type.map(str::to_string),
            uploaded_at: now,
        })
    }

    /// Point lookup scoped to the owner
    pub async fn find_media(&self, owner_id: &str, id: i64) -> Result<Option<Media>> {
        let media = sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool()?)
            .await?;

        Ok(media)
    }

    /// All of the owner's media, newest upload first
    pub async fn list_media(&self, owner_id: &str) -> Result<Vec<Media>> {
        let media = sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE owner_id = ? ORDER BY uploaded_at DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool()?)
        .await?;

        Ok(media)
    }

    /// Delete media by id; returns the affected count (0 is not an error)
    pub async fn delete_media(&self, owner_id: &str, id: i64) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM media WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    /// Delete every media record owned by the user
    pub async fn delete_media_for(&self, owner_id: &str) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM media WHERE owner_id = ?")
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    pub async fn count_media(&self, owner_id: &str) -> Result<i64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM media WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(self.pool()?)
                .await?;

        Ok(count)
    }
}
