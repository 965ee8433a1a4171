use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Note;

use super::Store;

impl Store {
    /// Insert a new note and return it with its store-assigned id
    pub async fn insert_note(
        &self,
        owner_id: &str,
        title: &str,
        content: &str,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Note> {
        let id = sqlx::query(
            "INSERT INTO notes (owner_id, title, content, category, created_at, last_edited_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(title)
        .bind(content)
        .bind(category)
        .bind(now)
        .bind(now)
        .execute(self.pool()?)
        .await?
        .last_insert_rowid();

        Ok(Note {
            id,
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.map(str::to_string),
            created_at: now,
            last_edited_at: now,
        })
    }

    /// Overwrite the mutable fields of an existing note
    pub async fn update_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            "UPDATE notes SET title = ?, content = ?, category = ?, last_edited_at = ?
             WHERE id = ? AND owner_id = ?",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.category)
        .bind(note.last_edited_at)
        .bind(note.id)
        .bind(&note.owner_id)
        .execute(self.pool()?)
        .await?;

        Ok(())
    }

    /// Point lookup scoped to the owner
    pub async fn find_note(&self, owner_id: &str, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool()?)
            .await?;

        Ok(note)
    }

    /// All of the owner's notes, newest first
    pub async fn list_notes(&self, owner_id: &str) -> Result<Vec<Note>> {
        let notes =
            sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE owner_id = ? ORDER BY created_at DESC")
                .bind(owner_id)
                .fetch_all(self.pool()?)
                .await?;

        Ok(notes)
    }

    /// Case-sensitive substring search across title, content, and category.
    ///
    /// Uses `instr` rather than `LIKE` because SQLite's `LIKE` is
    /// case-insensitive for ASCII.
    pub async fn search_notes(&self, owner_id: &str, query: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes
             WHERE owner_id = ?
               AND (instr(title, ?) > 0 OR instr(content, ?) > 0 OR instr(COALESCE(category, ''), ?) > 0)
             ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .bind(query)
        .bind(query)
        .bind(query)
        .fetch_all(self.pool()?)
        .await?;

        Ok(notes)
    }

    /// Delete a note by id; returns the affected count (0 is not an error)
    pub async fn delete_note(&self, owner_id: &str, id: i64) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM notes WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    /// Delete every note owned by the user
    pub async fn delete_notes_for(&self, owner_id: &str) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM notes WHERE owner_id = ?")
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    pub async fn count_notes(&self, owner_id: &str) -> Result<i64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM notes WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(self.pool()?)
                .await?;

        Ok(count)
    }

    /// Per-category note counts, excluding notes with no category
    pub async fn notes_by_category(&self, owner_id: &str) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT category, COUNT(*) FROM notes
             WHERE owner_id = ? AND category IS NOT NULL
             GROUP BY category
             ORDER BY category",
        )
        .bind(owner_id)
        .fetch_all(self.pool()?)
        .await?;

        Ok(rows)
    }
}
