use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Recurrence, Reminder};

use super::Store;

impl Store {
    /// Insert a new reminder (completed = false) and return it with its id
    pub async fn insert_reminder(
        &self,
        owner_id: &str,
        text: &str,
        due_at: DateTime<Utc>,
        recurrence: Option<Recurrence>,
        now: DateTime<Utc>,
    ) -> Result<Reminder> {
        let id = sqlx::query(
            "INSERT INTO reminders (owner_id, text, due_at, completed, recurrence, created_at)
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(owner_id)
        .bind(text)
        .bind(due_at)
        .bind(recurrence)
        .bind(now)
        .execute(self.pool()?)
        .await?
        .last_insert_rowid();

        Ok(Reminder {
            id,
            owner_id: owner_id.to_string(),
            text: text.to_string(),
            due_at,
            completed: false,
            recurrence,
            created_at: now,
        })
    }

    /// Persist the current state of a reminder (due time, text, recurrence,
    /// completion flag)
    pub async fn update_reminder(&self, reminder: &Reminder) -> Result<()> {
        sqlx::query(
            "UPDATE reminders SET text = ?, due_at = ?, completed = ?, recurrence = ?
             WHERE id = ? AND owner_id = ?",
        )
        .bind(&reminder.text)
        .bind(reminder.due_at)
        .bind(reminder.completed)
        .bind(reminder.recurrence)
        .bind(reminder.id)
        .bind(&reminder.owner_id)
        .execute(self.pool()?)
        .await?;

        Ok(())
    }

    /// Point lookup scoped to the owner
    pub async fn find_reminder(&self, owner_id: &str, id: i64) -> Result<Option<Reminder>> {
        let reminder =
            sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = ? AND owner_id = ?")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(self.pool()?)
                .await?;

        Ok(reminder)
    }

    /// The owner's pending reminders, soonest first
    pub async fn list_active_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE owner_id = ? AND completed = 0 ORDER BY due_at ASC",
        )
        .bind(owner_id)
        .fetch_all(self.pool()?)
        .await?;

        Ok(reminders)
    }

    /// All of the owner's reminders, completed included (export)
    pub async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>> {
        let reminders =
            sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE owner_id = ? ORDER BY id ASC")
                .bind(owner_id)
                .fetch_all(self.pool()?)
                .await?;

        Ok(reminders)
    }

    /// Every pending reminder across all owners, for the startup recovery sweep
    pub async fn pending_reminders(&self) -> Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE completed = 0 ORDER BY due_at ASC",
        )
        .fetch_all(self.pool()?)
        .await?;

        Ok(reminders)
    }

    /// Delete a reminder by id; returns the affected count (0 is not an error)
    pub async fn delete_reminder(&self, owner_id: &str, id: i64) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM reminders WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    /// Delete every reminder owned by the user
    pub async fn delete_reminders_for(&self, owner_id: &str) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM reminders WHERE owner_id = ?")
            .bind(owner_id)
            .execute(self.pool()?)
            .await?
            .rows_affected();

        Ok(affected)
    }

    pub async fn count_reminders(&self, owner_id: &str) -> Result<i64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM reminders WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(self.pool()?)
                .await?;

        Ok(count)
    }
}
