use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Repeat cadence for a recurring reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
}

impl Recurrence {
    /// Parse a trailing recurrence keyword from the command grammar
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            _ => None,
        }
    }

    /// Interval between firings
    pub fn period(&self) -> Duration {
        match self {
            Recurrence::Daily => Duration::days(1),
            Recurrence::Weekly => Duration::days(7),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
        }
    }
}

/// A timed reminder owned by a single user
///
/// Lifecycle: persisted with `completed = false`, armed as an in-memory timer,
/// and on firing either marked completed (one-shot) or advanced by one period
/// and re-armed (recurring). Recurring reminders never complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub owner_id: String,
    pub text: String,
    /// Absolute timestamp of the next firing
    pub due_at: DateTime<Utc>,
    /// True only for one-shot reminders that have fired
    pub completed: bool,
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Advance `due_at` by one recurrence period. No-op for one-shot reminders.
    pub fn advance(&mut self) {
        if let Some(recurrence) = self.recurrence {
            self.due_at = self.due_at + recurrence.period();
        }
    }

    /// Advance an overdue recurring reminder past `now`, one period at a time.
    ///
    /// Used by the startup recovery sweep so a single downtime window yields
    /// at most one late firing per reminder.
    pub fn catch_up(&mut self, now: DateTime<Utc>) {
        if self.recurrence.is_some() {
            while self.due_at <= now {
                self.advance();
            }
        }
    }
}
