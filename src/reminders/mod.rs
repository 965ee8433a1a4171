//! Reminder lifecycle manager: due-time computation, persistence, and the
//! in-process timer pipeline (pre-notification, firing, recurrence).
//!
//! Armed timers live in an explicit registry keyed by reminder id, so editing
//! or deleting a reminder cancels the stale timer before a new one is armed —
//! an edited reminder can never fire twice. Timers hold no durable handle;
//! the startup [`ReminderManager::recover`] sweep re-arms whatever the store
//! still considers pending.

mod scheduler;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;

use crate::constants::{
    ERR_REMINDER_MINUTES, MAX_REMINDER_MINUTES, MIN_REMINDER_MINUTES, USAGE_EDITREMINDER,
    USAGE_REMIND,
};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Recurrence, Reminder};
use crate::transport::SharedTransport;

/// A timer registered for a reminder id. The generation disambiguates a task
/// removing itself on completion from a newer task armed for the same id.
struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Owns reminder CRUD and the timer registry
pub struct ReminderManager {
    store: Store,
    transport: SharedTransport,
    timers: Mutex<HashMap<i64, ArmedTimer>>,
    next_generation: AtomicU64,
    /// Self-reference handed to spawned timer tasks
    weak: Weak<ReminderManager>,
}

impl ReminderManager {
    pub fn new(store: Store, transport: SharedTransport) -> Arc<Self> {
        Arc::new_cyclic(|weak| ReminderManager {
            store,
            transport,
            timers: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            weak: weak.clone(),
        })
    }

    /// Create a reminder due `minutes` from now and arm it
    pub async fn create_reminder(
        &self,
        owner_id: &str,
        minutes: i64,
        text: &str,
        recurrence: Option<Recurrence>,
    ) -> Result<Reminder> {
        validate_lead_time(minutes)?;
        if text.trim().is_empty() {
            return Err(AppError::Validation(USAGE_REMIND.to_string()));
        }

        let now = Utc::now();
        let reminder = self
            .store
            .insert_reminder(owner_id, text, now + Duration::minutes(minutes), recurrence, now)
            .await?;

        tracing::info!(
            "Reminder {} created for owner {}, due {}",
            reminder.id,
            owner_id,
            reminder.due_at
        );

        self.arm(reminder.clone());

        Ok(reminder)
    }

    /// Recompute an existing reminder's due time and text, reset its
    /// completion flag, and re-arm it.
    ///
    /// An omitted recurrence means no recurrence, matching
    /// [`ReminderManager::create_reminder`]. The stale timer is cancelled by
    /// the registry when the new one is armed.
    pub async fn edit_reminder(
        &self,
        owner_id: &str,
        id: i64,
        minutes: i64,
        text: &str,
        recurrence: Option<Recurrence>,
    ) -> Result<Reminder> {
        validate_lead_time(minutes)?;
        if text.trim().is_empty() {
            return Err(AppError::Validation(USAGE_EDITREMINDER.to_string()));
        }

        let mut reminder = self
            .store
            .find_reminder(owner_id, id)
            .await?
            .ok_or(AppError::NotFound("Reminder"))?;

        reminder.text = text.to_string();
        reminder.due_at = Utc::now() + Duration::minutes(minutes);
        reminder.recurrence = recurrence;
        reminder.completed = false;

        self.store.update_reminder(&reminder).await?;

        tracing::info!(
            "Reminder {} edited for owner {}, due {}",
            reminder.id,
            owner_id,
            reminder.due_at
        );

        self.arm(reminder.clone());

        Ok(reminder)
    }

    /// The owner's pending reminders, soonest first
    pub async fn list_active(&self, owner_id: &str) -> Result<Vec<Reminder>> {
        self.store.list_active_reminders(owner_id).await
    }

    /// Idempotent delete; also cancels any armed timer for the id
    pub async fn delete_reminder(&self, owner_id: &str, id: i64) -> Result<u64> {
        let affected = self.store.delete_reminder(owner_id, id).await?;

        if affected > 0 {
            self.cancel(id);
            tracing::info!("Reminder {} deleted for owner {}", id, owner_id);
        }

        Ok(affected)
    }

    /// Delete every reminder owned by the user, cancelling their timers
    pub async fn clear_owner(&self, owner_id: &str) -> Result<u64> {
        for reminder in self.store.list_reminders(owner_id).await? {
            self.cancel(reminder.id);
        }

        self.store.delete_reminders_for(owner_id).await
    }

    /// Startup recovery sweep over every pending reminder in the store.
    ///
    /// Future reminders are re-armed; reminders that came due during downtime
    /// fire late, once. An overdue recurring reminder then advances past now
    /// in whole periods before re-arming, an overdue one-shot completes.
    pub async fn recover(&self) -> Result<usize> {
        let pending = self.store.pending_reminders().await?;
        let swept = pending.len();
        let now = Utc::now();

        let mut rearmed = 0usize;
        let mut fired_late = 0usize;

        for mut reminder in pending {
            if reminder.due_at > now {
                self.arm(reminder);
                rearmed += 1;
                continue;
            }

            fired_late += 1;
            scheduler::send_with_retry(
                &self.transport,
                &reminder.owner_id,
                &format!("⏰ Reminder: {}", reminder.text),
            )
            .await;

            if reminder.recurrence.is_some() {
                reminder.catch_up(now);
                self.store.update_reminder(&reminder).await?;
                self.arm(reminder);
                rearmed += 1;
            } else {
                reminder.completed = true;
                self.store.update_reminder(&reminder).await?;
            }
        }

        tracing::info!(
            "Recovery sweep: {} pending, {} re-armed, {} fired late",
            swept,
            rearmed,
            fired_late
        );

        Ok(swept)
    }

    /// Arm the timer pipeline for the reminder's current due time, replacing
    /// any timer already registered for its id
    pub fn arm(&self, reminder: Reminder) {
        let Some(manager) = self.weak.upgrade() else {
            // Manager is being dropped; nothing left to arm against
            return;
        };

        let id = reminder.id;
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        // The registry lock is held across spawn + insert so the new task
        // cannot observe the map before its own handle is registered.
        let mut timers = self.timers.lock().unwrap();
        let handle = tokio::spawn(scheduler::run(manager, reminder, generation));

        if let Some(stale) = timers.insert(id, ArmedTimer { generation, handle }) {
            stale.handle.abort();
            tracing::debug!("Cancelled stale timer for reminder {}", id);
        }
    }

    /// Number of currently armed timers
    pub fn armed_count(&self) -> usize {
        self.timers.lock().unwrap().len()
    }

    fn cancel(&self, id: i64) {
        if let Some(timer) = self.timers.lock().unwrap().remove(&id) {
            timer.handle.abort();
            tracing::debug!("Cancelled timer for reminder {}", id);
        }
    }

    /// Called by a timer task when its reminder's lifecycle ends. Removes the
    /// registry entry only if it still belongs to this task's generation.
    fn finish(&self, id: i64, generation: u64) {
        let mut timers = self.timers.lock().unwrap();
        if timers.get(&id).is_some_and(|t| t.generation == generation) {
            timers.remove(&id);
        }
    }
}

fn validate_lead_time(minutes: i64) -> Result<()> {
    if !(MIN_REMINDER_MINUTES..=MAX_REMINDER_MINUTES).contains(&minutes) {
        return Err(AppError::Validation(ERR_REMINDER_MINUTES.to_string()));
    }
    Ok(())
}
