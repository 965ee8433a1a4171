//! Timer task bodies for armed reminders.
//!
//! One spawned task carries a reminder through its whole lifecycle:
//! pre-notification, firing, and either completion or the recurrence loop.
//! Cancellation is external (`JoinHandle::abort` via the registry).

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

use crate::constants::{PRE_NOTIFY_LEAD_SECS, SEND_RETRY_DELAY_SECS};
use crate::models::Reminder;
use crate::transport::SharedTransport;

use super::ReminderManager;

/// Drive one reminder from its current due time to the end of its lifecycle
pub(super) async fn run(manager: Arc<ReminderManager>, mut reminder: Reminder, generation: u64) {
    loop {
        // Pre-notification five minutes ahead, only when the due time is far
        // enough out. Fire-and-forget: a failure is logged and the firing
        // path is untouched.
        let lead = Duration::seconds(PRE_NOTIFY_LEAD_SECS);
        if reminder.due_at - Utc::now() > lead {
            sleep_until(reminder.due_at - lead).await;
            send_with_retry(
                &manager.transport,
                &reminder.owner_id,
                &format!("⏰ 5 minutes until: {}", reminder.text),
            )
            .await;
        }

        sleep_until(reminder.due_at).await;

        send_with_retry(
            &manager.transport,
            &reminder.owner_id,
            &format!("⏰ Reminder: {}", reminder.text),
        )
        .await;

        if reminder.recurrence.is_some() {
            // Read-modify-persist-rearm; the store is the consistency point
            reminder.advance();
            if let Err(e) = manager.store.update_reminder(&reminder).await {
                tracing::error!(
                    "Failed to persist rescheduled reminder {}: {}",
                    reminder.id,
                    e
                );
                break;
            }
            tracing::info!(
                "Reminder {} rescheduled for {}",
                reminder.id,
                reminder.due_at
            );
        } else {
            reminder.completed = true;
            if let Err(e) = manager.store.update_reminder(&reminder).await {
                tracing::error!("Failed to complete reminder {}: {}", reminder.id, e);
            } else {
                tracing::info!("Reminder {} completed", reminder.id);
            }
            break;
        }
    }

    manager.finish(reminder.id, generation);
}

/// Sleep until an absolute deadline; a deadline already in the past returns
/// immediately
async fn sleep_until(deadline: DateTime<Utc>) {
    let remaining = (deadline - Utc::now())
        .to_std()
        .unwrap_or(StdDuration::ZERO);
    tokio::time::sleep(remaining).await;
}

/// Send a notification with one bounded retry. Permanent failures are logged
/// and swallowed; notification delivery never fails the caller.
pub(super) async fn send_with_retry(transport: &SharedTransport, owner_id: &str, text: &str) {
    if let Err(first) = transport.send(owner_id, text).await {
        tracing::warn!(
            "Notification send to owner {} failed, retrying: {}",
            owner_id,
            first
        );
        tokio::time::sleep(StdDuration::from_secs(SEND_RETRY_DELAY_SECS)).await;

        if let Err(second) = transport.send(owner_id, text).await {
            tracing::warn!(
                "Notification send to owner {} permanently failed: {}",
                owner_id,
                second
            );
        }
    }
}
