//! Integration tests for the assistant bot
//!
//! These drive the managers end to end against a real SQLite store in a
//! temporary directory, with a recording transport standing in for the
//! messaging platform.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tempfile::TempDir;

use minder::account::{self, ExportDocument, ItemKind};
use minder::constants::USAGE_NOTE;
use minder::error::{AppError, Result};
use minder::models::{MediaKind, MediaUpload, Recurrence};
use minder::{media, notes, open_store, Assistant, Config, Store, Transport};

// =============================================================================
// Test Helpers
// =============================================================================

const OWNER: &str = "owner-a";
const OTHER_OWNER: &str = "owner-b";

#[derive(Debug, Clone)]
struct SentFile {
    location: String,
    display_name: String,
    /// Contents read at send time; export artifacts are deleted right after
    content: Option<String>,
}

/// Transport double that records every outbound send
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    files: Mutex<Vec<SentFile>>,
    fail_sends: AtomicBool,
    send_attempts: AtomicUsize,
    fail_next_sends: AtomicUsize,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            send_attempts: AtomicUsize::new(0),
            fail_next_sends: AtomicUsize::new(0),
        })
    }

    fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn sent_files(&self) -> Vec<SentFile> {
        self.files.lock().unwrap().clone()
    }

    fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    /// Make the next `count` text sends fail, then recover
    fn fail_next_sends(&self, count: usize) {
        self.fail_next_sends.store(count, Ordering::SeqCst);
    }

    fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, owner_id: &str, text: &str) -> Result<()> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::Transport("simulated send failure".to_string()));
        }
        if self.fail_next_sends.load(Ordering::SeqCst) > 0 {
            self.fail_next_sends.fetch_sub(1, Ordering::SeqCst);
            return Err(AppError::Transport("simulated send failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((owner_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_file(&self, _owner_id: &str, location: &str, display_name: &str) -> Result<()> {
        // Record before the failure check so tests can inspect the artifact
        // path even when the send is simulated to fail
        self.files.lock().unwrap().push(SentFile {
            location: location.to_string(),
            display_name: display_name.to_string(),
            content: std::fs::read_to_string(location).ok(),
        });

        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AppError::Transport("simulated send failure".to_string()));
        }
        Ok(())
    }

    async fn resolve_file_link(&self, file_ref: &str) -> Result<String> {
        Ok(format!("https://files.example/{file_ref}"))
    }
}

fn test_config() -> Config {
    Config {
        database_path: String::new(), // Unused; tests open their store directly
        environment: "test".to_string(),
    }
}

/// Fresh assistant over an isolated store in a temporary directory
async fn test_assistant() -> (TempDir, Assistant, Arc<RecordingTransport>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = open_store(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to open test store");
    let transport = RecordingTransport::new();
    let assistant = Assistant::new(store, transport.clone(), test_config());
    (temp_dir, assistant, transport)
}

fn photo_upload(file_ref: &str) -> MediaUpload {
    MediaUpload {
        file_ref: file_ref.to_string(),
        kind: MediaKind::Photo,
        caption: Some("sunset".to_string()),
        file_name: None,
        mime_type: None,
    }
}

// =============================================================================
// Notes
// =============================================================================

#[tokio::test]
async fn test_note_create_and_edit_scenario() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let note = notes::create_note(&assistant.store, OWNER, "Shopping", "milk, eggs", Some("home"))
        .await
        .unwrap();

    assert!(note.id >= 1);
    assert_eq!(note.category.as_deref(), Some("home"));
    assert_eq!(note.created_at, note.last_edited_at);

    tokio::time::sleep(StdDuration::from_millis(50)).await;

    let edited = notes::edit_note(
        &assistant.store,
        OWNER,
        note.id,
        "Shopping List",
        "milk, eggs, bread",
        None,
    )
    .await
    .unwrap();

    assert_eq!(edited.title, "Shopping List");
    assert!(edited.last_edited_at > note.created_at);
    // Category not supplied on edit reverts to absent
    assert_eq!(edited.category, None);

    let listed = notes::list_notes(&assistant.store, OWNER).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].category, None);
    assert_eq!(listed[0].content, "milk, eggs, bread");
}

#[tokio::test]
async fn test_note_validation_rejects_empty_fields() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let err = notes::create_note(&assistant.store, OWNER, "", "content", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = notes::create_note(&assistant.store, OWNER, "title", "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(assistant.store.count_notes(OWNER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_search_hit_and_miss() {
    let (_dir, assistant, _transport) = test_assistant().await;

    notes::create_note(&assistant.store, OWNER, "Shopping", "milk, eggs", Some("home"))
        .await
        .unwrap();
    notes::create_note(&assistant.store, OWNER, "Ideas", "weekend trip", None)
        .await
        .unwrap();

    let hits = notes::search_notes(&assistant.store, OWNER, "milk")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Shopping");

    // Category matches too
    let hits = notes::search_notes(&assistant.store, OWNER, "home")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    // Substring match is case-sensitive
    let hits = notes::search_notes(&assistant.store, OWNER, "MILK")
        .await
        .unwrap();
    assert!(hits.is_empty());

    // A miss is an empty sequence, not an error
    let hits = notes::search_notes(&assistant.store, OWNER, "xyz")
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_listings_follow_documented_order() {
    let (_dir, assistant, _transport) = test_assistant().await;

    // Notes list newest first
    let first = notes::create_note(&assistant.store, OWNER, "First", "a", None)
        .await
        .unwrap();
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    let second = notes::create_note(&assistant.store, OWNER, "Second", "b", None)
        .await
        .unwrap();

    let listed = notes::list_notes(&assistant.store, OWNER).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // Active reminders list soonest first, regardless of creation order
    let later = assistant
        .reminders
        .create_reminder(OWNER, 30, "later", None)
        .await
        .unwrap();
    let sooner = assistant
        .reminders
        .create_reminder(OWNER, 10, "sooner", None)
        .await
        .unwrap();

    let active = assistant.reminders.list_active(OWNER).await.unwrap();
    let ids: Vec<i64> = active.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);

    // Media list newest upload first
    let old = media::record_media(&assistant.store, OWNER, &photo_upload("file-1"))
        .await
        .unwrap();
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    let recent = media::record_media(&assistant.store, OWNER, &photo_upload("file-2"))
        .await
        .unwrap();

    let listed = media::list_media(&assistant.store, OWNER).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![recent.id, old.id]);
}

// =============================================================================
// Deletion & Ownership
// =============================================================================

#[tokio::test]
async fn test_delete_nonexistent_is_idempotent() {
    let (_dir, assistant, _transport) = test_assistant().await;

    assert_eq!(notes::delete_note(&assistant.store, OWNER, 999).await.unwrap(), 0);
    assert_eq!(
        assistant.reminders.delete_reminder(OWNER, 999).await.unwrap(),
        0
    );
    assert_eq!(media::delete_media(&assistant.store, OWNER, 999).await.unwrap(), 0);
}

#[tokio::test]
async fn test_ownership_isolation() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let note = notes::create_note(&assistant.store, OWNER, "Private", "secret", None)
        .await
        .unwrap();
    let reminder = assistant
        .reminders
        .create_reminder(OWNER, 10, "call mom", None)
        .await
        .unwrap();
    let media_record = media::record_media(&assistant.store, OWNER, &photo_upload("file-1"))
        .await
        .unwrap();

    // Another owner sees nothing
    assert!(notes::list_notes(&assistant.store, OTHER_OWNER).await.unwrap().is_empty());
    assert!(assistant.reminders.list_active(OTHER_OWNER).await.unwrap().is_empty());
    assert!(media::list_media(&assistant.store, OTHER_OWNER).await.unwrap().is_empty());
    assert!(notes::search_notes(&assistant.store, OTHER_OWNER, "secret")
        .await
        .unwrap()
        .is_empty());

    // Guessing a valid id does not help
    let err = notes::edit_note(&assistant.store, OTHER_OWNER, note.id, "t", "c", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = assistant
        .reminders
        .edit_reminder(OTHER_OWNER, reminder.id, 5, "hijack", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert_eq!(
        notes::delete_note(&assistant.store, OTHER_OWNER, note.id).await.unwrap(),
        0
    );
    assert_eq!(
        media::delete_media(&assistant.store, OTHER_OWNER, media_record.id)
            .await
            .unwrap(),
        0
    );

    // Nothing was touched
    assert_eq!(assistant.store.count_notes(OWNER).await.unwrap(), 1);
    assert_eq!(assistant.store.count_media(OWNER).await.unwrap(), 1);
}

// =============================================================================
// Reminder Lifecycle
// =============================================================================

#[tokio::test]
async fn test_reminder_lead_time_boundaries() {
    let (_dir, assistant, _transport) = test_assistant().await;

    for minutes in [0, 1441, -3] {
        let err = assistant
            .reminders
            .create_reminder(OWNER, minutes, "x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "minutes={minutes}");
    }

    assert!(assistant
        .reminders
        .create_reminder(OWNER, 1, "low boundary", None)
        .await
        .is_ok());
    assert!(assistant
        .reminders
        .create_reminder(OWNER, 1440, "high boundary", None)
        .await
        .is_ok());

    let err = assistant
        .reminders
        .create_reminder(OWNER, 10, "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_reminder_due_time_and_active_listing() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let before = Utc::now();
    let reminder = assistant
        .reminders
        .create_reminder(OWNER, 10, "call mom", None)
        .await
        .unwrap();

    let expected = before + Duration::minutes(10);
    let drift = (reminder.due_at - expected).num_seconds().abs();
    assert!(drift < 5, "due_at drifted {drift}s from now+10min");

    let active = assistant.reminders.list_active(OWNER).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, reminder.id);
    assert!(!active[0].completed);
}

#[tokio::test]
async fn test_one_shot_reminder_fires_and_completes() {
    let (_dir, assistant, transport) = test_assistant().await;

    let now = Utc::now();
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "stretch", now + Duration::milliseconds(200), None, now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    tokio::time::sleep(StdDuration::from_millis(900)).await;

    let texts = transport.sent_texts();
    assert!(
        texts.iter().any(|t| t == "⏰ Reminder: stretch"),
        "firing notification missing: {texts:?}"
    );

    let stored = assistant
        .store
        .find_reminder(OWNER, reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.completed);

    assert!(assistant.reminders.list_active(OWNER).await.unwrap().is_empty());
    assert_eq!(assistant.reminders.armed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pre_notification_precedes_firing() {
    let (_dir, assistant, transport) = test_assistant().await;

    // Far enough out that the five-minute warning applies
    let now = Utc::now();
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "stand up", now + Duration::minutes(10), None, now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    // The paused clock advances through both sleeps as the suite idles
    for _ in 0..100 {
        if transport.sent_texts().len() >= 2 {
            break;
        }
        tokio::time::sleep(StdDuration::from_secs(30)).await;
    }

    assert_eq!(
        transport.sent_texts(),
        vec![
            "⏰ 5 minutes until: stand up".to_string(),
            "⏰ Reminder: stand up".to_string(),
        ]
    );

    for _ in 0..100 {
        if assistant.reminders.armed_count() == 0 {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(50)).await;
    }
    let stored = assistant
        .store
        .find_reminder(OWNER, reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.completed);
}

#[tokio::test(start_paused = true)]
async fn test_failed_notification_send_is_retried_once() {
    let (_dir, assistant, transport) = test_assistant().await;
    transport.fail_next_sends(1);

    let now = Utc::now();
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "stretch", now + Duration::seconds(1), None, now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    for _ in 0..100 {
        if !transport.sent_texts().is_empty() {
            break;
        }
        tokio::time::sleep(StdDuration::from_secs(2)).await;
    }

    // First attempt failed; the single retry delivered it
    assert_eq!(transport.send_attempts(), 2);
    assert_eq!(transport.sent_texts(), vec!["⏰ Reminder: stretch".to_string()]);

    // The firing path is untouched by the transient failure
    for _ in 0..100 {
        if assistant.reminders.armed_count() == 0 {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(50)).await;
    }
    let stored = assistant
        .store
        .find_reminder(OWNER, reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.completed);
}

#[tokio::test]
async fn test_recurring_reminder_advances_instead_of_completing() {
    let (_dir, assistant, transport) = test_assistant().await;

    let now = Utc::now();
    let due = now + Duration::milliseconds(200);
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "standup", due, Some(Recurrence::Daily), now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    tokio::time::sleep(StdDuration::from_millis(900)).await;

    assert!(transport
        .sent_texts()
        .iter()
        .any(|t| t == "⏰ Reminder: standup"));

    let stored = assistant
        .store
        .find_reminder(OWNER, reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.completed);

    // Advanced by exactly one day
    let advance = (stored.due_at - (due + Duration::days(1))).num_seconds();
    assert_eq!(advance, 0, "due_at not advanced by 24h");

    // Still armed for the next firing
    assert_eq!(assistant.reminders.armed_count(), 1);
}

#[tokio::test]
async fn test_edit_cancels_stale_timer() {
    let (_dir, assistant, transport) = test_assistant().await;

    let now = Utc::now();
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "original", now + Duration::milliseconds(300), None, now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    // Re-arm for half an hour out before the original timer fires
    let edited = assistant
        .reminders
        .edit_reminder(OWNER, reminder.id, 30, "changed", None)
        .await
        .unwrap();
    assert!(!edited.completed);

    tokio::time::sleep(StdDuration::from_millis(900)).await;

    // The stale timer must not have fired
    assert!(
        transport.sent_texts().is_empty(),
        "stale timer fired after edit: {:?}",
        transport.sent_texts()
    );
    assert_eq!(assistant.reminders.armed_count(), 1);

    let stored = assistant
        .store
        .find_reminder(OWNER, reminder.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.completed);
    assert_eq!(stored.text, "changed");
}

#[tokio::test]
async fn test_delete_cancels_timer() {
    let (_dir, assistant, transport) = test_assistant().await;

    let now = Utc::now();
    let reminder = assistant
        .store
        .insert_reminder(OWNER, "doomed", now + Duration::milliseconds(300), None, now)
        .await
        .unwrap();
    assistant.reminders.arm(reminder.clone());

    assert_eq!(
        assistant.reminders.delete_reminder(OWNER, reminder.id).await.unwrap(),
        1
    );
    assert_eq!(assistant.reminders.armed_count(), 0);

    tokio::time::sleep(StdDuration::from_millis(700)).await;
    assert!(transport.sent_texts().is_empty());
}

#[tokio::test]
async fn test_recovery_sweep() {
    let (_dir, assistant, transport) = test_assistant().await;
    let now = Utc::now();

    // Came due during downtime, one-shot: fires late once, then completes
    let missed = assistant
        .store
        .insert_reminder(OWNER, "missed", now - Duration::hours(1), None, now)
        .await
        .unwrap();

    // Came due during downtime, recurring: fires late once, catches up
    let recurring_due = now - Duration::hours(25);
    let recurring = assistant
        .store
        .insert_reminder(OWNER, "water plants", recurring_due, Some(Recurrence::Daily), now)
        .await
        .unwrap();

    // Still in the future: just re-armed
    assistant
        .store
        .insert_reminder(OWNER, "later", now + Duration::hours(1), None, now)
        .await
        .unwrap();

    let swept = assistant.recover().await.unwrap();
    assert_eq!(swept, 3);

    let texts = transport.sent_texts();
    assert!(texts.iter().any(|t| t == "⏰ Reminder: missed"));
    assert!(texts.iter().any(|t| t == "⏰ Reminder: water plants"));

    let missed_stored = assistant
        .store
        .find_reminder(OWNER, missed.id)
        .await
        .unwrap()
        .unwrap();
    assert!(missed_stored.completed);

    let recurring_stored = assistant
        .store
        .find_reminder(OWNER, recurring.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!recurring_stored.completed);
    assert!(recurring_stored.due_at > now);
    // 25h overdue advances two whole daily periods
    let caught_up = (recurring_stored.due_at - (recurring_due + Duration::days(2))).num_seconds();
    assert_eq!(caught_up, 0);

    // The future one-shot and the caught-up recurring reminder are armed
    assert_eq!(assistant.reminders.armed_count(), 2);
}

// =============================================================================
// Media
// =============================================================================

#[tokio::test]
async fn test_media_upload_and_listing() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let reply = assistant.handle_media_upload(OWNER, photo_upload("file-7")).await;
    assert!(reply.contains("Photo saved"));
    assert!(reply.contains("/file 1"));

    let listed = media::list_media(&assistant.store, OWNER).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, MediaKind::Photo);
    assert_eq!(listed[0].file_ref, "file-7");
    assert_eq!(listed[0].caption.as_deref(), Some("sunset"));
}

#[tokio::test]
async fn test_file_command_resolves_and_sends() {
    let (_dir, assistant, transport) = test_assistant().await;

    let upload = MediaUpload {
        file_ref: "doc-42".to_string(),
        kind: MediaKind::Document,
        caption: None,
        file_name: Some("notes.pdf".to_string()),
        mime_type: Some("application/pdf".to_string()),
    };
    assistant.handle_media_upload(OWNER, upload).await;

    let reply = assistant.handle_message(OWNER, "/file 1").await;
    assert!(reply.contains("notes.pdf"), "unexpected reply: {reply}");

    let files = transport.sent_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].location, "https://files.example/doc-42");
    assert_eq!(files[0].display_name, "notes.pdf");
}

// =============================================================================
// Stats, Export, Clear
// =============================================================================

#[tokio::test]
async fn test_stats_counts_and_category_breakdown() {
    let (_dir, assistant, _transport) = test_assistant().await;

    notes::create_note(&assistant.store, OWNER, "A", "a", Some("home")).await.unwrap();
    notes::create_note(&assistant.store, OWNER, "B", "b", Some("home")).await.unwrap();
    notes::create_note(&assistant.store, OWNER, "C", "c", None).await.unwrap();
    assistant
        .reminders
        .create_reminder(OWNER, 10, "call mom", None)
        .await
        .unwrap();
    media::record_media(&assistant.store, OWNER, &photo_upload("file-1")).await.unwrap();

    let stats = account::stats(&assistant.store, OWNER).await.unwrap();
    assert_eq!(stats.note_count, 3);
    assert_eq!(stats.reminder_count, 1);
    assert_eq!(stats.media_count, 1);
    // Uncategorized notes are excluded from the breakdown
    assert_eq!(stats.category_breakdown, vec![("home".to_string(), 2)]);
}

#[tokio::test]
async fn test_export_round_trip() {
    let (_dir, assistant, transport) = test_assistant().await;

    notes::create_note(&assistant.store, OWNER, "Shopping", "milk, eggs", Some("home"))
        .await
        .unwrap();
    assistant
        .reminders
        .create_reminder(OWNER, 10, "call mom", Some(Recurrence::Weekly))
        .await
        .unwrap();
    media::record_media(&assistant.store, OWNER, &photo_upload("file-9")).await.unwrap();

    account::export_all(&assistant.store, &assistant.transport, OWNER)
        .await
        .unwrap();

    let files = transport.sent_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].display_name, "export.json");

    // The transient artifact is gone after the send
    assert!(!Path::new(&files[0].location).exists());

    // Re-import reproduces every field value
    let content = files[0].content.as_ref().expect("artifact content captured");
    let document: ExportDocument = serde_json::from_str(content).unwrap();

    assert_eq!(document.notes, assistant.store.list_notes(OWNER).await.unwrap());
    assert_eq!(
        document.reminders,
        assistant.store.list_reminders(OWNER).await.unwrap()
    );
    assert_eq!(document.media, assistant.store.list_media(OWNER).await.unwrap());
}

#[tokio::test]
async fn test_export_artifact_removed_when_send_fails() {
    let (_dir, assistant, transport) = test_assistant().await;

    notes::create_note(&assistant.store, OWNER, "A", "a", None).await.unwrap();

    transport.set_failing(true);
    let err = account::export_all(&assistant.store, &assistant.transport, OWNER)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));

    // Removed regardless of send success or failure
    let files = transport.sent_files();
    assert_eq!(files.len(), 1);
    assert!(!Path::new(&files[0].location).exists());
}

#[tokio::test]
async fn test_clear_all_deletes_everything_and_cancels_timers() {
    let (_dir, assistant, _transport) = test_assistant().await;

    notes::create_note(&assistant.store, OWNER, "A", "a", None).await.unwrap();
    assistant
        .reminders
        .create_reminder(OWNER, 10, "call mom", None)
        .await
        .unwrap();
    media::record_media(&assistant.store, OWNER, &photo_upload("file-1")).await.unwrap();

    // Another owner's data must survive the clear
    notes::create_note(&assistant.store, OTHER_OWNER, "B", "b", None).await.unwrap();

    let (notes_deleted, reminders_deleted, media_deleted) =
        account::clear_all(&assistant.store, &assistant.reminders, OWNER)
            .await
            .unwrap();
    assert_eq!((notes_deleted, reminders_deleted, media_deleted), (1, 1, 1));

    assert_eq!(assistant.store.count_notes(OWNER).await.unwrap(), 0);
    assert_eq!(assistant.store.count_reminders(OWNER).await.unwrap(), 0);
    assert_eq!(assistant.store.count_media(OWNER).await.unwrap(), 0);
    assert_eq!(assistant.reminders.armed_count(), 0);

    assert_eq!(assistant.store.count_notes(OTHER_OWNER).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_item_dispatch() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let note = notes::create_note(&assistant.store, OWNER, "A", "a", None).await.unwrap();

    let affected = account::delete_item(
        &assistant.store,
        &assistant.reminders,
        OWNER,
        ItemKind::Note,
        note.id,
    )
    .await
    .unwrap();
    assert_eq!(affected, 1);
    assert_eq!(assistant.store.count_notes(OWNER).await.unwrap(), 0);
}

// =============================================================================
// Boundary Behavior
// =============================================================================

#[tokio::test]
async fn test_unavailable_store_fails_fast() {
    let transport = RecordingTransport::new();
    let assistant = Assistant::new(Store::unavailable(), transport.clone(), test_config());

    let err = notes::create_note(&assistant.store, OWNER, "t", "c", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable));

    // At the command boundary this surfaces as a generic failure reply
    let reply = assistant.handle_message(OWNER, "/notes").await;
    assert_eq!(reply, minder::constants::MSG_GENERIC_FAILURE);
}

#[tokio::test]
async fn test_malformed_command_mutates_nothing() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let reply = assistant.handle_message(OWNER, "/note OnlyTitle").await;
    assert_eq!(reply, USAGE_NOTE);
    assert_eq!(assistant.store.count_notes(OWNER).await.unwrap(), 0);

    let reply = assistant.handle_message(OWNER, "/remind ten call mom").await;
    assert!(reply.starts_with("Usage:"));
    assert_eq!(assistant.store.count_reminders(OWNER).await.unwrap(), 0);
}

#[tokio::test]
async fn test_command_round_trip_replies() {
    let (_dir, assistant, _transport) = test_assistant().await;

    let reply = assistant
        .handle_message(OWNER, "/note Shopping milk, eggs #home")
        .await;
    assert!(reply.contains("📝 Note created"), "unexpected reply: {reply}");
    assert!(reply.contains("Category: home"));

    let reply = assistant.handle_message(OWNER, "/notes").await;
    assert!(reply.contains("Shopping"));

    let reply = assistant.handle_message(OWNER, "/remind 10 call mom daily").await;
    assert!(reply.contains("✅ Reminder set"));
    assert!(reply.contains("Repeats: daily"));

    let reply = assistant.handle_message(OWNER, "/reminders").await;
    assert!(reply.contains("call mom"));

    let reply = assistant.handle_message(OWNER, "/delete note 1").await;
    assert_eq!(reply, "✅ Note deleted");

    let reply = assistant.handle_message(OWNER, "/delete note 1").await;
    assert!(reply.contains("Nothing to delete"));

    // Plain text falls through to small talk
    let reply = assistant.handle_message(OWNER, "hello").await;
    assert_eq!(reply, "Hello! How can I help?");
}
