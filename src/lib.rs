//! Personal-assistant bot library
//!
//! Persists notes, timed reminders, and media metadata per owner, and drives
//! an in-process timer pipeline for reminder delivery. The messaging platform
//! sits behind the [`Transport`] trait; inbound traffic enters through
//! [`Assistant::handle_message`] and [`Assistant::handle_media_upload`].

pub mod account;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod media;
pub mod models;
pub mod notes;
pub mod reminders;
pub mod transport;

pub use config::Config;
pub use db::{open_store, Store};
pub use error::{AppError, Result};
pub use transport::{SharedTransport, Transport};

use std::sync::Arc;

use crate::models::MediaUpload;
use crate::reminders::ReminderManager;

/// Application state shared across all inbound handlers
#[derive(Clone)]
pub struct Assistant {
    pub store: Store,
    pub transport: SharedTransport,
    pub reminders: Arc<ReminderManager>,
    pub config: Config,
}

impl Assistant {
    /// Wire the managers over the given store and transport
    pub fn new(store: Store, transport: SharedTransport, config: Config) -> Self {
        let reminders = ReminderManager::new(store.clone(), transport.clone());
        Assistant {
            store,
            transport,
            reminders,
            config,
        }
    }

    /// Re-arm pending reminders after a restart; returns the number swept
    pub async fn recover(&self) -> Result<usize> {
        self.reminders.recover().await
    }

    /// Handle one inbound text message and return the reply to send.
    ///
    /// Lines starting with `/` go through the command grammar; anything else
    /// gets the small-talk fallback. Every failure is converted to reply
    /// text here — this function does not error.
    pub async fn handle_message(&self, owner_id: &str, text: &str) -> String {
        let trimmed = text.trim();
        if !trimmed.starts_with('/') {
            return commands::small_talk(trimmed);
        }

        match commands::parse(trimmed) {
            Ok(command) => commands::dispatch(self, owner_id, command).await,
            Err(usage) => usage,
        }
    }

    /// Handle one inbound media upload and return the acknowledgement reply
    pub async fn handle_media_upload(&self, owner_id: &str, upload: MediaUpload) -> String {
        match media::record_media(&self.store, owner_id, &upload).await {
            Ok(media) => {
                let saved = match media.kind {
                    models::MediaKind::Photo => "📸 Photo saved!",
                    models::MediaKind::Video => "🎥 Video saved!",
                    models::MediaKind::Document => "📄 Document saved!",
                    models::MediaKind::Voice => "🎤 Voice message saved!",
                };
                format!("{saved}\nUse /file {} to download it.", media.id)
            }
            Err(e) => e.user_message(),
        }
    }
}
