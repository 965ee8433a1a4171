//! Command grammar and dispatch.
//!
//! Parses the textual command surface into [`Command`] values and drives the
//! managers, converting every failure into the user-visible reply at this
//! boundary — no error crosses back into the event loop.

use chrono::{DateTime, Utc};

use crate::account::{self, ItemKind};
use crate::constants::{
    USAGE_DELETE, USAGE_EDITNOTE, USAGE_EDITREMINDER, USAGE_FILE, USAGE_NOTE, USAGE_REMIND,
    USAGE_SEARCH,
};
use crate::models::{Media, Note, Recurrence, Reminder};
use crate::{media, notes, Assistant};

/// A parsed inbound command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Note {
        title: String,
        content: String,
        category: Option<String>,
    },
    EditNote {
        id: i64,
        title: String,
        content: String,
        category: Option<String>,
    },
    Notes,
    Search {
        query: String,
    },
    Remind {
        minutes: i64,
        text: String,
        recurrence: Option<Recurrence>,
    },
    EditReminder {
        id: i64,
        minutes: i64,
        text: String,
        recurrence: Option<Recurrence>,
    },
    Reminders,
    Media,
    File {
        id: i64,
    },
    Stats,
    Export,
    Clear,
    Delete {
        kind: ItemKind,
        id: i64,
    },
}

/// Parse a command line. `Err` carries the usage message to reply with; no
/// store mutation happens for a malformed invocation.
pub fn parse(line: &str) -> std::result::Result<Command, String> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().unwrap_or("");
    let args: Vec<&str> = tokens.collect();

    match name {
        "/start" => Ok(Command::Start),
        "/help" => Ok(Command::Help),
        "/note" => {
            let (title, rest) = args.split_first().ok_or(USAGE_NOTE)?;
            let (content, category) = split_trailing_category(rest);
            if content.is_empty() {
                return Err(USAGE_NOTE.to_string());
            }
            Ok(Command::Note {
                title: title.to_string(),
                content,
                category,
            })
        }
        "/editnote" => {
            let id = parse_id(args.first(), USAGE_EDITNOTE)?;
            let (title, rest) = args[1..].split_first().ok_or(USAGE_EDITNOTE)?;
            let (content, category) = split_trailing_category(rest);
            if content.is_empty() {
                return Err(USAGE_EDITNOTE.to_string());
            }
            Ok(Command::EditNote {
                id,
                title: title.to_string(),
                content,
                category,
            })
        }
        "/notes" => Ok(Command::Notes),
        "/search" => {
            if args.is_empty() {
                return Err(USAGE_SEARCH.to_string());
            }
            Ok(Command::Search {
                query: args.join(" "),
            })
        }
        "/remind" => {
            let minutes = parse_id(args.first(), USAGE_REMIND)?;
            let (text, recurrence) = split_trailing_recurrence(&args[1..]);
            if text.is_empty() {
                return Err(USAGE_REMIND.to_string());
            }
            Ok(Command::Remind {
                minutes,
                text,
                recurrence,
            })
        }
        "/editreminder" => {
            let id = parse_id(args.first(), USAGE_EDITREMINDER)?;
            let minutes = parse_id(args.get(1), USAGE_EDITREMINDER)?;
            let (text, recurrence) = split_trailing_recurrence(&args[2..]);
            if text.is_empty() {
                return Err(USAGE_EDITREMINDER.to_string());
            }
            Ok(Command::EditReminder {
                id,
                minutes,
                text,
                recurrence,
            })
        }
        "/reminders" => Ok(Command::Reminders),
        "/media" => Ok(Command::Media),
        "/file" => {
            let id = parse_id(args.first(), USAGE_FILE)?;
            Ok(Command::File { id })
        }
        "/stats" => Ok(Command::Stats),
        "/export" => Ok(Command::Export),
        "/clear" => Ok(Command::Clear),
        "/delete" => {
            let kind = args
                .first()
                .and_then(|k| ItemKind::parse(k))
                .ok_or(USAGE_DELETE)?;
            let id = parse_id(args.get(1), USAGE_DELETE)?;
            Ok(Command::Delete { kind, id })
        }
        _ => Err("Unknown command. Send /help for the list of commands".to_string()),
    }
}

/// Execute a parsed command and render the reply
pub async fn dispatch(assistant: &Assistant, owner_id: &str, command: Command) -> String {
    match command {
        Command::Start => {
            "Hi! I'm your personal assistant. Send /help to see what I can do.".to_string()
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Note {
            title,
            content,
            category,
        } => {
            match notes::create_note(
                &assistant.store,
                owner_id,
                &title,
                &content,
                category.as_deref(),
            )
            .await
            {
                Ok(note) => render_note_saved("📝 Note created", &note),
                Err(e) => e.user_message(),
            }
        }
        Command::EditNote {
            id,
            title,
            content,
            category,
        } => {
            match notes::edit_note(
                &assistant.store,
                owner_id,
                id,
                &title,
                &content,
                category.as_deref(),
            )
            .await
            {
                Ok(note) => render_note_saved("✏️ Note edited", &note),
                Err(e) => e.user_message(),
            }
        }
        Command::Notes => match notes::list_notes(&assistant.store, owner_id).await {
            Ok(list) if list.is_empty() => "You have no notes yet".to_string(),
            Ok(list) => render_note_list("📋 Your notes:", &list, true),
            Err(e) => e.user_message(),
        },
        Command::Search { query } => {
            match notes::search_notes(&assistant.store, owner_id, &query).await {
                Ok(list) if list.is_empty() => "No notes matched your search".to_string(),
                Ok(list) => render_note_list(&format!("🔍 Results for \"{query}\":"), &list, false),
                Err(e) => e.user_message(),
            }
        }
        Command::Remind {
            minutes,
            text,
            recurrence,
        } => {
            match assistant
                .reminders
                .create_reminder(owner_id, minutes, &text, recurrence)
                .await
            {
                Ok(reminder) => render_reminder_saved("✅ Reminder set", &reminder),
                Err(e) => e.user_message(),
            }
        }
        Command::EditReminder {
            id,
            minutes,
            text,
            recurrence,
        } => {
            match assistant
                .reminders
                .edit_reminder(owner_id, id, minutes, &text, recurrence)
                .await
            {
                Ok(reminder) => render_reminder_saved("✏️ Reminder edited", &reminder),
                Err(e) => e.user_message(),
            }
        }
        Command::Reminders => match assistant.reminders.list_active(owner_id).await {
            Ok(list) if list.is_empty() => "You have no active reminders".to_string(),
            Ok(list) => render_reminder_list(&list),
            Err(e) => e.user_message(),
        },
        Command::Media => match media::list_media(&assistant.store, owner_id).await {
            Ok(list) if list.is_empty() => "You have no saved media files".to_string(),
            Ok(list) => render_media_list(&list),
            Err(e) => e.user_message(),
        },
        Command::File { id } => {
            match media::send_media_file(&assistant.store, &assistant.transport, owner_id, id).await
            {
                Ok(media) => format!(
                    "📎 Sent: {}",
                    media.file_name.unwrap_or_else(|| format!("media_{id}"))
                ),
                Err(e) => e.user_message(),
            }
        }
        Command::Stats => match account::stats(&assistant.store, owner_id).await {
            Ok(stats) => render_stats(&stats),
            Err(e) => e.user_message(),
        },
        Command::Export => {
            match account::export_all(&assistant.store, &assistant.transport, owner_id).await {
                Ok(()) => "📤 Your data has been exported".to_string(),
                Err(e) => e.user_message(),
            }
        }
        Command::Clear => {
            match account::clear_all(&assistant.store, &assistant.reminders, owner_id).await {
                Ok(_) => "🗑 All your data has been deleted".to_string(),
                Err(e) => e.user_message(),
            }
        }
        Command::Delete { kind, id } => {
            match account::delete_item(&assistant.store, &assistant.reminders, owner_id, kind, id)
                .await
            {
                Ok(affected) if affected > 0 => format!("✅ {} deleted", kind.label()),
                Ok(_) => format!(
                    "Nothing to delete — no {} with ID {}",
                    kind.label().to_lowercase(),
                    id
                ),
                Err(e) => e.user_message(),
            }
        }
    }
}

/// Fallback for plain-text messages that are not commands
pub fn small_talk(text: &str) -> String {
    let lowered = text.to_lowercase();
    let greeted = lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "hello" || word == "hi" || word == "hey");
    if greeted {
        "Hello! How can I help?".to_string()
    } else if lowered.contains("how are you") {
        "Great, thanks! And you?".to_string()
    } else {
        "Got it. Send /help for the list of commands".to_string()
    }
}

const HELP_TEXT: &str = "Available commands:\n\
/start - Start\n\
/note <title> <text...> [#category] - Create a note\n\
/notes - Show all notes\n\
/search <query...> - Search notes\n\
/editnote <id> <title> <text...> [#category] - Edit a note\n\
/remind <minutes> <text...> [daily|weekly] - Set a reminder\n\
/editreminder <id> <minutes> <text...> [daily|weekly] - Edit a reminder\n\
/reminders - Show active reminders\n\
/media - Show media files\n\
/file <media-id> - Download a stored media file\n\
/stats - Show statistics\n\
/export - Export your data\n\
/clear - Delete all your data\n\
/delete <note|reminder|media> <id> - Delete a record";

fn parse_id(token: Option<&&str>, usage: &str) -> std::result::Result<i64, String> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| usage.to_string())
}

/// Pop a trailing `#category` token; the rest joins into the content
fn split_trailing_category(tokens: &[&str]) -> (String, Option<String>) {
    match tokens.split_last() {
        Some((last, rest)) if last.len() > 1 && last.starts_with('#') => {
            (rest.join(" "), Some(last[1..].to_string()))
        }
        _ => (tokens.join(" "), None),
    }
}

/// Pop a trailing recurrence keyword; the rest joins into the reminder text
fn split_trailing_recurrence(tokens: &[&str]) -> (String, Option<Recurrence>) {
    match tokens.split_last() {
        Some((last, rest)) => match Recurrence::parse(last) {
            Some(recurrence) => (rest.join(" "), Some(recurrence)),
            None => (tokens.join(" "), None),
        },
        None => (String::new(), None),
    }
}

fn fmt_time(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

fn render_note_saved(heading: &str, note: &Note) -> String {
    let mut reply = format!(
        "{heading}:\nID: {}\nTitle: {}\nText: {}\n",
        note.id, note.title, note.content
    );
    if let Some(category) = &note.category {
        reply.push_str(&format!("Category: {category}\n"));
    }
    if note.was_edited() {
        reply.push_str(&format!("Last edited: {}", fmt_time(&note.last_edited_at)));
    } else {
        reply.push_str(&format!("Created: {}", fmt_time(&note.created_at)));
    }
    reply
}

fn render_note_list(heading: &str, notes: &[Note], with_edit_hint: bool) -> String {
    let body = notes
        .iter()
        .map(|note| {
            let mut entry = format!("ID: {}\n{}\n   {}\n", note.id, note.title, note.content);
            if let Some(category) = &note.category {
                entry.push_str(&format!("   Category: {category}\n"));
            }
            entry.push_str(&format!("   Created: {}", fmt_time(&note.created_at)));
            if note.was_edited() {
                entry.push_str(&format!("\n   Edited: {}", fmt_time(&note.last_edited_at)));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if with_edit_hint {
        format!("{heading}\n\n{body}\n\nTo edit: /editnote <id> <title> <text...>")
    } else {
        format!("{heading}\n\n{body}")
    }
}

fn render_reminder_saved(heading: &str, reminder: &Reminder) -> String {
    let mut reply = format!(
        "{heading}:\nID: {}\nText: {}\nTime: {}",
        reminder.id,
        reminder.text,
        fmt_time(&reminder.due_at)
    );
    if let Some(recurrence) = reminder.recurrence {
        reply.push_str(&format!("\nRepeats: {}", recurrence.label()));
    }
    reply
}

fn render_reminder_list(reminders: &[Reminder]) -> String {
    let body = reminders
        .iter()
        .map(|reminder| {
            let mut entry = format!(
                "ID: {}\n{}\n   Time: {}",
                reminder.id,
                reminder.text,
                fmt_time(&reminder.due_at)
            );
            if let Some(recurrence) = reminder.recurrence {
                entry.push_str(&format!("\n   Repeats: {}", recurrence.label()));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "⏰ Your active reminders:\n\n{body}\n\nTo edit: /editreminder <id> <minutes> <text...>"
    )
}

fn render_media_list(media: &[Media]) -> String {
    let body = media
        .iter()
        .map(|item| {
            let mut entry = format!("ID: {}\nKind: {}\n", item.id, item.kind.label());
            if let Some(caption) = &item.caption {
                entry.push_str(&format!("   Caption: {caption}\n"));
            }
            if let Some(file_name) = &item.file_name {
                entry.push_str(&format!("   File: {file_name}\n"));
            }
            entry.push_str(&format!("   Uploaded: {}", fmt_time(&item.uploaded_at)));
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("📁 Your media files:\n\n{body}")
}

fn render_stats(stats: &crate::account::Stats) -> String {
    let mut reply = format!(
        "📊 Usage statistics:\n\nNotes: {}\nReminders: {}\nMedia files: {}",
        stats.note_count, stats.reminder_count, stats.media_count
    );
    if !stats.category_breakdown.is_empty() {
        reply.push_str("\n\nNote categories:");
        for (category, count) in &stats.category_breakdown {
            reply.push_str(&format!("\n   {category}: {count}"));
        }
    }
    reply
}
