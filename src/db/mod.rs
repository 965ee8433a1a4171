pub mod media;
pub mod notes;
pub mod reminders;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Additive schema creation, run on every open. Three flat tables keyed by
/// auto-increment id, each carrying the owning user; no cross-table keys.
const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT,
        created_at TEXT NOT NULL,
        last_edited_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        text TEXT NOT NULL,
        due_at TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        recurrence TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS media (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        file_ref TEXT NOT NULL,
        kind TEXT NOT NULL,
        caption TEXT,
        file_name TEXT,
        mime_type TEXT,
        uploaded_at TEXT NOT NULL
    )",
];

/// Handle to the persistence store shared across managers.
///
/// Cheap to clone (the pool is reference-counted). A handle created with
/// [`Store::unavailable`] carries no pool; every operation on it fails fast
/// with `StoreUnavailable`, which is how the process keeps running when
/// startup initialization failed.
#[derive(Clone)]
pub struct Store {
    pool: Option<SqlitePool>,
}

impl Store {
    /// Degraded handle used when store initialization failed at startup
    pub fn unavailable() -> Self {
        Store { pool: None }
    }

    pub(crate) fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or(AppError::StoreUnavailable)
    }
}

/// Open or create the SQLite store at the given path
///
/// Creates the parent directory and all required tables on first run.
pub async fn open_store(path: impl AsRef<Path>) -> Result<Store> {
    tracing::info!("Opening store at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create store directory: {}", e);
                AppError::Io(e)
            })?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    // Initialize tables on first run
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    tracing::info!("Store initialized successfully");

    Ok(Store { pool: Some(pool) })
}
