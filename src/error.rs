use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store not initialized")]
    StoreUnavailable,

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl AppError {
    /// Convert the error into the user-visible reply text.
    ///
    /// Validation failures echo their usage string and not-found lookups name
    /// the missing record kind; everything else is logged and reported as a
    /// generic failure so internals never leak into the chat.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(kind) => format!("{kind} not found"),
            AppError::StoreUnavailable => {
                tracing::error!("Operation attempted before store initialization");
                crate::constants::MSG_GENERIC_FAILURE.to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                crate::constants::MSG_GENERIC_FAILURE.to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                crate::constants::MSG_GENERIC_FAILURE.to_string()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                crate::constants::MSG_GENERIC_FAILURE.to_string()
            }
            AppError::Transport(e) => {
                tracing::error!("Transport error: {}", e);
                crate::constants::MSG_GENERIC_FAILURE.to_string()
            }
        }
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
