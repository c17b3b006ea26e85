use thiserror::Error;

use crate::storage::StorageError;

/// Centralized process-level error type
///
/// Everything that can stop the bot from starting or a CLI command from
/// finishing ends up here. Per-event failures inside the conversation never
/// reach this type; they are handled where they happen.
///
/// # Example
///
/// ```no_run
/// use registration_bot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Submissions store errors surfaced by CLI commands
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Another process holds the lock file
    #[error("Bot is already running (lock file {path} held by pid {pid})")]
    AlreadyRunning { path: String, pid: String },

    /// Anyhow errors (pool creation, migrations, logger setup)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
