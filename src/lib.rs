//! Registration bot: a Telegram bot that walks players through a short
//! tournament registration form and gives administrators an inline menu to
//! review, delete and reset submissions.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, and the single-instance lock
//! - `storage`: SQLite pool, migrations, and the submissions gateway
//! - `conversation`: Session states and the transport-free dialog controller
//! - `telegram`: Bot creation, dispatcher schema, and message delivery
//! - `cli`: Command-line arguments

pub mod cli;
pub mod conversation;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use self::conversation::{AdminSet, Controller, Inbound, SessionState, Transition};
pub use self::core::{config, AppError, AppResult};
pub use self::storage::{create_pool, get_connection, DbConnection, DbPool, SubmissionStore};
