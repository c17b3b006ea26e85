//! Database pool, migrations, and the submissions gateway

pub mod db;
pub mod migrations;
pub mod submissions;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use submissions::{
    Aggregate, NewSubmission, SqliteSubmissionStore, StorageError, StorageResult, Submission, SubmissionStore,
    TeamCount, UnavailableStore,
};
