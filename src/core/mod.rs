//! Core utilities: configuration, errors, logging, and the single-instance lock

pub mod config;
pub mod error;
pub mod lock;
pub mod logging;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use lock::InstanceLock;
pub use logging::{init_logger, log_startup_configuration};
