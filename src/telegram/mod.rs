//! Telegram bot integration and handlers

pub mod bot;
pub mod delivery;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use delivery::{deliver, to_markup, MessageSender};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use teloxide::Bot;
