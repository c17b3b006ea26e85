//! Telegram bot handler tree configuration
//!
//! The dispatcher schema turns updates into controller events. Integration
//! tests drive the controller directly with the same events.

mod schema;
mod types;

pub use schema::schema;
pub use types::{sender_id, HandlerDeps, HandlerError, HandlerResult, SessionDialogue};
