//! Handler types and dependencies

use std::sync::Arc;

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use teloxide::types::User;

use crate::conversation::{Controller, SessionState};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type HandlerResult = Result<(), HandlerError>;

/// Per-chat session handle. Sessions live in memory and are lost on restart.
pub type SessionDialogue = Dialogue<SessionState, InMemStorage<SessionState>>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub controller: Arc<Controller>,
}

impl HandlerDeps {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { controller }
    }
}

/// Telegram user id as stored in the admin set.
pub fn sender_id(user: Option<&User>) -> Option<i64> {
    user.and_then(|u| i64::try_from(u.id.0).ok())
}
