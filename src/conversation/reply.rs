//! Outbound messages produced by the controller
//!
//! Transport-neutral: the Telegram layer decides how a [`Target`] maps to
//! `send_message` or `edit_message_text`.

use super::action::AdminAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: AdminAction,
}

impl Button {
    pub fn new(label: impl Into<String>, action: AdminAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Inline keyboard, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn button(self, label: impl Into<String>, action: AdminAction) -> Self {
        self.row(vec![Button::new(label, action)])
    }

    pub fn actions(&self) -> impl Iterator<Item = AdminAction> + '_ {
        self.rows.iter().flatten().map(|b| b.action)
    }

    pub fn contains(&self, action: AdminAction) -> bool {
        self.actions().any(|a| a == action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// New message in the chat the event came from
    Sender,
    /// Replace the message whose button was pressed
    Origin,
    /// New message in another chat (admin notifications)
    Chat(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub target: Target,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Outbound {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            target: Target::Sender,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Self {
            target: Target::Origin,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn notify(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            target: Target::Chat(chat_id),
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
