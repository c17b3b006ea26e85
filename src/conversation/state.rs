//! Per-chat session state
//!
//! One enum instead of a bag of flags: each variant carries exactly what
//! the next event needs, so a pending deletion target cannot outlive its
//! confirmation screen.

use crate::core::config::registration::PLACEHOLDER;
use crate::storage::NewSubmission;

/// Registration form steps, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Nickname,
    Rank,
    Name,
    Contact,
    Team,
}

impl Step {
    pub const FIRST: Step = Step::Nickname;

    /// Step after this one, `None` after the last.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Nickname => Some(Step::Rank),
            Step::Rank => Some(Step::Name),
            Step::Name => Some(Step::Contact),
            Step::Contact => Some(Step::Team),
            Step::Team => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Step::Nickname => "1. Введите ваш никнейм в игре:",
            Step::Rank => "2. Какое у вас звание/ранг?",
            Step::Name => "3. Ваше имя (не обязательно):",
            Step::Contact => "4. Способ связи (Telegram, Discord и т.д.):",
            Step::Team => "5. Команда (или 'Нет'):",
        }
    }
}

/// Answers collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub nickname: Option<String>,
    pub rank: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub team: Option<String>,
}

impl Draft {
    pub fn set(&mut self, step: Step, answer: String) {
        let slot = match step {
            Step::Nickname => &mut self.nickname,
            Step::Rank => &mut self.rank,
            Step::Name => &mut self.name,
            Step::Contact => &mut self.contact,
            Step::Team => &mut self.team,
        };
        *slot = Some(answer);
    }

    /// Final record; any field never answered becomes the placeholder.
    pub fn into_submission(self) -> NewSubmission {
        let fill = |value: Option<String>| value.unwrap_or_else(|| PLACEHOLDER.to_string());
        NewSubmission {
            nickname: fill(self.nickname),
            rank: fill(self.rank),
            name: Some(fill(self.name)),
            contact: fill(self.contact),
            team: Some(fill(self.team)),
        }
    }
}

/// Where a chat is in the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Registration {
        step: Step,
        draft: Draft,
    },
    AdminMenu,
    AwaitingDeleteOrdinal,
    ConfirmDelete {
        id: i64,
        nickname: String,
    },
    ConfirmReset,
}

impl SessionState {
    pub fn registration_start() -> Self {
        SessionState::Registration {
            step: Step::FIRST,
            draft: Draft::default(),
        }
    }

    pub fn is_admin_flow(&self) -> bool {
        matches!(
            self,
            SessionState::AdminMenu
                | SessionState::AwaitingDeleteOrdinal
                | SessionState::ConfirmDelete { .. }
                | SessionState::ConfirmReset
        )
    }
}
