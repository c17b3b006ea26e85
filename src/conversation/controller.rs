//! Registration and admin dialog state machine
//!
//! [`Controller::handle`] takes the chat's current [`SessionState`] and one
//! inbound event and returns the next state plus the messages to deliver.
//! It talks to storage through [`SubmissionStore`] and never to the
//! transport, so every path here runs in plain unit tests.

use std::sync::Arc;

use super::access::AdminSet;
use super::action::AdminAction;
use super::ordinal::{self, OrdinalError};
use super::render;
use super::reply::Outbound;
use super::state::{Draft, SessionState, Step};
use crate::core::config::listing::PAGE_SIZE;
use crate::storage::{StorageError, SubmissionStore};

/// One event from the transport, already stripped of Telegram types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `/start`
    Start,
    /// `/cancel`
    Cancel,
    Text(String),
    /// A message without text (sticker, photo, ...)
    Unsupported,
    /// Admin button press
    Action(AdminAction),
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: SessionState,
    pub replies: Vec<Outbound>,
}

impl Transition {
    fn new(next: SessionState, replies: Vec<Outbound>) -> Self {
        Self { next, replies }
    }

    fn single(next: SessionState, reply: Outbound) -> Self {
        Self::new(next, vec![reply])
    }

    /// No state change and nothing to send.
    fn ignore(state: SessionState) -> Self {
        Self::new(state, Vec::new())
    }
}

pub struct Controller {
    store: Arc<dyn SubmissionStore>,
    admins: AdminSet,
}

impl Controller {
    pub fn new(store: Arc<dyn SubmissionStore>, admins: AdminSet) -> Self {
        Self { store, admins }
    }

    pub fn admins(&self) -> &AdminSet {
        &self.admins
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(user_id)
    }

    /// Applies one event from `sender` to the chat's session.
    pub fn handle(&self, sender: i64, state: SessionState, event: Inbound) -> Transition {
        match event {
            Inbound::Start => self.start(sender),
            Inbound::Cancel => self.cancel(sender, state),
            Inbound::Text(text) => self.text(sender, state, text),
            Inbound::Unsupported => self.unsupported(sender, state),
            Inbound::Action(action) => {
                if !self.is_admin(sender) {
                    log::warn!("Ignoring admin action {} from non-admin user {}", action, sender);
                    return Transition::ignore(state);
                }
                self.admin_action(state, action)
            }
        }
    }

    fn start(&self, sender: i64) -> Transition {
        if self.is_admin(sender) {
            log::info!("Admin {} opened the admin menu", sender);
            return Transition::single(SessionState::AdminMenu, menu(Outbound::reply(render::ADMIN_MENU)));
        }

        log::info!("User {} started registration", sender);
        Transition::new(
            SessionState::registration_start(),
            vec![
                Outbound::reply(render::WELCOME),
                Outbound::reply(Step::FIRST.prompt()),
            ],
        )
    }

    fn cancel(&self, sender: i64, state: SessionState) -> Transition {
        match state {
            SessionState::Registration { step, .. } => {
                log::info!("User {} cancelled registration at {:?}", sender, step);
                Transition::single(SessionState::Idle, Outbound::reply(render::REGISTRATION_CANCELLED))
            }
            admin_state if admin_state.is_admin_flow() && self.is_admin(sender) => {
                let text = format!("{}\n\n{}", render::ACTION_CANCELLED, render::ADMIN_MENU);
                Transition::single(SessionState::AdminMenu, menu(Outbound::reply(text)))
            }
            _ => Transition::single(SessionState::Idle, Outbound::reply(render::NOTHING_TO_CANCEL)),
        }
    }

    fn text(&self, sender: i64, state: SessionState, text: String) -> Transition {
        match state {
            SessionState::Registration { step, draft } => self.answer(sender, step, draft, text),
            SessionState::AwaitingDeleteOrdinal if self.is_admin(sender) => self.resolve_ordinal(&text),
            other => self.idle_hint(sender, other),
        }
    }

    fn unsupported(&self, sender: i64, state: SessionState) -> Transition {
        match state {
            SessionState::Registration { step, draft } => {
                reprompt(SessionState::Registration { step, draft }, step, render::TEXT_ONLY)
            }
            SessionState::AwaitingDeleteOrdinal if self.is_admin(sender) => Transition::single(
                SessionState::AwaitingDeleteOrdinal,
                Outbound::reply(render::NOT_A_NUMBER).with_keyboard(render::back_keyboard()),
            ),
            other => self.idle_hint(sender, other),
        }
    }

    /// Reply to text that no step is waiting for.
    fn idle_hint(&self, sender: i64, state: SessionState) -> Transition {
        if self.is_admin(sender) {
            let next = if state.is_admin_flow() { state } else { SessionState::AdminMenu };
            return Transition::single(next, menu(Outbound::reply(render::ADMIN_HINT)));
        }
        Transition::single(SessionState::Idle, Outbound::reply(render::IDLE_HINT))
    }

    fn answer(&self, sender: i64, step: Step, mut draft: Draft, text: String) -> Transition {
        let state = || SessionState::Registration {
            step,
            draft: draft.clone(),
        };
        if text.trim().is_empty() {
            return reprompt(state(), step, render::TEXT_ONLY);
        }
        if text.starts_with('/') {
            return reprompt(state(), step, render::NO_COMMANDS_DURING_FORM);
        }

        draft.set(step, text);
        match step.next() {
            Some(next) => Transition::single(
                SessionState::Registration { step: next, draft },
                Outbound::reply(next.prompt()),
            ),
            None => self.complete(sender, draft),
        }
    }

    fn complete(&self, sender: i64, draft: Draft) -> Transition {
        let submission = draft.into_submission();

        let id = match self.store.create(&submission) {
            Ok(id) => {
                log::info!("Saved submission #{} ({}) from user {}", id, submission.nickname, sender);
                Some(id)
            }
            Err(e) => {
                log::error!("Failed to save submission from user {}: {}", sender, e);
                None
            }
        };

        let notice = render::submission_notice(&submission, id);
        let mut replies: Vec<Outbound> = self
            .admins
            .iter()
            .map(|admin| Outbound::notify(admin, notice.clone()).with_keyboard(render::notice_keyboard()))
            .collect();
        replies.push(Outbound::reply(render::submission_receipt(id)));

        Transition::new(SessionState::Idle, replies)
    }

    fn admin_action(&self, state: SessionState, action: AdminAction) -> Transition {
        match action {
            AdminAction::ShowMenu => show_menu(),
            AdminAction::Stats => self.stats(),
            AdminAction::List { page } => self.list(page),
            AdminAction::View { id } => self.view(id),
            AdminAction::BeginDelete => Transition::single(
                SessionState::AwaitingDeleteOrdinal,
                Outbound::edit(render::DELETE_PROMPT).with_keyboard(render::back_keyboard()),
            ),
            AdminAction::DeleteById { id } => self.confirm_delete_by_id(id),
            AdminAction::ConfirmDelete => match state {
                SessionState::ConfirmDelete { id, nickname } => self.delete(id, &nickname),
                _ => expired(),
            },
            AdminAction::CancelDelete => match state {
                SessionState::ConfirmDelete { .. } | SessionState::AwaitingDeleteOrdinal => {
                    cancelled(render::DELETE_CANCELLED)
                }
                _ => show_menu(),
            },
            AdminAction::BeginReset => Transition::single(
                SessionState::ConfirmReset,
                Outbound::edit(render::RESET_PROMPT).with_keyboard(render::reset_confirmation_keyboard()),
            ),
            AdminAction::ConfirmReset => match state {
                SessionState::ConfirmReset => self.reset(),
                _ => expired(),
            },
            AdminAction::CancelReset => match state {
                SessionState::ConfirmReset => cancelled(render::RESET_CANCELLED),
                _ => show_menu(),
            },
        }
    }

    fn stats(&self) -> Transition {
        match self.store.aggregate() {
            Ok(aggregate) => back_to_menu(Outbound::edit(render::stats(&aggregate))),
            Err(e) => unavailable("stats", &e),
        }
    }

    fn list(&self, page: usize) -> Transition {
        let total = match self.store.aggregate() {
            Ok(aggregate) => aggregate.total,
            Err(e) => return unavailable("list", &e),
        };
        if total == 0 {
            return back_to_menu(Outbound::edit(render::NO_SUBMISSIONS));
        }

        let pages = total.div_ceil(PAGE_SIZE);
        // Buttons from an older, longer list may point past the end
        let page = page.min(pages - 1);
        let offset = page * PAGE_SIZE;

        let submissions = match self.store.list(Some(PAGE_SIZE), Some(offset)) {
            Ok(submissions) => submissions,
            Err(e) => return unavailable("list", &e),
        };

        let has_prev = offset > 0;
        let has_next = offset + PAGE_SIZE < total;
        let text = render::list_page(&submissions, offset, page, pages, total);
        let keyboard = render::list_keyboard(&submissions, offset, page, has_prev, has_next);
        Transition::single(SessionState::AdminMenu, Outbound::edit(text).with_keyboard(keyboard))
    }

    fn view(&self, id: i64) -> Transition {
        match self.store.get(id) {
            Ok(Some(submission)) => Transition::single(
                SessionState::AdminMenu,
                Outbound::edit(render::submission_card(&submission)).with_keyboard(render::view_keyboard(id)),
            ),
            Ok(None) => back_to_menu(Outbound::edit(render::PROFILE_NOT_FOUND)),
            Err(e) => unavailable("view", &e),
        }
    }

    fn resolve_ordinal(&self, text: &str) -> Transition {
        let awaiting = |message: String| {
            Transition::single(
                SessionState::AwaitingDeleteOrdinal,
                Outbound::reply(message).with_keyboard(render::back_keyboard()),
            )
        };

        let given = match ordinal::parse(text) {
            Ok(n) => n,
            Err(_) => {
                log::warn!("Rejected delete ordinal {:?}: not a number", text);
                return awaiting(render::NOT_A_NUMBER.to_string());
            }
        };

        // Resolve against a fresh list; the number the admin saw may be stale
        let submissions = match self.store.list(None, None) {
            Ok(submissions) => submissions,
            Err(e) => {
                log::error!("Failed to load submissions for ordinal {}: {}", given, e);
                return Transition::single(
                    SessionState::AdminMenu,
                    Outbound::reply(render::STORAGE_UNAVAILABLE).with_keyboard(render::back_keyboard()),
                );
            }
        };

        match ordinal::resolve(&submissions, given) {
            Ok(submission) => Transition::single(
                SessionState::ConfirmDelete {
                    id: submission.id,
                    nickname: submission.nickname.clone(),
                },
                Outbound::reply(render::delete_confirmation(submission, Some(given)))
                    .with_keyboard(render::delete_confirmation_keyboard()),
            ),
            Err(OrdinalError::OutOfRange { given, max }) => {
                log::warn!("Rejected delete ordinal {}: valid range is 1..{}", given, max);
                awaiting(render::ordinal_out_of_range(text.trim(), max))
            }
            Err(OrdinalError::Empty) => Transition::single(
                SessionState::AdminMenu,
                Outbound::reply(render::NO_SUBMISSIONS).with_keyboard(render::back_keyboard()),
            ),
            Err(OrdinalError::NotANumber(_)) => awaiting(render::NOT_A_NUMBER.to_string()),
        }
    }

    fn confirm_delete_by_id(&self, id: i64) -> Transition {
        match self.store.get(id) {
            Ok(Some(submission)) => Transition::single(
                SessionState::ConfirmDelete {
                    id: submission.id,
                    nickname: submission.nickname.clone(),
                },
                Outbound::edit(render::delete_confirmation(&submission, None))
                    .with_keyboard(render::delete_confirmation_keyboard()),
            ),
            Ok(None) => back_to_menu(Outbound::edit(render::PROFILE_NOT_FOUND)),
            Err(e) => unavailable("view", &e),
        }
    }

    fn delete(&self, id: i64, nickname: &str) -> Transition {
        match self.store.delete_one(id) {
            Ok(0) => {
                log::warn!("Submission #{} was already gone", id);
                back_to_menu(Outbound::edit(render::PROFILE_NOT_FOUND))
            }
            Ok(_) => {
                log::info!("Deleted submission #{} ({})", id, nickname);
                back_to_menu(Outbound::edit(render::deleted(nickname, id)))
            }
            Err(e) => unavailable("delete", &e),
        }
    }

    fn reset(&self) -> Transition {
        match self.store.delete_all() {
            Ok(count) => {
                log::info!("Reset removed {} submission(s)", count);
                back_to_menu(Outbound::edit(render::reset_done(count)))
            }
            Err(e) => unavailable("reset", &e),
        }
    }
}

fn menu(reply: Outbound) -> Outbound {
    reply.with_keyboard(render::admin_menu_keyboard())
}

fn show_menu() -> Transition {
    Transition::single(SessionState::AdminMenu, menu(Outbound::edit(render::ADMIN_MENU)))
}

fn back_to_menu(reply: Outbound) -> Transition {
    Transition::single(SessionState::AdminMenu, reply.with_keyboard(render::back_keyboard()))
}

fn cancelled(text: &str) -> Transition {
    let text = format!("{}\n\n{}", text, render::ADMIN_MENU);
    Transition::single(SessionState::AdminMenu, menu(Outbound::edit(text)))
}

fn expired() -> Transition {
    let text = format!("{}\n\n{}", render::ACTION_EXPIRED, render::ADMIN_MENU);
    Transition::single(SessionState::AdminMenu, menu(Outbound::edit(text)))
}

fn unavailable(operation: &str, error: &StorageError) -> Transition {
    log::error!("Admin {} failed: {}", operation, error);
    back_to_menu(Outbound::edit(render::STORAGE_UNAVAILABLE))
}

fn reprompt(state: SessionState, step: Step, reason: &str) -> Transition {
    Transition::single(state, Outbound::reply(format!("{}\n{}", reason, step.prompt())))
}
