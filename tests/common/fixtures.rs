//! Test fixtures for flow tests
//!
//! `TestEnvironment` plays the role of the Telegram dispatcher: it keeps one
//! session per chat and feeds events to the controller, the same way the
//! dialogue storage does in production. Chats are private, so the chat id is
//! the user id.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use registration_bot::conversation::{AdminAction, AdminSet, Controller, Inbound, Outbound, SessionState};
use registration_bot::storage::{create_pool, SqliteSubmissionStore, SubmissionStore, UnavailableStore};
use tempfile::TempDir;

pub const ADMIN: i64 = 1001;
pub const OTHER_ADMIN: i64 = 1002;
pub const USER: i64 = 42;

pub struct TestEnvironment {
    _dir: Option<TempDir>,
    pub store: Arc<dyn SubmissionStore>,
    pub controller: Controller,
    sessions: HashMap<i64, SessionState>,
}

impl TestEnvironment {
    /// Fresh database in a temporary directory
    pub fn new(admins: &[i64]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("registrations.sqlite");
        let pool = create_pool(path.to_str().expect("utf-8 path")).expect("pool");
        let store: Arc<dyn SubmissionStore> = Arc::new(SqliteSubmissionStore::new(Arc::new(pool)));
        Self::build(Some(dir), store, admins)
    }

    /// Every storage call fails
    pub fn without_storage(admins: &[i64]) -> Self {
        Self::build(None, Arc::new(UnavailableStore::new("test outage")), admins)
    }

    fn build(dir: Option<TempDir>, store: Arc<dyn SubmissionStore>, admins: &[i64]) -> Self {
        let controller = Controller::new(Arc::clone(&store), AdminSet::new(admins.iter().copied()));
        Self {
            _dir: dir,
            store,
            controller,
            sessions: HashMap::new(),
        }
    }

    pub fn send(&mut self, user: i64, event: Inbound) -> Vec<Outbound> {
        let state = self.sessions.remove(&user).unwrap_or_default();
        let transition = self.controller.handle(user, state, event);
        self.sessions.insert(user, transition.next);
        transition.replies
    }

    pub fn text(&mut self, user: i64, text: &str) -> Vec<Outbound> {
        self.send(user, Inbound::Text(text.to_string()))
    }

    pub fn press(&mut self, user: i64, action: AdminAction) -> Vec<Outbound> {
        self.send(user, Inbound::Action(action))
    }

    pub fn state(&self, user: i64) -> SessionState {
        self.sessions.get(&user).cloned().unwrap_or_default()
    }

    /// Runs /start and answers all five steps; returns the final replies.
    pub fn register(&mut self, user: i64, answers: [&str; 5]) -> Vec<Outbound> {
        self.send(user, Inbound::Start);
        let mut replies = Vec::new();
        for answer in answers {
            replies = self.text(user, answer);
        }
        replies
    }

    /// Registers a player with fixed rank, name and contact.
    pub fn register_player(&mut self, user: i64, nickname: &str, team: &str) -> Vec<Outbound> {
        let contact = format!("@{}", nickname);
        self.register(user, [nickname, "Diamond", "Alex", contact.as_str(), team])
    }
}
