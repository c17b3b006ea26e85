//! Integration tests for the admin menu: stats, listing, delete and reset
//!
//! Run with: cargo test --test admin_flow_test

mod common;

use common::{TestEnvironment, ADMIN, USER};
use pretty_assertions::assert_eq;
use registration_bot::conversation::{render, AdminAction, Inbound, SessionState, Step, Target};
use registration_bot::storage::SubmissionStore;

/// Three players registered in order nick1, nick2, nick3
fn env_with_three() -> TestEnvironment {
    let mut env = TestEnvironment::new(&[ADMIN]);
    for (offset, nick) in ["nick1", "nick2", "nick3"].iter().enumerate() {
        env.register_player(USER + offset as i64, nick, "Wolves");
    }
    env
}

fn open_menu(env: &mut TestEnvironment) {
    env.send(ADMIN, Inbound::Start);
}

#[test]
fn test_admin_start_shows_menu_without_prompts() {
    let mut env = TestEnvironment::new(&[ADMIN]);
    let replies = env.send(ADMIN, Inbound::Start);

    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, render::ADMIN_MENU);
    let prompts: Vec<&str> = [Step::Nickname, Step::Rank, Step::Name, Step::Contact, Step::Team]
        .iter()
        .map(|s| s.prompt())
        .collect();
    assert!(!prompts.contains(&replies[0].text.as_str()));
}

#[test]
fn test_list_is_most_recent_first_and_first_ordinal_is_newest() {
    let mut env = env_with_three();

    let nicks: Vec<String> = env.store.list(None, None).unwrap().into_iter().map(|s| s.nickname).collect();
    assert_eq!(nicks, vec!["nick3", "nick2", "nick1"]);

    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);
    assert_eq!(env.state(ADMIN), SessionState::AwaitingDeleteOrdinal);

    env.text(ADMIN, "1");
    match env.state(ADMIN) {
        SessionState::ConfirmDelete { nickname, .. } => assert_eq!(nickname, "nick3"),
        other => panic!("unexpected state {:?}", other),
    }
}

#[test]
fn test_non_numeric_ordinal_stays_awaiting() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);

    let replies = env.text(ADMIN, "abc");

    assert_eq!(replies[0].text, render::NOT_A_NUMBER);
    assert_eq!(env.state(ADMIN), SessionState::AwaitingDeleteOrdinal);
}

#[test]
fn test_out_of_range_ordinal_names_valid_range() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);

    let replies = env.text(ADMIN, "5");

    assert_eq!(replies[0].text, render::ordinal_out_of_range("5", 3));
    assert!(replies[0].text.contains("от 1 до 3"));
    assert_eq!(env.state(ADMIN), SessionState::AwaitingDeleteOrdinal);

    // Still waiting: a valid number afterwards works
    env.text(ADMIN, "3");
    assert!(matches!(env.state(ADMIN), SessionState::ConfirmDelete { .. }));
}

#[test]
fn test_confirmed_delete_removes_only_the_captured_submission() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);
    env.text(ADMIN, "2");

    let captured = match env.state(ADMIN) {
        SessionState::ConfirmDelete { id, nickname } => {
            assert_eq!(nickname, "nick2");
            id
        }
        other => panic!("unexpected state {:?}", other),
    };

    // A new registration shifts ordinals before the admin confirms
    env.register_player(USER + 10, "late", "Wolves");

    let replies = env.press(ADMIN, AdminAction::ConfirmDelete);
    assert_eq!(replies[0].text, render::deleted("nick2", captured));
    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);

    let remaining = env.store.list(None, None).unwrap();
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|s| s.id != captured));
    assert_eq!(env.store.delete_one(captured).unwrap(), 0);
}

#[test]
fn test_other_users_cannot_advance_or_clear_a_pending_delete() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);

    env.text(USER, "hello");
    env.text(USER, "1");
    env.send(USER + 1, Inbound::Start);
    env.text(USER + 1, "intruder");
    assert_eq!(env.state(ADMIN), SessionState::AwaitingDeleteOrdinal);

    env.text(ADMIN, "2");
    let SessionState::ConfirmDelete { nickname, .. } = env.state(ADMIN) else {
        panic!("expected delete confirmation");
    };
    assert_eq!(nickname, "nick2");

    env.press(USER, AdminAction::ConfirmDelete);
    assert!(matches!(env.state(ADMIN), SessionState::ConfirmDelete { .. }));
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);
}

#[test]
fn test_delete_of_vanished_submission_reports_not_found() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);
    env.text(ADMIN, "1");

    let SessionState::ConfirmDelete { id, .. } = env.state(ADMIN) else {
        panic!("expected delete confirmation");
    };
    env.store.delete_one(id).unwrap();

    let replies = env.press(ADMIN, AdminAction::ConfirmDelete);
    assert_eq!(replies[0].text, render::PROFILE_NOT_FOUND);
    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
}

#[test]
fn test_cancelled_delete_keeps_data() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);
    env.text(ADMIN, "1");
    env.press(ADMIN, AdminAction::CancelDelete);

    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);

    // Confirming after cancel has nothing to act on
    let replies = env.press(ADMIN, AdminAction::ConfirmDelete);
    assert!(replies[0].text.starts_with(render::ACTION_EXPIRED));
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);
}

#[test]
fn test_reset_flow() {
    let mut env = env_with_three();
    open_menu(&mut env);

    env.press(ADMIN, AdminAction::BeginReset);
    env.press(ADMIN, AdminAction::CancelReset);
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);

    env.press(ADMIN, AdminAction::BeginReset);
    let replies = env.press(ADMIN, AdminAction::ConfirmReset);

    assert_eq!(replies[0].text, render::reset_done(3));
    assert!(env.store.list(None, None).unwrap().is_empty());
    assert_eq!(env.store.aggregate().unwrap().total, 0);
}

#[test]
fn test_stats_exclude_no_team() {
    let mut env = TestEnvironment::new(&[ADMIN]);
    env.register_player(USER, "a", "Wolves");
    env.register_player(USER + 1, "b", "Wolves");
    env.register_player(USER + 2, "c", "Нет");
    env.register_player(USER + 3, "d", "Bears");

    open_menu(&mut env);
    let replies = env.press(ADMIN, AdminAction::Stats);
    let text = &replies[0].text;

    assert!(text.contains("Всего: 4"));
    assert!(text.contains("Wolves: 2"));
    assert!(text.contains("Bears: 1"));
    assert!(!text.contains("Нет: "));
    assert!(text.find("Wolves").unwrap() < text.find("Bears").unwrap());
    assert_eq!(replies[0].target, Target::Origin);
}

#[test]
fn test_pagination_offers_only_existing_pages() {
    let mut env = TestEnvironment::new(&[ADMIN]);
    for i in 0..7 {
        env.register_player(USER + i, &format!("p{}", i), "Wolves");
    }
    open_menu(&mut env);

    let first = env.press(ADMIN, AdminAction::List { page: 0 });
    let keyboard = first[0].keyboard.clone().unwrap();
    assert!(keyboard.contains(AdminAction::List { page: 1 }));
    assert!(first[0].text.contains("1. #7 p6"));

    let second = env.press(ADMIN, AdminAction::List { page: 1 });
    let keyboard = second[0].keyboard.clone().unwrap();
    assert!(keyboard.contains(AdminAction::List { page: 0 }));
    assert!(!keyboard.contains(AdminAction::List { page: 2 }));
    assert!(second[0].text.contains("6. #2 p1"));
    assert!(second[0].text.contains("7. #1 p0"));
    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
}

#[test]
fn test_list_when_empty() {
    let mut env = TestEnvironment::new(&[ADMIN]);
    open_menu(&mut env);

    let replies = env.press(ADMIN, AdminAction::List { page: 0 });
    assert_eq!(replies[0].text, render::NO_SUBMISSIONS);
}

#[test]
fn test_view_and_delete_from_card() {
    let mut env = env_with_three();
    let newest = env.store.list(Some(1), None).unwrap().remove(0);
    open_menu(&mut env);

    let card = env.press(ADMIN, AdminAction::View { id: newest.id });
    assert!(card[0].text.contains(&format!("Профиль #{}", newest.id)));
    assert!(card[0].text.contains("Ник: nick3"));

    env.press(ADMIN, AdminAction::DeleteById { id: newest.id });
    env.press(ADMIN, AdminAction::ConfirmDelete);

    assert_eq!(env.store.get(newest.id).unwrap(), None);
}

#[test]
fn test_back_returns_to_menu_from_every_screen() {
    let mut env = env_with_three();
    open_menu(&mut env);

    for enter in [
        AdminAction::Stats,
        AdminAction::List { page: 0 },
        AdminAction::BeginDelete,
        AdminAction::BeginReset,
    ] {
        env.press(ADMIN, enter);
        let replies = env.press(ADMIN, AdminAction::ShowMenu);
        assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
        assert_eq!(replies[0].text, render::ADMIN_MENU);
        assert_eq!(replies[0].keyboard, Some(render::admin_menu_keyboard()));
    }
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);
}

#[test]
fn test_cancel_command_leaves_admin_sub_screen() {
    let mut env = env_with_three();
    open_menu(&mut env);
    env.press(ADMIN, AdminAction::BeginDelete);

    let replies = env.send(ADMIN, Inbound::Cancel);

    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
    assert!(replies[0].text.starts_with(render::ACTION_CANCELLED));
}

#[test]
fn test_non_admin_buttons_are_silently_ignored() {
    let mut env = env_with_three();

    for action in [
        AdminAction::ShowMenu,
        AdminAction::Stats,
        AdminAction::List { page: 0 },
        AdminAction::BeginReset,
        AdminAction::ConfirmReset,
        AdminAction::BeginDelete,
    ] {
        let replies = env.press(USER, action);
        assert!(replies.is_empty());
        assert_eq!(env.state(USER), SessionState::Idle);
    }

    // Typing a number never reaches the delete flow
    let replies = env.text(USER, "1");
    assert_eq!(replies[0].text, render::IDLE_HINT);
    assert_eq!(env.store.list(None, None).unwrap().len(), 3);
}

#[test]
fn test_storage_outage_in_admin_actions() {
    let mut env = TestEnvironment::without_storage(&[ADMIN]);
    open_menu(&mut env);

    for action in [AdminAction::Stats, AdminAction::List { page: 0 }] {
        let replies = env.press(ADMIN, action);
        assert_eq!(replies[0].text, render::STORAGE_UNAVAILABLE);
        assert_eq!(env.state(ADMIN), SessionState::AdminMenu);
    }

    env.press(ADMIN, AdminAction::BeginDelete);
    let replies = env.text(ADMIN, "1");
    assert_eq!(replies[0].text, render::STORAGE_UNAVAILABLE);
    assert_eq!(env.state(ADMIN), SessionState::AdminMenu);

    env.press(ADMIN, AdminAction::BeginReset);
    let replies = env.press(ADMIN, AdminAction::ConfirmReset);
    assert_eq!(replies[0].text, render::STORAGE_UNAVAILABLE);
}
