//! Message texts and keyboards for the registration and admin screens

use chrono::NaiveDateTime;
use indoc::formatdoc;

use super::action::AdminAction;
use super::ordinal;
use super::reply::{Button, Keyboard};
use crate::core::config::listing::VIEW_BUTTONS_PER_ROW;
use crate::core::config::registration::PLACEHOLDER;
use crate::storage::{Aggregate, NewSubmission, Submission};

pub const ADMIN_MENU: &str = "👑 Админ-панель";
pub const WELCOME: &str = "🏆 Добро пожаловать на регистрацию турнира!\nПожалуйста, ответьте на несколько вопросов:";
pub const REGISTRATION_CANCELLED: &str = "Регистрация отменена.";
pub const NOTHING_TO_CANCEL: &str = "Нечего отменять. Отправьте /start, чтобы начать регистрацию.";
pub const IDLE_HINT: &str = "Чтобы зарегистрироваться, отправьте /start.";
pub const ADMIN_HINT: &str = "Используйте кнопки админ-панели.";
pub const TEXT_ONLY: &str = "Пожалуйста, ответьте текстовым сообщением.";
pub const NO_COMMANDS_DURING_FORM: &str = "Команды во время регистрации не принимаются. Для отмены отправьте /cancel.";
pub const STORAGE_UNAVAILABLE: &str = "❌ База данных недоступна.";
pub const NO_SUBMISSIONS: &str = "📭 Нет заявок.";
pub const NOT_A_NUMBER: &str = "❌ Введите число.";
pub const PROFILE_NOT_FOUND: &str = "❌ Профиль не найден.";
pub const ACTION_EXPIRED: &str = "⌛ Действие устарело. Выберите его заново в меню.";
pub const DELETE_PROMPT: &str = "Введите номер профиля из списка (номер слева от #ID):";
pub const DELETE_CANCELLED: &str = "❌ Удаление отменено.";
pub const ACTION_CANCELLED: &str = "Действие отменено.";
pub const RESET_PROMPT: &str = "⚠️ Внимание! Это удалит ВСЕ заявки.\nПодтвердите действие:";
pub const RESET_CANCELLED: &str = "❌ Сброс отменён.";

pub fn admin_menu_keyboard() -> Keyboard {
    Keyboard::new()
        .button("📊 Статистика", AdminAction::Stats)
        .button("📋 Все участники", AdminAction::List { page: 0 })
        .button("🗑 Удалить профиль", AdminAction::BeginDelete)
        .button("♻️ Сбросить всё", AdminAction::BeginReset)
}

pub fn back_keyboard() -> Keyboard {
    Keyboard::new().button("⬅️ Назад", AdminAction::ShowMenu)
}

/// Button attached to submission notifications.
pub fn notice_keyboard() -> Keyboard {
    Keyboard::new().button("⚙️ Админ-меню", AdminAction::ShowMenu)
}

fn id_line(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("#{}", id),
        None => "неизвестен".to_string(),
    }
}

fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Admin notification for a freshly completed form.
pub fn submission_notice(submission: &NewSubmission, id: Option<i64>) -> String {
    formatdoc!(
        "🎮 Новая заявка!
        ID: {id}
        Ник: {nickname}
        Ранг: {rank}
        Имя: {name}
        Связь: {contact}
        Команда: {team}",
        id = id_line(id),
        nickname = submission.nickname,
        rank = submission.rank,
        name = or_placeholder(submission.name.as_deref()),
        contact = submission.contact,
        team = or_placeholder(submission.team.as_deref()),
    )
}

/// Confirmation sent back to the participant.
pub fn submission_receipt(id: Option<i64>) -> String {
    let mut text = String::from("✅ Заявка отправлена!\n");
    if let Some(id) = id {
        text.push_str(&format!("Ваш ID: #{}\n", id));
    }
    text.push_str("С вами свяжутся по указанному контакту.");
    text
}

pub fn stats(aggregate: &Aggregate) -> String {
    let mut text = format!("📊 Статистика\nВсего: {}\n", aggregate.total);
    if aggregate.teams.is_empty() {
        text.push_str("Нет команд.");
    } else {
        text.push_str("Команды:\n");
        for team in &aggregate.teams {
            text.push_str(&format!("  {}: {}\n", team.team, team.count));
        }
    }
    text
}

/// One page of the participant list. Ordinals continue across pages.
pub fn list_page(submissions: &[Submission], offset: usize, page: usize, pages: usize, total: usize) -> String {
    let mut text = format!("📋 Участники ({}), стр. {}/{}:\n", total, page + 1, pages);
    for (index, submission) in submissions.iter().enumerate() {
        text.push_str(&format!(
            "{}. #{} {} ({})\n   Имя: {}, Контакт: {}\n",
            ordinal::for_position(offset, index),
            submission.id,
            submission.nickname,
            submission.rank,
            or_placeholder(submission.name.as_deref()),
            or_placeholder(Some(submission.contact.as_str())),
        ));
    }
    text
}

pub fn list_keyboard(submissions: &[Submission], offset: usize, page: usize, has_prev: bool, has_next: bool) -> Keyboard {
    let view_buttons: Vec<Button> = submissions
        .iter()
        .enumerate()
        .map(|(index, s)| {
            Button::new(
                format!("👁 {}", ordinal::for_position(offset, index)),
                AdminAction::View { id: s.id },
            )
        })
        .collect();

    let mut keyboard = Keyboard::new();
    for chunk in view_buttons.chunks(VIEW_BUTTONS_PER_ROW) {
        keyboard = keyboard.row(chunk.to_vec());
    }

    let mut nav = Vec::new();
    if has_prev {
        nav.push(Button::new("◀️ Назад", AdminAction::List { page: page.saturating_sub(1) }));
    }
    if has_next {
        nav.push(Button::new("Вперёд ▶️", AdminAction::List { page: page + 1 }));
    }

    keyboard.row(nav).button("⬅️ В меню", AdminAction::ShowMenu)
}

fn format_created_at(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.format("%d.%m.%Y %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Full card for the view-by-identifier screen.
pub fn submission_card(submission: &Submission) -> String {
    formatdoc!(
        "👤 Профиль #{id}
        Ник: {nickname}
        Ранг: {rank}
        Имя: {name}
        Связь: {contact}
        Команда: {team}
        Создан: {created}",
        id = submission.id,
        nickname = submission.nickname,
        rank = submission.rank,
        name = or_placeholder(submission.name.as_deref()),
        contact = submission.contact,
        team = or_placeholder(submission.team.as_deref()),
        created = format_created_at(&submission.created_at),
    )
}

pub fn view_keyboard(id: i64) -> Keyboard {
    Keyboard::new()
        .button("🗑 Удалить", AdminAction::DeleteById { id })
        .button("📋 К списку", AdminAction::List { page: 0 })
        .button("⬅️ Назад", AdminAction::ShowMenu)
}

/// `given` is the admin's input as typed.
pub fn ordinal_out_of_range(given: &str, max: usize) -> String {
    format!("❌ Нет профиля с номером {}. Введите число от 1 до {}.", given, max)
}

pub fn delete_confirmation(submission: &Submission, ordinal: Option<i64>) -> String {
    let header = match ordinal {
        Some(n) => format!("❓ Действительно удалить профиль №{}?", n),
        None => "❓ Действительно удалить профиль?".to_string(),
    };
    format!(
        "{}\nID: #{}\nНик: {}\nРанг: {}",
        header, submission.id, submission.nickname, submission.rank
    )
}

pub fn delete_confirmation_keyboard() -> Keyboard {
    Keyboard::new()
        .button("✅ Да, удалить", AdminAction::ConfirmDelete)
        .button("❌ Нет, отмена", AdminAction::CancelDelete)
        .button("⬅️ Назад", AdminAction::ShowMenu)
}

pub fn deleted(nickname: &str, id: i64) -> String {
    format!("✅ Профиль '{}' (ID: #{}) удалён.", nickname, id)
}

pub fn reset_confirmation_keyboard() -> Keyboard {
    Keyboard::new()
        .button("✅ Да, сбросить всё", AdminAction::ConfirmReset)
        .button("❌ Нет, отмена", AdminAction::CancelReset)
        .button("⬅️ Назад", AdminAction::ShowMenu)
}

pub fn reset_done(count: usize) -> String {
    format!("✅ Все заявки удалены. Удалено: {}", count)
}
