//! Admin button tags
//!
//! Callback data is a short tag, optionally followed by `:<number>`
//! (`list:2`, `view:17`). Telegram caps callback data at 64 bytes, which
//! every tag here stays well under.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ShowMenu,
    Stats,
    List { page: usize },
    View { id: i64 },
    BeginDelete,
    DeleteById { id: i64 },
    ConfirmDelete,
    CancelDelete,
    BeginReset,
    ConfirmReset,
    CancelReset,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("unknown action tag: {0}")]
    UnknownTag(String),
    #[error("bad argument in {0}")]
    BadArgument(String),
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminAction::ShowMenu => f.write_str("menu"),
            AdminAction::Stats => f.write_str("stats"),
            AdminAction::List { page } => write!(f, "list:{}", page),
            AdminAction::View { id } => write!(f, "view:{}", id),
            AdminAction::BeginDelete => f.write_str("delete_profile"),
            AdminAction::DeleteById { id } => write!(f, "delete:{}", id),
            AdminAction::ConfirmDelete => f.write_str("confirm_delete"),
            AdminAction::CancelDelete => f.write_str("cancel_delete"),
            AdminAction::BeginReset => f.write_str("reset_all"),
            AdminAction::ConfirmReset => f.write_str("confirm_reset"),
            AdminAction::CancelReset => f.write_str("cancel_reset"),
        }
    }
}

impl FromStr for AdminAction {
    type Err = ParseActionError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let (tag, arg) = match data.split_once(':') {
            Some((tag, arg)) => (tag, Some(arg)),
            None => (data, None),
        };

        let bad = || ParseActionError::BadArgument(data.to_string());

        let action = match (tag, arg) {
            ("menu" | "back_to_admin_menu", None) => AdminAction::ShowMenu,
            ("stats", None) => AdminAction::Stats,
            ("list_all", None) => AdminAction::List { page: 0 },
            ("list", Some(page)) => AdminAction::List {
                page: page.parse().map_err(|_| bad())?,
            },
            ("view", Some(id)) => AdminAction::View {
                id: id.parse().map_err(|_| bad())?,
            },
            ("delete_profile", None) => AdminAction::BeginDelete,
            ("delete", Some(id)) => AdminAction::DeleteById {
                id: id.parse().map_err(|_| bad())?,
            },
            ("confirm_delete", None) => AdminAction::ConfirmDelete,
            ("cancel_delete", None) => AdminAction::CancelDelete,
            ("reset_all", None) => AdminAction::BeginReset,
            ("confirm_reset", None) => AdminAction::ConfirmReset,
            ("cancel_reset", None) => AdminAction::CancelReset,
            ("list" | "view" | "delete", None) => return Err(bad()),
            _ => return Err(ParseActionError::UnknownTag(data.to_string())),
        };
        Ok(action)
    }
}
