use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: registrations.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "registrations.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: registration-bot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "registration-bot.log".to_string()));

/// Single-instance lock file path
/// Read from LOCK_FILE_PATH environment variable
/// Default: bot.lock
pub static LOCK_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOCK_FILE_PATH").unwrap_or_else(|_| "bot.lock".to_string()));

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// Splits a raw `ADMIN_IDS` value into numeric ids.
    ///
    /// Accepts commas and whitespace as separators; anything that is not an
    /// integer is dropped.
    pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMIN_IDS environment variable
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default()
    });
}

/// Registration form configuration
pub mod registration {
    /// Stored for any field the participant never supplied
    pub const PLACEHOLDER: &str = "Не указан";

    /// Team value meaning "plays without a team"; excluded from team stats
    pub const NO_TEAM: &str = "Нет";
}

/// Admin listing configuration
pub mod listing {
    /// Submissions shown per page of the admin list
    pub const PAGE_SIZE: usize = 5;

    /// View buttons per keyboard row on a list page
    pub const VIEW_BUTTONS_PER_ROW: usize = 5;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Dispatcher restart configuration
pub mod retry {
    use super::Duration;

    /// Restarts allowed after the dispatcher task panics
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Base delay before a restart; doubled per attempt
    pub const DISPATCHER_BASE_DELAY_SECS: u64 = 2;

    /// Delay before restart number `attempt` (1-based), capped at one minute
    pub fn dispatcher_delay(attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(5);
        Duration::from_secs((DISPATCHER_BASE_DELAY_SECS * factor).min(60))
    }
}

#[cfg(test)]
mod tests {
    use super::admin::parse_admin_ids;

    #[test]
    fn test_parse_admin_ids_mixed_separators() {
        assert_eq!(parse_admin_ids("1, 2\n3\t4"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_admin_ids_skips_garbage() {
        assert_eq!(parse_admin_ids("12,abc,,-7, 9x"), vec![12, -7]);
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        assert!(parse_admin_ids("").is_empty());
    }

    #[test]
    fn test_dispatcher_delay_grows_and_caps() {
        use super::retry::dispatcher_delay;
        use std::time::Duration;

        assert_eq!(dispatcher_delay(1), Duration::from_secs(2));
        assert_eq!(dispatcher_delay(2), Duration::from_secs(4));
        assert_eq!(dispatcher_delay(10), Duration::from_secs(60));
    }
}
