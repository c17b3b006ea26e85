//! Bot initialization and the command set
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command menu registration

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать регистрацию (для администраторов: открыть админ-панель)")]
    Start,
    #[command(description = "отменить текущее действие")]
    Cancel,
}

/// Creates a Bot instance with the configured token and request timeout
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError::Config)` - Token missing or HTTP client could not be built
pub fn create_bot() -> AppResult<Bot> {
    if config::BOT_TOKEN.is_empty() {
        return Err(AppError::Config(
            "BOT_TOKEN (or TELOXIDE_TOKEN) environment variable not set".to_string(),
        ));
    }

    let client = teloxide::net::default_reqwest_settings()
        .timeout(config::network::timeout())
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Bot::with_client(config::BOT_TOKEN.as_str(), client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> AppResult<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let command_list = Command::descriptions().to_string();

        assert!(command_list.contains("Доступные команды"));
        assert!(command_list.contains("/start"));
        assert!(command_list.contains("/cancel"));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "reg_bot").ok(), Some(Command::Start));
        assert_eq!(Command::parse("/cancel@reg_bot", "reg_bot").ok(), Some(Command::Cancel));
        assert!(Command::parse("/stats", "reg_bot").is_err());
    }
}
