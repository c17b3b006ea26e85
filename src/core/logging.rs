//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the effective configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the configuration the bot is about to run with.
///
/// The token itself is never written; only whether it is present.
pub fn log_startup_configuration(admin_count: usize) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Registration bot configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("DATABASE_PATH: {}", config::DATABASE_PATH.as_str());
    log::info!("LOG_FILE_PATH: {}", config::LOG_FILE_PATH.as_str());
    log::info!("LOCK_FILE_PATH: {}", config::LOCK_FILE_PATH.as_str());
    log::info!(
        "BOT_TOKEN: {}",
        if config::BOT_TOKEN.is_empty() { "not set" } else { "set" }
    );

    if admin_count == 0 {
        log::warn!("⚠️  ADMIN_IDS is empty: nobody can open the admin menu and no one is notified about submissions");
    } else {
        log::info!("✅ {} administrator(s) configured", admin_count);
    }
}
