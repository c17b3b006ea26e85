use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tokio::time::sleep;

use registration_bot::cli::{Cli, Commands};
use registration_bot::conversation::{AdminSet, Controller, SessionState};
use registration_bot::core::{config, init_logger, log_startup_configuration, AppResult, InstanceLock};
use registration_bot::storage::{create_pool, SqliteSubmissionStore, SubmissionStore, UnavailableStore};
use registration_bot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the registration bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, lock file, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // .env must be loaded before any config static is touched
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::InitDb) => run_init_db(),
        Some(Commands::Stats) => Ok(run_stats()?),
    }
}

/// Opens the submissions store. If the database cannot be opened the bot
/// still runs; storage-backed actions report the outage to the user.
fn open_store() -> Arc<dyn SubmissionStore> {
    match create_pool(&config::DATABASE_PATH) {
        Ok(pool) => {
            log::info!("Database ready at {}", config::DATABASE_PATH.as_str());
            Arc::new(SqliteSubmissionStore::new(Arc::new(pool)))
        }
        Err(e) => {
            log::error!(
                "Failed to open database {}: {:#}. Continuing without storage",
                config::DATABASE_PATH.as_str(),
                e
            );
            Arc::new(UnavailableStore::new(e.to_string()))
        }
    }
}

/// Run the init-db command
fn run_init_db() -> Result<()> {
    create_pool(&config::DATABASE_PATH)
        .map_err(|e| anyhow::anyhow!("Failed to initialize database {}: {:#}", config::DATABASE_PATH.as_str(), e))?;
    log::info!("Database initialized at {}", config::DATABASE_PATH.as_str());
    Ok(())
}

/// Run the stats command
fn run_stats() -> AppResult<()> {
    let pool = create_pool(&config::DATABASE_PATH)?;
    let store = SqliteSubmissionStore::new(Arc::new(pool));
    let aggregate = store.aggregate()?;

    println!("Total submissions: {}", aggregate.total);
    for team in &aggregate.teams {
        println!("  {}: {}", team.team, team.count);
    }
    Ok(())
}

async fn run_bot() -> Result<()> {
    log::info!("Starting registration bot...");

    let admins = AdminSet::new(config::admin::ADMIN_IDS.iter().copied());
    log_startup_configuration(admins.len());

    // Held until the function returns; dropping it removes the lock file
    let _lock = InstanceLock::acquire(config::LOCK_FILE_PATH.as_str())?;

    let store = open_store();
    let controller = Arc::new(Controller::new(store, admins));

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let handler = schema(HandlerDeps::new(controller));
    // Shared across dispatcher restarts so in-progress forms survive a panic
    let sessions = InMemStorage::<SessionState>::new();

    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;
    let mut retry_count = 0;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();
        let sessions_clone = Arc::clone(&sessions);

        let handle = tokio::spawn(async move {
            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(dptree::deps![sessions_clone])
                .default_handler(|upd| async move {
                    log::debug!("Unhandled update: {:?}", upd.kind);
                })
                .error_handler(LoggingErrorHandler::with_custom_text("An error has occurred in the dispatcher"))
                .enable_ctrlc_handler()
                .build()
                .dispatch()
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);
                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                log::info!(
                    "Restarting dispatcher after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                sleep(config::retry::dispatcher_delay(retry_count)).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}
