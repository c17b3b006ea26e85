use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

mod embedded {
    use refinery::embed_migrations;

    embed_migrations!("./migrations");
}

static MIGRATION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Applies every embedded migration that has not run on `conn` yet.
///
/// Serialized per-process by a mutex. Refinery opens its own transaction per
/// migration, so the file cannot be held under one outer `BEGIN IMMEDIATE`.
/// Another process (`init-db` or `stats` next to a starting bot) may apply a
/// migration first. Our duplicate history insert then fails and rolls back;
/// one rerun sees the migration as applied.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mutex = MIGRATION_LOCK.get_or_init(|| Mutex::new(()));
    // Migrations are idempotent, so a poisoned lock is safe to reuse
    let _guard = match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Migration lock was poisoned, recovering...");
            poisoned.into_inner()
        }
    };

    conn.busy_timeout(Duration::from_secs(30))
        .context("set SQLite busy timeout")?;

    let report = match embedded::migrations::runner().run(conn) {
        Ok(report) => report,
        Err(e) => {
            log::warn!("Migration run failed ({}), retrying once", e);
            embedded::migrations::runner()
                .run(conn)
                .context("apply migrations")?
        }
    };

    for migration in report.applied_migrations() {
        log::info!("Applied migration {}", migration);
    }
    Ok(())
}
