//! Persistence gateway for registration submissions
//!
//! Every operation is a single round-trip against the `submissions` table.
//! Identifiers come from `AUTOINCREMENT`, so a deleted id is never handed
//! out again, not even after [`SubmissionStore::delete_all`].

use std::sync::Arc;

use rusqlite::{params, OptionalExtension, Row};
use thiserror::Error;

use crate::core::config;
use crate::storage::db::{get_connection, DbPool};

/// Gateway failure.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store could not be reached (no pool, no free connection)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The statement itself failed
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

impl From<r2d2::Error> for StorageError {
    fn from(err: r2d2::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A completed registration, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub nickname: String,
    pub rank: String,
    pub name: Option<String>,
    pub contact: String,
    pub team: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS.sss`, UTC
    pub created_at: String,
}

impl Submission {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            nickname: row.get(1)?,
            rank: row.get(2)?,
            name: row.get(3)?,
            contact: row.get(4)?,
            team: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

/// Fields supplied by the participant; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub nickname: String,
    pub rank: String,
    pub name: Option<String>,
    pub contact: String,
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCount {
    pub team: String,
    pub count: usize,
}

/// Totals for the admin stats screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub total: usize,
    /// Ordered by count descending, then team name
    pub teams: Vec<TeamCount>,
}

/// Durable storage for submissions.
///
/// Synchronous: each call is one SQLite statement (or one read
/// transaction). Async callers run it on a blocking thread.
pub trait SubmissionStore: Send + Sync {
    /// Inserts one row and returns its identifier.
    fn create(&self, submission: &NewSubmission) -> StorageResult<i64>;

    /// Total rows plus per-team counts, skipping empty teams and the no-team sentinel.
    fn aggregate(&self) -> StorageResult<Aggregate>;

    /// Most recent first. With `limit`/`offset` returns that slice of the same ordering.
    fn list(&self, limit: Option<usize>, offset: Option<usize>) -> StorageResult<Vec<Submission>>;

    fn get(&self, id: i64) -> StorageResult<Option<Submission>>;

    /// Returns rows affected: 0 or 1.
    fn delete_one(&self, id: i64) -> StorageResult<usize>;

    /// Returns rows affected.
    fn delete_all(&self) -> StorageResult<usize>;
}

const SELECT_COLUMNS: &str = "SELECT id, nickname, player_rank, name, contact, team, created_at FROM submissions";

/// SQLite-backed gateway over an r2d2 pool.
#[derive(Clone)]
pub struct SqliteSubmissionStore {
    pool: Arc<DbPool>,
}

impl SqliteSubmissionStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl SubmissionStore for SqliteSubmissionStore {
    fn create(&self, submission: &NewSubmission) -> StorageResult<i64> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO submissions (nickname, player_rank, name, contact, team) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.nickname,
                submission.rank,
                submission.name,
                submission.contact,
                submission.team,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn aggregate(&self) -> StorageResult<Aggregate> {
        let conn = get_connection(&self.pool)?;
        // One read transaction so total and breakdown see the same snapshot
        let tx = conn.unchecked_transaction()?;

        let total: i64 = tx.query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;

        let teams = {
            let mut stmt = tx.prepare(
                "SELECT team, COUNT(*) AS cnt FROM submissions
                 WHERE team IS NOT NULL AND TRIM(team) != '' AND team != ?1
                 GROUP BY team ORDER BY cnt DESC, team ASC",
            )?;
            let rows = stmt.query_map(params![config::registration::NO_TEAM], |row| {
                Ok(TeamCount {
                    team: row.get(0)?,
                    count: usize::try_from(row.get::<_, i64>(1)?).unwrap_or(0),
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;

        Ok(Aggregate {
            total: usize::try_from(total).unwrap_or(0),
            teams,
        })
    }

    fn list(&self, limit: Option<usize>, offset: Option<usize>) -> StorageResult<Vec<Submission>> {
        let conn = get_connection(&self.pool)?;
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, to_sql_int);
        let offset = offset.map_or(0, to_sql_int);

        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit, offset], Submission::from_row)?;

        let mut submissions = Vec::new();
        for row in rows {
            submissions.push(row?);
        }
        Ok(submissions)
    }

    fn get(&self, id: i64) -> StorageResult<Option<Submission>> {
        let conn = get_connection(&self.pool)?;
        let submission = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                Submission::from_row,
            )
            .optional()?;
        Ok(submission)
    }

    fn delete_one(&self, id: i64) -> StorageResult<usize> {
        let conn = get_connection(&self.pool)?;
        let affected = conn.execute("DELETE FROM submissions WHERE id = ?1", params![id])?;
        Ok(affected)
    }

    fn delete_all(&self) -> StorageResult<usize> {
        let conn = get_connection(&self.pool)?;
        let affected = conn.execute("DELETE FROM submissions", [])?;
        Ok(affected)
    }
}

/// Gateway used when the database could not be opened at startup.
///
/// Every call fails with [`StorageError::Unavailable`], which keeps
/// registration working (without identifiers) while admin reads report
/// the outage.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn fail<T>(&self) -> StorageResult<T> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }
}

impl SubmissionStore for UnavailableStore {
    fn create(&self, _submission: &NewSubmission) -> StorageResult<i64> {
        self.fail()
    }

    fn aggregate(&self) -> StorageResult<Aggregate> {
        self.fail()
    }

    fn list(&self, _limit: Option<usize>, _offset: Option<usize>) -> StorageResult<Vec<Submission>> {
        self.fail()
    }

    fn get(&self, _id: i64) -> StorageResult<Option<Submission>> {
        self.fail()
    }

    fn delete_one(&self, _id: i64) -> StorageResult<usize> {
        self.fail()
    }

    fn delete_all(&self) -> StorageResult<usize> {
        self.fail()
    }
}
