mod error;

pub use error::*;

use sqlx::SqlitePool;

/// Database handles shared by every command.
///
/// `write_db` is expected to hold a single connection so writes never contend
/// for the SQLite lock.
#[derive(Clone)]
pub struct State {
    pub read_db: SqlitePool,
    pub write_db: SqlitePool,
}

impl State {
    pub fn new(read_db: SqlitePool, write_db: SqlitePool) -> Self {
        Self { read_db, write_db }
    }

    /// Use one pool for both reads and writes (CLI commands, tests).
    pub fn single(pool: SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}

/// Current time as unix seconds.
pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Convert a stored unix timestamp back into a datetime.
pub fn from_timestamp(value: i64) -> Result<time::OffsetDateTime> {
    Ok(time::OffsetDateTime::from_unix_timestamp(value)?)
}
