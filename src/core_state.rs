//! Shared application state handed to every request handler.
//!
//! Holds no open connection: each request opens its own SQLite handle so
//! writers serialize on the database lock rather than on a process mutex.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

pub struct CoreState {
    db_path: PathBuf,
    started_at: Instant,
}

impl CoreState {
    /// State backed by the database file at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            started_at: Instant::now(),
        }
    }

    /// Open a fresh, migrated connection for one unit of work.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
