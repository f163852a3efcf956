use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

mod helpers;
mod migrations;
mod repositories;

use migrations::run_migrations;

/// Flat local store for error records and the latest study plan.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
        let database = Self::from_connection(conn, db_path)?;

        info!("Database initialized at {}", database.path().display());
        Ok(database)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(mut conn: Connection, db_path: PathBuf) -> Result<Self> {
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }
        if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
            error!("Failed to enable foreign keys: {err}");
        }

        run_migrations(&mut conn).context("failed to run database migrations")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut guard = match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        task(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_current_version() {
        let db = Database::open_in_memory().unwrap();
        let version: i32 = db
            .execute(|conn| {
                Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("studyplan.sqlite3");
        Database::new(path.clone()).unwrap();
        let reopened = Database::new(path.clone()).unwrap();
        assert_eq!(reopened.path(), path.as_path());
    }
}
