//! Shared SQLite connection and schema.
//!
//! The catalog, user directory and comment store all live in one database file
//! and share a single connection, so a comment insert and the parent torrent's
//! comment-count update can run in one transaction.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

/// Errors for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Cloneable handle to the SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open the database file, creating it and its tables if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                level INTEGER NOT NULL DEFAULT 0,
                api_key_digest TEXT UNIQUE,
                created_time TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS main_categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sub_categories (
                id INTEGER NOT NULL,
                main_category_id INTEGER NOT NULL REFERENCES main_categories(id),
                name TEXT NOT NULL,
                PRIMARY KEY (id, main_category_id)
            );

            CREATE TABLE IF NOT EXISTS torrents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                info_hash TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                information TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                filesize INTEGER NOT NULL DEFAULT 0,
                main_category_id INTEGER NOT NULL,
                sub_category_id INTEGER NOT NULL,
                trusted INTEGER NOT NULL DEFAULT 0,
                complete INTEGER NOT NULL DEFAULT 0,
                remake INTEGER NOT NULL DEFAULT 0,
                anonymous INTEGER NOT NULL DEFAULT 0,
                deleted INTEGER NOT NULL DEFAULT 0,
                uploader_id INTEGER REFERENCES users(id),
                comment_count INTEGER NOT NULL DEFAULT 0,
                created_time TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_torrents_display_name ON torrents(display_name);
            CREATE INDEX IF NOT EXISTS idx_torrents_uploader ON torrents(uploader_id);
            CREATE INDEX IF NOT EXISTS idx_torrents_category ON torrents(main_category_id, sub_category_id);

            CREATE TABLE IF NOT EXISTS torrent_stats (
                torrent_id INTEGER PRIMARY KEY REFERENCES torrents(id) ON DELETE CASCADE,
                seed_count INTEGER NOT NULL DEFAULT 0,
                leech_count INTEGER NOT NULL DEFAULT 0,
                download_count INTEGER NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                torrent_id INTEGER NOT NULL REFERENCES torrents(id) ON DELETE CASCADE,
                user_id INTEGER NOT NULL REFERENCES users(id),
                text TEXT NOT NULL,
                created_time TEXT NOT NULL,
                edited_time TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_comments_torrent ON comments(torrent_id);
            "#,
        )?;

        Ok(())
    }
}

/// Parse the RFC 3339 text stored in column `index`.
pub(crate) fn parse_timestamp(
    index: usize,
    value: &str,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
}
