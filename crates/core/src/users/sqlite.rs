//! SQLite-backed user directory.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{User, UserDirectory, UserLevel};
use crate::auth::digest_api_key;
use crate::db::{Database, StoreError};

/// SQLite-backed user directory.
#[derive(Debug, Clone)]
pub struct SqliteUserDirectory {
    db: Database,
}

impl SqliteUserDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a user. The API key, if any, is stored only as its digest.
    pub fn create_user(
        &self,
        username: &str,
        level: UserLevel,
        api_key: Option<&str>,
    ) -> Result<User, StoreError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO users (username, level, api_key_digest, created_time) VALUES (?, ?, ?, ?)",
            params![
                username,
                level.as_i64(),
                api_key.map(digest_api_key),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            level,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            level: UserLevel::from_i64(row.get(2)?),
        })
    }

    fn find(&self, column: &str, value: &dyn rusqlite::ToSql) -> Result<Option<User>, StoreError> {
        let conn = self.db.lock();
        let sql = format!("SELECT id, username, level FROM users WHERE {} = ?", column);
        let user = conn
            .query_row(&sql, params![value], Self::row_to_user)
            .optional()?;
        Ok(user)
    }
}

impl UserDirectory for SqliteUserDirectory {
    fn by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find("username", &username)
    }

    fn by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.find("id", &id)
    }

    fn by_api_key_digest(&self, digest: &str) -> Result<Option<User>, StoreError> {
        self.find("api_key_digest", &digest)
    }
}
