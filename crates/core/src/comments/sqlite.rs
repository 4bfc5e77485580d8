//! SQLite-backed comment store.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{Comment, CommentStore};
use crate::db::{parse_timestamp, Database, StoreError};
use crate::pagination::PageWindow;

const COMMENT_COLUMNS: &str = "
    SELECT c.id, c.torrent_id, c.user_id, u.username, c.text, c.created_time, c.edited_time
    FROM comments c
    LEFT JOIN users u ON u.id = c.user_id";

/// SQLite-backed comment store.
#[derive(Debug, Clone)]
pub struct SqliteCommentStore {
    db: Database,
}

impl SqliteCommentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_comment(row: &rusqlite::Row) -> rusqlite::Result<Comment> {
        let created_time: String = row.get(5)?;
        let edited_time: Option<String> = row.get(6)?;

        Ok(Comment {
            id: row.get(0)?,
            torrent_id: row.get(1)?,
            author_id: row.get(2)?,
            author_name: row.get(3)?,
            text: row.get(4)?,
            created_time: parse_timestamp(5, &created_time)?,
            edited_time: edited_time
                .as_deref()
                .map(|value| parse_timestamp(6, value))
                .transpose()?,
        })
    }

    fn fetch(conn: &rusqlite::Connection, comment_id: i64) -> Result<Option<Comment>, StoreError> {
        let sql = format!("{} WHERE c.id = ?", COMMENT_COLUMNS);
        let comment = conn
            .query_row(&sql, params![comment_id], Self::row_to_comment)
            .optional()?;
        Ok(comment)
    }
}

impl CommentStore for SqliteCommentStore {
    fn list(&self, torrent_id: i64, window: Option<PageWindow>) -> Result<Vec<Comment>, StoreError> {
        let conn = self.db.lock();
        let (limit, offset) = match window {
            Some(w) => (i64::from(w.limit), i64::try_from(w.offset).unwrap_or(i64::MAX)),
            None => (-1, 0),
        };

        let sql = format!(
            "{} WHERE c.torrent_id = ? ORDER BY c.id DESC LIMIT ? OFFSET ?",
            COMMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let comments = stmt
            .query_map(params![torrent_id, limit, offset], Self::row_to_comment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn get(&self, comment_id: i64) -> Result<Option<Comment>, StoreError> {
        let conn = self.db.lock();
        Self::fetch(&conn, comment_id)
    }

    fn add(&self, torrent_id: i64, author_id: i64, text: &str) -> Result<Comment, StoreError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO comments (torrent_id, user_id, text, created_time) VALUES (?, ?, ?, ?)",
            params![torrent_id, author_id, text, Utc::now().to_rfc3339()],
        )?;
        let comment_id = tx.last_insert_rowid();

        let updated = tx.execute(
            "UPDATE torrents
             SET comment_count = (SELECT COUNT(*) FROM comments WHERE torrent_id = ?1)
             WHERE id = ?1",
            params![torrent_id],
        )?;
        if updated == 0 {
            // Dropping the transaction rolls the insert back.
            return Err(StoreError::NotFound(format!("torrent {}", torrent_id)));
        }

        let comment = Self::fetch(&tx, comment_id)?
            .ok_or_else(|| StoreError::Internal("inserted comment vanished".to_string()))?;
        tx.commit()?;
        Ok(comment)
    }

    fn update_text(
        &self,
        comment_id: i64,
        text: &str,
        edited_at: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE comments SET text = ?, edited_time = ? WHERE id = ?",
            params![text, edited_at.to_rfc3339(), comment_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("comment {}", comment_id)));
        }
        Self::fetch(&conn, comment_id)?
            .ok_or_else(|| StoreError::NotFound(format!("comment {}", comment_id)))
    }
}
