//! SQLite-backed torrent catalog implementation.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};
use tracing::debug;

use super::{
    MainCategory, NewTorrent, RelationalSearch, RelationalTorrentRecord, StatsRow, SubCategory,
    TorrentRecordStore, Uploader,
};
use crate::category::CategoryKey;
use crate::db::{parse_timestamp, Database, StoreError};
use crate::query::SortKey;

const RECORD_COLUMNS: &str = "
    SELECT t.id, t.info_hash, t.display_name, t.information, t.description, t.filesize,
           t.main_category_id, mc.name, t.sub_category_id, sc.name,
           t.trusted, t.complete, t.remake, t.anonymous, t.deleted,
           t.uploader_id, u.username,
           s.seed_count, s.leech_count, s.download_count,
           t.comment_count, t.created_time
    FROM torrents t
    LEFT JOIN main_categories mc ON mc.id = t.main_category_id
    LEFT JOIN sub_categories sc
        ON sc.id = t.sub_category_id AND sc.main_category_id = t.main_category_id
    LEFT JOIN users u ON u.id = t.uploader_id
    LEFT JOIN torrent_stats s ON s.torrent_id = t.id";

/// SQLite-backed torrent catalog.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a torrent and return its id.
    pub fn insert(&self, torrent: &NewTorrent) -> Result<i64, StoreError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO torrents (info_hash, display_name, information, description, filesize,
                                   main_category_id, sub_category_id, trusted, complete, remake,
                                   anonymous, uploader_id, created_time)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                torrent.info_hash.to_lowercase(),
                &torrent.display_name,
                &torrent.information,
                &torrent.description,
                torrent.filesize as i64,
                torrent.category.main_id,
                torrent.category.sub_id,
                torrent.trusted,
                torrent.complete,
                torrent.remake,
                torrent.anonymous,
                torrent.uploader_id,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Write (or replace) the tracker stats for a torrent.
    pub fn set_stats(&self, torrent_id: i64, stats: StatsRow) -> Result<(), StoreError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO torrent_stats (torrent_id, seed_count, leech_count, download_count, last_updated)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(torrent_id) DO UPDATE SET
                seed_count = excluded.seed_count,
                leech_count = excluded.leech_count,
                download_count = excluded.download_count,
                last_updated = excluded.last_updated",
            params![
                torrent_id,
                stats.seed_count,
                stats.leech_count,
                stats.download_count,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Flag a torrent as deleted. The row itself is kept.
    pub fn mark_deleted(&self, torrent_id: i64) -> Result<(), StoreError> {
        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE torrents SET deleted = 1 WHERE id = ?",
            params![torrent_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("torrent {}", torrent_id)));
        }
        Ok(())
    }

    pub fn add_main_category(&self, id: u32, name: &str) -> Result<(), StoreError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO main_categories (id, name) VALUES (?, ?)",
            params![id, name],
        )?;
        Ok(())
    }

    pub fn add_sub_category(&self, main_id: u32, id: u32, name: &str) -> Result<(), StoreError> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO sub_categories (id, main_category_id, name) VALUES (?, ?, ?)",
            params![id, main_id, name],
        )?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<RelationalTorrentRecord> {
        let uploader_id: Option<i64> = row.get(15)?;
        let uploader_name: Option<String> = row.get(16)?;
        let seed_count: Option<u32> = row.get(17)?;
        let created_time: String = row.get(21)?;
        let filesize: i64 = row.get(5)?;

        let stats = match seed_count {
            Some(seed_count) => Some(StatsRow {
                seed_count,
                leech_count: row.get(18)?,
                download_count: row.get(19)?,
            }),
            None => None,
        };

        Ok(RelationalTorrentRecord {
            id: row.get(0)?,
            info_hash: row.get(1)?,
            display_name: row.get(2)?,
            information: row.get(3)?,
            description: row.get(4)?,
            filesize: filesize.max(0) as u64,
            main_category_id: row.get(6)?,
            main_category_name: row.get(7)?,
            sub_category_id: row.get(8)?,
            sub_category_name: row.get(9)?,
            trusted: row.get(10)?,
            complete: row.get(11)?,
            remake: row.get(12)?,
            anonymous: row.get(13)?,
            deleted: row.get(14)?,
            uploader: uploader_id.zip(uploader_name).map(|(id, name)| Uploader { id, name }),
            stats,
            comment_count: row.get(20)?,
            created_time: parse_timestamp(21, &created_time)?,
        })
    }
}

fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::Id => "t.id",
        SortKey::Size => "t.filesize",
        SortKey::Name => "t.display_name",
        SortKey::Seeders => "COALESCE(s.seed_count, 0)",
        SortKey::Leechers => "COALESCE(s.leech_count, 0)",
        SortKey::Downloads => "COALESCE(s.download_count, 0)",
        SortKey::Comments => "t.comment_count",
    }
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `\` as the escape.
fn like_escape(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// WHERE clause and bound values for a search.
fn build_filters(query: &RelationalSearch) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if !query.include_deleted {
        clauses.push("t.deleted = 0".to_string());
    }

    for word in query.term.split_whitespace() {
        clauses.push("t.display_name LIKE ? ESCAPE '\\'".to_string());
        values.push(Value::Text(format!("%{}%", like_escape(word))));
    }

    if let Some(user_id) = query.user_id {
        clauses.push("t.uploader_id = ?".to_string());
        values.push(Value::Integer(user_id));
    }

    if let Some(main_id) = query.category.main_filter() {
        clauses.push("t.main_category_id = ?".to_string());
        values.push(Value::Integer(i64::from(main_id)));
        if let Some(sub_id) = query.category.sub_filter() {
            clauses.push("t.sub_category_id = ?".to_string());
            values.push(Value::Integer(i64::from(sub_id)));
        }
    }

    match query.quality_filter.as_str() {
        "1" => clauses.push("t.remake = 0".to_string()),
        "2" => clauses.push("t.trusted = 1".to_string()),
        _ => {}
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_clause, values)
}

impl TorrentRecordStore for SqliteCatalog {
    fn search(&self, query: &RelationalSearch) -> Result<Vec<RelationalTorrentRecord>, StoreError> {
        let (where_clause, mut values) = build_filters(query);
        let direction = query.order.as_sql();
        let sql = format!(
            "{}{} ORDER BY {} {}, t.id {} LIMIT ? OFFSET ?",
            RECORD_COLUMNS,
            where_clause,
            sort_column(query.sort),
            direction,
            direction
        );
        values.push(Value::Integer(i64::from(query.window.limit)));
        values.push(Value::Integer(
            i64::try_from(query.window.offset).unwrap_or(i64::MAX),
        ));

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        debug!(
            term = %query.term,
            page = query.window.page,
            results = records.len(),
            "Catalog search complete"
        );
        Ok(records)
    }

    fn by_id(&self, id: i64) -> Result<Option<RelationalTorrentRecord>, StoreError> {
        let conn = self.db.lock();
        let sql = format!("{} WHERE t.id = ?", RECORD_COLUMNS);
        let record = conn
            .query_row(&sql, params![id], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    fn categories(&self) -> Result<Vec<MainCategory>, StoreError> {
        let conn = self.db.lock();

        let mut stmt = conn.prepare("SELECT id, name FROM main_categories ORDER BY id")?;
        let mains = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT id, name FROM sub_categories WHERE main_category_id = ? ORDER BY id",
        )?;

        let mut categories = Vec::with_capacity(mains.len());
        for (main_id, name) in mains {
            let sub_categories = stmt
                .query_map(params![main_id], |row| {
                    let sub_id: u32 = row.get(0)?;
                    Ok(SubCategory {
                        name: row.get(1)?,
                        id_as_string: CategoryKey::new(main_id, sub_id).encode(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            categories.push(MainCategory {
                name,
                id_as_string: CategoryKey::new(main_id, 0).encode(),
                sub_categories,
            });
        }
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageWindow;
    use crate::query::SortOrder;
    use crate::users::{SqliteUserDirectory, UserLevel};

    fn create_test_catalog() -> SqliteCatalog {
        let catalog = SqliteCatalog::new(Database::in_memory().unwrap());
        catalog.add_main_category(1, "Anime").unwrap();
        catalog.add_sub_category(1, 2, "English-translated").unwrap();
        catalog.add_main_category(6, "Software").unwrap();
        catalog
    }

    fn torrent(name: &str, hash_seed: char, category: CategoryKey) -> NewTorrent {
        NewTorrent {
            info_hash: hash_seed.to_string().repeat(40),
            display_name: name.to_string(),
            filesize: 1024,
            category,
            ..Default::default()
        }
    }

    fn search(term: &str) -> RelationalSearch {
        RelationalSearch {
            term: term.to_string(),
            user_id: None,
            category: CategoryKey::ALL,
            quality_filter: "0".to_string(),
            sort: SortKey::Id,
            order: SortOrder::Desc,
            window: PageWindow::new(1, 75),
            include_deleted: false,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let catalog = create_test_catalog();
        let id = catalog
            .insert(&torrent("Show - 01", 'a', CategoryKey::new(1, 2)))
            .unwrap();

        let record = catalog.by_id(id).unwrap().unwrap();
        assert_eq!(record.display_name, "Show - 01");
        assert_eq!(record.info_hash, "a".repeat(40));
        assert_eq!(record.main_category_name.as_deref(), Some("Anime"));
        assert_eq!(record.sub_category_name.as_deref(), Some("English-translated"));
        assert!(record.uploader.is_none());
        assert!(record.stats.is_none());
        assert!(catalog.by_id(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_search_by_term_words() {
        let catalog = create_test_catalog();
        catalog.insert(&torrent("Cowboy Bebop 01", 'a', CategoryKey::new(1, 2))).unwrap();
        catalog.insert(&torrent("Cowboy Bebop 02", 'b', CategoryKey::new(1, 2))).unwrap();
        catalog.insert(&torrent("Ubuntu 24.04", 'c', CategoryKey::new(6, 0))).unwrap();

        assert_eq!(catalog.search(&search("bebop")).unwrap().len(), 2);
        assert_eq!(catalog.search(&search("cowboy 02")).unwrap().len(), 1);
        assert_eq!(catalog.search(&search("")).unwrap().len(), 3);
        assert!(catalog.search(&search("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_like_wildcards_are_literal() {
        let catalog = create_test_catalog();
        catalog.insert(&torrent("100% Complete", 'a', CategoryKey::new(6, 0))).unwrap();
        catalog.insert(&torrent("1000 Complete", 'b', CategoryKey::new(6, 0))).unwrap();

        let results = catalog.search(&search("100%")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name, "100% Complete");
    }

    #[test]
    fn test_search_excludes_deleted_unless_requested() {
        let catalog = create_test_catalog();
        let id = catalog.insert(&torrent("Gone", 'a', CategoryKey::new(6, 0))).unwrap();
        catalog.mark_deleted(id).unwrap();

        assert!(catalog.search(&search("")).unwrap().is_empty());

        let mut query = search("");
        query.include_deleted = true;
        let results = catalog.search(&query).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].deleted);
    }

    #[test]
    fn test_unparseable_created_time_is_an_error() {
        let catalog = create_test_catalog();
        let id = catalog.insert(&torrent("Broken", 'a', CategoryKey::new(6, 0))).unwrap();
        catalog
            .db
            .lock()
            .execute(
                "UPDATE torrents SET created_time = 'not a time' WHERE id = ?",
                rusqlite::params![id],
            )
            .unwrap();

        assert!(matches!(catalog.by_id(id), Err(StoreError::Database(_))));
    }

    #[test]
    fn test_mark_deleted_missing() {
        let catalog = create_test_catalog();
        assert!(matches!(
            catalog.mark_deleted(99),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_category_filter() {
        let catalog = create_test_catalog();
        catalog.insert(&torrent("A", 'a', CategoryKey::new(1, 2))).unwrap();
        catalog.insert(&torrent("B", 'b', CategoryKey::new(1, 3))).unwrap();
        catalog.insert(&torrent("C", 'c', CategoryKey::new(6, 0))).unwrap();

        let mut query = search("");
        query.category = CategoryKey::new(1, 0);
        assert_eq!(catalog.search(&query).unwrap().len(), 2);

        query.category = CategoryKey::new(1, 2);
        assert_eq!(catalog.search(&query).unwrap().len(), 1);
    }

    #[test]
    fn test_quality_filter() {
        let catalog = create_test_catalog();
        let mut remake = torrent("Remake", 'a', CategoryKey::new(6, 0));
        remake.remake = true;
        let mut trusted = torrent("Trusted", 'b', CategoryKey::new(6, 0));
        trusted.trusted = true;
        catalog.insert(&remake).unwrap();
        catalog.insert(&trusted).unwrap();
        catalog.insert(&torrent("Plain", 'c', CategoryKey::new(6, 0))).unwrap();

        let mut query = search("");
        query.quality_filter = "1".to_string();
        assert_eq!(catalog.search(&query).unwrap().len(), 2);

        query.quality_filter = "2".to_string();
        let results = catalog.search(&query).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name, "Trusted");

        query.quality_filter = "whatever".to_string();
        assert_eq!(catalog.search(&query).unwrap().len(), 3);
    }

    #[test]
    fn test_user_filter_and_uploader_join() {
        let db = Database::in_memory().unwrap();
        let users = SqliteUserDirectory::new(db.clone());
        let catalog = SqliteCatalog::new(db);
        let uploader = users.create_user("uploader", UserLevel::Regular, None).unwrap();

        let mut owned = torrent("Owned", 'a', CategoryKey::new(6, 0));
        owned.uploader_id = Some(uploader.id);
        catalog.insert(&owned).unwrap();
        catalog.insert(&torrent("Other", 'b', CategoryKey::new(6, 0))).unwrap();

        let mut query = search("");
        query.user_id = Some(uploader.id);
        let results = catalog.search(&query).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].uploader,
            Some(Uploader {
                id: uploader.id,
                name: "uploader".to_string()
            })
        );
    }

    #[test]
    fn test_sort_and_pagination() {
        let catalog = create_test_catalog();
        for (i, seed) in ['a', 'b', 'c', 'd', 'e'].into_iter().enumerate() {
            let id = catalog
                .insert(&torrent(&format!("T{}", i), seed, CategoryKey::new(6, 0)))
                .unwrap();
            catalog
                .set_stats(
                    id,
                    StatsRow {
                        seed_count: (i as u32) * 10,
                        leech_count: 1,
                        download_count: 2,
                    },
                )
                .unwrap();
        }

        let mut query = search("");
        query.sort = SortKey::Seeders;
        query.order = SortOrder::Asc;
        query.window = PageWindow::new(2, 2);

        let results = catalog.search(&query).unwrap();
        let names: Vec<_> = results.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["T2", "T3"]);
        assert_eq!(results[0].stats.map(|s| s.seed_count), Some(20));

        query.window = PageWindow::new(3, 2);
        assert_eq!(catalog.search(&query).unwrap().len(), 1);

        query.window = PageWindow::new(4, 2);
        assert!(catalog.search(&query).unwrap().is_empty());
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let catalog = create_test_catalog();
        catalog.insert(&torrent("Old", 'a', CategoryKey::new(6, 0))).unwrap();
        catalog.insert(&torrent("New", 'b', CategoryKey::new(6, 0))).unwrap();

        let results = catalog.search(&search("")).unwrap();
        assert_eq!(results[0].display_name, "New");
    }

    #[test]
    fn test_categories_listing() {
        let catalog = create_test_catalog();
        let categories = catalog.categories().unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Anime");
        assert_eq!(categories[0].id_as_string, "1_0");
        assert_eq!(categories[0].sub_categories.len(), 1);
        assert_eq!(categories[0].sub_categories[0].id_as_string, "1_2");
        assert!(categories[1].sub_categories.is_empty());
    }
}
