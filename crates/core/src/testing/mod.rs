//! Testing utilities and mock implementations.
//!
//! The relational side needs no mock: tests use an in-memory [`Database`]
//! (see [`fixtures::seeded_database`]). The external search index is replaced
//! by [`MockSearchIndex`].
//!
//! # Example
//!
//! ```rust,ignore
//! use nyaa_core::testing::{fixtures, MockSearchIndex};
//!
//! let seeded = fixtures::seeded_database();
//! let index = MockSearchIndex::new();
//! index.set_hits(vec![fixtures::search_hit(1, "Some Show - 01")]).await;
//! ```
//!
//! [`Database`]: crate::db::Database

mod mock_search_index;

pub use mock_search_index::{MockSearchIndex, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{NewTorrent, SqliteCatalog, StatsRow};
    use crate::category::CategoryKey;
    use crate::db::{Database, StoreError};
    use crate::search_index::SearchHitDocument;
    use crate::users::{SqliteUserDirectory, User, UserLevel};

    /// API keys handed to the seeded users.
    pub const REGULAR_KEY: &str = "regular-key";
    pub const UPLOADER_KEY: &str = "uploader-key";
    pub const MODERATOR_KEY: &str = "moderator-key";
    pub const SUPERADMIN_KEY: &str = "superadmin-key";

    /// A database with categories, users and a few torrents.
    pub struct SeededDatabase {
        pub db: Database,
        pub catalog: SqliteCatalog,
        pub users: SqliteUserDirectory,
        pub regular: User,
        pub uploader: User,
        pub moderator: User,
        pub superadmin: User,
        /// Public upload by `uploader`, with stats.
        pub public_id: i64,
        /// Anonymous upload by `uploader`.
        pub anonymous_id: i64,
        /// Deleted upload by `uploader`.
        pub deleted_id: i64,
    }

    /// A hit carrying only an id and a name.
    pub fn search_hit(id: i64, name: &str) -> SearchHitDocument {
        SearchHitDocument {
            id,
            display_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// A new torrent with a hash derived from `seed`.
    pub fn new_torrent(name: &str, seed: u8, category: CategoryKey) -> NewTorrent {
        NewTorrent {
            info_hash: format!("{:02x}", seed).repeat(20),
            display_name: name.to_string(),
            information: "#channel@irc.example".to_string(),
            description: format!("Description of {}", name),
            filesize: 1024 * 1024 * 350,
            category,
            ..Default::default()
        }
    }

    /// Create the default categories.
    pub fn seed_categories(catalog: &SqliteCatalog) -> Result<(), StoreError> {
        catalog.add_main_category(1, "Anime")?;
        catalog.add_sub_category(1, 1, "Anime Music Video")?;
        catalog.add_sub_category(1, 2, "English-translated")?;
        catalog.add_main_category(6, "Software")?;
        catalog.add_sub_category(6, 1, "Applications")?;
        Ok(())
    }

    /// Build a [`SeededDatabase`] in memory.
    pub fn seeded_database() -> SeededDatabase {
        let db = Database::in_memory().expect("in-memory database");
        let catalog = SqliteCatalog::new(db.clone());
        let users = SqliteUserDirectory::new(db.clone());
        seed_categories(&catalog).expect("categories");

        let regular = users
            .create_user("regular", UserLevel::Regular, Some(REGULAR_KEY))
            .expect("regular user");
        let uploader = users
            .create_user("uploader", UserLevel::Trusted, Some(UPLOADER_KEY))
            .expect("uploader user");
        let moderator = users
            .create_user("moderator", UserLevel::Moderator, Some(MODERATOR_KEY))
            .expect("moderator user");
        let superadmin = users
            .create_user("superadmin", UserLevel::Superadmin, Some(SUPERADMIN_KEY))
            .expect("superadmin user");

        let mut public = new_torrent("Public Show - 01 [1080p]", 1, CategoryKey::new(1, 2));
        public.uploader_id = Some(uploader.id);
        public.trusted = true;
        let public_id = catalog.insert(&public).expect("public torrent");
        catalog
            .set_stats(
                public_id,
                StatsRow {
                    seed_count: 120,
                    leech_count: 8,
                    download_count: 4000,
                },
            )
            .expect("stats");

        let mut anonymous = new_torrent("Anonymous Show - 02", 2, CategoryKey::new(1, 2));
        anonymous.uploader_id = Some(uploader.id);
        anonymous.anonymous = true;
        let anonymous_id = catalog.insert(&anonymous).expect("anonymous torrent");

        let mut deleted = new_torrent("Deleted Tool 1.0", 3, CategoryKey::new(6, 1));
        deleted.uploader_id = Some(uploader.id);
        let deleted_id = catalog.insert(&deleted).expect("deleted torrent");
        catalog.mark_deleted(deleted_id).expect("mark deleted");

        SeededDatabase {
            db,
            catalog,
            users,
            regular,
            uploader,
            moderator,
            superadmin,
            public_id,
            anonymous_id,
            deleted_id,
        }
    }
}
