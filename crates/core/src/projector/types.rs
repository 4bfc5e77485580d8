use serde::Serialize;

/// Category ids of a projected torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct CategoryIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<u32>,
}

impl CategoryIds {
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.sub.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct TorrentFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remake: Option<bool>,
}

impl TorrentFlags {
    pub fn is_empty(&self) -> bool {
        self.trusted.is_none() && self.complete.is_none() && self.remake.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct TorrentStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeders: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leechers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u32>,
}

impl TorrentStats {
    pub fn is_empty(&self) -> bool {
        self.seeders.is_none() && self.leechers.is_none() && self.downloads.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submitter {
    pub id: i64,
    pub name: String,
}

/// Backend-independent torrent representation returned to clients.
///
/// Every field but `id` is present only when the source record carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalTorrent {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_b32: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnet_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryIds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<TorrentFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TorrentStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter: Option<Submitter>,
}

impl CanonicalTorrent {
    /// A torrent with only its id set.
    pub fn bare(id: i64) -> Self {
        Self {
            id,
            display_name: None,
            created_time: None,
            hash_hex: None,
            hash_b32: None,
            magnet_uri: None,
            information: None,
            description: None,
            filesize: None,
            category: None,
            main_category: None,
            sub_category: None,
            flags: None,
            stats: None,
            comment_count: None,
            submitter: None,
        }
    }
}
