//! Projection of backend records into [`CanonicalTorrent`].
//!
//! Relational records carry every field, so their projection is complete.
//! Search hits are partial copies: a field missing from the hit stays missing
//! in the output, and the three tracker counters are moved into `stats`.
//! Both shapes go through the same visibility and submitter rules, with the
//! viewer passed in explicitly.

mod hash;
mod types;
mod visibility;

pub use hash::{info_hash_forms, magnet_uri};
pub use types::*;
pub use visibility::{can_see_submitter, can_view};

use crate::auth::Viewer;
use crate::backend::SourceRecord;
use crate::catalog::RelationalTorrentRecord;
use crate::search_index::SearchHitDocument;

/// Maps backend records to canonical torrents.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    trackers: Vec<String>,
}

impl Projector {
    /// `trackers` are appended to generated magnet links.
    pub fn new(trackers: Vec<String>) -> Self {
        Self { trackers }
    }

    /// Project one record, or `None` if the viewer may not see it.
    pub fn project(&self, record: SourceRecord, viewer: Option<&Viewer>) -> Option<CanonicalTorrent> {
        match record {
            SourceRecord::Relational(record) => self.project_relational(*record, viewer),
            SourceRecord::SearchHit(hit) => self.project_hit(*hit, viewer),
        }
    }

    pub fn project_relational(
        &self,
        record: RelationalTorrentRecord,
        viewer: Option<&Viewer>,
    ) -> Option<CanonicalTorrent> {
        if !can_view(record.deleted, viewer) {
            return None;
        }

        let mut torrent = CanonicalTorrent::bare(record.id);

        if let Some((hex, b32)) = info_hash_forms(&record.info_hash) {
            torrent.magnet_uri = Some(magnet_uri(&b32, &record.display_name, &self.trackers));
            torrent.hash_hex = Some(hex);
            torrent.hash_b32 = Some(b32);
        }

        torrent.submitter = record
            .uploader
            .filter(|u| can_see_submitter(Some(record.anonymous), u.id, viewer))
            .map(|u| Submitter {
                id: u.id,
                name: u.name,
            });

        torrent.stats = record.stats.map(|s| TorrentStats {
            seeders: Some(s.seed_count),
            leechers: Some(s.leech_count),
            downloads: Some(s.download_count),
        });

        torrent.display_name = Some(record.display_name);
        torrent.created_time = Some(record.created_time.to_rfc3339());
        torrent.information = Some(record.information);
        torrent.description = Some(record.description);
        torrent.filesize = Some(record.filesize);
        torrent.category = Some(CategoryIds {
            main: Some(record.main_category_id),
            sub: Some(record.sub_category_id),
        });
        torrent.main_category = record.main_category_name;
        torrent.sub_category = record.sub_category_name;
        torrent.flags = Some(TorrentFlags {
            trusted: Some(record.trusted),
            complete: Some(record.complete),
            remake: Some(record.remake),
        });
        torrent.comment_count = Some(record.comment_count);

        Some(torrent)
    }

    pub fn project_hit(&self, hit: SearchHitDocument, viewer: Option<&Viewer>) -> Option<CanonicalTorrent> {
        // The index filters deleted documents itself; a missing flag is not a deletion.
        if !can_view(hit.deleted.unwrap_or(false), viewer) {
            return None;
        }

        let mut torrent = CanonicalTorrent::bare(hit.id);

        if let Some(info_hash) = hit.info_hash {
            match info_hash_forms(&info_hash) {
                Some((hex, b32)) => {
                    torrent.hash_hex = Some(hex);
                    torrent.hash_b32 = Some(b32);
                }
                // Not hex: pass the indexed value through untouched.
                None => torrent.hash_hex = Some(info_hash),
            }
        }

        torrent.submitter = match (hit.uploader_id, hit.uploader_name) {
            (Some(id), Some(name)) if can_see_submitter(hit.anonymous, id, viewer) => {
                Some(Submitter { id, name })
            }
            _ => None,
        };

        let flags = TorrentFlags {
            trusted: hit.trusted,
            complete: hit.complete,
            remake: hit.remake,
        };
        let stats = TorrentStats {
            seeders: hit.seed_count,
            leechers: hit.leech_count,
            downloads: hit.download_count,
        };

        torrent.display_name = hit.display_name;
        torrent.created_time = hit.created_time;
        torrent.filesize = hit.filesize;
        let category = CategoryIds {
            main: hit.main_category_id,
            sub: hit.sub_category_id,
        };
        torrent.category = (!category.is_empty()).then_some(category);
        torrent.flags = (!flags.is_empty()).then_some(flags);
        torrent.stats = (!stats.is_empty()).then_some(stats);
        torrent.comment_count = hit.comment_count;

        Some(torrent)
    }
}
