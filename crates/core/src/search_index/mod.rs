//! External full-text search index.
//!
//! The index holds a flat copy of each torrent and can only page through a
//! bounded window of hits; see [`crate::pagination`].

mod elastic;
mod types;

pub use elastic::{parse_response, ElasticSearchIndex};
pub use types::*;
