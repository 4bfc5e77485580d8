//! Turning loosely-typed request parameters into a canonical [`QuerySpec`].

mod normalize;
mod params;
mod spec;

pub use normalize::{normalize, parse_page};
pub use params::{aliases, QueryParams};
pub use spec::*;
