//! Two-level category keys and their `"<main>_<sub>"` wire token.
//!
//! Decoding is lenient: an empty or malformed token becomes the "all
//! categories" sentinel `(0, 0)` instead of failing the request. Category
//! filtering only narrows results, so a bad token just widens the query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Composite `(main, sub)` category identifier.
///
/// `(0, 0)` means "no category filter"; `(n, 0)` means "main category `n`,
/// any sub category".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CategoryKey {
    pub main_id: u32,
    pub sub_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid category token: {0:?}")]
pub struct CategoryTokenError(pub String);

impl CategoryKey {
    /// The unfiltered sentinel.
    pub const ALL: CategoryKey = CategoryKey {
        main_id: 0,
        sub_id: 0,
    };

    pub fn new(main_id: u32, sub_id: u32) -> Self {
        Self { main_id, sub_id }
    }

    pub fn is_all(&self) -> bool {
        self.main_id == 0
    }

    /// Main category filter, if any.
    pub fn main_filter(&self) -> Option<u32> {
        (self.main_id != 0).then_some(self.main_id)
    }

    /// Sub category filter, only meaningful with a main category.
    pub fn sub_filter(&self) -> Option<u32> {
        (self.main_id != 0 && self.sub_id != 0).then_some(self.sub_id)
    }

    pub fn encode(&self) -> String {
        format!("{}_{}", self.main_id, self.sub_id)
    }

    /// Lenient decode: anything that is not `<digits>_<digits>` is `ALL`.
    pub fn decode(token: &str) -> Self {
        token.parse().unwrap_or(Self::ALL)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.main_id, self.sub_id)
    }
}

/// Strict parse, for callers that want to report malformed tokens.
impl FromStr for CategoryKey {
    type Err = CategoryTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || CategoryTokenError(token.to_string());

        let (main, sub) = token.split_once('_').ok_or_else(invalid)?;
        let parse_part = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        };

        Ok(Self {
            main_id: parse_part(main)?,
            sub_id: parse_part(sub)?,
        })
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::decode(&token))
    }
}
