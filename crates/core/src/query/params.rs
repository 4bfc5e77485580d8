/// Raw request parameters, possibly multi-valued, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

/// Accepted key names for each logical field, in priority order.
pub mod aliases {
    pub const TERM: &[&str] = &["q", "term"];
    pub const CATEGORY: &[&str] = &["c", "cats"];
    pub const FILTER: &[&str] = &["f", "filter"];
    pub const PAGE: &[&str] = &["p", "page"];
    pub const SORT: &[&str] = &["s", "sort_by"];
    pub const ORDER: &[&str] = &["o", "sort_order"];
    pub const USER: &[&str] = &["u", "user"];
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// First value of `key`, if present (an empty value still counts).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First alias that is present wins; later aliases are not consulted.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    /// Like [`first_of`](Self::first_of), treating an empty value as absent.
    pub fn non_empty(&self, aliases: &[&str]) -> Option<&str> {
        self.first_of(aliases).filter(|v| !v.is_empty())
    }

    /// Every value supplied under any of the aliases.
    pub fn all_of<'a>(&'a self, aliases: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| aliases.contains(&k.as_str()))
            .map(|(_, v)| v.as_str())
    }
}
