//! The value threaded through every action: path segments, search entries and
//! per-call options.
//!
//! A `Location` is plain data.  Templates produce new locations from old ones;
//! the serialized store turns them into URL strings and back (see
//! [`crate::url`]).
//!
//! # Absent search values
//!
//! `search` maps keys to `Option<SearchValue>`.  `None` means "remove this key
//! when writing": the store merges a new location over the previous one, so a
//! key that simply disappears from the map would be carried forward.  Setting
//! it to `None` is how an action deletes it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Search entries keyed by route key.  Sorted so serialization is stable.
pub type SearchMap = BTreeMap<String, Option<SearchValue>>;

// ── SearchValue ───────────────────────────────────────────────────────────────

/// A primitive query value.
///
/// After a round trip through a serialized store every scalar comes back as
/// `Text`, so the accessors interpret values leniently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchValue {
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl SearchValue {
    /// `Bool(true)` or the text `"true"`.
    pub fn as_bool(&self) -> bool {
        match self {
            SearchValue::Bool(b) => *b,
            SearchValue::Text(s) => s == "true",
            _ => false,
        }
    }

    /// `Number(n)` or text that parses as a decimal integer.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            SearchValue::Number(n) => Some(*n),
            SearchValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Scalar rendered as text; `None` for lists.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SearchValue::Text(s) => Some(s.clone()),
            SearchValue::Number(n) => Some(n.to_string()),
            SearchValue::Bool(b) => Some(b.to_string()),
            SearchValue::List(_) => None,
        }
    }
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Bool(b) => write!(f, "{b}"),
            SearchValue::Number(n) => write!(f, "{n}"),
            SearchValue::Text(s) => f.write_str(s),
            SearchValue::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

impl From<bool> for SearchValue {
    fn from(b: bool) -> Self {
        SearchValue::Bool(b)
    }
}

impl From<i64> for SearchValue {
    fn from(n: i64) -> Self {
        SearchValue::Number(n)
    }
}

impl From<&str> for SearchValue {
    fn from(s: &str) -> Self {
        SearchValue::Text(s.to_owned())
    }
}

impl From<String> for SearchValue {
    fn from(s: String) -> Self {
        SearchValue::Text(s)
    }
}

// ── LocationOptions ───────────────────────────────────────────────────────────

/// Per-call options.  The same record is passed to an action and merged into
/// the location it returns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace_location: bool,
    /// Skip cache writes for this call and everything it cascades into.
    pub disable_caching: bool,
    /// Compute the resulting location without touching any store.
    pub dry_run: bool,
    /// Payload for `data` routers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Embed the serialized router cache in the written location.
    pub add_cache_to_location: bool,
    /// Pending data for other `data` routers reached by the cascade, by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub path_data: BTreeMap<String, String>,
}

impl LocationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_path_data(mut self, router: impl Into<String>, data: impl Into<String>) -> Self {
        self.path_data.insert(router.into(), data.into());
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn replace(mut self) -> Self {
        self.replace_location = true;
        self
    }

    pub fn without_caching(mut self) -> Self {
        self.disable_caching = true;
        self
    }

    pub fn add_cache(mut self) -> Self {
        self.add_cache_to_location = true;
        self
    }

    /// Fold `other` into `self`: flags are OR-ed, payloads from `other` win.
    pub fn merge(&mut self, other: &LocationOptions) {
        self.replace_location      |= other.replace_location;
        self.disable_caching       |= other.disable_caching;
        self.dry_run               |= other.dry_run;
        self.add_cache_to_location |= other.add_cache_to_location;
        if other.data.is_some() {
            self.data = other.data.clone();
        }
        self.path_data.extend(other.path_data.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// Ordered path segments, search entries and call options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: Vec<String>,
    pub search:   SearchMap,
    #[serde(default)]
    pub options:  LocationOptions,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a location from path segments, with no search entries.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pathname: segments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    // ── Path helpers ──────────────────────────────────────────────────────

    /// Segment at `index`, if the path is that deep.
    #[inline]
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.pathname.get(index).map(String::as_str)
    }

    /// Write `value` at `index` and drop every deeper segment.
    ///
    /// A path shorter than `index` is padded with empty segments so the value
    /// still lands at its own depth.
    pub fn set_segment(&mut self, index: usize, value: impl Into<String>) {
        self.pathname.truncate(index);
        while self.pathname.len() < index {
            self.pathname.push(String::new());
        }
        self.pathname.push(value.into());
    }

    /// Keep only the first `len` segments.
    #[inline]
    pub fn truncate_path(&mut self, len: usize) {
        self.pathname.truncate(len);
    }

    // ── Search helpers ────────────────────────────────────────────────────

    /// Present (non-`None`) value for `key`.
    #[inline]
    pub fn search_value(&self, key: &str) -> Option<&SearchValue> {
        self.search.get(key).and_then(Option::as_ref)
    }

    pub fn set_search(&mut self, key: impl Into<String>, value: impl Into<SearchValue>) {
        self.search.insert(key.into(), Some(value.into()));
    }

    /// Mark `key` for removal on the next write.
    pub fn clear_search(&mut self, key: impl Into<String>) {
        self.search.insert(key.into(), None);
    }

    /// Iterator over present search entries only.
    pub fn present_search(&self) -> impl Iterator<Item = (&str, &SearchValue)> + '_ {
        self.search
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Overlay `self` on `previous`: keys missing from `self` are carried
    /// forward, keys set to `None` are removed, the path and options are
    /// taken from `self`.
    pub fn merged_onto(&self, previous: &Location) -> Location {
        let mut search: SearchMap = previous
            .present_search()
            .map(|(k, v)| (k.to_owned(), Some(v.clone())))
            .collect();
        for (k, v) in &self.search {
            match v {
                Some(v) => search.insert(k.clone(), Some(v.clone())),
                None    => search.remove(k),
            };
        }
        Location {
            pathname: self.pathname.clone(),
            search,
            options:  self.options.clone(),
        }
    }
}
