//! The serialized location store: the one place a location lives outside the
//! manager.
//!
//! [`SerializedStore`] is the seam a browser-history adapter would implement.
//! [`MemoryStore`] keeps a capped history of serialized URLs in memory with a
//! cursor, which is all the pipeline and its tests need.

use rp_core::{Location, RouterResult, parse_url, serialize_location};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Handle returned by [`SerializedStore::subscribe`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(pub u64);

/// Location listener.
pub type LocationListener = Box<dyn FnMut(&Location)>;

/// External home of the serialized location.
pub trait SerializedStore {
    /// Current location, options cleared.
    fn get_state(&self) -> Location;

    /// Merge `location` over the current one and write it, pushing a history
    /// entry unless `location.options.replace_location` is set.  Listeners
    /// are notified before this returns.
    fn set_state(&mut self, location: Location);

    fn subscribe(&mut self, listener: LocationListener) -> SubscriptionId;

    /// Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    fn back(&mut self);

    fn forward(&mut self);

    /// Move `delta` entries through history, clamped to its ends.
    fn go(&mut self, delta: isize);

    /// Canonical string form of `location`.
    fn serialize(&self, location: &Location) -> String {
        serialize_location(location)
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

pub const DEFAULT_MEMORY_HISTORY: usize = 100;

/// Settings for [`MemoryStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryStoreConfig {
    /// Oldest entries are dropped beyond this many.
    pub history_size: usize,
    pub initial_url:  String,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_MEMORY_HISTORY,
            initial_url:  "/".to_owned(),
        }
    }
}

pub struct MemoryStore {
    history:      Vec<String>,
    cursor:       usize,
    history_size: usize,
    listeners:    Vec<(SubscriptionId, LocationListener)>,
    next_id:      u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            history:      vec!["/".to_owned()],
            cursor:       0,
            history_size: DEFAULT_MEMORY_HISTORY,
            listeners:    Vec::new(),
            next_id:      0,
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("history", &self.history)
            .field("cursor", &self.cursor)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MemoryStore {
    /// Store starting at `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store starting at `url`.
    ///
    /// # Errors
    ///
    /// `InvalidLocation` if `url` does not decode.
    pub fn from_url(url: &str) -> RouterResult<Self> {
        Self::with_config(MemoryStoreConfig {
            initial_url: url.to_owned(),
            ..MemoryStoreConfig::default()
        })
    }

    pub fn with_config(config: MemoryStoreConfig) -> RouterResult<Self> {
        let initial = serialize_location(&parse_url(&config.initial_url)?);
        Ok(Self {
            history: vec![initial],
            history_size: config.history_size.max(1),
            ..Self::default()
        })
    }

    /// Serialized current entry.
    pub fn current_url(&self) -> &str {
        // `history` is never empty: it starts with one entry and only grows
        // or has entries replaced.
        self.history.get(self.cursor).map_or("/", String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn notify(&mut self) {
        let location = self.get_state();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&location);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.history.len().saturating_sub(1);
        let target = self.cursor.saturating_add_signed(delta).min(last);
        if target != self.cursor {
            trace!(from = self.cursor, to = target, "history move");
            self.cursor = target;
            self.notify();
        }
    }
}

impl SerializedStore for MemoryStore {
    fn get_state(&self) -> Location {
        match parse_url(self.current_url()) {
            Ok(location) => location,
            Err(e) => {
                warn!(error = %e, "stored url no longer parses");
                Location::new()
            }
        }
    }

    fn set_state(&mut self, location: Location) {
        let merged = location.merged_onto(&self.get_state());
        let url = serialize_location(&merged);

        if location.options.replace_location {
            if let Some(entry) = self.history.get_mut(self.cursor) {
                *entry = url;
            }
        } else {
            self.history.truncate(self.cursor + 1);
            self.history.push(url);
            if self.history.len() > self.history_size {
                let excess = self.history.len() - self.history_size;
                self.history.drain(..excess);
            }
            self.cursor = self.history.len() - 1;
        }
        trace!(url = self.current_url(), entries = self.history.len(), "location written");
        self.notify();
    }

    fn subscribe(&mut self, listener: LocationListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    fn back(&mut self) {
        self.move_cursor(-1);
    }

    fn forward(&mut self) {
        self.move_cursor(1);
    }

    fn go(&mut self, delta: isize) {
        self.move_cursor(delta);
    }
}
