//! `RouterCache` — remembers a router's last visibility so a parent can
//! rehydrate it.
//!
//! # Entries
//!
//! | `was_visible` | Meaning for the parent's next reveal                     |
//! |---------------|----------------------------------------------------------|
//! | `Some(true)`  | show the router again (and drop the entry)               |
//! | `Some(false)` | the user hid it on purpose; leave it hidden, skip defaults |
//! | `None`        | never touched; apply its default action                  |
//!
//! # Transactions
//!
//! `start_transaction` clones the committed map into a snapshot.  While the
//! snapshot exists every read and write goes to it; `save_transaction` makes
//! it the committed map, `discard_transaction` drops it.  One top-level action
//! call is bracketed by exactly one transaction, so a dry run (or a failed
//! call) leaves the committed cache untouched.

use std::collections::BTreeMap;

use rp_core::{CacheEntry, RouterResult};
use tracing::trace;

use crate::NameMap;

#[derive(Default, Debug, Clone)]
pub struct RouterCache {
    committed:   NameMap<CacheEntry>,
    transaction: Option<NameMap<CacheEntry>>,
}

impl RouterCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Views ─────────────────────────────────────────────────────────────

    fn active(&self) -> &NameMap<CacheEntry> {
        self.transaction.as_ref().unwrap_or(&self.committed)
    }

    fn active_mut(&mut self) -> &mut NameMap<CacheEntry> {
        self.transaction.as_mut().unwrap_or(&mut self.committed)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Cached visibility, or `None` when there is no entry.
    pub fn was_visible(&self, name: &str) -> Option<bool> {
        self.active().get(name).map(|e| e.visible)
    }

    /// Data remembered alongside the visibility.
    pub fn previous_data(&self, name: &str) -> Option<String> {
        self.active().get(name).and_then(|e| e.data.clone())
    }

    /// Committed entry, ignoring any open transaction.
    pub fn entry(&self, name: &str) -> Option<&CacheEntry> {
        self.committed.get(name)
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Merge `entry` into the existing one.  A `None` payload keeps the data
    /// already cached.
    pub fn set_cache(&mut self, name: &str, entry: CacheEntry) {
        trace!(router = name, visible = entry.visible, "cache set");
        let slot = self.active_mut().entry(name.to_owned()).or_default();
        slot.visible = entry.visible;
        if entry.data.is_some() {
            slot.data = entry.data;
        }
    }

    pub fn remove_cache(&mut self, name: &str) {
        trace!(router = name, "cache remove");
        self.active_mut().remove(name);
    }

    // ── Transactions ──────────────────────────────────────────────────────

    /// Snapshot the committed cache.  A second call while a transaction is
    /// open keeps the existing snapshot.
    pub fn start_transaction(&mut self) {
        if self.transaction.is_none() {
            self.transaction = Some(self.committed.clone());
        }
    }

    /// Commit the snapshot.  No-op without an open transaction.
    pub fn save_transaction(&mut self) {
        if let Some(snapshot) = self.transaction.take() {
            self.committed = snapshot;
        }
    }

    /// Throw the snapshot away.
    pub fn discard_transaction(&mut self) {
        self.transaction = None;
    }

    // ── Serialization ─────────────────────────────────────────────────────

    /// JSON of the active view, keys sorted.
    pub fn serialized_cache(&self) -> String {
        let sorted: BTreeMap<&str, &CacheEntry> =
            self.active().iter().map(|(k, v)| (k.as_str(), v)).collect();
        // A map of plain strings and bools cannot fail to serialize.
        serde_json::to_string(&sorted).unwrap_or_default()
    }

    /// Replace the committed cache with a `serialized_cache` string.
    ///
    /// # Errors
    ///
    /// `RouterError::Cache` if `json` is not a cache map.
    pub fn restore_serialized(&mut self, json: &str) -> RouterResult<()> {
        let parsed: BTreeMap<String, CacheEntry> = serde_json::from_str(json)?;
        self.committed = parsed.into_iter().collect();
        self.transaction = None;
        Ok(())
    }
}
