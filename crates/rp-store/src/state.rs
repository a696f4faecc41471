//! `RouterStateStore` — current and historical state per router, with
//! per-router observers.
//!
//! The manager is the only writer: after every location change it reduces
//! the whole tree and hands the result to [`RouterStateStore::set_state`] in
//! one call.  Routers whose state did not change are skipped entirely (no
//! history entry, no notification), which is what makes a repeated `show`
//! invisible to observers.

use std::collections::BTreeMap;
use std::fmt;

use rp_core::{RouterCurrentState, RouterError, RouterResult};
use tracing::trace;

use crate::NameMap;

/// History length kept per router unless configured otherwise.
pub const DEFAULT_HISTORY_SIZE: usize = 2;

/// Handle returned by [`RouterStateStore::subscribe`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ObserverId(pub u64);

/// What observers receive: the current state and the most recent previous
/// states, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterStateSnapshot {
    pub current:    Option<RouterCurrentState>,
    pub historical: Vec<RouterCurrentState>,
}

impl RouterStateSnapshot {
    /// `true` when the current state exists and is visible.
    pub fn visible(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.visible)
    }
}

type Observer = Box<dyn FnMut(&RouterStateSnapshot)>;

#[derive(Default)]
struct Entry {
    snapshot:  RouterStateSnapshot,
    observers: Vec<(ObserverId, Observer)>,
}

pub struct RouterStateStore {
    history_size: usize,
    entries:      NameMap<Entry>,
    next_id:      u64,
}

impl Default for RouterStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl fmt::Debug for RouterStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterStateStore")
            .field("history_size", &self.history_size)
            .field("routers", &self.entries.len())
            .finish()
    }
}

impl RouterStateStore {
    pub fn new(history_size: usize) -> Self {
        Self {
            history_size,
            entries: NameMap::default(),
            next_id: 0,
        }
    }

    pub fn history_size(&self) -> usize {
        self.history_size
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Create the empty entry for a router.  Registering twice keeps the
    /// existing state and observers.
    pub fn register(&mut self, name: &str) {
        self.entries.entry(name.to_owned()).or_default();
    }

    /// Drop a router's state and observers.
    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Snapshot for `name`.
    ///
    /// # Errors
    ///
    /// `StateNotWired` if the router was never registered.
    pub fn state(&self, name: &str) -> RouterResult<RouterStateSnapshot> {
        self.entries
            .get(name)
            .map(|e| e.snapshot.clone())
            .ok_or_else(|| RouterError::StateNotWired(name.to_owned()))
    }

    /// Current state, if any has been set.
    pub fn current(&self, name: &str) -> Option<&RouterCurrentState> {
        self.entries.get(name).and_then(|e| e.snapshot.current.as_ref())
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Apply `desired` states.  Returns the names whose state changed, in key
    /// order.
    ///
    /// Unknown names are registered on the fly.
    pub fn set_state(&mut self, desired: BTreeMap<String, RouterCurrentState>) -> Vec<String> {
        let history_size = self.history_size;
        let mut changed = Vec::new();

        for (name, state) in desired {
            let entry = self.entries.entry(name.clone()).or_default();
            if entry.snapshot.current.as_ref() == Some(&state) {
                continue;
            }

            if let Some(previous) = entry.snapshot.current.replace(state) {
                entry.snapshot.historical.insert(0, previous);
                entry.snapshot.historical.truncate(history_size);
            }

            trace!(router = %name, observers = entry.observers.len(), "state changed");
            let snapshot = &entry.snapshot;
            for (_, observer) in entry.observers.iter_mut() {
                observer(snapshot);
            }
            changed.push(name);
        }
        changed
    }

    // ── Observers ─────────────────────────────────────────────────────────

    /// Register `observer` for `name`.  It is called immediately with the
    /// current snapshot and again after every change.
    pub fn subscribe<F>(&mut self, name: &str, mut observer: F) -> ObserverId
    where
        F: FnMut(&RouterStateSnapshot) + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;

        let entry = self.entries.entry(name.to_owned()).or_default();
        observer(&entry.snapshot);
        entry.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove one observer.  Unknown routers or ids are ignored.
    pub fn unsubscribe(&mut self, name: &str, id: ObserverId) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.observers.retain(|(oid, _)| *oid != id);
        }
    }

    /// Remove every observer of `name`.
    pub fn unsubscribe_all(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.observers.clear();
        }
    }

    pub fn observer_count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |e| e.observers.len())
    }
}
