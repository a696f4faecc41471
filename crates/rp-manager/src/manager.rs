//! `Manager` — owns the tree, the cache, both stores and the action counter.

use rp_core::{
    Action, Location, LocationOptions, RouterCurrentState, RouterDeclaration, RouterResult,
    RouterType, parse_url,
};
use rp_store::{ObserverId, RouterCache, RouterStateSnapshot, RouterStateStore};
use rp_tree::RouterTree;
use tracing::debug;

use crate::pipeline::Dispatch;
use crate::{
    LocationListener, ManagerConfig, MemoryStore, RouterHandle, SerializedStore, SubscriptionId,
};

/// A router tree kept in sync with a serialized location.
///
/// Build one with [`ManagerBuilder`][crate::ManagerBuilder].  Every write
/// the manager makes to its store is followed by a rebuild of every router's
/// state, so [`state`][Self::state] always reflects the store's location.
pub struct Manager<S: SerializedStore = MemoryStore> {
    pub(crate) tree:                 RouterTree,
    pub(crate) cache:                RouterCache,
    pub(crate) states:               RouterStateStore,
    pub(crate) store:                S,
    pub(crate) action_count:         u64,
    pub(crate) config:               ManagerConfig,
    pub(crate) embedded_cache:       Option<String>,
    pub(crate) routers_missing_data: Vec<String>,
}

impl<S: SerializedStore> Manager<S> {
    pub(crate) fn dispatch(&mut self) -> Dispatch<'_> {
        Dispatch {
            tree:           &self.tree,
            cache:          &mut self.cache,
            states:         &mut self.states,
            store:          &mut self.store,
            action_count:   &mut self.action_count,
            config:         &self.config,
            embedded_cache: &mut self.embedded_cache,
        }
    }

    /// Rebuild after a change that did not go through the pipeline; counts
    /// as one action.
    fn resync(&mut self) -> RouterResult<Vec<String>> {
        let stamp = self.action_count + 1;
        let changed = self.dispatch().sync_states(stamp)?;
        self.action_count = stamp;
        Ok(changed)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn tree(&self) -> &RouterTree {
        &self.tree
    }

    pub fn cache(&self) -> &RouterCache {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Number of completed, non-dry-run actions.
    pub fn action_count(&self) -> u64 {
        self.action_count
    }

    /// Current location as held by the store.
    pub fn location(&self) -> Location {
        self.store.get_state()
    }

    /// Current location, serialized.
    pub fn url(&self) -> String {
        self.store.serialize(&self.store.get_state())
    }

    /// Data routers the latest action showed without data because
    /// `error_when_missing_data` is off.
    pub fn routers_missing_data(&self) -> &[String] {
        &self.routers_missing_data
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Handle exposing the action surface of one router.
    pub fn router(&mut self, name: &str) -> RouterResult<RouterHandle<'_, S>> {
        self.tree.get(name)?;
        Ok(RouterHandle::new(self, name))
    }

    /// Run `action` on `name` through the full pipeline.
    pub fn call(
        &mut self,
        name:    &str,
        action:  Action,
        options: LocationOptions,
    ) -> RouterResult<Location> {
        let (location, ctx) = self.dispatch().call_direct(name, action, options)?;
        self.routers_missing_data = ctx.routers_missing_data;
        Ok(location)
    }

    /// Serialized location `action` would produce, without side effects.
    pub fn link(
        &mut self,
        name:    &str,
        action:  Action,
        options: LocationOptions,
    ) -> RouterResult<String> {
        let (location, _) = self.dispatch().call_direct(name, action, options.dry_run())?;
        let current = self.store.get_state();
        Ok(self.store.serialize(&location.merged_onto(&current)))
    }

    // ── State ─────────────────────────────────────────────────────────────

    /// `{current, historical}` for `name`.
    pub fn state(&self, name: &str) -> RouterResult<RouterStateSnapshot> {
        self.states.state(name)
    }

    /// Current state of `name`, if it has one.
    pub fn current(&self, name: &str) -> Option<&RouterCurrentState> {
        self.states.current(name)
    }

    /// Whether `name` changed in the latest action.
    pub fn just_changed(&self, name: &str) -> bool {
        self.states
            .current(name)
            .and_then(|s| s.action_count)
            .is_some_and(|n| n == self.action_count)
    }

    /// Observe `name`.  The observer runs immediately and after every change.
    pub fn subscribe<F>(&mut self, name: &str, observer: F) -> RouterResult<ObserverId>
    where
        F: FnMut(&RouterStateSnapshot) + 'static,
    {
        self.tree.get(name)?;
        Ok(self.states.subscribe(name, observer))
    }

    pub fn unsubscribe(&mut self, name: &str, id: ObserverId) {
        self.states.unsubscribe(name, id);
    }

    /// Listen to every location the store writes.
    pub fn subscribe_location(&mut self, listener: LocationListener) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe_location(&mut self, id: SubscriptionId) {
        self.store.unsubscribe(id);
    }

    // ── History ───────────────────────────────────────────────────────────

    pub fn back(&mut self) -> RouterResult<()> {
        self.store.back();
        self.resync().map(drop)
    }

    pub fn forward(&mut self) -> RouterResult<()> {
        self.store.forward();
        self.resync().map(drop)
    }

    pub fn go(&mut self, delta: isize) -> RouterResult<()> {
        self.store.go(delta);
        self.resync().map(drop)
    }

    /// Write `url` to the store as a new entry, as a user following a link
    /// would, and rebuild.
    pub fn navigate(&mut self, url: &str) -> RouterResult<()> {
        let target = parse_url(url)?;
        // Keys absent from `url` must not survive the store's merge.
        let mut location = target.clone();
        for (key, _) in self.store.get_state().present_search() {
            if !target.search.contains_key(key) {
                location.clear_search(key);
            }
        }
        self.store.set_state(location);
        self.resync().map(drop)
    }

    // ── Tree mutation ─────────────────────────────────────────────────────

    /// Add `declaration` (and its subtree) below `parent`.  Returns the names
    /// added.
    pub fn add_router(
        &mut self,
        parent:      &str,
        router_type: RouterType,
        declaration: &RouterDeclaration,
    ) -> RouterResult<Vec<String>> {
        let added = self.tree.add(parent, router_type, declaration)?;
        for name in &added {
            self.states.register(name);
        }
        debug!(parent, added = ?added, "routers added");
        self.resync()?;
        Ok(added)
    }

    /// Remove `name` and its subtree, dropping their state, observers and
    /// cache entries.  Returns the names removed.
    pub fn remove_router(&mut self, name: &str) -> RouterResult<Vec<String>> {
        let removed = self.tree.remove(name)?;
        for gone in &removed {
            self.states.unsubscribe_all(gone);
            self.states.remove(gone);
            self.cache.remove_cache(gone);
        }
        self.resync()?;
        Ok(removed)
    }
}
