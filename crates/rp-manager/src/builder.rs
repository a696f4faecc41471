//! Fluent builder for constructing a [`Manager`].

use rp_core::{RouterDeclaration, RouterResult};
use rp_store::{RouterCache, RouterStateStore};
use rp_tree::RouterTree;
use tracing::debug;

use crate::{Manager, ManagerConfig, MemoryStore, SerializedStore};

/// Fluent builder for [`Manager<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                       |
/// |--------------|-------------------------------|
/// | `.store(s)`  | `MemoryStore::new()` at `/`   |
/// | `.config(c)` | `ManagerConfig::default()`    |
///
/// # Example
///
/// ```rust,ignore
/// let decl = RouterDeclaration::from_json(json)?;
/// let mut manager = ManagerBuilder::new(decl)
///     .store(MemoryStore::from_url("/user?help=true")?)
///     .build()?;
/// manager.router("events")?.show(LocationOptions::new())?;
/// ```
pub struct ManagerBuilder<S: SerializedStore = MemoryStore> {
    declaration: RouterDeclaration,
    store:       S,
    config:      ManagerConfig,
}

impl ManagerBuilder<MemoryStore> {
    pub fn new(declaration: RouterDeclaration) -> Self {
        Self {
            declaration,
            store:  MemoryStore::new(),
            config: ManagerConfig::default(),
        }
    }
}

impl<S: SerializedStore> ManagerBuilder<S> {
    /// Use `store` as the serialized location store.
    pub fn store<T: SerializedStore>(self, store: T) -> ManagerBuilder<T> {
        ManagerBuilder {
            declaration: self.declaration,
            store,
            config:      self.config,
        }
    }

    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the declaration, register every router with the state store
    /// and reduce the store's current location into initial state.
    ///
    /// If that location carries an embedded cache, it is restored here.
    pub fn build(self) -> RouterResult<Manager<S>> {
        let tree = RouterTree::from_declaration(&self.declaration)?;

        let mut states = RouterStateStore::new(self.config.history_size);
        for router in tree.preorder() {
            states.register(router.name());
        }

        let mut manager = Manager {
            tree,
            cache:                RouterCache::new(),
            states,
            store:                self.store,
            action_count:         0,
            config:               self.config,
            embedded_cache:       None,
            routers_missing_data: Vec::new(),
        };
        manager.dispatch().sync_states(0)?;
        debug!(routers = manager.tree.len(), root = manager.tree.root_name(), "manager built");
        Ok(manager)
    }
}
