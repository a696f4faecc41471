//! `RouterHandle` — the action surface of one router.

use rp_core::{
    Action, Location, LocationOptions, RouterCurrentState, RouterResult, RouterType,
};
use rp_store::{ObserverId, RouterStateSnapshot};

use crate::{Manager, SerializedStore};

/// Borrow of a [`Manager`] scoped to one router.
///
/// Obtained from [`Manager::router`], which has already checked that the
/// router exists.
pub struct RouterHandle<'m, S: SerializedStore> {
    manager: &'m mut Manager<S>,
    name:    String,
}

impl<'m, S: SerializedStore> RouterHandle<'m, S> {
    pub(crate) fn new(manager: &'m mut Manager<S>, name: &str) -> Self {
        Self { manager, name: name.to_owned() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn router_type(&self) -> RouterResult<RouterType> {
        Ok(self.manager.tree.get(&self.name)?.router_type())
    }

    // ── Actions ───────────────────────────────────────────────────────────

    pub fn call(&mut self, action: Action, options: LocationOptions) -> RouterResult<Location> {
        self.manager.call(&self.name, action, options)
    }

    pub fn show(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::Show, options)
    }

    pub fn hide(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::Hide, options)
    }

    pub fn forward(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::Forward, options)
    }

    pub fn backward(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::Backward, options)
    }

    pub fn to_front(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::ToFront, options)
    }

    pub fn to_back(&mut self, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::ToBack, options)
    }

    pub fn set_data(&mut self, data: impl Into<String>, options: LocationOptions) -> RouterResult<Location> {
        self.call(Action::SetData, options.with_data(data))
    }

    /// URL `action` would lead to.
    pub fn link(&mut self, action: Action, options: LocationOptions) -> RouterResult<String> {
        self.manager.link(&self.name, action, options)
    }

    // ── State ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> RouterResult<RouterStateSnapshot> {
        self.manager.state(&self.name)
    }

    pub fn current(&self) -> Option<&RouterCurrentState> {
        self.manager.current(&self.name)
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some_and(|s| s.visible)
    }

    /// Previous states, newest first.
    pub fn history(&self) -> RouterResult<Vec<RouterCurrentState>> {
        Ok(self.manager.state(&self.name)?.historical)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> RouterResult<ObserverId>
    where
        F: FnMut(&RouterStateSnapshot) + 'static,
    {
        self.manager.subscribe(&self.name, observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.manager.unsubscribe(&self.name, id);
    }
}
