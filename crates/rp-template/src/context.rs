//! Per-call context threaded through actions, and the host seam.

use std::collections::BTreeMap;

use rp_core::{Action, Location, LocationOptions, RouterResult, RouterType};
use rp_tree::RouterTree;

/// Where a call came from relative to the router receiving it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CallDirection {
    /// A child revealing its parent.
    Up,
    /// A parent cascading into its children.
    Down,
    /// A router acting on itself or its siblings.
    Lateral,
}

/// Context carried alongside the location through one call and everything
/// it cascades into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCtx {
    pub action:                  Action,
    pub dry_run:                 bool,
    /// Inherited by every nested call.
    pub disable_caching:         bool,
    /// `None` for a top-level call.
    pub call_direction:          Option<CallDirection>,
    /// Set when a parent is shown because one of its children of this type is.
    pub activated_by_child_type: Option<RouterType>,
    /// Pending data for `data` routers, by router name.
    pub path_data:               BTreeMap<String, String>,
    /// Routers shown without data while missing data was tolerated.
    pub routers_missing_data:    Vec<String>,
}

impl ActionCtx {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            dry_run:                 false,
            disable_caching:         false,
            call_direction:          None,
            activated_by_child_type: None,
            path_data:               BTreeMap::new(),
            routers_missing_data:    Vec::new(),
        }
    }

    /// Top-level context seeded from the caller's options.
    pub fn from_options(action: Action, options: &LocationOptions) -> Self {
        Self {
            dry_run:         options.dry_run,
            disable_caching: options.disable_caching,
            path_data:       options.path_data.clone(),
            ..Self::new(action)
        }
    }

    /// Context for a nested call: same flags and pending data, new action
    /// and direction, no activating child.
    pub fn nested(&self, action: Action, direction: CallDirection) -> Self {
        Self {
            action,
            call_direction: Some(direction),
            activated_by_child_type: None,
            ..self.clone()
        }
    }

    pub fn without_caching(mut self) -> Self {
        self.disable_caching = true;
        self
    }

    pub fn activated_by(mut self, child_type: RouterType) -> Self {
        self.activated_by_child_type = Some(child_type);
        self
    }

    #[inline]
    pub fn came_from(&self, direction: CallDirection) -> bool {
        self.call_direction == Some(direction)
    }

    /// Fold what a nested call learned back into this context.
    pub fn absorb(&mut self, nested: ActionCtx) {
        for name in nested.routers_missing_data {
            if !self.routers_missing_data.contains(&name) {
                self.routers_missing_data.push(name);
            }
        }
    }
}

/// What templates need from whoever runs them.
///
/// The manager's pipeline implements this; `call` runs the indirect pipeline
/// for `router` and returns the resulting location.
pub trait ActionHost {
    fn tree(&self) -> &RouterTree;

    fn call(
        &mut self,
        router:   &str,
        action:   Action,
        options:  &LocationOptions,
        location: Location,
        ctx:      &ActionCtx,
    ) -> RouterResult<Location>;
}
