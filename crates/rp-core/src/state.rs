//! Per-router state records: what a reducer produces and what the cache keeps.

use serde::{Deserialize, Serialize};

/// The reduced state of one router.
///
/// `order` is only filled for stack routers and `data` only for data
/// routers.  `action_count` is stamped by the manager with the number of the
/// action that last changed the router; reducers leave it `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterCurrentState {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_count: Option<u64>,
}

impl RouterCurrentState {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn visible() -> Self {
        Self { visible: true, ..Self::default() }
    }

    /// Equality that ignores the `action_count` stamp.
    pub fn same_as(&self, other: &RouterCurrentState) -> bool {
        self.visible == other.visible && self.data == other.data && self.order == other.order
    }
}

/// What the cache remembers about a router it may later rehydrate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl CacheEntry {
    pub fn new(visible: bool, data: Option<String>) -> Self {
        Self { visible, data }
    }
}
