//! Router declarations (construction input) and the resolved per-router
//! config derived from them.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "name": "root",
//!   "routers": {
//!     "scene": [
//!       { "name": "user", "defaultAction": ["show"],
//!         "routers": { "data": [{ "name": "userId", "isPathRouter": true }] } }
//!     ],
//!     "feature": [{ "name": "help", "routeKey": "h" }]
//!   }
//! }
//! ```
//!
//! Child types come from the keys of `routers`; the top-level declaration is
//! the root and its `type` may be omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Action, RouterError, RouterResult, RouterType};

// ── DefaultAction ─────────────────────────────────────────────────────────────

/// `[action, data?]` applied to a child the first time its parent becomes
/// visible with no cache entry for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultAction {
    pub action: Action,
    pub data:   Option<String>,
}

impl DefaultAction {
    pub fn new(action: Action) -> Self {
        Self { action, data: None }
    }

    pub fn with_data(action: Action, data: impl Into<String>) -> Self {
        Self { action, data: Some(data.into()) }
    }
}

/// `defaultAction` travels as a JSON array; `[]` means "none".
mod default_action_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    use super::DefaultAction;

    pub fn serialize<S: Serializer>(value: &Option<DefaultAction>, s: S) -> Result<S::Ok, S::Error> {
        let items: Vec<String> = match value {
            None => Vec::new(),
            Some(d) => std::iter::once(d.action.to_string())
                .chain(d.data.iter().cloned())
                .collect(),
        };
        items.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DefaultAction>, D::Error> {
        let items = Vec::<String>::deserialize(d)?;
        let mut items = items.into_iter();
        let Some(action) = items.next() else {
            return Ok(None);
        };
        let action = action.parse().map_err(D::Error::custom)?;
        Ok(Some(DefaultAction { action, data: items.next() }))
    }
}

// ── RouterDeclaration ─────────────────────────────────────────────────────────

/// Declarative description of a router and its subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterDeclaration {
    pub name: String,

    /// Only meaningful on the top-level declaration; children take their type
    /// from the `routers` key they are listed under.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub router_type: Option<RouterType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_path_router: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_caching: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_inversely_activate: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_parent_try_to_activate_siblings: Option<bool>,

    #[serde(default, with = "default_action_serde", skip_serializing_if = "Option::is_none")]
    pub default_action: Option<DefaultAction>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: BTreeMap<RouterType, Vec<RouterDeclaration>>,
}

impl RouterDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Parse a declaration tree from JSON.
    pub fn from_json(json: &str) -> RouterResult<Self> {
        serde_json::from_str(json).map_err(|e| RouterError::InvalidDeclaration(e.to_string()))
    }

    // ── Fluent setters ────────────────────────────────────────────────────

    pub fn route_key(mut self, key: impl Into<String>) -> Self {
        self.route_key = Some(key.into());
        self
    }

    pub fn path_router(mut self, is_path_router: bool) -> Self {
        self.is_path_router = Some(is_path_router);
        self
    }

    pub fn disable_caching(mut self, disable: bool) -> Self {
        self.disable_caching = Some(disable);
        self
    }

    pub fn inversely_activate(mut self, activate: bool) -> Self {
        self.should_inversely_activate = Some(activate);
        self
    }

    pub fn activate_siblings(mut self, activate: bool) -> Self {
        self.should_parent_try_to_activate_siblings = Some(activate);
        self
    }

    pub fn default_action(mut self, action: DefaultAction) -> Self {
        self.default_action = Some(action);
        self
    }

    /// Shorthand for `default_action(DefaultAction::new(Action::Show))`.
    pub fn default_show(self) -> Self {
        self.default_action(DefaultAction::new(Action::Show))
    }

    /// Append a child of `router_type`.
    pub fn child(mut self, router_type: RouterType, child: RouterDeclaration) -> Self {
        self.routers.entry(router_type).or_default().push(child);
        self
    }
}

// ── RouterConfig ──────────────────────────────────────────────────────────────

/// Per-router configuration as stored on a tree node.
///
/// Options left unset in the declaration stay `None` here; inheritance and
/// type defaults are resolved by the tree, which can see the ancestors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    pub route_key: String,
    /// Explicit path claim, if any.
    pub is_path_router: Option<bool>,
    pub should_inversely_activate: bool,
    /// Explicit caching setting, if any (inherited when `None`).
    pub disable_caching: Option<bool>,
    pub default_action: Option<DefaultAction>,
    pub should_parent_try_to_activate_siblings: Option<bool>,
}

impl RouterConfig {
    pub fn from_declaration(decl: &RouterDeclaration) -> Self {
        Self {
            route_key: decl.route_key.clone().unwrap_or_else(|| decl.name.clone()),
            is_path_router: decl.is_path_router,
            should_inversely_activate: decl.should_inversely_activate.unwrap_or(true),
            disable_caching: decl.disable_caching,
            default_action: decl.default_action.clone(),
            should_parent_try_to_activate_siblings: decl.should_parent_try_to_activate_siblings,
        }
    }
}
