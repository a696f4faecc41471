//! A single router node.

use std::collections::BTreeMap;

use rp_core::{DefaultAction, RouterConfig, RouterType};

/// One node of the [`RouterTree`][crate::RouterTree].
///
/// Name, type and route key never change after construction.  Properties
/// that depend on relatives (`is_path_router`, `path_location`, inherited
/// caching) are computed by the tree.
#[derive(Clone, Debug)]
pub struct Router {
    name:        String,
    router_type: RouterType,
    config:      RouterConfig,
    parent:      Option<String>,
    /// Children grouped by type, declaration order within a type.
    children:    BTreeMap<RouterType, Vec<String>>,
}

impl Router {
    pub(crate) fn new(
        name:        String,
        router_type: RouterType,
        config:      RouterConfig,
        parent:      Option<String>,
    ) -> Self {
        Self {
            name,
            router_type,
            config,
            parent,
            children: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn router_type(&self) -> RouterType {
        self.router_type
    }

    #[inline]
    pub fn route_key(&self) -> &str {
        &self.config.route_key
    }

    #[inline]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[inline]
    pub fn default_action(&self) -> Option<&DefaultAction> {
        self.config.default_action.as_ref()
    }

    /// Parent name; `None` only for the root.
    #[inline]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn children(&self) -> &BTreeMap<RouterType, Vec<String>> {
        &self.children
    }

    /// Children of one type, in declaration order.
    pub fn children_of(&self, router_type: RouterType) -> &[String] {
        self.children.get(&router_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All child names, grouped by type.
    pub fn child_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.values().flatten().map(String::as_str)
    }

    pub fn has_children(&self) -> bool {
        self.children.values().any(|c| !c.is_empty())
    }

    pub(crate) fn push_child(&mut self, router_type: RouterType, name: String) {
        self.children.entry(router_type).or_default().push(name);
    }

    pub(crate) fn remove_child(&mut self, name: &str) {
        for list in self.children.values_mut() {
            list.retain(|c| c != name);
        }
        self.children.retain(|_, list| !list.is_empty());
    }
}
