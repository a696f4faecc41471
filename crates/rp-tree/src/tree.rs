//! `RouterTree` — name-keyed arena of [`Router`] nodes.
//!
//! # Validation
//!
//! Every insertion checks, in order:
//!
//! 1. the name is unused (`DuplicateName`);
//! 2. the route key is unused (`DuplicateRouteKey`);
//! 3. an explicit `is_path_router: true` is allowed for the type
//!    (`PathRouterNotAllowed`), sits under a path router
//!    (`PathRouterWithoutPathParent`), and no sibling of another type has
//!    also claimed the path explicitly (`CompetingPathRouters`).
//!
//! Adding a subtree is atomic: on any error the tree is left as it was.
//!
//! # Path routers
//!
//! A router occupies a path segment when it has no parent, or when it claims
//! the path (explicitly or through its type's default), its parent is a path
//! router, and (for an implicit claim) no sibling of another type claims
//! it explicitly.  `path_location` is the segment index: root `None`, its
//! children `0`, grandchildren `1`, and so on.

use std::collections::HashMap;

use rp_core::{RouterConfig, RouterDeclaration, RouterError, RouterResult, RouterType};
use tracing::debug;

use crate::Router;

#[derive(Clone, Debug)]
pub struct RouterTree {
    routers:    HashMap<String, Router>,
    /// Route key → router name.
    route_keys: HashMap<String, String>,
    root:       String,
}

impl RouterTree {
    // ── Construction ──────────────────────────────────────────────────────

    /// Build and validate a tree from its root declaration.
    ///
    /// The root's `type` may be omitted; any type other than `root` is an
    /// `InvalidDeclaration`.
    pub fn from_declaration(decl: &RouterDeclaration) -> RouterResult<Self> {
        match decl.router_type {
            None | Some(RouterType::Root) => {}
            Some(other) => {
                return Err(RouterError::InvalidDeclaration(format!(
                    "top-level router `{}` must be of type `root`, not `{other}`",
                    decl.name
                )));
            }
        }

        let config = RouterConfig::from_declaration(decl);
        let mut tree = Self {
            routers:    HashMap::new(),
            route_keys: HashMap::new(),
            root:       decl.name.clone(),
        };
        tree.route_keys.insert(config.route_key.clone(), decl.name.clone());
        tree.routers.insert(
            decl.name.clone(),
            Router::new(decl.name.clone(), RouterType::Root, config, None),
        );

        for (&child_type, children) in &decl.routers {
            for child in children {
                tree.insert_subtree(&decl.name, child_type, child)?;
            }
        }
        Ok(tree)
    }

    /// Add `decl` (and its subtree) as a child of `parent`.
    ///
    /// Returns the names added, parents before children.
    pub fn add(
        &mut self,
        parent:      &str,
        router_type: RouterType,
        decl:        &RouterDeclaration,
    ) -> RouterResult<Vec<String>> {
        let mut staged = self.clone();
        let added = staged.insert_subtree(parent, router_type, decl)?;
        *self = staged;
        Ok(added)
    }

    /// Remove `name` and its whole subtree.
    ///
    /// Returns the names removed, children before parents.
    pub fn remove(&mut self, name: &str) -> RouterResult<Vec<String>> {
        let router = self.get(name)?;
        let Some(parent) = router.parent().map(str::to_owned) else {
            return Err(RouterError::RootRemoval);
        };

        let mut removed = Vec::new();
        self.collect_postorder(name, &mut removed);
        for gone in &removed {
            if let Some(r) = self.routers.remove(gone) {
                self.route_keys.remove(r.route_key());
            }
        }
        if let Some(p) = self.routers.get_mut(&parent) {
            p.remove_child(name);
        }
        debug!(router = name, removed = removed.len(), "removed subtree");
        Ok(removed)
    }

    fn insert_subtree(
        &mut self,
        parent:      &str,
        router_type: RouterType,
        decl:        &RouterDeclaration,
    ) -> RouterResult<Vec<String>> {
        self.validate(parent, router_type, decl)?;

        let config = RouterConfig::from_declaration(decl);
        self.route_keys.insert(config.route_key.clone(), decl.name.clone());
        self.routers.insert(
            decl.name.clone(),
            Router::new(decl.name.clone(), router_type, config, Some(parent.to_owned())),
        );
        if let Some(p) = self.routers.get_mut(parent) {
            p.push_child(router_type, decl.name.clone());
        }

        let mut added = vec![decl.name.clone()];
        for (&child_type, children) in &decl.routers {
            for child in children {
                added.extend(self.insert_subtree(&decl.name, child_type, child)?);
            }
        }
        Ok(added)
    }

    fn validate(
        &self,
        parent:      &str,
        router_type: RouterType,
        decl:        &RouterDeclaration,
    ) -> RouterResult<()> {
        let parent_router = self.get(parent)?;

        if router_type == RouterType::Root {
            return Err(RouterError::InvalidDeclaration(format!(
                "router `{}` cannot be of type `root` below `{parent}`",
                decl.name
            )));
        }
        if self.routers.contains_key(&decl.name) {
            return Err(RouterError::DuplicateName(decl.name.clone()));
        }

        let route_key = decl.route_key.as_deref().unwrap_or(&decl.name);
        if let Some(existing) = self.route_keys.get(route_key) {
            return Err(RouterError::DuplicateRouteKey {
                router:    decl.name.clone(),
                route_key: route_key.to_owned(),
                existing:  existing.clone(),
            });
        }

        if decl.is_path_router == Some(true) {
            if !router_type.template_config().can_be_path_router {
                return Err(RouterError::PathRouterNotAllowed {
                    router: decl.name.clone(),
                    router_type,
                });
            }
            if !self.is_path_router(parent) {
                return Err(RouterError::PathRouterWithoutPathParent(decl.name.clone()));
            }
            let competing = parent_router
                .children()
                .iter()
                .filter(|(t, _)| **t != router_type)
                .find(|(_, names)| {
                    names
                        .iter()
                        .filter_map(|n| self.routers.get(n))
                        .any(|r| r.config().is_path_router == Some(true))
                });
            if let Some((&competing, _)) = competing {
                return Err(RouterError::CompetingPathRouters {
                    router: decl.name.clone(),
                    router_type,
                    competing,
                });
            }
        }
        Ok(())
    }

    fn collect_postorder(&self, name: &str, out: &mut Vec<String>) {
        if let Some(router) = self.routers.get(name) {
            for child in router.child_names() {
                self.collect_postorder(child, out);
            }
        }
        out.push(name.to_owned());
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Router by name.
    ///
    /// # Errors
    ///
    /// `UnknownRouter` if no router has that name.
    pub fn get(&self, name: &str) -> RouterResult<&Router> {
        self.routers
            .get(name)
            .ok_or_else(|| RouterError::UnknownRouter(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routers.contains_key(name)
    }

    pub fn root(&self) -> &Router {
        // The root is inserted at construction and `remove` refuses it.
        &self.routers[&self.root]
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Router owning `route_key`.
    pub fn by_route_key(&self, route_key: &str) -> Option<&Router> {
        self.route_keys.get(route_key).and_then(|n| self.routers.get(n))
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// All routers, parents before children, children grouped by type.
    pub fn preorder(&self) -> Vec<&Router> {
        let mut out = Vec::with_capacity(self.routers.len());
        let mut stack = vec![self.root.as_str()];
        while let Some(name) = stack.pop() {
            let Some(router) = self.routers.get(name) else { continue };
            out.push(router);
            let children: Vec<&str> = router.child_names().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    // ── Relatives ─────────────────────────────────────────────────────────

    pub fn parent_of(&self, name: &str) -> Option<&Router> {
        self.routers
            .get(name)
            .and_then(Router::parent)
            .and_then(|p| self.routers.get(p))
    }

    /// Every other child of this router's parent, grouped by type.
    pub fn siblings(&self, name: &str) -> Vec<&Router> {
        let Some(parent) = self.parent_of(name) else {
            return Vec::new();
        };
        parent
            .child_names()
            .filter(|n| *n != name)
            .filter_map(|n| self.routers.get(n))
            .collect()
    }

    /// Siblings sharing this router's type.
    pub fn siblings_of_type(&self, name: &str) -> Vec<&Router> {
        let Some(router) = self.routers.get(name) else {
            return Vec::new();
        };
        let router_type = router.router_type();
        self.siblings(name)
            .into_iter()
            .filter(|s| s.router_type() == router_type)
            .collect()
    }

    // ── Derived properties ────────────────────────────────────────────────

    pub fn is_path_router(&self, name: &str) -> bool {
        let Some(router) = self.routers.get(name) else {
            return false;
        };
        let Some(parent) = router.parent() else {
            return true;
        };

        let router_type = router.router_type();
        let template = router_type.template_config();
        let explicit = router.config().is_path_router;
        let claims = explicit.unwrap_or(template.default_is_path_router);
        if !claims || !template.can_be_path_router || !self.is_path_router(parent) {
            return false;
        }
        if explicit.is_none() {
            // An implicit claim yields to an explicit one from another type.
            let outclaimed = self.siblings(name).iter().any(|s| {
                s.router_type() != router_type && s.config().is_path_router == Some(true)
            });
            if outclaimed {
                return false;
            }
        }
        true
    }

    /// Path segment index owned by this router; `None` for the root.
    pub fn path_location(&self, name: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut current = self.routers.get(name)?;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = self.routers.get(parent)?;
        }
        depth.checked_sub(1)
    }

    /// Caching setting: explicit on the router, else the nearest ancestor
    /// that set it, else `false`.
    pub fn caching_disabled(&self, name: &str) -> bool {
        let mut current = self.routers.get(name);
        while let Some(router) = current {
            if let Some(disabled) = router.config().disable_caching {
                return disabled;
            }
            current = router.parent().and_then(|p| self.routers.get(p));
        }
        false
    }

    /// Whether a parent activated by a child of this router's type still runs
    /// activation for this router.
    pub fn activates_siblings(&self, name: &str) -> bool {
        self.routers.get(name).is_some_and(|r| {
            r.config()
                .should_parent_try_to_activate_siblings
                .unwrap_or(r.router_type().template_config().should_parent_try_to_activate_siblings)
        })
    }
}
