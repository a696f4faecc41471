//! The static template table.

use std::collections::BTreeMap;

use rp_core::{
    Action, Location, LocationOptions, RouterCurrentState, RouterError, RouterResult, RouterType,
    TemplateConfig,
};
use rp_tree::{Router, RouterTree};
use tracing::trace;

use crate::{ActionCtx, ActionHost, CallDirection, data, feature, root, scene, stack};

/// Location → state for one router.
pub type Reducer = fn(&Location, &Router, &RouterTree) -> RouterCurrentState;

/// Location → location for one router.
pub type ActionFn = fn(
    &mut dyn ActionHost,
    &str,
    &LocationOptions,
    Location,
    &ActionCtx,
) -> RouterResult<Location>;

/// Behavior shared by every router of one type.
pub struct RouterTemplate {
    pub router_type: RouterType,
    pub reducer:     Reducer,
    pub actions:     &'static [(Action, ActionFn)],
}

impl RouterTemplate {
    #[inline]
    pub fn config(&self) -> TemplateConfig {
        self.router_type.template_config()
    }

    pub fn action(&self, action: Action) -> Option<ActionFn> {
        self.actions.iter().find(|(a, _)| *a == action).map(|(_, f)| *f)
    }

    pub fn supports(&self, action: Action) -> bool {
        self.action(action).is_some()
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

static ROOT: RouterTemplate = RouterTemplate {
    router_type: RouterType::Root,
    reducer:     root::reduce,
    actions:     &[(Action::Show, root::show), (Action::Hide, root::hide)],
};

static SCENE: RouterTemplate = RouterTemplate {
    router_type: RouterType::Scene,
    reducer:     scene::reduce,
    actions:     &[(Action::Show, scene::show), (Action::Hide, scene::hide)],
};

static STACK: RouterTemplate = RouterTemplate {
    router_type: RouterType::Stack,
    reducer:     stack::reduce,
    actions:     &[
        (Action::Show, stack::show),
        (Action::Hide, stack::hide),
        (Action::Forward, stack::forward),
        (Action::Backward, stack::backward),
        (Action::ToFront, stack::to_front),
        (Action::ToBack, stack::to_back),
    ],
};

static FEATURE: RouterTemplate = RouterTemplate {
    router_type: RouterType::Feature,
    reducer:     feature::reduce,
    actions:     &[(Action::Show, feature::show), (Action::Hide, feature::hide)],
};

static DATA: RouterTemplate = RouterTemplate {
    router_type: RouterType::Data,
    reducer:     data::reduce,
    actions:     &[
        (Action::Show, data::show),
        (Action::Hide, data::hide),
        (Action::SetData, data::set_data),
    ],
};

/// Template for `router_type`.
pub fn template(router_type: RouterType) -> &'static RouterTemplate {
    match router_type {
        RouterType::Root => &ROOT,
        RouterType::Scene => &SCENE,
        RouterType::Stack => &STACK,
        RouterType::Feature => &FEATURE,
        RouterType::Data => &DATA,
    }
}

// ── Helpers shared with the pipeline ─────────────────────────────────────────

/// Reduce one router against `location`.
pub fn reduce(tree: &RouterTree, name: &str, location: &Location) -> RouterResult<RouterCurrentState> {
    let router = tree.get(name)?;
    Ok((template(router.router_type()).reducer)(location, router, tree))
}

/// Whether `name` is visible in `location`.  Unknown routers are not.
pub fn is_visible(tree: &RouterTree, name: &str, location: &Location) -> bool {
    reduce(tree, name, location).is_ok_and(|s| s.visible)
}

/// Reduce every router in the tree against `location`.
pub fn reduce_tree(tree: &RouterTree, location: &Location) -> BTreeMap<String, RouterCurrentState> {
    tree.preorder()
        .into_iter()
        .map(|router| {
            let state = (template(router.router_type()).reducer)(location, router, tree);
            (router.name().to_owned(), state)
        })
        .collect()
}

/// Look up and run `action` on `name`'s template.
///
/// # Errors
///
/// `UnknownRouter`, `UnsupportedAction`, or whatever the action returns.
pub fn run_action(
    host:     &mut dyn ActionHost,
    name:     &str,
    action:   Action,
    options:  &LocationOptions,
    location: Location,
    ctx:      &ActionCtx,
) -> RouterResult<Location> {
    let router_type = host.tree().get(name)?.router_type();
    let Some(f) = template(router_type).action(action) else {
        return Err(RouterError::UnsupportedAction {
            router: name.to_owned(),
            router_type,
            action,
        });
    };
    f(host, name, options, location, ctx)
}

/// Path segment index for `name` if it is a path router.
pub(crate) fn path_slot(tree: &RouterTree, name: &str) -> Option<usize> {
    if tree.is_path_router(name) {
        tree.path_location(name)
    } else {
        None
    }
}

/// Same-type siblings a reveal of `name` replaces: every sibling of a scene,
/// and the sibling data routers sharing a data router's path segment.  Empty
/// for every other router.
pub fn replaced_siblings(tree: &RouterTree, name: &str) -> Vec<String> {
    let exclusive = match tree.get(name).map(Router::router_type) {
        Ok(RouterType::Scene) => true,
        Ok(RouterType::Data) => path_slot(tree, name).is_some(),
        _ => false,
    };
    if !exclusive {
        return Vec::new();
    }
    tree.siblings_of_type(name)
        .into_iter()
        .map(|s| s.name().to_owned())
        .collect()
}

/// Hide every visible same-type sibling of `name` with caching disabled.
pub(crate) fn hide_visible_siblings(
    host:         &mut dyn ActionHost,
    name:         &str,
    options:      &LocationOptions,
    mut location: Location,
    ctx:          &ActionCtx,
) -> RouterResult<Location> {
    let tree = host.tree();
    let visible: Vec<String> = tree
        .siblings_of_type(name)
        .into_iter()
        .filter(|s| is_visible(tree, s.name(), &location))
        .map(|s| s.name().to_owned())
        .collect();

    let hide_ctx = ctx.nested(Action::Hide, CallDirection::Lateral).without_caching();
    for sibling in visible {
        trace!(router = name, sibling = %sibling, "hiding sibling");
        location = host.call(&sibling, Action::Hide, options, location, &hide_ctx)?;
    }
    Ok(location)
}
