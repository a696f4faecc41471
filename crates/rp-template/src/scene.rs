//! Scene routers: at most one visible among same-type siblings.
//!
//! A path scene is visible when the segment at its `path_location` equals its
//! route key.  A scene below a non-path parent uses a boolean query flag.

use rp_core::{Location, LocationOptions, RouterCurrentState, RouterResult};
use rp_tree::{Router, RouterTree};

use crate::template::{hide_visible_siblings, path_slot};
use crate::{ActionCtx, ActionHost};

pub fn reduce(location: &Location, router: &Router, tree: &RouterTree) -> RouterCurrentState {
    let visible = match path_slot(tree, router.name()) {
        Some(slot) => location.segment(slot) == Some(router.route_key()),
        None => location.search_value(router.route_key()).is_some_and(|v| v.as_bool()),
    };
    RouterCurrentState { visible, ..RouterCurrentState::default() }
}

pub fn show(
    host:     &mut dyn ActionHost,
    name:     &str,
    options:  &LocationOptions,
    location: Location,
    ctx:      &ActionCtx,
) -> RouterResult<Location> {
    let mut location = hide_visible_siblings(host, name, options, location, ctx)?;

    let tree = host.tree();
    let route_key = tree.get(name)?.route_key();
    match path_slot(tree, name) {
        // Already ours: keep the visible descendants below it.
        Some(slot) if location.segment(slot) == Some(route_key) => {}
        Some(slot) => location.set_segment(slot, route_key),
        None => location.set_search(route_key, true),
    }
    Ok(location)
}

pub fn hide(
    host:         &mut dyn ActionHost,
    name:         &str,
    _options:     &LocationOptions,
    mut location: Location,
    _ctx:         &ActionCtx,
) -> RouterResult<Location> {
    let tree = host.tree();
    let route_key = tree.get(name)?.route_key();
    match path_slot(tree, name) {
        // Another scene may own the segment by now; leave it alone then.
        Some(slot) if location.segment(slot) == Some(route_key) => location.truncate_path(slot),
        Some(_) => {}
        None => location.clear_search(route_key),
    }
    Ok(location)
}
