//! Data routers: a free-form value in a path segment or query parameter.
//!
//! Showing needs a value.  It comes from the call's `data` option, else from
//! pending `path_data` for this router, else from the value already in the
//! location.  The pipeline validates this before the action runs, so the
//! `MissingData` error here only fires for callers that skip the pipeline.

use rp_core::{Location, LocationOptions, RouterCurrentState, RouterError, RouterResult};
use rp_tree::{Router, RouterTree};

use crate::template::{hide_visible_siblings, path_slot};
use crate::{ActionCtx, ActionHost};

fn current_value(location: &Location, router: &Router, tree: &RouterTree) -> Option<String> {
    let value = match path_slot(tree, router.name()) {
        Some(slot) => location.segment(slot).map(str::to_owned),
        None => location.search_value(router.route_key()).and_then(|v| v.as_text()),
    };
    value.filter(|v| !v.is_empty())
}

pub fn reduce(location: &Location, router: &Router, tree: &RouterTree) -> RouterCurrentState {
    match current_value(location, router, tree) {
        Some(data) => RouterCurrentState {
            visible: true,
            data: Some(data),
            ..RouterCurrentState::default()
        },
        None => RouterCurrentState::hidden(),
    }
}

/// Value a `show` on `name` would write, if one is available.  An empty
/// string does not count: it would leave the router hidden.
pub fn resolve_data(
    tree:     &RouterTree,
    name:     &str,
    options:  &LocationOptions,
    location: &Location,
    ctx:      &ActionCtx,
) -> Option<String> {
    options
        .data
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| ctx.path_data.get(name).filter(|v| !v.is_empty()).cloned())
        .or_else(|| tree.get(name).ok().and_then(|r| current_value(location, r, tree)))
}

pub fn show(
    host:     &mut dyn ActionHost,
    name:     &str,
    options:  &LocationOptions,
    location: Location,
    ctx:      &ActionCtx,
) -> RouterResult<Location> {
    let Some(data) = resolve_data(host.tree(), name, options, &location, ctx) else {
        return Err(RouterError::MissingData(name.to_owned()));
    };

    // Two data siblings cannot share one path segment.
    let mut location = match path_slot(host.tree(), name) {
        Some(_) => hide_visible_siblings(host, name, options, location, ctx)?,
        None => location,
    };

    let tree = host.tree();
    match path_slot(tree, name) {
        Some(slot) if location.segment(slot) == Some(data.as_str()) => {}
        Some(slot) => location.set_segment(slot, data),
        None => location.set_search(tree.get(name)?.route_key(), data),
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
    match path_slot(tree, name) {
        Some(slot) => location.truncate_path(slot),
        None => location.clear_search(tree.get(name)?.route_key()),
    }
    Ok(location)
}

/// Same as `show`: write the new value.
pub fn set_data(
    host:     &mut dyn ActionHost,
    name:     &str,
    options:  &LocationOptions,
    location: Location,
    ctx:      &ActionCtx,
) -> RouterResult<Location> {
    show(host, name, options, location, ctx)
}
