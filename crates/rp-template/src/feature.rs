//! Feature routers: an independent boolean query flag.

use rp_core::{Location, LocationOptions, RouterCurrentState, RouterResult};
use rp_tree::{Router, RouterTree};

use crate::{ActionCtx, ActionHost};

pub fn reduce(location: &Location, router: &Router, _tree: &RouterTree) -> RouterCurrentState {
    let visible = location.search_value(router.route_key()).is_some_and(|v| v.as_bool());
    RouterCurrentState { visible, ..RouterCurrentState::default() }
}

pub fn show(
    host:         &mut dyn ActionHost,
    name:         &str,
    _options:     &LocationOptions,
    mut location: Location,
    _ctx:         &ActionCtx,
) -> RouterResult<Location> {
    location.set_search(host.tree().get(name)?.route_key(), true);
    Ok(location)
}

pub fn hide(
    host:         &mut dyn ActionHost,
    name:         &str,
    _options:     &LocationOptions,
    mut location: Location,
    _ctx:         &ActionCtx,
) -> RouterResult<Location> {
    location.clear_search(host.tree().get(name)?.route_key());
    Ok(location)
}
