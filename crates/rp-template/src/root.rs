//! The root router: always visible, actions leave the location alone.

use rp_core::{Location, LocationOptions, RouterCurrentState, RouterResult};
use rp_tree::{Router, RouterTree};

use crate::{ActionCtx, ActionHost};

pub fn reduce(_location: &Location, _router: &Router, _tree: &RouterTree) -> RouterCurrentState {
    RouterCurrentState::visible()
}

pub fn show(
    _host:    &mut dyn ActionHost,
    _name:    &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    Ok(location)
}

pub fn hide(
    _host:    &mut dyn ActionHost,
    _name:    &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    Ok(location)
}
