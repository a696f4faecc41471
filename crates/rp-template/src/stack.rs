//! Stack routers: z-ordered siblings.
//!
//! Each visible stack carries its order as a numeric query value under its
//! route key, `1` being the front.  Every reordering reads the orders of all
//! sibling stacks (the acting router included), splices the acting router
//! into its new position and renumbers densely from 1.

use rp_core::{Location, LocationOptions, RouterCurrentState, RouterResult, RouterType, SearchValue};
use rp_tree::{Router, RouterTree};

use crate::{ActionCtx, ActionHost};

/// Where the acting router goes in the order list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Placement {
    Front,
    Forward,
    Backward,
    Back,
    Remove,
}

fn order_of(location: &Location, route_key: &str) -> Option<i64> {
    location
        .search_value(route_key)
        .and_then(SearchValue::as_number)
        .filter(|n| *n > 0)
}

pub fn reduce(location: &Location, router: &Router, _tree: &RouterTree) -> RouterCurrentState {
    match order_of(location, router.route_key()) {
        Some(order) => RouterCurrentState {
            visible: true,
            order: u32::try_from(order).ok(),
            ..RouterCurrentState::default()
        },
        None => RouterCurrentState::hidden(),
    }
}

fn reposition(
    tree:         &RouterTree,
    name:         &str,
    placement:    Placement,
    mut location: Location,
) -> RouterResult<Location> {
    let router = tree.get(name)?;
    let stacks: Vec<&Router> = match tree.parent_of(name) {
        Some(parent) => parent
            .children_of(RouterType::Stack)
            .iter()
            .filter_map(|n| tree.get(n).ok())
            .collect(),
        None => vec![router],
    };

    // Stable sort: equal orders keep declaration order.
    let mut ordered: Vec<(i64, &Router)> = stacks
        .iter()
        .filter_map(|s| order_of(&location, s.route_key()).map(|o| (o, *s)))
        .collect();
    ordered.sort_by_key(|(o, _)| *o);
    let mut ordered: Vec<&Router> = ordered.into_iter().map(|(_, s)| s).collect();

    let index = ordered.iter().position(|s| s.name() == name);
    if let Some(i) = index {
        ordered.remove(i);
    }
    match (placement, index) {
        (Placement::Front, _) | (Placement::Forward, None) => ordered.insert(0, router),
        (Placement::Forward, Some(i)) => ordered.insert(i.saturating_sub(1), router),
        (Placement::Backward, Some(i)) => ordered.insert((i + 1).min(ordered.len()), router),
        (Placement::Back, _) | (Placement::Backward, None) => ordered.push(router),
        (Placement::Remove, _) => location.clear_search(router.route_key()),
    }

    for (rank, stack) in (1i64..).zip(&ordered) {
        location.set_search(stack.route_key(), rank);
    }
    Ok(location)
}

// ── Actions ───────────────────────────────────────────────────────────────────

pub fn show(
    host:     &mut dyn ActionHost,
    name:     &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    reposition(host.tree(), name, Placement::Front, location)
}

pub fn hide(
    host:     &mut dyn ActionHost,
    name:     &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    reposition(host.tree(), name, Placement::Remove, location)
}

/// One step toward the front.
pub fn forward(
    host:     &mut dyn ActionHost,
    name:     &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    reposition(host.tree(), name, Placement::Forward, location)
}

/// One step toward the back.
pub fn backward(
    host:     &mut dyn ActionHost,
    name:     &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    reposition(host.tree(), name, Placement::Backward, location)
}

pub fn to_front(
    host:     &mut dyn ActionHost,
    name:     &str,
    options:  &LocationOptions,
    location: Location,
    ctx:      &ActionCtx,
) -> RouterResult<Location> {
    show(host, name, options, location, ctx)
}

pub fn to_back(
    host:     &mut dyn ActionHost,
    name:     &str,
    _options: &LocationOptions,
    location: Location,
    _ctx:     &ActionCtx,
) -> RouterResult<Location> {
    reposition(host.tree(), name, Placement::Back, location)
}
