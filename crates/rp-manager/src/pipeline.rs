//! The action execution pipeline.
//!
//! A call is a fold of an explicit step list over `(Location, ActionCtx)`.
//! A top-level ("direct") call runs [`DIRECT_STEPS`]; every call the cascade
//! makes on a neighbor ("indirect") runs [`INDIRECT_STEPS`] with the location
//! threaded through from its caller.
//!
//! ```text
//! direct:    open_transaction → fetch_location → apply_replace_location
//!            → bind_path_data → show_parent → hide_children → validate_data
//!            → run_action → forget_superseded_cache → cache_hidden_router
//!            → show_children → merge_options → close_transaction
//!            → write_location → count_action
//! indirect:  bind_path_data → show_parent → hide_children → validate_data
//!            → run_action → forget_superseded_cache → show_children
//! ```
//!
//! Any error discards the open cache transaction before it propagates, so a
//! failed call leaves the cache and both stores as they were.

use rp_core::{
    Action, CacheEntry, Location, LocationOptions, RouterError, RouterResult, RouterType,
    SearchValue,
};
use rp_store::{RouterCache, RouterStateStore};
use rp_template::{
    ActionCtx, ActionHost, CallDirection, data, is_visible, reduce, reduce_tree, replaced_siblings,
    run_action,
};
use rp_tree::RouterTree;
use tracing::{debug, trace, warn};

use crate::{ManagerConfig, SerializedStore};

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Mutable view of a manager for the duration of one call.
pub(crate) struct Dispatch<'m> {
    pub(crate) tree:           &'m RouterTree,
    pub(crate) cache:          &'m mut RouterCache,
    pub(crate) states:         &'m mut RouterStateStore,
    pub(crate) store:          &'m mut dyn SerializedStore,
    pub(crate) action_count:   &'m mut u64,
    pub(crate) config:         &'m ManagerConfig,
    /// Last embedded cache string restored, so an unchanged one carried
    /// forward by the store is not restored over newer entries.
    pub(crate) embedded_cache: &'m mut Option<String>,
}

/// The router a pipeline run acts on.
pub(crate) struct CallFrame {
    router:      String,
    action:      Action,
    options:     LocationOptions,
    /// Visibility before this call touched anything.
    was_visible: bool,
    /// Data before this call touched anything.
    was_data:    Option<String>,
    /// Set when validation turns the action into a no-op.
    skip_action: bool,
}

impl CallFrame {
    fn new(router: &str, action: Action, options: LocationOptions) -> Self {
        Self {
            router: router.to_owned(),
            action,
            options,
            was_visible: false,
            was_data:    None,
            skip_action: false,
        }
    }
}

type StepResult = RouterResult<(Location, ActionCtx)>;

type Step = fn(&mut Dispatch<'_>, &mut CallFrame, Location, ActionCtx) -> StepResult;

const DIRECT_STEPS: &[(&str, Step)] = &[
    ("open_transaction", open_transaction),
    ("fetch_location", fetch_location),
    ("apply_replace_location", apply_replace_location),
    ("bind_path_data", bind_path_data),
    ("show_parent", show_parent),
    ("hide_children", hide_children),
    ("validate_data", validate_data),
    ("run_action", run_template_action),
    ("forget_superseded_cache", forget_superseded_cache),
    ("cache_hidden_router", cache_hidden_router),
    ("show_children", show_children),
    ("merge_options", merge_options),
    ("close_transaction", close_transaction),
    ("write_location", write_location),
    ("count_action", count_action),
];

const INDIRECT_STEPS: &[(&str, Step)] = &[
    ("bind_path_data", bind_path_data),
    ("show_parent", show_parent),
    ("hide_children", hide_children),
    ("validate_data", validate_data),
    ("run_action", run_template_action),
    ("forget_superseded_cache", forget_superseded_cache),
    ("show_children", show_children),
];

impl Dispatch<'_> {
    /// Run a top-level call.  Returns the resulting location and the final
    /// context.
    pub(crate) fn call_direct(
        &mut self,
        router:  &str,
        action:  Action,
        options: LocationOptions,
    ) -> StepResult {
        self.tree.get(router)?;
        debug!(router, %action, dry_run = options.dry_run, "action");

        let ctx = ActionCtx::from_options(action, &options);
        let mut frame = CallFrame::new(router, action, options);
        self.fold(DIRECT_STEPS, &mut frame, Location::new(), ctx)
            .inspect_err(|e| {
                debug!(router, %action, error = %e, "action failed");
                self.cache.discard_transaction();
            })
    }

    /// Run a cascaded call on a neighbor.
    fn call_indirect(
        &mut self,
        router:   &str,
        action:   Action,
        options:  LocationOptions,
        location: Location,
        ctx:      ActionCtx,
    ) -> StepResult {
        trace!(router, %action, direction = ?ctx.call_direction, "indirect call");
        let mut frame = CallFrame::new(router, action, options);
        self.fold(INDIRECT_STEPS, &mut frame, location, ctx)
    }

    fn fold(
        &mut self,
        steps:        &[(&str, Step)],
        frame:        &mut CallFrame,
        mut location: Location,
        mut ctx:      ActionCtx,
    ) -> StepResult {
        for (name, step) in steps {
            trace!(router = %frame.router, step = name, "step");
            (location, ctx) = step(self, frame, location, ctx)?;
        }
        Ok((location, ctx))
    }

    fn caching_enabled(&self, router: &str, ctx: &ActionCtx) -> bool {
        !ctx.disable_caching && !self.tree.caching_disabled(router)
    }

    // ── State rebuild ─────────────────────────────────────────────────────

    /// Reduce every router against the store's location and publish the
    /// result.  Changed states are stamped with `stamp`; unchanged ones keep
    /// their previous stamp.  Returns the changed names.
    pub(crate) fn sync_states(&mut self, stamp: u64) -> RouterResult<Vec<String>> {
        let location = self.store.get_state();
        self.restore_embedded_cache(&location)?;

        let mut reduced = reduce_tree(self.tree, &location);
        for (name, state) in reduced.iter_mut() {
            state.action_count = match self.states.current(name) {
                Some(previous) if previous.same_as(state) => previous.action_count,
                _ => Some(stamp),
            };
        }
        let changed = self.states.set_state(reduced);
        debug!(?changed, stamp, "router state rebuilt");
        Ok(changed)
    }

    fn restore_embedded_cache(&mut self, location: &Location) -> RouterResult<()> {
        let embedded = location
            .search_value(&self.config.cache_search_key)
            .and_then(SearchValue::as_text);
        match embedded {
            Some(json) if self.embedded_cache.as_deref() != Some(json.as_str()) => {
                self.cache.restore_serialized(&json)?;
                trace!(bytes = json.len(), "cache restored from location");
                *self.embedded_cache = Some(json);
            }
            Some(_) => {}
            None => *self.embedded_cache = None,
        }
        Ok(())
    }
}

impl ActionHost for Dispatch<'_> {
    fn tree(&self) -> &RouterTree {
        self.tree
    }

    fn call(
        &mut self,
        router:   &str,
        action:   Action,
        options:  &LocationOptions,
        location: Location,
        ctx:      &ActionCtx,
    ) -> RouterResult<Location> {
        self.call_indirect(router, action, options.clone(), location, ctx.clone())
            .map(|(location, _)| location)
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

fn open_transaction(d: &mut Dispatch<'_>, _: &mut CallFrame, location: Location, ctx: ActionCtx) -> StepResult {
    d.cache.start_transaction();
    Ok((location, ctx))
}

fn fetch_location(d: &mut Dispatch<'_>, _: &mut CallFrame, _: Location, ctx: ActionCtx) -> StepResult {
    Ok((d.store.get_state(), ctx))
}

fn apply_replace_location(
    _:            &mut Dispatch<'_>,
    frame:        &mut CallFrame,
    mut location: Location,
    ctx:          ActionCtx,
) -> StepResult {
    location.options.replace_location = frame.options.replace_location;
    Ok((location, ctx))
}

/// Record the router's starting state and bind its pending data.
fn bind_path_data(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    mut ctx:  ActionCtx,
) -> StepResult {
    let state = reduce(d.tree, &frame.router, &location)?;
    frame.was_visible = state.visible;
    frame.was_data = state.data;

    for (router, data) in &frame.options.path_data {
        ctx.path_data.insert(router.clone(), data.clone());
    }
    if let Some(data) = &frame.options.data {
        ctx.path_data.insert(frame.router.clone(), data.clone());
    } else if d.cache.was_visible(&frame.router).is_none() {
        let default = d.tree.get(&frame.router)?.default_action();
        if let Some(default) = default.filter(|a| a.action == frame.action) {
            if let Some(data) = &default.data {
                ctx.path_data.entry(frame.router.clone()).or_insert_with(|| data.clone());
            }
        }
    }
    Ok((location, ctx))
}

fn show_parent(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    mut ctx:  ActionCtx,
) -> StepResult {
    if !frame.action.reveals()
        || ctx.came_from(CallDirection::Down)
        || ctx.came_from(CallDirection::Lateral)
    {
        return Ok((location, ctx));
    }

    let tree = d.tree;
    let router = tree.get(&frame.router)?;
    let Some(parent) = router.parent() else {
        return Ok((location, ctx));
    };
    if is_visible(tree, parent, &location) {
        return Ok((location, ctx));
    }

    let options = LocationOptions { data: None, ..frame.options.clone() };
    let parent_ctx = ctx
        .nested(Action::Show, CallDirection::Up)
        .activated_by(router.router_type());
    let (location, parent_ctx) = d.call_indirect(parent, Action::Show, options, location, parent_ctx)?;
    ctx.absorb(parent_ctx);
    Ok((location, ctx))
}

/// On `hide`: hide visible children (children before parents), then cache
/// this router as it stands.
fn hide_children(
    d:            &mut Dispatch<'_>,
    frame:        &mut CallFrame,
    mut location: Location,
    mut ctx:      ActionCtx,
) -> StepResult {
    if frame.action != Action::Hide {
        return Ok((location, ctx));
    }

    let tree = d.tree;
    let router = tree.get(&frame.router)?;
    for child in router.child_names() {
        if !is_visible(tree, child, &location) {
            continue;
        }
        let child_ctx = ctx.nested(Action::Hide, CallDirection::Down);
        let (next, child_ctx) =
            d.call_indirect(child, Action::Hide, frame.options.clone(), location, child_ctx)?;
        location = next;
        ctx.absorb(child_ctx);
    }

    if frame.was_visible
        && d.caching_enabled(&frame.router, &ctx)
        && d.cache.was_visible(&frame.router) != Some(false)
    {
        let state = reduce(tree, &frame.router, &location)?;
        trace!(router = %frame.router, visible = state.visible, "caching");
        d.cache.set_cache(&frame.router, CacheEntry::new(state.visible, state.data));
    }
    Ok((location, ctx))
}

/// A data router being revealed must have data from somewhere.
fn validate_data(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    mut ctx:  ActionCtx,
) -> StepResult {
    if !frame.action.reveals() || d.tree.get(&frame.router)?.router_type() != RouterType::Data {
        return Ok((location, ctx));
    }
    if data::resolve_data(d.tree, &frame.router, &frame.options, &location, &ctx).is_some() {
        return Ok((location, ctx));
    }

    if ctx.dry_run {
        frame.skip_action = true;
    } else if !d.config.error_when_missing_data {
        warn!(router = %frame.router, "showing data router without data; skipped");
        ctx.routers_missing_data.push(frame.router.clone());
        frame.skip_action = true;
    } else {
        return Err(RouterError::MissingData(frame.router.clone()));
    }
    Ok((location, ctx))
}

fn run_template_action(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    ctx:      ActionCtx,
) -> StepResult {
    if frame.skip_action {
        return Ok((location, ctx));
    }
    let action_ctx = match ctx.call_direction {
        Some(_) => ctx.clone(),
        None => ActionCtx { call_direction: Some(CallDirection::Lateral), ..ctx.clone() },
    };
    let location = run_action(d, &frame.router, frame.action, &frame.options, location, &action_ctx)?;
    Ok((location, ctx))
}

/// A reveal that ran settles the router's own entry and those of the
/// siblings it replaced; none of them may be replayed later.
fn forget_superseded_cache(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    ctx:      ActionCtx,
) -> StepResult {
    if !frame.action.reveals() || frame.skip_action {
        return Ok((location, ctx));
    }
    d.cache.remove_cache(&frame.router);
    for sibling in replaced_siblings(d.tree, &frame.router) {
        d.cache.remove_cache(&sibling);
    }
    Ok((location, ctx))
}

/// A direct `hide` of a visible router remembers it as hidden on purpose.
fn cache_hidden_router(
    d:        &mut Dispatch<'_>,
    frame:    &mut CallFrame,
    location: Location,
    ctx:      ActionCtx,
) -> StepResult {
    if frame.action == Action::Hide && frame.was_visible && d.caching_enabled(&frame.router, &ctx) {
        d.cache.set_cache(&frame.router, CacheEntry::new(false, frame.was_data.clone()));
    }
    Ok((location, ctx))
}

/// On a reveal of a previously hidden router: rehydrate cached children and
/// apply default actions to untouched ones.
fn show_children(
    d:            &mut Dispatch<'_>,
    frame:        &mut CallFrame,
    mut location: Location,
    mut ctx:      ActionCtx,
) -> StepResult {
    if !frame.action.reveals() || frame.was_visible || frame.skip_action {
        return Ok((location, ctx));
    }

    let tree = d.tree;
    let router = tree.get(&frame.router)?;
    for (&child_type, names) in router.children() {
        for child in names {
            if ctx.activated_by_child_type == Some(child_type) && !tree.activates_siblings(child) {
                // The child that called up decides among these; a sibling
                // cached as visible is stale.
                if d.cache.was_visible(child) == Some(true) {
                    d.cache.remove_cache(child);
                }
                continue;
            }
            let child_router = tree.get(child)?;
            if ctx.came_from(CallDirection::Down) && !child_router.config().should_inversely_activate {
                continue;
            }
            if is_visible(tree, child, &location) {
                continue;
            }

            let (action, data) = match d.cache.was_visible(child) {
                Some(true) => {
                    let data = d.cache.previous_data(child);
                    d.cache.remove_cache(child);
                    (Action::Show, data)
                }
                Some(false) => continue,
                None => match child_router.default_action() {
                    Some(default) => (default.action, default.data.clone()),
                    None => continue,
                },
            };

            trace!(router = %frame.router, child = %child, %action, "activating child");
            let options = LocationOptions { data, ..LocationOptions::default() };
            let child_ctx = ctx.nested(action, CallDirection::Down);
            let (next, child_ctx) = d.call_indirect(child, action, options, location, child_ctx)?;
            location = next;
            ctx.absorb(child_ctx);
        }
    }
    Ok((location, ctx))
}

/// Fold the caller's options into the location, embedding the cache when
/// asked to and dropping a stale embedded one otherwise.
fn merge_options(
    d:            &mut Dispatch<'_>,
    frame:        &mut CallFrame,
    mut location: Location,
    ctx:          ActionCtx,
) -> StepResult {
    location.options.merge(&frame.options);

    let key = d.config.cache_search_key.as_str();
    if location.options.add_cache_to_location {
        location.set_search(key, d.cache.serialized_cache());
    } else if location.search_value(key).is_some() {
        location.clear_search(key);
    }
    Ok((location, ctx))
}

fn close_transaction(d: &mut Dispatch<'_>, _: &mut CallFrame, location: Location, ctx: ActionCtx) -> StepResult {
    if ctx.dry_run {
        d.cache.discard_transaction();
    } else {
        d.cache.save_transaction();
    }
    Ok((location, ctx))
}

fn write_location(d: &mut Dispatch<'_>, _: &mut CallFrame, location: Location, ctx: ActionCtx) -> StepResult {
    if !ctx.dry_run {
        d.store.set_state(location.clone());
        let stamp = *d.action_count + 1;
        d.sync_states(stamp)?;
    }
    Ok((location, ctx))
}

fn count_action(d: &mut Dispatch<'_>, _: &mut CallFrame, location: Location, ctx: ActionCtx) -> StepResult {
    if !ctx.dry_run {
        *d.action_count += 1;
    }
    Ok((location, ctx))
}
