//! Unit tests for rp-manager.

use std::cell::RefCell;
use std::rc::Rc;

use rp_core::{
    Action, DefaultAction, LocationOptions, RouterDeclaration, RouterError, RouterType,
};

use crate::{
    Manager, ManagerBuilder, ManagerConfig, MemoryStore, MemoryStoreConfig, SerializedStore,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn decl(name: &str) -> RouterDeclaration {
    RouterDeclaration::new(name)
}

fn opts() -> LocationOptions {
    LocationOptions::new()
}

/// root → scene[user → scene[events, details], info]
fn user_manager() -> Manager {
    let root = decl("root")
        .child(
            RouterType::Scene,
            decl("user")
                .child(RouterType::Scene, decl("events"))
                .child(RouterType::Scene, decl("details")),
        )
        .child(RouterType::Scene, decl("info"));
    ManagerBuilder::new(root).build().unwrap()
}

/// root → scene[gp → scene[p → scene[a, b]], other]
fn nested_manager() -> Manager {
    let root = decl("root")
        .child(
            RouterType::Scene,
            decl("gp").child(
                RouterType::Scene,
                decl("p")
                    .child(RouterType::Scene, decl("a"))
                    .child(RouterType::Scene, decl("b")),
            ),
        )
        .child(RouterType::Scene, decl("other"));
    ManagerBuilder::new(root).build().unwrap()
}

fn visible(manager: &Manager, name: &str) -> bool {
    manager.current(name).is_some_and(|s| s.visible)
}

fn show(manager: &mut Manager, name: &str) {
    manager.router(name).unwrap().show(opts()).unwrap();
}

fn hide(manager: &mut Manager, name: &str) {
    manager.router(name).unwrap().hide(opts()).unwrap();
}

/// Number of notifications `name` has produced, including the initial one.
fn notifications(manager: &mut Manager, name: &str) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    manager.subscribe(name, move |_| *sink.borrow_mut() += 1).unwrap();
    count
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod memory_store {
    use super::*;
    use rp_core::Location;

    #[test]
    fn starts_at_initial_url() {
        let store = MemoryStore::from_url("/a/b?x=1").unwrap();
        assert_eq!(store.current_url(), "/a/b?x=1");
        assert_eq!(store.get_state().pathname, vec!["a", "b"]);
        assert!(MemoryStore::from_url("/%FF").is_err());
    }

    #[test]
    fn set_state_merges_search() {
        let mut store = MemoryStore::from_url("/?keep=1&drop=2").unwrap();
        let mut location = Location::from_segments(["a"]);
        location.clear_search("drop");
        location.set_search("new", true);
        store.set_state(location);
        assert_eq!(store.current_url(), "/a?keep=1&new=true");
        assert_eq!(store.history_len(), 2);
    }

    #[test]
    fn replace_keeps_history_length() {
        let mut store = MemoryStore::new();
        let mut location = Location::from_segments(["a"]);
        location.options.replace_location = true;
        store.set_state(location);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.current_url(), "/a");
    }

    #[test]
    fn back_forward_go_clamp() {
        let mut store = MemoryStore::new();
        for seg in ["a", "b", "c"] {
            store.set_state(Location::from_segments([seg]));
        }
        store.back();
        assert_eq!(store.current_url(), "/b");
        store.go(-10);
        assert_eq!(store.current_url(), "/");
        store.forward();
        store.go(10);
        assert_eq!(store.current_url(), "/c");
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut store = MemoryStore::new();
        store.set_state(Location::from_segments(["a"]));
        store.set_state(Location::from_segments(["b"]));
        store.back();
        store.set_state(Location::from_segments(["c"]));
        assert_eq!(store.history_len(), 3);
        store.forward();
        assert_eq!(store.current_url(), "/c");
    }

    #[test]
    fn history_is_capped() {
        let mut store = MemoryStore::with_config(MemoryStoreConfig {
            history_size: 2,
            ..MemoryStoreConfig::default()
        })
        .unwrap();
        for seg in ["a", "b", "c"] {
            store.set_state(Location::from_segments([seg]));
        }
        assert_eq!(store.history_len(), 2);
        store.back();
        assert_eq!(store.current_url(), "/b");
    }

    #[test]
    fn listeners_see_writes_until_unsubscribed() {
        let mut store = MemoryStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(Box::new(move |l: &Location| sink.borrow_mut().push(l.pathname.clone())));
        store.set_state(Location::from_segments(["a"]));
        store.unsubscribe(id);
        store.set_state(Location::from_segments(["b"]));
        assert_eq!(*seen.borrow(), vec![vec!["a".to_string()]]);
    }
}

// ── Config and construction ───────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn config_defaults_and_json() {
        let config = ManagerConfig::default();
        assert_eq!(config.history_size, 2);
        assert!(config.error_when_missing_data);
        assert_eq!(config.cache_search_key, "__cache");

        let parsed = ManagerConfig::from_json(r#"{"errorWhenMissingData": false}"#).unwrap();
        assert!(!parsed.error_when_missing_data);
        assert_eq!(parsed.history_size, 2);
        assert!(ManagerConfig::from_json("[").is_err());
    }

    #[test]
    fn every_router_is_wired_at_build() {
        let manager = user_manager();
        for name in ["root", "user", "events", "details", "info"] {
            assert!(manager.state(name).is_ok(), "{name} not wired");
        }
        assert!(visible(&manager, "root"));
        assert!(!visible(&manager, "user"));
        assert!(matches!(manager.state("ghost"), Err(RouterError::StateNotWired(_))));
    }

    #[test]
    fn initial_location_is_reduced() {
        let root = decl("root").child(RouterType::Scene, decl("user"));
        let manager = ManagerBuilder::new(root)
            .store(MemoryStore::from_url("/user").unwrap())
            .build()
            .unwrap();
        assert!(visible(&manager, "user"));
    }

    #[test]
    fn invalid_tree_fails_build() {
        let root = decl("root")
            .child(RouterType::Scene, decl("a"))
            .child(RouterType::Stack, decl("a"));
        assert!(matches!(ManagerBuilder::new(root).build(), Err(RouterError::DuplicateName(_))));
    }

    #[test]
    fn builds_from_json() {
        let json = r#"{
            "name": "root",
            "routers": {
                "scene": [{ "name": "user", "defaultAction": ["show"] }],
                "feature": [{ "name": "help", "routeKey": "h" }]
            }
        }"#;
        let mut manager = ManagerBuilder::new(RouterDeclaration::from_json(json).unwrap())
            .build()
            .unwrap();
        show(&mut manager, "help");
        assert_eq!(manager.url(), "/?h=true");
    }

    #[test]
    fn unknown_router_is_rejected() {
        let mut manager = user_manager();
        assert!(matches!(manager.router("ghost"), Err(RouterError::UnknownRouter(_))));
        assert!(manager.call("ghost", Action::Show, opts()).is_err());
        assert_eq!(manager.action_count(), 0);
    }
}

// ── Scenario: user / events / details / info ──────────────────────────────────

#[cfg(test)]
mod scenes {
    use super::*;

    #[test]
    fn showing_a_child_reveals_its_parent() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        assert_eq!(manager.url(), "/user/events");
        assert!(visible(&manager, "user"));
        assert!(visible(&manager, "events"));
        assert!(!visible(&manager, "details"));
    }

    #[test]
    fn siblings_are_exclusive() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        show(&mut manager, "details");
        assert_eq!(manager.url(), "/user/details");
        assert!(!visible(&manager, "events"));

        show(&mut manager, "info");
        assert_eq!(manager.url(), "/info");
        assert!(!visible(&manager, "user"));
        assert!(!visible(&manager, "details"));
    }

    #[test]
    fn replaced_sibling_is_not_resurrected() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        show(&mut manager, "details");
        hide(&mut manager, "user");
        assert_eq!(manager.url(), "/");

        show(&mut manager, "user");
        assert_eq!(manager.url(), "/user/details");
        assert!(!visible(&manager, "events"));
    }

    #[test]
    fn sibling_chosen_through_hidden_parents_is_not_resurrected() {
        let mut manager = nested_manager();
        show(&mut manager, "b");
        hide(&mut manager, "gp");
        assert_eq!(manager.cache().was_visible("b"), Some(true));

        show(&mut manager, "a");
        assert_eq!(manager.url(), "/gp/p/a");
        assert_eq!(manager.cache().was_visible("b"), None);

        hide(&mut manager, "gp");
        show(&mut manager, "gp");
        assert_eq!(manager.url(), "/gp/p/a");
        assert!(!visible(&manager, "b"));
    }

    #[test]
    fn reshown_router_is_cached_again() {
        let mut manager = nested_manager();
        show(&mut manager, "a");
        hide(&mut manager, "p");
        assert_eq!(manager.cache().was_visible("p"), Some(false));

        show(&mut manager, "a");
        assert_eq!(manager.url(), "/gp/p/a");
        assert_eq!(manager.cache().was_visible("p"), None);

        hide(&mut manager, "gp");
        show(&mut manager, "gp");
        assert_eq!(manager.url(), "/gp/p/a");
    }

    #[test]
    fn hiding_parent_caches_children() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        hide(&mut manager, "user");
        assert_eq!(manager.cache().was_visible("events"), Some(true));
        assert_eq!(manager.cache().was_visible("user"), Some(false));
        assert!(!visible(&manager, "events"));

        show(&mut manager, "user");
        assert!(visible(&manager, "events"));
        assert_eq!(manager.cache().was_visible("events"), None, "entry consumed");
    }

    #[test]
    fn directly_hidden_child_stays_hidden() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        hide(&mut manager, "events");
        assert_eq!(manager.cache().was_visible("events"), Some(false));
        assert_eq!(manager.url(), "/user");

        hide(&mut manager, "user");
        show(&mut manager, "user");
        assert!(!visible(&manager, "events"));
    }

    #[test]
    fn show_is_idempotent() {
        let mut manager = user_manager();
        let user = notifications(&mut manager, "user");
        show(&mut manager, "user");
        show(&mut manager, "user");
        assert_eq!(*user.borrow(), 2);
    }

    #[test]
    fn showing_visible_parent_keeps_children() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        show(&mut manager, "user");
        assert_eq!(manager.url(), "/user/events");
    }

    #[test]
    fn replace_location_does_not_grow_history() {
        let mut manager = user_manager();
        show(&mut manager, "user");
        assert_eq!(manager.store().history_len(), 2);
        manager.router("info").unwrap().show(opts().replace()).unwrap();
        assert_eq!(manager.store().history_len(), 2);
        assert_eq!(manager.url(), "/info");
    }

    #[test]
    fn replacing_hide_does_not_grow_history() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        assert_eq!(manager.store().history_len(), 2);
        manager.router("events").unwrap().hide(opts().replace()).unwrap();
        assert_eq!(manager.store().history_len(), 2);
        assert_eq!(manager.url(), "/user");
    }

    #[test]
    fn state_history_is_kept() {
        let mut manager = user_manager();
        show(&mut manager, "user");
        hide(&mut manager, "user");
        let history = manager.router("user").unwrap().history().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].visible);
        assert!(!history[1].visible);
    }
}

// ── Caching inheritance ───────────────────────────────────────────────────────

#[cfg(test)]
mod caching {
    use super::*;

    fn levels() -> Manager {
        let root = decl("root").child(
            RouterType::Scene,
            decl("level1").disable_caching(true).child(
                RouterType::Scene,
                decl("level2").child(
                    RouterType::Scene,
                    decl("level3")
                        .disable_caching(false)
                        .child(RouterType::Scene, decl("level4")),
                ),
            ),
        );
        ManagerBuilder::new(root).build().unwrap()
    }

    #[test]
    fn disabled_caching_is_inherited() {
        let mut manager = levels();
        show(&mut manager, "level4");
        assert_eq!(manager.url(), "/level1/level2/level3/level4");

        hide(&mut manager, "level1");
        let cache = manager.cache();
        assert_eq!(cache.was_visible("level1"), None);
        assert_eq!(cache.was_visible("level2"), None);
        assert_eq!(cache.was_visible("level3"), Some(true));
        assert_eq!(cache.was_visible("level4"), Some(true));
    }

    #[test]
    fn per_call_option_disables_caching() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        manager.router("user").unwrap().hide(opts().without_caching()).unwrap();
        assert!(manager.cache().is_empty());
    }

    #[test]
    fn embedded_cache_round_trips_through_the_url() {
        let root = decl("root").child(
            RouterType::Scene,
            decl("user").child(RouterType::Data, decl("user_id").path_router(true)),
        );
        let mut manager = ManagerBuilder::new(root.clone()).build().unwrap();
        manager.router("user_id").unwrap().set_data("42", opts()).unwrap();
        assert_eq!(manager.url(), "/user/42");
        manager.router("user").unwrap().hide(opts().add_cache()).unwrap();
        let url = manager.url();
        assert!(url.starts_with("/?__cache="), "{url}");

        let mut restored = ManagerBuilder::new(root)
            .store(MemoryStore::from_url(&url).unwrap())
            .build()
            .unwrap();
        assert_eq!(restored.cache().was_visible("user_id"), Some(true));
        assert_eq!(restored.cache().previous_data("user_id").as_deref(), Some("42"));

        show(&mut restored, "user");
        assert_eq!(restored.url(), "/user/42");
    }

    #[test]
    fn bad_embedded_cache_fails_build() {
        let manager = ManagerBuilder::new(decl("root"))
            .store(MemoryStore::from_url("/?__cache=nope").unwrap())
            .build();
        assert!(matches!(manager, Err(RouterError::Cache(_))));
    }
}

// ── Stacks ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stacks {
    use super::*;

    fn abc() -> Manager {
        let root = decl("root")
            .child(RouterType::Stack, decl("a"))
            .child(RouterType::Stack, decl("b"))
            .child(RouterType::Stack, decl("c"));
        let mut manager = ManagerBuilder::new(root).build().unwrap();
        for name in ["a", "b", "c"] {
            show(&mut manager, name);
        }
        manager
    }

    fn orders(manager: &Manager) -> Vec<Option<u32>> {
        ["a", "b", "c"]
            .iter()
            .map(|n| manager.current(n).and_then(|s| s.order))
            .collect()
    }

    #[test]
    fn shown_stacks_are_ordered_newest_first() {
        let manager = abc();
        assert_eq!(orders(&manager), vec![Some(3), Some(2), Some(1)]);
        assert_eq!(manager.url(), "/?a=3&b=2&c=1");
    }

    #[test]
    fn to_back_reorders() {
        let mut manager = abc();
        manager.router("a").unwrap().to_back(opts()).unwrap();
        assert_eq!(orders(&manager), vec![Some(3), Some(2), Some(1)]);
        manager.router("c").unwrap().to_back(opts()).unwrap();
        assert_eq!(orders(&manager), vec![Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn forward_backward_and_hide() {
        let mut manager = abc();
        manager.router("a").unwrap().forward(opts()).unwrap();
        assert_eq!(orders(&manager), vec![Some(2), Some(3), Some(1)]);
        manager.router("a").unwrap().backward(opts()).unwrap();
        assert_eq!(orders(&manager), vec![Some(3), Some(2), Some(1)]);
        manager.router("c").unwrap().to_front(opts()).unwrap();
        hide(&mut manager, "b");
        assert_eq!(orders(&manager), vec![Some(2), None, Some(1)]);
    }

    #[test]
    fn unsupported_action_leaves_no_trace() {
        let mut manager = abc();
        let before = manager.url();
        assert!(matches!(
            manager.call("root", Action::SetData, opts()),
            Err(RouterError::UnsupportedAction { .. })
        ));
        assert_eq!(manager.url(), before);
        assert!(!manager.cache().in_transaction());
    }
}

// ── Data routers and default actions ──────────────────────────────────────────

#[cfg(test)]
mod data {
    use super::*;

    fn search_tree() -> RouterDeclaration {
        decl("root")
            .child(RouterType::Data, decl("query").route_key("q"))
            .child(
                RouterType::Scene,
                decl("user").child(
                    RouterType::Data,
                    decl("user_id")
                        .path_router(true)
                        .default_action(DefaultAction::with_data(Action::Show, "7")),
                ),
            )
    }

    #[test]
    fn missing_data_is_an_error_by_default() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        assert!(matches!(
            manager.router("query").unwrap().show(opts()),
            Err(RouterError::MissingData(n)) if n == "query"
        ));
        assert!(!manager.cache().in_transaction());
        assert_eq!(manager.store().history_len(), 1);
        assert_eq!(manager.action_count(), 0);
    }

    #[test]
    fn missing_data_can_be_tolerated() {
        let config = ManagerConfig { error_when_missing_data: false, ..ManagerConfig::default() };
        let mut manager = ManagerBuilder::new(search_tree()).config(config).build().unwrap();
        manager.router("query").unwrap().show(opts()).unwrap();
        assert_eq!(manager.routers_missing_data(), ["query"]);
        assert!(!visible(&manager, "query"));
    }

    #[test]
    fn empty_data_is_missing_data() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        assert!(matches!(
            manager.router("query").unwrap().set_data("", opts()),
            Err(RouterError::MissingData(n)) if n == "query"
        ));
        assert_eq!(manager.url(), "/");
        assert_eq!(manager.action_count(), 0);
    }

    #[test]
    fn dry_run_without_data_is_a_no_op() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        let location = manager.router("query").unwrap().show(opts().dry_run()).unwrap();
        assert!(location.search_value("q").is_none());
    }

    #[test]
    fn set_data_writes_query_param() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        manager.router("query").unwrap().set_data("rust lang", opts()).unwrap();
        assert_eq!(manager.url(), "/?q=rust%20lang");
        assert_eq!(manager.current("query").unwrap().data.as_deref(), Some("rust lang"));
    }

    #[test]
    fn default_action_applies_on_first_reveal() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        show(&mut manager, "user");
        assert_eq!(manager.url(), "/user/7");
        assert_eq!(manager.current("user_id").unwrap().data.as_deref(), Some("7"));
    }

    #[test]
    fn default_data_binds_to_direct_show() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        show(&mut manager, "user_id");
        assert_eq!(manager.url(), "/user/7");
    }

    #[test]
    fn cached_data_wins_over_default() {
        let mut manager = ManagerBuilder::new(search_tree()).build().unwrap();
        manager.router("user_id").unwrap().set_data("42", opts()).unwrap();
        hide(&mut manager, "user");
        show(&mut manager, "user");
        assert_eq!(manager.url(), "/user/42");
    }
}

// ── Dry runs, links and counters ──────────────────────────────────────────────

#[cfg(test)]
mod side_effects {
    use super::*;

    #[test]
    fn dry_run_touches_nothing() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        let events = notifications(&mut manager, "events");
        let count = manager.action_count();

        let location = manager.router("user").unwrap().hide(opts().dry_run()).unwrap();
        assert!(location.pathname.is_empty());
        assert_eq!(manager.url(), "/user/events");
        assert!(manager.cache().is_empty());
        assert_eq!(manager.store().history_len(), 2);
        assert_eq!(manager.action_count(), count);
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn link_serializes_without_writing() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        let link = manager.router("info").unwrap().link(Action::Show, opts()).unwrap();
        assert_eq!(link, "/info");
        assert_eq!(manager.url(), "/user/events");
    }

    #[test]
    fn link_keeps_unrelated_query() {
        let root = decl("root")
            .child(RouterType::Scene, decl("user"))
            .child(RouterType::Feature, decl("help"));
        let mut manager = ManagerBuilder::new(root).build().unwrap();
        show(&mut manager, "help");
        let link = manager.link("user", Action::Show, opts()).unwrap();
        assert_eq!(link, "/user?help=true");
    }

    #[test]
    fn just_changed_tracks_latest_action() {
        let mut manager = user_manager();
        show(&mut manager, "events");
        assert_eq!(manager.action_count(), 1);
        assert!(manager.just_changed("events"));
        assert!(manager.just_changed("user"));
        assert!(!manager.just_changed("root"));

        show(&mut manager, "details");
        assert!(manager.just_changed("details"));
        assert!(manager.just_changed("events"));
        assert!(!manager.just_changed("user"));
    }

    #[test]
    fn unsubscribed_observer_is_silent() {
        let mut manager = user_manager();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut user = manager.router("user").unwrap();
        let id = user.subscribe(move |_| *sink.borrow_mut() += 1).unwrap();
        user.unsubscribe(id);
        user.show(opts()).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert!(user.is_visible());
    }
}

// ── History navigation and tree mutation ──────────────────────────────────────

#[cfg(test)]
mod navigation {
    use super::*;
    use rp_core::Location;

    #[test]
    fn back_and_forward_rebuild_state() {
        let mut manager = user_manager();
        show(&mut manager, "user");
        show(&mut manager, "info");
        manager.back().unwrap();
        assert!(visible(&manager, "user"));
        assert!(!visible(&manager, "info"));
        manager.forward().unwrap();
        assert!(visible(&manager, "info"));
        manager.go(-2).unwrap();
        assert!(!visible(&manager, "user") && !visible(&manager, "info"));
    }

    #[test]
    fn navigate_replaces_query() {
        let root = decl("root")
            .child(RouterType::Scene, decl("user"))
            .child(RouterType::Feature, decl("help"));
        let mut manager = ManagerBuilder::new(root).build().unwrap();
        show(&mut manager, "help");
        manager.navigate("/user").unwrap();
        assert!(visible(&manager, "user"));
        assert!(!visible(&manager, "help"));
        assert!(manager.navigate("/%FF").is_err());
    }

    #[test]
    fn add_and_remove_routers() {
        let mut manager = user_manager();
        let added = manager
            .add_router("user", RouterType::Feature, &decl("help"))
            .unwrap();
        assert_eq!(added, vec!["help"]);
        show(&mut manager, "help");
        assert_eq!(manager.url(), "/user?help=true");

        let removed = manager.remove_router("user").unwrap();
        assert_eq!(removed.len(), 4);
        assert!(matches!(manager.state("help"), Err(RouterError::StateNotWired(_))));
        assert!(manager.router("events").is_err());
        assert!(matches!(manager.remove_router("root"), Err(RouterError::RootRemoval)));
    }

    #[test]
    fn location_listener_sees_writes() {
        let mut manager = user_manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = manager.subscribe_location(Box::new(move |l: &Location| sink.borrow_mut().push(l.pathname.len())));
        show(&mut manager, "events");
        manager.unsubscribe_location(id);
        show(&mut manager, "info");
        assert_eq!(*seen.borrow(), vec![2]);
    }
}
