//! Framework error type.
//!
//! Every `rp-*` crate returns [`RouterResult`].  Configuration errors come out
//! of tree construction, `MissingData` out of `show` on a data router, and
//! `StateNotWired` out of state reads for routers the manager never
//! registered.

use thiserror::Error;

use crate::{Action, RouterType};

/// The single error type shared by all `rp-*` crates.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("router name `{0}` is already in use")]
    DuplicateName(String),

    #[error("route key `{route_key}` of router `{router}` is already used by `{existing}`")]
    DuplicateRouteKey {
        router:    String,
        route_key: String,
        existing:  String,
    },

    #[error("router `{0}` is marked as a path router but its parent is not a path router")]
    PathRouterWithoutPathParent(String),

    #[error("router `{router}` ({router_type}) claims the path but sibling type `{competing}` already does")]
    CompetingPathRouters {
        router:      String,
        router_type: RouterType,
        competing:   RouterType,
    },

    #[error("router `{router}` is of type `{router_type}`, which cannot be a path router")]
    PathRouterNotAllowed {
        router:      String,
        router_type: RouterType,
    },

    #[error("router `{0}` not found")]
    UnknownRouter(String),

    #[error("the root router cannot be removed")]
    RootRemoval,

    #[error("invalid router declaration: {0}")]
    InvalidDeclaration(String),

    #[error("invalid location `{url}`: {reason}")]
    InvalidLocation { url: String, reason: String },

    #[error("router `{0}` requires data to be shown")]
    MissingData(String),

    #[error("state of router `{0}` has not been wired by a manager")]
    StateNotWired(String),

    #[error("router `{router}` of type `{router_type}` has no `{action}` action")]
    UnsupportedAction {
        router:      String,
        router_type: RouterType,
        action:      Action,
    },

    #[error("embedded cache could not be parsed: {0}")]
    Cache(#[from] serde_json::Error),
}

/// Shorthand result type for all `rp-*` crates.
pub type RouterResult<T> = Result<T, RouterError>;
