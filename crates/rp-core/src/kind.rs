//! Router type and action tags.
//!
//! Behavior is looked up through a closed set of tags rather than attached to
//! router instances: `rp-template` maps each [`RouterType`] to its reducer and
//! action table, and the static flags below are shared by the tree (which
//! needs them to derive `is_path_router`) and the templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RouterError;

// ── RouterType ────────────────────────────────────────────────────────────────

/// The five router kinds.
///
/// The derived `Ord` fixes the order in which children of different types are
/// visited during cascades (declaration order within one type).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterType {
    Root,
    Scene,
    Stack,
    Feature,
    Data,
}

/// Static per-type flags.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TemplateConfig {
    /// Whether routers of this type may occupy a path segment at all.
    pub can_be_path_router: bool,
    /// Whether a router of this type claims the path when its declaration is
    /// silent.  An implicit claim yields to an explicit one from a sibling type.
    pub default_is_path_router: bool,
    /// Whether a parent shown because of a child of this type still runs the
    /// default/cached activation for that child's siblings of the same type.
    pub should_parent_try_to_activate_siblings: bool,
}

impl RouterType {
    pub const ALL: [RouterType; 5] = [
        RouterType::Root,
        RouterType::Scene,
        RouterType::Stack,
        RouterType::Feature,
        RouterType::Data,
    ];

    pub const fn template_config(self) -> TemplateConfig {
        match self {
            RouterType::Root => TemplateConfig {
                can_be_path_router:                     true,
                default_is_path_router:                 true,
                should_parent_try_to_activate_siblings: false,
            },
            RouterType::Scene => TemplateConfig {
                can_be_path_router:                     true,
                default_is_path_router:                 true,
                should_parent_try_to_activate_siblings: false,
            },
            RouterType::Stack | RouterType::Feature => TemplateConfig {
                can_be_path_router:                     false,
                default_is_path_router:                 false,
                should_parent_try_to_activate_siblings: true,
            },
            RouterType::Data => TemplateConfig {
                can_be_path_router:                     true,
                default_is_path_router:                 false,
                should_parent_try_to_activate_siblings: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouterType::Root => "root",
            RouterType::Scene => "scene",
            RouterType::Stack => "stack",
            RouterType::Feature => "feature",
            RouterType::Data => "data",
        }
    }
}

impl fmt::Display for RouterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouterType {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouterType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RouterError::InvalidDeclaration(format!("unknown router type `{s}`")))
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// Every action name any template understands.
///
/// Which actions a given type supports is decided by its template; calling
/// an unsupported one is an `UnsupportedAction` error.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Show,
    Hide,
    Forward,
    Backward,
    ToFront,
    ToBack,
    SetData,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Show,
        Action::Hide,
        Action::Forward,
        Action::Backward,
        Action::ToFront,
        Action::ToBack,
        Action::SetData,
    ];

    /// `true` for every action that leaves the router visible.
    ///
    /// The pipeline treats all of them like `show`: the parent is revealed
    /// first and hidden children are rehydrated afterwards.
    #[inline]
    pub fn reveals(self) -> bool {
        !matches!(self, Action::Hide)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Show => "show",
            Action::Hide => "hide",
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::ToFront => "toFront",
            Action::ToBack => "toBack",
            Action::SetData => "setData",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RouterError::InvalidDeclaration(format!("unknown action `{s}`")))
    }
}
