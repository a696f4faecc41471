//! `rp-core` — foundational types for the router-primitives framework.
//!
//! This crate is a dependency of every other `rp-*` crate.  It has no `rp-*`
//! dependencies and only small external ones (`serde`, `serde_json`,
//! `percent-encoding`, `thiserror`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`location`]    | `Location`, `SearchValue`, `LocationOptions`              |
//! | [`url`]         | `serialize_location`, `parse_url`, merge-on-write helper  |
//! | [`kind`]        | `RouterType`, `Action`, `TemplateConfig`                  |
//! | [`state`]       | `RouterCurrentState`, `CacheEntry`                        |
//! | [`declaration`] | `RouterDeclaration`, `RouterConfig`, `DefaultAction`      |
//! | [`error`]       | `RouterError`, `RouterResult`                             |

pub mod declaration;
pub mod error;
pub mod kind;
pub mod location;
pub mod state;
pub mod url;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use declaration::{DefaultAction, RouterConfig, RouterDeclaration};
pub use error::{RouterError, RouterResult};
pub use kind::{Action, RouterType, TemplateConfig};
pub use location::{Location, LocationOptions, SearchMap, SearchValue};
pub use state::{CacheEntry, RouterCurrentState};
pub use url::{parse_url, serialize_location};
