//! `rp-store` — the two mutable stores the action pipeline works against.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`cache`]  | `RouterCache`: name → `{visible, data}` with one transaction  |
//! | [`state`]  | `RouterStateStore`, `RouterStateSnapshot`, `ObserverId`       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | `fx-hash` | Name-keyed maps use `FxHashMap` instead of the std SipHash. |

pub mod cache;
pub mod state;


pub use cache::RouterCache;
pub use state::{DEFAULT_HISTORY_SIZE, ObserverId, RouterStateSnapshot, RouterStateStore};

/// Map keyed by router name.
#[cfg(feature = "fx-hash")]
pub(crate) type NameMap<V> = rustc_hash::FxHashMap<String, V>;

/// Map keyed by router name.
#[cfg(not(feature = "fx-hash"))]
pub(crate) type NameMap<V> = std::collections::HashMap<String, V>;
