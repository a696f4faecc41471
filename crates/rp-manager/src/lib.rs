//! `rp-manager` — keeps a router tree and a serialized location in sync.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`manager`]  | `Manager`: tree, cache, state store, serialized store, counter   |
//! | [`builder`]  | `ManagerBuilder`: fluent construction and first rebuild          |
//! | [`handle`]   | `RouterHandle`: per-router actions, links and state              |
//! | `pipeline`   | The direct and indirect step lists every action runs through     |
//! | [`store`]    | `SerializedStore` trait, `MemoryStore`, `MemoryStoreConfig`      |
//! | [`config`]   | `ManagerConfig`                                                  |
//!
//! # Action flow
//!
//! ```text
//! handle.show(opts)
//!   └─ pipeline (direct): cache transaction opened, location fetched,
//!        parent revealed, siblings hidden, template action applied,
//!        children rehydrated, transaction saved
//!   └─ store.set_state(location)      (skipped on dry run)
//!   └─ every reducer re-run → state store → observers
//! ```
//!
//! # Feature flags
//!
//! | Flag      | Effect                                  |
//! |-----------|-----------------------------------------|
//! | `fx-hash` | Forwards `rp-store/fx-hash`.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rp_core::{LocationOptions, RouterDeclaration, RouterType};
//! use rp_manager::ManagerBuilder;
//!
//! let decl = RouterDeclaration::new("root")
//!     .child(RouterType::Scene, RouterDeclaration::new("user"))
//!     .child(RouterType::Feature, RouterDeclaration::new("help"));
//! let mut manager = ManagerBuilder::new(decl).build()?;
//! manager.router("user")?.show(LocationOptions::new())?;
//! assert_eq!(manager.url(), "/user");
//! ```

pub mod builder;
pub mod config;
pub mod handle;
pub mod manager;
pub(crate) mod pipeline;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::ManagerBuilder;
pub use config::{DEFAULT_CACHE_SEARCH_KEY, ManagerConfig};
pub use handle::RouterHandle;
pub use manager::Manager;
pub use store::{
    DEFAULT_MEMORY_HISTORY, LocationListener, MemoryStore, MemoryStoreConfig, SerializedStore,
    SubscriptionId,
};
