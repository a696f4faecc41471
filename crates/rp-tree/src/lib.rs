//! `rp-tree` — the router tree.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`router`] | `Router` node: identity, config, parent/children by name     |
//! | [`tree`]   | `RouterTree`: name-keyed arena, validation, derived properties |
//!
//! # Ownership
//!
//! The tree owns every node in one `HashMap<String, Router>`.  Nodes refer to
//! their parent and children by name only, so there is a single ownership
//! path and no reference cycles; relatives are resolved through the tree.

pub mod router;
pub mod tree;


pub use router::Router;
pub use tree::RouterTree;
