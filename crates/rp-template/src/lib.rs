//! `rp-template` — what each router type means in a location.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`context`]  | `ActionCtx`, `CallDirection`, the `ActionHost` trait           |
//! | [`template`] | `RouterTemplate`, the static per-type table, `reduce_tree`     |
//! | [`root`]     | Always-visible root                                            |
//! | [`scene`]    | Mutually exclusive siblings, path segment or boolean flag      |
//! | [`stack`]    | Z-ordered siblings, numeric query values                       |
//! | [`feature`]  | Independent boolean query flag                                 |
//! | [`data`]     | Free-form value in a path segment or query parameter           |
//!
//! # Design notes
//!
//! Templates never touch a store.  A reducer reads a location; an action
//! returns a new location.  When an action has to act on a neighbor (a scene
//! hiding its visible siblings) it goes back through [`ActionHost::call`],
//! so the neighbor's call runs the full indirect pipeline of whoever hosts
//! the templates.

pub mod context;
pub mod data;
pub mod feature;
pub mod root;
pub mod scene;
pub mod stack;
pub mod template;


pub use context::{ActionCtx, ActionHost, CallDirection};
pub use template::{
    ActionFn, Reducer, RouterTemplate, is_visible, reduce, reduce_tree, replaced_siblings,
    run_action, template,
};
