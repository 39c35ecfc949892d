//! Source-to-source optimizer for a small imperative scripting-language
//! subset: dead-statement elimination, loop-invariant hoisting, and the
//! fixed-point driver that alternates the two until the tree stops
//! changing.
//!
//! The three public operations are tree-in / tree-out and mutate in place;
//! callers that want to keep the input clone it themselves (`optimize`
//! clones internally for its own stability check).

pub mod config;
pub mod dead_code;
mod driver;
pub mod hoist;
pub mod purity;
pub mod transformer;

pub use driver::{hoist_invariants, optimize, remove_useless};
