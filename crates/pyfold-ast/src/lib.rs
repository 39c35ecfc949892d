//! AST node definitions for the small imperative scripting-language subset
//! that `pyfold` optimizes.
//!
//! This crate owns the data model only: variant definitions, construction
//! helpers, and free-variable collection. It knows nothing about parsing,
//! unparsing, or optimization passes - those live in sibling crates so this
//! one stays a plain, dependency-light tree.

pub mod builder;
mod free_vars;
mod nodes;

pub use free_vars::{collect_free_vars, target_name};
pub use nodes::*;
