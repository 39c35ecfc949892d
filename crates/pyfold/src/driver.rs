//! The fixed-point driver: alternates elimination and hoisting until the
//! rendered program stops changing.

use pyfold_ast::Module;

use crate::{dead_code, hoist};

/// Run dead-statement elimination and its structural post-passes once.
/// Idempotent on trees already reduced.
#[must_use]
pub fn remove_useless(mut module: Module) -> Module {
    dead_code::eliminate(&mut module);
    module
}

/// Run the loop-invariant hoisting pass once. Not idempotent in general - a
/// hoist can expose a further one on a subsequent run.
#[must_use]
pub fn hoist_invariants(mut module: Module) -> Module {
    hoist::hoist(&mut module);
    module
}

/// Alternate elimination and hoisting until the whitespace-normalised
/// rendering of the tree stops changing between iterations.
///
/// Termination on well-formed input is guaranteed because each pass is
/// monotone in information content: elimination only deletes, and hoisting
/// only relocates existing nodes and introduces temporaries whose names are
/// uniquely determined by source line.
#[must_use]
pub fn optimize(mut module: Module) -> Module {
    loop {
        let before = pyfold_unparser::fixed_point_repr(&module);
        module = remove_useless(module);
        module = hoist_invariants(module);
        let after = pyfold_unparser::fixed_point_repr(&module);
        if before == after {
            return module;
        }
    }
}
