//! Static purity oracle.
//!
//! A fixed table of built-in names considered free of observable side
//! effects, built up from the numeric-conversion, introspection,
//! container-constructor, iterator, and formatting built-ins of the source
//! language. `print` is carved out unconditionally - it is the one built-in
//! whose entire purpose is an observable effect, so treating it as pure
//! would let the dead-code pass delete calls that exist only to produce
//! output.
//!
//! Any name outside this table is conservatively treated as impure: it is
//! safer to keep a statement we didn't need to than to drop one that had an
//! effect we didn't know about.

use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// The one built-in in [`KNOWN_PURE`] that is unconditionally impure.
const OUTPUT_BUILTIN: &str = "print";

const KNOWN_PURE: &[&str] = &[
    "abs",
    "aiter",
    "all",
    "any",
    "anext",
    "ascii",
    "bin",
    "bool",
    "breakpoint",
    "bytearray",
    "bytes",
    "callable",
    "chr",
    "classmethod",
    "compile",
    "complex",
    "delattr",
    "dict",
    "dir",
    "divmod",
    "enumerate",
    "eval",
    "exec",
    "filter",
    "float",
    "format",
    "frozenset",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "list",
    "locals",
    "map",
    "max",
    "memoryview",
    "min",
    "next",
    "object",
    "oct",
    "open",
    "ord",
    "pow",
    OUTPUT_BUILTIN,
    "property",
    "range",
    "repr",
    "reversed",
    "round",
    "tuple",
    "type",
    "vars",
    "zip",
    "__import__",
    "set",
    "setattr",
    "slice",
    "sorted",
    "staticmethod",
    "str",
    "sum",
    "super",
];

static KNOWN_PURE_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| KNOWN_PURE.iter().copied().collect());

/// Is `callee` a side-effect-free built-in?
#[must_use]
pub fn is_pure(callee: &str) -> bool {
    callee != OUTPUT_BUILTIN && KNOWN_PURE_SET.contains(callee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_is_always_impure() {
        assert!(!is_pure("print"));
    }

    #[test]
    fn known_builtins_are_pure() {
        assert!(is_pure("len"));
        assert!(is_pure("range"));
        assert!(is_pure("str"));
    }

    #[test]
    fn unknown_names_are_conservatively_impure() {
        assert!(!is_pure("sys.exit"));
        assert!(!is_pure("my_function"));
    }
}
