//! Front-end glue: the CLI's mode selection and its output-path naming rule.
//!
//! Nothing here is persisted between invocations - no config file, no
//! environment variables are read. Every value originates from the
//! command line the process was invoked with.

use std::path::{Path, PathBuf};

/// Which of the three public operations a single invocation runs, or a
/// pass-through that renders the tree unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RemoveUseless,
    HoistInvariants,
    Optimize,
    PassThrough,
}

/// The extension every rendered output carries, regardless of the input's
/// own extension - the CLI's input is a JSON encoding of the tree (see
/// `main.rs`), but what `output_path` names is the *rendered source*
/// `pyfold_unparser::Generator` produces, which is source text in the
/// optimized language, not JSON.
const SOURCE_EXTENSION: &str = "py";

/// The sibling path an invocation writes its output to: the input's stem
/// with `_optimized` appended, and the source language's own extension -
/// not the input file's extension, since the input is JSON but the output
/// is rendered source.
///
/// `foo.json` in -> `foo_optimized.py` out, next to the input.
#[must_use]
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{stem}_optimized.{SOURCE_EXTENSION}");
    input.with_file_name(name)
}
