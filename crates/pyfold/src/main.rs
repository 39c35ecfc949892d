//! Command-line front-end. Reads a JSON-serialized tree, runs one of the
//! three public operations over it, and writes the rendered result to a
//! sibling file.
//!
//! The concrete-syntax parser and the textual unparser are treated as fixed
//! external collaborators by the optimizer this binary wraps; this front
//! end's own input format is therefore the tree's JSON encoding rather than
//! source text, so no parser needs inventing here. Rendering back to source
//! is handled entirely by `pyfold_unparser`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pyfold::config::{self, Operation};
use pyfold_ast::Module;

/// Run a single optimization pass over a script's AST.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to the input script, encoded as JSON per `pyfold_ast::Module`.
    script: PathBuf,

    /// Run only dead-statement elimination.
    #[arg(long, conflicts_with_all = ["hoist_invariants", "pass_through"])]
    remove_useless: bool,

    /// Run only loop-invariant hoisting.
    #[arg(long, conflicts_with_all = ["remove_useless", "pass_through"])]
    hoist_invariants: bool,

    /// Render the input unchanged, skipping both passes.
    #[arg(long, conflicts_with_all = ["remove_useless", "hoist_invariants"])]
    pass_through: bool,
}

impl Cli {
    fn operation(&self) -> Operation {
        if self.remove_useless {
            Operation::RemoveUseless
        } else if self.hoist_invariants {
            Operation::HoistInvariants
        } else if self.pass_through {
            Operation::PassThrough
        } else {
            Operation::Optimize
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let input = fs::read_to_string(&cli.script)
        .with_context(|| format!("reading {}", cli.script.display()))?;
    let module: Module = serde_json::from_str(&input)
        .with_context(|| format!("parsing {} as a pyfold AST", cli.script.display()))?;

    let operation = cli.operation();
    log::info!("running {operation:?} on {}", cli.script.display());

    let result = match operation {
        Operation::RemoveUseless => pyfold::remove_useless(module),
        Operation::HoistInvariants => pyfold::hoist_invariants(module),
        Operation::Optimize => pyfold::optimize(module),
        Operation::PassThrough => module,
    };

    let rendered = pyfold_unparser::Generator::generate(&result);
    let out_path = config::output_path(&cli.script);
    fs::write(&out_path, rendered).with_context(|| format!("writing {}", out_path.display()))?;
    log::info!("wrote {}", out_path.display());

    Ok(())
}
