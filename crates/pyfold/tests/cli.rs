//! End-to-end tests for the `pyfold` binary: write a JSON-encoded tree to a
//! temp file, run the compiled binary against it, and check the sibling
//! `_optimized` file the front end writes.

use std::process::Command;

use pyfold_ast::{Module, builder::*};
use tempfile::tempdir;

fn write_fixture(dir: &std::path::Path, name: &str, module: &Module) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(module).unwrap()).unwrap();
    path
}

fn run_pyfold(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pyfold"))
        .args(args)
        .output()
        .expect("failed to run the pyfold binary")
}

/// `def foo(x): for i in range(10): y = 10 + x; z = i; return y` encoded as
/// JSON, run through the default `optimize` operation end to end.
fn collapsible_loop_fixture() -> Module {
    Module::new(vec![function_def(
        1,
        "foo",
        vec!["x"],
        vec![
            for_stmt(
                2,
                "i",
                call(2, "range", vec![constant_int(2, 10)]),
                vec![
                    assign1(3, "y", bin_op(3, constant_int(3, 10), BinOperator::Add, name(3, "x"))),
                    assign1(4, "z", name(4, "i")),
                ],
                vec![],
            ),
            return_stmt(5, Some(name(5, "y"))),
        ],
    )])
}

#[test]
fn optimize_is_the_default_operation() {
    let dir = tempdir().unwrap();
    let script = write_fixture(dir.path(), "input.json", &collapsible_loop_fixture());

    let output = run_pyfold(&[script.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let rendered = std::fs::read_to_string(dir.path().join("input_optimized.py")).unwrap();
    assert_eq!(rendered, "def foo(x):\n    y = 10 + x\n    return y\n");
}

#[test]
fn pass_through_leaves_the_tree_untouched() {
    let dir = tempdir().unwrap();
    let script = write_fixture(dir.path(), "input.json", &collapsible_loop_fixture());

    let output = run_pyfold(&["--pass-through", script.to_str().unwrap()]);
    assert!(output.status.success());

    let rendered = std::fs::read_to_string(dir.path().join("input_optimized.py")).unwrap();
    assert_eq!(
        rendered,
        "def foo(x):\n    for i in range(10):\n        y = 10 + x\n        z = i\n    return y\n"
    );
}

#[test]
fn remove_useless_only_drops_dead_statements() {
    let dir = tempdir().unwrap();
    // def foo(): a = 10; b = 0; return a
    let module = Module::new(vec![function_def(
        1,
        "foo",
        vec![],
        vec![
            assign1(2, "a", constant_int(2, 10)),
            assign1(3, "b", constant_int(3, 0)),
            return_stmt(4, Some(name(4, "a"))),
        ],
    )]);
    let script = write_fixture(dir.path(), "input.json", &module);

    let output = run_pyfold(&["--remove-useless", script.to_str().unwrap()]);
    assert!(output.status.success());

    let rendered = std::fs::read_to_string(dir.path().join("input_optimized.py")).unwrap();
    assert_eq!(rendered, "def foo():\n    a = 10\n    return a\n");
}

#[test]
fn hoist_invariants_only_lifts_without_pruning() {
    let dir = tempdir().unwrap();
    // def foo(a, x, y): for i in range(len(a)): a[i] = x + y
    let module = Module::new(vec![function_def(
        1,
        "foo",
        vec!["a", "x", "y"],
        vec![for_stmt(
            2,
            "i",
            call(2, "range", vec![call(2, "len", vec![name(2, "a")])]),
            vec![assign(
                3,
                vec![subscript(3, "a", name(3, "i"))],
                bin_op(3, name(3, "x"), BinOperator::Add, name(3, "y")),
            )],
            vec![],
        )],
    )]);
    let script = write_fixture(dir.path(), "input.json", &module);

    let output = run_pyfold(&["--hoist-invariants", script.to_str().unwrap()]);
    assert!(output.status.success());

    let rendered = std::fs::read_to_string(dir.path().join("input_optimized.py")).unwrap();
    assert_eq!(
        rendered,
        "def foo(a, x, y):\n    __o_tmp_3 = x + y\n    for i in range(len(a)):\n        a[i] = __o_tmp_3\n"
    );
}

#[test]
fn malformed_json_exits_nonzero() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("broken.json");
    std::fs::write(&script, "not valid json").unwrap();

    let output = run_pyfold(&[script.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn missing_file_exits_nonzero() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("does_not_exist.json");

    let output = run_pyfold(&[script.to_str().unwrap()]);
    assert!(!output.status.success());
}
