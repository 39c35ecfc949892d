//! The node transformer: the "sweep" half of dead-statement elimination.
//!
//! A single-pass rewriter over a block that drops statements the live-set
//! says are dead. It never recurses into nested blocks or edits
//! expressions in place - that work belongs to the mark phase in
//! [`crate::dead_code`]. The two degenerate modes exist so the structural
//! post-passes in [`crate::dead_code::post_passes`] can reuse the same
//! entry point instead of hand-rolling their own `retain`.

use pyfold_ast::{Block, Callee, Expr, Stmt, target_name};
use rustc_hash::FxHashSet;

use crate::purity::is_pure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Leave every statement as-is.
    None,
    /// Drop statements the live-set marks dead (see module docs).
    ByLiveness,
    /// Drop every statement unconditionally.
    DropAll,
}

/// Sweep `block` in place according to `mode`, consulting `live` for
/// [`Mode::ByLiveness`].
pub fn sweep(block: &mut Block, mode: Mode, live: &FxHashSet<String>) {
    match mode {
        Mode::None => {}
        Mode::DropAll => block.clear(),
        Mode::ByLiveness => block.retain(|stmt| keep_by_liveness(stmt, live)),
    }
}

fn keep_by_liveness(stmt: &Stmt, live: &FxHashSet<String>) -> bool {
    match stmt {
        Stmt::Assign(a) => a
            .targets
            .iter()
            .filter_map(target_name)
            .any(|name| live.contains(name)),
        Stmt::AugAssign(a) => target_name(&a.target).is_some_and(|name| live.contains(name)),
        Stmt::Expr(e) => keep_expr_stmt(&e.value, live),
        // Compound and declarative statements are never dropped by the
        // sweep; only their bodies shrink, via recursion elsewhere.
        Stmt::If(_)
        | Stmt::For(_)
        | Stmt::While(_)
        | Stmt::Return(_)
        | Stmt::FunctionDef(_)
        | Stmt::Try(_)
        | Stmt::Pass(_) => true,
    }
}

fn keep_expr_stmt(value: &Expr, live: &FxHashSet<String>) -> bool {
    match value {
        Expr::Call(call) => {
            let callee = call.func.root_name();
            if is_pure(callee) {
                call.args.iter().any(|arg| is_live_top_level_name(arg, live))
            } else {
                true
            }
        }
        Expr::NamedExpr(n) => live.contains(&n.target.id),
        Expr::ListComp(lc) => match lc.elt.as_ref() {
            Expr::Call(call) => {
                let callee = call.func.root_name();
                !is_pure(callee) || live.contains(callee)
            }
            other => mentions_live_name(other, live),
        },
        _ => false,
    }
}

fn is_live_top_level_name(expr: &Expr, live: &FxHashSet<String>) -> bool {
    matches!(expr, Expr::Name(n) if live.contains(&n.id))
}

fn mentions_live_name(expr: &Expr, live: &FxHashSet<String>) -> bool {
    let mut names = FxHashSet::default();
    pyfold_ast::collect_free_vars(expr, &mut names);
    names.iter().any(|n| live.contains(n))
}

/// A dotted callee (`m.f(...)`) is always conservatively impure - there is
/// no way to resolve method purity statically in this subset.
#[must_use]
pub fn callee_is_dotted(func: &Callee) -> bool {
    matches!(func, Callee::Attribute { .. })
}

#[cfg(test)]
mod tests {
    use pyfold_ast::builder::*;

    use super::*;

    fn live(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_assign_with_dead_target() {
        let mut block = vec![assign1(1, "a", constant_int(1, 1))];
        sweep(&mut block, Mode::ByLiveness, &live(&[]));
        assert!(block.is_empty());
    }

    #[test]
    fn keeps_assign_with_live_target() {
        let mut block = vec![assign1(1, "a", constant_int(1, 1))];
        sweep(&mut block, Mode::ByLiveness, &live(&["a"]));
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn drops_pure_call_with_no_live_args() {
        let mut block = vec![expr_stmt(1, call(1, "len", vec![name(1, "x")]))];
        sweep(&mut block, Mode::ByLiveness, &live(&[]));
        assert!(block.is_empty());
    }

    #[test]
    fn keeps_impure_call_unconditionally() {
        let mut block = vec![expr_stmt(1, call(1, "my_func", vec![]))];
        sweep(&mut block, Mode::ByLiveness, &live(&[]));
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn keeps_compound_statements_regardless_of_liveness() {
        let mut block = vec![pass_stmt(1), return_stmt(2, None)];
        sweep(&mut block, Mode::ByLiveness, &live(&[]));
        assert_eq!(block.len(), 2);
    }
}
