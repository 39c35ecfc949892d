//! Dead-statement elimination: a backward mark-and-sweep over the tree.
//!
//! [`eliminate`] walks statements in reverse source order so the live-set at
//! each point reflects what later statements still need, invoking
//! [`crate::transformer::sweep`] after each block to physically drop
//! whatever turned out dead. Three structural post-passes then clean up the
//! shape of what's left: unreachable-after-`Pass` pruning, empty-`for`
//! removal, and empty-then conditional flipping.

pub mod post_passes;

use pyfold_ast::{
    Block, Callee, Expr, Module, Stmt, StmtAssign, StmtAugAssign, StmtFor, StmtFunctionDef,
    StmtIf, StmtReturn, StmtTry, StmtWhile, collect_free_vars, target_name,
};
use rustc_hash::FxHashSet;

use crate::transformer::{self, Mode};

/// Run dead-statement elimination and its post-passes over `module`.
pub fn eliminate(module: &mut Module) {
    let mut live = FxHashSet::default();
    eliminate_block(&mut module.body, &mut live);

    post_passes::remove_unreachable_after_pass(module);
    post_passes::remove_empty_for_loops(module);
    post_passes::normalize_conditionals(module);
}

/// Mark every statement in `block` (last to first), then sweep the block
/// once with the resulting live-set.
fn eliminate_block(block: &mut Block, live: &mut FxHashSet<String>) {
    for stmt in block.iter_mut().rev() {
        mark_stmt(stmt, live);
    }
    transformer::sweep(block, Mode::ByLiveness, live);
}

/// Mark forward, then backward, without sweeping in between - used for
/// `while` bodies so that a later iteration's read of a variable assigned
/// earlier in the same body is visible to the earlier assignment.
fn mark_block_both_directions(block: &mut Block, live: &mut FxHashSet<String>) {
    for stmt in block.iter_mut() {
        mark_stmt(stmt, live);
    }
    for stmt in block.iter_mut().rev() {
        mark_stmt(stmt, live);
    }
    transformer::sweep(block, Mode::ByLiveness, live);
}

fn body_has_live_statement(block: &Block, live: &FxHashSet<String>) -> bool {
    block.iter().any(|stmt| match stmt {
        Stmt::Assign(a) => a
            .targets
            .iter()
            .filter_map(target_name)
            .any(|n| live.contains(n)),
        Stmt::AugAssign(a) => target_name(&a.target).is_some_and(|n| live.contains(n)),
        _ => true,
    })
}

fn mark_stmt(stmt: &mut Stmt, live: &mut FxHashSet<String>) {
    match stmt {
        Stmt::Return(StmtReturn { value, .. }) => {
            if let Some(v) = value {
                collect_free_vars(v, live);
            }
        }
        Stmt::Assign(a) => mark_assign(a, live),
        Stmt::AugAssign(StmtAugAssign { target, value, .. }) => {
            if target_name(target).is_some_and(|n| live.contains(n)) {
                collect_free_vars(value, live);
            }
        }
        Stmt::Expr(e) => mark_expr_value(&mut e.value, live),
        Stmt::If(StmtIf {
            test, body, orelse, ..
        }) => {
            eliminate_block(body, live);
            eliminate_block(orelse, live);
            if body_has_live_statement(body, live) || body_has_live_statement(orelse, live) {
                collect_free_vars(test, live);
            }
        }
        Stmt::For(StmtFor { body, .. }) => {
            // Forward order: the loop variable is never pruned from
            // liveness propagation here, so assignments the body makes to
            // it keep flowing to later iterations of this same walk.
            for inner in body.iter_mut() {
                mark_stmt(inner, live);
            }
            transformer::sweep(body, Mode::ByLiveness, live);
            // `orelse` is left untouched: loop-else clauses are rare enough
            // that the original implementation never swept them, and this
            // keeps us conservative rather than guessing at new behavior.
        }
        Stmt::While(StmtWhile { test, body, .. }) => {
            collect_free_vars(test, live);
            mark_block_both_directions(body, live);
        }
        Stmt::FunctionDef(StmtFunctionDef { args, body, .. }) => {
            for param in args {
                live.insert(param.clone());
            }
            eliminate_block(body, live);
        }
        Stmt::Try(StmtTry {
            body,
            handlers,
            orelse,
            finalbody,
            ..
        }) => {
            // Try isn't named in the walker's per-variant contract, but the
            // post-pass backfill behavior only makes sense if its blocks
            // were actually swept - so treat each clause as an ordinary
            // block, the same way `If`'s branches are.
            eliminate_block(finalbody, live);
            eliminate_block(orelse, live);
            for handler in handlers.iter_mut() {
                eliminate_block(&mut handler.body, live);
            }
            eliminate_block(body, live);
        }
        Stmt::Pass(_) => {}
    }
}

fn mark_assign(a: &mut StmtAssign, live: &mut FxHashSet<String>) {
    if subtree_has_named_expr(&a.value) && mentions_any(&a.value, live) {
        for target in &a.targets {
            if let Some(n) = target_name(target) {
                live.insert(n.to_string());
            }
        }
        return;
    }

    if let Expr::Call(call) = a.value.as_ref() {
        if let Callee::Attribute { .. } = &call.func {
            // A method/attribute call's purity can't be resolved - treat
            // conservatively as impure and keep the assignment alive.
            for target in &a.targets {
                if let Some(n) = target_name(target) {
                    live.insert(n.to_string());
                }
            }
            return;
        }
    }

    for target in &a.targets {
        if target_name(target).is_some_and(|n| live.contains(n)) {
            collect_free_vars(&a.value, live);
        }
    }
}

fn subtree_has_named_expr(expr: &Expr) -> bool {
    match expr {
        Expr::NamedExpr(_) => true,
        Expr::BinOp(b) => subtree_has_named_expr(&b.left) || subtree_has_named_expr(&b.right),
        Expr::UnaryOp(u) => subtree_has_named_expr(&u.operand),
        Expr::Compare(c) => {
            subtree_has_named_expr(&c.left)
                || c.comparators.iter().any(subtree_has_named_expr)
        }
        Expr::Call(call) => call.args.iter().any(subtree_has_named_expr),
        Expr::Subscript(s) => subtree_has_named_expr(&s.slice),
        Expr::ListComp(lc) => subtree_has_named_expr(&lc.elt),
        Expr::Name(_) | Expr::Constant(_) => false,
    }
}

fn mentions_any(expr: &Expr, live: &FxHashSet<String>) -> bool {
    let mut found = FxHashSet::default();
    collect_free_vars(expr, &mut found);
    found.iter().any(|n| live.contains(n))
}

/// Mark the value of a statement-position expression: a bare `Call`, a
/// `NamedExpr`, or a `ListComp` each have their own liveness rule; anything
/// else is inert and contributes nothing.
fn mark_expr_value(value: &mut Expr, live: &mut FxHashSet<String>) {
    match value {
        Expr::Call(call) => {
            let pure = crate::purity::is_pure(call.func.root_name())
                && !transformer::callee_is_dotted(&call.func);
            if !pure {
                live.insert(call.func.root_name().to_string());
                for arg in &call.args {
                    let mut tmp = FxHashSet::default();
                    collect_free_vars(arg, &mut tmp);
                    live.extend(tmp);
                }
            }
        }
        Expr::NamedExpr(n) => {
            if live.contains(&n.target.id) {
                collect_free_vars(&n.value, live);
            }
        }
        Expr::ListComp(lc) => collect_free_vars(&lc.elt, live),
        _ => {}
    }
}
