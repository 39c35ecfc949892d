//! Per-loop invariant analysis: the two-set forward pass that decides which
//! assignments in a `for`/`while` body are safe to lift, and the lift
//! instructions that decision produces.

use pyfold_ast::{Expr, Stmt, StmtAssign, StmtFor, StmtWhile, collect_free_vars, target_name};
use rustc_hash::FxHashSet;

/// What a [`LiftInstruction`] moves out of a loop body.
#[derive(Debug, Clone)]
pub enum LiftPayload {
    /// The whole statement moves above the loop unchanged.
    Stmt(Stmt),
    /// Only this right-hand-side expression moves; the body keeps the
    /// statement but rewrites its value to read a fresh temporary.
    Expr(Expr),
}

/// One pending hoist: a candidate found during analysis, not yet applied.
#[derive(Debug, Clone)]
pub struct LiftInstruction {
    /// Index of the source statement within the loop body, as seen at
    /// analysis time.
    pub body_index: usize,
    pub as_temporary: bool,
    /// Source line of the statement the value was lifted from - this is
    /// what names the synthesised temporary.
    pub line: u32,
    /// Index of the enclosing loop within its parent block, as seen at
    /// analysis time.
    pub loop_index: usize,
    pub payload: LiftPayload,
}

fn expr_mentions(expr: &Expr, var: &str) -> bool {
    let mut found = FxHashSet::default();
    collect_free_vars(expr, &mut found);
    found.contains(var)
}

fn mentions_any_of(expr: &Expr, vars: &FxHashSet<String>) -> bool {
    let mut found = FxHashSet::default();
    collect_free_vars(expr, &mut found);
    found.iter().any(|n| vars.contains(n))
}

fn disjoint_from(expr: &Expr, vars: &FxHashSet<String>) -> bool {
    !mentions_any_of(expr, vars)
}

/// Only `Name` targets count toward an assignment's LHS set - a `Subscript`
/// target (`a[i] = ...`) never contributes its base name here.
fn lhs_names(targets: &[Expr]) -> FxHashSet<String> {
    targets
        .iter()
        .filter_map(|t| match t {
            Expr::Name(n) => Some(n.id.clone()),
            _ => None,
        })
        .collect()
}

fn target_mentions(targets: &[Expr], var: &str) -> bool {
    targets.iter().any(|t| expr_mentions(t, var))
}

/// Forward pass over `body` computing, relative to a single variable `var`
/// (the loop iterator for `for`, or one free variable of the test for
/// `while`):
/// - `A`: names assigned on the LHS of statements that don't rewrite a
///   value depending on `var` through the LHS.
/// - `R`: names referenced on the RHS of statements whose LHS does mention
///   `var`, minus whatever was already in `A` at that point.
fn related_variables(body: &[Stmt], var: &str) -> (FxHashSet<String>, FxHashSet<String>) {
    let mut a = FxHashSet::default();
    let mut r = FxHashSet::default();

    for stmt in body {
        let Stmt::Assign(assign) = stmt else {
            continue;
        };
        let mentions_var = target_mentions(&assign.targets, var) || expr_mentions(&assign.value, var);
        if !mentions_var {
            for target in &assign.targets {
                if let Some(n) = target_name(target) {
                    a.insert(n.to_string());
                }
            }
            continue;
        }

        if target_mentions(&assign.targets, var) {
            let mut rhs_vars = FxHashSet::default();
            collect_free_vars(&assign.value, &mut rhs_vars);
            for already in &a {
                rhs_vars.remove(already);
            }
            r.extend(rhs_vars);
        } else {
            for target in &assign.targets {
                if let Some(n) = target_name(target) {
                    a.insert(n.to_string());
                }
            }
        }
    }

    (a, r)
}

/// Analyze a `for` loop, returning the lift instructions for its body.
/// `loop_index` is this loop's position within its parent block.
pub fn analyze_for(node: &StmtFor, loop_index: usize) -> Vec<LiftInstruction> {
    let iterator = node.target.id.as_str();
    let (a, r) = related_variables(&node.body, iterator);
    let mut out = Vec::new();

    for (i, stmt) in node.body.iter().enumerate() {
        let Stmt::Assign(assign) = stmt else {
            continue;
        };
        let iter_in_left = target_mentions(&assign.targets, iterator);
        let iter_in_right = expr_mentions(&assign.value, iterator);
        let line = assign.line;

        match (iter_in_left, iter_in_right) {
            (true, true) | (false, true) => {}
            (true, false) => {
                if !matches!(assign.value.as_ref(), Expr::Name(_)) && disjoint_from(&assign.value, &a) {
                    out.push(LiftInstruction {
                        body_index: i,
                        as_temporary: true,
                        line,
                        loop_index,
                        payload: LiftPayload::Expr((*assign.value).clone()),
                    });
                }
            }
            (false, false) => {
                if lhs_names(&assign.targets).is_disjoint(&r) {
                    out.push(LiftInstruction {
                        body_index: i,
                        as_temporary: false,
                        line,
                        loop_index,
                        payload: LiftPayload::Stmt(stmt.clone()),
                    });
                }
            }
        }
    }

    out
}

/// Analyze a `while` loop, returning the lift instructions for its body.
pub fn analyze_while(node: &StmtWhile, loop_index: usize) -> Vec<LiftInstruction> {
    let mut condition_vars = FxHashSet::default();
    collect_free_vars(&node.test, &mut condition_vars);

    let mut a = FxHashSet::default();
    let mut r = FxHashSet::default();
    for var in &condition_vars {
        let (va, vr) = related_variables(&node.body, var);
        a.extend(va);
        r.extend(vr);
    }

    let mut out = Vec::new();
    for (i, stmt) in node.body.iter().enumerate() {
        let Stmt::Assign(assign) = stmt else {
            continue;
        };
        let line = assign.line;
        let target_has_condition_var = assign
            .targets
            .iter()
            .filter_map(target_name)
            .any(|n| condition_vars.contains(n));
        let rhs_has_condition_var = mentions_any_of(&assign.value, &condition_vars);

        if rhs_has_condition_var {
            continue;
        }

        if target_has_condition_var {
            if !matches!(assign.value.as_ref(), Expr::Name(_)) && disjoint_from(&assign.value, &a) {
                out.push(LiftInstruction {
                    body_index: i,
                    as_temporary: true,
                    line,
                    loop_index,
                    payload: LiftPayload::Expr((*assign.value).clone()),
                });
            }
        } else if lhs_names(&assign.targets).is_disjoint(&r) {
            out.push(LiftInstruction {
                body_index: i,
                as_temporary: false,
                line,
                loop_index,
                payload: LiftPayload::Stmt(stmt.clone()),
            });
        }
    }

    out
}
