//! Free-variable collection over expression trees.
//!
//! A "variable reference" is any `Name`, including the `Name` nested inside
//! a `Subscript.value` - since `Subscript.value` is itself always a `Name`
//! in this subset, a single recursive walk already picks it up without
//! special-casing `Subscript`.

use rustc_hash::FxHashSet;

use crate::nodes::{Comprehension, Expr};

/// Insert every name referenced anywhere inside `expr` into `out`.
pub fn collect_free_vars(expr: &Expr, out: &mut FxHashSet<String>) {
    match expr {
        Expr::Name(n) => {
            out.insert(n.id.clone());
        }
        Expr::Constant(_) => {}
        Expr::BinOp(b) => {
            collect_free_vars(&b.left, out);
            collect_free_vars(&b.right, out);
        }
        Expr::UnaryOp(u) => collect_free_vars(&u.operand, out),
        Expr::Compare(c) => {
            collect_free_vars(&c.left, out);
            for comparator in &c.comparators {
                collect_free_vars(comparator, out);
            }
        }
        Expr::Call(call) => {
            out.insert(call.func.root_name().to_string());
            for arg in &call.args {
                collect_free_vars(arg, out);
            }
        }
        Expr::Subscript(s) => {
            out.insert(s.value.id.clone());
            collect_free_vars(&s.slice, out);
        }
        Expr::NamedExpr(n) => {
            out.insert(n.target.id.clone());
            collect_free_vars(&n.value, out);
        }
        Expr::ListComp(lc) => {
            collect_free_vars(&lc.elt, out);
            for Comprehension { target, iter, ifs } in &lc.generators {
                out.insert(target.id.clone());
                collect_free_vars(iter, out);
                for cond in ifs {
                    collect_free_vars(cond, out);
                }
            }
        }
    }
}

/// The name a target-expr (`Name` or `Subscript`) ultimately binds/updates.
/// Returns `None` for anything else.
#[must_use]
pub fn target_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Name(n) => Some(&n.id),
        Expr::Subscript(s) => Some(&s.value.id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::*;

    #[test]
    fn collects_names_through_subscript_and_call() {
        let expr = call(1, "f", vec![subscript(1, "a", name(1, "i"))]);
        let mut out = FxHashSet::default();
        collect_free_vars(&expr, &mut out);
        let mut names: Vec<_> = out.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["a", "f", "i"]);
    }

    #[test]
    fn target_name_unwraps_subscript() {
        let t = subscript(3, "a", name(3, "i"));
        assert_eq!(target_name(&t), Some("a"));
        assert_eq!(target_name(&name(3, "x")), Some("x"));
        assert_eq!(target_name(&constant_int(3, 1)), None);
    }
}
