//! Factory functions for creating synthetic AST nodes.
//!
//! Used both by tests and by the hoisting pass, which mints fresh
//! `__o_tmp_<line>` assignments and `Name` references. Every factory here
//! takes the originating `line` explicitly - there is no "default" or
//! "dummy" line, since the line is what gives a hoisted temporary its name.

use crate::nodes::{
    BinOperator, Block, Callee, CmpOp, Constant, Expr, ExprBinOp, ExprCall, ExprCompare,
    ExprConstant, ExprName, ExprNamedExpr, ExprSubscript, ExprUnaryOp, StmtAssign, StmtAugAssign,
    StmtExpr, StmtFor, StmtFunctionDef, StmtIf, StmtPass, StmtReturn, StmtWhile, UnaryOperator,
};

/// The fixed prefix every hoisted temporary's name carries.
pub const TEMP_PREFIX: &str = "__o_tmp_";

#[must_use]
pub fn temp_name(line: u32) -> String {
    format!("{TEMP_PREFIX}{line}")
}

#[must_use]
pub fn name(line: u32, id: &str) -> Expr {
    Expr::Name(ExprName {
        line,
        id: id.to_string(),
    })
}

#[must_use]
pub fn expr_name(line: u32, id: &str) -> ExprName {
    ExprName {
        line,
        id: id.to_string(),
    }
}

#[must_use]
pub fn constant_int(line: u32, value: i64) -> Expr {
    Expr::Constant(ExprConstant {
        line,
        value: Constant::Int(value),
    })
}

#[must_use]
pub fn constant_bool(line: u32, value: bool) -> Expr {
    Expr::Constant(ExprConstant {
        line,
        value: Constant::Bool(value),
    })
}

#[must_use]
pub fn constant_none(line: u32) -> Expr {
    Expr::Constant(ExprConstant {
        line,
        value: Constant::None,
    })
}

#[must_use]
pub fn bin_op(line: u32, left: Expr, op: BinOperator, right: Expr) -> Expr {
    Expr::BinOp(ExprBinOp {
        line,
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

#[must_use]
pub fn unary_op(line: u32, op: UnaryOperator, operand: Expr) -> Expr {
    Expr::UnaryOp(ExprUnaryOp {
        line,
        op,
        operand: Box::new(operand),
    })
}

/// `not operand` - used by conditional normalisation to flip a test whose
/// then-branch became empty.
#[must_use]
pub fn negate(line: u32, operand: Expr) -> Expr {
    unary_op(line, UnaryOperator::Not, operand)
}

#[must_use]
pub fn compare(line: u32, left: Expr, ops: Vec<CmpOp>, comparators: Vec<Expr>) -> Expr {
    Expr::Compare(ExprCompare {
        line,
        left: Box::new(left),
        ops,
        comparators,
    })
}

#[must_use]
pub fn call(line: u32, func: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(ExprCall {
        line,
        func: Callee::Name(func.to_string()),
        args,
    })
}

#[must_use]
pub fn call_attr(line: u32, value: &str, attr: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(ExprCall {
        line,
        func: Callee::Attribute {
            value: value.to_string(),
            attr: attr.to_string(),
        },
        args,
    })
}

#[must_use]
pub fn subscript(line: u32, value: &str, slice: Expr) -> Expr {
    Expr::Subscript(ExprSubscript {
        line,
        value: Box::new(expr_name(line, value)),
        slice: Box::new(slice),
    })
}

#[must_use]
pub fn named_expr(line: u32, target: &str, value: Expr) -> Expr {
    Expr::NamedExpr(ExprNamedExpr {
        line,
        target: expr_name(line, target),
        value: Box::new(value),
    })
}

#[must_use]
pub fn assign(line: u32, targets: Vec<Expr>, value: Expr) -> crate::nodes::Stmt {
    crate::nodes::Stmt::Assign(StmtAssign {
        line,
        targets,
        value: Box::new(value),
    })
}

/// Single-target convenience wrapper over [`assign`].
#[must_use]
pub fn assign1(line: u32, target: &str, value: Expr) -> crate::nodes::Stmt {
    assign(line, vec![name(line, target)], value)
}

/// Synthesize `__o_tmp_<line> = value` - the statement the hoisting pass
/// inserts above a loop when only the right-hand side is lifted.
#[must_use]
pub fn temp_assign(line: u32, value: Expr) -> crate::nodes::Stmt {
    assign1(line, &temp_name(line), value)
}

#[must_use]
pub fn aug_assign(line: u32, target: Expr, op: BinOperator, value: Expr) -> crate::nodes::Stmt {
    crate::nodes::Stmt::AugAssign(StmtAugAssign {
        line,
        target: Box::new(target),
        op,
        value: Box::new(value),
    })
}

#[must_use]
pub fn expr_stmt(line: u32, value: Expr) -> crate::nodes::Stmt {
    crate::nodes::Stmt::Expr(StmtExpr {
        line,
        value: Box::new(value),
    })
}

#[must_use]
pub fn if_stmt(line: u32, test: Expr, body: Block, orelse: Block) -> crate::nodes::Stmt {
    crate::nodes::Stmt::If(StmtIf {
        line,
        test: Box::new(test),
        body,
        orelse,
    })
}

#[must_use]
pub fn for_stmt(
    line: u32,
    target: &str,
    iter: Expr,
    body: Block,
    orelse: Block,
) -> crate::nodes::Stmt {
    crate::nodes::Stmt::For(StmtFor {
        line,
        target: expr_name(line, target),
        iter: Box::new(iter),
        body,
        orelse,
    })
}

#[must_use]
pub fn while_stmt(line: u32, test: Expr, body: Block, orelse: Block) -> crate::nodes::Stmt {
    crate::nodes::Stmt::While(StmtWhile {
        line,
        test: Box::new(test),
        body,
        orelse,
    })
}

#[must_use]
pub fn return_stmt(line: u32, value: Option<Expr>) -> crate::nodes::Stmt {
    crate::nodes::Stmt::Return(StmtReturn {
        line,
        value: value.map(Box::new),
    })
}

#[must_use]
pub fn function_def(line: u32, name: &str, args: Vec<&str>, body: Block) -> crate::nodes::Stmt {
    crate::nodes::Stmt::FunctionDef(StmtFunctionDef {
        line,
        name: name.to_string(),
        args: args.into_iter().map(str::to_string).collect(),
        body,
    })
}

#[must_use]
pub fn pass_stmt(line: u32) -> crate::nodes::Stmt {
    crate::nodes::Stmt::Pass(StmtPass { line })
}

/// Back-fill an empty block with a single `Pass`, as the normalisation
/// invariants in the data model require for every block but `Module::body`.
pub fn ensure_nonempty(block: &mut Block, line: u32) {
    if block.is_empty() {
        block.push(pass_stmt(line));
    }
}
