//! Renders a [`pyfold_ast::Module`] back to source text.
//!
//! This crate plays the role of the external unparser the optimizer treats
//! as a fixed collaborator (see the front-end glue notes in the project
//! spec): it is not itself part of the optimization logic, only a faithful
//! renderer the driver and CLI both depend on.
//!
//! [`Generator::generate`] produces ordinary, human-readable source.
//! [`normalize`] and [`fixed_point_repr`] additionally strip whitespace that
//! carries no semantic meaning, which is what the fixed-point driver diffs
//! on to decide whether another pass would change anything.

use std::fmt::Write as _;

use pyfold_ast::{
    BinOperator, Block, Callee, CmpOp, Comprehension, Constant, Expr, Module, Stmt, UnaryOperator,
};

/// Indentation unit. Four spaces, matching the convention the source
/// language's own formatter uses.
const INDENT: &str = "    ";

/// Recursive-descent source generator.
///
/// Mirrors the shape of a `Stylist`-driven code generator: stateless aside
/// from the output buffer, one method per node family.
#[derive(Debug, Default)]
pub struct Generator {
    buf: String,
    indent_level: usize,
}

impl Generator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generate(module: &Module) -> String {
        let mut gen = Self::new();
        gen.block(&module.body);
        gen.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buf.push_str(INDENT);
        }
    }

    fn block(&mut self, block: &Block) {
        for stmt in block {
            self.stmt(stmt);
        }
    }

    fn indented_block(&mut self, block: &Block) {
        self.indent_level += 1;
        self.block(block);
        self.indent_level -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Assign(s) => {
                for target in &s.targets {
                    self.expr(target);
                    self.buf.push_str(" = ");
                }
                self.expr(&s.value);
                self.buf.push('\n');
            }
            Stmt::AugAssign(s) => {
                self.expr(&s.target);
                let _ = write!(self.buf, " {}= ", op_token(s.op));
                self.expr(&s.value);
                self.buf.push('\n');
            }
            Stmt::Expr(s) => {
                self.expr(&s.value);
                self.buf.push('\n');
            }
            Stmt::If(s) => {
                self.buf.push_str("if ");
                self.expr(&s.test);
                self.buf.push_str(":\n");
                self.indented_block(&s.body);
                if !s.orelse.is_empty() {
                    self.write_indent();
                    self.buf.push_str("else:\n");
                    self.indented_block(&s.orelse);
                }
            }
            Stmt::For(s) => {
                let _ = write!(self.buf, "for {} in ", s.target.id);
                self.expr(&s.iter);
                self.buf.push_str(":\n");
                self.indented_block(&s.body);
                if !s.orelse.is_empty() {
                    self.write_indent();
                    self.buf.push_str("else:\n");
                    self.indented_block(&s.orelse);
                }
            }
            Stmt::While(s) => {
                self.buf.push_str("while ");
                self.expr(&s.test);
                self.buf.push_str(":\n");
                self.indented_block(&s.body);
                if !s.orelse.is_empty() {
                    self.write_indent();
                    self.buf.push_str("else:\n");
                    self.indented_block(&s.orelse);
                }
            }
            Stmt::Return(s) => {
                self.buf.push_str("return");
                if let Some(value) = &s.value {
                    self.buf.push(' ');
                    self.expr(value);
                }
                self.buf.push('\n');
            }
            Stmt::FunctionDef(s) => {
                let _ = write!(self.buf, "def {}({}):\n", s.name, s.args.join(", "));
                self.indented_block(&s.body);
            }
            Stmt::Try(s) => {
                self.buf.push_str("try:\n");
                self.indented_block(&s.body);
                for handler in &s.handlers {
                    self.write_indent();
                    match &handler.exc_type {
                        Some(ty) => {
                            let _ = write!(self.buf, "except {ty}:\n");
                        }
                        None => self.buf.push_str("except:\n"),
                    }
                    self.indented_block(&handler.body);
                }
                if !s.orelse.is_empty() {
                    self.write_indent();
                    self.buf.push_str("else:\n");
                    self.indented_block(&s.orelse);
                }
                if !s.finalbody.is_empty() {
                    self.write_indent();
                    self.buf.push_str("finally:\n");
                    self.indented_block(&s.finalbody);
                }
            }
            Stmt::Pass(_) => {
                self.buf.push_str("pass\n");
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(n) => self.buf.push_str(&n.id),
            Expr::Constant(c) => self.constant(&c.value),
            Expr::BinOp(b) => {
                self.expr(&b.left);
                let _ = write!(self.buf, " {} ", op_symbol(b.op));
                self.expr(&b.right);
            }
            Expr::UnaryOp(u) => {
                self.buf.push_str(unary_token(u.op));
                self.expr(&u.operand);
            }
            Expr::Compare(c) => {
                self.expr(&c.left);
                for (op, comparator) in c.ops.iter().zip(&c.comparators) {
                    let _ = write!(self.buf, " {} ", cmp_token(*op));
                    self.expr(comparator);
                }
            }
            Expr::Call(call) => {
                match &call.func {
                    Callee::Name(n) => self.buf.push_str(n),
                    Callee::Attribute { value, attr } => {
                        let _ = write!(self.buf, "{value}.{attr}");
                    }
                }
                self.buf.push('(');
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.buf.push(')');
            }
            Expr::Subscript(s) => {
                self.buf.push_str(&s.value.id);
                self.buf.push('[');
                self.expr(&s.slice);
                self.buf.push(']');
            }
            Expr::NamedExpr(n) => {
                let _ = write!(self.buf, "({} := ", n.target.id);
                self.expr(&n.value);
                self.buf.push(')');
            }
            Expr::ListComp(lc) => {
                self.buf.push('[');
                self.expr(&lc.elt);
                for Comprehension { target, iter, ifs } in &lc.generators {
                    let _ = write!(self.buf, " for {} in ", target.id);
                    self.expr(iter);
                    for cond in ifs {
                        self.buf.push_str(" if ");
                        self.expr(cond);
                    }
                }
                self.buf.push(']');
            }
        }
    }

    fn constant(&mut self, value: &Constant) {
        match value {
            Constant::Int(i) => {
                let _ = write!(self.buf, "{i}");
            }
            Constant::Float(f) => {
                let _ = write!(self.buf, "{}", f.0);
            }
            Constant::Str(s) => {
                let _ = write!(self.buf, "{s:?}");
            }
            Constant::Bool(b) => {
                self.buf.push_str(if *b { "True" } else { "False" });
            }
            Constant::None => self.buf.push_str("None"),
        }
    }
}

fn op_symbol(op: BinOperator) -> &'static str {
    match op {
        BinOperator::Add => "+",
        BinOperator::Sub => "-",
        BinOperator::Mult => "*",
        BinOperator::Div => "/",
        BinOperator::FloorDiv => "//",
        BinOperator::Mod => "%",
        BinOperator::Pow => "**",
        BinOperator::BitOr => "|",
        BinOperator::BitAnd => "&",
        BinOperator::BitXor => "^",
        BinOperator::LShift => "<<",
        BinOperator::RShift => ">>",
    }
}

/// Same token set as [`op_symbol`], used as the `op=` spelling in an
/// aug-assign; kept separate so the two call sites stay readable.
fn op_token(op: BinOperator) -> &'static str {
    op_symbol(op)
}

fn unary_token(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Not => "not ",
        UnaryOperator::USub => "-",
        UnaryOperator::UAdd => "+",
        UnaryOperator::Invert => "~",
    }
}

fn cmp_token(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "==",
        CmpOp::NotEq => "!=",
        CmpOp::Lt => "<",
        CmpOp::LtE => "<=",
        CmpOp::Gt => ">",
        CmpOp::GtE => ">=",
        CmpOp::In => "in",
        CmpOp::NotIn => "not in",
        CmpOp::Is => "is",
        CmpOp::IsNot => "is not",
    }
}

/// Strip blank lines and leading/trailing whitespace, per the
/// whitespace-normalising unparse the fixed-point driver relies on for its
/// termination guarantee.
#[must_use]
pub fn normalize(source: &str) -> String {
    let mut out = String::new();
    for line in source.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            out.push('\n');
        }
    }
    out
}

/// The representation the fixed-point driver diffs: render, then normalize.
#[must_use]
pub fn fixed_point_repr(module: &Module) -> String {
    normalize(&Generator::generate(module))
}
