//! Variant definitions for the statement and expression trees.
//!
//! Every node carries the `line` it originated from (1-based, matching the
//! source the external parser read). `__o_tmp_<line>` temporaries minted by
//! the hoisting pass are derived from this field, so it is load-bearing, not
//! just diagnostic metadata.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered, mutable sequence of statements.
///
/// Bodies of `If`/`For`/`While`/`FunctionDef`/`Try` are never empty once a
/// pipeline invocation has finished normalizing the tree - empty ones are
/// back-filled with `Pass`. `Module::body` is the one exception: an empty
/// module is a legal, fully-optimized program.
pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Module {
    pub body: Block,
}

impl Module {
    #[must_use]
    pub fn new(body: Block) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    Assign(StmtAssign),
    AugAssign(StmtAugAssign),
    Expr(StmtExpr),
    If(StmtIf),
    For(StmtFor),
    While(StmtWhile),
    Return(StmtReturn),
    FunctionDef(StmtFunctionDef),
    Try(StmtTry),
    Pass(StmtPass),
}

impl Stmt {
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Assign(s) => s.line,
            Stmt::AugAssign(s) => s.line,
            Stmt::Expr(s) => s.line,
            Stmt::If(s) => s.line,
            Stmt::For(s) => s.line,
            Stmt::While(s) => s.line,
            Stmt::Return(s) => s.line,
            Stmt::FunctionDef(s) => s.line,
            Stmt::Try(s) => s.line,
            Stmt::Pass(s) => s.line,
        }
    }
}

/// Chained assignment `a = b = v`. `targets` holds every target-expr in
/// source order; each must be a `Name` or `Subscript`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtAssign {
    pub line: u32,
    pub targets: Vec<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitOr,
    BitAnd,
    BitXor,
    LShift,
    RShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOperator {
    Not,
    USub,
    UAdd,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
}

/// In-place update `target op= value`. `target` must be a `Name` or
/// `Subscript` (never a chained sequence).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtAugAssign {
    pub line: u32,
    pub target: Box<Expr>,
    pub op: BinOperator,
    pub value: Box<Expr>,
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtExpr {
    pub line: u32,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtIf {
    pub line: u32,
    pub test: Box<Expr>,
    pub body: Block,
    pub orelse: Block,
}

/// `for target in iter: body` / `else: orelse`. `target` is always a bare
/// name; destructuring targets are outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtFor {
    pub line: u32,
    pub target: ExprName,
    pub iter: Box<Expr>,
    pub body: Block,
    pub orelse: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtWhile {
    pub line: u32,
    pub test: Box<Expr>,
    pub body: Block,
    pub orelse: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtReturn {
    pub line: u32,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtFunctionDef {
    pub line: u32,
    pub name: String,
    pub args: Vec<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExceptHandler {
    pub line: u32,
    /// `None` for a bare `except:`.
    pub exc_type: Option<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtTry {
    pub line: u32,
    pub body: Block,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Block,
    pub finalbody: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StmtPass {
    pub line: u32,
}

/// The callee of a `Call`. Calls are only modeled when the callee resolves
/// to a bare name, or - in the narrow `Assign.value` position the dead-code
/// pass inspects - a one-level dotted attribute access (`m.f(...)`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Callee {
    Name(String),
    Attribute { value: String, attr: String },
}

impl Callee {
    #[must_use]
    pub fn root_name(&self) -> &str {
        match self {
            Callee::Name(n) | Callee::Attribute { value: n, .. } => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    Int(i64),
    Float(OrderedFloat),
    Str(String),
    Bool(bool),
    None,
}

/// Thin `f64` wrapper so `Constant` can derive `Eq`; constants in this
/// subset are never used for numeric comparison, only identity/equality of
/// the literal as written.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderedFloat(pub f64);

impl Eq for OrderedFloat {}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprName {
    pub line: u32,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprConstant {
    pub line: u32,
    pub value: Constant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprBinOp {
    pub line: u32,
    pub left: Box<Expr>,
    pub op: BinOperator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprUnaryOp {
    pub line: u32,
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprCompare {
    pub line: u32,
    pub left: Box<Expr>,
    pub ops: Vec<CmpOp>,
    pub comparators: Vec<Expr>,
}

/// `func(args...)`. Only bare-name callees are supported; see [`Callee`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprCall {
    pub line: u32,
    pub func: Callee,
    pub args: Vec<Expr>,
}

/// `value[slice]`. `value` is restricted to a bare name - this subset has
/// no nested subscripts like `a[i][j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprSubscript {
    pub line: u32,
    pub value: Box<ExprName>,
    pub slice: Box<Expr>,
}

/// `target := value` - the walrus operator. Assigns `target` and yields
/// `value` as the expression's result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprNamedExpr {
    pub line: u32,
    pub target: ExprName,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comprehension {
    pub target: ExprName,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
}

/// `[elt for target in iter if ifs...]` - the single list-comprehension
/// form this subset supports (one generator clause).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExprListComp {
    pub line: u32,
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    Name(ExprName),
    Constant(ExprConstant),
    BinOp(ExprBinOp),
    UnaryOp(ExprUnaryOp),
    Compare(ExprCompare),
    Call(ExprCall),
    Subscript(ExprSubscript),
    NamedExpr(ExprNamedExpr),
    ListComp(ExprListComp),
}

impl Expr {
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Expr::Name(e) => e.line,
            Expr::Constant(e) => e.line,
            Expr::BinOp(e) => e.line,
            Expr::UnaryOp(e) => e.line,
            Expr::Compare(e) => e.line,
            Expr::Call(e) => e.line,
            Expr::Subscript(e) => e.line,
            Expr::NamedExpr(e) => e.line,
            Expr::ListComp(e) => e.line,
        }
    }

    /// A target-expr is a `Name` or `Subscript`; both are legal assignment
    /// and aug-assignment targets.
    #[must_use]
    pub fn is_target_expr(&self) -> bool {
        matches!(self, Expr::Name(_) | Expr::Subscript(_))
    }

    #[must_use]
    pub fn as_name(&self) -> Option<&ExprName> {
        match self {
            Expr::Name(n) => Some(n),
            _ => None,
        }
    }
}
