//! Typed AST nodes.
//!
//! Spec §9's REDESIGN FLAGS call out the reference implementation's `Node`
//! base class with reflection-based `accept`/`visit_<ClassName>` dispatch.
//! Here every node kind is a variant of a tagged `enum`; the checker and the
//! IR generator each do a single exhaustive `match` over it, so missing a
//! node kind is a compile error instead of a silent no-op.
//!
//! Every expression carries a `RefCell<Option<Type>>` slot: unset at parse
//! time, written once by the checker, read by the IR generator. A `Cell`
//! would be the more common choice for a `Copy` payload, but `Type` owns a
//! `Box` for array/function types, so `RefCell` is used instead.

use std::cell::RefCell;

use crate::types::{BinOp, Type, UnOp};

/// A top-level item: the grammar is permissive and accepts both
/// declarations and bare statements at the top level (the statements form
/// the body of an implicit `main`), per spec §4.4.
#[derive(Debug, Clone)]
pub enum Item {
    Decl(Decl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Array(ArrayDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Var(d) => &d.name,
            Decl::Array(d) => &d.name,
            Decl::Func(d) => &d.name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Decl::Var(d) => d.line,
            Decl::Array(d) => d.line,
            Decl::Func(d) => d.line,
        }
    }

    /// The type this declaration binds its name to: the variable's type,
    /// the array type, or the function's signature type.
    pub fn decl_type(&self) -> Type {
        match self {
            Decl::Var(d) => d.ty.clone(),
            Decl::Array(d) => Type::Array(Box::new(d.elem_ty.clone()), d.size),
            Decl::Func(d) => Type::Function(
                d.params.iter().map(Param::ty).collect(),
                Box::new(d.ret_ty.clone()),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub init: Option<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub elem_ty: Type,
    /// Number of dimensions as written by the user; the checker accepts
    /// only 1 and reports an error for anything else (spec §4.6 item 2).
    pub dims_written: usize,
    pub size: u32,
    /// Whether the written dimension expression was a positive integer
    /// literal; if not, the checker reports it (spec §4.6 item 2 / §7).
    pub size_is_positive_literal: bool,
    pub init: Option<Vec<Expr>>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub ret_ty: Type,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub enum Param {
    Var { name: String, ty: Type, line: u32 },
    Array {
        name: String,
        elem_ty: Type,
        dims_written: usize,
        line: u32,
    },
}

impl Param {
    pub fn name(&self) -> &str {
        match self {
            Param::Var { name, .. } => name,
            Param::Array { name, .. } => name,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Param::Var { line, .. } => *line,
            Param::Array { line, .. } => *line,
        }
    }

    /// The type used for name binding. Array parameters of unknown size are
    /// bound as `array[0] of T` -- a placeholder the checker never needs to
    /// compare for size, only for element type and array-ness.
    pub fn ty(&self) -> Type {
        match self {
            Param::Var { ty, .. } => ty.clone(),
            Param::Array { elem_ty, .. } => Type::Array(Box::new(elem_ty.clone()), 0),
        }
    }
}

/// A block of statements. Every branch target of `If`, every loop body, and
/// every function body is normalized to this at parse time (spec §3.2
/// invariant): a single statement becomes a one-element block, a bare list
/// becomes a block wrapping it, a missing `else` stays `None` rather than
/// becoming an empty block.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Block),
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
        line: u32,
    },
    While {
        cond: Expr,
        body: Block,
        line: u32,
    },
    DoWhile {
        body: Block,
        cond: Expr,
        line: u32,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Block,
        line: u32,
    },
    Return {
        expr: Option<Expr>,
        line: u32,
    },
    Assign {
        location: Expr,
        expr: Expr,
        line: u32,
    },
    ExprStmt {
        expr: Expr,
        line: u32,
    },
    Print {
        expr: Expr,
        line: u32,
    },
    VarDecl(VarDecl),
    ArrayDecl(ArrayDecl),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Block(_) => 0,
            Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::DoWhile { line, .. }
            | Stmt::For { line, .. }
            | Stmt::Return { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::ExprStmt { line, .. }
            | Stmt::Print { line, .. } => *line,
            Stmt::VarDecl(d) => d.line,
            Stmt::ArrayDecl(d) => d.line,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    BinOp { op: BinOp, l: Expr, r: Expr },
    UnaryOp { op: UnOp, x: Expr },
    PreInc(Expr),
    PreDec(Expr),
    PostInc(Expr),
    PostDec(Expr),
    Call { name: String, args: Vec<Expr> },
    VarLoc(String),
    ArrayLoc { name: String, indices: Vec<Expr> },
    ArrayLit(Vec<Expr>),
    IntLit(i32),
    FloatLit(f64),
    CharLit(u8),
    StringLit(String),
    BoolLit(bool),
}

/// An expression node. Wraps the payload in `Box` (via the enum's own
/// `Box`ed recursive fields) plus a line number and the mutable type slot
/// described above.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: Box<ExprKind>,
    pub line: u32,
    ty: RefCell<Option<Type>>,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        let ty = match &kind {
            ExprKind::IntLit(_) => Some(Type::Integer),
            ExprKind::FloatLit(_) => Some(Type::Float),
            ExprKind::CharLit(_) => Some(Type::Char),
            ExprKind::StringLit(_) => Some(Type::String),
            ExprKind::BoolLit(_) => Some(Type::Boolean),
            _ => None,
        };
        Expr {
            kind: Box::new(kind),
            line,
            ty: RefCell::new(ty),
        }
    }

    pub fn ty(&self) -> Option<Type> {
        self.ty.borrow().clone()
    }

    pub fn set_ty(&self, ty: Type) {
        *self.ty.borrow_mut() = Some(ty);
    }

    /// `VarLoc` and `ArrayLoc` are the only lvalues in BMinor (spec
    /// glossary: "Lvalue").
    pub fn is_lvalue(&self) -> bool {
        matches!(*self.kind, ExprKind::VarLoc(_) | ExprKind::ArrayLoc { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_types_are_set_at_construction() {
        let e = Expr::new(ExprKind::IntLit(5), 1);
        assert_eq!(e.ty(), Some(Type::Integer));
    }

    #[test]
    fn non_literal_type_is_unset_until_checker_runs() {
        let e = Expr::new(ExprKind::VarLoc("x".to_string()), 1);
        assert_eq!(e.ty(), None);
        e.set_ty(Type::Integer);
        assert_eq!(e.ty(), Some(Type::Integer));
    }

    #[test]
    fn lvalue_classification() {
        let var = Expr::new(ExprKind::VarLoc("x".to_string()), 1);
        let lit = Expr::new(ExprKind::IntLit(1), 1);
        assert!(var.is_lvalue());
        assert!(!lit.is_lvalue());
    }
}
