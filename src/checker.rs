//! Semantic checker: name binding and type checking over the AST.
//!
//! Grounded on `Checker.py`'s `visit_*` methods, translated from
//! reflection-based dispatch to an exhaustive `match` per node kind (spec
//! §9 REDESIGN FLAGS). Every diagnostic is reported through the shared
//! [`Diagnostics`] handle and checking always continues -- there is no
//! early return on the first error (spec §4.6 item 5).

use std::rc::Rc;

use crate::ast::{
    ArrayDecl, Block, Decl, Expr, ExprKind, FuncDecl, Item, Param, Program, Stmt, VarDecl,
};
use crate::diagnostics::Diagnostics;
use crate::symbol::{Scope, SymbolError};
use crate::types::{check_binop, check_unaryop, Type};

/// The implicit top-level `main` a bare statement sequence is checked
/// against, matching `irgen/program.rs`'s `codegen_main` (`IrType::I32`).
fn synthetic_main_decl() -> Rc<Decl> {
    Rc::new(Decl::Func(FuncDecl {
        name: "main".to_string(),
        ret_ty: Type::Integer,
        params: Vec::new(),
        body: Block::default(),
        line: 0,
    }))
}

pub struct Checker<'d> {
    diags: &'d mut Diagnostics,
    /// Function whose body is currently being checked, used to validate
    /// `return` statements. Defaults to a synthetic top-level `main`
    /// (return type `integer`) since bare top-level statements form its
    /// body -- the same implicit-main convention `irgen/program.rs`'s
    /// `codegen_main` applies, so a top-level `return` is legal (spec.md's
    /// scenario 6 worked example returns a value at top level).
    current_fn: Rc<Decl>,
    block_counter: u32,
}

impl<'d> Checker<'d> {
    pub fn new(diags: &'d mut Diagnostics) -> Self {
        Checker {
            diags,
            current_fn: synthetic_main_decl(),
            block_counter: 0,
        }
    }

    /// Create the global scope and check every top-level item, per
    /// `Check.checker` in the teacher material.
    pub fn check_program(&mut self, program: &Program) -> Rc<Scope> {
        let global = Scope::root("global");
        for item in &program.items {
            match item {
                Item::Decl(decl) => self.check_decl(decl, &global),
                Item::Stmt(stmt) => self.check_stmt(stmt, &global),
            }
        }
        global
    }

    fn next_block_tag(&mut self) -> String {
        self.block_counter += 1;
        format!("block_{}", self.block_counter)
    }

    // ---- declarations ----------------------------------------------------

    fn check_decl(&mut self, decl: &Decl, env: &Rc<Scope>) {
        match decl {
            Decl::Var(v) => self.check_var_decl(v, env),
            Decl::Array(a) => self.check_array_decl(a, env),
            Decl::Func(f) => self.check_func_decl(f, env),
        }
    }

    fn bind(&mut self, env: &Scope, name: &str, decl: Rc<Decl>, line: u32, kind: &str) {
        match env.add(name, decl) {
            Ok(()) => {}
            Err(SymbolError::AlreadyDefined) => {
                self.diags
                    .report_at(format!("'{name}' is already declared"), line);
            }
            Err(SymbolError::Conflict) => {
                self.diags.report_at(
                    format!("'{name}' is already declared as a different {kind}"),
                    line,
                );
            }
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl, env: &Rc<Scope>) {
        if let Some(init) = &decl.init {
            self.check_expr(init, env);
            if let Some(ty) = init.ty() {
                if !decl.ty.is_compatible(&ty) {
                    self.diags.report_at(
                        format!(
                            "initializer for '{}' has type '{}', expected '{}'",
                            decl.name, ty, decl.ty
                        ),
                        decl.line,
                    );
                }
            }
        }
        self.bind(
            env,
            &decl.name,
            Rc::new(Decl::Var(decl.clone())),
            decl.line,
            "variable",
        );
    }

    fn check_array_decl(&mut self, decl: &ArrayDecl, env: &Rc<Scope>) {
        if decl.dims_written != 1 {
            self.diags.report_at(
                format!(
                    "array '{}' has {} dimensions, only one-dimensional arrays are supported",
                    decl.name, decl.dims_written
                ),
                decl.line,
            );
        }
        if !decl.size_is_positive_literal {
            self.diags.report_at(
                format!("array '{}' size must be a positive integer literal", decl.name),
                decl.line,
            );
        }
        if let Some(elems) = &decl.init {
            if elems.len() as u32 != decl.size && decl.size_is_positive_literal {
                self.diags.report_at(
                    format!(
                        "array '{}' declared with size {} but initialized with {} elements",
                        decl.name,
                        decl.size,
                        elems.len()
                    ),
                    decl.line,
                );
            }
            for elem in elems {
                self.check_expr(elem, env);
                if let Some(ty) = elem.ty() {
                    if !decl.elem_ty.is_compatible(&ty) {
                        self.diags.report_at(
                            format!(
                                "array '{}' element has type '{}', expected '{}'",
                                decl.name, ty, decl.elem_ty
                            ),
                            decl.line,
                        );
                    }
                }
            }
        }
        self.bind(
            env,
            &decl.name,
            Rc::new(Decl::Array(decl.clone())),
            decl.line,
            "array",
        );
    }

    fn check_func_decl(&mut self, decl: &FuncDecl, env: &Rc<Scope>) {
        let rc = Rc::new(Decl::Func(decl.clone()));
        self.bind(env, &decl.name, Rc::clone(&rc), decl.line, "function");

        let fn_scope = Scope::child(env, decl.name.clone());
        for param in &decl.params {
            self.bind_param(param, &fn_scope);
        }

        let prev = std::mem::replace(&mut self.current_fn, rc);
        for stmt in &decl.body.stmts {
            self.check_stmt(stmt, &fn_scope);
        }
        self.current_fn = prev;
    }

    fn bind_param(&mut self, param: &Param, env: &Scope) {
        let (name, line) = (param.name().to_string(), param.line());
        let pseudo = match param {
            Param::Var { ty, .. } => Decl::Var(VarDecl {
                name: name.clone(),
                ty: ty.clone(),
                init: None,
                line,
            }),
            Param::Array { elem_ty, .. } => Decl::Array(ArrayDecl {
                name: name.clone(),
                elem_ty: elem_ty.clone(),
                dims_written: 1,
                size: 0,
                size_is_positive_literal: false,
                init: None,
                line,
            }),
        };
        self.bind(env, &name, Rc::new(pseudo), line, "parameter");
    }

    // ---- statements --------------------------------------------------------

    fn check_stmt(&mut self, stmt: &Stmt, env: &Rc<Scope>) {
        match stmt {
            Stmt::Block(block) => {
                let tag = self.next_block_tag();
                let inner = Scope::child(env, tag);
                for s in &block.stmts {
                    self.check_stmt(s, &inner);
                }
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
                line,
            } => {
                self.check_expr(cond, env);
                self.require_boolean(cond, *line, "if condition");
                self.check_stmt(&Stmt::Block(then_block.clone()), env);
                if let Some(eb) = else_block {
                    self.check_stmt(&Stmt::Block(eb.clone()), env);
                }
            }
            Stmt::While { cond, body, line } => {
                self.check_expr(cond, env);
                self.require_boolean(cond, *line, "while condition");
                self.check_stmt(&Stmt::Block(body.clone()), env);
            }
            Stmt::DoWhile { body, cond, line } => {
                self.check_stmt(&Stmt::Block(body.clone()), env);
                self.check_expr(cond, env);
                self.require_boolean(cond, *line, "do-while condition");
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
                line: _,
            } => {
                let tag = self.next_block_tag();
                let for_scope = Scope::child(env, tag);
                if let Some(init) = init {
                    self.check_stmt(init, &for_scope);
                }
                if let Some(cond) = cond {
                    self.check_expr(cond, &for_scope);
                    self.require_boolean(cond, cond.line, "for condition");
                }
                if let Some(update) = update {
                    self.check_stmt(update, &for_scope);
                }
                self.check_stmt(&Stmt::Block(body.clone()), &for_scope);
            }
            Stmt::Return { expr, line } => self.check_return(expr.as_ref(), *line, env),
            Stmt::Assign {
                location,
                expr,
                line,
            } => {
                if !location.is_lvalue() {
                    self.diags
                        .report_at("left-hand side of assignment is not assignable", *line);
                }
                self.check_expr(location, env);
                self.check_expr(expr, env);
                if let (Some(lt), Some(rt)) = (location.ty(), expr.ty()) {
                    if !lt.is_compatible(&rt) {
                        self.diags.report_at(
                            format!("cannot assign '{}' to location of type '{}'", rt, lt),
                            *line,
                        );
                    }
                }
            }
            Stmt::ExprStmt { expr, .. } => self.check_expr(expr, env),
            Stmt::Print { expr, line } => {
                self.check_expr(expr, env);
                if let Some(ty) = expr.ty() {
                    if !ty.is_printable() {
                        self.diags
                            .report_at(format!("cannot print a value of type '{}'", ty), *line);
                    }
                }
            }
            Stmt::VarDecl(v) => self.check_var_decl(v, env),
            Stmt::ArrayDecl(a) => self.check_array_decl(a, env),
        }
    }

    fn require_boolean(&mut self, expr: &Expr, line: u32, context: &str) {
        match expr.ty() {
            Some(Type::Boolean) => {}
            Some(other) => self.diags.report_at(
                format!("{context} must be boolean, found '{other}'"),
                line,
            ),
            None => {}
        }
    }

    fn check_return(&mut self, expr: Option<&Expr>, line: u32, env: &Rc<Scope>) {
        let func = Rc::clone(&self.current_fn);
        let ret_ty = func.decl_type();
        let ret_ty = match &ret_ty {
            Type::Function(_, ret) => (**ret).clone(),
            other => other.clone(),
        };
        match expr {
            Some(e) => {
                self.check_expr(e, env);
                if let Some(actual) = e.ty() {
                    if !ret_ty.is_compatible(&actual) {
                        self.diags.report_at(
                            format!(
                                "function '{}' returns '{}' but this statement returns '{}'",
                                func.name(),
                                ret_ty,
                                actual
                            ),
                            line,
                        );
                    }
                }
            }
            None => {
                if ret_ty != Type::Void {
                    self.diags.report_at(
                        format!(
                            "function '{}' must return a value of type '{}'",
                            func.name(),
                            ret_ty
                        ),
                        line,
                    );
                }
            }
        }
    }

    // ---- expressions ---------------------------------------------------

    fn check_expr(&mut self, expr: &Expr, env: &Rc<Scope>) {
        match &*expr.kind {
            ExprKind::IntLit(_)
            | ExprKind::FloatLit(_)
            | ExprKind::CharLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BoolLit(_) => {
                // type already set at construction time (see `ast::Expr::new`)
            }
            ExprKind::BinOp { op, l, r } => {
                self.check_expr(l, env);
                self.check_expr(r, env);
                match (l.ty(), r.ty()) {
                    (Some(lt), Some(rt)) => match check_binop(*op, &lt, &rt) {
                        Some(result) => expr.set_ty(result),
                        None => self.diags.report_at(
                            format!("operator '{}' is not defined for '{}' and '{}'", op, lt, rt),
                            expr.line,
                        ),
                    },
                    _ => {}
                }
            }
            ExprKind::UnaryOp { op, x } => {
                self.check_expr(x, env);
                if let Some(xt) = x.ty() {
                    match check_unaryop(*op, &xt) {
                        Some(result) => expr.set_ty(result),
                        None => self.diags.report_at(
                            format!("unary operator '{}' is not defined for '{}'", op, xt),
                            expr.line,
                        ),
                    }
                }
            }
            ExprKind::PreInc(x) | ExprKind::PreDec(x) | ExprKind::PostInc(x) | ExprKind::PostDec(x) => {
                self.check_expr(x, env);
                if !x.is_lvalue() {
                    self.diags
                        .report_at("increment/decrement target must be assignable", expr.line);
                }
                match x.ty() {
                    Some(Type::Integer) => expr.set_ty(Type::Integer),
                    Some(Type::Float) => expr.set_ty(Type::Float),
                    Some(other) => self.diags.report_at(
                        format!("cannot increment/decrement a value of type '{}'", other),
                        expr.line,
                    ),
                    None => {}
                }
            }
            ExprKind::VarLoc(name) => match env.get(name) {
                Some(decl) => expr.set_ty(decl.decl_type()),
                None => self
                    .diags
                    .report_at(format!("'{name}' is not defined"), expr.line),
            },
            ExprKind::ArrayLoc { name, indices } => {
                for idx in indices {
                    self.check_expr(idx, env);
                    match idx.ty() {
                        Some(Type::Integer) => {}
                        Some(other) => self.diags.report_at(
                            format!("array index must be an integer, found '{}'", other),
                            expr.line,
                        ),
                        None => {}
                    }
                }
                match env.get(name) {
                    None => self
                        .diags
                        .report_at(format!("'{name}' is not defined"), expr.line),
                    Some(decl) => match decl.decl_type().as_array() {
                        Some((elem, _)) => expr.set_ty(elem.clone()),
                        None => self.diags.report_at(
                            format!("'{name}' is not an array"),
                            expr.line,
                        ),
                    },
                }
            }
            ExprKind::ArrayLit(elems) => {
                if elems.is_empty() {
                    self.diags
                        .report_at("array literal must not be empty", expr.line);
                    return;
                }
                self.check_expr(&elems[0], env);
                let Some(elem_ty) = elems[0].ty() else {
                    return;
                };
                for (i, elem) in elems.iter().enumerate().skip(1) {
                    self.check_expr(elem, env);
                    if let Some(ty) = elem.ty() {
                        if !elem_ty.is_compatible(&ty) {
                            self.diags.report_at(
                                format!(
                                    "array literal element {} has type '{}', expected '{}'",
                                    i + 1,
                                    ty,
                                    elem_ty
                                ),
                                expr.line,
                            );
                        }
                    }
                }
                expr.set_ty(Type::Array(Box::new(elem_ty), elems.len() as u32));
            }
            ExprKind::Call { name, args } => {
                for arg in args {
                    self.check_expr(arg, env);
                }
                match env.get(name) {
                    None => {
                        self.diags
                            .report_at(format!("'{name}' is not defined"), expr.line);
                    }
                    Some(decl) => match &*decl {
                        Decl::Func(f) => {
                            if f.params.len() != args.len() {
                                self.diags.report_at(
                                    format!(
                                        "'{}' expects {} argument(s), found {}",
                                        name,
                                        f.params.len(),
                                        args.len()
                                    ),
                                    expr.line,
                                );
                            } else {
                                for (i, (param, arg)) in f.params.iter().zip(args.iter()).enumerate() {
                                    if let Some(at) = arg.ty() {
                                        if !param.ty().is_compatible(&at) {
                                            self.diags.report_at(
                                                format!(
                                                    "argument {} of '{}': expected '{}', found '{}'",
                                                    i + 1,
                                                    name,
                                                    param.ty(),
                                                    at
                                                ),
                                                expr.line,
                                            );
                                        }
                                    }
                                }
                            }
                            expr.set_ty(f.ret_ty.clone());
                        }
                        _ => self
                            .diags
                            .report_at(format!("'{name}' is not a function"), expr.line),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn check(src: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let program = Parser::new(src, &mut diags).parse_program();
        Checker::new(&mut diags).check_program(&program);
        diags
    }

    #[test]
    fn undeclared_variable_is_reported() {
        let diags = check("print x;");
        assert!(diags.has_errors());
    }

    #[test]
    fn mismatched_var_initializer_is_reported() {
        let diags = check("a: integer = 3.0;");
        assert!(diags.has_errors());
    }

    #[test]
    fn well_typed_function_call_has_no_errors() {
        let diags = check(
            "add: function integer (x: integer, y: integer) = { return x + y; }\nprint add(1, 2);",
        );
        assert!(!diags.has_errors(), "{diags}");
    }

    #[test]
    fn wrong_argument_count_is_reported() {
        let diags = check(
            "add: function integer (x: integer, y: integer) = { return x + y; }\nprint add(1);",
        );
        assert!(diags.has_errors());
    }

    #[test]
    fn top_level_return_is_legal_against_the_implicit_main() {
        let diags = check("return 1;");
        assert!(!diags.has_errors(), "{diags}");
    }

    #[test]
    fn top_level_return_type_mismatch_is_reported() {
        let diags = check("return 1.5;");
        assert!(diags.has_errors());
    }

    #[test]
    fn return_type_mismatch_is_reported() {
        let diags = check("f: function integer () = { return 1.0; }");
        assert!(diags.has_errors());
    }

    #[test]
    fn if_condition_must_be_boolean() {
        let diags = check("if (1) print 1;");
        assert!(diags.has_errors());
    }

    #[test]
    fn shadowing_in_nested_block_is_legal() {
        let diags = check("x: integer = 1;\n{ x: float = 2.0; print x; }\nprint x;");
        assert!(!diags.has_errors(), "{diags}");
    }

    #[test]
    fn array_index_must_be_integer() {
        let diags = check("a: array[3] integer = {1,2,3};\nprint a[\"z\"];");
        assert!(diags.has_errors());
    }

    #[test]
    fn array_literal_element_type_mismatch_is_reported() {
        let diags = check("a: array[2] integer = {1, 2.0};");
        assert!(diags.has_errors());
    }

    #[test]
    fn non_integer_array_size_is_reported() {
        let diags = check("n: integer = 3;\na: array[n] integer;");
        assert!(diags.has_errors());
    }

    #[test]
    fn print_of_array_is_rejected() {
        let diags = check("a: array[2] integer = {1, 2};\nprint a;");
        assert!(diags.has_errors());
    }

    #[test]
    fn increment_target_must_be_lvalue() {
        let diags = check("print ++5;");
        assert!(diags.has_errors());
    }
}
