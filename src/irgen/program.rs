//! Program-level lowering: the two-pass entry point, global variable
//! storage, function bodies, and the implicit `main`.
//!
//! Grounded on `codegen/program.rs`'s `codegen_program` shape (predeclare
//! signatures, then lower every top-level item, then assemble the module)
//! and on spec §4.7 item 2's global-scope rule: a global gets a zero
//! initializer and its declared initializer is written at the start of
//! `main` rather than as a true LLVM constant initializer.

use crate::ast::{ArrayDecl, Decl, FuncDecl, Item, Param, Program, Stmt, VarDecl};
use crate::ir::{FunctionBuilder, IrType, Value};
use crate::types::Type;

use super::control_flow;
use super::types::{lower, lower_params};
use super::{CodeGenError, FuncSig, IrGen};

enum PendingGlobalInit<'a> {
    Var(&'a VarDecl),
    Array(&'a ArrayDecl),
}

impl IrGen {
    pub(super) fn codegen_program(&mut self, program: &Program) -> Result<(), CodeGenError> {
        for item in &program.items {
            if let Item::Decl(Decl::Func(f)) = item {
                self.functions.insert(
                    f.name.clone(),
                    FuncSig {
                        params: f.params.iter().map(Param::ty).collect(),
                        ret: f.ret_ty.clone(),
                    },
                );
            }
        }

        let mut pending_inits = Vec::new();
        let mut main_stmts = Vec::new();

        for item in &program.items {
            match item {
                Item::Decl(Decl::Var(v)) => {
                    self.declare_global_var(v);
                    if v.init.is_some() {
                        pending_inits.push(PendingGlobalInit::Var(v));
                    }
                }
                Item::Decl(Decl::Array(a)) => {
                    self.declare_global_array(a);
                    if a.init.is_some() {
                        pending_inits.push(PendingGlobalInit::Array(a));
                    }
                }
                Item::Decl(Decl::Func(f)) => self.codegen_function(f)?,
                Item::Stmt(s) => main_stmts.push(s),
            }
        }

        self.codegen_main(&pending_inits, &main_stmts)
    }

    fn declare_global_var(&mut self, decl: &VarDecl) {
        let ir_ty = lower(&decl.ty);
        let name = format!("@{}", decl.name);
        self.module
            .add_global(format!("{} = global {} {}", name, ir_ty, zero_const(&ir_ty)));
        self.define_var(&decl.name, Value::new(name, ir_ty.ptr()), decl.ty.clone());
    }

    fn declare_global_array(&mut self, decl: &ArrayDecl) {
        let ir_elem_ty = lower(&decl.elem_ty);
        let ir_arr_ty = IrType::Array(Box::new(ir_elem_ty), decl.size);
        let name = format!("@{}", decl.name);
        self.module.add_global(format!(
            "{} = global {} {}",
            name,
            ir_arr_ty,
            zero_const(&ir_arr_ty)
        ));
        let arr_ty = Type::Array(Box::new(decl.elem_ty.clone()), decl.size);
        self.define_var(&decl.name, Value::new(name, ir_arr_ty.ptr()), arr_ty);
    }

    /// Lower one user-defined function: entry-block allocas for by-value
    /// params, the body, then a default return if the body falls off the
    /// end without terminating every path (spec §4.7 item 3).
    fn codegen_function(&mut self, f: &FuncDecl) -> Result<(), CodeGenError> {
        let param_types: Vec<Type> = f.params.iter().map(Param::ty).collect();
        let ir_param_types = lower_params(&param_types);
        let ir_params: Vec<(String, IrType)> = f
            .params
            .iter()
            .zip(ir_param_types)
            .map(|(p, t)| (p.name().to_string(), t))
            .collect();
        let ret_ty = lower(&f.ret_ty);

        self.current_fn = Some(FunctionBuilder::new(f.name.clone(), ret_ty.clone(), ir_params));
        self.current_fn_ret_ty = f.ret_ty.clone();
        self.push_scope();

        for (i, p) in f.params.iter().enumerate() {
            let pv = self.builder().param_value(i);
            match p {
                Param::Var { name, ty, .. } => {
                    let ir_ty = lower(ty);
                    let slot = self.builder().alloca(&ir_ty);
                    self.builder().store(&pv, &slot);
                    self.define_var(name, slot, ty.clone());
                }
                // Array parameters decay to a bare pointer; BMinor has no
                // by-value array passing (spec §4.6 / glossary "Array").
                Param::Array { name, elem_ty, .. } => {
                    self.define_var(name, pv, Type::Array(Box::new(elem_ty.clone()), 0));
                }
            }
        }

        control_flow::lower_block(self, &f.body)?;
        if !self.builder().current_block_terminated() {
            insert_default_return(self.builder(), &ret_ty);
        }

        self.pop_scope();
        let rendered = self.current_fn.take().expect("just set above").render();
        self.module.add_function(rendered);
        Ok(())
    }

    /// The statements written at top level form the body of an implicit
    /// `main` (spec §4.4 / ast.rs's `Item` doc comment). Global initializers
    /// are written here too, per spec §4.7 item 2's "synthetic entry of
    /// `main`" allowance.
    fn codegen_main(
        &mut self,
        pending_inits: &[PendingGlobalInit],
        stmts: &[&Stmt],
    ) -> Result<(), CodeGenError> {
        self.current_fn = Some(FunctionBuilder::new("main", IrType::I32, Vec::new()));
        self.current_fn_ret_ty = Type::Integer;
        self.push_scope();

        for pending in pending_inits {
            match pending {
                PendingGlobalInit::Var(v) => {
                    let init = v.init.as_ref().expect("queued only when init is present");
                    let val = self.lower_expr(init)?;
                    let slot = self
                        .lookup_var(&v.name)
                        .expect("predeclared above")
                        .ptr
                        .clone();
                    self.builder().store(&val, &slot);
                }
                PendingGlobalInit::Array(a) => {
                    let elems = a.init.as_ref().expect("queued only when init is present");
                    let ir_elem_ty = lower(&a.elem_ty);
                    let slot = self
                        .lookup_var(&a.name)
                        .expect("predeclared above")
                        .ptr
                        .clone();
                    for (i, elem) in elems.iter().enumerate() {
                        let v = self.lower_expr(elem)?;
                        let idx = Value::int(i as i32);
                        let addr = self.builder().gep_array_index(&slot, &ir_elem_ty, &idx);
                        self.builder().store(&v, &addr);
                    }
                }
            }
        }

        for stmt in stmts {
            self.lower_stmt(stmt)?;
            if self.builder().current_block_terminated() {
                break;
            }
        }
        if !self.builder().current_block_terminated() {
            self.builder().ret(Some(&Value::int(0)));
        }

        self.pop_scope();
        let rendered = self.current_fn.take().expect("just set above").render();
        self.module.add_function(rendered);
        Ok(())
    }
}

fn insert_default_return(builder: &mut FunctionBuilder, ret_ty: &IrType) {
    match ret_ty {
        IrType::Void => builder.ret(None),
        other => {
            let v = zero_value(other);
            builder.ret(Some(&v));
        }
    }
}

fn zero_value(ty: &IrType) -> Value {
    match ty {
        IrType::I1 => Value::bool(false),
        IrType::I8 => Value::char(0),
        IrType::I32 => Value::int(0),
        IrType::Double => Value::float(0.0),
        IrType::Ptr(_) => Value::new("null", ty.clone()),
        IrType::Array(..) => Value::new("zeroinitializer", ty.clone()),
        IrType::Void => unreachable!("void has no zero value"),
    }
}

fn zero_const(ty: &IrType) -> String {
    match ty {
        IrType::I1 | IrType::I8 | IrType::I32 => "0".to_string(),
        IrType::Double => Value::float(0.0).text,
        IrType::Ptr(_) => "null".to_string(),
        IrType::Array(..) => "zeroinitializer".to_string(),
        IrType::Void => unreachable!("void has no zero constant"),
    }
}
