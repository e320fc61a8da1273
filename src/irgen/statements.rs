//! Statement lowering: one arm per [`Stmt`] variant.
//!
//! Control-flow-bearing statements delegate straight to `control_flow.rs`;
//! everything else is lowered directly here. Grounded on `codegen/statements.rs`'s
//! per-statement dispatch and on `irgen.py`'s `visit_*` family for the forms
//! it implements (`Return`, `Assign`/`Location`, `Print`, declarations).

use crate::ast::{ArrayDecl, Expr, Stmt, VarDecl};
use crate::ir::{IrType, Value};
use crate::types::Type;

use super::control_flow;
use super::types::{lower, printf_format_for};
use super::{CodeGenError, IrGen};

impl IrGen {
    pub(super) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CodeGenError> {
        match stmt {
            Stmt::Block(block) => control_flow::lower_block(self, block),
            Stmt::If {
                cond,
                then_block,
                else_block,
                line,
            } => control_flow::lower_if(self, cond, then_block, else_block.as_ref(), *line),
            Stmt::While { cond, body, .. } => control_flow::lower_while(self, cond, body),
            Stmt::DoWhile { body, cond, .. } => control_flow::lower_do_while(self, body, cond),
            Stmt::For {
                init,
                cond,
                update,
                body,
                ..
            } => control_flow::lower_for(
                self,
                init.as_deref(),
                cond.as_ref(),
                update.as_deref(),
                body,
            ),
            Stmt::Return { expr, .. } => self.lower_return(expr.as_ref()),
            Stmt::Assign { location, expr, .. } => self.lower_assign(location, expr),
            Stmt::ExprStmt { expr, .. } => self.lower_expr(expr).map(|_| ()),
            Stmt::Print { expr, .. } => self.lower_print(expr),
            Stmt::VarDecl(v) => self.lower_local_var_decl(v),
            Stmt::ArrayDecl(a) => self.lower_local_array_decl(a),
        }
    }

    fn lower_return(&mut self, expr: Option<&Expr>) -> Result<(), CodeGenError> {
        match expr {
            Some(e) => {
                let v = self.lower_expr(e)?;
                self.builder().ret(Some(&v));
            }
            None => self.builder().ret(None),
        }
        Ok(())
    }

    fn lower_assign(&mut self, location: &Expr, expr: &Expr) -> Result<(), CodeGenError> {
        let (addr, _ty) = self.lower_lvalue_addr(location)?;
        let v = self.lower_expr(expr)?;
        self.builder().store(&v, &addr);
        Ok(())
    }

    /// `print` picks its `printf` format specifier from the operand's
    /// runtime type and widens `boolean`/`char` to `i32` first, the only two
    /// varargs-promoted types this language has (spec §6.3).
    fn lower_print(&mut self, expr: &Expr) -> Result<(), CodeGenError> {
        let ty = expr.ty().expect("checker sets every expression's type");
        let mut v = self.lower_expr(expr)?;
        if matches!(ty, Type::Boolean | Type::Char) {
            v = self.builder().zext_to_i32(&v);
        }
        let fmt = printf_format_for(&ty);
        let (fmt_name, fmt_len) = self.module.intern_string(fmt);
        let fmt_ptr = self.builder().global_string_ptr(&fmt_name, fmt_len);
        self.builder().call_varargs("printf", &[fmt_ptr, v]);
        Ok(())
    }

    fn lower_local_var_decl(&mut self, decl: &VarDecl) -> Result<(), CodeGenError> {
        let ir_ty = lower(&decl.ty);
        let slot = self.builder().alloca(&ir_ty);
        if let Some(init) = &decl.init {
            let v = self.lower_expr(init)?;
            self.builder().store(&v, &slot);
        }
        self.define_var(&decl.name, slot, decl.ty.clone());
        Ok(())
    }

    fn lower_local_array_decl(&mut self, decl: &ArrayDecl) -> Result<(), CodeGenError> {
        let arr_ty = Type::Array(Box::new(decl.elem_ty.clone()), decl.size);
        let ir_elem_ty = lower(&decl.elem_ty);
        let ir_arr_ty = IrType::Array(Box::new(ir_elem_ty.clone()), decl.size);
        let slot = self.builder().alloca(&ir_arr_ty);
        if let Some(elems) = &decl.init {
            for (i, elem) in elems.iter().enumerate() {
                let v = self.lower_expr(elem)?;
                let idx = Value::int(i as i32);
                let addr = self.builder().gep_array_index(&slot, &ir_elem_ty, &idx);
                self.builder().store(&v, &addr);
            }
        }
        self.define_var(&decl.name, slot, arr_ty);
        Ok(())
    }
}
