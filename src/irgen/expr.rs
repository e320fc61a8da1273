//! Expression lowering: arithmetic, comparisons, unary ops, calls, lvalue
//! load/store addressing, array indexing, inc/dec, and literals.
//!
//! Grounded on `irgen.py`'s `visit_BinOper`/`visit_UnaryOper`/`visit_VarLoc`
//! family and on `codegen/words.rs`'s value-producing style (every lowering
//! function returns the [`Value`] it just computed rather than pushing onto
//! an implicit stack).

use crate::ast::{Expr, ExprKind};
use crate::ir::{IrType, Value};
use crate::types::{BinOp, Type, UnOp};

use super::control_flow;
use super::types::lower;
use super::{CodeGenError, IrGen};

impl IrGen {
    pub(super) fn lower_expr(&mut self, expr: &Expr) -> Result<Value, CodeGenError> {
        match &*expr.kind {
            ExprKind::IntLit(v) => Ok(Value::int(*v)),
            ExprKind::FloatLit(v) => Ok(Value::float(*v)),
            ExprKind::CharLit(v) => Ok(Value::char(*v)),
            ExprKind::BoolLit(v) => Ok(Value::bool(*v)),
            ExprKind::StringLit(s) => {
                let (name, len) = self.module.intern_string(s);
                Ok(self.builder().global_string_ptr(&name, len))
            }
            ExprKind::ArrayLit(_) => Err(CodeGenError::Logic(
                "array literals may only appear in a declaration initializer".to_string(),
            )),
            ExprKind::BinOp { op, l, r } => self.lower_binop(*op, l, r),
            ExprKind::UnaryOp { op, x } => self.lower_unaryop(*op, x),
            ExprKind::PreInc(x) => self.lower_incdec(x, 1, true),
            ExprKind::PreDec(x) => self.lower_incdec(x, -1, true),
            ExprKind::PostInc(x) => self.lower_incdec(x, 1, false),
            ExprKind::PostDec(x) => self.lower_incdec(x, -1, false),
            ExprKind::VarLoc(name) => {
                let slot = self
                    .lookup_var(name)
                    .unwrap_or_else(|| panic!("checker invariant violated: '{name}' not bound"));
                let ir_ty = lower(&slot.ty);
                let ptr = slot.ptr.clone();
                Ok(self.builder().load(&ptr, &ir_ty))
            }
            ExprKind::ArrayLoc { name, indices } => {
                let (addr, elem_ty) = self.lower_array_element_addr(name, indices)?;
                let ir_elem_ty = lower(&elem_ty);
                Ok(self.builder().load(&addr, &ir_elem_ty))
            }
            ExprKind::Call { name, args } => self.lower_call(name, args),
        }
    }

    fn lower_binop(&mut self, op: BinOp, l: &Expr, r: &Expr) -> Result<Value, CodeGenError> {
        if matches!(op, BinOp::And | BinOp::Or) {
            return control_flow::lower_short_circuit(self, op, l, r);
        }

        let lt = l.ty().expect("checker sets every expression's type");
        if lt == Type::String {
            return Err(CodeGenError::Logic(
                "string operators are not supported by this code generator".to_string(),
            ));
        }

        let lv = self.lower_expr(l)?;
        let rv = self.lower_expr(r)?;

        match lt {
            Type::Integer => Ok(match op {
                BinOp::Add => self.builder().int_binop("add", &lv, &rv),
                BinOp::Sub => self.builder().int_binop("sub", &lv, &rv),
                BinOp::Mul => self.builder().int_binop("mul", &lv, &rv),
                BinOp::Div => self.builder().int_binop("sdiv", &lv, &rv),
                BinOp::Mod => self.builder().int_binop("srem", &lv, &rv),
                BinOp::Lt => self.builder().icmp("slt", &IrType::I32, &lv, &rv),
                BinOp::Le => self.builder().icmp("sle", &IrType::I32, &lv, &rv),
                BinOp::Gt => self.builder().icmp("sgt", &IrType::I32, &lv, &rv),
                BinOp::Ge => self.builder().icmp("sge", &IrType::I32, &lv, &rv),
                BinOp::Eq => self.builder().icmp("eq", &IrType::I32, &lv, &rv),
                BinOp::Ne => self.builder().icmp("ne", &IrType::I32, &lv, &rv),
                BinOp::And | BinOp::Or => unreachable!("handled above"),
            }),
            Type::Float => Ok(match op {
                BinOp::Add => self.builder().float_binop("fadd", &lv, &rv),
                BinOp::Sub => self.builder().float_binop("fsub", &lv, &rv),
                BinOp::Mul => self.builder().float_binop("fmul", &lv, &rv),
                BinOp::Div => self.builder().float_binop("fdiv", &lv, &rv),
                BinOp::Lt => self.builder().fcmp("olt", &lv, &rv),
                BinOp::Le => self.builder().fcmp("ole", &lv, &rv),
                BinOp::Gt => self.builder().fcmp("ogt", &lv, &rv),
                BinOp::Ge => self.builder().fcmp("oge", &lv, &rv),
                BinOp::Eq => self.builder().fcmp("oeq", &lv, &rv),
                BinOp::Ne => self.builder().fcmp("one", &lv, &rv),
                BinOp::Mod | BinOp::And | BinOp::Or => unreachable!("checker rejects this"),
            }),
            Type::Char => Ok(match op {
                BinOp::Lt => self.builder().icmp("ult", &IrType::I8, &lv, &rv),
                BinOp::Le => self.builder().icmp("ule", &IrType::I8, &lv, &rv),
                BinOp::Gt => self.builder().icmp("ugt", &IrType::I8, &lv, &rv),
                BinOp::Ge => self.builder().icmp("uge", &IrType::I8, &lv, &rv),
                BinOp::Eq => self.builder().icmp("eq", &IrType::I8, &lv, &rv),
                BinOp::Ne => self.builder().icmp("ne", &IrType::I8, &lv, &rv),
                _ => unreachable!("checker rejects this"),
            }),
            Type::Boolean => Ok(match op {
                BinOp::Eq => self.builder().bool_binop("icmp eq", &lv, &rv),
                BinOp::Ne => self.builder().bool_binop("xor", &lv, &rv),
                _ => unreachable!("checker rejects this"),
            }),
            _ => unreachable!("checker rejects binary ops on this type"),
        }
    }

    fn lower_unaryop(&mut self, op: UnOp, x: &Expr) -> Result<Value, CodeGenError> {
        if op == UnOp::Caret {
            return Err(CodeGenError::Logic(
                "unary operator '^' is not supported by this code generator".to_string(),
            ));
        }
        let ty = x.ty().expect("checker sets every expression's type");
        let v = self.lower_expr(x)?;
        Ok(match (op, ty) {
            (UnOp::Plus, _) => v,
            (UnOp::Neg, Type::Integer) => self.builder().neg_int(&v),
            (UnOp::Neg, Type::Float) => self.builder().neg_float(&v),
            (UnOp::Not, Type::Boolean) => self.builder().not_bool(&v),
            (UnOp::Inc, _) | (UnOp::Dec, _) => {
                unreachable!("pre/post inc-dec are lowered via ExprKind::PreInc/PreDec/PostInc/PostDec")
            }
            _ => unreachable!("checker rejects this"),
        })
    }

    fn lower_incdec(&mut self, x: &Expr, delta: i32, pre: bool) -> Result<Value, CodeGenError> {
        let (addr, ty) = self.lower_lvalue_addr(x)?;
        let ir_ty = lower(&ty);
        let old = self.builder().load(&addr, &ir_ty);
        let new = match ty {
            Type::Integer => self.builder().int_binop("add", &old, &Value::int(delta)),
            Type::Float => self
                .builder()
                .float_binop("fadd", &old, &Value::float(delta as f64)),
            _ => unreachable!("checker only allows inc/dec on integer or float"),
        };
        self.builder().store(&new, &addr);
        Ok(if pre { new } else { old })
    }

    /// The address an lvalue expression refers to, plus its BMinor type.
    pub(super) fn lower_lvalue_addr(&mut self, expr: &Expr) -> Result<(Value, Type), CodeGenError> {
        match &*expr.kind {
            ExprKind::VarLoc(name) => {
                let slot = self
                    .lookup_var(name)
                    .unwrap_or_else(|| panic!("checker invariant violated: '{name}' not bound"));
                Ok((slot.ptr.clone(), slot.ty.clone()))
            }
            ExprKind::ArrayLoc { name, indices } => self.lower_array_element_addr(name, indices),
            _ => unreachable!("checker only allows VarLoc/ArrayLoc as lvalues"),
        }
    }

    fn lower_array_element_addr(
        &mut self,
        name: &str,
        indices: &[Expr],
    ) -> Result<(Value, Type), CodeGenError> {
        let slot = self
            .lookup_var(name)
            .unwrap_or_else(|| panic!("checker invariant violated: '{name}' not bound"));
        let array_ptr = slot.ptr.clone();
        let elem_ty = slot
            .ty
            .as_array()
            .map(|(e, _)| e.clone())
            .unwrap_or_else(|| panic!("checker invariant violated: '{name}' is not an array"));
        let index = self.lower_expr(&indices[0])?;
        let ir_elem_ty = lower(&elem_ty);
        let addr = self
            .builder()
            .gep_array_index(&array_ptr, &ir_elem_ty, &index);
        Ok((addr, elem_ty))
    }

    fn lower_call(&mut self, name: &str, args: &[Expr]) -> Result<Value, CodeGenError> {
        let sig_ret = self
            .functions
            .get(name)
            .unwrap_or_else(|| panic!("checker invariant violated: '{name}' not declared"))
            .ret
            .clone();
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.lower_expr(arg)?);
        }
        let ret_ty = lower(&sig_ret);
        Ok(self
            .builder()
            .call(name, &arg_values, &ret_ty)
            .unwrap_or(Value::int(0)))
    }
}
