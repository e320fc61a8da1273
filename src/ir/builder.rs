//! Per-function instruction builder with a "current block" cursor.
//!
//! Grounded on `llvmlite.IRBuilder`'s positioned-at-block emission model
//! (`irgen.py`) and on how `seq-compiler::codegen::state::CodeGen` threads a
//! mutable builder through one function at a time. Allocas are always
//! appended to the entry block, the usual LLVM convention the reference
//! generator itself follows via `builder.goto_block(entry)` before emitting
//! `alloca`s.

use super::types::IrType;
use super::value::Value;

struct BasicBlock {
    label: String,
    instrs: Vec<String>,
    terminated: bool,
}

pub struct FunctionBuilder {
    name: String,
    ret_ty: IrType,
    params: Vec<(String, IrType)>,
    blocks: Vec<BasicBlock>,
    current: usize,
    entry_allocas: Vec<String>,
    temp_counter: u32,
    block_counter: u32,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, ret_ty: IrType, params: Vec<(String, IrType)>) -> Self {
        let entry = BasicBlock {
            label: "entry".to_string(),
            instrs: Vec::new(),
            terminated: false,
        };
        FunctionBuilder {
            name: name.into(),
            ret_ty,
            params,
            blocks: vec![entry],
            current: 0,
            entry_allocas: Vec::new(),
            temp_counter: 0,
            block_counter: 0,
        }
    }

    pub fn param_value(&self, index: usize) -> Value {
        let (name, ty) = &self.params[index];
        Value::new(format!("%{}", name), ty.clone())
    }

    fn new_temp(&mut self) -> String {
        let t = format!("%t{}", self.temp_counter);
        self.temp_counter += 1;
        t
    }

    /// Create a new, not-yet-current basic block with a unique label built
    /// from `hint` (e.g. `"if.then"` -> `"if.then.3"`).
    pub fn new_block(&mut self, hint: &str) -> String {
        let label = format!("{}.{}", hint, self.block_counter);
        self.block_counter += 1;
        self.blocks.push(BasicBlock {
            label: label.clone(),
            instrs: Vec::new(),
            terminated: false,
        });
        label
    }

    pub fn switch_to(&mut self, label: &str) {
        self.current = self
            .blocks
            .iter()
            .position(|b| b.label == label)
            .expect("switch_to: unknown block label");
    }

    pub fn current_block_label(&self) -> String {
        self.blocks[self.current].label.clone()
    }

    pub fn current_block_terminated(&self) -> bool {
        self.blocks[self.current].terminated
    }

    fn emit(&mut self, instr: String) {
        let block = &mut self.blocks[self.current];
        if !block.terminated {
            block.instrs.push(instr);
        }
    }

    fn terminate(&mut self, instr: String) {
        let block = &mut self.blocks[self.current];
        if !block.terminated {
            block.instrs.push(instr);
            block.terminated = true;
        }
    }

    pub fn alloca(&mut self, ty: &IrType) -> Value {
        let t = self.new_temp();
        self.entry_allocas
            .push(format!("  {} = alloca {}", t, ty));
        Value::new(t, ty.clone().ptr())
    }

    pub fn store(&mut self, value: &Value, ptr: &Value) {
        self.emit(format!(
            "  store {} {}, {} {}",
            value.ty, value.text, ptr.ty, ptr.text
        ));
    }

    pub fn load(&mut self, ptr: &Value, ty: &IrType) -> Value {
        let t = self.new_temp();
        self.emit(format!("  {} = load {}, {} {}", t, ty, ptr.ty, ptr.text));
        Value::new(t, ty.clone())
    }

    /// `getelementptr` into an array alloca to address element `index`.
    pub fn gep_array_index(&mut self, array_ptr: &Value, elem_ty: &IrType, index: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = getelementptr {}, {} {}, i32 0, {} {}",
            t, elem_array_inner(&array_ptr.ty), array_ptr.ty, array_ptr.text, index.ty, index.text
        ));
        Value::new(t, elem_ty.clone().ptr())
    }

    pub fn int_binop(&mut self, op: &str, lhs: &Value, rhs: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = {} i32 {}, {}",
            t, op, lhs.text, rhs.text
        ));
        Value::new(t, IrType::I32)
    }

    pub fn float_binop(&mut self, op: &str, lhs: &Value, rhs: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = {} double {}, {}",
            t, op, lhs.text, rhs.text
        ));
        Value::new(t, IrType::Double)
    }

    pub fn icmp(&mut self, pred: &str, ty: &IrType, lhs: &Value, rhs: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = icmp {} {} {}, {}",
            t, pred, ty, lhs.text, rhs.text
        ));
        Value::new(t, IrType::I1)
    }

    pub fn fcmp(&mut self, pred: &str, lhs: &Value, rhs: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = fcmp {} double {}, {}",
            t, pred, lhs.text, rhs.text
        ));
        Value::new(t, IrType::I1)
    }

    pub fn bool_binop(&mut self, op: &str, lhs: &Value, rhs: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!("  {} = {} i1 {}, {}", t, op, lhs.text, rhs.text));
        Value::new(t, IrType::I1)
    }

    pub fn neg_int(&mut self, x: &Value) -> Value {
        self.int_binop("sub", &Value::int(0), x)
    }

    pub fn neg_float(&mut self, x: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!("  {} = fneg double {}", t, x.text));
        Value::new(t, IrType::Double)
    }

    /// Widen an `i1` or `i8` value to `i32`, the only width change this
    /// backend ever emits (print's varargs promotion, spec §9 Open Question
    /// 5 and §6.3).
    pub fn zext_to_i32(&mut self, x: &Value) -> Value {
        let t = self.new_temp();
        self.emit(format!("  {} = zext {} {} to i32", t, x.ty, x.text));
        Value::new(t, IrType::I32)
    }

    pub fn not_bool(&mut self, x: &Value) -> Value {
        self.bool_binop("xor", x, &Value::bool(true))
    }

    pub fn br(&mut self, target: &str) {
        self.terminate(format!("  br label %{}", target));
    }

    pub fn cond_br(&mut self, cond: &Value, then_label: &str, else_label: &str) {
        self.terminate(format!(
            "  br i1 {}, label %{}, label %{}",
            cond.text, then_label, else_label
        ));
    }

    pub fn ret(&mut self, value: Option<&Value>) {
        match value {
            Some(v) => self.terminate(format!("  ret {} {}", v.ty, v.text)),
            None => self.terminate("  ret void".to_string()),
        }
    }

    pub fn phi(&mut self, ty: &IrType, incoming: &[(Value, String)]) -> Value {
        let t = self.new_temp();
        let joined = incoming
            .iter()
            .map(|(v, label)| format!("[ {}, %{} ]", v.text, label))
            .collect::<Vec<_>>()
            .join(", ");
        self.emit(format!("  {} = phi {} {}", t, ty, joined));
        Value::new(t, ty.clone())
    }

    pub fn call(&mut self, callee: &str, args: &[Value], ret_ty: &IrType) -> Option<Value> {
        let arg_list = args
            .iter()
            .map(|a| format!("{} {}", a.ty, a.text))
            .collect::<Vec<_>>()
            .join(", ");
        if *ret_ty == IrType::Void {
            self.emit(format!("  call void @{}({})", callee, arg_list));
            None
        } else {
            let t = self.new_temp();
            self.emit(format!("  {} = call {} @{}({})", t, ret_ty, callee, arg_list));
            Some(Value::new(t, ret_ty.clone()))
        }
    }

    /// Address of the first byte of an interned string global, as an `i8*`
    /// suitable for a `printf`-style call (`getelementptr` with both
    /// indices zero, the standard "decay array to pointer" idiom).
    pub fn global_string_ptr(&mut self, global_name: &str, len_including_nul: u32) -> Value {
        let t = self.new_temp();
        self.emit(format!(
            "  {} = getelementptr [{} x i8], [{} x i8]* {}, i32 0, i32 0",
            t, len_including_nul, len_including_nul, global_name
        ));
        Value::new(t, IrType::I8.ptr())
    }

    /// `printf`-style varargs call used by `print` lowering (spec §6.3).
    pub fn call_varargs(&mut self, callee: &str, args: &[Value]) -> Value {
        let arg_list = args
            .iter()
            .map(|a| format!("{} {}", a.ty, a.text))
            .collect::<Vec<_>>()
            .join(", ");
        let t = self.new_temp();
        self.emit(format!(
            "  {} = call i32 (i8*, ...) @{}({})",
            t, callee, arg_list
        ));
        Value::new(t, IrType::I32)
    }

    /// Assemble `define ...` plus every block, with the entry block's
    /// allocas pinned to its top.
    pub fn render(mut self) -> String {
        if !self.blocks[self.current].terminated && self.current == self.blocks.len() - 1 {
            // Defensive default terminator so a dropped trailing block still
            // renders valid IR; real completeness is enforced by the
            // generator inserting explicit returns (spec §4.7 item 3).
            self.ret(match self.ret_ty {
                IrType::Void => None,
                _ => Some(&Value::new("0", self.ret_ty.clone())),
            });
        }
        let params = self
            .params
            .iter()
            .map(|(n, t)| format!("{} %{}", t, n))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!("define {} @{}({}) {{\n", self.ret_ty, self.name, params);
        for (i, block) in self.blocks.iter().enumerate() {
            out.push_str(&format!("{}:\n", block.label));
            if i == 0 {
                for a in &self.entry_allocas {
                    out.push_str(a);
                    out.push('\n');
                }
            }
            for instr in &block.instrs {
                out.push_str(instr);
                out.push('\n');
            }
        }
        out.push_str("}\n");
        out
    }
}

fn elem_array_inner(ptr_ty: &IrType) -> String {
    match ptr_ty {
        IrType::Ptr(inner) => inner.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_add_function_renders_entry_block_with_allocas_first() {
        let mut b = FunctionBuilder::new("add", IrType::I32, vec![
            ("x".to_string(), IrType::I32),
            ("y".to_string(), IrType::I32),
        ]);
        let slot = b.alloca(&IrType::I32);
        let x = b.param_value(0);
        b.store(&x, &slot);
        let loaded = b.load(&slot, &IrType::I32);
        let y = b.param_value(1);
        let sum = b.int_binop("add", &loaded, &y);
        b.ret(Some(&sum));
        let rendered = b.render();
        assert!(rendered.starts_with("define i32 @add(i32 %x, i32 %y) {"));
        assert!(rendered.contains("alloca i32"));
        assert!(rendered.contains("ret i32"));
    }

    #[test]
    fn branch_and_phi_render_distinct_blocks() {
        let mut b = FunctionBuilder::new("f", IrType::I32, vec![]);
        let then_label = b.new_block("if.then");
        let else_label = b.new_block("if.else");
        let merge_label = b.new_block("if.merge");
        b.cond_br(&Value::bool(true), &then_label, &else_label);

        b.switch_to(&then_label);
        b.br(&merge_label);

        b.switch_to(&else_label);
        b.br(&merge_label);

        b.switch_to(&merge_label);
        let phi = b.phi(
            &IrType::I32,
            &[
                (Value::int(1), then_label.clone()),
                (Value::int(2), else_label.clone()),
            ],
        );
        b.ret(Some(&phi));

        let rendered = b.render();
        assert!(rendered.contains(&format!("{}:", then_label)));
        assert!(rendered.contains(&format!("{}:", else_label)));
        assert!(rendered.contains("phi i32"));
    }

    #[test]
    fn emitting_after_a_terminator_is_a_no_op() {
        let mut b = FunctionBuilder::new("f", IrType::Void, vec![]);
        b.ret(None);
        b.store(&Value::int(1), &Value::new("%bad", IrType::I32.ptr()));
        let rendered = b.render();
        assert!(!rendered.contains("store i32 1"));
    }
}
