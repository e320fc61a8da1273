//! Typed operand references produced by a [`super::FunctionBuilder`].
//!
//! A `Value` is either a literal constant rendered inline (`5`, `1.5`,
//! `true` as `1`) or a named SSA register/global (`%t3`, `@.str.0`). Either
//! way it carries its [`IrType`] so the builder never has to re-derive it.

use std::fmt;

use super::types::IrType;

#[derive(Debug, Clone)]
pub struct Value {
    pub text: String,
    pub ty: IrType,
}

impl Value {
    pub fn new(text: impl Into<String>, ty: IrType) -> Self {
        Value {
            text: text.into(),
            ty,
        }
    }

    pub fn int(v: i32) -> Self {
        Value::new(v.to_string(), IrType::I32)
    }

    pub fn float(v: f64) -> Self {
        Value::new(format!("{:e}", v), IrType::Double)
    }

    pub fn bool(v: bool) -> Self {
        Value::new(if v { "1" } else { "0" }, IrType::I1)
    }

    pub fn char(v: u8) -> Self {
        Value::new(v.to_string(), IrType::I8)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
