//! BMinor -> IR type lowering used during code generation.
//!
//! Grounded on `codegen/types.rs`'s small pure-function type helpers and
//! `irgen.py`'s `type_map`/`get_llvm_type`.

use crate::ir::IrType;
use crate::types::Type;

pub(super) fn lower(ty: &Type) -> IrType {
    IrType::from_bminor(ty)
}

pub(super) fn lower_params(params: &[Type]) -> Vec<IrType> {
    params.iter().map(lower).collect()
}

/// `printf` format specifier selected by the runtime type of the `print`
/// operand (spec §4.7.5's `%d\n`/`%c\n`/`%f\n`/`%s\n` table -- each `print`
/// is one line).
pub(super) fn printf_format_for(ty: &Type) -> &'static str {
    match ty {
        Type::Integer => "%d\n",
        Type::Float => "%f\n",
        Type::Boolean => "%d\n",
        Type::Char => "%c\n",
        Type::String => "%s\n",
        Type::Void | Type::Array(..) | Type::Function(..) => {
            unreachable!("checker rejects printing non-printable types")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_prints_as_integer_and_char_as_char() {
        assert_eq!(printf_format_for(&Type::Boolean), "%d\n");
        assert_eq!(printf_format_for(&Type::Char), "%c\n");
        assert_eq!(printf_format_for(&Type::String), "%s\n");
    }

    #[test]
    fn lowering_matches_ir_type_table() {
        assert_eq!(lower(&Type::Integer), IrType::I32);
        assert_eq!(lower(&Type::Float), IrType::Double);
    }
}
