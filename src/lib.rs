//! bminor compiler library
//!
//! Provides compilation from BMinor source text to textual LLVM-style IR:
//! scan -> parse -> check -> emit, gated at every stage by diagnostics
//! count (spec §5).

pub mod ast;
pub mod checker;
pub mod config;
pub mod diagnostics;
pub mod ir;
pub mod irgen;
pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod types;

pub use ast::Program;
pub use checker::Checker;
pub use config::CompilerConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use irgen::{CodeGenError, IrGen};
pub use parser::Parser;

/// Parse and check `source`, returning the collected diagnostics regardless
/// of outcome. Used by the `check` CLI subcommand: report everything found,
/// never emit IR.
pub fn check_source(source: &str) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let program = Parser::new(source, &mut diags).parse_program();
    if !diags.has_errors() {
        Checker::new(&mut diags).check_program(&program);
    }
    diags
}

/// Compile BMinor source to an LLVM-style IR string.
pub fn compile_to_ir(source: &str) -> Result<String, String> {
    compile_to_ir_with_config(source, &CompilerConfig::default())
}

/// Compile BMinor source to an LLVM-style IR string with a custom
/// [`CompilerConfig`] (module name in the rendered `ModuleID` header).
///
/// Each stage halts downstream work if its diagnostics are non-zero (spec
/// §5): a syntax error never reaches the checker, and a type error never
/// reaches IR generation.
pub fn compile_to_ir_with_config(source: &str, config: &CompilerConfig) -> Result<String, String> {
    let mut diags = Diagnostics::new();

    let program = Parser::new(source, &mut diags).parse_program();
    if diags.has_errors() {
        return Err(diags.to_string());
    }

    Checker::new(&mut diags).check_program(&program);
    if diags.has_errors() {
        return Err(diags.to_string());
    }

    let mut gen = IrGen::new(config.module_name.clone());
    gen.codegen_program(&program)
        .map_err(|e| e.to_string())?;
    Ok(gen.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_program_to_ir_containing_main() {
        let ir = compile_to_ir("x: integer = 5; print x;").unwrap();
        assert!(ir.contains("define i32 @main()"));
        assert!(ir.contains("call i32 (i8*, ...) @printf"));
    }

    #[test]
    fn syntax_errors_never_reach_the_checker() {
        let err = compile_to_ir("x: integer = ;").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn type_errors_never_reach_codegen() {
        let err = compile_to_ir("x: integer = 1.5;").unwrap_err();
        assert!(err.contains("integer") || err.contains("float") || err.contains("coinciden"));
    }

    #[test]
    fn check_source_reports_without_emitting_ir() {
        let diags = check_source("x: integer = 1; x: integer = 2;");
        assert!(diags.has_errors());
    }

    #[test]
    fn custom_module_name_is_honored() {
        let ir =
            compile_to_ir_with_config("", &CompilerConfig::new().with_module_name("demo"))
                .unwrap();
        assert!(ir.contains("ModuleID = 'demo'"));
    }
}
