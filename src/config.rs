//! Compiler configuration.
//!
//! Grounded on `seq-compiler`'s `config.rs` builder-pattern `CompilerConfig`,
//! trimmed to what bminorc actually has a use for: BMinor has no
//! external-builtin extension point, so the FFI/library-path fields don't
//! carry over.

/// Configuration for a single compilation.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// The `ModuleID` written into the rendered IR's header.
    pub module_name: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            module_name: "bminor_program".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_module_name_matches_codegen_to_ir_string() {
        assert_eq!(CompilerConfig::default().module_name, "bminor_program");
    }

    #[test]
    fn builder_overrides_module_name() {
        let cfg = CompilerConfig::new().with_module_name("demo");
        assert_eq!(cfg.module_name, "demo");
    }
}
