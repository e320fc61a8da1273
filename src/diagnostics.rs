//! Diagnostic collection for a single compilation.
//!
//! A compiler pass never panics or throws across component boundaries on a
//! user-facing error; it reports through a shared [`Diagnostics`] handle and
//! keeps going, so one pass can surface as many problems as possible. Callers
//! consult [`Diagnostics::count`] to decide whether to proceed to the next
//! stage (lex -> parse -> check -> emit).

use std::fmt;

/// A single reported problem: a message and, when known, the source line it
/// came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<u32>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Error en línea {}: {}", line, self.message),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

/// Accumulates diagnostics for one compilation. Passed by `&mut` through the
/// pipeline rather than kept as process-wide state, so two compilations in
/// one process never race on a shared counter.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a problem. Always increments the count by exactly one.
    pub fn report(&mut self, message: impl Into<String>, line: Option<u32>) {
        self.reported.push(Diagnostic {
            message: message.into(),
            line,
        });
    }

    /// Convenience for the common case of a line-attributed diagnostic.
    pub fn report_at(&mut self, message: impl Into<String>, line: u32) {
        self.report(message, Some(line));
    }

    pub fn count(&self) -> usize {
        self.reported.len()
    }

    pub fn has_errors(&self) -> bool {
        self.count() > 0
    }

    pub fn reset(&mut self) {
        self.reported.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.reported {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_increments_count_by_one() {
        let mut diags = Diagnostics::new();
        assert_eq!(diags.count(), 0);
        diags.report_at("bad thing", 3);
        assert_eq!(diags.count(), 1);
        diags.report("no line known", None);
        assert_eq!(diags.count(), 2);
    }

    #[test]
    fn reset_clears_count() {
        let mut diags = Diagnostics::new();
        diags.report_at("x", 1);
        diags.reset();
        assert_eq!(diags.count(), 0);
        assert!(!diags.has_errors());
    }

    #[test]
    fn formats_with_and_without_line() {
        let mut diags = Diagnostics::new();
        diags.report_at("tipos no coinciden", 5);
        diags.report("algo salió mal", None);
        let rendered = diags.to_string();
        assert!(rendered.contains("Error en línea 5: tipos no coinciden"));
        assert!(rendered.contains("Error: algo salió mal"));
    }
}
