//! bminor compiler CLI
//!
//! Grounded on `seq-compiler`'s `main.rs` (`clap::Parser`/`clap::Subcommand`),
//! trimmed to the two subcommands this compiler core actually supports: it
//! never shells out to `clang`/`llc` (spec §1 Non-goals), so there is no
//! `build`-to-executable step, only source-to-`.ll`.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, Subcommand};

#[derive(ClapParser)]
#[command(name = "bminorc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "BMinor compiler: scan, parse, check, emit LLVM-style IR", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a BMinor source file to an LLVM-style IR (`.ll`) file.
    Build {
        /// Input BMinor source file.
        input: PathBuf,

        /// Output IR path (defaults to the input filename with a `.ll`
        /// extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and check a BMinor source file without emitting IR, printing
    /// every diagnostic found (spec §6.5).
    Check {
        /// Input BMinor source file.
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build { input, output } => run_build(&input, output),
        Commands::Check { input } => run_check(&input),
    }
}

fn run_build(input: &PathBuf, output: Option<PathBuf>) {
    let source = read_source(input);
    let output = output.unwrap_or_else(|| input.with_extension("ll"));
    if let Err(e) = build_to_file(&source, &output) {
        eprint!("{e}");
        process::exit(1);
    }
}

/// Compile `source` to IR and write it to `output`. Split out of
/// `run_build` so the write-to-a-`.ll`-file path can be exercised by a test
/// without going through `process::exit`.
fn build_to_file(source: &str, output: &PathBuf) -> Result<(), String> {
    let ir = bminorc::compile_to_ir(source)?;
    fs::write(output, ir).map_err(|e| format!("failed to write {}: {}", output.display(), e))
}

fn run_check(input: &PathBuf) {
    let source = read_source(input);
    let diags = bminorc::check_source(&source);
    print!("{diags}");
    process::exit(if diags.has_errors() { 1 } else { 0 });
}

fn read_source(path: &PathBuf) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {}", path.display(), e);
        process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_source_loads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.bm");
        fs::write(&path, "x: integer = 1;").unwrap();
        assert_eq!(read_source(&path), "x: integer = 1;");
    }

    #[test]
    fn build_to_file_writes_ir_to_the_given_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prog.ll");
        build_to_file("x: integer = 1; print x;", &output).unwrap();
        let rendered = fs::read_to_string(&output).unwrap();
        assert!(rendered.contains("define i32 @main()"));
    }

    #[test]
    fn build_to_file_reports_diagnostics_without_writing_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("prog.ll");
        let err = build_to_file("x: integer = 1.5;", &output).unwrap_err();
        assert!(!err.is_empty());
        assert!(!output.exists());
    }
}
