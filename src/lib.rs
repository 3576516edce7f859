//! Crate root: wires the Scanner → Parser → Resolver → Interpreter pipeline
//! into a small driver (`Lox`) that file-mode and REPL-mode callers in
//! `main.rs` share. The driver owns one `Interpreter` for its whole
//! lifetime so that REPL-mode variable/function declarations persist across
//! lines, exactly as if the whole session were one script.

pub mod ast;
pub mod class;
pub mod diagnostics;
pub mod environment;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::Write;

use diagnostics::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// What came of running one chunk of source: whether it failed to compile
/// (scan/parse/resolve) or failed at runtime, distinguished because the two
/// map to different process exit codes (§6).
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Ok,
    CompileError,
    RuntimeError,
}

pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new(output: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::new(output) }
    }

    /// Scans, parses, resolves, and (if compilation succeeded) interprets
    /// one chunk of source. A single `Diagnostics` instance is shared
    /// across all four phases so an error in an earlier phase correctly
    /// suppresses later ones.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        if diagnostics.had_error() {
            return RunOutcome::CompileError;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, &mut diagnostics);

        if diagnostics.had_error() {
            return RunOutcome::CompileError;
        }

        self.interpreter.interpret(&statements, &mut diagnostics);

        if diagnostics.had_runtime_error() {
            return RunOutcome::RuntimeError;
        }

        RunOutcome::Ok
    }
}
