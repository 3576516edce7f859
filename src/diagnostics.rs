//! Structured, explicitly-threaded error reporting for all four error tiers
//! (scan, parse, resolve, runtime). Replaces a process-wide mutable error
//! flag with a context object the driver owns and passes down by reference,
//! so no phase of the pipeline reaches for global state.

use std::fmt;

use crate::token::{Token, TokenKind};

/// A lexical error: an unterminated string, an unexpected character, etc.
/// Scan errors only ever carry a line, never a token, since the scanner has
/// not yet produced one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

/// A syntax error raised while building the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// A static, semantically-invalid-but-syntactically-valid error caught by
/// the resolver (redeclaration, `this`/`super` misuse, bad `return`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

/// An error raised while walking the AST: bad operand types, an undefined
/// variable, calling a non-callable value, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Collects whether any compile-time or runtime error occurred during the
/// current run and formats each tier's diagnostics to stderr. One instance
/// is created per `run_file`/REPL-line invocation; nothing here is `static`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn scan_error(&mut self, error: &ScanError) {
        eprintln!("[line {}] Error: {}", error.line, error.message);
        self.had_error = true;
    }

    pub fn parse_error(&mut self, error: &ParseError) {
        eprintln!("{}", Self::format_at(&error.token, &error.message));
        self.had_error = true;
    }

    pub fn resolve_error(&mut self, error: &ResolveError) {
        eprintln!("{}", Self::format_at(&error.token, &error.message));
        self.had_error = true;
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}\n [ Line : {} ]", error.message, error.token.line);
        self.had_runtime_error = true;
    }

    fn format_at(token: &Token, message: &str) -> String {
        let location = if token.kind == TokenKind::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };

        format!("[line {}] Error{location}: {message}", token.line)
    }
}
