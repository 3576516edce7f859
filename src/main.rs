use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use tlox::{Lox, RunOutcome};

const EXIT_USAGE: u8 = 64;
const EXIT_COMPILE_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match args.len() {
        1 => run_prompt(),
        2 => run_file(&args[1]),
        _ => {
            println!("Usage: tlox [script]");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not read file '{path}': {error}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let mut lox = Lox::new(Box::new(io::stdout()));
    match lox.run(&source) {
        RunOutcome::Ok => ExitCode::SUCCESS,
        RunOutcome::CompileError => ExitCode::from(EXIT_COMPILE_ERROR),
        RunOutcome::RuntimeError => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}

fn history_path() -> Option<std::path::PathBuf> {
    home::home_dir().map(|home| home.join(".tlox_history"))
}

fn run_prompt() -> ExitCode {
    let mut lox = Lox::new(Box::new(io::stdout()));
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Could not start the prompt: {error}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let history = history_path();
    if let Some(history) = &history {
        let _ = editor.load_history(history);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line == "exit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line);
                lox.run(line);
                let _ = io::stdout().flush();
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Readline error: {error}");
                break;
            }
        }
    }

    if let Some(history) = &history {
        let _ = editor.save_history(history);
    }

    ExitCode::SUCCESS
}
