//! Debug commands: `parse` and `lex` for inspecting the front end.

use std::process::ExitCode;

use weft_lexer::Lexer;

use super::read_file;
use crate::reporting::report_parse_error;

/// Parse a file and dump its syntax tree.
pub fn parse_file(path: &str) -> ExitCode {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    match weft_parse::parse(&source) {
        Ok(body) => {
            println!("Parse result for '{path}':");
            println!("{}", body.to_sexpr());
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_parse_error(path, &source, &err);
            ExitCode::FAILURE
        }
    }
}

/// Lex a file and dump the token stream.
pub fn lex_file(path: &str) -> ExitCode {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    match Lexer::tokenize(&source) {
        Ok(tokens) => {
            println!("Tokens for '{path}' ({} tokens):", tokens.len());
            for token in &tokens {
                println!("  {:?} @ {} (line {})", token.kind, token.span, token.line);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_parse_error(path, &source, &err.into());
            ExitCode::FAILURE
        }
    }
}
