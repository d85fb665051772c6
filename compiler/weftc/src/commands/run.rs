//! The `run` and `eval` commands.

use std::process::ExitCode;

use weft_eval::{ScriptError, Value};

use super::{read_file, RunOptions};
use crate::reporting::report_script_error;

/// Compile and evaluate `source` with an engine built from `options`.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn execute(source: &str, options: &RunOptions) -> Result<Value, ScriptError> {
    let engine = options.engine();
    let script = engine.compile(source)?;
    Ok(script.eval(None)?)
}

/// Evaluate a script file. Output comes only from the script's own prints.
pub fn run_file(path: &str, options: &RunOptions) -> ExitCode {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    match execute(&source, options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_script_error(path, &source, &err);
            ExitCode::FAILURE
        }
    }
}

/// Evaluate command-line source and print its value unless it is void.
pub fn eval_source(source: &str, options: &RunOptions) -> ExitCode {
    match execute(source, options) {
        Ok(Value::Void) => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_script_error("<eval>", source, &err);
            ExitCode::FAILURE
        }
    }
}
