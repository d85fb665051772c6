//! Command handlers for the `weft` binary.
//!
//! Each handler reports its own errors on stderr and returns the process
//! exit code.

mod debug;
mod run;

pub use debug::{lex_file, parse_file};
pub use run::{eval_source, execute, run_file};

use weft_eval::{Engine, EvalLimits};

/// Options shared by `run` and `eval`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// `--max-depth=N`; `None` keeps the engine default.
    pub max_depth: Option<usize>,
}

impl RunOptions {
    /// An engine configured from these options, printing to stdout.
    pub fn engine(&self) -> Engine {
        let limits = match self.max_depth {
            Some(depth) => EvalLimits::bounded(depth),
            None => EvalLimits::default(),
        };
        Engine::builder().limits(limits).build()
    }
}

/// Split `args` into run options and positional arguments.
///
/// Flags may appear before or after the positional arguments.
pub fn parse_run_options(args: &[String]) -> Result<(RunOptions, Vec<String>), String> {
    let mut options = RunOptions::default();
    let mut positional = Vec::new();

    for arg in args {
        if let Some(depth) = arg.strip_prefix("--max-depth=") {
            let depth = depth
                .parse::<usize>()
                .map_err(|_| format!("invalid --max-depth value '{depth}'"))?;
            if depth == 0 {
                return Err("--max-depth must be at least 1".to_string());
            }
            options.max_depth = Some(depth);
        } else if arg.starts_with("--") {
            return Err(format!("unknown option '{arg}'"));
        } else {
            positional.push(arg.clone());
        }
    }

    Ok((options, positional))
}

pub(crate) fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    })
}
