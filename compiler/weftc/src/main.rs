//! Weft CLI.

use std::process::ExitCode;

use weftc::commands::{eval_source, lex_file, parse_file, parse_run_options, run_file};

fn main() -> ExitCode {
    weftc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let command = &args[1];

    match command.as_str() {
        "run" | "eval" => {
            let (options, positional) = match parse_run_options(&args[2..]) {
                Ok(parsed) => parsed,
                Err(message) => {
                    eprintln!("error: {message}");
                    return ExitCode::FAILURE;
                }
            };
            let Some(input) = positional.first() else {
                if command == "run" {
                    eprintln!("Usage: weft run <file.weft> [--max-depth=N]");
                } else {
                    eprintln!("Usage: weft eval <source> [--max-depth=N]");
                }
                return ExitCode::FAILURE;
            };
            if command == "run" {
                run_file(input, &options)
            } else {
                eval_source(input, &options)
            }
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: weft parse <file.weft>");
                return ExitCode::FAILURE;
            }
            parse_file(&args[2])
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: weft lex <file.weft>");
                return ExitCode::FAILURE;
            }
            lex_file(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-v" => {
            println!("Weft {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            // A bare script path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("weft"))
            {
                run_file(command, &weftc::commands::RunOptions::default())
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                ExitCode::FAILURE
            }
        }
    }
}

fn print_usage() {
    println!("Weft expression language");
    println!();
    println!("Usage: weft <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.weft>      Evaluate a script file");
    println!("  eval <source>        Evaluate source given on the command line");
    println!("  parse <file.weft>    Parse and dump the syntax tree");
    println!("  lex <file.weft>      Tokenize and dump the tokens");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Run options:");
    println!("  --max-depth=<N>      Limit script call depth to N frames");
    println!();
    println!("Environment:");
    println!("  WEFT_LOG             Tracing filter, e.g. WEFT_LOG=weft_eval=debug");
    println!();
    println!("Examples:");
    println!("  weft run report.weft");
    println!("  weft eval 'x = 6; x * 7'");
    println!("  weft run deep.weft --max-depth=500");
}
