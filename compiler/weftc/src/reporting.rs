//! Error rendering with `ariadne`.
//!
//! Every report has a headline naming the phase and, when the error carries
//! a span, a label over the offending source. Evaluation errors also get
//! the script-level backtrace as a note.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use weft_eval::{EvalError, ParseError, ScriptError};

/// A rendered-but-not-yet-printed diagnostic.
struct Diagnostic {
    headline: String,
    label: Option<(Range<usize>, String)>,
    note: Option<String>,
}

impl Diagnostic {
    fn from_parse(err: &ParseError) -> Self {
        let headline = match err {
            ParseError::Lex(_) => "lex error",
            _ => "parse error",
        };
        Diagnostic {
            headline: headline.to_string(),
            label: Some((err.span().to_range(), err.to_string())),
            note: None,
        }
    }

    fn from_eval(err: &EvalError) -> Self {
        let headline = if err.is_user_throw() {
            err.message.clone()
        } else {
            "runtime error".to_string()
        };
        let label = err
            .span
            .filter(|span| !span.is_dummy())
            .map(|span| (span.to_range(), err.message.clone()));
        // Without a span the message goes in the headline so it is not lost.
        let headline = if label.is_none() && !err.is_user_throw() {
            format!("runtime error: {}", err.message)
        } else {
            headline
        };
        Diagnostic {
            headline,
            label,
            note: err
                .backtrace
                .as_ref()
                .map(|trace| format!("backtrace:\n{trace}")),
        }
    }

    fn write(&self, path: &str, source: &str, color: bool, out: &mut Vec<u8>) {
        let offset = self.label.as_ref().map_or(0, |(range, _)| range.start);
        let mut report = Report::build(ReportKind::Error, path, offset)
            .with_config(Config::default().with_color(color))
            .with_message(&self.headline);
        if let Some((range, message)) = &self.label {
            report = report.with_label(
                Label::new((path, clamp(range.clone(), source.len())))
                    .with_message(message)
                    .with_color(Color::Red),
            );
        }
        if let Some(note) = &self.note {
            report = report.with_note(note);
        }
        if report.finish().write((path, Source::from(source)), &mut *out).is_err() {
            out.extend_from_slice(self.headline.as_bytes());
            out.push(b'\n');
        }
    }
}

fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    start..range.end.clamp(start, len)
}

/// Render `err` against `source` as plain text.
pub fn render_script_error(path: &str, source: &str, err: &ScriptError) -> String {
    render(path, source, &diagnostic(err), false)
}

/// Print `err` to stderr, coloured when stderr is a terminal.
pub fn report_script_error(path: &str, source: &str, err: &ScriptError) {
    let color = std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", render(path, source, &diagnostic(err), color));
}

/// Print a front-end error to stderr.
pub fn report_parse_error(path: &str, source: &str, err: &ParseError) {
    let color = std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", render(path, source, &Diagnostic::from_parse(err), color));
}

fn diagnostic(err: &ScriptError) -> Diagnostic {
    match err {
        ScriptError::Parse(err) => Diagnostic::from_parse(err),
        ScriptError::Eval(err) => Diagnostic::from_eval(err),
    }
}

fn render(path: &str, source: &str, diagnostic: &Diagnostic, color: bool) -> String {
    let mut out = Vec::new();
    diagnostic.write(path, source, color, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
