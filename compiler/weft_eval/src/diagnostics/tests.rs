use pretty_assertions::assert_eq;
use weft_ir::{Name, Span};

use super::*;
use crate::errors::EvalErrorKind;

fn frame(name: &str, start: u32) -> CallFrame {
    CallFrame {
        name: Name::new(name),
        call_span: Some(Span::new(start, start + 1)),
    }
}

#[test]
fn push_and_pop_track_depth() {
    let mut stack = CallStack::default();
    assert!(stack.is_empty());
    assert!(stack.push(frame("a", 0)).is_ok());
    assert!(stack.push(frame("b", 4)).is_ok());
    assert_eq!(stack.depth(), 2);
    assert_eq!(
        stack.current_frame().map(|f| f.name.to_string()),
        Some("b".to_string())
    );
    stack.pop();
    assert_eq!(stack.depth(), 1);
}

#[test]
fn limit_rejects_the_frame_past_it() {
    let mut stack = CallStack::new(Some(2));
    assert!(stack.push(frame("a", 0)).is_ok());
    assert!(stack.push(frame("b", 1)).is_ok());
    let err = stack.push(frame("c", 2));
    assert!(matches!(
        err.map_err(|e| e.kind),
        Err(EvalErrorKind::RecursionLimit { depth: 2 })
    ));
    assert_eq!(stack.depth(), 2);
}

#[test]
fn capture_lists_most_recent_first() {
    let mut stack = CallStack::default();
    assert!(stack.push(frame("outer", 0)).is_ok());
    assert!(stack.push(frame("inner", 10)).is_ok());
    let captured = stack.capture();
    let names: Vec<&str> = captured.frames().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer"]);
}

#[test]
fn empty_stack_attaches_nothing() {
    let stack = CallStack::default();
    let err = stack.attach_backtrace(EvalError::new("boom"));
    assert!(err.backtrace.is_none());
}

#[test]
fn first_backtrace_wins() {
    let mut stack = CallStack::default();
    assert!(stack.push(frame("inner", 0)).is_ok());
    let err = stack.attach_backtrace(EvalError::new("boom"));
    stack.pop();
    assert!(stack.push(frame("other", 3)).is_ok());
    let err = stack.attach_backtrace(err);
    let first = err
        .backtrace
        .as_ref()
        .and_then(|bt| bt.frames().first())
        .map(|f| f.name.clone());
    assert_eq!(first, Some("inner".to_string()));
}
