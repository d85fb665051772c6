use pretty_assertions::assert_eq;

use crate::errors::EvalErrorKind;
use crate::scope::ScopeRef;
use crate::{Engine, Value};

fn run(source: &str) -> Value {
    match Engine::new().run(source, None) {
        Ok(value) => value,
        Err(err) => panic!("`{source}` failed: {err}"),
    }
}

fn run_err(source: &str) -> EvalErrorKind {
    match Engine::new().run(source, None) {
        Ok(value) => panic!("`{source}` unexpectedly produced {value}"),
        Err(crate::ScriptError::Eval(err)) => err.kind,
        Err(crate::ScriptError::Parse(err)) => panic!("`{source}` did not parse: {err}"),
    }
}

#[test]
fn precedence() {
    assert_eq!(run("1 + 2 * 3"), Value::Int(7));
    assert_eq!(run("(1 + 2) * 3"), Value::Int(9));
    assert_eq!(run("2 * 1 + 1"), Value::Int(3));
}

#[test]
fn chained_assignment_binds_both() {
    assert_eq!(run("a = b = 1; (a, b)"), run("(1, 1)"));
}

#[test]
fn expression_functions_write_through() {
    assert_eq!(run("a = 1; fun(; def(a) = 2)(); a"), Value::Int(2));
}

#[test]
fn block_functions_keep_their_own_context() {
    assert_eq!(run("a = 1; fun{; def(a) = 2}(); a"), Value::Int(1));
}

#[test]
fn closures_capture_by_reference() {
    assert_eq!(run("a = 1; f = () -> a; a = 2; f()"), Value::Int(2));
}

#[test]
fn closures_keep_their_scope_alive() {
    let source = "make = fun{n; () -> n}; g = make(5); g()";
    assert_eq!(run(source), Value::Int(5));
}

#[test]
fn counter_closure_updates_captured_binding() {
    let source = "make = fun{; count = 0; () -> count = count + 1}; c = make(); c(); c(); c()";
    assert_eq!(run(source), Value::Int(3));
}

#[test]
fn if_uses_truthiness() {
    assert_eq!(run(r#"if(""; 2; 3)"#), Value::Int(3));
    assert_eq!(run(r#"if("x"; 2; 3)"#), Value::Int(2));
    assert_eq!(run("if(null; 2)"), Value::Null);
    assert_eq!(run("if(0; 1; 2)"), Value::Int(1));
}

#[test]
fn while_yields_last_body_value() {
    assert_eq!(run("i = 0; s = 0; while(i < 4; i++; s = s + i)"), Value::Int(10));
    assert_eq!(run("while(false; 1)"), Value::Null);
}

#[test]
fn destructuring_requires_matching_arity() {
    assert_eq!(run("(a, b) = (1, 2); a + b"), Value::Int(3));
    assert_eq!(
        run_err("(a, b) = (1, 2, 3)"),
        EvalErrorKind::TupleArityMismatch {
            expected: 2,
            got: 3
        }
    );
}

#[test]
fn tuples_drop_empty_elements() {
    assert_eq!(run("(1, (), 2)"), run("(1, 2)"));
    assert_eq!(run("((), 5)"), Value::Int(5));
    assert_eq!(run("()"), Value::Void);
}

#[test]
fn tuples_drop_null_elements() {
    assert_eq!(run("(null, 1)"), Value::Int(1));
    assert_eq!(run("(1, null, 2)"), run("(1, 2)"));
    assert_eq!(run("(null, null)"), Value::Void);
    assert_eq!(
        run_err("(a, b) = (null, 2)"),
        EvalErrorKind::TupleArityMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn undefined_names_fail_when_read() {
    assert!(matches!(
        run_err("nope + 1"),
        EvalErrorKind::UndefinedBinding { .. }
    ));
    assert!(matches!(
        run_err("def(x); x"),
        EvalErrorKind::UndefinedBinding { .. }
    ));
    assert_eq!(run("def(x); x = 4; x"), Value::Int(4));
}

#[test]
fn constants_cannot_be_reassigned() {
    assert_eq!(run("val(k) = 3; k * 2"), Value::Int(6));
    assert!(matches!(
        run_err("val(k) = 3; k = 4"),
        EvalErrorKind::ConstantReassignment { .. }
    ));
    assert!(matches!(
        run_err("val(k)"),
        EvalErrorKind::ConstantWithoutValue { .. }
    ));
}

#[test]
fn multi_name_definitions_destructure() {
    assert_eq!(run("def(a, b) = (3, 4); a * b"), Value::Int(12));
}

#[test]
fn arity_mismatch_messages() {
    let engine = Engine::new();
    let err = engine.run("f = (a, b) -> a; f(1)", None);
    let message = err.map(|_| String::new()).unwrap_or_else(|e| e.to_string());
    assert_eq!(message, "too few parameters: expected 2, got 1");
}

#[test]
fn step_operators() {
    assert_eq!(run("i = 1; j = i++; (i, j)"), run("(2, 1)"));
    assert_eq!(run("i = 1; j = ++i; (i, j)"), run("(2, 2)"));
    assert_eq!(run("i = 1; i--; i"), Value::Int(0));
}

#[test]
fn short_circuit_yields_booleans() {
    assert_eq!(run("1 && 2"), Value::Bool(true));
    assert_eq!(run("null || 0"), Value::Bool(true));
    assert_eq!(run("false && nope"), Value::Bool(false));
    assert_eq!(run("true || nope"), Value::Bool(true));
}

#[test]
fn string_interpolation() {
    assert_eq!(run(r#"x = 2; "x=${x + 1}!""#), Value::text("x=3!"));
}

#[test]
fn text_concatenation() {
    assert_eq!(run(r#""a" + 1 + 2"#), Value::text("a12"));
}

#[test]
fn map_members_and_callable_entries() {
    assert_eq!(run(r#"m = map("a", 1); m.a"#), Value::Int(1));
    assert_eq!(run(r#"m = map(); m.missing"#), Value::Null);
    assert_eq!(run(r#"m = map(); m.b = 2; m.b"#), Value::Int(2));
    assert_eq!(run(r#"m = map(); m.f = x -> x * 2; m.f(4)"#), Value::Int(8));
}

#[test]
fn calling_a_non_function_fails() {
    assert!(matches!(run_err("x = 1; x()"), EvalErrorKind::NotCallable { .. }));
}

#[test]
fn recursion_limit_is_enforced() {
    let engine = Engine::builder().max_call_depth(10).build();
    let result = engine.run("f = fun{n; f(n + 1)}; f(0)", None);
    let kind = match result {
        Err(crate::ScriptError::Eval(err)) => Some(err.kind),
        _ => None,
    };
    assert_eq!(kind, Some(EvalErrorKind::RecursionLimit { depth: 10 }));
}

#[test]
fn deep_recursion_without_a_limit() {
    let source = "count = fun{n; if(n == 0; 0; 1 + count(n - 1))}; count(5000)";
    assert_eq!(run(source), Value::Int(5000));
}

#[test]
fn errors_carry_a_backtrace_through_calls() {
    let engine = Engine::new();
    let result = engine.run("inner = fun{; nope}; outer = fun{; inner()}; outer()", None);
    let frames: Vec<String> = match result {
        Err(crate::ScriptError::Eval(err)) => err
            .backtrace
            .map(|bt| bt.frames().iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    assert_eq!(frames, vec!["inner".to_string(), "outer".to_string()]);
}

#[test]
fn scope_is_restored_after_a_failed_call() {
    let engine = Engine::new();
    let root = ScopeRef::new();
    let script = match engine.compile("f = fun{; throw(1)}") {
        Ok(script) => script,
        Err(err) => panic!("{err}"),
    };
    assert!(script.eval(Some(root.clone())).is_ok());
    let mut interp = crate::Interpreter::new(&engine, root.clone());
    let f = root.get_local("f").unwrap_or(Value::Null);
    assert!(interp.call_value(&f, Vec::new(), weft_ir::Span::DUMMY).is_err());
    assert!(interp.scope().ptr_eq(&root));
    assert_eq!(interp.depth(), 0);
}

#[test]
fn eval_builtin_runs_in_the_callers_scope() {
    assert_eq!(run(r#"a = 2; eval("b = a * 3"); b"#), Value::Int(6));
}

#[test]
fn throw_keeps_the_value() {
    let engine = Engine::new();
    let result = engine.run(r#"throw("bad")"#, None);
    let thrown = match &result {
        Err(err) => err.thrown_value().cloned(),
        Ok(_) => None,
    };
    assert_eq!(thrown, Some(Value::text("bad")));
}

#[test]
fn byte_and_char_arithmetic_compute_in_int() {
    let engine = Engine::new();
    let scope = ScopeRef::new();
    scope.bind_param(&weft_ir::Name::new("b"), Value::Byte(100));
    scope.bind_param(&weft_ir::Name::new("c"), Value::Char('a'));
    let result = engine.run("(b + b, c + c)", Some(scope)).ok();
    assert_eq!(
        result,
        Some(Value::collect(vec![Value::Int(200), Value::Int(194)]))
    );
}
