use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::print_handler::buffer_handler;
use crate::scope::MapBindings;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_and_scripts_are_thread_safe() {
    assert_send_sync::<Engine>();
    assert_send_sync::<CompiledScript>();
}

#[test]
fn default_limits_follow_the_target() {
    let expected = if cfg!(target_arch = "wasm32") {
        Some(EvalLimits::WASM_MAX_CALL_DEPTH)
    } else {
        None
    };
    assert_eq!(EvalLimits::default().max_call_depth, expected);
    assert_eq!(EvalLimits::bounded(7).max_call_depth, Some(7));
}

#[test]
fn compile_failure_yields_no_script() {
    assert!(Engine::new().compile("(1 + ").is_err());
    assert!(matches!(
        Engine::new().run("a ? b : c", None),
        Err(ScriptError::Parse(_))
    ));
}

#[test]
fn scripts_evaluate_repeatedly() {
    let engine = Engine::new();
    let script = match engine.compile("x = 6; x * 7") {
        Ok(script) => script,
        Err(err) => panic!("{err}"),
    };
    let first = script.eval(None).ok();
    let second = script.eval(None).ok();
    assert_eq!(first, Some(Value::Int(42)));
    assert_eq!(first, second);
}

#[test]
fn supplied_scope_receives_definitions() {
    let engine = Engine::new();
    let scope = ScopeRef::new();
    assert!(engine.run("total = 3", Some(scope.clone())).is_ok());
    assert_eq!(scope.get_local("total"), Some(Value::Int(3)));
}

#[test]
fn map_bindings_are_read_and_written() {
    let engine = Engine::new();
    let bindings = Rc::new(MapBindings::new().with("price", 10).with("qty", 3));
    let scope = ScopeRef::from_map(&bindings);
    let result = engine.run("total = price * qty; qty = 4; total", Some(scope));
    assert_eq!(result.ok(), Some(Value::Int(30)));
    assert_eq!(bindings.value("qty"), Some(Value::Int(4)));
    assert_eq!(bindings.value("total"), Some(Value::Int(30)));
}

#[test]
fn print_goes_to_the_engine_handler() {
    let handler = buffer_handler();
    let engine = Engine::builder().print_handler(Arc::clone(&handler)).build();
    let result = engine.run(r#"print("a", 1); println("!"); println()"#, None);
    assert_eq!(result.ok(), Some(Value::Void));
    assert_eq!(handler.output(), "a 1!\n\n");
}

#[test]
fn builtins_are_globals() {
    let engine = Engine::new();
    for name in ["print", "println", "throw", "eval", "list", "map", "array", "typeOf"] {
        assert!(engine.has_global(name), "missing builtin {name}");
    }
    assert_eq!(
        engine.run(r#"typeOf("x")"#, None).ok(),
        Some(Value::text("text"))
    );
}

#[test]
fn globals_can_be_shadowed() {
    let engine = Engine::new();
    assert_eq!(engine.run("list = 3; list + 1", None).ok(), Some(Value::Int(4)));
    assert_eq!(
        engine.run("typeOf(list(1))", None).ok(),
        Some(Value::text("list"))
    );
}

#[test]
fn global_functions_resolve_overloads() {
    let engine = Engine::builder()
        .function("describe", vec![ParamType::INT], |_| Ok(Value::text("int")))
        .function("describe", vec![ParamType::Text], |_| Ok(Value::text("text")))
        .build();
    assert_eq!(
        engine.run("describe(1)", None).ok(),
        Some(Value::text("int"))
    );
    assert_eq!(
        engine.run(r#"describe("a")"#, None).ok(),
        Some(Value::text("text"))
    );
}

#[test]
fn map_builtin_rejects_odd_arguments() {
    let result = Engine::new().run(r#"map("a")"#, None);
    assert!(matches!(result, Err(ScriptError::Eval(_))));
}

#[test]
fn engines_are_isolated() {
    let a = Engine::builder()
        .function("only_here", vec![], |_| Ok(Value::Int(1)))
        .build();
    let b = Engine::new();
    assert!(a.has_global("only_here"));
    assert!(!b.has_global("only_here"));
}

#[test]
fn script_can_be_shared_across_threads() {
    let engine = Engine::new();
    let script = match engine.compile("n = 0; i = 0; while(i < 10; i++; n = n + i)") {
        Ok(script) => script,
        Err(err) => panic!("{err}"),
    };
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let script = script.clone();
            std::thread::spawn(move || script.eval(None).map(|v| v.to_string()).ok())
        })
        .collect();
    for handle in handles {
        let result = handle.join().ok().flatten();
        assert_eq!(result.as_deref(), Some("55"));
    }
}
