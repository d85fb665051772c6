use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::{Engine, ScriptError, Value};

fn run(source: &str) -> Value {
    match Engine::new().run(source, None) {
        Ok(value) => value,
        Err(err) => panic!("`{source}` failed: {err}"),
    }
}

fn run_err(source: &str) -> EvalErrorKind {
    match Engine::new().run(source, None) {
        Err(ScriptError::Eval(err)) => err.kind,
        other => panic!("`{source}` did not fail at runtime: {other:?}"),
    }
}

#[test]
fn defaults_cover_every_family() {
    let registry = ExtensionRegistry::with_defaults();
    for family in ["object", "collection", "map", "array", "text"] {
        assert!(
            !registry.operations_for(family).is_empty(),
            "no extensions for {family}"
        );
    }
    assert!(registry.operations_for("nothing").is_empty());
    assert!(ExtensionRegistry::new().is_empty());
}

#[test]
fn object_extensions_reach_every_value() {
    assert_eq!(run("(12).toString()"), Value::text("12"));
    assert_eq!(run("list(1, 2).equals(list(1, 2))"), Value::Bool(true));
    assert_eq!(run(r#""a".equals("b")"#), Value::Bool(false));
}

#[test]
fn list_operations() {
    assert_eq!(run("l = list(1, 2); l.add(3); l.size()"), Value::Long(3));
    assert_eq!(run("list().isEmpty()"), Value::Bool(true));
    assert_eq!(run("list(4, 5).get(1)"), Value::Int(5));
    assert_eq!(run("list(4, 5).contains(5)"), Value::Bool(true));
    assert_eq!(run(r#"list(1, "b").join("-")"#), Value::text("1-b"));
}

#[test]
fn list_callbacks() {
    assert_eq!(
        run("list(1, 2, 3).map(x -> x * 10).join(\",\")"),
        Value::text("10,20,30")
    );
    assert_eq!(
        run("list(1, 2, 3, 4).filter(x -> x % 2 == 0).size()"),
        Value::Long(2)
    );
    assert_eq!(run("s = 0; list(1, 2, 3).each(x -> s = s + x); s"), Value::Int(6));
}

#[test]
fn list_index_out_of_bounds() {
    assert!(matches!(
        run_err("list(1).get(3)"),
        EvalErrorKind::Host { .. }
    ));
}

#[test]
fn shared_lists_see_mutation() {
    assert_eq!(run("a = list(); b = a; b.add(1); a.size()"), Value::Long(1));
}

#[test]
fn map_operations() {
    assert_eq!(run(r#"m = map("a", 1); m.put("b", 2); m.size()"#), Value::Long(2));
    assert_eq!(run(r#"map("a", 1).get("a")"#), Value::Int(1));
    assert_eq!(run(r#"map("a", 1).get("z")"#), Value::Null);
    assert_eq!(run(r#"map("a", 1).containsKey("a")"#), Value::Bool(true));
    assert_eq!(
        run(r#"map("b", 1, "a", 2).keys().join(",")"#),
        Value::text("a,b")
    );
    assert_eq!(run(r#"map("a", 7).values().get(0)"#), Value::Int(7));
    assert_eq!(run(r#"m = map("a", 1); m.put("a", 5)"#), Value::Int(1));
}

#[test]
fn array_operations() {
    assert_eq!(run("array(1, 2, 3).length()"), Value::Int(3));
    assert_eq!(run("array(1, 2).get(0)"), Value::Int(1));
    assert_eq!(run("array(1, 2).toList().size()"), Value::Long(2));
}

#[test]
fn text_operations() {
    assert_eq!(run(r#""héllo".length()"#), Value::Int(5));
    assert_eq!(run(r#""Ab".upper()"#), Value::text("AB"));
    assert_eq!(run(r#""Ab".lower()"#), Value::text("ab"));
    assert_eq!(run(r#""  x ".trim()"#), Value::text("x"));
    assert_eq!(run(r#""héllo".substring(1)"#), Value::text("éllo"));
    assert_eq!(run(r#""héllo".substring(1, 3)"#), Value::text("él"));
    assert_eq!(run(r#""abc".startsWith("ab")"#), Value::Bool(true));
    assert_eq!(run(r#""abc".endsWith("ab")"#), Value::Bool(false));
    assert_eq!(run(r#""abc".contains("b")"#), Value::Bool(true));
    assert_eq!(run(r#""a-b".replace("-", "+")"#), Value::text("a+b"));
    assert_eq!(run(r#""a,b,c".split(",").size()"#), Value::Long(3));
}

#[test]
fn substring_out_of_range_fails() {
    assert!(matches!(
        run_err(r#""abc".substring(2, 9)"#),
        EvalErrorKind::Host { .. }
    ));
}

#[test]
fn variadic_concat_collects_trailing_arguments() {
    assert_eq!(run(r#""a".concat()"#), Value::text("a"));
    assert_eq!(run(r#""a".concat("b", "c")"#), Value::text("abc"));
}

#[test]
fn substring_overloads_by_arity() {
    assert!(matches!(
        run_err(r#""abc".substring(1, 2, 3)"#),
        EvalErrorKind::NoApplicableOperation { .. }
    ));
}

#[test]
fn unknown_members_are_reported() {
    assert!(matches!(
        run_err("(1).frobnicate()"),
        EvalErrorKind::NoApplicableOperation { .. }
    ));
    assert!(matches!(
        run_err("x = (1).frobnicate"),
        EvalErrorKind::NoSuchMember { .. }
    ));
}
