use super::*;
use pretty_assertions::assert_eq;

fn name(s: &str) -> Name {
    Name::new(s)
}

fn found(scope: &ScopeRef, n: &str) -> Option<Value> {
    match scope.lookup(n) {
        Ok(Lookup::Found(v)) => Some(v),
        _ => None,
    }
}

#[test]
fn lookup_walks_outward() {
    let root = ScopeRef::new();
    root.bind_param(&name("a"), Value::Int(1));
    let inner = ScopeRef::local(&root);
    assert_eq!(found(&inner, "a"), Some(Value::Int(1)));
    assert!(matches!(inner.lookup("b"), Ok(Lookup::Missing)));
}

#[test]
fn inner_binding_shadows() {
    let root = ScopeRef::new();
    root.bind_param(&name("a"), Value::Int(1));
    let inner = ScopeRef::local(&root);
    inner.define(&name("a"), Cell::Value(Value::Int(2))).ok();
    assert_eq!(found(&inner, "a"), Some(Value::Int(2)));
    assert_eq!(found(&root, "a"), Some(Value::Int(1)));
}

#[test]
fn overlay_writes_through_to_parent() {
    let root = ScopeRef::new();
    let overlay = ScopeRef::overlay(&root);
    overlay.bind_param(&name("x"), Value::Int(9));
    overlay.define(&name("y"), Cell::Value(Value::Int(3))).ok();
    assert_eq!(root.get_local("y"), Some(Value::Int(3)));
    assert_eq!(root.get_local("x"), None);
}

#[test]
fn constants_cannot_be_reassigned_or_redefined() {
    let root = ScopeRef::new();
    root.define(&name("k"), Cell::Constant(Value::Int(1))).ok();
    let err = root.assign_existing(&name("k"), Value::Int(2));
    assert!(matches!(
        err,
        Err(EvalError { kind: crate::EvalErrorKind::ConstantReassignment { .. }, .. })
    ));
    assert!(root.define(&name("k"), Cell::Value(Value::Int(3))).is_err());
    assert_eq!(found(&root, "k"), Some(Value::Int(1)));
}

#[test]
fn undefined_cell_is_replaced_on_first_write() {
    let root = ScopeRef::new();
    root.define(&name("u"), Cell::Undefined).ok();
    assert!(matches!(root.lookup("u"), Ok(Lookup::Undefined)));
    assert_eq!(root.assign_existing(&name("u"), Value::Int(4)).ok(), Some(true));
    assert_eq!(found(&root, "u"), Some(Value::Int(4)));
}

#[test]
fn undefined_marker_keeps_existing_value() {
    let root = ScopeRef::new();
    root.define(&name("a"), Cell::Value(Value::Int(1))).ok();
    root.define(&name("a"), Cell::Undefined).ok();
    assert_eq!(found(&root, "a"), Some(Value::Int(1)));
}

#[test]
fn assign_existing_reports_missing() {
    let root = ScopeRef::new();
    assert_eq!(root.assign_existing(&name("nope"), Value::Null).ok(), Some(false));
}

#[test]
fn combined_reads_both_and_writes_first() {
    let vars = Rc::new(MapBindings::new().with("outer", 5));
    let external = ScopeRef::from_map(&vars);
    let local = ScopeRef::new();
    let scope = ScopeRef::combined(&local, &external);
    assert_eq!(found(&scope, "outer"), Some(Value::Int(5)));
    scope.define(&name("fresh"), Cell::Value(Value::Int(1))).ok();
    assert_eq!(local.get_local("fresh"), Some(Value::Int(1)));
    assert!(!vars.contains("fresh"));
    assert_eq!(scope.assign_existing(&name("outer"), Value::Int(6)).ok(), Some(true));
    assert_eq!(vars.value("outer"), Some(Value::Int(6)));
}

#[test]
fn external_map_receives_definitions() {
    let vars = Rc::new(MapBindings::new());
    let scope = ScopeRef::from_map(&vars);
    scope.define(&name("z"), Cell::Value(Value::Int(7))).ok();
    assert_eq!(vars.value("z"), Some(Value::Int(7)));
}

#[test]
fn failing_host_getter_surfaces_through_lookup() {
    let info = crate::interop::HostTypeInfo::builder("Sensor")
        .property("reading", |_| Err(crate::errors::host_error("sensor offline")))
        .property("unit", |_| Ok(Value::text("C")))
        .build();
    let host = ScopeRef::from_host(HostObject::new(&info, ()));
    let scope = ScopeRef::combined(&ScopeRef::new(), &host);

    assert_eq!(found(&scope, "unit"), Some(Value::text("C")));
    assert!(matches!(scope.lookup("other"), Ok(Lookup::Missing)));
    let kind = scope.lookup("reading").err().map(|err| err.kind);
    assert_eq!(
        kind,
        Some(crate::errors::EvalErrorKind::Host {
            message: "sensor offline".to_string()
        })
    );
}
