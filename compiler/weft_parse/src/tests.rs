use super::*;
use pretty_assertions::assert_eq;
use weft_ir::{ExprKind, FunctionStyle};

fn sexpr(source: &str) -> String {
    match parse(source) {
        Ok(expr) => expr.to_sexpr(),
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(expr) => panic!("expected error for {source:?}, parsed {expr}"),
        Err(e) => e,
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(sexpr("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(sexpr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(sexpr("2 * 1 + 1"), "(+ (* 2 1) 1)");
}

#[test]
fn left_associative_arithmetic() {
    assert_eq!(sexpr("8 - 4 - 2"), "(- (- 8 4) 2)");
    assert_eq!(sexpr("8 / 4 % 3"), "(% (/ 8 4) 3)");
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(sexpr("a = b = 1"), "(= a (= b 1))");
}

#[test]
fn logical_and_comparison_levels() {
    assert_eq!(
        sexpr("a < b == c > d && e || f"),
        "(|| (&& (== (< a b) (> c d)) e) f)"
    );
}

#[test]
fn prefix_and_postfix() {
    assert_eq!(sexpr("-a * b"), "(* (- a) b)");
    assert_eq!(sexpr("!a == b"), "(== (! a) b)");
    assert_eq!(sexpr("-a++"), "(- (post++ a))");
    assert_eq!(sexpr("++a"), "(++ a)");
    assert_eq!(sexpr("-f(x)"), "(- (call f x))");
}

#[test]
fn calls_and_members_chain() {
    assert_eq!(sexpr("a.b(1, 2).c"), "(. (call (. a b) 1 2) c)");
    assert_eq!(sexpr("f()()"), "(call (call f))");
}

#[test]
fn statements_form_a_block() {
    assert_eq!(sexpr("a = 1; b = 2; a"), "(block (= a 1) (= b 2) a)");
    assert_eq!(sexpr("a = 1;"), "(= a 1)");
    assert_eq!(sexpr(""), "(tuple)");
}

#[test]
fn tuples_and_parens() {
    assert_eq!(sexpr("(a, b)"), "(tuple a b)");
    assert_eq!(sexpr("()"), "(tuple)");
    assert_eq!(sexpr("(a,)"), "(tuple a)");
    assert_eq!(sexpr("(a)"), "a");
    assert_eq!(sexpr("(a = 1; a + 1)"), "(block (= a 1) (+ a 1))");
}

#[test]
fn destructuring_assignment() {
    assert_eq!(sexpr("(a, b) = (1, 2)"), "(= (tuple a b) (tuple 1 2))");
}

#[test]
fn definition_forms() {
    assert_eq!(sexpr("def(a) = 2"), "(= (def a) 2)");
    assert_eq!(sexpr("val(a, b) = (1, 2)"), "(= (val a b) (tuple 1 2))");
    assert_eq!(sexpr("def(x)"), "(def x)");
    assert_eq!(sexpr("def"), "def");
}

#[test]
fn if_forms() {
    assert_eq!(sexpr("if(a; 1; 2)"), "(if a 1 2)");
    assert_eq!(sexpr("if(a; 1)"), "(if a 1)");
}

#[test]
fn while_form() {
    assert_eq!(sexpr("while(i < 3; i++; s)"), "(while (< i 3) (block (post++ i) s))");
}

#[test]
fn function_styles() {
    assert_eq!(sexpr("fun(a, b; a + b)"), "(fun (a b) (+ a b))");
    assert_eq!(sexpr("fun{; def(a) = 2}"), "(fun{} () (= (def a) 2))");
    let expr = parse("fun{x; x}").unwrap_or_else(|e| panic!("{e}"));
    match expr.kind {
        ExprKind::Function(f) => assert_eq!(f.style, FunctionStyle::Block),
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn lambda_forms() {
    assert_eq!(sexpr("x -> x + 1"), "(fun (x) (+ x 1))");
    assert_eq!(sexpr("(a, b) -> a * b"), "(fun (a b) (* a b))");
    assert_eq!(sexpr("() -> a"), "(fun () a)");
    assert_eq!(sexpr("f = x -> y -> x"), "(= f (fun (x) (fun (y) x)))");
}

#[test]
fn immediately_invoked_function() {
    assert_eq!(
        sexpr("a = 1; fun(; def(a) = 2)(); a"),
        "(block (= a 1) (call (fun () (= (def a) 2))) a)"
    );
}

#[test]
fn interpolated_strings() {
    assert_eq!(sexpr(r#""a${x + 1}b""#), r#"(str "a" (+ x 1) "b")"#);
    assert_eq!(sexpr(r#""plain""#), r#""plain""#);
    assert_eq!(
        sexpr(r#""${ "in${y}" }""#),
        r#"(str (str "in" y))"#
    );
}

#[test]
fn interpolation_spans_are_absolute() {
    let source = r#"s = "v=${value}""#;
    let expr = parse(source).unwrap_or_else(|e| panic!("{e}"));
    let ExprKind::Binary { right, .. } = expr.kind else {
        panic!("expected assignment");
    };
    let ExprKind::Interpolated(parts) = right.kind else {
        panic!("expected interpolation");
    };
    match &parts[1] {
        weft_ir::InterpolationPart::Expr(e) => assert_eq!(e.span.text(source), "value"),
        other => panic!("expected expression part, got {other:?}"),
    }
}

#[test]
fn keyword_arity_errors() {
    assert!(matches!(
        parse_err("if(a)"),
        ParseError::KeywordArity { keyword: "if", found: 1, .. }
    ));
    assert!(matches!(
        parse_err("if(a; b; c; d)"),
        ParseError::KeywordArity { keyword: "if", found: 4, .. }
    ));
    assert!(matches!(
        parse_err("while(a)"),
        ParseError::KeywordArity { keyword: "while", .. }
    ));
    assert!(matches!(
        parse_err("fun(a)"),
        ParseError::KeywordArity { keyword: "fun", .. }
    ));
}

#[test]
fn missing_delimiters() {
    assert!(matches!(
        parse_err("(1 + 2"),
        ParseError::MissingDelimiter { delimiter: ")", .. }
    ));
    assert!(matches!(
        parse_err("fun{a; a"),
        ParseError::MissingDelimiter { delimiter: "}", .. }
    ));
}

#[test]
fn unexpected_tokens_report_text_and_line() {
    let err = parse_err("a = 1;\nb c");
    assert_eq!(err.line(), 2);
    assert_eq!(
        err.to_string(),
        "line 2: unexpected identifier `c`, expected `;` or end of input"
    );
}

#[test]
fn invalid_targets() {
    assert!(matches!(
        parse_err("1 = 2"),
        ParseError::InvalidAssignmentTarget { .. }
    ));
    assert!(matches!(
        parse_err("f() = 2"),
        ParseError::InvalidAssignmentTarget { .. }
    ));
    assert!(matches!(
        parse_err("3++"),
        ParseError::InvalidAssignmentTarget { .. }
    ));
    assert!(matches!(
        parse_err("(a + 1) -> a"),
        ParseError::InvalidParameters { .. }
    ));
    assert!(matches!(
        parse_err("fun(1; 2)"),
        ParseError::InvalidParameters { .. }
    ));
    assert!(matches!(
        parse_err("def(1)"),
        ParseError::InvalidDefinition { keyword: "def", .. }
    ));
}

#[test]
fn conditional_operator_is_rejected() {
    assert!(matches!(
        parse_err("a ? b : c"),
        ParseError::UnsupportedConditional { .. }
    ));
}

#[test]
fn semicolon_in_call_arguments_is_rejected() {
    assert!(matches!(
        parse_err("f(a; b)"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn lex_errors_surface_through_parse() {
    assert!(matches!(parse_err("\"abc"), ParseError::Lex(_)));
}

#[test]
fn parsing_is_deterministic() {
    let source = "f = (a, b) -> if(a > b; a; b); f(1, 2) + \"${f(3, 4)}\"";
    assert_eq!(parse(source), parse(source));
}
