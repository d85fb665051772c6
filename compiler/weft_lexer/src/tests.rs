use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    match Lexer::tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
        Err(e) => panic!("lex failed for {source:?}: {e}"),
    }
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(Name::new(name))
}

fn num(text: &str) -> TokenKind {
    TokenKind::Number(Name::new(text))
}

fn single_string(source: &str) -> StrLiteral {
    match kinds(source).into_iter().next() {
        Some(TokenKind::Str(lit)) => lit,
        other => panic!("expected string token, got {other:?}"),
    }
}

#[test]
fn operators_and_punctuation() {
    assert_eq!(
        kinds("a++ <= b -> c != d && e || !f"),
        vec![
            ident("a"),
            TokenKind::PlusPlus,
            TokenKind::LtEq,
            ident("b"),
            TokenKind::Arrow,
            ident("c"),
            TokenKind::NotEq,
            ident("d"),
            TokenKind::AmpAmp,
            ident("e"),
            TokenKind::PipePipe,
            TokenKind::Bang,
            ident("f"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("if while fun true false null def $x _y"),
        vec![
            TokenKind::If,
            TokenKind::While,
            TokenKind::Fun,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            ident("def"),
            ident("$x"),
            ident("_y"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn number_forms() {
    assert_eq!(
        kinds("1 2.5 3e10 4.0E-2 5.x"),
        vec![
            num("1"),
            num("2.5"),
            num("3e10"),
            num("4.0E-2"),
            num("5"),
            TokenKind::Dot,
            ident("x"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // line\n/* block\n */ b"),
        vec![ident("a"), ident("b"), TokenKind::Eof]
    );
}

#[test]
fn token_lines_advance() {
    let tokens = Lexer::tokenize("a;\nb;\n\nc").unwrap_or_default();
    let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 1, 2, 2, 4, 4]);
}

#[test]
fn escapes_decode() {
    let lit = single_string(r#""a\n\t\\\"A\$""#);
    assert_eq!(lit.parts, vec![StrPart::Text("a\n\t\\\"A$".into())]);
}

#[test]
fn single_quoted_strings_do_not_interpolate() {
    let lit = single_string("'x ${y}'");
    assert_eq!(lit.parts, vec![StrPart::Text("x ${y}".into())]);
}

#[test]
fn empty_string_has_one_empty_text_part() {
    let lit = single_string("\"\"");
    assert_eq!(lit.parts, vec![StrPart::Text(String::new())]);
}

#[test]
fn interpolation_records_code_range() {
    let source = r#""a ${x + 1} b""#;
    let lit = single_string(source);
    assert_eq!(lit.parts.len(), 3);
    match &lit.parts[1] {
        StrPart::Code(span) => assert_eq!(span.text(source), "x + 1"),
        other => panic!("expected code part, got {other:?}"),
    }
    assert_eq!(lit.parts[2], StrPart::Text(" b".into()));
}

#[test]
fn interpolation_with_nested_braces_and_strings() {
    let source = r#""${ fun{a; "}"}(1) }!""#;
    let lit = single_string(source);
    match &lit.parts[0] {
        StrPart::Code(span) => assert_eq!(span.text(source), r#" fun{a; "}"}(1) "#),
        other => panic!("expected code part, got {other:?}"),
    }
    assert_eq!(lit.parts[1], StrPart::Text("!".into()));
}

#[test]
fn push_back_replays_token() {
    let mut lexer = Lexer::new("a b");
    let first = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    lexer.push_back(first.clone());
    let again = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(first, again);
    let peeked = lexer.peek().map(|t| t.kind.clone()).unwrap_or(TokenKind::Eof);
    assert_eq!(peeked, ident("b"));
    let next = lexer.next_token().map(|t| t.kind).unwrap_or(TokenKind::Eof);
    assert_eq!(next, ident("b"));
}

#[test]
fn ranged_lexer_keeps_absolute_spans() {
    let source = "xx foo yy";
    let mut lexer = Lexer::with_range(source, Span::new(3, 6), 1);
    let token = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(token.span, Span::new(3, 6));
    assert_eq!(token.text(source), "foo");
    assert!(lexer.next_token().is_ok_and(|t| t.is_eof()));
}

#[test]
fn unterminated_string_reports_line() {
    let err = Lexer::tokenize("a;\n\"abc").err();
    assert!(matches!(
        err,
        Some(LexError::UnterminatedString { line: 2, .. })
    ));
}

#[test]
fn invalid_escape() {
    let err = Lexer::tokenize(r#""\q""#).err();
    assert!(matches!(err, Some(LexError::InvalidEscape { ch: 'q', .. })));
}

#[test]
fn bad_unicode_escape() {
    let err = Lexer::tokenize(r#""\u00G0""#).err();
    assert!(matches!(err, Some(LexError::InvalidUnicodeEscape { .. })));
}

#[test]
fn unterminated_interpolation() {
    let err = Lexer::tokenize("\"${ a + (b\"").err();
    assert!(err.is_some());
    let err = Lexer::tokenize("\"${ a ").err();
    assert!(matches!(
        err,
        Some(LexError::UnterminatedInterpolation { .. })
    ));
}

#[test]
fn interpolation_open_at_closing_quote() {
    for source in ["\"${1\"", "\"${ a + \"b\"", "x = \"${ f(\"\n"] {
        let err = Lexer::tokenize(source).err();
        assert!(
            matches!(err, Some(LexError::UnterminatedInterpolation { .. })),
            "{source:?} gave {err:?}"
        );
    }
    let err = Lexer::tokenize("\"abc").err();
    assert!(matches!(err, Some(LexError::UnterminatedString { .. })));
}

#[test]
fn push_back_keeps_every_token() {
    let mut lexer = Lexer::new("a b c");
    let a = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    let b = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    lexer.push_back(b);
    lexer.push_back(a);
    let replayed: Vec<TokenKind> = (0..4)
        .map(|_| lexer.next_token().map(|t| t.kind).unwrap_or(TokenKind::Eof))
        .collect();
    assert_eq!(
        replayed,
        vec![ident("a"), ident("b"), ident("c"), TokenKind::Eof]
    );
}

#[test]
fn peek_after_push_back_sees_the_pushed_token() {
    let mut lexer = Lexer::new("a b");
    let a = lexer.next_token().unwrap_or_else(|e| panic!("{e}"));
    lexer.push_back(a);
    let peeked = lexer.peek().map(|t| t.kind.clone()).unwrap_or(TokenKind::Eof);
    assert_eq!(peeked, ident("a"));
    let next = lexer.next_token().map(|t| t.kind).unwrap_or(TokenKind::Eof);
    assert_eq!(next, ident("a"));
}

#[test]
fn illegal_character() {
    let err = Lexer::tokenize("a # b").err();
    assert!(matches!(
        err,
        Some(LexError::IllegalCharacter { ch: '#', .. })
    ));
    let err = Lexer::tokenize("a & b").err();
    assert!(matches!(
        err,
        Some(LexError::IllegalCharacter { ch: '&', .. })
    ));
}

#[test]
fn error_display_mentions_line() {
    let err = Lexer::tokenize("\n\n@").err();
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("line 3: illegal character `@`".to_string())
    );
}

proptest! {
    #[test]
    fn integers_lex_as_single_number(n in 0u64..u64::MAX) {
        let text = n.to_string();
        prop_assert_eq!(kinds(&text), vec![num(&text), TokenKind::Eof]);
    }

    #[test]
    fn decimals_lex_as_single_number(int in 0u32..100_000, frac in 0u32..100_000) {
        let text = format!("{int}.{frac}");
        prop_assert_eq!(kinds(&text), vec![num(&text), TokenKind::Eof]);
    }

    #[test]
    fn plain_text_round_trips(text in "[a-zA-Z0-9 ,;()+*/-]{0,40}") {
        let source = format!("'{text}'");
        let lit = single_string(&source);
        prop_assert_eq!(lit.plain_text(), text);
    }
}
