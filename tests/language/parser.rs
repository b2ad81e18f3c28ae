//! Integration tests for the parser
//!
//! Tests parsing of Palaver scripts into the AST, including error recovery.

use palaver_foundation::{Error, ErrorKind};
use palaver_language::{
    ArithOp, CompareOp, ElseBranch, Expr, Section, Stmt, parse, parse_expr, parse_tokens, tokenize,
};

/// Unwraps the diagnostics of a failed parse.
fn diagnostics(source: &str) -> Vec<Error> {
    match parse(source) {
        Ok(script) => panic!("expected failure, parsed {script:?}"),
        Err(Error {
            kind: ErrorKind::Script(errors),
            ..
        }) => errors,
        Err(other) => panic!("unexpected error shape: {other}"),
    }
}

fn parse_error_lines(errors: &[Error]) -> Vec<u32> {
    errors.iter().filter_map(Error::line).collect()
}

// =============================================================================
// Sections
// =============================================================================

#[test]
fn parse_all_section_kinds() {
    let script = parse(
        r#"
config
    bot_name = "Ava"
var
    count = 0
    greeting = "hi " + $bot_name
function
    lookup = "order_lookup"
intent "start"
    reply "hello"
"#,
    )
    .unwrap();

    let kinds: Vec<&str> = script.sections.iter().map(Section::kind_name).collect();
    assert_eq!(kinds, vec!["config", "var", "function", "intent"]);
    assert_eq!(script.config_entries().count(), 1);
    assert_eq!(script.var_entries().count(), 2);
    let alias = script.function_aliases().next().unwrap();
    assert_eq!((alias.alias.as_str(), alias.target.as_str()), ("lookup", "order_lookup"));
}

#[test]
fn empty_script_has_no_sections() {
    let script = parse("# only a comment\n").unwrap();
    assert!(script.sections.is_empty());
    assert!(script.intent_names().is_empty());
}

#[test]
fn intents_keep_declaration_order() {
    let script = parse("intent \"b\" reply \"1\"\nintent \"a\" reply \"2\"\n").unwrap();
    assert_eq!(script.intent_names(), vec!["b", "a"]);
    assert!(script.intent("a").is_some());
    assert!(script.intent("c").is_none());
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn parse_every_statement_kind() {
    let script = parse(
        r#"
intent "all"
    reply "r"
    log "l"
    set x = 1
    set $y = 2
    call result = lookup($user_input, 3)
    call notify()
    if $x == 1
        reply "one"
    end
"#,
    )
    .unwrap();

    let body = &script.intent("all").unwrap().body;
    assert_eq!(body.len(), 7);
    assert!(matches!(body[0], Stmt::Reply(..)));
    assert!(matches!(body[1], Stmt::Log(..)));
    assert!(matches!(&body[2], Stmt::Set { name, .. } if name == "x"));
    assert!(matches!(&body[3], Stmt::Set { name, .. } if name == "y"));
    let Stmt::Call(call) = &body[4] else {
        panic!("expected call");
    };
    assert_eq!(call.target.as_deref(), Some("result"));
    assert_eq!(call.function, "lookup");
    assert_eq!(call.args.len(), 2);
    let Stmt::Call(call) = &body[5] else {
        panic!("expected call");
    };
    assert_eq!(call.target, None);
    assert!(call.args.is_empty());
    assert!(matches!(body[6], Stmt::If(_)));
}

#[test]
fn else_and_else_if_are_distinct() {
    let script = parse(
        r#"
intent "plain"
    if $a == 1
        reply "one"
    else
        reply "other"
        reply "still other"
    end

intent "chain"
    if $a == 1
        reply "one"
    else if $a == 2
        reply "two"
    else
        reply "many"
    end
"#,
    )
    .unwrap();

    let Stmt::If(plain) = &script.intent("plain").unwrap().body[0] else {
        panic!("expected if");
    };
    assert!(matches!(&plain.else_branch, Some(ElseBranch::Else(body)) if body.len() == 2));

    let Stmt::If(chain) = &script.intent("chain").unwrap().body[0] else {
        panic!("expected if");
    };
    let Some(ElseBranch::ElseIf(nested)) = &chain.else_branch else {
        panic!("expected else-if, got {:?}", chain.else_branch);
    };
    assert!(matches!(&nested.else_branch, Some(ElseBranch::Else(body)) if body.len() == 1));
}

#[test]
fn single_statement_else_is_not_an_else_if() {
    let script = parse("intent \"i\"\n if $a == 1\n reply \"x\"\n else\n reply \"y\"\n end\n").unwrap();
    let Stmt::If(stmt) = &script.intent("i").unwrap().body[0] else {
        panic!("expected if");
    };
    assert!(matches!(stmt.else_branch, Some(ElseBranch::Else(_))));
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = parse_expr("1 + 2 * 3").unwrap();
    let Expr::Arithmetic { op, rhs, .. } = expr else {
        panic!("expected arithmetic");
    };
    assert_eq!(op, ArithOp::Add);
    assert!(matches!(*rhs, Expr::Arithmetic { op: ArithOp::Mul, .. }));
}

#[test]
fn arithmetic_is_left_associative() {
    let expr = parse_expr("10 - 4 - 3").unwrap();
    let Expr::Arithmetic { op, lhs, .. } = expr else {
        panic!("expected arithmetic");
    };
    assert_eq!(op, ArithOp::Sub);
    assert!(matches!(*lhs, Expr::Arithmetic { op: ArithOp::Sub, .. }));
}

#[test]
fn comparison_wraps_arithmetic() {
    let expr = parse_expr("$count + 1 != 3").unwrap();
    assert!(matches!(expr, Expr::Comparison { op: CompareOp::NotEq, .. }));
}

#[test]
fn matches_takes_a_pattern_literal() {
    let expr = parse_expr(r#"$user_input matches "ORDER\d+""#).unwrap();
    let Expr::Matches { pattern, .. } = expr else {
        panic!("expected matches");
    };
    assert_eq!(pattern, r"ORDER\d+");
    assert!(parse_expr("$a matches $b").is_err());
}

#[test]
fn parenthesized_and_negative_literals() {
    assert!(matches!(
        parse_expr("(1 + 2) * 3").unwrap(),
        Expr::Arithmetic { op: ArithOp::Mul, .. }
    ));
    assert!(matches!(parse_expr("-5").unwrap(), Expr::Int(-5, _)));
}

#[test]
fn trailing_tokens_after_expression_fail() {
    assert!(parse_expr("1 2").is_err());
}

// =============================================================================
// Errors and Recovery
// =============================================================================

#[test]
fn missing_end_reports_opening_line() {
    let errors = diagnostics("intent \"i\"\n  if $a == 1\n    reply \"x\"\nintent \"j\" reply \"y\"\n");
    assert_eq!(errors.len(), 1);
    let message = errors[0].to_string();
    assert!(message.contains("expected 'end' to close 'if' from line 2"), "{message}");
}

#[test]
fn every_bad_section_is_reported() {
    let errors = diagnostics(
        "intent \"ok\" reply \"fine\"\nintent \"bad\" set = 1\nintent \"also_bad\" reply )\nintent \"ok2\" reply \"fine\"\n",
    );
    assert_eq!(parse_error_lines(&errors), vec![2, 3]);
}

#[test]
fn stray_tokens_between_sections_are_reported() {
    let errors = diagnostics("reply \"orphan\"\nintent \"a\" reply \"x\"\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("expected 'config', 'var', 'function' or 'intent'"));
}

#[test]
fn empty_sections_are_errors() {
    assert_eq!(diagnostics("var\nintent \"a\" reply \"x\"").len(), 1);
    assert_eq!(diagnostics("intent \"a\"\nintent \"b\" reply \"x\"").len(), 1);
}

#[test]
fn duplicate_intents_are_rejected() {
    let errors = diagnostics("intent \"a\" reply \"1\"\nintent \"a\" reply \"2\"\n");
    assert!(matches!(
        &errors[0].kind,
        ErrorKind::DuplicateIntent { name, line: 2 } if name == "a"
    ));
}

#[test]
fn parse_errors_quote_the_offending_line() {
    let errors = diagnostics("intent \"a\"\n    set count 5\n");
    let ErrorKind::ParseError { line, context, .. } = &errors[0].kind else {
        panic!("expected parse error, got {}", errors[0]);
    };
    assert_eq!(*line, 2);
    assert_eq!(context.trim(), "set count 5");
}

#[test]
fn illegal_characters_are_skipped_by_the_parser() {
    let source = "intent \"a\" @ reply \"x\"\n";
    let script = parse_tokens(tokenize(source), source).unwrap();
    assert_eq!(script.intent("a").unwrap().body.len(), 1);
}
