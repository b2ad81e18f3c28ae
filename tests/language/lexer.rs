//! Integration tests for the lexer
//!
//! Tests tokenization of Palaver script text.

use palaver_foundation::ErrorKind;
use palaver_language::{Lexer, TokenKind, lex_diagnostics, tokenize};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

// =============================================================================
// Keywords and Operators
// =============================================================================

#[test]
fn tokenize_section_keywords() {
    assert_eq!(
        kinds("config var function intent"),
        vec![
            TokenKind::Config,
            TokenKind::Var,
            TokenKind::Function,
            TokenKind::Intent,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_statement_keywords() {
    assert_eq!(
        kinds("reply set if else end call log matches"),
        vec![
            TokenKind::Reply,
            TokenKind::Set,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::End,
            TokenKind::Call,
            TokenKind::Log,
            TokenKind::Matches,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_operators() {
    assert_eq!(
        kinds("= == + - * / ( ) ,"),
        vec![
            TokenKind::Assign,
            TokenKind::EqEq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_case_sensitive_words() {
    assert_eq!(
        kinds("Reply replying"),
        vec![
            TokenKind::Ident("Reply".into()),
            TokenKind::Ident("replying".into()),
            TokenKind::Eof,
        ]
    );
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn tokenize_numbers() {
    assert_eq!(
        kinds("0 42 2.5"),
        vec![
            TokenKind::Int(0),
            TokenKind::Int(42),
            TokenKind::Float(2.5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_strings_with_escapes() {
    assert_eq!(
        kinds(r#""say \"hi\"\n""#),
        vec![TokenKind::String("say \"hi\"\n".into()), TokenKind::Eof]
    );
}

#[test]
fn regex_escapes_survive_in_strings() {
    assert_eq!(
        kinds(r#""ORDER\d+""#),
        vec![TokenKind::String(r"ORDER\d+".into()), TokenKind::Eof]
    );
}

#[test]
fn tokenize_variables_and_identifiers() {
    assert_eq!(
        kinds("$user_input name"),
        vec![
            TokenKind::Variable("user_input".into()),
            TokenKind::Ident("name".into()),
            TokenKind::Eof,
        ]
    );
}

// =============================================================================
// Trivia and Recovery
// =============================================================================

#[test]
fn comments_are_tokens_until_end_of_line() {
    let tokens = tokenize("reply \"a\" # trailing\nend");
    assert!(matches!(tokens[2].kind, TokenKind::Comment(_)));
    assert_eq!(tokens[3].kind, TokenKind::End);
    assert_eq!(tokens[3].line(), 2);
}

#[test]
fn line_numbers_are_tracked() {
    let tokens = Lexer::tokenize_all("intent \"a\"\n\n  reply \"b\"");
    assert_eq!(tokens[0].line(), 1);
    assert_eq!(tokens[2].line(), 3);
    assert_eq!(tokens[2].span.column, 3);
}

#[test]
fn illegal_characters_do_not_stop_scanning() {
    let tokens = tokenize("reply @ \"still here\" ~");
    assert_eq!(tokens[1].kind, TokenKind::Illegal('@'));
    assert_eq!(tokens[2].kind, TokenKind::String("still here".into()));
    assert_eq!(tokens[3].kind, TokenKind::Illegal('~'));
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));

    let diagnostics = lex_diagnostics(&tokens);
    assert_eq!(diagnostics.len(), 2);
    assert!(matches!(
        diagnostics[0].kind,
        ErrorKind::LexError { character: '@', line: 1, column: 7 }
    ));
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \n\t  "), vec![TokenKind::Eof]);
}
