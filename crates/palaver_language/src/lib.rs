//! Lexer, parser, AST, and pretty-printer for the Palaver scripting language.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of Palaver source
//! - [`Parser`] - Parsing tokens into a [`Script`]
//! - [`pretty`] - Printing a [`Script`] back to source

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;


pub use ast::{
    ArithOp, Binding, CallStmt, CompareOp, ElseBranch, Expr, FunctionAlias, IfStmt, Intent,
    Script, Section, Stmt,
};
pub use lexer::{Lexer, lex_diagnostics, tokenize};
pub use parser::{Parser, parse, parse_expr, parse_tokens};
pub use pretty::{PrettyConfig, pretty_print};
pub use span::Span;
pub use token::{Token, TokenKind};
