//! Integration tests for Layer 1: Language
//!
//! Tests for the lexer, parser, and pretty-printer.

mod lexer;
mod parser;
mod pretty;
