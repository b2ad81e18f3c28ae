//! Parser for Palaver scripts.
//!
//! The parser turns a token stream into a [`Script`]. A malformed section is
//! reported with its line and skipped up to the next section keyword, so one
//! pass collects every diagnostic. If any were collected the whole parse
//! fails: no partial script is ever handed out.

use std::collections::HashSet;

use palaver_foundation::{Error, ErrorKind, Result};

use crate::ast::{
    ArithOp, Binding, CallStmt, CompareOp, ElseBranch, Expr, FunctionAlias, IfStmt, Intent,
    Script, Section, Stmt,
};
use crate::lexer::{Lexer, lex_diagnostics};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for Palaver source code.
pub struct Parser<'src> {
    /// Significant tokens (trivia removed), always ending in `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    pos: usize,
    /// Source text (for error context).
    source: &'src str,
    /// Recoverable lexer diagnostics.
    diagnostics: Vec<Error>,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::from_tokens(Lexer::tokenize_all(source), source)
    }

    /// Creates a parser over an already-lexed token stream.
    ///
    /// `source` is only used to quote the offending line in diagnostics.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>, source: &'src str) -> Self {
        let diagnostics = lex_diagnostics(&tokens);
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect();
        if tokens.last().is_none_or(|token| token.kind != TokenKind::Eof) {
            let end = source.len();
            let line = u32::try_from(source.lines().count().max(1)).unwrap_or(u32::MAX);
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end, line, 1)));
        }
        Self {
            tokens,
            pos: 0,
            source,
            diagnostics,
        }
    }

    /// Lexer diagnostics that were recovered from (illegal characters).
    #[must_use]
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Takes ownership of the recovered lexer diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Parses the whole script.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Script`] holding every section-level diagnostic
    /// if any section failed to parse or an intent name repeats.
    pub fn parse_script(&mut self) -> Result<Script> {
        let mut sections = Vec::new();
        let mut errors = Vec::new();
        let mut intent_names = HashSet::new();

        while self.current().kind != TokenKind::Eof {
            let start = self.pos;
            let parsed = if self.current().kind.is_section_start() {
                self.parse_section()
            } else {
                Err(self.error(&format!(
                    "expected 'config', 'var', 'function' or 'intent', found {}",
                    self.current().kind.name()
                )))
            };

            match parsed {
                Ok(Section::Intent(intent)) if !intent_names.insert(intent.name.clone()) => {
                    errors.push(Error::new(ErrorKind::DuplicateIntent {
                        name: intent.name,
                        line: intent.span.line,
                    }));
                }
                Ok(section) => sections.push(section),
                Err(err) => {
                    errors.push(err);
                    if self.pos == start {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }

        if errors.is_empty() {
            Ok(Script { sections })
        } else {
            Err(Error::script(errors))
        }
    }

    /// Skips tokens until the next section keyword.
    fn synchronize(&mut self) {
        while !matches!(self.current().kind, TokenKind::Eof)
            && !self.current().kind.is_section_start()
        {
            self.advance();
        }
    }

    /// Parses one section.
    fn parse_section(&mut self) -> Result<Section> {
        let start = self.current().span;
        match self.current().kind {
            TokenKind::Config => {
                self.advance();
                let entries = self.parse_bindings("config")?;
                Ok(Section::Config(entries, start.to(self.previous_span())))
            }
            TokenKind::Var => {
                self.advance();
                let entries = self.parse_bindings("var")?;
                Ok(Section::Var(entries, start.to(self.previous_span())))
            }
            TokenKind::Function => {
                self.advance();
                let aliases = self.parse_function_aliases()?;
                Ok(Section::Function(aliases, start.to(self.previous_span())))
            }
            TokenKind::Intent => self.parse_intent().map(Section::Intent),
            _ => Err(self.error("expected section keyword")),
        }
    }

    /// Parses `(IDENT '=' expr)+`.
    fn parse_bindings(&mut self, section: &str) -> Result<Vec<Binding>> {
        let mut entries = Vec::new();
        while let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            let span = self.current().span;
            self.advance();
            self.expect(&TokenKind::Assign)?;
            let value = self.parse_expr()?;
            entries.push(Binding {
                name,
                span: span.to(value.span()),
                value,
            });
        }
        if entries.is_empty() {
            return Err(self.error(&format!(
                "expected at least one entry in '{section}' section, found {}",
                self.current().kind.name()
            )));
        }
        Ok(entries)
    }

    /// Parses `(IDENT '=' STRING)+`.
    fn parse_function_aliases(&mut self) -> Result<Vec<FunctionAlias>> {
        let mut aliases = Vec::new();
        while let TokenKind::Ident(alias) = &self.current().kind {
            let alias = alias.clone();
            let span = self.current().span;
            self.advance();
            self.expect(&TokenKind::Assign)?;
            let TokenKind::String(target) = &self.current().kind else {
                return Err(self.error(&format!(
                    "expected string naming a host function, found {}",
                    self.current().kind.name()
                )));
            };
            let target = target.clone();
            let end = self.current().span;
            self.advance();
            aliases.push(FunctionAlias {
                alias,
                target,
                span: span.to(end),
            });
        }
        if aliases.is_empty() {
            return Err(self.error(&format!(
                "expected at least one entry in 'function' section, found {}",
                self.current().kind.name()
            )));
        }
        Ok(aliases)
    }

    /// Parses `'intent' STRING statement+`.
    fn parse_intent(&mut self) -> Result<Intent> {
        let span = self.current().span;
        self.expect(&TokenKind::Intent)?;
        let TokenKind::String(name) = &self.current().kind else {
            return Err(self.error(&format!(
                "expected intent name string, found {}",
                self.current().kind.name()
            )));
        };
        let name = name.clone();
        self.advance();
        let body = self.parse_block(&format!("intent \"{name}\""))?;
        Ok(Intent {
            name,
            body,
            span: span.to(self.previous_span()),
        })
    }

    /// Parses `statement+`, stopping at the first token that cannot start one.
    fn parse_block(&mut self, owner: &str) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        while self.current().kind.is_statement_start() {
            body.push(self.parse_statement()?);
        }
        if body.is_empty() {
            return Err(self.error(&format!(
                "expected statement in {owner}, found {}",
                self.current().kind.name()
            )));
        }
        Ok(body)
    }

    /// Parses a single statement.
    fn parse_statement(&mut self) -> Result<Stmt> {
        let span = self.current().span;
        match self.current().kind {
            TokenKind::Reply => {
                self.advance();
                let expr = self.parse_expr()?;
                let span = span.to(expr.span());
                Ok(Stmt::Reply(expr, span))
            }
            TokenKind::Log => {
                self.advance();
                let expr = self.parse_expr()?;
                let span = span.to(expr.span());
                Ok(Stmt::Log(expr, span))
            }
            TokenKind::Set => {
                self.advance();
                let name = match &self.current().kind {
                    TokenKind::Ident(name) | TokenKind::Variable(name) => name.clone(),
                    other => {
                        return Err(self.error(&format!(
                            "expected variable name after 'set', found {}",
                            other.name()
                        )));
                    }
                };
                self.advance();
                self.expect(&TokenKind::Assign)?;
                let value = self.parse_expr()?;
                Ok(Stmt::Set {
                    name,
                    span: span.to(value.span()),
                    value,
                })
            }
            TokenKind::Call => self.parse_call().map(Stmt::Call),
            TokenKind::If => self.parse_if().map(Stmt::If),
            _ => Err(self.error(&format!(
                "expected statement, found {}",
                self.current().kind.name()
            ))),
        }
    }

    /// Parses `'call' [IDENT '='] IDENT '(' [expr {',' expr}] ')'`.
    fn parse_call(&mut self) -> Result<CallStmt> {
        let span = self.current().span;
        self.expect(&TokenKind::Call)?;
        let first = self.expect_ident("function name after 'call'")?;
        let (target, function) = if self.current().kind == TokenKind::Assign {
            self.advance();
            let function = self.expect_ident("function name after '='")?;
            (Some(first), function)
        } else {
            (None, first)
        };

        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.current().kind != TokenKind::RParen {
            loop {
                args.push(self.parse_expr()?);
                if self.current().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let end = self.current().span;
        self.expect(&TokenKind::RParen)?;

        Ok(CallStmt {
            target,
            function,
            args,
            span: span.to(end),
        })
    }

    /// Parses `'if' expr statement+ ('else' (if_stmt | statement+ 'end') | 'end')`.
    ///
    /// An `else` directly followed by `if` becomes [`ElseBranch::ElseIf`] and the
    /// nested conditional owns the chain's single closing `end`.
    fn parse_if(&mut self) -> Result<IfStmt> {
        let span = self.current().span;
        self.expect(&TokenKind::If)?;
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block("'if' branch")?;

        let else_branch = if self.current().kind == TokenKind::Else {
            self.advance();
            if self.current().kind == TokenKind::If {
                let nested = self.parse_if()?;
                return Ok(IfStmt {
                    condition,
                    then_branch,
                    span: span.to(nested.span),
                    else_branch: Some(ElseBranch::ElseIf(Box::new(nested))),
                });
            }
            Some(ElseBranch::Else(self.parse_block("'else' branch")?))
        } else {
            None
        };

        let end = self.current().span;
        if self.current().kind != TokenKind::End {
            return Err(self.error(&format!(
                "expected 'end' to close 'if' from line {}, found {}",
                span.line,
                self.current().kind.name()
            )));
        }
        self.advance();

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: span.to(end),
        })
    }

    /// Parses an expression.
    ///
    /// Equality, `matches` and `contains` bind loosest and do not chain.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let lhs = self.parse_additive()?;
        match self.current().kind {
            TokenKind::EqEq | TokenKind::NotEq => {
                let op = if self.current().kind == TokenKind::EqEq {
                    CompareOp::Eq
                } else {
                    CompareOp::NotEq
                };
                self.advance();
                let rhs = self.parse_additive()?;
                Ok(Expr::Comparison {
                    op,
                    span: lhs.span().to(rhs.span()),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }
            TokenKind::Matches => {
                self.advance();
                let TokenKind::String(pattern) = &self.current().kind else {
                    return Err(self.error(&format!(
                        "expected string pattern after 'matches', found {}",
                        self.current().kind.name()
                    )));
                };
                let pattern = pattern.clone();
                let end = self.current().span;
                self.advance();
                Ok(Expr::Matches {
                    span: lhs.span().to(end),
                    subject: Box::new(lhs),
                    pattern,
                })
            }
            TokenKind::Contains => {
                self.advance();
                let needle = self.parse_additive()?;
                Ok(Expr::Contains {
                    span: lhs.span().to(needle.span()),
                    haystack: Box::new(lhs),
                    needle: Box::new(needle),
                })
            }
            _ => Ok(lhs),
        }
    }

    /// Parses `+` and `-` chains (left-associative).
    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    /// Parses `*` and `/` chains (left-associative).
    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    /// Parses a negative number literal or a primary.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.current().kind != TokenKind::Minus {
            return self.parse_primary();
        }
        let span = self.current().span;
        self.advance();
        let literal = match self.current().kind {
            TokenKind::Int(n) => Expr::Int(-n, span.to(self.current().span)),
            TokenKind::Float(n) => Expr::Float(-n, span.to(self.current().span)),
            _ => {
                return Err(self.error(&format!(
                    "expected number after '-', found {}",
                    self.current().kind.name()
                )));
            }
        };
        self.advance();
        Ok(literal)
    }

    /// Parses a literal, variable, identifier or parenthesized expression.
    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current().span;
        let expr = match &self.current().kind {
            TokenKind::String(s) => Expr::String(s.clone(), span),
            TokenKind::Int(n) => Expr::Int(*n, span),
            TokenKind::Float(n) => Expr::Float(*n, span),
            TokenKind::True => Expr::Bool(true, span),
            TokenKind::False => Expr::Bool(false, span),
            TokenKind::Variable(name) => Expr::Variable(name.clone(), span),
            TokenKind::Ident(name) => Expr::Identifier(name.clone(), span),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Error(message) => return Err(self.error(message)),
            TokenKind::Eof => return Err(self.error("unexpected end of input")),
            other => {
                return Err(self.error(&format!("expected expression, found {}", other.name())));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Returns the current token.
    fn current(&self) -> &Token {
        // `tokens` always ends in Eof and `advance` never moves past it.
        &self.tokens[self.pos]
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    /// Advances to the next token, stopping at `Eof`.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<Span> {
        let matches =
            std::mem::discriminant(&self.current().kind) == std::mem::discriminant(expected);

        if matches {
            let span = self.current().span;
            self.advance();
            Ok(span)
        } else {
            let expected_name = expected.name();
            Err(self.error(&format!(
                "expected {expected_name}, found {}",
                self.current().kind.name()
            )))
        }
    }

    /// Expects an identifier and returns its text.
    fn expect_ident(&mut self, what: &str) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(&format!(
                "expected {what}, found {}",
                self.current().kind.name()
            )))
        }
    }

    /// Creates a parse error at the current token.
    fn error(&self, message: &str) -> Error {
        let span = self.current().span;
        Error::parse(
            message,
            span.line,
            span.column,
            span.source_line(self.source).to_string(),
        )
    }
}

fn binary(op: ArithOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Arithmetic {
        op,
        span: lhs.span().to(rhs.span()),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Parses script text into a [`Script`].
///
/// # Errors
/// Returns [`ErrorKind::Script`] with every diagnostic if the script is malformed.
pub fn parse(source: &str) -> Result<Script> {
    Parser::new(source).parse_script()
}

/// Parses an already-lexed token stream.
///
/// # Errors
/// Returns [`ErrorKind::Script`] with every diagnostic if the tokens do not
/// form a valid script.
pub fn parse_tokens(tokens: Vec<Token>, source: &str) -> Result<Script> {
    Parser::from_tokens(tokens, source).parse_script()
}

/// Parses a single expression (used by tools and tests).
///
/// # Errors
/// Returns a parse error if the text is not exactly one expression.
pub fn parse_expr(source: &str) -> Result<Expr> {
    let mut parser = Parser::new(source);
    let expr = parser.parse_expr()?;
    if parser.current().kind == TokenKind::Eof {
        Ok(expr)
    } else {
        Err(parser.error(&format!(
            "unexpected {} after expression",
            parser.current().kind.name()
        )))
    }
}
