//! Token types for Palaver scripts.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The source line this token starts on.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.span.line
    }
}

/// Token types for Palaver scripts.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Section keywords
    /// `config`
    Config,
    /// `var`
    Var,
    /// `function`
    Function,
    /// `intent`
    Intent,

    // Statement keywords
    /// `reply`
    Reply,
    /// `set`
    Set,
    /// `if`
    If,
    /// `else`
    Else,
    /// `end`
    End,
    /// `call`
    Call,
    /// `log`
    Log,

    // Word operators
    /// `matches`
    Matches,
    /// `contains`
    Contains,

    // Operators and punctuation
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    // Literals
    /// `true`
    True,
    /// `false`
    False,
    /// Integer literal like `42`
    Int(i64),
    /// Decimal literal like `3.5`
    Float(f64),
    /// String literal with escapes already applied
    String(String),
    /// Variable reference like `$name` (stored without the `$`)
    Variable(String),
    /// Plain identifier
    Ident(String),

    // Meta
    /// Comment text (including `#`)
    Comment(String),
    /// A character the lexer does not recognize; scanning continues after it
    Illegal(char),
    /// Malformed literal (unterminated string, out-of-range number)
    Error(String),
    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns true if the parser should skip this token.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_) | Self::Illegal(_))
    }

    /// Returns true if this token opens a top-level section.
    #[must_use]
    pub const fn is_section_start(&self) -> bool {
        matches!(self, Self::Config | Self::Var | Self::Function | Self::Intent)
    }

    /// Returns true if this token begins a statement.
    #[must_use]
    pub const fn is_statement_start(&self) -> bool {
        matches!(
            self,
            Self::Reply | Self::Set | Self::Log | Self::Call | Self::If
        )
    }

    /// Looks up the reserved word spelled `word`.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "config" => Self::Config,
            "var" => Self::Var,
            "function" => Self::Function,
            "intent" => Self::Intent,
            "reply" => Self::Reply,
            "set" => Self::Set,
            "if" => Self::If,
            "else" => Self::Else,
            "end" => Self::End,
            "call" => Self::Call,
            "log" => Self::Log,
            "matches" => Self::Matches,
            "contains" => Self::Contains,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Config => "'config'",
            Self::Var => "'var'",
            Self::Function => "'function'",
            Self::Intent => "'intent'",
            Self::Reply => "'reply'",
            Self::Set => "'set'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::End => "'end'",
            Self::Call => "'call'",
            Self::Log => "'log'",
            Self::Matches => "'matches'",
            Self::Contains => "'contains'",
            Self::Assign => "'='",
            Self::EqEq => "'=='",
            Self::NotEq => "'!='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::True => "true",
            Self::False => "false",
            Self::Int(_) => "integer",
            Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Variable(_) => "variable",
            Self::Ident(_) => "identifier",
            Self::Comment(_) => "comment",
            Self::Illegal(_) => "illegal character",
            Self::Error(_) => "error",
            Self::Eof => "end of input",
        }
    }
}
